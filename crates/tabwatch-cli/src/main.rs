//! tabwatch Command-Line Client
//!
//! Replays table edits through a change tracker, selects rows and prints
//! column layouts.

mod commands;
mod error;
mod formatter;
mod parse;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use formatter::{create_formatter, OutputFormat};

use crate::error::Error;

/// tabwatch Command-Line Client
#[derive(Parser, Debug)]
#[command(name = "tabwatch")]
#[command(version, about = "Detect and report meaningful edits to tabular data")]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,

    /// Output format
    #[arg(long, default_value = "table", value_enum, global = true)]
    pub format: OutputFormat,

    /// Tracker configuration file (JSON)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Apply a sequence of edits and report which ones notified subscribers
    Replay {
        /// Table file (JSON)
        #[arg(short, long)]
        table: PathBuf,

        /// Edits file: a JSON array of {"column": [values]} objects
        #[arg(short, long)]
        edits: PathBuf,
    },

    /// Print the rows at the given positions
    Select {
        /// Table file (JSON)
        #[arg(short, long)]
        table: PathBuf,

        /// Comma-separated row positions, e.g. 0,2
        #[arg(short, long, value_delimiter = ',', required = true)]
        rows: Vec<usize>,
    },

    /// Print the formatter and editor chosen for each column
    Columns {
        /// Table file (JSON)
        #[arg(short, long)]
        table: PathBuf,

        /// Editor override, e.g. str=select:A|B|C
        #[arg(long = "editor")]
        editors: Vec<String>,

        /// Formatter override, e.g. float=number:0.0000
        #[arg(long = "formatter")]
        formatters: Vec<String>,

        /// Title override, e.g. str=Letter
        #[arg(long = "title")]
        titles: Vec<String>,
    },
}

fn main() {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "tabwatch=info".into()),
        )
        .init();

    let args = Args::parse();

    if let Err(e) = run(args) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run(args: Args) -> Result<(), Error> {
    let formatter = create_formatter(args.format);
    let config = commands::load_config(args.config.as_deref())?;

    let output = match args.command {
        Command::Replay { table, edits } => {
            let table = commands::load_table(&table)?;
            let edits = commands::load_edits(&edits)?;
            tracing::info!(
                rows = table.row_count(),
                edits = edits.len(),
                "replaying edits"
            );
            let report = commands::replay(table, edits, config);
            formatter.format_replay(&report)
        }
        Command::Select { table, rows } => {
            let table = commands::load_table(&table)?;
            formatter.format_table(&commands::select(table, &rows)?)
        }
        Command::Columns {
            table,
            editors,
            formatters,
            titles,
        } => {
            let table = commands::load_table(&table)?;
            let options = parse::column_options(&editors, &formatters, &titles)?;
            formatter.format_layout(&commands::columns(table, config, &options))
        }
    };

    println!("{}", output);
    Ok(())
}
