//! NearU Marketplace CLI - table views and CSV export from the terminal.
//!
//! # Usage
//!
//! ```bash
//! # First page of merchants, highest revenue first
//! mkt-cli view merchants --sort revenue --desc
//!
//! # Delivered orders, 25 per page, page 2
//! mkt-cli view orders --filter status=delivered --per-page 25 --page 2
//!
//! # Any JSON array of objects with an `id`
//! mkt-cli view ./people.json --search ann
//!
//! # Export every matching customer
//! mkt-cli export customers --filter loyalty_tier=Gold --output gold.csv
//! ```
//!
//! # Commands
//!
//! - `view` - Print one page of a table
//! - `export` - Write every matching row as CSV

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "mkt-cli")]
#[command(author, version, about = "NearU marketplace table tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print one page of a table
    View {
        #[command(flatten)]
        table: TableArgs,

        /// Page to show (clamped to the available pages)
        #[arg(long, default_value_t = 1)]
        page: usize,

        /// Rows per page (5, 10, 25, 50 or 100)
        #[arg(long, default_value_t = 10)]
        per_page: usize,
    },
    /// Write every matching row as CSV
    Export {
        #[command(flatten)]
        table: TableArgs,

        /// Output file (defaults to `{title}-{timestamp}.csv`)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Quote fields per RFC 4180 instead of the legacy format
        #[arg(long)]
        rfc4180: bool,

        /// Title used for the default filename
        #[arg(long)]
        title: Option<String>,
    },
}

/// Table selection and view options shared by every command.
#[derive(Args)]
pub struct TableArgs {
    /// `merchants`, `customers`, `orders`, or a path to a JSON file
    pub source: String,

    /// Case-insensitive search text
    #[arg(short, long)]
    pub search: Option<String>,

    /// Column key to sort by
    #[arg(long)]
    pub sort: Option<String>,

    /// Sort descending
    #[arg(long, requires = "sort")]
    pub desc: bool,

    /// Facet filter, `KEY=VALUE`; repeatable
    #[arg(short, long = "filter", value_parser = commands::parse_filter)]
    pub filters: Vec<(String, String)>,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), commands::CliError> {
    match cli.command {
        Commands::View {
            table,
            page,
            per_page,
        } => commands::view::run(&table, page, per_page),
        Commands::Export {
            table,
            output,
            rfc4180,
            title,
        } => commands::export::run(&table, output, rfc4180, title.as_deref()),
    }
}
