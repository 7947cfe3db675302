//! recordlog CLI
//!
//! Command-line tools for inspecting and maintaining record log files.
//!
//! # Commands
//!
//! - `stats` - Record count, size and checkpoint summary
//! - `dump` - Print records as hex
//! - `append` - Append records from arguments or stdin
//! - `truncate` - Drop records from an index onward
//! - `verify` - Check a log without modifying it
//! - `repair` - Cut off a torn trailing record

mod commands;

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// recordlog command-line tools.
#[derive(Parser)]
#[command(name = "recordlog")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to the log file
    #[arg(global = true, short, long)]
    path: Option<PathBuf>,

    /// Enable verbose output
    #[arg(global = true, short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Display record count, file size and checkpoints
    Stats {
        /// Output format (text, json)
        #[arg(short, long, default_value = "text")]
        format: String,
    },

    /// Print records as hex
    Dump {
        /// First record index to print
        #[arg(short, long, default_value = "0")]
        start: u64,

        /// Maximum number of records to print
        #[arg(short, long)]
        limit: Option<usize>,

        /// Output format (text, json)
        #[arg(short, long, default_value = "text")]
        format: String,
    },

    /// Append records (one per value, or one per stdin line)
    Append {
        /// Records between commits (0 = commit once at the end)
        #[arg(short, long, default_value_t = recordlog_core::DEFAULT_COMMIT_EVERY)]
        commit_every: usize,

        /// Record payloads; reads stdin lines when empty
        values: Vec<String>,
    },

    /// Keep only the first RECORD_COUNT records
    Truncate {
        /// Number of records to keep
        record_count: u64,
    },

    /// Check the log without modifying it
    Verify,

    /// Remove a torn trailing record
    Repair,

    /// Show version information
    Version,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Stats { format } => {
            let path = cli.path.ok_or("Log path required for stats")?;
            commands::stats::run(&path, &format)?;
        }
        Commands::Dump {
            start,
            limit,
            format,
        } => {
            let path = cli.path.ok_or("Log path required for dump")?;
            commands::dump::run(&path, start, limit, &format)?;
        }
        Commands::Append {
            commit_every,
            values,
        } => {
            let path = cli.path.ok_or("Log path required for append")?;
            commands::append::run(&path, commit_every, values)?;
        }
        Commands::Truncate { record_count } => {
            let path = cli.path.ok_or("Log path required for truncate")?;
            commands::truncate::run(&path, record_count)?;
        }
        Commands::Verify => {
            let path = cli.path.ok_or("Log path required for verify")?;
            commands::verify::run(&path)?;
        }
        Commands::Repair => {
            let path = cli.path.ok_or("Log path required for repair")?;
            commands::repair::run(&path)?;
        }
        Commands::Version => {
            println!("recordlog CLI v{}", env!("CARGO_PKG_VERSION"));
            println!("recordlog core v{}", recordlog_core::VERSION);
        }
    }

    Ok(())
}
