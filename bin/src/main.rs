//! klinebase CLI - Binance daily kline ingester.

use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

mod commands;
mod config;
mod display;

use config::Settings;

#[derive(Parser)]
#[command(name = "klinebase")]
#[command(about = "Binance daily kline ingester and Parquet store", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Quiet mode (suppress progress output and non-error logs)
    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(flatten)]
    settings: Settings,
}

#[derive(Subcommand)]
enum Commands {
    /// Ingest every (symbol, interval, date range) of a batch file
    Fetch {
        /// Batch JSON file: {"symbols": {SYMBOL: {INTERVAL: {start_date, end_date}}}}
        batch: PathBuf,

        /// Maximum daily pipelines in flight. Defaults to the connection pool size.
        #[arg(long)]
        concurrency: Option<usize>,

        /// Skip the symbol existence probe
        #[arg(long)]
        no_verify_symbols: bool,
    },

    /// Load a stored date range
    Load {
        /// Trading pair (e.g., BTCUSDT)
        symbol: String,

        /// Bar interval (e.g., 1h)
        interval: String,

        /// Start date (YYYY-MM-DD)
        start: String,

        /// End date (YYYY-MM-DD), inclusive
        end: String,

        /// Write the rows as CSV to this file instead of printing a summary
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// List supported intervals
    Intervals,
}

fn init_tracing(verbose: u8, quiet: bool) {
    let default = if quiet {
        "error"
    } else {
        match verbose {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        }
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose, cli.quiet);

    let Some(command) = cli.command else {
        Cli::command().print_help()?;
        return Ok(());
    };

    match command {
        Commands::Fetch {
            batch,
            concurrency,
            no_verify_symbols,
        } => {
            commands::fetch::fetch(
                &cli.settings,
                &batch,
                concurrency,
                !no_verify_symbols,
                cli.quiet,
            )
            .await
        }
        Commands::Load {
            symbol,
            interval,
            start,
            end,
            output,
        } => commands::load::load(&cli.settings, &symbol, &interval, &start, &end, output).await,
        Commands::Intervals => {
            commands::intervals::list_intervals();
            Ok(())
        }
    }
}
