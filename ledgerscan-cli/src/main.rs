use anyhow::{Context, Result, bail};
use clap::{ArgAction, Parser, Subcommand};
use ledgerscan_core::StatementRecord;
use ledgerscan_export::{grid_to_csv, parse_detection_response, transactions_to_csv};
use ledgerscan_ingest::{IngestError, StatementParser};
use std::path::{Path, PathBuf};
use tracing::{info, warn};
use tracing_subscriber::{filter::LevelFilter, fmt};

mod config;
mod state;

#[derive(Parser, Debug)]
#[command(
    name = "ledgerscan",
    version,
    about = "Recover structured bank statements from OCR text"
)]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Extract header fields and transactions as JSON
    Extract {
        /// OCR text, one file per page (`-` reads stdin)
        #[arg(required = true)]
        pages: Vec<PathBuf>,

        /// Anchor layout TOML (defaults to ~/.ledgerscan/layout.toml, then the sample layout)
        #[arg(long)]
        layout: Option<PathBuf>,

        /// Write JSON here instead of stdout (e.g. bank_statement.json)
        #[arg(long)]
        output: Option<PathBuf>,

        /// Single-line JSON
        #[arg(long)]
        compact: bool,
    },

    /// Print the reconstructed transactions as CSV
    Transactions {
        #[arg(required = true)]
        pages: Vec<PathBuf>,

        #[arg(long)]
        layout: Option<PathBuf>,
    },

    /// Render a saved table-detection response as CSV, one block per table
    Grid { response: PathBuf },

    /// Print the default anchor layout as TOML
    Layout {
        /// Write it to ~/.ledgerscan/layout.toml instead
        #[arg(long)]
        init: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(level_for(cli.verbose));

    match cli.command {
        Command::Extract {
            pages,
            layout,
            output,
            compact,
        } => {
            let record = extract(&pages, layout.as_deref())?;
            let json = if compact {
                serde_json::to_string(&record)?
            } else {
                serde_json::to_string_pretty(&record)?
            };

            match output {
                Some(path) => {
                    std::fs::write(&path, json)
                        .with_context(|| format!("write {}", path.display()))?;
                    println!("Wrote {}", path.display());
                }
                None => println!("{json}"),
            }
        }

        Command::Transactions { pages, layout } => {
            let record = extract(&pages, layout.as_deref())?;
            print!("{}", transactions_to_csv(&record.transactions)?);
        }

        Command::Grid { response } => {
            let json = std::fs::read_to_string(&response)
                .with_context(|| format!("read {}", response.display()))?;
            let grids = parse_detection_response(&json)
                .with_context(|| format!("parsing {}", response.display()))?;
            if grids.is_empty() {
                bail!("no tables in {}", response.display());
            }

            for (i, grid) in grids.iter().enumerate() {
                if i > 0 {
                    println!();
                }
                print!("{}", grid_to_csv(grid)?);
            }
        }

        Command::Layout { init } => {
            if init {
                config::init_layout()?;
            } else {
                let layout = ledgerscan_ingest::StatementLayout::default();
                print!("{}", config::layout_toml(&layout)?);
            }
        }
    }

    Ok(())
}

fn level_for(verbose: u8) -> LevelFilter {
    match verbose {
        0 => LevelFilter::WARN,
        1 => LevelFilter::INFO,
        2 => LevelFilter::DEBUG,
        _ => LevelFilter::TRACE,
    }
}

fn init_tracing(level: LevelFilter) {
    // stderr keeps stdout clean for JSON/CSV
    let subscriber = fmt()
        .with_max_level(level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .finish();

    if tracing::subscriber::set_global_default(subscriber).is_err() {
        warn!("Tracing subscriber already set; skipping re-initialization.");
    }
}

fn extract(paths: &[PathBuf], layout: Option<&Path>) -> Result<StatementRecord> {
    let layout = config::load_layout(layout)?;
    let parser = StatementParser::new(&layout).context("compiling layout")?;
    let pages = paths
        .iter()
        .map(|p| state::read_input(p))
        .collect::<Result<Vec<_>>>()?;
    let record = parser.extract_pages(&pages).map_err(|e| {
        let IngestError::NotText { page, .. } = &e;
        let path = paths[*page].display().to_string();
        anyhow::Error::new(e).context(format!("reading {path}"))
    })?;

    info!(
        pages = paths.len(),
        transactions = record.transactions.len(),
        "extracted statement"
    );
    if record.count_mismatch() {
        warn!(
            printed = ?record.header.number_of_transactions,
            recovered = record.transactions.len(),
            "printed transaction count differs from recovered rows"
        );
    }
    let unaligned = record.transactions.iter().filter(|t| t.is_unaligned()).count();
    if unaligned > 0 {
        warn!(unaligned, "rows with neither credit nor debit");
    }
    for i in record.rows_outside_period() {
        warn!(
            row = i,
            date = %record.transactions[i].date,
            "transaction date outside the period covered"
        );
    }

    Ok(record)
}
