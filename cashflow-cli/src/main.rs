use anyhow::{bail, Context, Result};
use cashflow_core::{rollup, Transaction};
use cashflow_ingest::{read_statement, source_file_name, StatementFormat};
use cashflow_ledger::{plot_monthly, write_monthly_csv, LedgerError, Store};
use clap::{ArgAction, Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_subscriber::EnvFilter;

mod config;
mod state;

use config::{config_path, init_config, load_config, Config};

const VERSION: &str = concat!(env!("CARGO_PKG_VERSION"), " (", env!("CASHFLOW_BUILD_SHA"), ")");

#[derive(Parser, Debug)]
#[command(name = "cashflow", version = VERSION, about = "Bank statement ingestion and monthly cashflow reports")]
struct Cli {
    /// Config file (default: $CASHFLOW_HOME/config.toml, ~/.cashflow/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Log more to stderr (-v info, -vv debug, -vvv trace); RUST_LOG applies otherwise
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Parse one statement and append it to the curated dataset
    Ingest {
        /// Statement file (PDF or CSV)
        path: PathBuf,

        /// Statement layout: boh_pdf | boa_pdf | discover_csv | generic_csv
        #[arg(value_name = "KIND")]
        kind: StatementFormat,

        /// Account label stamped on every row (e.g. "BoH Checking")
        account: String,

        /// Institution label (default: per-kind value from config)
        #[arg(long)]
        institution: Option<String>,
    },

    /// Write the monthly rollup CSV (default: <reports>/monthly_rollup.csv)
    Monthly {
        #[arg(long)]
        out: Option<PathBuf>,
    },

    /// Write the monthly spend/income/net chart (default: <reports>/monthly_plot.png)
    Viz {
        #[arg(long)]
        out: Option<PathBuf>,
    },

    /// Config file helpers
    Config {
        #[command(subcommand)]
        command: ConfigCommand,
    },
}

#[derive(Subcommand, Debug)]
enum ConfigCommand {
    /// Write a default config file if none exists
    Init,
    /// Print the effective config
    Show,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let cfg_path = config_path(cli.config.as_deref())?;
    let cfg = load_config(&cfg_path)?;

    match cli.command {
        Command::Ingest {
            path,
            kind,
            account,
            institution,
        } => {
            let institution = institution.unwrap_or_else(|| cfg.institution_for(kind));
            ingest(&cfg, &path, kind, &account, &institution)?;
        }

        Command::Monthly { out } => {
            let out = out.unwrap_or_else(|| cfg.paths.reports.join("monthly_rollup.csv"));
            let months = rollup(&read_dataset(&cfg)?);
            write_monthly_csv(&months, &out)
                .with_context(|| format!("writing {}", out.display()))?;
            println!("Wrote {} ({} months)", out.display(), months.len());
        }

        Command::Viz { out } => {
            let out = out.unwrap_or_else(|| cfg.paths.reports.join("monthly_plot.png"));
            let months = rollup(&read_dataset(&cfg)?);
            plot_monthly(&months, &out).with_context(|| format!("plotting {}", out.display()))?;
            println!("Wrote {}", out.display());
        }

        Command::Config { command } => match command {
            ConfigCommand::Init => init_config(&cfg_path)?,
            ConfigCommand::Show => {
                println!("# {}", cfg_path.display());
                print!("{}", toml::to_string_pretty(&cfg).context("serialize config")?);
            }
        },
    }

    Ok(())
}

/// `-v` wins over RUST_LOG; with neither, only warnings are shown.
fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => None,
        1 => Some("info"),
        2 => Some("debug"),
        _ => Some("trace"),
    };
    let filter = match level {
        Some(level) => EnvFilter::new(level),
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn ingest(cfg: &Config, path: &Path, kind: StatementFormat, account: &str, institution: &str) -> Result<()> {
    if !path.exists() {
        bail!("File not found: {}", path.display());
    }

    let txns = read_statement(path, kind, account, institution, &cfg.ingest_options())
        .with_context(|| format!("ingesting {} as {}", path.display(), kind))?;

    let store = Store::open(&cfg.paths.dataset);
    let summary = store
        .append(&txns)
        .with_context(|| format!("appending to {}", store.path().display()))?;

    info!(file = %path.display(), %kind, account, institution, "ingest complete");
    println!(
        "Ingested {} rows from {} -> {} ({} new, {} total)",
        txns.len(),
        source_file_name(path),
        store.path().display(),
        summary.added,
        summary.total
    );
    Ok(())
}

fn read_dataset(cfg: &Config) -> Result<Vec<Transaction>> {
    match Store::open(&cfg.paths.dataset).read() {
        Ok(txns) => Ok(txns),
        Err(LedgerError::DatasetNotFound(p)) => bail!(
            "No dataset at {}. Run: cashflow ingest <path> <kind> <account>",
            p.display()
        ),
        Err(e) => Err(e).context("reading curated dataset"),
    }
}
