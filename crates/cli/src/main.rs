//! podcheck entry point.
//!
//! Loads configuration, installs logging on stderr and dispatches to the
//! subcommands. Stdout carries only command output so it can be piped into
//! a report renderer.

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use podcheck_core::AppConfig;
use tracing_subscriber::EnvFilter;

mod commands;
mod output;

use commands::{FeedKind, FeedSelector};

#[derive(Parser)]
#[command(name = "podcheck", version, about = "Track which episodes of a feed are downloadable")]
struct Cli {
    /// TOML config file (overrides PODCHECK_CONFIG_FILE)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[arg(long, global = true, value_enum, default_value = "json")]
    log_format: LogFormat,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Probe new identifiers and update the snapshots
    Run {
        #[arg(long, value_enum, default_value = "all")]
        feed: FeedSelector,
        /// Ignore the frontier trigger window
        #[arg(long)]
        force: bool,
    },
    /// Print a stored snapshot in canonical order
    Show {
        #[arg(value_enum)]
        feed: FeedKind,
        /// Emit the snapshot JSON instead of a table
        #[arg(long)]
        json: bool,
    },
    /// Remove one record so the next run probes it again
    Forget {
        #[arg(value_enum)]
        feed: FeedKind,
        identifier: String,
    },
    /// Print the effective configuration
    Config,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum LogFormat {
    Json,
    Text,
}

fn init_tracing(format: LogFormat) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt().with_env_filter(filter).with_writer(std::io::stderr);
    match format {
        LogFormat::Json => builder.json().init(),
        LogFormat::Text => builder.init(),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.log_format);

    let config = match cli.config.as_deref() {
        Some(path) => AppConfig::load_from(Some(path))?,
        None => AppConfig::load()?,
    };

    match cli.command {
        Command::Run { feed, force } => {
            let now = chrono::Local::now().naive_local();
            let summaries = commands::run(&config, feed, force, now).await?;
            for summary in &summaries {
                println!("{summary}");
            }
        }
        Command::Show { feed, json } => print!("{}", commands::show(&config, feed, json)?),
        Command::Forget { feed, identifier } => {
            if commands::forget(&config, feed, &identifier)? {
                println!("forgot {identifier}; it will be probed on the next run");
            } else {
                println!("{identifier} is not in the {feed} snapshot");
            }
        }
        Command::Config => println!("{}", serde_json::to_string_pretty(&config)?),
    }

    Ok(())
}
