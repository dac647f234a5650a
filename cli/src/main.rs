//! agora: command line for the Agora governance engine.

mod replay;

use std::path::PathBuf;

use agora_dao::{Dao, DaoConfig, ParamsConfig};
use agora_ledger::MemoryLedger;
use agora_types::{Clock, SystemClock, Timestamp};
use agora_utils::{format_duration, LogFormat};
use anyhow::Context;
use clap::Parser;

#[derive(Parser)]
#[command(name = "agora", about = "Agora governance engine")]
struct Cli {
    /// Path to a TOML configuration file. CLI flags and env vars override it.
    #[arg(long, env = "AGORA_CONFIG")]
    config: Option<PathBuf>,

    /// Log format: "human" or "json".
    #[arg(long, env = "AGORA_LOG_FORMAT")]
    log_format: Option<LogFormat>,

    /// Log level: "trace", "debug", "info", "warn", "error".
    #[arg(long, env = "AGORA_LOG_LEVEL")]
    log_level: Option<String>,

    /// Subcommand.
    #[command(subcommand)]
    command: Command,
}

#[derive(clap::Subcommand)]
enum Command {
    /// Print the effective configuration as TOML.
    Config {
        /// Start from the short testnet timelines instead of the defaults.
        #[arg(long)]
        testnet: bool,
    },
    /// Replay a JSON operation script against an in-memory DAO.
    Replay {
        /// Script file.
        #[arg(long)]
        script: PathBuf,

        /// Print one JSON object per step instead of text.
        #[arg(long)]
        json: bool,

        /// Count step times from the current wall-clock time instead of
        /// from the Unix epoch.
        #[arg(long)]
        relative: bool,
    },
}

fn load_config(cli: &Cli) -> anyhow::Result<DaoConfig> {
    let mut config = match &cli.config {
        Some(path) => DaoConfig::from_toml_file(path)
            .with_context(|| format!("loading config from {}", path.display()))?,
        None => DaoConfig::default(),
    };
    if let Some(format) = cli.log_format {
        config.log_format = format;
    }
    if let Some(level) = &cli.log_level {
        config.log_level = level.clone();
    }
    Ok(config)
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let mut config = load_config(&cli)?;
    agora_utils::init_logging(config.log_format, &config.log_level)?;

    match cli.command {
        Command::Config { testnet } => {
            if testnet {
                config.params = ParamsConfig::testnet();
            }
            tracing::debug!(
                lock = %format_duration(config.params.staking_lock_time_secs),
                duration = %format_duration(config.params.proposal_duration_secs),
                "effective timelines"
            );
            print!("{}", config.to_toml_string()?);
        }
        Command::Replay {
            script,
            json,
            relative,
        } => {
            let text = std::fs::read_to_string(&script)
                .with_context(|| format!("reading script {}", script.display()))?;
            let parsed = replay::parse_script(&text)
                .with_context(|| format!("parsing script {}", script.display()))?;

            let start = if relative {
                SystemClock.now()
            } else {
                Timestamp::EPOCH
            };

            let mut dao = Dao::new(&config, MemoryLedger::new())?;
            tracing::info!(
                steps = parsed.steps().len(),
                %start,
                lock = %format_duration(dao.params().staking_lock_time_secs),
                proposal_duration = %format_duration(dao.default_proposal_duration()),
                "replaying script"
            );
            let outcomes = replay::replay(&mut dao, &parsed, start);
            for outcome in &outcomes {
                if json {
                    println!("{}", serde_json::to_string(outcome)?);
                } else {
                    println!("{}", outcome.render());
                }
            }
            let failed = outcomes.iter().filter(|o| !o.ok).count();
            tracing::info!(
                total = outcomes.len(),
                failed,
                proposals = dao.proposal_count(),
                panicked = dao.is_panicked(),
                "replay finished"
            );
        }
    }
    Ok(())
}
