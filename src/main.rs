//! run-console - run orchestration and status aggregation for parallel test runs
//!
//! Consumes the event stream produced by many concurrently executing workers
//! (one per spec-file attempt), tracks job lifecycle and retries, buffers
//! reporter output and prints the end-of-run summary.
//!
//! ## Usage
//!
//! ```bash
//! # Replay a recorded event stream
//! run-console replay events.jsonl --workers 4 --retries 2
//!
//! # Read events from a pipe, sharded run
//! launcher | run-console replay --shard 1/3
//!
//! # Write an example configuration
//! run-console config init
//! ```

use anyhow::{Context, Result};
use clap::Parser;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};
use tracing::{debug, info, warn};

mod cli;
mod config;
mod executor;
mod interface;
mod models;
mod output;
mod snapshot;
mod utils;

use cli::{Args, Command, ConfigAction, ReplayArgs};
use config::{EnvConfig, RunConfig, Shard};
use executor::{decode_record, forward_interrupts, Dispatcher, InterruptOutcome};
use interface::CliInterface;
use utils::{init_logger, LogLevel};

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let env = EnvConfig::load();

    let level = args
        .log_level
        .clone()
        .or_else(|| env.log_level.clone())
        .map(|s| s.parse::<LogLevel>().map_err(anyhow::Error::msg))
        .transpose()?
        .unwrap_or_default();
    init_logger(level);

    let config = load_config(args.config.as_deref(), &env)?;

    match args.command {
        Command::Replay(replay_args) => {
            let code = replay(config, replay_args).await?;
            if code != 0 {
                std::process::exit(code);
            }
        }
        Command::Config(config_args) => match config_args.action {
            ConfigAction::Init { path, force } => {
                if std::path::Path::new(&path).exists() && !force {
                    anyhow::bail!("{path} already exists (use --force to overwrite)");
                }
                example_config().save(&path)?;
                println!("Wrote example configuration to {path}");
            }
            ConfigAction::Show => {
                let yaml = serde_yaml::to_string(&config).context("Failed to serialize config")?;
                print!("{yaml}");
            }
            ConfigAction::Env => config::print_env_help(),
        },
    }

    Ok(())
}

/// Config file (explicit or discovered), then environment overrides
fn load_config(path: Option<&str>, env: &EnvConfig) -> Result<RunConfig> {
    let mut config = match path.or(env.config_file.as_deref()) {
        Some(path) => RunConfig::load(config::expand_path(path))?,
        None => config::load_default()?,
    };
    config.merge_env(env)?;
    Ok(config)
}

fn example_config() -> RunConfig {
    RunConfig::new(4)
        .with_retries(2)
        .with_retry_delay(5)
        .with_shard(Shard::new(1, 1))
}

async fn replay(mut config: RunConfig, args: ReplayArgs) -> Result<i32> {
    if let Some(workers) = args.workers {
        config.total_workers = workers;
    }
    if let Some(retries) = args.retries {
        config.spec_file_retries = retries;
    }
    if let Some(delay) = args.retries_delay {
        config.spec_file_retries_delay = delay;
    }
    if let Some(shard) = &args.shard {
        config.shard = Some(shard.parse()?);
    }
    if args.watch {
        config.watch = true;
    }
    if args.no_color {
        config.color = Some(false);
    }
    config.validate()?;

    let reader: Box<dyn AsyncBufRead + Unpin + Send> = match args.input.as_deref() {
        Some(path) if path != "-" => {
            let file = tokio::fs::File::open(path)
                .await
                .with_context(|| format!("Failed to open replay file: {path}"))?;
            Box::new(BufReader::new(file))
        }
        _ => Box::new(BufReader::new(tokio::io::stdin())),
    };

    let dispatcher = Dispatcher::spawn(CliInterface::stdout(config), args.capacity);

    let interrupts = dispatcher.sender();
    tokio::spawn(async move {
        match forward_interrupts(interrupts).await {
            Ok(InterruptOutcome::HardKill) => {
                warn!("Second interrupt received, hard killing the runner");
                std::process::exit(130);
            }
            Ok(InterruptOutcome::QueueClosed) => debug!("Interface stopped before the interrupt"),
            Err(e) => warn!("Signal handling unavailable: {}", e),
        }
    });

    let records = futures::stream::unfold(reader.lines(), |mut lines| async move {
        loop {
            match lines.next_line().await {
                Ok(Some(line)) => match decode_record(&line) {
                    Ok(Some(record)) => return Some((record, lines)),
                    Ok(None) => continue,
                    Err(e) => warn!("Skipping replay line: {:#}", e),
                },
                Ok(None) => return None,
                Err(e) => {
                    warn!("Failed to read replay input: {}", e);
                    return None;
                }
            }
        }
    });

    let sent = dispatcher.feed(records).await?;
    let (report, _) = dispatcher.finish().await?;
    info!(
        "Replayed {} records ({} rejected, {} interrupts)",
        sent, report.rejected, report.interrupts
    );

    Ok(report.exit_code())
}
