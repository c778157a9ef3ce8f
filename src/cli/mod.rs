//! CLI argument parsing
//!
//! Defines command-line interface using clap.

use clap::{Parser, Subcommand};

use crate::executor::DEFAULT_CAPACITY;

/// Run orchestration console for parallel spec-file execution
#[derive(Parser, Debug)]
#[command(name = "run-console")]
#[command(version)]
#[command(about = "Track worker jobs, retries and reporter output for a parallel test run")]
#[command(long_about = None)]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    /// Configuration file (YAML or JSON)
    #[arg(short, long, global = true)]
    pub config: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Replay a recorded event stream through the interface
    Replay(ReplayArgs),

    /// Manage configuration
    Config(ConfigArgs),
}

/// Arguments for the replay command
#[derive(Parser, Debug)]
pub struct ReplayArgs {
    /// Newline-delimited JSON records; reads stdin when omitted or `-`
    pub input: Option<String>,

    /// Number of workers the run starts with
    #[arg(short, long)]
    pub workers: Option<u32>,

    /// Spec file retry budget
    #[arg(short, long)]
    pub retries: Option<u32>,

    /// Delay between retries in seconds (display only)
    #[arg(long)]
    pub retries_delay: Option<u64>,

    /// Shard handled by this host, as current/total
    #[arg(long)]
    pub shard: Option<String>,

    /// Continuous run mode
    #[arg(long)]
    pub watch: bool,

    /// Disable colours
    #[arg(long)]
    pub no_color: bool,

    /// Queue depth between the reader and the interface
    #[arg(long, default_value_t = DEFAULT_CAPACITY)]
    pub capacity: usize,
}

/// Arguments for config management
#[derive(Parser, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub action: ConfigAction,
}

#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Write an example configuration file
    Init {
        /// Output path
        #[arg(default_value = "run-console.yaml")]
        path: String,

        /// Overwrite an existing file
        #[arg(short, long)]
        force: bool,
    },

    /// Print the effective configuration
    Show,

    /// List supported environment variables
    Env,
}
