//! svcwarden CLI - Supervise a single OS service
//!
//! A command-line host for the supervision core: start and stop the
//! configured service, kill process trees, answer busy polls, edit host
//! settings, and run as a long-lived host that reacts to settings changes.

mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "svcwarden")]
#[command(author, version, about = "Supervise a single OS service")]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Configuration file (default: ~/.svcwarden/config.json)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Output in JSON format
    #[arg(long, global = true)]
    json: bool,

    /// Log filter, e.g. "info" or "svcwarden_core=debug"
    #[arg(long, global = true, default_value = "info")]
    log_level: String,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the service and wait until it runs
    Start {
        /// Seconds to wait (overrides startTimeoutSecs)
        #[arg(short, long)]
        timeout: Option<u64>,
    },

    /// Stop the service and wait until it stops
    Stop {
        /// Seconds to wait (overrides stopTimeoutSecs)
        #[arg(short, long)]
        timeout: Option<u64>,

        /// Kill the service's process tree if it does not stop in time
        #[arg(long, conflicts_with = "no_terminate")]
        terminate: bool,

        /// Never kill the process tree, even if terminateOnTimeout is set
        #[arg(long)]
        no_terminate: bool,
    },

    /// Show the service state and process id
    Status,

    /// Kill a process and everything it spawned
    KillTree {
        /// Root process id
        pid: u32,
    },

    /// Report whether this instance is busy
    Busy,

    /// Manage host settings
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },

    /// Run as host: boot, watch settings, answer busy polls, stop on Ctrl-C
    Run {
        /// Milliseconds between configuration file checks
        #[arg(long, default_value = "2000")]
        watch_interval_ms: u64,

        /// Milliseconds between busy polls
        #[arg(long, default_value = "5000")]
        busy_interval_ms: u64,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Show the current configuration
    Show,
    /// Set a host setting
    Set { key: String, value: String },
    /// Remove a host setting
    #[command(alias = "rm")]
    Unset { key: String },
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = EnvFilter::try_new(&cli.log_level).unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .init();

    let store = commands::store(cli.config)?;

    match cli.command {
        Commands::Start { timeout } => commands::lifecycle::start(&store, timeout, cli.json).await?,
        Commands::Stop {
            timeout,
            terminate,
            no_terminate,
        } => {
            let terminate = match (terminate, no_terminate) {
                (true, _) => Some(true),
                (_, true) => Some(false),
                _ => None,
            };
            commands::lifecycle::stop(&store, timeout, terminate, cli.json).await?
        }
        Commands::Status => commands::lifecycle::status(&store, cli.json).await?,
        Commands::KillTree { pid } => commands::kill_tree::run(pid, cli.json).await?,
        Commands::Busy => commands::busy::run(&store, cli.json).await?,
        Commands::Config { action } => match action {
            ConfigAction::Show => commands::config::show(&store, cli.json).await?,
            ConfigAction::Set { key, value } => commands::config::set(&store, &key, &value).await?,
            ConfigAction::Unset { key } => commands::config::unset(&store, &key).await?,
        },
        Commands::Run {
            watch_interval_ms,
            busy_interval_ms,
        } => commands::run::run(store, watch_interval_ms, busy_interval_ms).await?,
    }

    Ok(())
}
