//! frontier - deploy edge functions and find where they are attached

use anyhow::Result;
use clap::{Parser, ValueEnum};
use std::path::PathBuf;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};
use tracing_subscriber::EnvFilter;

use frontier_core::cdn::{ClientProvider, HttpClientProvider};

mod dist_cli;
mod function_cli;

/// Log levels
#[derive(Debug, Clone, ValueEnum)]
enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    fn to_filter_directive(&self) -> &'static str {
        match self {
            LogLevel::Error => "error",
            LogLevel::Warn => "warn",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
            LogLevel::Trace => "trace",
        }
    }
}

#[derive(Parser, Debug)]
#[clap(
    name = "frontier",
    about = "Deploy CDN edge functions and query their distribution associations",
    version
)]
struct Cli {
    #[clap(subcommand)]
    command: Command,

    /// Set log level
    #[clap(long, default_value = "info", global = true)]
    log_level: LogLevel,

    /// Emit structured JSON logs
    #[clap(long, global = true)]
    trace: bool,

    /// API configuration file (defaults to the user config directory)
    #[clap(long, global = true)]
    api_config: Option<PathBuf>,

    /// Override the CDN API endpoint
    #[clap(long, global = true)]
    endpoint: Option<String>,
}

#[derive(Parser, Debug)]
enum Command {
    /// Create or update the function described by the config file
    Deploy(function_cli::DeployArgs),

    /// Import remote function code and config into the local directory
    Import(function_cli::ImportArgs),

    /// Render the resolved function config
    Render(function_cli::RenderArgs),

    /// Manage distributions
    Dist {
        #[clap(subcommand)]
        command: dist_cli::DistCommand,
    },
}

fn initialize_tracing(log_level: &LogLevel, json: bool) {
    // RUST_LOG wins when set so individual modules can be turned up
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(log_level.to_filter_directive()));

    if json {
        // JSON output for structured logs - stderr, stdout carries command output
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .with_target(true)
            .with_file(true)
            .with_line_number(true)
            .with_writer(std::io::stderr)
            .init();
    } else {
        // Standard text output - also stderr so `dist list` stays pipeable
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .with_writer(std::io::stderr)
            .init();
    }
}

/// Token cancelled on the first Ctrl-C
fn cancel_on_ctrl_c() -> CancellationToken {
    let cancel = CancellationToken::new();
    let trigger = cancel.clone();
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {
                warn!("Interrupted, cancelling");
                trigger.cancel();
            }
            // No signal handler means no cancellation, not a failed command
            Err(e) => debug!("Unable to listen for Ctrl-C: {}", e),
        }
    });
    cancel
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    initialize_tracing(&cli.log_level, cli.trace);

    let cancel = cancel_on_ctrl_c();

    // Config is resolved lazily; `render` never touches the API
    let provider: Arc<dyn ClientProvider> =
        Arc::new(HttpClientProvider::new(cli.api_config, cli.endpoint));

    match cli.command {
        Command::Deploy(args) => function_cli::deploy(&cancel, provider, args).await,
        Command::Import(args) => function_cli::import(&cancel, provider, args).await,
        Command::Render(args) => function_cli::render(args),
        Command::Dist { command } => command.execute(&cancel, provider).await,
    }
}
