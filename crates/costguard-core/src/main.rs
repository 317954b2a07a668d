//! CostGuard CLI
//!
//! Command-line interface for the CostGuard event handler.

use clap::{Parser, Subcommand};
use std::io::Read;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;
use tracing::info;

use costguard::alerting::EventHandler;
use costguard::api::HttpServer;
use costguard::models::ActivityEvent;
use costguard::Config;

/// CostGuard - cost-risk alerts for AWS account activity
#[derive(Parser)]
#[command(name = "costguard")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Configuration file path
    #[arg(short, long, global = true, env = "COSTGUARD_CONFIG")]
    config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Classify one event and print the decision without notifying
    Classify {
        /// Event JSON file (stdin if not specified)
        #[arg(short, long)]
        input: Option<PathBuf>,
    },

    /// Classify one event, notify on alert and print the status
    Handle {
        /// Event JSON file (stdin if not specified)
        #[arg(short, long)]
        input: Option<PathBuf>,
    },

    /// Accept events over HTTP
    Serve {
        /// Host to bind to
        #[arg(long, env = "COSTGUARD_HOST")]
        host: Option<String>,

        /// HTTP port
        #[arg(long, env = "COSTGUARD_PORT")]
        port: Option<u16>,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let config = match Config::load(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error loading configuration: {e}");
            return ExitCode::FAILURE;
        }
    };

    init_logging(&config, cli.verbose);

    let result = match cli.command {
        Commands::Classify { input } => run_classify(&config, input.as_deref()),
        Commands::Handle { input } => run_handle(&config, input.as_deref()).await,
        Commands::Serve { host, port } => run_serve(config, host, port).await,
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

fn init_logging(config: &Config, verbose: bool) {
    let log_level = if verbose {
        "debug"
    } else {
        config.logging.level.as_str()
    };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level));

    // Logs go to stderr so stdout carries only the JSON result
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);

    if config.logging.format == "json" {
        builder.json().init();
    } else {
        builder.init();
    }
}

fn read_event(input: Option<&Path>) -> anyhow::Result<ActivityEvent> {
    let raw = match input {
        Some(path) => std::fs::read_to_string(path)?,
        None => {
            let mut buf = String::new();
            std::io::stdin().read_to_string(&mut buf)?;
            buf
        }
    };

    Ok(ActivityEvent::from_json(&raw)?)
}

fn run_classify(config: &Config, input: Option<&Path>) -> anyhow::Result<()> {
    let event = read_event(input)?;
    let classifier = costguard::classifier::Classifier::new(config.classifier.clone());

    let decision = classifier.classify(&event);
    println!("{}", serde_json::to_string_pretty(&decision)?);

    Ok(())
}

async fn run_handle(config: &Config, input: Option<&Path>) -> anyhow::Result<()> {
    let event = read_event(input)?;
    let handler = EventHandler::from_config(config)?;

    let status = handler.handle(&event).await?;
    println!("{}", serde_json::to_string(&status)?);

    Ok(())
}

async fn run_serve(config: Config, host: Option<String>, port: Option<u16>) -> anyhow::Result<()> {
    let host = host.unwrap_or_else(|| config.server.host.clone());
    let port = port.unwrap_or(config.server.port);
    let addr = format!("{host}:{port}");

    info!(
        destination = %config.notifier.topic_arn,
        webhook = config.notifier.webhook_url.is_some(),
        "Starting CostGuard on {}",
        addr
    );

    let handler = Arc::new(EventHandler::from_config(&config)?);
    HttpServer::new(handler).serve(&addr).await?;

    Ok(())
}
