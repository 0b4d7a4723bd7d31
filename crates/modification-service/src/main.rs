//! Modification Service Binary
//!
//! Operator CLI over the modification core: lists the configured services
//! or submits one request on behalf of a proxy chain.

use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tokio::io::AsyncReadExt;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use modification_core::{ModificationRequest, ProxyChain};
use modification_service::{JobCatalog, ModificationService, ServiceConfig, SubmissionError};

/// Run named modification services on behalf of proxied callers
#[derive(Parser, Debug)]
#[command(name = "modification-service")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Path to the service definition file
    #[arg(short, long, env = "MODIFICATION_CONFIG", default_value = "modification.json")]
    config: PathBuf,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, env = "MODIFICATION_LOG_LEVEL", default_value = "info")]
    log_level: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// List configured modification services
    #[command(alias = "ls")]
    List,

    /// Submit a request to a modification service
    Submit {
        /// Modification service name
        name: String,

        /// JSON request file, or '-' for stdin
        #[arg(short, long)]
        request: PathBuf,

        /// Proxied entities chain, e.g. "<cn=gateway><cn=alice>"
        #[arg(long)]
        entities: String,

        /// Proxied issuers chain, one issuer per entity
        #[arg(long)]
        issuers: String,
    },
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    let log_level = cli.log_level.parse().unwrap_or(Level::INFO);
    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_target(true)
        .with_thread_ids(true)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .context("Failed to set tracing subscriber")?;

    let config = ServiceConfig::from_file(&cli.config)
        .with_context(|| format!("Failed to load {}", cli.config.display()))?;
    let registry = config
        .build_registry(&JobCatalog::builtin())
        .context("Invalid modification configuration")?;
    let roles = config
        .build_role_store()
        .context("Failed to seed role store")?;

    info!(
        config = %cli.config.display(),
        configurations = registry.len(),
        "Starting modification service"
    );

    let service = ModificationService::new(registry, Arc::new(roles));

    match cli.command {
        Commands::List => {
            let listing = serde_json::to_string_pretty(&service.list_configurations())?;
            println!("{}", listing);
            Ok(ExitCode::SUCCESS)
        }
        Commands::Submit {
            name,
            request,
            entities,
            issuers,
        } => {
            let request = read_request(&request).await?;

            let outcome = match ProxyChain::from_headers(&entities, &issuers) {
                Ok(chain) => service.submit(&name, request, &chain).await,
                Err(e) => Err(SubmissionError::MalformedChain(e)),
            };

            match outcome {
                Ok(receipt) => {
                    println!("{}", serde_json::to_string_pretty(&receipt)?);
                    Ok(ExitCode::SUCCESS)
                }
                Err(e) => {
                    println!("{}", serde_json::to_string_pretty(&e.to_response())?);
                    Ok(ExitCode::FAILURE)
                }
            }
        }
    }
}

async fn read_request(path: &Path) -> Result<ModificationRequest> {
    let content = if path == Path::new("-") {
        let mut buf = String::new();
        tokio::io::stdin()
            .read_to_string(&mut buf)
            .await
            .context("Failed to read request from stdin")?;
        buf
    } else {
        tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read {}", path.display()))?
    };

    serde_json::from_str(&content).context("Request is not a valid modification request")
}
