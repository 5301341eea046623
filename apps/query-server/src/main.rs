//! REST server answering paginated task variable queries.
//!
//! Wires the in-memory variable store, the security gate, and the HTTP
//! router together from command-line configuration.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use task_query_api::{router::Router, server::Server};
use task_query_core::{
    InMemoryVariableStore, PermitAll, QueryConfig, ResponseFormat, SecurityGate,
    TaskLookupRestriction, VariableQueryService,
};
use tokio::signal;
use tracing_subscriber::EnvFilter;

/// Command-line arguments for the query server.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Port to listen on
    #[arg(short, long, default_value_t = 8080)]
    port: u16,

    /// Host address to bind to
    #[arg(long, default_value = "127.0.0.1")]
    host: String,

    /// Page size used when a request names none
    #[arg(long, default_value_t = 20)]
    default_page_size: u32,

    /// Largest page size a request may ask for
    #[arg(long, default_value_t = 1000)]
    max_page_size: u32,

    /// Format for `*/*` or missing Accept headers (flat or linked)
    #[arg(long, default_value = "linked")]
    default_format: ResponseFormat,

    /// Public base URL used in HAL links (defaults to http://{Host})
    #[arg(long)]
    base_url: Option<String>,

    /// Request timeout in milliseconds
    #[arg(long, default_value_t = 5000)]
    request_timeout_ms: u64,

    /// JSON array of variable records to serve
    #[arg(long)]
    seed: Option<PathBuf>,

    /// JSON object of task access lists; enables task lookup restriction
    #[arg(long)]
    access: Option<PathBuf>,

    /// Roles that may read variables of every task
    #[arg(long = "admin-role", default_value = "ACTIVITI_ADMIN")]
    admin_roles: Vec<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Parse command-line arguments
    let args = Args::parse();

    // Initialize tracing subscriber for logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = Arc::new(QueryConfig {
        default_page_size: args.default_page_size,
        max_page_size: args.max_page_size,
        default_format: args.default_format,
        public_base_url: args.base_url.clone(),
        request_timeout_ms: args.request_timeout_ms,
        admin_roles: args.admin_roles.clone(),
    });

    let store = match &args.seed {
        Some(path) => InMemoryVariableStore::load_json_file(path)
            .with_context(|| format!("Failed to load seed data from {}", path.display()))?,
        None => {
            tracing::warn!("No --seed file given; serving an empty variable store");
            InMemoryVariableStore::new()
        }
    };

    let gate: Arc<dyn SecurityGate> = match &args.access {
        Some(path) => Arc::new(
            TaskLookupRestriction::load_json_file(path, config.admin_roles.clone())
                .with_context(|| format!("Failed to load access lists from {}", path.display()))?,
        ),
        None => {
            tracing::warn!("No --access file given; every caller may read every task");
            Arc::new(PermitAll)
        }
    };

    let service = VariableQueryService::new(Arc::new(store), gate, config.clone());
    let router = Router::new(service, config.clone());

    // Create server
    let addr: SocketAddr = format!("{}:{}", args.host, args.port)
        .parse()
        .context("Invalid host or port")?;
    let server = Server::new(addr, router);

    tracing::info!(
        host = %args.host,
        port = args.port,
        default_page_size = config.default_page_size,
        max_page_size = config.max_page_size,
        default_format = config.default_format.media_type(),
        request_timeout_ms = config.request_timeout_ms,
        "Starting task variable query server"
    );

    // Start server with graceful shutdown
    let server_handle = tokio::spawn(async move {
        if let Err(e) = server.serve().await {
            tracing::error!("Server error: {}", e);
        }
    });

    // Wait for Ctrl+C
    signal::ctrl_c()
        .await
        .context("Failed to listen for ctrl_c")?;
    tracing::info!("Shutting down server...");
    server_handle.abort();

    Ok(())
}
