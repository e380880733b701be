//! pagewalk server.
//!
//! # Architecture Overview
//!
//! ```text
//!                   ┌──────────────────────────────────────────────────────┐
//!  Client Request   │  ┌─────────┐   ┌──────────┐   ┌─────────────────┐    │
//!  ─────────────────┼─▶│  http   │──▶│ routing  │──▶│    dispatch     │    │
//!                   │  │ server  │   │  walker  │   │ inject / bind   │    │
//!                   │  └─────────┘   └──────────┘   └────────┬────────┘    │
//!                   │                                        ▼             │
//!  Client Response  │  ┌─────────┐                  ┌─────────────────┐    │
//!  ◀────────────────┼──│response │◀─────────────────│  page handler   │    │
//!                   │  └─────────┘                  │ index / action  │    │
//!                   │                               └─────────────────┘    │
//!                   │  config · observability · lifecycle                  │
//!                   └──────────────────────────────────────────────────────┘
//! ```

use std::path::PathBuf;

use clap::Parser;
use tokio::net::TcpListener;

use pagewalk::config::{load_config, validate_config, ConfigError, ServerConfig};
use pagewalk::observability::init_logging;
use pagewalk::{site, HttpServer, Shutdown};

#[derive(Parser)]
#[command(name = "pagewalk")]
#[command(about = "Serve a tree of pages without a routing table", long_about = None)]
struct Cli {
    /// TOML configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override `listener.bind_address`.
    #[arg(short, long)]
    bind: Option<String>,

    /// Override `observability.log_level`.
    #[arg(long)]
    log_level: Option<String>,
}

impl Cli {
    fn server_config(&self) -> Result<ServerConfig, ConfigError> {
        let mut config = match &self.config {
            Some(path) => load_config(path)?,
            None => ServerConfig::default(),
        };

        if let Some(bind) = &self.bind {
            config.listener.bind_address = bind.clone();
        }
        if let Some(level) = &self.log_level {
            config.observability.log_level = level.clone();
        }

        validate_config(&config).map_err(ConfigError::Validation)?;
        Ok(config)
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let config = cli.server_config()?;

    init_logging(&config.observability)?;

    tracing::info!(version = env!("CARGO_PKG_VERSION"), "pagewalk starting");
    tracing::info!(
        bind_address = %config.listener.bind_address,
        request_timeout_secs = config.timeouts.request_secs,
        max_body_size = config.limits.max_body_size,
        "Configuration loaded"
    );

    let tree = site::tree()?;

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    let shutdown = Shutdown::new();
    let receiver = shutdown.subscribe();
    let ctrl_c = shutdown.clone();
    tokio::spawn(async move {
        if let Err(e) = ctrl_c.trigger_on_ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl-C");
        }
    });

    let server = HttpServer::new(config, tree);
    server.run(listener, receiver).await?;
    drop(shutdown);

    Ok(())
}
