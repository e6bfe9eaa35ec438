use std::{net::SocketAddr, sync::Arc};

use anyhow::{Context, Result};
use clap::Args;
use tokio::net::TcpListener;
use tracing::{info, warn};

use super::exchange_timeout;
use crate::{
    aws::sts::{AwsStsConnector, TokenExchange},
    config::ConfigSource,
    constants::{DEFAULT_BIND_ADDR, SESSION_TOKEN_ROUTE},
    http,
};

#[derive(Debug, Clone, Default, Args)]
pub struct ServeCommand {
    #[arg(short = 'b', long, value_name = "ADDR", help = "Address to listen on [default: 127.0.0.1:8080]")]
    pub bind: Option<SocketAddr>,

    #[arg(short = 't', long, value_name = "SECONDS", help = "Timeout for each STS exchange [default: 30]")]
    pub timeout_secs: Option<u64>,
}

impl ServeCommand {
    pub async fn execute(self, source: ConfigSource) -> Result<()> {
        let bind = self.bind.unwrap_or(DEFAULT_BIND_ADDR);
        let exchange = TokenExchange::new(AwsStsConnector::default(), source)
            .with_timeout(exchange_timeout(self.timeout_secs));
        info!("STS exchange timeout: {:?}", exchange.timeout());

        let app = http::router(Arc::new(exchange));

        let listener = TcpListener::bind(bind)
            .await
            .with_context(|| format!("Failed to bind {bind}"))?;
        info!(
            "Serving {} on http://{}",
            SESSION_TOKEN_ROUTE,
            listener.local_addr()?
        );

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await
            .context("HTTP server terminated unexpectedly")?;

        info!("Server stopped");
        Ok(())
    }
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("Received Ctrl-C, shutting down"),
        Err(e) => {
            warn!("Failed to listen for Ctrl-C: {}", e);
            std::future::pending::<()>().await;
        }
    }
}
