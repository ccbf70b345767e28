//! Status page server — public status pages, subscriber self-service,
//! and the operator dashboard.

use clap::Parser;
use statuspage_core::config::AppConfig;
use statuspage_store::StatusStore;
use statuspage_web::{web_router, WebState};
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::{error, info};

#[derive(Parser, Debug)]
#[command(name = "statuspage")]
#[command(about = "Status page web application")]
#[command(version)]
struct Cli {
    /// HTTP port (overrides config)
    #[arg(long, env = "STATUS_PAGE__SERVER__HTTP_PORT")]
    http_port: Option<u16>,

    /// Metrics exporter port (overrides config)
    #[arg(long, env = "STATUS_PAGE__METRICS__PORT")]
    metrics_port: Option<u16>,

    /// Site title shown on rendered pages (overrides config)
    #[arg(long, env = "STATUS_PAGE__SITE__TITLE")]
    site_title: Option<String>,

    /// Start with an empty store instead of demo data
    #[arg(long, default_value_t = false)]
    no_demo_data: bool,
}

fn metrics_addr(config: &AppConfig) -> anyhow::Result<SocketAddr> {
    Ok(SocketAddr::new(
        config.server.host.parse()?,
        config.metrics.port,
    ))
}

/// Bind the Prometheus exporter on its own port. Must run inside the
/// tokio runtime; `install` spawns the exporter task on it.
fn start_metrics(config: &AppConfig) -> anyhow::Result<()> {
    metrics_exporter_prometheus::PrometheusBuilder::new()
        .with_http_listener(metrics_addr(config)?)
        .install()?;

    info!(port = config.metrics.port, "Metrics exporter started");
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "statuspage=info,tower_http=info".into()),
        )
        .json()
        .init();

    let cli = Cli::parse();

    info!("Status page starting up");

    let mut config = AppConfig::load().unwrap_or_else(|e| {
        tracing::warn!(error = %e, "Failed to load config, using defaults");
        AppConfig::default()
    });

    if let Some(port) = cli.http_port {
        config.server.http_port = port;
    }
    if let Some(port) = cli.metrics_port {
        config.metrics.port = port;
    }
    if let Some(title) = cli.site_title {
        config.site.title = title;
    }

    info!(
        http_port = config.server.http_port,
        metrics_port = config.metrics.port,
        site_title = %config.site.title,
        "Configuration loaded"
    );

    if let Err(e) = start_metrics(&config) {
        error!(error = %e, "Failed to start metrics exporter");
    }

    let store = if cli.no_demo_data {
        Arc::new(StatusStore::empty())
    } else {
        Arc::new(StatusStore::new())
    };

    let state = WebState::new(store, config.site.clone());
    let app = web_router(state);

    let addr = SocketAddr::new(config.server.host.parse()?, config.server.http_port);
    info!(addr = %addr, "Starting HTTP server");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exporter_binds_its_own_port() {
        let config = AppConfig::default();
        let addr = metrics_addr(&config).unwrap();
        assert_eq!(addr.port(), config.metrics.port);
        assert_ne!(addr.port(), config.server.http_port);
    }

    #[tokio::test]
    async fn metrics_endpoint_serves_scrapes() {
        let mut config = AppConfig::default();
        // An ephemeral localhost port so the test can bind it.
        config.server.host = "127.0.0.1".to_string();
        config.metrics.port = 19391;
        start_metrics(&config).unwrap();

        metrics::counter!("web.test_scrapes").increment(1);

        // The exporter task needs a beat to start accepting connections.
        let addr = metrics_addr(&config).unwrap();
        let mut connected = false;
        for _ in 0..50 {
            if tokio::net::TcpStream::connect(addr).await.is_ok() {
                connected = true;
                break;
            }
            tokio::time::sleep(std::time::Duration::from_millis(20)).await;
        }
        assert!(connected, "exporter never bound {addr}");
    }
}
