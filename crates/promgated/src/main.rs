//! promgated — the PromGate monitoring API daemon.
//!
//! Single binary that runs the bootstrap sequence once — endpoint discovery,
//! degraded-mode fallback, diagnostic health probe — and then serves the
//! metrics API until shutdown.
//!
//! # Usage
//!
//! ```text
//! promgated [--port 8080]
//! ```
//!
//! Configuration comes from the environment (`PORT`, `ENVIRONMENT`,
//! `PROMETHEUS_URL`, `PROMETHEUS_NAMESPACE`, `PROMETHEUS_SERVICE`,
//! `PROMETHEUS_REQUIRE_DISCOVERY`); the `--port` flag overrides `PORT`.

use std::net::SocketAddr;

use clap::Parser;
use tracing::info;

#[derive(Parser)]
#[command(name = "promgated", about = "PromGate monitoring API daemon")]
struct Cli {
    /// Port to listen on; overrides the PORT environment variable.
    #[arg(long)]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,promgated=debug".parse().unwrap()),
        )
        .init();

    let cli = Cli::parse();

    info!("PromGate monitoring API starting");

    // ── Bootstrap ──────────────────────────────────────────────

    // Runs exactly once, before any request serving: discovery, fallback
    // policy, diagnostic health probe.
    let mut config = promgate_config::load().await?;
    if let Some(port) = cli.port {
        config.port = port;
    }

    // The one fatal failure in this core: a client that cannot be built
    // from the settled configuration.
    let prometheus = promgate_query::PrometheusClient::new(&config.prometheus_url)?;
    prometheus.readiness_check().await;

    // ── API server ─────────────────────────────────────────────

    let router = promgate_api::build_router(prometheus);
    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));

    info!(
        %addr,
        prometheus = %config.prometheus_url,
        environment = %config.environment,
        "API server starting"
    );
    info!(
        "endpoints: /api/health, /api/metrics/query, /api/metrics/query_range, \
         /api/metrics/{{cpu,memory,disk,pods,nodes,targets}}, /api/metrics/container/{{cpu,memory}}"
    );

    let listener = tokio::net::TcpListener::bind(addr).await?;

    axum::serve(listener, router)
        .with_graceful_shutdown(async {
            tokio::signal::ctrl_c()
                .await
                .expect("failed to install CTRL+C handler");
            info!("shutdown signal received");
        })
        .await?;

    info!("promgated stopped");
    Ok(())
}
