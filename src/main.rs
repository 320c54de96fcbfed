//! Validator relay inspection server.
//!
//! Keeps a [`RemoteRelay`] cache warm and exposes it over HTTP:
//! - `GET /health` – cache size and sync state
//! - `GET /validators/{slot}` – cached registration for a slot
//! - `GET /compliance/lists` – registered compliance lists
//! - `POST /compliance/check` – screen addresses against a named list
//!
//! Environment:
//! - `.env` values loaded at startup
//! - `RELAY_ENDPOINT` and the `RELAY_*` flags configure the relay connection
//! - `GENESIS_TIME` (and optionally `SECONDS_PER_SLOT`) enable the per-slot lookup ticker
//! - `HOST`, `PORT` control binding address

use axum::http::Method;
use axum::Router;
use dotenvy::dotenv;
use relay_compliance::{ComplianceListRegistry, Config as ComplianceConfig};
use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;
use std::time::{Duration, SystemTime, UNIX_EPOCH};
use tokio_util::sync::CancellationToken;
use tower_http::cors;

use validator_relay::from_env::{cancellations_from_env, RelayConfig, SlotClock};
use validator_relay::handlers;
use validator_relay::shutdown::Shutdown;
use validator_relay::telemetry::Telemetry;
use validator_relay::{HttpRelayTransport, RemoteRelay};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenv().ok();

    let telemetry = Telemetry::new()
        .with_name(env!("CARGO_PKG_NAME"))
        .with_version(env!("CARGO_PKG_VERSION"))
        .register();

    let relay_config = match RelayConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("Failed to read relay configuration: {}", e);
            std::process::exit(1);
        }
    };

    let compliance_config = ComplianceConfig::from_env()?;
    let compliance = match ComplianceListRegistry::from_config(&compliance_config) {
        Ok(registry) => Arc::new(registry),
        Err(e) => {
            tracing::error!("Failed to initialize compliance registry: {}", e);
            std::process::exit(1);
        }
    };

    let transport = Arc::new(HttpRelayTransport::new(relay_config.clone())?);
    tracing::info!(endpoint = %relay_config.endpoint, "Connecting to remote relay");
    let relay = RemoteRelay::builder(relay_config, transport)
        .with_compliance_registry(Arc::clone(&compliance))
        .with_cancellations(cancellations_from_env())
        .build()
        .await;
    let relay = Arc::new(relay);

    let shutdown = Shutdown::install()?;

    match SlotClock::from_env()? {
        Some(clock) => {
            tracing::info!(genesis_time = clock.genesis_time, seconds_per_slot = clock.seconds_per_slot, "Slot ticker enabled");
            shutdown.spawn(slot_ticker(Arc::clone(&relay), clock, shutdown.token()));
        }
        None => tracing::info!("GENESIS_TIME not set, validators resync only on startup"),
    }

    let http_endpoints = Router::new()
        .merge(handlers::routes().with_state(Arc::clone(&relay)))
        .layer(telemetry.http_tracing())
        .layer(
            cors::CorsLayer::new()
                .allow_origin(cors::Any)
                .allow_methods([Method::GET, Method::POST])
                .allow_headers(cors::Any),
        );

    let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
    let port = std::env::var("PORT")
        .ok()
        .and_then(|s| s.parse::<u16>().ok())
        .unwrap_or(8080);
    let host: IpAddr = host
        .parse()
        .map_err(|e| format!("HOST must be a valid IP address: {}", e))?;
    let addr = SocketAddr::new(host, port);
    tracing::info!("Starting server at http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await.unwrap_or_else(|e| {
        tracing::error!("Failed to bind to {}: {}", addr, e);
        std::process::exit(1);
    });

    let signal = shutdown.clone();
    axum::serve(listener, http_endpoints)
        .with_graceful_shutdown(async move { signal.requested().await })
        .await?;

    shutdown.drain().await;

    if let Some(path) = &compliance_config.snapshot_path {
        if let Err(e) = compliance.persist_to_file(path) {
            tracing::warn!(path = %path.display(), "Failed to persist compliance snapshot: {}", e);
        }
    }

    tracing::info!("Shutdown complete");
    Ok(())
}

/// Looks up the next slot's proposer once per slot, which is what keeps the
/// cache on the current epoch.
async fn slot_ticker(relay: Arc<RemoteRelay>, clock: SlotClock, token: CancellationToken) {
    let mut interval = tokio::time::interval(Duration::from_secs(clock.seconds_per_slot));
    interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
    loop {
        tokio::select! {
            _ = token.cancelled() => break,
            _ = interval.tick() => {}
        }

        let now = SystemTime::now().duration_since(UNIX_EPOCH).map(|d| d.as_secs()).unwrap_or_default();
        let next_slot = clock.slot_at(now) + 1;
        match relay.get_validator_for_slot(next_slot) {
            Ok(data) => tracing::debug!(slot = next_slot, pubkey = %data.pubkey, "Next proposer"),
            Err(e) => tracing::debug!(slot = next_slot, error = %e, "No registration for next slot"),
        }
    }
}
