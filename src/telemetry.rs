//! Tracing setup for the inspection server.
//!
//! Log verbosity comes from `RUST_LOG` (default `info`). Setting `LOG_FORMAT=json`
//! switches the formatter to one JSON object per line.

use axum::body::Body;
use axum::http::Request;
use tower_http::classify::{ServerErrorsAsFailures, SharedClassifier};
use tower_http::trace::{DefaultOnResponse, TraceLayer};
use tracing::{Level, Span};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

const DEFAULT_FILTER: &str = "info";

#[derive(Debug, Default)]
pub struct Telemetry {
    name: Option<&'static str>,
    version: Option<&'static str>,
}

/// Handle returned by [`Telemetry::register`].
#[derive(Debug, Clone, Copy)]
pub struct TelemetryProviders {
    name: &'static str,
}

impl Telemetry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_name(mut self, name: &'static str) -> Self {
        self.name = Some(name);
        self
    }

    pub fn with_version(mut self, version: &'static str) -> Self {
        self.version = Some(version);
        self
    }

    /// Installs the global subscriber. Safe to call more than once; later calls
    /// leave the first subscriber in place.
    pub fn register(self) -> TelemetryProviders {
        let name = self.name.unwrap_or(env!("CARGO_PKG_NAME"));
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));
        let json = std::env::var("LOG_FORMAT").is_ok_and(|v| v.eq_ignore_ascii_case("json"));

        let registry = tracing_subscriber::registry().with(filter);
        let result = if json {
            registry.with(fmt::layer().json().with_target(true)).try_init()
        } else {
            registry.with(fmt::layer().with_target(true)).try_init()
        };

        match result {
            Ok(()) => tracing::info!(
                service = name,
                version = self.version.unwrap_or("unknown"),
                "Telemetry initialized"
            ),
            Err(e) => tracing::debug!(error = %e, "Tracing subscriber already installed"),
        }

        TelemetryProviders { name }
    }
}

impl TelemetryProviders {
    /// Request tracing layer: one span per request, response logged at INFO.
    pub fn http_tracing(
        &self,
    ) -> TraceLayer<SharedClassifier<ServerErrorsAsFailures>, impl Fn(&Request<Body>) -> Span + Clone> {
        let service = self.name;
        TraceLayer::new_for_http()
            .make_span_with(move |request: &Request<Body>| {
                tracing::info_span!(
                    "http_request",
                    service,
                    method = %request.method(),
                    uri = %request.uri(),
                )
            })
            .on_response(DefaultOnResponse::new().level(Level::INFO))
    }
}
