//! HTTP inspection endpoints for the validator registration cache.
//!
//! Every handler reads cached state only. In particular `GET /validators/{slot}`
//! peeks at the cache and never triggers a resync, so a request for an arbitrary
//! slot cannot push the sync epoch forward.

use alloy::primitives::Address;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use relay_compliance::ListMetadata;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::str::FromStr;
use std::sync::Arc;
use tracing::{debug, instrument};

use crate::error::RelayError;
use crate::remote_relay::RemoteRelay;
use crate::types::ValidatorData;

pub type AppState = Arc<RemoteRelay>;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(get_health))
        .route("/version", get(get_version))
        .route("/validators/{slot}", get(get_validator))
        .route("/compliance/lists", get(get_compliance_lists))
        .route("/compliance/check", post(post_compliance_check))
}

/// Cached registration as served over HTTP.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidatorView {
    pub slot: u64,
    pub pubkey: String,
    pub fee_recipient: String,
    pub gas_limit: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub compliance_list: Option<String>,
}

impl ValidatorView {
    fn new(slot: u64, data: ValidatorData) -> Self {
        Self {
            slot,
            pubkey: data.pubkey.to_string(),
            fee_recipient: data.fee_recipient.to_checksum(None),
            gas_limit: data.gas_limit,
            compliance_list: data.compliance_list,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ComplianceCheckRequest {
    pub list: String,
    pub addresses: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComplianceCheckResponse {
    pub compliant: bool,
}

/// `GET /health`: cache size and sync state.
#[instrument(skip_all)]
pub async fn get_health(State(relay): State<AppState>) -> impl IntoResponse {
    Json(json!({
        "status": "ok",
        "endpoint": relay.config().endpoint.as_str(),
        "validators": relay.validator_count(),
        "lastSyncedSlot": relay.last_synced_slot(),
        "syncing": relay.is_syncing(),
    }))
}

#[instrument(skip_all)]
pub async fn get_version() -> impl IntoResponse {
    Json(json!({
        "name": env!("CARGO_PKG_NAME"),
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

/// `GET /validators/{slot}`: the registration a block for `slot` must honor.
#[instrument(skip_all)]
pub async fn get_validator(State(relay): State<AppState>, Path(slot): Path<u64>) -> Response {
    match relay.peek_validator_for_slot(slot) {
        Ok(data) => (StatusCode::OK, Json(ValidatorView::new(slot, data))).into_response(),
        Err(e) => relay_error_response(e),
    }
}

/// `GET /compliance/lists`: metadata of every registered list, sorted by name.
#[instrument(skip_all)]
pub async fn get_compliance_lists(State(relay): State<AppState>) -> impl IntoResponse {
    let registry = relay.compliance_registry();
    let lists: Vec<ListMetadata> = registry
        .list_names()
        .iter()
        .filter_map(|name| registry.list_metadata(name))
        .collect();
    Json(lists)
}

/// `POST /compliance/check`: `true` when no address is on the named list.
#[instrument(skip_all)]
pub async fn post_compliance_check(
    State(relay): State<AppState>,
    Json(request): Json<ComplianceCheckRequest>,
) -> Response {
    debug!(list = %request.list, count = request.addresses.len(), "Compliance check");
    let mut addresses = Vec::with_capacity(request.addresses.len());
    for raw in &request.addresses {
        match Address::from_str(raw.trim()) {
            Ok(address) => addresses.push(address),
            Err(e) => {
                debug!(address = %raw, error = %e, "Rejecting compliance check");
                return (
                    StatusCode::BAD_REQUEST,
                    Json(json!({
                        "error": "Invalid address",
                        "address": raw,
                    })),
                )
                    .into_response();
            }
        }
    }

    let compliant = relay.compliance_registry().check_compliance(&request.list, &addresses);
    (StatusCode::OK, Json(ComplianceCheckResponse { compliant })).into_response()
}

fn relay_error_response(error: RelayError) -> Response {
    match error {
        RelayError::ValidatorNotFound => (
            StatusCode::NOT_FOUND,
            Json(json!({
                "error": "Validator not found",
            })),
        )
            .into_response(),
        e if e.is_transport_failure() => (
            StatusCode::BAD_GATEWAY,
            Json(json!({
                "error": "Relay unavailable",
                "details": e.to_string(),
            })),
        )
            .into_response(),
        e => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({
                "error": "Internal error",
                "details": e.to_string(),
            })),
        )
            .into_response(),
    }
}
