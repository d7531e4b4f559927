//! API handlers for the HTTP REST API

use axum::{
    extract::{RawQuery, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, warn};

use crate::error::Error;
use crate::models::{ReadableQueryParams, WritableQueryParams};
use crate::query::{self, OrganizationFeatures, RawQueryParams};

/// Query key carrying extra feature flags for a single request
pub const FEATURES_KEY: &str = "features";

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    /// Features enabled for the organization this instance serves
    pub features: Arc<OrganizationFeatures>,
}

impl AppState {
    /// Create state for the given feature set
    pub fn new(features: OrganizationFeatures) -> Self {
        Self {
            features: Arc::new(features),
        }
    }

    fn features_for(&self, raw: &RawQueryParams) -> OrganizationFeatures {
        let mut features = (*self.features).clone();
        features.extend(raw.get_all(FEATURES_KEY));
        features
    }
}

/// Health check response
#[derive(Serialize)]
pub struct HealthResponse {
    /// Always `ok`
    pub status: String,
    /// Crate version
    pub version: String,
}

/// Health check endpoint
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// Decode the explore view params from the request's own query string
pub async fn resolve_params(
    State(state): State<AppState>,
    RawQuery(raw_query): RawQuery,
) -> Result<Json<ReadableQueryParams>, (StatusCode, String)> {
    let raw = RawQueryParams::parse(raw_query.as_deref().unwrap_or_default());
    let features = state.features_for(&raw);

    let params = query::decode(&raw, &features).map_err(into_response_error)?;
    debug!(mode = params.mode.as_str(), fields = params.fields.len(), "Resolved explore params");

    Ok(Json(params))
}

/// Params the view shows when the URL carries none
pub async fn default_params(
    State(state): State<AppState>,
) -> Result<Json<ReadableQueryParams>, (StatusCode, String)> {
    let params = query::decode(&RawQueryParams::new(), &state.features)
        .map_err(into_response_error)?;
    Ok(Json(params))
}

/// Encoded query string response
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryStringResponse {
    /// URL-encoded query string
    pub query_string: String,
}

/// Encode full view params into a query string
pub async fn encode_params(
    Json(params): Json<ReadableQueryParams>,
) -> Json<QueryStringResponse> {
    Json(QueryStringResponse {
        query_string: query::encode(&params).to_query_string(),
    })
}

/// Partial update request
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateParamsRequest {
    /// Current query string
    #[serde(default)]
    pub query_string: String,
    /// Changes to apply
    pub update: WritableQueryParams,
}

/// Partial update response
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateParamsResponse {
    /// Updated query string
    pub query_string: String,
    /// Params decoded from the updated query string
    pub params: ReadableQueryParams,
}

/// Apply a partial update to a query string and decode the result
pub async fn update_params(
    State(state): State<AppState>,
    Json(req): Json<UpdateParamsRequest>,
) -> Result<Json<UpdateParamsResponse>, (StatusCode, String)> {
    let raw = RawQueryParams::parse(&req.query_string);
    let next = query::apply(&raw, &req.update);
    let params = query::decode(&next, &state.features_for(&next)).map_err(into_response_error)?;

    Ok(Json(UpdateParamsResponse {
        query_string: next.to_query_string(),
        params,
    }))
}

fn into_response_error(err: Error) -> (StatusCode, String) {
    if err.is_client_error() {
        warn!(error = %err, "Rejected explore params");
        (StatusCode::BAD_REQUEST, err.to_string())
    } else {
        (StatusCode::INTERNAL_SERVER_ERROR, err.to_string())
    }
}
