//! Column Definition Routes
//!
//! - GET /column_definitions - Canonical field names paired with source headers

use axum::{extract::State, response::IntoResponse, Json};
use std::sync::Arc;

use crate::api::dto::MessageResponse;
use crate::api::state::AppState;

/// GET /column_definitions
///
/// Returns `[[canonical, header], ...]` in schema order.
pub async fn get_column_definitions(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let definitions: Vec<(&'static str, String)> = state
        .engine
        .table()
        .column_definitions()
        .into_iter()
        .map(|(name, header)| (name, header.to_string()))
        .collect();

    Json(MessageResponse::new(definitions))
}
