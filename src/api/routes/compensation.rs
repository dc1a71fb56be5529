//! Compensation Data Routes
//!
//! - GET /compensation_data - Filter, sort and project survey rows
//!
//! # Query Parameters
//!
//! - `<field>=<value>` - Equality
//! - `<field>[gte|lte|gt|lt|ne]=<value>` - Comparison
//! - `<field>[in|notin]=<a>,<b>,...` - Set membership
//! - `sort=<field>,...` - Stable ascending sort
//! - `fields=<field>,...` - Projection

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use std::sync::Arc;

use crate::api::dto::MessageResponse;
use crate::api::error::ApiResult;
use crate::api::state::AppState;

/// GET /compensation_data
///
/// Parameters arrive as ordered pairs so repeated keys and their positions
/// are visible to the query engine.
pub async fn get_compensation_data(
    State(state): State<Arc<AppState>>,
    Query(params): Query<Vec<(String, String)>>,
) -> ApiResult<Response> {
    let result = state.engine.execute_params(&params)?;

    tracing::debug!(params = params.len(), rows = result.len(), "Compensation query served");

    Ok((StatusCode::OK, Json(MessageResponse::new(result))).into_response())
}
