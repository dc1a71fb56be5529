//! Compensation REST API
//!
//! HTTP API layer, built with Axum.
//!
//! # Endpoints
//!
//! ## Query
//! - `GET /compensation_data` - Filtered, sorted and projected survey rows
//! - `GET /column_definitions` - Canonical field names and source headers
//!
//! ## Health
//! - `GET /health/live` - Liveness probe
//! - `GET /health` - Full health status
//!
//! # Example
//!
//! ```rust,ignore
//! use compensation_api::api::{serve, AppState};
//! use compensation_api::config::ServerConfig;
//! use compensation_api::dataset::load_csv;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let table = load_csv("datasets/salary_survey.csv".as_ref())?;
//!     let config = ServerConfig::default();
//!
//!     serve(AppState::from_table(table), &config).await?;
//!     Ok(())
//! }
//! ```

pub mod dto;
pub mod error;
pub mod routes;
pub mod state;

pub use error::{ApiError, ApiResult};
pub use state::AppState;

use axum::{
    http::{HeaderValue, Method},
    routing::get,
    Router,
};
use std::sync::Arc;
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    trace::TraceLayer,
};

use crate::config::ServerConfig;

/// Build the API router with all routes and middleware
pub fn build_router(state: AppState, config: &ServerConfig) -> Router {
    let health_routes = Router::new()
        .route("/live", get(routes::health::liveness))
        .route("/", get(routes::health::full_health));

    let shared_state = Arc::new(state);

    Router::new()
        .route(
            "/compensation_data",
            get(routes::compensation::get_compensation_data),
        )
        .route(
            "/column_definitions",
            get(routes::columns::get_column_definitions),
        )
        .nest("/health", health_routes)
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer(&config.cors_origins))
        .with_state(shared_state)
}

/// Permissive when no origins are configured
fn cors_layer(origins: &[String]) -> CorsLayer {
    if origins.is_empty() {
        return CorsLayer::permissive();
    }

    let allowed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!("Ignoring invalid CORS origin: {}", origin);
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(allowed))
        .allow_methods([Method::GET])
}

/// Start the API server
pub async fn serve(state: AppState, config: &ServerConfig) -> Result<(), ApiError> {
    let router = build_router(state, config);

    let addr = config.addr();
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    tracing::info!("Compensation API listening on {}", addr);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| ApiError::Internal(format!("Server error: {}", e)))?;

    tracing::info!("Compensation API shut down gracefully");
    Ok(())
}

/// Wait for shutdown signal
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install signal handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received, starting graceful shutdown");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::fixtures::sample_table;
    use axum::{
        body::Body,
        http::{Request, StatusCode},
    };
    use serde_json::Value as JsonValue;
    use tower::util::ServiceExt;

    fn create_test_app() -> Router {
        build_router(
            AppState::from_table(sample_table()),
            &ServerConfig::default(),
        )
    }

    async fn get_json(uri: &str) -> (StatusCode, JsonValue) {
        let response = create_test_app()
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();

        let status = response.status();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&body).unwrap())
    }

    fn rows(body: &JsonValue) -> &Vec<JsonValue> {
        body["message"].as_array().unwrap()
    }

    #[tokio::test]
    async fn test_health_live() {
        let response = create_test_app()
            .oneshot(
                Request::builder()
                    .uri("/health/live")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_health_full() {
        let (status, body) = get_json("/health").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "healthy");
        assert_eq!(body["rows"], 4);
    }

    #[tokio::test]
    async fn test_all_rows_without_params() {
        let (status, body) = get_json("/compensation_data").await;

        assert_eq!(status, StatusCode::OK);
        let rows = rows(&body);
        assert_eq!(rows.len(), 4);
        assert_eq!(rows[0]["company_name"], "Acme");
        assert_eq!(rows[0].as_object().unwrap().len(), 27);
        assert_eq!(rows[0]["timestamp"], "2016-03-21T12:58:52");
    }

    #[tokio::test]
    async fn test_missing_values_render_empty() {
        let (_, body) = get_json("/compensation_data?company_name=Globex").await;

        let rows = rows(&body);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0]["bonus"], "");
        assert_eq!(rows[0]["salary"], 95000);
    }

    #[tokio::test]
    async fn test_filter_sort_and_fields() {
        let (status, body) = get_json(
            "/compensation_data?salary%5Bgte%5D=95000&country=USA&sort=salary&fields=company_name,salary",
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        let rows = rows(&body);
        let names: Vec<&str> = rows
            .iter()
            .map(|r| r["company_name"].as_str().unwrap())
            .collect();
        assert_eq!(names, vec!["Globex", "Acme", "Acme"]);
        assert_eq!(rows[0].as_object().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_membership_params() {
        let (_, body) =
            get_json("/compensation_data?city%5Bnotin%5D=Seattle,Austin&fields=city").await;

        assert_eq!(rows(&body), &vec![serde_json::json!({"city": "Toronto"})]);
    }

    #[tokio::test]
    async fn test_unsupported_key() {
        let (status, body) = get_json("/compensation_data?wage%5Bgt%5D=1").await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["message"], "Unsupported key wage");
    }

    #[tokio::test]
    async fn test_unsupported_column() {
        let (status, body) = get_json("/compensation_data?fields=salary,wage").await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["message"], "Unsupported column in fields");
    }

    #[tokio::test]
    async fn test_column_definitions() {
        let (status, body) = get_json("/column_definitions").await;

        assert_eq!(status, StatusCode::OK);
        let pairs = body["message"].as_array().unwrap();
        assert_eq!(pairs.len(), 27);
        assert_eq!(pairs[0], serde_json::json!(["timestamp", "Timestamp"]));
        assert_eq!(pairs[24], serde_json::json!(["gender", "Gender"]));
    }

    #[tokio::test]
    async fn test_column_definitions_round_trip() {
        let (_, body) = get_json("/column_definitions").await;
        let names: Vec<&str> = body["message"]
            .as_array()
            .unwrap()
            .iter()
            .map(|pair| pair[0].as_str().unwrap())
            .collect();

        let (status, body) =
            get_json(&format!("/compensation_data?fields={}", names.join(","))).await;

        assert_eq!(status, StatusCode::OK);
        let rows = rows(&body);
        assert_eq!(rows.len(), 4);
        assert_eq!(rows[0].as_object().unwrap().len(), 27);
    }
}
