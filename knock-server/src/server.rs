//! HTTP surface of the trial-log sink.
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | GET | `/health` | Liveness probe |
//! | POST | `/api/trialData` | Append one trial record |
//! | POST | `/reset-db` | Drop and recreate the trial table |
//! | GET | `/download-db` | Download the SQLite file |

use std::sync::Arc;

use axum::{
    extract::State,
    http::{header, StatusCode},
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use knock_core::TrialRecord;
use tower_http::cors::{Any, CorsLayer};
use tracing::{error, info};

use crate::store::TrialStore;

pub type AppState = Arc<TrialStore>;

pub fn create_router(store: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(handle_health))
        .route("/api/trialData", post(handle_trial_data))
        .route("/reset-db", post(handle_reset_db))
        .route("/download-db", get(handle_download_db))
        .layer(cors)
        .with_state(store)
}

fn error_response(msg: &str) -> (StatusCode, Json<serde_json::Value>) {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(serde_json::json!({ "error": msg })),
    )
}

async fn handle_health() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "OK" }))
}

async fn handle_trial_data(
    State(store): State<AppState>,
    Json(record): Json<TrialRecord>,
) -> Result<Json<serde_json::Value>, (StatusCode, Json<serde_json::Value>)> {
    match store.insert(&record) {
        Ok(id) => {
            info!(
                user = %record.user_id,
                trial = record.trial_number,
                stimulus = %record.stimulus,
                id,
                "trial record stored"
            );
            Ok(Json(serde_json::json!({ "success": true, "id": id })))
        }
        Err(e) => {
            error!(error = %e, "failed to insert trial record");
            Err(error_response("Internal server error"))
        }
    }
}

async fn handle_reset_db(
    State(store): State<AppState>,
) -> Result<Json<serde_json::Value>, (StatusCode, Json<serde_json::Value>)> {
    match store.reset() {
        Ok(()) => {
            info!("trial table reset");
            Ok(Json(serde_json::json!({ "success": true })))
        }
        Err(e) => {
            error!(error = %e, "failed to reset trial table");
            Err(error_response("Internal server error"))
        }
    }
}

async fn handle_download_db(State(store): State<AppState>) -> impl IntoResponse {
    match tokio::fs::read(store.path()).await {
        Ok(bytes) => (
            StatusCode::OK,
            [
                (header::CONTENT_TYPE, "application/octet-stream".to_string()),
                (
                    header::CONTENT_DISPOSITION,
                    "attachment; filename=\"trial_data.sqlite\"".to_string(),
                ),
            ],
            bytes,
        )
            .into_response(),
        Err(e) => {
            error!(error = %e, "failed to read database file");
            error_response("Could not read database file").into_response()
        }
    }
}
