//! Health probe handlers

use hyper::StatusCode;

use crate::config::AppState;
use crate::http::{build_json_response, build_message_response, HttpResponse};
use crate::logger;

/// Liveness: the process is serving requests
pub fn liveness() -> HttpResponse {
    build_json_response(StatusCode::OK, &serde_json::json!({ "status": "ok" }))
}

/// Readiness: the record store answers queries
pub async fn readiness(state: &AppState) -> HttpResponse {
    match state.store.run(|store| store.count()).await {
        Ok(movies) => build_json_response(
            StatusCode::OK,
            &serde_json::json!({
                "status": "ok",
                "movies": movies,
                "uptime_secs": state.uptime_secs(),
            }),
        ),
        Err(e) => {
            logger::log_error(&format!("Readiness check failed: {e}"));
            build_message_response(StatusCode::SERVICE_UNAVAILABLE, &e.to_string())
        }
    }
}
