use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Serialize;
use std::sync::Arc;
use std::time::Instant;
use uuid::Uuid;

use crate::prompt::StudyRequest;
use crate::server::error::{ApiError, ErrorResponse};
use crate::server::health;
use crate::service::{Outcome, StudyService};
use crate::session::SessionStatus;

#[derive(Clone)]
struct AppState {
    service: Arc<StudyService>,
}

/// Successful `/api/generate` body.
#[derive(Debug, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
enum GenerateResponse {
    Generated { text: String },
    EmptyResponse { warning: String },
}

pub fn build_router(service: Arc<StudyService>) -> Router {
    Router::new()
        .route("/health", get(health::handle))
        .route("/api/status", get(status))
        .route("/api/generate", post(generate))
        .with_state(AppState { service })
}

async fn status(State(state): State<AppState>) -> Json<SessionStatus> {
    Json(state.service.status(Instant::now()))
}

async fn generate(
    State(state): State<AppState>,
    payload: Result<Json<StudyRequest>, JsonRejection>,
) -> Response {
    let request_id = Uuid::new_v4().to_string();

    let request = match payload {
        Ok(Json(request)) => request,
        Err(rejection) => {
            let err = ApiError::InvalidRequest(rejection.body_text());
            tracing::info!(request_id = %request_id, error = %err, "Rejected malformed body");
            return ErrorResponse::from_error(&err, &request_id);
        }
    };

    tracing::info!(request_id = %request_id, mode = ?request.mode, "Generate requested");

    let err = match state.service.submit(&request, Instant::now()).await {
        Outcome::Generated(text) => return Json(GenerateResponse::Generated { text }).into_response(),
        outcome @ Outcome::EmptyResponse => {
            return Json(GenerateResponse::EmptyResponse {
                warning: outcome.message(),
            })
            .into_response()
        }
        Outcome::ValidationWarning(err) => ApiError::from(err),
        Outcome::CooldownWarning(rejection) => ApiError::from(rejection),
        Outcome::Error(failure) => ApiError::from(failure),
    };

    tracing::info!(
        request_id = %request_id,
        error_type = err.error_type(),
        status = err.status_code().as_u16(),
        "Generate finished with error"
    );
    ErrorResponse::from_error(&err, &request_id)
}
