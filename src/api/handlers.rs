// src/api/handlers.rs

use crate::api::extract::{bad_request, ApiJson};
use crate::api::{types::*, ApiState};
use crate::infra::errors::RegistryError;
use crate::recorder::VisitRequest;
use crate::registry::SessionSnapshot;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde_json::{Map, Value};

fn registry_error(err: RegistryError) -> ApiError {
    let status = match err {
        RegistryError::NotFound { .. } => StatusCode::NOT_FOUND,
        RegistryError::Empty { .. } => StatusCode::CONFLICT,
    };
    (
        status,
        Json(ErrorResponse {
            error: err.to_string(),
        }),
    )
}

/// POST /api/register — Create or replace a session.
pub async fn register(
    State(state): State<ApiState>,
    ApiJson(body): ApiJson<RegisterRequest>,
) -> Result<Json<RegisterResponse>, ApiError> {
    if body.session_id.trim().is_empty() {
        return Err(bad_request("session_id cannot be empty"));
    }

    state
        .recorder
        .registry()
        .register(&body.session_id, body.session);

    Ok(Json(RegisterResponse {
        success: true,
        session_id: body.session_id,
    }))
}

/// POST /api/sessions/{id}/visits — Record one visit.
pub async fn record_visit(
    State(state): State<ApiState>,
    Path(id): Path<String>,
    ApiJson(body): ApiJson<VisitRequest>,
) -> Result<(StatusCode, Json<VisitRecordedResponse>), ApiError> {
    let visit_count = state
        .recorder
        .record(&id, body)
        .await
        .map_err(registry_error)?;

    Ok((StatusCode::CREATED, Json(VisitRecordedResponse { visit_count })))
}

/// POST /api/sessions/{id}/visits/latest/enrich — Attach metadata to the last visit.
pub async fn enrich_last_visit(
    State(state): State<ApiState>,
    Path(id): Path<String>,
    ApiJson(extra): ApiJson<Map<String, Value>>,
) -> Result<Json<SuccessResponse>, ApiError> {
    state.recorder.enrich(&id, extra).map_err(registry_error)?;
    Ok(Json(SuccessResponse { success: true }))
}

/// GET /api/sessions/{id} — Full session snapshot.
pub async fn get_session(
    State(state): State<ApiState>,
    Path(id): Path<String>,
) -> Result<Json<SessionSnapshot>, ApiError> {
    state
        .recorder
        .registry()
        .get(&id)
        .map(Json)
        .map_err(registry_error)
}

/// GET /api/admin/sessions — Summaries of every live session.
pub async fn list_sessions(State(state): State<ApiState>) -> Json<SessionListResponse> {
    let sessions = state.recorder.registry().list();
    Json(SessionListResponse {
        total_sessions: sessions.len(),
        sessions,
    })
}

/// GET / — Health check.
pub async fn health(State(state): State<ApiState>) -> Json<Value> {
    Json(serde_json::json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
        "sessions": state.recorder.registry().size(),
        "timestamp": chrono::Utc::now().to_rfc3339(),
        "endpoints": {
            "register": "POST /api/register",
            "record_visit": "POST /api/sessions/{id}/visits",
            "enrich": "POST /api/sessions/{id}/visits/latest/enrich",
            "stats": "GET /api/sessions/{id}",
            "admin": "GET /api/admin/sessions",
        },
    }))
}
