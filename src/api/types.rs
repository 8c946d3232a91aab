// src/api/types.rs

use crate::registry::{NewSession, SessionSummary};
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};

/// Error half of every handler result.
pub type ApiError = (StatusCode, Json<ErrorResponse>);

/// Request body for registering a session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterRequest {
    pub session_id: String,
    #[serde(flatten)]
    pub session: NewSession,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct RegisterResponse {
    pub success: bool,
    pub session_id: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct VisitRecordedResponse {
    pub visit_count: usize,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SuccessResponse {
    pub success: bool,
}

/// Response for the admin session listing.
#[derive(Debug, Serialize, Deserialize)]
pub struct SessionListResponse {
    pub total_sessions: usize,
    pub sessions: Vec<SessionSummary>,
}

/// Error response body.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}
