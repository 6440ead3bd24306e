//! HTTP mapping for the engine error taxonomy.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use tracing::error;

use crate::common::{EngineError, MissingField};

/// Wire shape for every error response.
#[derive(Serialize)]
pub struct ErrorBody {
    pub error: String,
    pub code: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub missing: Option<Vec<MissingField>>,
}

pub struct ApiError(pub EngineError);

impl From<EngineError> for ApiError {
    fn from(err: EngineError) -> Self {
        Self(err)
    }
}

impl From<anyhow::Error> for ApiError {
    fn from(err: anyhow::Error) -> Self {
        Self(EngineError::Internal(err))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code, missing) = match &self.0 {
            EngineError::Ineligible { missing } => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "ineligible",
                Some(missing.clone()),
            ),
            EngineError::NoCandidate => (StatusCode::SERVICE_UNAVAILABLE, "no_candidate", None),
            EngineError::AlreadyAssigned => (StatusCode::CONFLICT, "already_assigned", None),
            EngineError::CapacityExceeded => (StatusCode::CONFLICT, "capacity_exceeded", None),
            EngineError::AssignmentNotActive => {
                (StatusCode::CONFLICT, "assignment_not_active", None)
            }
            EngineError::ConversationClosed => (StatusCode::CONFLICT, "conversation_closed", None),
            EngineError::NotAParticipant(_) => (StatusCode::FORBIDDEN, "not_a_participant", None),
            EngineError::Forbidden => (StatusCode::FORBIDDEN, "forbidden", None),
            EngineError::NotFound(_) => (StatusCode::NOT_FOUND, "not_found", None),
            EngineError::InvalidInput(_) => {
                (StatusCode::UNPROCESSABLE_ENTITY, "invalid_input", None)
            }
            EngineError::Database(e) => {
                error!(error = %e, "Database error in request handler");
                (StatusCode::INTERNAL_SERVER_ERROR, "internal", None)
            }
            EngineError::Internal(e) => {
                error!(error = %e, "Internal error in request handler");
                (StatusCode::INTERNAL_SERVER_ERROR, "internal", None)
            }
        };

        let body = ErrorBody {
            error: self.0.to_string(),
            code,
            missing,
        };
        (status, Json(body)).into_response()
    }
}

pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_conflict_statuses() {
        for err in [
            EngineError::AlreadyAssigned,
            EngineError::CapacityExceeded,
            EngineError::AssignmentNotActive,
            EngineError::ConversationClosed,
        ] {
            let response = ApiError(err).into_response();
            assert_eq!(response.status(), StatusCode::CONFLICT);
        }
    }

    #[test]
    fn test_no_candidate_is_service_unavailable() {
        let response = ApiError(EngineError::NoCandidate).into_response();
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    }
}
