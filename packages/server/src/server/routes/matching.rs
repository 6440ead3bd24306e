//! Matching and assignment lifecycle endpoints.

use axum::extract::{Extension, Path};
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::common::{AssignmentId, ProfileId};
use crate::domains::assignments::actions::{
    cancel_assignment, complete_assignment, request_match,
};
use crate::domains::assignments::models::Assignment;
use crate::domains::conversations::models::Conversation;
use crate::domains::counsellors::models::Counsellor;
use crate::server::app::AppState;
use crate::server::error::ApiResult;

#[derive(Deserialize)]
pub struct MatchRequest {
    pub patient_id: ProfileId,
    /// Present when an admin drives the match on the patient's behalf.
    pub actor_id: Option<ProfileId>,
}

#[derive(Serialize)]
pub struct MatchResponse {
    pub assignment: Assignment,
    pub counsellor: Counsellor,
    pub conversation: Conversation,
}

pub async fn create_match(
    Extension(state): Extension<AppState>,
    Json(request): Json<MatchRequest>,
) -> ApiResult<(StatusCode, Json<MatchResponse>)> {
    let outcome = request_match(request.patient_id, request.actor_id, &state.deps).await?;
    Ok((
        StatusCode::CREATED,
        Json(MatchResponse {
            assignment: outcome.assignment,
            counsellor: outcome.counsellor,
            conversation: outcome.conversation,
        }),
    ))
}

pub async fn complete(
    Extension(state): Extension<AppState>,
    Path(id): Path<AssignmentId>,
) -> ApiResult<Json<Assignment>> {
    let assignment = complete_assignment(id, &state.deps).await?;
    Ok(Json(assignment))
}

pub async fn cancel(
    Extension(state): Extension<AppState>,
    Path(id): Path<AssignmentId>,
) -> ApiResult<Json<Assignment>> {
    let assignment = cancel_assignment(id, &state.deps).await?;
    Ok(Json(assignment))
}

/// Assignment history for a patient, newest first.
pub async fn patient_assignments(
    Extension(state): Extension<AppState>,
    Path(patient_id): Path<ProfileId>,
) -> ApiResult<Json<Vec<Assignment>>> {
    let assignments = Assignment::find_by_patient(patient_id, state.deps.db_pool()).await?;
    Ok(Json(assignments))
}
