//! Counsellor registry endpoints.
//!
//! Status changes are an admin capability; the acting profile comes in the
//! request body and its role is checked here.

use axum::extract::{Extension, Path, Query};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;

use crate::common::{CounsellorId, EngineError, ProfileId};
use crate::domains::counsellors::models::{Counsellor, CounsellorStatus, NewCounsellor};
use crate::domains::profiles::models::{Gender, Profile, Role};
use crate::server::app::AppState;
use crate::server::error::ApiResult;

pub async fn register_counsellor(
    Extension(state): Extension<AppState>,
    Json(new): Json<NewCounsellor>,
) -> ApiResult<(StatusCode, Json<Counsellor>)> {
    let counsellor = Counsellor::register(new, state.deps.db_pool()).await?;
    Ok((StatusCode::CREATED, Json(counsellor)))
}

pub async fn get_counsellor(
    Extension(state): Extension<AppState>,
    Path(id): Path<CounsellorId>,
) -> ApiResult<Json<Counsellor>> {
    let counsellor = Counsellor::find_by_id(id, state.deps.db_pool())
        .await?
        .ok_or(EngineError::NotFound("counsellor"))?;
    Ok(Json(counsellor))
}

#[derive(Deserialize)]
pub struct StatusChange {
    pub actor_id: ProfileId,
    pub status: CounsellorStatus,
}

pub async fn update_counsellor_status(
    Extension(state): Extension<AppState>,
    Path(id): Path<CounsellorId>,
    Json(change): Json<StatusChange>,
) -> ApiResult<Json<Counsellor>> {
    let pool = state.deps.db_pool();

    let actor = Profile::find_by_id(change.actor_id, pool)
        .await?
        .ok_or(EngineError::NotFound("profile"))?;
    let role: Role = actor.role.parse()?;
    if !role.can_manage_counsellors() {
        return Err(EngineError::Forbidden.into());
    }

    let counsellor = Counsellor::update_status(id, change.status, pool)
        .await?
        .ok_or(EngineError::NotFound("counsellor"))?;
    Ok(Json(counsellor))
}

#[derive(Deserialize)]
pub struct AvailabilityChange {
    pub is_available: bool,
}

pub async fn set_counsellor_availability(
    Extension(state): Extension<AppState>,
    Path(id): Path<CounsellorId>,
    Json(change): Json<AvailabilityChange>,
) -> ApiResult<Json<Counsellor>> {
    let counsellor = Counsellor::set_availability(id, change.is_available, state.deps.db_pool())
        .await?
        .ok_or(EngineError::NotFound("counsellor"))?;
    Ok(Json(counsellor))
}

#[derive(Deserialize)]
pub struct CandidateQuery {
    pub gender: Gender,
}

/// Read-only view of the candidate pool, best-first.
pub async fn list_candidates(
    Extension(state): Extension<AppState>,
    Query(query): Query<CandidateQuery>,
) -> ApiResult<Json<Vec<Counsellor>>> {
    let candidates = Counsellor::find_candidates(query.gender, state.deps.db_pool()).await?;
    Ok(Json(candidates))
}
