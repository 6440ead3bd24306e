//! Profile store endpoints.

use axum::extract::{Extension, Path};
use axum::http::StatusCode;
use axum::Json;

use crate::common::{EngineError, ProfileId};
use crate::domains::profiles::eligibility::{check_eligibility, EligibilityReport};
use crate::domains::profiles::models::{NewProfile, Profile, ProfilePatch};
use crate::server::app::AppState;
use crate::server::error::ApiResult;

pub async fn create_profile(
    Extension(state): Extension<AppState>,
    Json(new): Json<NewProfile>,
) -> ApiResult<(StatusCode, Json<Profile>)> {
    let profile = Profile::create(new, state.deps.db_pool()).await?;
    Ok((StatusCode::CREATED, Json(profile)))
}

pub async fn get_profile(
    Extension(state): Extension<AppState>,
    Path(id): Path<ProfileId>,
) -> ApiResult<Json<Profile>> {
    let profile = Profile::find_by_id(id, state.deps.db_pool())
        .await?
        .ok_or(EngineError::NotFound("profile"))?;
    Ok(Json(profile))
}

pub async fn update_profile(
    Extension(state): Extension<AppState>,
    Path(id): Path<ProfileId>,
    Json(patch): Json<ProfilePatch>,
) -> ApiResult<Json<Profile>> {
    let profile = Profile::update_details(id, patch, state.deps.db_pool())
        .await?
        .ok_or(EngineError::NotFound("profile"))?;
    Ok(Json(profile))
}

pub async fn deactivate_profile(
    Extension(state): Extension<AppState>,
    Path(id): Path<ProfileId>,
) -> ApiResult<StatusCode> {
    let affected = Profile::deactivate(id, state.deps.db_pool()).await?;
    if affected == 0 {
        return Err(EngineError::NotFound("profile").into());
    }
    Ok(StatusCode::NO_CONTENT)
}

/// Field-level matching readiness for a patient profile.
pub async fn profile_eligibility(
    Extension(state): Extension<AppState>,
    Path(id): Path<ProfileId>,
) -> ApiResult<Json<EligibilityReport>> {
    let profile = Profile::find_by_id(id, state.deps.db_pool())
        .await?
        .ok_or(EngineError::NotFound("profile"))?;
    Ok(Json(check_eligibility(&profile)))
}

pub async fn list_patients(
    Extension(state): Extension<AppState>,
) -> ApiResult<Json<Vec<Profile>>> {
    let patients = Profile::list_patients(state.deps.db_pool()).await?;
    Ok(Json(patients))
}
