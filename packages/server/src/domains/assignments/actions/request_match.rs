//! Request-match action - the engine's central write path.
//!
//! Eligibility check, candidate selection, capacity reservation and the
//! assignment insert happen in one transaction; conversation and notification
//! fanout run after commit and never roll the assignment back.

use tracing::{info, warn};

use crate::common::{EngineError, EngineResult, ProfileId};
use crate::domains::assignments::events::AssignmentEvent;
use crate::domains::assignments::models::Assignment;
use crate::domains::conversations::actions::open_conversation;
use crate::domains::conversations::models::Conversation;
use crate::domains::counsellors::models::Counsellor;
use crate::domains::profiles::eligibility::check_eligibility;
use crate::domains::profiles::models::{Gender, Profile};
use crate::kernel::ServerDeps;

/// Everything produced by a successful match.
#[derive(Debug, Clone)]
pub struct MatchOutcome {
    pub assignment: Assignment,
    pub counsellor: Counsellor,
    pub conversation: Conversation,
}

/// Match a patient to a counsellor.
///
/// The patient's own gender is the candidate filter (gender-matched support
/// policy). `actor` is the assigning party when an admin drives the match;
/// `None` for self-service requests.
pub async fn request_match(
    patient_id: ProfileId,
    actor: Option<ProfileId>,
    deps: &ServerDeps,
) -> EngineResult<MatchOutcome> {
    let pool = deps.db_pool();

    let patient = Profile::find_by_id(patient_id, pool)
        .await?
        .ok_or(EngineError::NotFound("profile"))?;

    let report = check_eligibility(&patient);
    if !report.eligible {
        return Err(EngineError::Ineligible {
            missing: report.missing,
        });
    }

    // Eligibility guarantees gender is present
    let gender: Gender = match patient.gender.as_deref() {
        Some(g) => g.parse()?,
        None => {
            return Err(EngineError::Ineligible {
                missing: vec![crate::common::MissingField::Gender],
            })
        }
    };

    info!(patient_id = %patient_id, gender = %gender, "Requesting counsellor match");

    // Selection, reservation and the assignment insert are one atomic unit
    let mut tx = pool.begin().await?;

    if Assignment::find_active_for_patient(patient_id, &mut tx)
        .await?
        .is_some()
    {
        return Err(EngineError::AlreadyAssigned);
    }

    let candidate = Counsellor::lock_next_candidate(gender, &mut tx)
        .await?
        .ok_or(EngineError::NoCandidate)?;

    let counsellor = Counsellor::reserve_slot(candidate.id, &mut tx)
        .await?
        .ok_or(EngineError::CapacityExceeded)?;

    let assignment = Assignment::insert(patient_id, counsellor.id, actor, &mut tx).await?;

    tx.commit().await?;

    info!(
        assignment_id = %assignment.id,
        counsellor_id = %counsellor.id,
        current_patients = counsellor.current_patients,
        "Assignment created"
    );

    let event = AssignmentEvent::AssignmentCreated {
        assignment_id: assignment.id,
        patient_id,
        counsellor_id: counsellor.id,
    };
    deps.publish(&event.topic(), &event).await;

    // Post-commit fanout. A failure here leaves the assignment committed;
    // open_conversation is idempotent by assignment id, so the caller can
    // re-invoke it to repair the gap.
    let conversation = match open_conversation(&assignment, deps).await {
        Ok(conversation) => conversation,
        Err(e) => {
            warn!(
                assignment_id = %assignment.id,
                error = %e,
                "Conversation fanout failed after assignment commit"
            );
            return Err(e);
        }
    };

    Ok(MatchOutcome {
        assignment,
        counsellor,
        conversation,
    })
}
