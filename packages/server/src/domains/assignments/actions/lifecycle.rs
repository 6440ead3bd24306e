//! Lifecycle actions - transitions out of the active state.
//!
//! Both terminal transitions release the counsellor's slot in the same
//! transaction, keeping `current_patients` equal to the active-assignment
//! count at every commit point.

use tracing::info;

use crate::common::{AssignmentId, EngineError, EngineResult};
use crate::domains::assignments::events::AssignmentEvent;
use crate::domains::assignments::models::{Assignment, AssignmentStatus};
use crate::domains::conversations::models::Conversation;
use crate::domains::counsellors::models::Counsellor;
use crate::kernel::ServerDeps;

/// Formally end the counselling relationship.
pub async fn complete_assignment(
    assignment_id: AssignmentId,
    deps: &ServerDeps,
) -> EngineResult<Assignment> {
    let assignment = transition(assignment_id, AssignmentStatus::Completed, deps).await?;
    let event = AssignmentEvent::AssignmentCompleted { assignment_id };
    deps.publish(&event.topic(), &event).await;
    Ok(assignment)
}

/// Withdraw an assignment before any session occurred.
pub async fn cancel_assignment(
    assignment_id: AssignmentId,
    deps: &ServerDeps,
) -> EngineResult<Assignment> {
    let assignment = transition(assignment_id, AssignmentStatus::Cancelled, deps).await?;
    let event = AssignmentEvent::AssignmentCancelled { assignment_id };
    deps.publish(&event.topic(), &event).await;
    Ok(assignment)
}

async fn transition(
    assignment_id: AssignmentId,
    target: AssignmentStatus,
    deps: &ServerDeps,
) -> EngineResult<Assignment> {
    let mut tx = deps.db_pool().begin().await?;

    let assignment = Assignment::lock_by_id(assignment_id, &mut tx)
        .await?
        .ok_or(EngineError::NotFound("assignment"))?;

    let current: AssignmentStatus = assignment.status.parse()?;
    if !current.can_transition_to(target) {
        return Err(EngineError::AssignmentNotActive);
    }

    let assignment = Assignment::mark_terminal(assignment_id, target, &mut tx).await?;
    Counsellor::release_slot(assignment.counsellor_id, &mut tx).await?;
    Conversation::deactivate_for_assignment(assignment_id, &mut tx).await?;

    tx.commit().await?;

    info!(
        assignment_id = %assignment_id,
        status = %target,
        "Assignment transitioned"
    );

    Ok(assignment)
}
