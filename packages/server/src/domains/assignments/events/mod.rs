//! Assignment domain events, emitted after commit for best-effort fanout.

use serde::Serialize;

use crate::common::{AssignmentId, CounsellorId, ProfileId};

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AssignmentEvent {
    AssignmentCreated {
        assignment_id: AssignmentId,
        patient_id: ProfileId,
        counsellor_id: CounsellorId,
    },
    AssignmentCompleted {
        assignment_id: AssignmentId,
    },
    AssignmentCancelled {
        assignment_id: AssignmentId,
    },
}

impl AssignmentEvent {
    /// Stream hub topic for assignment events.
    pub fn topic(&self) -> String {
        "assignments".to_string()
    }
}
