//! Assignments domain - the matching selector and the assignment lifecycle.

pub mod actions;
pub mod events;
pub mod models;

pub use actions::{cancel_assignment, complete_assignment, request_match, MatchOutcome};
pub use models::{Assignment, AssignmentStatus};
