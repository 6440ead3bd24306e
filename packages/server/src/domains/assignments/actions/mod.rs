pub mod lifecycle;
pub mod request_match;

pub use lifecycle::{cancel_assignment, complete_assignment};
pub use request_match::{request_match, MatchOutcome};
