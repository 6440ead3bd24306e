pub mod assignment;

pub use assignment::{Assignment, AssignmentStatus, ONE_ACTIVE_CONSTRAINT};
