//! Profiles domain - people on the platform and their matching eligibility.

pub mod eligibility;
pub mod models;

pub use eligibility::{check_eligibility, EligibilityReport};
pub use models::{Gender, NewProfile, Profile, ProfilePatch, Role};
