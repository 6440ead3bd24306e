pub mod profile;

pub use profile::{Gender, NewProfile, Profile, ProfilePatch, Role};
