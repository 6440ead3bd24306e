//! Counsellors domain - the queryable pool of approved providers and their
//! capacity accounting.

pub mod models;

pub use models::{Counsellor, CounsellorStatus, NewCounsellor};
