// Haven Counselling - Matching & Assignment Engine
//
// This crate implements the counsellor matching and assignment engine:
// eligibility checks, gender-matched counsellor selection, the assignment
// lifecycle, conversation/notification fanout, and message ordering.
//
// Persistence is Postgres via sqlx; every mutating operation is a single
// transaction. The HTTP surface in server/ is a thin JSON layer over the
// domain actions.

pub mod common;
pub mod config;
pub mod domains;
pub mod kernel;
pub mod server;

pub use config::*;
