pub mod counsellor;

pub use counsellor::{Counsellor, CounsellorStatus, NewCounsellor};
