pub mod assignments;
pub mod conversations;
pub mod counsellors;
pub mod notifications;
pub mod profiles;
