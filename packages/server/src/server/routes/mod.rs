pub mod conversations;
pub mod counsellors;
pub mod health;
pub mod matching;
pub mod notifications;
pub mod profiles;
pub mod stream;

pub use health::health_handler;
pub use stream::stream_handler;
