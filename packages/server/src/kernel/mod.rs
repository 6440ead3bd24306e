pub mod deps;
pub mod stream_hub;
pub mod test_dependencies;
pub mod traits;

pub use deps::{PgNotificationSink, ServerDeps};
pub use stream_hub::StreamHub;
pub use traits::NotificationSink;
