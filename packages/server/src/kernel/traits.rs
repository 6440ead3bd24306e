// Trait definitions for dependency injection
//
// These are INFRASTRUCTURE traits only - no business logic.
// Business logic (like eligibility or matching) lives in domain functions
// that use these traits.

use anyhow::Result;
use async_trait::async_trait;

use crate::domains::notifications::models::NewNotification;

/// Delivery seam for user-facing notifications.
///
/// The production implementation writes to the notifications table; tests
/// swap in a capturing mock. Callers decide whether a delivery failure is
/// fatal (it usually isn't).
#[async_trait]
pub trait NotificationSink: Send + Sync {
    async fn enqueue(&self, notification: &NewNotification) -> Result<()>;
}
