// TestDependencies - mock implementations for testing
//
// Provides mock services that can be injected into ServerDeps for tests.

use anyhow::Result;
use async_trait::async_trait;
use sqlx::PgPool;
use std::sync::{Arc, Mutex};

use crate::domains::notifications::models::NewNotification;
use crate::kernel::{NotificationSink, ServerDeps, StreamHub};

// =============================================================================
// Mock Notification Sink
// =============================================================================

/// Captures enqueued notifications instead of persisting them.
pub struct MockNotificationSink {
    enqueued: Arc<Mutex<Vec<NewNotification>>>,
    fail_next: Arc<Mutex<bool>>,
}

impl MockNotificationSink {
    pub fn new() -> Self {
        Self {
            enqueued: Arc::new(Mutex::new(Vec::new())),
            fail_next: Arc::new(Mutex::new(false)),
        }
    }

    /// Everything enqueued so far, in order
    pub fn enqueued(&self) -> Vec<NewNotification> {
        self.enqueued.lock().unwrap().clone()
    }

    /// Make the next delivery fail
    pub fn fail_next(&self) {
        *self.fail_next.lock().unwrap() = true;
    }
}

impl Default for MockNotificationSink {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl NotificationSink for MockNotificationSink {
    async fn enqueue(&self, notification: &NewNotification) -> Result<()> {
        let mut fail = self.fail_next.lock().unwrap();
        if *fail {
            *fail = false;
            return Err(anyhow::anyhow!("mock sink failure"));
        }
        self.enqueued.lock().unwrap().push(notification.clone());
        Ok(())
    }
}

/// ServerDeps wired with a capturing notification sink.
pub fn test_deps(db_pool: PgPool) -> (ServerDeps, Arc<MockNotificationSink>) {
    let sink = Arc::new(MockNotificationSink::new());
    let deps = ServerDeps::new(db_pool, sink.clone(), StreamHub::new());
    (deps, sink)
}
