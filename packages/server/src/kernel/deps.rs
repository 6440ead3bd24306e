//! Server dependencies for effects (using traits for testability)
//!
//! This module provides the central dependency container used by all domain
//! actions. External delivery goes through trait abstractions so tests can
//! inject mocks.

use anyhow::Result;
use async_trait::async_trait;
use serde::Serialize;
use sqlx::PgPool;
use std::sync::Arc;
use tracing::warn;

use crate::domains::notifications::models::{NewNotification, Notification};
use crate::kernel::stream_hub::StreamHub;
use crate::kernel::traits::NotificationSink;

// =============================================================================
// PgNotificationSink (production implementation)
// =============================================================================

/// Writes notifications straight to the notifications table.
pub struct PgNotificationSink {
    pool: PgPool,
}

impl PgNotificationSink {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl NotificationSink for PgNotificationSink {
    async fn enqueue(&self, notification: &NewNotification) -> Result<()> {
        Notification::insert(notification, &self.pool)
            .await
            .map_err(|e| anyhow::anyhow!("{}", e))?;
        Ok(())
    }
}

// =============================================================================
// ServerDeps
// =============================================================================

/// Server dependencies accessible to domain actions.
#[derive(Clone)]
pub struct ServerDeps {
    pub db_pool: PgPool,
    pub notifier: Arc<dyn NotificationSink>,
    /// In-process pub/sub hub for real-time streaming to SSE endpoints
    pub stream_hub: StreamHub,
}

impl ServerDeps {
    /// Create new ServerDeps with the given dependencies
    pub fn new(db_pool: PgPool, notifier: Arc<dyn NotificationSink>, stream_hub: StreamHub) -> Self {
        Self {
            db_pool,
            notifier,
            stream_hub,
        }
    }

    /// Production wiring: Postgres-backed notification sink.
    pub fn from_pool(db_pool: PgPool) -> Self {
        let notifier = Arc::new(PgNotificationSink::new(db_pool.clone()));
        Self::new(db_pool, notifier, StreamHub::new())
    }

    pub fn db_pool(&self) -> &PgPool {
        &self.db_pool
    }

    pub fn notifier(&self) -> &dyn NotificationSink {
        self.notifier.as_ref()
    }

    /// Publish a domain event to the stream hub.
    ///
    /// Best-effort: serialization failures are logged, never surfaced. Stream
    /// delivery must not affect the committed write it follows.
    pub async fn publish<T: Serialize>(&self, topic: &str, event: &T) {
        match serde_json::to_value(event) {
            Ok(value) => self.stream_hub.publish(topic, value).await,
            Err(e) => warn!(topic, error = %e, "Failed to serialize stream event"),
        }
    }
}
