//! Notification emitter: persist, then push.

use std::sync::Arc;

use pinpost_core::AppResult;
use pinpost_database::NotificationStore;
use pinpost_entity::notification::NotificationRecord;

use super::draft::NotificationDraft;
use crate::dispatch::Dispatcher;
use crate::message::types::OutboundEvent;
use crate::metrics::RealtimeMetrics;

/// Creates notification records and pushes them to their recipient.
///
/// Self-notifications are created like any other; callers that want to
/// suppress them must do so before emitting.
#[derive(Debug)]
pub struct NotificationEmitter {
    store: Arc<dyn NotificationStore>,
    dispatcher: Arc<Dispatcher>,
    metrics: Arc<RealtimeMetrics>,
}

impl NotificationEmitter {
    /// Create a new emitter
    pub fn new(
        store: Arc<dyn NotificationStore>,
        dispatcher: Arc<Dispatcher>,
        metrics: Arc<RealtimeMetrics>,
    ) -> Self {
        Self {
            store,
            dispatcher,
            metrics,
        }
    }

    /// Persist the notification as unread, then push it if the recipient
    /// is online.
    ///
    /// A persistence failure is returned and nothing is pushed.
    pub async fn emit(&self, draft: NotificationDraft) -> AppResult<NotificationRecord> {
        let record = draft.into_record();
        if let Err(e) = self.store.insert(&record).await {
            tracing::error!(
                recipient_id = %record.recipient_id,
                kind = %record.kind,
                error = %e,
                "Failed to persist notification"
            );
            return Err(e);
        }
        self.metrics.record_notification();

        let delivered = self
            .dispatcher
            .push(
                record.recipient_id,
                OutboundEvent::Notification {
                    notification: record.clone(),
                },
            )
            .await;

        tracing::debug!(
            notification_id = %record.id,
            recipient_id = %record.recipient_id,
            kind = %record.kind,
            delivered,
            "Notification emitted"
        );
        Ok(record)
    }
}
