//! Applies webhook events to lesson asset records.

use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use tracing::{debug, info, warn};
use uuid::Uuid;

use coursehub_core::config::WebhookConfig;
use coursehub_core::deadline::within;
use coursehub_core::result::AppResult;
use coursehub_entity::lesson::{AssetStatus, LessonAsset};
use coursehub_entity::webhook::WebhookEvent;

use super::transition::plan;
use crate::content::ContentStore;

/// Conditional writes attempted before yielding to concurrent writers.
const MAX_CAS_ATTEMPTS: usize = 3;

/// What reconciling one event did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum ReconcileOutcome {
    /// The lesson moved `from` → `to`.
    Applied {
        /// Lesson that changed.
        lesson_id: Uuid,
        /// Status before.
        from: AssetStatus,
        /// Status after.
        to: AssetStatus,
    },
    /// The event has no effect in the lesson's current state.
    Ignored {
        /// Lesson the event resolved to.
        lesson_id: Uuid,
        /// Its unchanged status.
        status: AssetStatus,
    },
    /// A concurrent writer moved the lesson first; nothing left to do.
    Conflict {
        /// Lesson the event resolved to.
        lesson_id: Uuid,
    },
    /// No lesson matches the event's identifiers.
    Unroutable,
}

/// Drives lesson asset status from pipeline events.
///
/// Writes are compare-and-set on the status read just before, so concurrent
/// deliveries for one asset can never both apply from the same state.
#[derive(Debug, Clone)]
pub struct AssetReconciler {
    store: Arc<dyn ContentStore>,
    store_timeout: Duration,
}

impl AssetReconciler {
    /// Creates a reconciler writing through `store`.
    pub fn new(store: Arc<dyn ContentStore>, config: &WebhookConfig) -> Self {
        Self {
            store,
            store_timeout: Duration::from_millis(config.store_timeout_ms),
        }
    }

    /// Apply one decoded event.
    ///
    /// Only store failures are errors; every other outcome is an
    /// acknowledgement.
    pub async fn reconcile(&self, event: &WebhookEvent) -> AppResult<ReconcileOutcome> {
        let mut lost_race = false;

        for _ in 0..MAX_CAS_ATTEMPTS {
            let Some(lesson) = self.find_lesson(event).await? else {
                info!(
                    event_id = %event.event_id,
                    kind = %event.kind,
                    upload_id = ?event.upload_id,
                    asset_id = ?event.asset_id,
                    "No lesson matches webhook event, discarding"
                );
                return Ok(ReconcileOutcome::Unroutable);
            };

            if let (Some(bound), Some(incoming)) = (&lesson.asset_id, &event.asset_id) {
                if bound != incoming {
                    warn!(
                        event_id = %event.event_id,
                        lesson_id = %lesson.id,
                        bound_asset = %bound,
                        incoming_asset = %incoming,
                        "Event names a different asset than the lesson, ignoring"
                    );
                    return Ok(ReconcileOutcome::Ignored {
                        lesson_id: lesson.id,
                        status: lesson.status,
                    });
                }
            }

            let Some(update) = plan(lesson.status, event) else {
                debug!(
                    event_id = %event.event_id,
                    lesson_id = %lesson.id,
                    status = %lesson.status,
                    kind = %event.kind,
                    "No transition for event"
                );
                return Ok(if lost_race {
                    ReconcileOutcome::Conflict {
                        lesson_id: lesson.id,
                    }
                } else {
                    ReconcileOutcome::Ignored {
                        lesson_id: lesson.id,
                        status: lesson.status,
                    }
                });
            };

            let applied = within(
                self.store_timeout,
                "lesson status update",
                self.store
                    .compare_and_set_status(lesson.id, lesson.status, &update),
            )
            .await?;

            if applied {
                info!(
                    event_id = %event.event_id,
                    lesson_id = %lesson.id,
                    from = %lesson.status,
                    to = %update.status,
                    "Lesson asset status updated"
                );
                return Ok(ReconcileOutcome::Applied {
                    lesson_id: lesson.id,
                    from: lesson.status,
                    to: update.status,
                });
            }

            debug!(
                event_id = %event.event_id,
                lesson_id = %lesson.id,
                expected = %lesson.status,
                "Lost status compare-and-set, re-reading"
            );
            lost_race = true;
        }

        let lesson_id = self.find_lesson(event).await?.map(|l| l.id);
        Ok(match lesson_id {
            Some(lesson_id) => ReconcileOutcome::Conflict { lesson_id },
            None => ReconcileOutcome::Unroutable,
        })
    }

    /// Resolve by asset id when known, then by upload id.
    async fn find_lesson(&self, event: &WebhookEvent) -> AppResult<Option<LessonAsset>> {
        if let Some(asset_id) = &event.asset_id {
            let found = within(
                self.store_timeout,
                "lesson lookup by asset",
                self.store.get_lesson_by_asset_id(asset_id),
            )
            .await?;
            if found.is_some() {
                return Ok(found);
            }
        }

        match &event.upload_id {
            Some(upload_id) => {
                within(
                    self.store_timeout,
                    "lesson lookup by upload",
                    self.store.get_lesson_by_upload_id(upload_id),
                )
                .await
            }
            None => Ok(None),
        }
    }
}
