//! Transient notifications with automatic expiry.
//!
//! The center owns the active set; callers only hold [`NotificationHandle`]s.
//! Each notification has one expiry task. Removal, whether manual or by
//! expiry, goes through a single path that takes the entry and its timer out
//! together, so an entry is removed at most once.

use std::{collections::HashMap, sync::Arc, time::Duration};

use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use serde::Serialize;
use shared::domain::{NotificationId, Severity};
use tokio::{sync::broadcast, task::JoinHandle};

pub const DEFAULT_TTL: Duration = Duration::from_millis(5000);
const EVENT_CAPACITY: usize = 64;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notification {
    pub id: NotificationId,
    pub message: String,
    pub severity: Severity,
    pub created_at: DateTime<Utc>,
    pub ttl_ms: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DismissReason {
    Expired,
    Manual,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum NotificationEvent {
    Shown(Notification),
    Dismissed {
        id: NotificationId,
        reason: DismissReason,
    },
}

struct Entry {
    notification: Notification,
    expiry: Option<JoinHandle<()>>,
}

#[derive(Default)]
struct CenterState {
    next_id: u64,
    // Insertion order is display order.
    active: Vec<Entry>,
}

struct CenterInner {
    state: Mutex<CenterState>,
    events: broadcast::Sender<NotificationEvent>,
    default_ttl: Duration,
}

#[derive(Clone)]
pub struct NotificationCenter {
    inner: Arc<CenterInner>,
}

impl Default for NotificationCenter {
    fn default() -> Self {
        Self::new(DEFAULT_TTL)
    }
}

impl NotificationCenter {
    pub fn new(default_ttl: Duration) -> Self {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        Self {
            inner: Arc::new(CenterInner {
                state: Mutex::new(CenterState::default()),
                events,
                default_ttl,
            }),
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<NotificationEvent> {
        self.inner.events.subscribe()
    }

    pub fn default_ttl(&self) -> Duration {
        self.inner.default_ttl
    }

    pub fn notify(&self, message: impl Into<String>, severity: Severity) -> NotificationHandle {
        self.notify_with_ttl(message, severity, self.inner.default_ttl)
    }

    /// Shows a notification and schedules its removal after `ttl`.
    /// Must be called from within a tokio runtime.
    pub fn notify_with_ttl(
        &self,
        message: impl Into<String>,
        severity: Severity,
        ttl: Duration,
    ) -> NotificationHandle {
        let message = message.into();
        let mut state = self.inner.state.lock();
        state.next_id += 1;
        let id = NotificationId(state.next_id);
        let notification = Notification {
            id,
            message,
            severity,
            created_at: Utc::now(),
            ttl_ms: u64::try_from(ttl.as_millis()).unwrap_or(u64::MAX),
        };

        let center = Arc::downgrade(&self.inner);
        let expiry = tokio::spawn(async move {
            tokio::time::sleep(ttl).await;
            if let Some(inner) = center.upgrade() {
                NotificationCenter { inner }.remove(id, DismissReason::Expired, false);
            }
        });

        tracing::debug!(id = %id, severity = %severity, message = %notification.message, "notification shown");
        let _ = self
            .inner
            .events
            .send(NotificationEvent::Shown(notification.clone()));
        state.active.push(Entry {
            notification,
            expiry: Some(expiry),
        });

        NotificationHandle {
            id,
            center: self.clone(),
        }
    }

    /// Snapshot of visible notifications in display order.
    pub fn active(&self) -> Vec<Notification> {
        self.inner
            .state
            .lock()
            .active
            .iter()
            .map(|entry| entry.notification.clone())
            .collect()
    }

    pub fn is_active(&self, id: NotificationId) -> bool {
        self.inner
            .state
            .lock()
            .active
            .iter()
            .any(|entry| entry.notification.id == id)
    }

    /// Dismisses every visible notification. Returns how many were removed.
    pub fn dismiss_all(&self) -> usize {
        let ids: Vec<NotificationId> = self
            .inner
            .state
            .lock()
            .active
            .iter()
            .map(|entry| entry.notification.id)
            .collect();
        ids.into_iter()
            .filter(|id| self.remove(*id, DismissReason::Manual, true))
            .count()
    }

    fn remove(&self, id: NotificationId, reason: DismissReason, cancel_timer: bool) -> bool {
        let entry = {
            let mut state = self.inner.state.lock();
            let Some(index) = state
                .active
                .iter()
                .position(|entry| entry.notification.id == id)
            else {
                return false;
            };
            state.active.remove(index)
        };

        if cancel_timer {
            if let Some(expiry) = entry.expiry {
                expiry.abort();
            }
        }
        tracing::debug!(id = %id, ?reason, "notification dismissed");
        let _ = self
            .inner
            .events
            .send(NotificationEvent::Dismissed { id, reason });
        true
    }
}

/// Allows early dismissal of one notification.
#[derive(Clone)]
pub struct NotificationHandle {
    id: NotificationId,
    center: NotificationCenter,
}

impl NotificationHandle {
    pub fn id(&self) -> NotificationId {
        self.id
    }

    pub fn is_active(&self) -> bool {
        self.center.is_active(self.id)
    }

    /// Removes the notification now and cancels its expiry timer.
    /// Returns `false` if it was already gone.
    pub fn dismiss(&self) -> bool {
        self.center.remove(self.id, DismissReason::Manual, true)
    }
}

#[cfg(test)]
#[path = "tests/notifications_tests.rs"]
mod tests;
