//! Transient in-app toast queue.
//!
//! # Responsibility
//! - Hold the visible queue of short-lived messages produced by mutations
//!   and reminder firings.
//!
//! # Invariants
//! - Every toast owns its own expiry instant, fixed at creation.
//! - Toasts are presentational only and never persisted.

use chrono::{DateTime, Duration, Local};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

/// Display duration for one toast, in seconds.
pub const TOAST_TTL_SECS: i64 = 4;

/// Display duration for one toast.
pub fn toast_ttl() -> Duration {
    Duration::seconds(TOAST_TTL_SECS)
}

/// One transient in-app message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toast {
    pub id: u64,
    pub message: String,
    pub expires_at: DateTime<Local>,
}

/// Shared queue of live toasts.
///
/// Clones share the same queue, so the sink, the service and the rendering
/// layer can all hold a handle.
#[derive(Clone, Default)]
pub struct ToastQueue {
    inner: Arc<Mutex<Vec<Toast>>>,
    next_id: Arc<AtomicU64>,
}

impl ToastQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a message expiring [`toast_ttl`] from now.
    pub fn push(&self, message: impl Into<String>) -> u64 {
        self.push_at(message, Local::now())
    }

    /// Appends a message with an explicit creation instant (test seam).
    pub fn push_at(&self, message: impl Into<String>, now: DateTime<Local>) -> u64 {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let toast = Toast {
            id,
            message: message.into(),
            expires_at: now + toast_ttl(),
        };
        self.inner
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(toast);
        id
    }

    /// Returns the still-visible toasts, retiring expired ones.
    ///
    /// Each toast retires independently once `now` passes its own expiry.
    pub fn active(&self, now: DateTime<Local>) -> Vec<Toast> {
        let mut guard = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        guard.retain(|toast| toast.expires_at > now);
        guard.clone()
    }

    pub fn active_now(&self) -> Vec<Toast> {
        self.active(Local::now())
    }
}
