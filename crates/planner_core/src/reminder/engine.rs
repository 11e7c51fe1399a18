//! Reminder scan engine.
//!
//! # Responsibility
//! - Decide, per scan tick, which activities have entered the firing band
//!   and emit each one's notification through the sink.
//!
//! # Invariants
//! - An id enters the notified set at most once per session; a reminder
//!   fires at most once per id regardless of how many ticks observe it
//!   in-band.
//! - A malformed date/time on one activity never aborts the scan for the
//!   others.
//! - The event instant is recomputed from `date`+`time` on every scan.

use super::band::ReminderBand;
use crate::model::activity::{Activity, ActivityId};
use crate::model::schedule;
use crate::notify::sink::{NotificationSink, ReminderFire};
use chrono::{DateTime, Local};
use log::{info, warn};
use std::collections::HashSet;
use std::sync::{Arc, Mutex, PoisonError};

/// Injected time source, so scans are deterministic under test.
pub trait Clock: Send {
    fn now(&self) -> DateTime<Local>;
}

/// Wall-clock implementation used in production.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Local> {
        Local::now()
    }
}

/// Session-scoped memory of which activities have already fired.
///
/// Grows monotonically and shrinks only on session reset. Clones share the
/// same underlying set, so a host can export ids for session-scoped
/// persistence while the engine keeps running.
#[derive(Clone, Default)]
pub struct NotifiedSet {
    inner: Arc<Mutex<HashSet<ActivityId>>>,
}

impl NotifiedSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuilds a set from previously exported ids (same-session reload).
    pub fn restore(ids: impl IntoIterator<Item = ActivityId>) -> Self {
        Self {
            inner: Arc::new(Mutex::new(ids.into_iter().collect())),
        }
    }

    /// Inserts the id; returns `true` when it was not present before.
    pub fn insert(&self, id: ActivityId) -> bool {
        self.inner
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(id)
    }

    pub fn contains(&self, id: ActivityId) -> bool {
        self.inner
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .contains(&id)
    }

    /// Exported ids for session-scoped persistence.
    pub fn ids(&self) -> Vec<ActivityId> {
        self.inner
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .copied()
            .collect()
    }

    /// Serializes the ids as a JSON array, the shape hosts stash in
    /// session storage across a reload.
    pub fn export_json(&self) -> String {
        serde_json::to_string(&self.ids()).unwrap_or_else(|_| String::from("[]"))
    }

    /// Counterpart of [`export_json`](Self::export_json). Unreadable input
    /// yields an empty set, so a corrupt stash only re-arms reminders.
    pub fn restore_json(raw: &str) -> Self {
        match serde_json::from_str::<Vec<ActivityId>>(raw) {
            Ok(ids) => Self::restore(ids),
            Err(err) => {
                warn!("event=notified_restore module=reminder status=failed detail={err}");
                Self::new()
            }
        }
    }

    /// Session reset: previously notified activities may fire again.
    pub fn clear(&self) {
        self.inner
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }

    pub fn len(&self) -> usize {
        self.inner
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Poll-based reminder engine owning band policy, clock and notified set.
pub struct ReminderEngine {
    band: ReminderBand,
    clock: Box<dyn Clock>,
    notified: NotifiedSet,
}

impl ReminderEngine {
    pub fn new(band: ReminderBand, clock: Box<dyn Clock>) -> Self {
        Self::with_notified(band, clock, NotifiedSet::new())
    }

    /// Builds an engine around an existing notified set, for hosts restoring
    /// session-scoped state after a reload.
    pub fn with_notified(band: ReminderBand, clock: Box<dyn Clock>, notified: NotifiedSet) -> Self {
        Self {
            band,
            clock,
            notified,
        }
    }

    pub fn band(&self) -> ReminderBand {
        self.band
    }

    pub fn notified(&self) -> &NotifiedSet {
        &self.notified
    }

    /// Session reset: re-arms every activity.
    pub fn reset(&self) {
        self.notified.clear();
        info!("event=reminder_reset module=reminder status=ok");
    }

    /// One scan tick over the given snapshot.
    ///
    /// Synchronous pure computation; returns how many reminders fired.
    /// Malformed records are skipped with a warning, past events never
    /// fire, and each id fires at most once per session.
    pub fn scan(&self, activities: &[Activity], sink: &dyn NotificationSink) -> usize {
        let now = self.clock.now();
        let mut fired = 0;

        for activity in activities {
            let instant = match schedule::combine(&activity.date, &activity.time) {
                Some(instant) => instant,
                None => {
                    warn!(
                        "event=scan_skip module=reminder status=ok id={} reason=malformed date={} time={}",
                        activity.id, activity.date, activity.time
                    );
                    continue;
                }
            };

            let remaining = instant - now;
            if !self.band.contains(remaining) {
                continue;
            }
            if !self.notified.insert(activity.id) {
                continue;
            }

            let fire = ReminderFire {
                activity_id: activity.id,
                message: format!(
                    "Upcoming: {} ({} at {})",
                    activity.title, activity.date, activity.time
                ),
            };
            sink.deliver(&fire);
            fired += 1;
            info!(
                "event=reminder_fired module=reminder status=ok id={} remaining_min={}",
                activity.id,
                remaining.num_minutes()
            );
        }

        fired
    }
}
