//! Firing-band policy.
//!
//! # Responsibility
//! - Decide whether a time-remaining value sits inside the reminder window.
//!
//! # Invariants
//! - Zero or negative time remaining is never inside any band; past events
//!   do not notify.

use chrono::Duration;

/// Range of "time remaining until event" values during which a reminder
/// should trigger.
///
/// The two variants are materially different policies found across the
/// planner's iterations, surfaced here as configuration rather than picked
/// silently:
///
/// - [`ReminderBand::LeadTime`] is open-ended ("at most `threshold`
///   remaining, not yet past"). An activity crossing the threshold between
///   two ticks is still caught on the next tick, whatever the cadence.
/// - [`ReminderBand::Window`] is the narrow `center ± tolerance` band of the
///   earlier iterations. It avoids late notifications long after the mark
///   but misses events unless the scan interval is at most `tolerance`;
///   config validation enforces that bound.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReminderBand {
    LeadTime { threshold: Duration },
    Window { center: Duration, tolerance: Duration },
}

impl ReminderBand {
    /// The default policy: fire within two hours of the event.
    pub fn default_lead_time() -> Self {
        Self::LeadTime {
            threshold: Duration::hours(2),
        }
    }

    /// Returns whether `remaining` falls inside the firing band.
    pub fn contains(&self, remaining: Duration) -> bool {
        if remaining <= Duration::zero() {
            return false;
        }
        match *self {
            Self::LeadTime { threshold } => remaining <= threshold,
            Self::Window { center, tolerance } => {
                remaining >= center - tolerance && remaining <= center + tolerance
            }
        }
    }

    /// Longest scan interval that still guarantees at-least-once detection,
    /// or `None` when detection is cadence-independent.
    pub fn max_scan_interval(&self) -> Option<Duration> {
        match *self {
            Self::LeadTime { .. } => None,
            Self::Window { tolerance, .. } => Some(tolerance),
        }
    }
}

impl Default for ReminderBand {
    fn default() -> Self {
        Self::default_lead_time()
    }
}
