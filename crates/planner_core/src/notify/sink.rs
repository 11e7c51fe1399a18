//! Notification sink: native + in-app delivery of firing decisions.
//!
//! # Responsibility
//! - Render a firing decision from the reminder engine into user-visible
//!   output through two independent channels.
//!
//! # Invariants
//! - Native permission is requested at most once, when the sink is built.
//! - A denied or failing native channel never suppresses the in-app toast.

use super::toast::ToastQueue;
use crate::model::activity::ActivityId;
use log::{info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};

const NATIVE_TITLE: &str = "UniPlanner: upcoming activity";

/// One firing decision produced by the reminder engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReminderFire {
    pub activity_id: ActivityId,
    pub message: String,
}

/// Output seam the reminder engine fires through.
pub trait NotificationSink: Send + Sync {
    fn deliver(&self, fire: &ReminderFire);
}

/// Result of a one-time native permission request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Permission {
    Granted,
    Denied,
}

/// Best-effort failure from the platform notification API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NativeNotifyError(pub String);

impl Display for NativeNotifyError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "native notification failed: {}", self.0)
    }
}

impl Error for NativeNotifyError {}

/// Platform notification API, an external collaborator.
pub trait NativeNotifier: Send + Sync {
    fn request_permission(&self) -> Permission;

    fn show(&self, title: &str, body: &str) -> Result<(), NativeNotifyError>;
}

/// Standard sink: in-app toast always, native notification best-effort.
pub struct CompositeSink {
    native: Option<Box<dyn NativeNotifier>>,
    permission: Permission,
    toasts: ToastQueue,
}

impl CompositeSink {
    /// Builds the sink, requesting native permission once if a notifier is
    /// available. The permission result is never re-requested.
    pub fn new(native: Option<Box<dyn NativeNotifier>>, toasts: ToastQueue) -> Self {
        let permission = match &native {
            Some(notifier) => notifier.request_permission(),
            None => Permission::Denied,
        };
        info!("event=sink_init module=notify status=ok native_permission={permission:?}");
        Self {
            native,
            permission,
            toasts,
        }
    }

    /// In-app-only sink for hosts without a platform notification API.
    pub fn in_app_only(toasts: ToastQueue) -> Self {
        Self::new(None, toasts)
    }

    pub fn permission(&self) -> Permission {
        self.permission
    }
}

impl NotificationSink for CompositeSink {
    fn deliver(&self, fire: &ReminderFire) {
        // In-app path first; it must fire even when native is unavailable.
        self.toasts.push(fire.message.clone());

        if self.permission == Permission::Granted {
            if let Some(native) = &self.native {
                if let Err(err) = native.show(NATIVE_TITLE, &fire.message) {
                    warn!(
                        "event=native_notify module=notify status=error id={} error={err}",
                        fire.activity_id
                    );
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{
        CompositeSink, NativeNotifier, NativeNotifyError, NotificationSink, Permission,
        ReminderFire,
    };
    use crate::notify::toast::ToastQueue;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use uuid::Uuid;

    struct FlakyNotifier {
        permission: Permission,
        shown: Arc<AtomicUsize>,
        fail: bool,
    }

    impl NativeNotifier for FlakyNotifier {
        fn request_permission(&self) -> Permission {
            self.permission
        }

        fn show(&self, _title: &str, _body: &str) -> Result<(), NativeNotifyError> {
            self.shown.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                Err(NativeNotifyError("platform said no".to_string()))
            } else {
                Ok(())
            }
        }
    }

    fn fire() -> ReminderFire {
        ReminderFire {
            activity_id: Uuid::new_v4(),
            message: "Upcoming: Midterm (2026-03-10 at 14:00)".to_string(),
        }
    }

    #[test]
    fn denied_permission_skips_native_but_toasts() {
        let shown = Arc::new(AtomicUsize::new(0));
        let toasts = ToastQueue::new();
        let sink = CompositeSink::new(
            Some(Box::new(FlakyNotifier {
                permission: Permission::Denied,
                shown: Arc::clone(&shown),
                fail: false,
            })),
            toasts.clone(),
        );

        sink.deliver(&fire());
        assert_eq!(shown.load(Ordering::SeqCst), 0);
        assert_eq!(toasts.active_now().len(), 1);
    }

    #[test]
    fn native_failure_still_delivers_toast() {
        let shown = Arc::new(AtomicUsize::new(0));
        let toasts = ToastQueue::new();
        let sink = CompositeSink::new(
            Some(Box::new(FlakyNotifier {
                permission: Permission::Granted,
                shown: Arc::clone(&shown),
                fail: true,
            })),
            toasts.clone(),
        );

        sink.deliver(&fire());
        assert_eq!(shown.load(Ordering::SeqCst), 1);
        assert_eq!(toasts.active_now().len(), 1);
    }

    #[test]
    fn in_app_only_sink_reports_denied_permission() {
        let sink = CompositeSink::in_app_only(ToastQueue::new());
        assert_eq!(sink.permission(), Permission::Denied);
    }
}
