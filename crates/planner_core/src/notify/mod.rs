//! Notification output channels.

pub mod sink;
pub mod toast;

pub use sink::{
    CompositeSink, NativeNotifier, NativeNotifyError, NotificationSink, Permission, ReminderFire,
};
pub use toast::{toast_ttl, Toast, ToastQueue, TOAST_TTL_SECS};
