//! Core domain logic for UniPlanner, a student activity planner.
//! This crate is the single source of truth for scheduling invariants:
//! the activity store, the reminder engine and the notification sink.

pub mod assist;
pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod notify;
pub mod reminder;
pub mod service;
pub mod session;
pub mod store;

pub use config::{ConfigError, PlannerConfig, ReminderSettings, StorageBackendKind,
    StorageSettings};
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::activity::{
    Activity, ActivityDraft, ActivityId, ActivityPatch, ActivityType, ActivityValidationError,
};
pub use notify::{
    toast_ttl, CompositeSink, NativeNotifier, NativeNotifyError, NotificationSink, Permission,
    ReminderFire, Toast, ToastQueue,
};
pub use reminder::{Clock, NotifiedSet, ReminderBand, ReminderEngine, ReminderHandle,
    ReminderRunner, SystemClock};
pub use service::PlannerService;
pub use session::{AuthBackend, AuthEvent, PlannerSession, Principal, SessionError};
pub use store::{
    ActivityDoc, ActivityStore, BackendError, DocumentBackend, RemoteActivityStore,
    SharedSnapshot, SnapshotCallback, SqliteActivityStore, StoreError, StoreResult, Subscription,
};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::core_version;

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
