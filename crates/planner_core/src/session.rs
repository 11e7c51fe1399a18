//! Session lifecycle: principal identity and reminder wiring.
//!
//! # Responsibility
//! - Define the authenticated principal scoping a remote activity
//!   collection, and the auth seam the core depends on.
//! - Tie one store subscription and one reminder runner to a session, so
//!   session end cancels both and session start re-arms reminders.
//!
//! # Invariants
//! - A principal id is never empty.
//! - The notified set lives and dies with the session unless the host
//!   explicitly restores it after a same-session reload.

use crate::config::ReminderSettings;
use crate::notify::sink::NotificationSink;
use crate::reminder::engine::{NotifiedSet, ReminderEngine, SystemClock};
use crate::reminder::runner::{ReminderHandle, ReminderRunner};
use crate::store::{ActivityStore, SharedSnapshot, StoreResult, Subscription};
use log::info;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::sync::Arc;

/// Authenticated identity scoping a user's private activity collection.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Principal(String);

impl Principal {
    pub fn new(id: impl Into<String>) -> Result<Self, SessionError> {
        let id = id.into();
        if id.trim().is_empty() {
            return Err(SessionError::EmptyPrincipal);
        }
        Ok(Self(id))
    }

    pub fn id(&self) -> &str {
        &self.0
    }
}

impl Display for Principal {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Sign-in state change reported by the auth collaborator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthEvent {
    SignedIn(Principal),
    SignedOut,
}

/// Authentication backend seam.
///
/// The core's only dependency is "give me the current principal id, or
/// none"; the event stream is for hosts that start/end sessions on sign-in
/// changes.
pub trait AuthBackend: Send + Sync {
    fn current_principal(&self) -> Option<Principal>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionError {
    EmptyPrincipal,
}

impl Display for SessionError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyPrincipal => write!(f, "principal id cannot be empty"),
        }
    }
}

impl Error for SessionError {}

/// One active planner session: a live store subscription feeding the
/// reminder runner through a shared snapshot cell.
///
/// Dropping the session (or calling [`PlannerSession::end`]) cancels the
/// recurring timer and releases the subscription; starting a new session
/// re-arms reminders with a fresh notified set.
pub struct PlannerSession {
    // Declaration order is drop order: stop the timer before the
    // subscription feeding it goes away.
    runner: Option<ReminderHandle>,
    _subscription: Subscription,
    notified: NotifiedSet,
}

impl PlannerSession {
    /// Starts a session with a fresh notified set.
    pub fn start(
        store: &dyn ActivityStore,
        settings: &ReminderSettings,
        sink: Arc<dyn NotificationSink>,
    ) -> StoreResult<Self> {
        Self::start_with_notified(store, settings, sink, NotifiedSet::new())
    }

    /// Starts a session restoring a previously exported notified set
    /// (same-session reload; not across logins or devices).
    pub fn start_with_notified(
        store: &dyn ActivityStore,
        settings: &ReminderSettings,
        sink: Arc<dyn NotificationSink>,
        notified: NotifiedSet,
    ) -> StoreResult<Self> {
        let snapshot = SharedSnapshot::new();
        let subscription = store.subscribe(snapshot.publisher())?;

        let engine =
            ReminderEngine::with_notified(settings.band(), Box::new(SystemClock), notified.clone());
        let runner = ReminderRunner::start(engine, snapshot, sink, settings.scan_interval());

        info!("event=session_start module=session status=ok");
        Ok(Self {
            runner: Some(runner),
            _subscription: subscription,
            notified,
        })
    }

    /// Notified-set handle, for session-scoped persistence.
    pub fn notified(&self) -> &NotifiedSet {
        &self.notified
    }

    /// Ends the session: timer canceled, subscription released.
    pub fn end(mut self) {
        if let Some(runner) = self.runner.take() {
            runner.stop();
        }
        info!("event=session_end module=session status=ok");
    }
}
