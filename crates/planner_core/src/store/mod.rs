//! Activity store contracts and subscription plumbing.
//!
//! # Responsibility
//! - Define the store seam every persistence backend implements.
//! - Provide the subscriber registry used to fan out full snapshots.
//!
//! # Invariants
//! - The store exclusively owns the canonical activity collection; callers
//!   mutate it only through `ActivityStore` operations.
//! - Exactly one activity per id at any time.
//! - Backend failures surface to the caller; nothing is retried silently.

use crate::db::DbError;
use crate::model::activity::{Activity, ActivityDraft, ActivityId, ActivityPatch,
    ActivityValidationError};
use std::any::Any;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError, RwLock, Weak};

pub mod remote;
pub mod sqlite;

pub use remote::{ActivityDoc, BackendError, DocumentBackend, RemoteActivityStore};
pub use sqlite::SqliteActivityStore;

pub type StoreResult<T> = Result<T, StoreError>;

/// Store-level error taxonomy shared by all backends.
#[derive(Debug)]
pub enum StoreError {
    /// Input violates a data-model invariant; never retried.
    Validation(ActivityValidationError),
    /// Operation targets an id absent from the store, typically a stale
    /// local reference already deleted elsewhere.
    NotFound(ActivityId),
    /// Local SQLite failure.
    Db(DbError),
    /// Remote backend communication or permission failure.
    Backend(BackendError),
    /// Persisted state that cannot be interpreted at all.
    InvalidData(String),
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::NotFound(id) => write!(f, "activity not found: {id}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::Backend(err) => write!(f, "{err}"),
            Self::InvalidData(message) => write!(f, "invalid persisted activity data: {message}"),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Db(err) => Some(err),
            Self::Backend(err) => Some(err),
            Self::NotFound(_) | Self::InvalidData(_) => None,
        }
    }
}

impl From<ActivityValidationError> for StoreError {
    fn from(value: ActivityValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<DbError> for StoreError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for StoreError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

impl From<BackendError> for StoreError {
    fn from(value: BackendError) -> Self {
        Self::Backend(value)
    }
}

/// Store seam over the canonical activity collection.
///
/// `subscribe` delivers the complete current list immediately and after
/// every change, from this client or (for remote-backed stores) any other
/// client sharing the same principal.
pub trait ActivityStore {
    /// Full current activity set, ordered by schedule.
    fn snapshot(&self) -> StoreResult<Vec<Activity>>;

    fn get(&self, id: ActivityId) -> StoreResult<Option<Activity>>;

    /// Validates, assigns a fresh id and appends.
    fn create(&self, draft: &ActivityDraft) -> StoreResult<Activity>;

    /// Partial update; unspecified fields retain their prior value.
    fn update(&self, id: ActivityId, patch: &ActivityPatch) -> StoreResult<()>;

    fn delete(&self, id: ActivityId) -> StoreResult<()>;

    /// Drag-and-drop convenience: reschedules to another date only.
    fn move_to(&self, id: ActivityId, new_date: &str) -> StoreResult<()> {
        self.update(id, &ActivityPatch::move_to(new_date))
    }

    fn subscribe(&self, callback: SnapshotCallback) -> StoreResult<Subscription>;
}

/// Callback receiving full snapshots; each subscriber gets its own stream.
pub type SnapshotCallback = Arc<dyn Fn(&[Activity]) + Send + Sync>;

/// In-process fan-out registry for snapshot subscribers.
#[derive(Default)]
pub struct SubscriberRegistry {
    next_id: AtomicU64,
    subscribers: Mutex<Vec<(u64, SnapshotCallback)>>,
}

impl SubscriberRegistry {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    fn register(&self, callback: SnapshotCallback) -> u64 {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        self.subscribers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push((id, callback));
        id
    }

    fn remove(&self, id: u64) {
        self.subscribers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .retain(|(entry_id, _)| *entry_id != id);
    }

    /// Delivers one snapshot to every registered subscriber.
    ///
    /// Callbacks are cloned out of the lock before invocation so a callback
    /// may re-enter the store without deadlocking.
    pub fn broadcast(&self, snapshot: &[Activity]) {
        let callbacks: Vec<SnapshotCallback> = self
            .subscribers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .map(|(_, callback)| Arc::clone(callback))
            .collect();
        for callback in callbacks {
            callback(snapshot);
        }
    }

    pub fn len(&self) -> usize {
        self.subscribers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Live subscription handle.
///
/// Dropping it (or calling [`Subscription::unsubscribe`]) synchronously
/// stops further callback delivery and releases any underlying backend
/// connection held for this subscriber.
pub struct Subscription {
    registry: Weak<SubscriberRegistry>,
    id: u64,
    // Live remote connection guard, dropped together with the subscription.
    connection: Option<Box<dyn Any + Send>>,
}

impl Subscription {
    pub(crate) fn registered(registry: &Arc<SubscriberRegistry>, id: u64) -> Self {
        Self {
            registry: Arc::downgrade(registry),
            id,
            connection: None,
        }
    }

    pub(crate) fn connected(connection: Box<dyn Any + Send>) -> Self {
        Self {
            registry: Weak::new(),
            id: 0,
            connection: Some(connection),
        }
    }

    /// Explicit form of dropping the handle.
    pub fn unsubscribe(self) {}
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(registry) = self.registry.upgrade() {
            registry.remove(self.id);
        }
        self.connection.take();
    }
}

/// Latest-snapshot cell shared between a store subscription and the
/// reminder runner.
///
/// The runner reads through this indirection at tick time instead of
/// restarting its timer whenever the activity list changes.
#[derive(Clone, Default)]
pub struct SharedSnapshot {
    inner: Arc<RwLock<Vec<Activity>>>,
}

impl SharedSnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the held snapshot with a newer one.
    pub fn publish(&self, activities: &[Activity]) {
        let mut guard = self
            .inner
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        guard.clear();
        guard.extend_from_slice(activities);
    }

    /// Returns a copy of the latest published snapshot.
    pub fn read(&self) -> Vec<Activity> {
        self.inner
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Builds the snapshot-publishing callback used with
    /// [`ActivityStore::subscribe`].
    pub fn publisher(&self) -> SnapshotCallback {
        let cell = self.clone();
        Arc::new(move |activities: &[Activity]| cell.publish(activities))
    }
}

#[cfg(test)]
mod tests {
    use super::{SharedSnapshot, SubscriberRegistry};
    use crate::model::activity::ActivityDraft;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use uuid::Uuid;

    #[test]
    fn broadcast_reaches_every_subscriber_until_removed() {
        let registry = SubscriberRegistry::new();
        let hits = Arc::new(AtomicUsize::new(0));

        let hits_a = Arc::clone(&hits);
        let id_a = registry.register(Arc::new(move |_| {
            hits_a.fetch_add(1, Ordering::SeqCst);
        }));
        let hits_b = Arc::clone(&hits);
        registry.register(Arc::new(move |_| {
            hits_b.fetch_add(1, Ordering::SeqCst);
        }));

        registry.broadcast(&[]);
        assert_eq!(hits.load(Ordering::SeqCst), 2);

        registry.remove(id_a);
        registry.broadcast(&[]);
        assert_eq!(hits.load(Ordering::SeqCst), 3);
    }

    #[test]
    fn shared_snapshot_returns_latest_published_set() {
        let cell = SharedSnapshot::new();
        assert!(cell.read().is_empty());

        let activity = ActivityDraft::new("2026-03-10", "Midterm").into_activity(Uuid::new_v4());
        cell.publish(std::slice::from_ref(&activity));
        assert_eq!(cell.read(), vec![activity.clone()]);

        cell.publish(&[]);
        assert!(cell.read().is_empty());
    }
}
