//! Remote document-collection activity store.
//!
//! # Responsibility
//! - Adapt the minimal document-backend contract (put/delete/list/watch on
//!   a principal-scoped collection path) to the [`ActivityStore`] seam.
//! - Keep the core independent of any concrete hosted backend.
//!
//! # Invariants
//! - All documents live under `users/{principal}/events`.
//! - A client's own write eventually appears in its own watch stream; the
//!   backend decides ordering (last write wins, no conflict resolution).
//! - Watch connections are released when the subscription is dropped.

use super::{ActivityStore, SnapshotCallback, StoreError, StoreResult, Subscription};
use crate::model::activity::{Activity, ActivityDraft, ActivityId, ActivityPatch, ActivityType};
use crate::session::Principal;
use log::info;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::sync::Arc;
use uuid::Uuid;

/// Failure reported by a document backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BackendError {
    /// The principal is not allowed to touch this path.
    PermissionDenied,
    /// Transport-level failure talking to the hosted store.
    Network(String),
    /// Anything else the backend wants to surface.
    Other(String),
}

impl Display for BackendError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::PermissionDenied => write!(f, "backend permission denied"),
            Self::Network(message) => write!(f, "backend network failure: {message}"),
            Self::Other(message) => write!(f, "backend failure: {message}"),
        }
    }
}

impl Error for BackendError {}

pub type BackendResult<T> = Result<T, BackendError>;

/// Wire shape of one activity document.
///
/// The category travels as a raw string so documents written by clients
/// with a wider category set stay readable; unknown tags fall back to the
/// default category when mapped into the model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivityDoc {
    pub date: String,
    pub time: String,
    pub title: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub description: Option<String>,
}

impl ActivityDoc {
    pub fn from_activity(activity: &Activity) -> Self {
        Self {
            date: activity.date.clone(),
            time: activity.time.clone(),
            title: activity.title.clone(),
            kind: activity.kind.as_str().to_string(),
            description: activity.description.clone(),
        }
    }

    pub fn into_activity(self, id: ActivityId) -> Activity {
        Activity {
            id,
            date: self.date,
            time: self.time,
            title: self.title,
            kind: ActivityType::parse_or_default(&self.kind),
            description: self.description,
        }
    }
}

/// Observer invoked by the backend with the full document set on every
/// change to the watched collection.
pub type WatchObserver = Arc<dyn Fn(&[(String, ActivityDoc)]) + Send + Sync>;

/// Live watch connection; dropping it releases the connection.
pub trait WatchConnection: Send {}

/// Minimal contract a hosted document store must satisfy.
///
/// Modeled after live-query document databases: documents are addressed by
/// collection path plus id, and a watch delivers the full collection on
/// every change, including the caller's own writes.
pub trait DocumentBackend: Send + Sync {
    fn put(&self, path: &str, doc_id: &str, doc: &ActivityDoc) -> BackendResult<()>;

    fn delete(&self, path: &str, doc_id: &str) -> BackendResult<()>;

    fn list(&self, path: &str) -> BackendResult<Vec<(String, ActivityDoc)>>;

    fn watch(&self, path: &str, observer: WatchObserver)
        -> BackendResult<Box<dyn WatchConnection>>;
}

/// Activity store over a remote document backend, scoped to one principal.
pub struct RemoteActivityStore {
    backend: Arc<dyn DocumentBackend>,
    path: String,
}

impl RemoteActivityStore {
    pub fn new(backend: Arc<dyn DocumentBackend>, principal: &Principal) -> Self {
        Self {
            backend,
            path: format!("users/{}/events", principal.id()),
        }
    }

    /// Collection path this store reads and writes.
    pub fn path(&self) -> &str {
        &self.path
    }

    fn fetch(&self) -> StoreResult<Vec<Activity>> {
        let docs = self.backend.list(&self.path)?;
        Ok(docs_to_activities(&docs))
    }
}

impl ActivityStore for RemoteActivityStore {
    fn snapshot(&self) -> StoreResult<Vec<Activity>> {
        self.fetch()
    }

    fn get(&self, id: ActivityId) -> StoreResult<Option<Activity>> {
        Ok(self.fetch()?.into_iter().find(|activity| activity.id == id))
    }

    fn create(&self, draft: &ActivityDraft) -> StoreResult<Activity> {
        draft.validate()?;

        let activity = draft.clone().into_activity(Uuid::new_v4());
        let doc = ActivityDoc::from_activity(&activity);
        self.backend.put(&self.path, &activity.id.to_string(), &doc)?;

        info!(
            "event=store_create module=store status=ok backend=remote path={} id={}",
            self.path, activity.id
        );
        Ok(activity)
    }

    fn update(&self, id: ActivityId, patch: &ActivityPatch) -> StoreResult<()> {
        let mut activity = self.get(id)?.ok_or(StoreError::NotFound(id))?;
        patch.apply_to(&mut activity)?;
        let doc = ActivityDoc::from_activity(&activity);
        self.backend.put(&self.path, &id.to_string(), &doc)?;

        info!(
            "event=store_update module=store status=ok backend=remote path={} id={id}",
            self.path
        );
        Ok(())
    }

    fn delete(&self, id: ActivityId) -> StoreResult<()> {
        if self.get(id)?.is_none() {
            return Err(StoreError::NotFound(id));
        }
        self.backend.delete(&self.path, &id.to_string())?;

        info!(
            "event=store_delete module=store status=ok backend=remote path={} id={id}",
            self.path
        );
        Ok(())
    }

    fn subscribe(&self, callback: SnapshotCallback) -> StoreResult<Subscription> {
        // Deliver the current set before the live connection starts so the
        // subscriber never observes an empty gap.
        let initial = self.fetch()?;
        callback(&initial);

        let observer: WatchObserver = Arc::new(move |docs: &[(String, ActivityDoc)]| {
            callback(&docs_to_activities(docs));
        });
        let connection = self.backend.watch(&self.path, observer)?;
        Ok(Subscription::connected(Box::new(WatchBox(connection))))
    }
}

// Box<dyn WatchConnection> itself is not Any; wrap it once so the generic
// subscription guard can hold it.
struct WatchBox(#[allow(dead_code)] Box<dyn WatchConnection>);

fn docs_to_activities(docs: &[(String, ActivityDoc)]) -> Vec<Activity> {
    let mut activities: Vec<Activity> = docs
        .iter()
        .filter_map(|(doc_id, doc)| match Uuid::parse_str(doc_id) {
            Ok(id) => Some(doc.clone().into_activity(id)),
            Err(_) => {
                log::warn!(
                    "event=remote_doc_skipped module=store status=ok doc_id={doc_id} reason=bad_id"
                );
                None
            }
        })
        .collect();
    activities.sort_by(|a, b| {
        (a.date.as_str(), a.time.as_str(), a.id).cmp(&(b.date.as_str(), b.time.as_str(), b.id))
    });
    activities
}
