//! SQLite-backed activity store.
//!
//! # Responsibility
//! - Persist the canonical activity collection locally.
//! - Fan out a fresh full snapshot to subscribers after every committed
//!   mutation.
//!
//! # Invariants
//! - Write paths validate drafts/patches before touching SQL.
//! - Unrecognized category tags fall back to the default category at read
//!   time instead of failing the row.

use super::{
    ActivityStore, SnapshotCallback, StoreError, StoreResult, SubscriberRegistry, Subscription,
};
use crate::model::activity::{Activity, ActivityDraft, ActivityId, ActivityPatch, ActivityType};
use log::info;
use rusqlite::{params, Connection, Row};
use std::sync::Arc;
use uuid::Uuid;

const ACTIVITY_SELECT_SQL: &str = "SELECT
    uuid,
    date,
    time,
    title,
    type,
    description
FROM activities";

/// Local persistence backend over a migrated SQLite connection.
pub struct SqliteActivityStore {
    conn: Connection,
    subscribers: Arc<SubscriberRegistry>,
}

impl SqliteActivityStore {
    /// Wraps a connection previously opened through [`crate::db::open_db`].
    pub fn new(conn: Connection) -> Self {
        Self {
            conn,
            subscribers: SubscriberRegistry::new(),
        }
    }

    fn load(&self, id: ActivityId) -> StoreResult<Option<Activity>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{ACTIVITY_SELECT_SQL} WHERE uuid = ?1;"))?;
        let mut rows = stmt.query([id.to_string()])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_activity_row(row)?));
        }
        Ok(None)
    }

    fn write_back(&self, activity: &Activity) -> StoreResult<()> {
        let changed = self.conn.execute(
            "UPDATE activities
             SET
                date = ?1,
                time = ?2,
                title = ?3,
                type = ?4,
                description = ?5,
                updated_at = (strftime('%s', 'now') * 1000)
             WHERE uuid = ?6;",
            params![
                activity.date.as_str(),
                activity.time.as_str(),
                activity.title.as_str(),
                activity.kind.as_str(),
                activity.description.as_deref(),
                activity.id.to_string(),
            ],
        )?;
        if changed == 0 {
            return Err(StoreError::NotFound(activity.id));
        }
        Ok(())
    }

    fn notify_subscribers(&self) -> StoreResult<()> {
        if self.subscribers.is_empty() {
            return Ok(());
        }
        let snapshot = self.snapshot()?;
        self.subscribers.broadcast(&snapshot);
        Ok(())
    }
}

impl ActivityStore for SqliteActivityStore {
    fn snapshot(&self) -> StoreResult<Vec<Activity>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{ACTIVITY_SELECT_SQL} ORDER BY date, time, uuid;"))?;
        let mut rows = stmt.query([])?;
        let mut activities = Vec::new();
        while let Some(row) = rows.next()? {
            activities.push(parse_activity_row(row)?);
        }
        Ok(activities)
    }

    fn get(&self, id: ActivityId) -> StoreResult<Option<Activity>> {
        self.load(id)
    }

    fn create(&self, draft: &ActivityDraft) -> StoreResult<Activity> {
        draft.validate()?;

        let activity = draft.clone().into_activity(Uuid::new_v4());
        self.conn.execute(
            "INSERT INTO activities (uuid, date, time, title, type, description)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6);",
            params![
                activity.id.to_string(),
                activity.date.as_str(),
                activity.time.as_str(),
                activity.title.as_str(),
                activity.kind.as_str(),
                activity.description.as_deref(),
            ],
        )?;

        info!(
            "event=store_create module=store status=ok backend=sqlite id={} date={}",
            activity.id, activity.date
        );
        self.notify_subscribers()?;
        Ok(activity)
    }

    fn update(&self, id: ActivityId, patch: &ActivityPatch) -> StoreResult<()> {
        let mut activity = self.load(id)?.ok_or(StoreError::NotFound(id))?;
        patch.apply_to(&mut activity)?;
        self.write_back(&activity)?;

        info!("event=store_update module=store status=ok backend=sqlite id={id}");
        self.notify_subscribers()
    }

    fn delete(&self, id: ActivityId) -> StoreResult<()> {
        let changed = self
            .conn
            .execute("DELETE FROM activities WHERE uuid = ?1;", [id.to_string()])?;
        if changed == 0 {
            return Err(StoreError::NotFound(id));
        }

        info!("event=store_delete module=store status=ok backend=sqlite id={id}");
        self.notify_subscribers()
    }

    fn subscribe(&self, callback: SnapshotCallback) -> StoreResult<Subscription> {
        let snapshot = self.snapshot()?;
        callback(&snapshot);
        let id = self.subscribers.register(callback);
        Ok(Subscription::registered(&self.subscribers, id))
    }
}

fn parse_activity_row(row: &Row<'_>) -> StoreResult<Activity> {
    let uuid_text: String = row.get("uuid")?;
    let id = Uuid::parse_str(&uuid_text).map_err(|_| {
        StoreError::InvalidData(format!("invalid uuid value `{uuid_text}` in activities.uuid"))
    })?;

    let kind_text: String = row.get("type")?;

    Ok(Activity {
        id,
        date: row.get("date")?,
        time: row.get("time")?,
        title: row.get("title")?,
        kind: ActivityType::parse_or_default(&kind_text),
        description: row.get("description")?,
    })
}
