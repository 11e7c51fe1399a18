//! Planner use-case service.
//!
//! # Responsibility
//! - Provide the mutation entry points a front end calls, pairing every
//!   store operation with a visible toast.
//! - Provide the read queries behind day and agenda views.
//!
//! # Invariants
//! - A failed mutation always produces a message distinct from the success
//!   message; silent failure is not acceptable.
//! - The service never bypasses store validation or ownership.

use crate::model::activity::{Activity, ActivityDraft, ActivityId, ActivityPatch};
use crate::model::schedule;
use crate::notify::toast::ToastQueue;
use crate::store::{ActivityStore, StoreResult};
use chrono::{DateTime, Local};
use log::warn;

/// Use-case wrapper around one activity store.
pub struct PlannerService<S: ActivityStore> {
    store: S,
    toasts: ToastQueue,
}

impl<S: ActivityStore> PlannerService<S> {
    pub fn new(store: S, toasts: ToastQueue) -> Self {
        Self { store, toasts }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn toasts(&self) -> &ToastQueue {
        &self.toasts
    }

    /// Creates an activity, toasting the outcome either way.
    pub fn create_activity(&self, draft: &ActivityDraft) -> StoreResult<Activity> {
        match self.store.create(draft) {
            Ok(activity) => {
                self.toasts.push("Activity created");
                Ok(activity)
            }
            Err(err) => {
                self.toast_failure("create", &err);
                Err(err)
            }
        }
    }

    pub fn update_activity(&self, id: ActivityId, patch: &ActivityPatch) -> StoreResult<()> {
        match self.store.update(id, patch) {
            Ok(()) => {
                self.toasts.push("Activity updated");
                Ok(())
            }
            Err(err) => {
                self.toast_failure("update", &err);
                Err(err)
            }
        }
    }

    /// Deletes an activity. Intent confirmation is a UI concern; by the
    /// time this is called the caller has already confirmed.
    pub fn delete_activity(&self, id: ActivityId) -> StoreResult<()> {
        match self.store.delete(id) {
            Ok(()) => {
                self.toasts.push("Activity deleted");
                Ok(())
            }
            Err(err) => {
                self.toast_failure("delete", &err);
                Err(err)
            }
        }
    }

    /// Drag-and-drop reschedule.
    pub fn move_activity(&self, id: ActivityId, new_date: &str) -> StoreResult<()> {
        match self.store.move_to(id, new_date) {
            Ok(()) => {
                self.toasts.push(format!("Moved to {new_date}"));
                Ok(())
            }
            Err(err) => {
                self.toast_failure("move", &err);
                Err(err)
            }
        }
    }

    /// Activities on one calendar date, in time order.
    pub fn activities_on(&self, date: &str) -> StoreResult<Vec<Activity>> {
        let mut on_day: Vec<Activity> = self
            .store
            .snapshot()?
            .into_iter()
            .filter(|activity| activity.date == date)
            .collect();
        on_day.sort_by(|a, b| a.time.cmp(&b.time));
        Ok(on_day)
    }

    /// The next `limit` future activities by combined instant.
    ///
    /// Records whose date/time cannot be combined are left out here; the
    /// reminder scan reports them.
    pub fn upcoming(&self, now: DateTime<Local>, limit: usize) -> StoreResult<Vec<Activity>> {
        let mut future: Vec<(DateTime<Local>, Activity)> = self
            .store
            .snapshot()?
            .into_iter()
            .filter_map(|activity| {
                schedule::combine(&activity.date, &activity.time)
                    .filter(|instant| *instant >= now)
                    .map(|instant| (instant, activity))
            })
            .collect();
        future.sort_by_key(|(instant, _)| *instant);
        Ok(future
            .into_iter()
            .take(limit)
            .map(|(_, activity)| activity)
            .collect())
    }

    fn toast_failure(&self, operation: &str, err: &crate::store::StoreError) {
        warn!("event=mutation_failed module=service status=error operation={operation} error={err}");
        self.toasts.push(format!("Could not {operation} activity: {err}"));
    }
}
