use planner_core::db::open_db_in_memory;
use planner_core::{Activity, ActivityDraft, ActivityStore, SqliteActivityStore};
use std::sync::{Arc, Mutex, PoisonError};

type Snapshots = Arc<Mutex<Vec<Vec<Activity>>>>;

fn recording_callback() -> (Snapshots, planner_core::SnapshotCallback) {
    let snapshots: Snapshots = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&snapshots);
    let callback: planner_core::SnapshotCallback = Arc::new(move |activities: &[Activity]| {
        sink.lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(activities.to_vec());
    });
    (snapshots, callback)
}

fn received(snapshots: &Snapshots) -> Vec<Vec<Activity>> {
    snapshots
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
        .clone()
}

#[test]
fn subscriber_receives_current_set_immediately() {
    let store = SqliteActivityStore::new(open_db_in_memory().unwrap());
    store
        .create(&ActivityDraft::new("2026-03-10", "Pre-existing"))
        .unwrap();

    let (snapshots, callback) = recording_callback();
    let _subscription = store.subscribe(callback).unwrap();

    let seen = received(&snapshots);
    assert_eq!(seen.len(), 1);
    assert_eq!(seen[0].len(), 1);
    assert_eq!(seen[0][0].title, "Pre-existing");
}

#[test]
fn every_mutation_delivers_a_fresh_full_snapshot() {
    let store = SqliteActivityStore::new(open_db_in_memory().unwrap());
    let (snapshots, callback) = recording_callback();
    let _subscription = store.subscribe(callback).unwrap();

    let created = store
        .create(&ActivityDraft::new("2026-03-10", "First"))
        .unwrap();
    store.move_to(created.id, "2026-03-11").unwrap();
    store.delete(created.id).unwrap();

    let seen = received(&snapshots);
    // Initial empty set, then one snapshot per mutation.
    assert_eq!(seen.len(), 4);
    assert!(seen[0].is_empty());
    assert_eq!(seen[1][0].date, "2026-03-10");
    assert_eq!(seen[2][0].date, "2026-03-11");
    assert!(seen[3].is_empty());
}

#[test]
fn multiple_subscribers_each_get_their_own_stream() {
    let store = SqliteActivityStore::new(open_db_in_memory().unwrap());
    let (snapshots_a, callback_a) = recording_callback();
    let (snapshots_b, callback_b) = recording_callback();
    let _sub_a = store.subscribe(callback_a).unwrap();
    let _sub_b = store.subscribe(callback_b).unwrap();

    store
        .create(&ActivityDraft::new("2026-03-10", "Shared"))
        .unwrap();

    assert_eq!(received(&snapshots_a).len(), 2);
    assert_eq!(received(&snapshots_b).len(), 2);
}

#[test]
fn unsubscribing_stops_delivery_synchronously() {
    let store = SqliteActivityStore::new(open_db_in_memory().unwrap());
    let (snapshots, callback) = recording_callback();
    let subscription = store.subscribe(callback).unwrap();

    store
        .create(&ActivityDraft::new("2026-03-10", "Before"))
        .unwrap();
    subscription.unsubscribe();
    store
        .create(&ActivityDraft::new("2026-03-11", "After"))
        .unwrap();

    // Initial snapshot plus the one pre-unsubscribe mutation, nothing more.
    assert_eq!(received(&snapshots).len(), 2);
}

#[test]
fn failed_mutations_do_not_notify_subscribers() {
    let store = SqliteActivityStore::new(open_db_in_memory().unwrap());
    let (snapshots, callback) = recording_callback();
    let _subscription = store.subscribe(callback).unwrap();

    let _ = store.create(&ActivityDraft::new("2026-03-10", ""));
    assert_eq!(received(&snapshots).len(), 1);
}
