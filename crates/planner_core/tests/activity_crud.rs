use planner_core::db::open_db_in_memory;
use planner_core::{
    ActivityDraft, ActivityPatch, ActivityStore, ActivityType, ActivityValidationError,
    SqliteActivityStore, StoreError,
};
use uuid::Uuid;

fn store() -> SqliteActivityStore {
    SqliteActivityStore::new(open_db_in_memory().unwrap())
}

#[test]
fn create_and_get_roundtrip() {
    let store = store();

    let mut draft = ActivityDraft::new("2026-03-10", "Calculus midterm");
    draft.kind = ActivityType::Exam;
    draft.time = "14:00".to_string();
    draft.description = Some("Room 203".to_string());
    let created = store.create(&draft).unwrap();

    let loaded = store.get(created.id).unwrap().unwrap();
    assert_eq!(loaded, created);
    assert_eq!(loaded.kind, ActivityType::Exam);
    assert_eq!(loaded.description.as_deref(), Some("Room 203"));
}

#[test]
fn create_rejects_empty_title_and_leaves_store_unchanged() {
    let store = store();

    let err = store.create(&ActivityDraft::new("2026-03-10", "")).unwrap_err();
    assert!(matches!(
        err,
        StoreError::Validation(ActivityValidationError::EmptyTitle)
    ));
    assert!(store.snapshot().unwrap().is_empty());
}

#[test]
fn create_rejects_missing_date() {
    let store = store();

    let err = store.create(&ActivityDraft::new("", "Midterm")).unwrap_err();
    assert!(matches!(
        err,
        StoreError::Validation(ActivityValidationError::MissingDate)
    ));
}

#[test]
fn update_patches_only_the_given_fields() {
    let store = store();
    let created = store
        .create(&ActivityDraft::new("2026-03-10", "Draft title"))
        .unwrap();

    let patch = ActivityPatch {
        title: Some("Final title".to_string()),
        time: Some("09:30".to_string()),
        ..ActivityPatch::default()
    };
    store.update(created.id, &patch).unwrap();

    let loaded = store.get(created.id).unwrap().unwrap();
    assert_eq!(loaded.title, "Final title");
    assert_eq!(loaded.time, "09:30");
    assert_eq!(loaded.date, "2026-03-10");
    assert_eq!(loaded.kind, created.kind);
}

#[test]
fn update_unknown_id_returns_not_found() {
    let store = store();
    let missing = Uuid::new_v4();

    let err = store
        .update(missing, &ActivityPatch::default())
        .unwrap_err();
    assert!(matches!(err, StoreError::NotFound(id) if id == missing));
}

#[test]
fn delete_removes_the_record_and_reports_stale_ids() {
    let store = store();
    let created = store
        .create(&ActivityDraft::new("2026-03-10", "To be removed"))
        .unwrap();

    store.delete(created.id).unwrap();
    assert!(store.get(created.id).unwrap().is_none());

    let err = store.delete(created.id).unwrap_err();
    assert!(matches!(err, StoreError::NotFound(id) if id == created.id));
}

#[test]
fn move_to_changes_only_the_date() {
    let store = store();
    let mut draft = ActivityDraft::new("2026-03-10", "Lab report");
    draft.time = "16:00".to_string();
    let created = store.create(&draft).unwrap();

    store.move_to(created.id, "2026-03-12").unwrap();

    let loaded = store.get(created.id).unwrap().unwrap();
    assert_eq!(loaded.date, "2026-03-12");
    assert_eq!(loaded.time, "16:00");
    assert_eq!(loaded.title, "Lab report");
}

#[test]
fn snapshot_is_ordered_by_schedule() {
    let store = store();
    let mut late = ActivityDraft::new("2026-03-11", "Later");
    late.time = "10:00".to_string();
    let mut early = ActivityDraft::new("2026-03-10", "Earlier");
    early.time = "12:00".to_string();
    store.create(&late).unwrap();
    store.create(&early).unwrap();

    let titles: Vec<String> = store
        .snapshot()
        .unwrap()
        .into_iter()
        .map(|activity| activity.title)
        .collect();
    assert_eq!(titles, vec!["Earlier".to_string(), "Later".to_string()]);
}

#[test]
fn unknown_persisted_category_falls_back_to_default() {
    let conn = open_db_in_memory().unwrap();
    conn.execute(
        "INSERT INTO activities (uuid, date, time, title, type)
         VALUES (?1, '2026-03-10', '10:00', 'Imported', 'seminar');",
        [Uuid::new_v4().to_string()],
    )
    .unwrap();
    let store = SqliteActivityStore::new(conn);

    let snapshot = store.snapshot().unwrap();
    assert_eq!(snapshot.len(), 1);
    assert_eq!(snapshot[0].kind, ActivityType::default());
}
