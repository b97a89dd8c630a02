use featureboard_core::db::migrations::latest_version;
use featureboard_core::db::open_db_in_memory;
use featureboard_core::{
    FeatureListQuery, FeaturePatch, FeatureRepository, FeatureStatus, NewFeature, RepoError,
    SqliteFeatureRepository,
};
use rusqlite::Connection;
use std::collections::HashSet;
use std::thread::sleep;
use std::time::Duration;

fn new_feature(title: &str, module: &str, status: FeatureStatus, priority: u8) -> NewFeature {
    NewFeature {
        module: module.to_string(),
        status,
        priority,
        ..NewFeature::new(title)
    }
}

#[test]
fn create_and_get_roundtrip() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteFeatureRepository::try_new(&conn).unwrap();

    let created = repo
        .create_feature(&new_feature("Dark mode", "ui", FeatureStatus::Todo, 3))
        .unwrap();
    assert!(created.id > 0);
    assert_eq!(created.created_at, created.updated_at);

    let loaded = repo.get_feature(created.id).unwrap().unwrap();
    assert_eq!(loaded, created);
    assert_eq!(loaded.title, "Dark mode");
    assert_eq!(loaded.module, "ui");
    assert_eq!(loaded.status, FeatureStatus::Todo);
    assert_eq!(loaded.description, None);
}

#[test]
fn created_ids_are_unique_and_never_reused() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteFeatureRepository::try_new(&conn).unwrap();

    let first = repo.create_feature(&NewFeature::new("a")).unwrap();
    let second = repo.create_feature(&NewFeature::new("b")).unwrap();
    repo.delete_feature(second.id).unwrap();
    let third = repo.create_feature(&NewFeature::new("c")).unwrap();

    let ids: HashSet<_> = [first.id, second.id, third.id].into_iter().collect();
    assert_eq!(ids.len(), 3);
    assert!(third.id > second.id);
}

#[test]
fn get_missing_returns_none() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteFeatureRepository::try_new(&conn).unwrap();

    assert!(repo.get_feature(404).unwrap().is_none());
}

#[test]
fn list_orders_by_priority_then_newest_first() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteFeatureRepository::try_new(&conn).unwrap();

    let low = repo
        .create_feature(&new_feature("low", "x", FeatureStatus::Todo, 1))
        .unwrap();
    let high_old = repo
        .create_feature(&new_feature("high old", "x", FeatureStatus::Todo, 5))
        .unwrap();
    let high_new = repo
        .create_feature(&new_feature("high new", "y", FeatureStatus::Done, 5))
        .unwrap();
    let mid = repo
        .create_feature(&new_feature("mid", "y", FeatureStatus::Doing, 3))
        .unwrap();

    let ids: Vec<_> = repo
        .list_features(&FeatureListQuery::default())
        .unwrap()
        .into_iter()
        .map(|feature| feature.id)
        .collect();
    assert_eq!(ids, vec![high_new.id, high_old.id, mid.id, low.id]);
}

#[test]
fn list_orders_by_created_at_within_same_priority() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteFeatureRepository::try_new(&conn).unwrap();

    let older = repo.create_feature(&NewFeature::new("older")).unwrap();
    let newer = repo.create_feature(&NewFeature::new("newer")).unwrap();
    conn.execute(
        "UPDATE features SET created_at = '2020-01-01T00:00:00.000Z' WHERE id = ?1;",
        [newer.id],
    )
    .unwrap();

    let ids: Vec<_> = repo
        .list_features(&FeatureListQuery::default())
        .unwrap()
        .into_iter()
        .map(|feature| feature.id)
        .collect();
    assert_eq!(ids, vec![older.id, newer.id]);
}

#[test]
fn list_filters_are_combined_with_and() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteFeatureRepository::try_new(&conn).unwrap();

    let todo_ui = repo
        .create_feature(&new_feature("a", "ui", FeatureStatus::Todo, 3))
        .unwrap();
    repo.create_feature(&new_feature("b", "api", FeatureStatus::Todo, 3))
        .unwrap();
    repo.create_feature(&new_feature("c", "ui", FeatureStatus::Done, 3))
        .unwrap();

    let todo = repo
        .list_features(&FeatureListQuery {
            status: Some(FeatureStatus::Todo),
            ..FeatureListQuery::default()
        })
        .unwrap();
    assert_eq!(todo.len(), 2);
    assert!(todo.iter().all(|feature| feature.status == FeatureStatus::Todo));

    let todo_in_ui = repo
        .list_features(&FeatureListQuery {
            status: Some(FeatureStatus::Todo),
            module: Some("ui".to_string()),
        })
        .unwrap();
    assert_eq!(todo_in_ui.len(), 1);
    assert_eq!(todo_in_ui[0].id, todo_ui.id);

    let nothing = repo
        .list_features(&FeatureListQuery {
            module: Some("missing".to_string()),
            ..FeatureListQuery::default()
        })
        .unwrap();
    assert!(nothing.is_empty());
}

#[test]
fn update_changes_only_present_fields_and_advances_updated_at() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteFeatureRepository::try_new(&conn).unwrap();

    let mut input = new_feature("A", "x", FeatureStatus::Todo, 3);
    input.description = Some("first draft".to_string());
    let created = repo.create_feature(&input).unwrap();

    sleep(Duration::from_millis(5));
    let patch = FeaturePatch {
        status: Some(FeatureStatus::Doing),
        ..FeaturePatch::default()
    };
    let updated = repo.update_feature(created.id, &patch).unwrap();

    assert_eq!(updated.status, FeatureStatus::Doing);
    assert_eq!(updated.id, created.id);
    assert_eq!(updated.title, created.title);
    assert_eq!(updated.description, created.description);
    assert_eq!(updated.module, created.module);
    assert_eq!(updated.priority, created.priority);
    assert_eq!(updated.created_at, created.created_at);
    assert!(updated.updated_at > created.updated_at);
}

#[test]
fn update_with_same_value_still_refreshes_updated_at() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteFeatureRepository::try_new(&conn).unwrap();

    let created = repo.create_feature(&NewFeature::new("same")).unwrap();
    sleep(Duration::from_millis(5));
    let patch = FeaturePatch {
        priority: Some(created.priority),
        ..FeaturePatch::default()
    };
    let updated = repo.update_feature(created.id, &patch).unwrap();

    assert_eq!(updated.priority, created.priority);
    assert!(updated.updated_at > created.updated_at);
}

#[test]
fn update_can_clear_description() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteFeatureRepository::try_new(&conn).unwrap();

    let mut input = NewFeature::new("with description");
    input.description = Some("to be removed".to_string());
    let created = repo.create_feature(&input).unwrap();

    let patch = FeaturePatch {
        description: Some(None),
        ..FeaturePatch::default()
    };
    let updated = repo.update_feature(created.id, &patch).unwrap();
    assert_eq!(updated.description, None);
}

#[test]
fn empty_patch_returns_existing_record_unchanged() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteFeatureRepository::try_new(&conn).unwrap();

    let created = repo.create_feature(&NewFeature::new("stable")).unwrap();
    sleep(Duration::from_millis(5));
    let unchanged = repo
        .update_feature(created.id, &FeaturePatch::default())
        .unwrap();
    assert_eq!(unchanged, created);
}

#[test]
fn update_not_found_returns_not_found() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteFeatureRepository::try_new(&conn).unwrap();

    let patch = FeaturePatch {
        title: Some("ghost".to_string()),
        ..FeaturePatch::default()
    };
    let err = repo.update_feature(77, &patch).unwrap_err();
    assert!(matches!(err, RepoError::NotFound(77)));

    let err = repo.update_feature(77, &FeaturePatch::default()).unwrap_err();
    assert!(matches!(err, RepoError::NotFound(77)));
}

#[test]
fn delete_is_hard_and_second_delete_is_not_found() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteFeatureRepository::try_new(&conn).unwrap();

    let created = repo.create_feature(&NewFeature::new("doomed")).unwrap();
    repo.delete_feature(created.id).unwrap();

    assert!(repo.get_feature(created.id).unwrap().is_none());
    let err = repo.delete_feature(created.id).unwrap_err();
    assert!(matches!(err, RepoError::NotFound(id) if id == created.id));

    let rows: i64 = conn
        .query_row("SELECT COUNT(*) FROM features;", [], |row| row.get(0))
        .unwrap();
    assert_eq!(rows, 0);
}

#[test]
fn stats_zero_fill_statuses_and_skip_empty_modules() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteFeatureRepository::try_new(&conn).unwrap();

    let empty = repo.feature_stats().unwrap();
    assert_eq!(empty.by_status.total(), 0);
    assert!(empty.by_module.is_empty());

    repo.create_feature(&new_feature("a", "ui", FeatureStatus::Todo, 3))
        .unwrap();
    repo.create_feature(&new_feature("b", "ui", FeatureStatus::Todo, 2))
        .unwrap();
    let moved = repo
        .create_feature(&new_feature("c", "api", FeatureStatus::Done, 4))
        .unwrap();

    let stats = repo.feature_stats().unwrap();
    assert_eq!(stats.by_status.todo, 2);
    assert_eq!(stats.by_status.doing, 0);
    assert_eq!(stats.by_status.done, 1);
    assert_eq!(stats.by_status.total(), 3);
    assert_eq!(stats.by_module.get("ui"), Some(&2));
    assert_eq!(stats.by_module.get("api"), Some(&1));

    repo.delete_feature(moved.id).unwrap();
    let stats = repo.feature_stats().unwrap();
    assert!(!stats.by_module.contains_key("api"));
    assert_eq!(stats.by_status.done, 0);
}

#[test]
fn read_path_rejects_invalid_persisted_priority() {
    let conn = open_db_in_memory().unwrap();
    conn.execute_batch(
        "PRAGMA ignore_check_constraints = ON;
         INSERT INTO features (title, priority) VALUES ('corrupt', 9);
         PRAGMA ignore_check_constraints = OFF;",
    )
    .unwrap();
    let repo = SqliteFeatureRepository::try_new(&conn).unwrap();

    let err = repo.list_features(&FeatureListQuery::default()).unwrap_err();
    assert!(matches!(err, RepoError::InvalidData(_)));
}

#[test]
fn repository_rejects_uninitialized_connection() {
    let conn = Connection::open_in_memory().unwrap();

    let result = SqliteFeatureRepository::try_new(&conn);
    match result {
        Err(RepoError::UninitializedConnection {
            expected_version,
            actual_version: 0,
        }) => assert!(expected_version > 0),
        Err(other) => panic!("unexpected error: {other}"),
        Ok(_) => panic!("expected uninitialized connection error"),
    }
}

#[test]
fn repository_rejects_connection_without_features_table() {
    let conn = Connection::open_in_memory().unwrap();
    conn.execute_batch(&format!("PRAGMA user_version = {};", latest_version()))
        .unwrap();

    let result = SqliteFeatureRepository::try_new(&conn);
    assert!(matches!(
        result,
        Err(RepoError::MissingRequiredTable("features"))
    ));
}

#[test]
fn repository_rejects_connection_missing_required_column() {
    let conn = Connection::open_in_memory().unwrap();
    conn.execute_batch(
        "CREATE TABLE features (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            title TEXT NOT NULL
        );",
    )
    .unwrap();
    conn.execute_batch(&format!("PRAGMA user_version = {};", latest_version()))
        .unwrap();

    let result = SqliteFeatureRepository::try_new(&conn);
    assert!(matches!(
        result,
        Err(RepoError::MissingRequiredColumn {
            table: "features",
            column: "description"
        })
    ));
}
