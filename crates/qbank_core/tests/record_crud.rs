use qbank_core::db::migrations::latest_version;
use qbank_core::db::open_db_in_memory;
use qbank_core::repo::record_repo::MEMBERSHIP_QUERY_LIMIT;
use qbank_core::{
    Category, Record, RecordField, RecordPatch, RecordRepository, RepoError,
    SqliteRecordRepository,
};
use rusqlite::Connection;
use uuid::Uuid;

#[test]
fn insert_and_get_roundtrip() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteRecordRepository::try_new(&conn).unwrap();

    let record = Record::new(Category::Wfd, "#12 WFD", "The library is closed today.");
    let id = repo.insert(&record).unwrap();

    let loaded = repo.get(id).unwrap().unwrap();
    assert_eq!(loaded.id, Some(id));
    assert_eq!(loaded.category, Category::Wfd);
    assert_eq!(loaded.identifier, "#12 WFD");
    assert_eq!(loaded.content, "The library is closed today.");
    assert_eq!(loaded.version, 1);
}

#[test]
fn get_missing_record_returns_none() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteRecordRepository::try_new(&conn).unwrap();

    assert!(repo.get(Uuid::new_v4()).unwrap().is_none());
}

#[test]
fn insert_rejects_invalid_records() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteRecordRepository::try_new(&conn).unwrap();

    let blank = Record::new(Category::Rs, "#1 RS", "   ");
    assert!(matches!(repo.insert(&blank), Err(RepoError::Validation(_))));

    let wrong_shape = Record::new(Category::Ra, "#1 RA", "text");
    assert!(matches!(
        repo.insert(&wrong_shape),
        Err(RepoError::Validation(_))
    ));
    assert!(repo.list_all().unwrap().is_empty());
}

#[test]
fn list_all_keeps_insertion_order() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteRecordRepository::try_new(&conn).unwrap();

    for identifier in ["#3 WFD", "#1 WFD", "#2 WFD"] {
        repo.insert(&Record::new(Category::Wfd, identifier, "text"))
            .unwrap();
    }

    let identifiers = repo
        .list_all()
        .unwrap()
        .into_iter()
        .map(|record| record.identifier)
        .collect::<Vec<_>>();
    assert_eq!(identifiers, vec!["#3 WFD", "#1 WFD", "#2 WFD"]);
}

#[test]
fn query_by_equality_matches_exact_field_value() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteRecordRepository::try_new(&conn).unwrap();
    repo.insert(&Record::new(Category::Rs, "#5 RS", "five")).unwrap();
    repo.insert(&Record::new(Category::Ra, "RA005", "five")).unwrap();

    let by_identifier = repo
        .query_by_equality(RecordField::Identifier, "#5 RS")
        .unwrap();
    assert_eq!(by_identifier.len(), 1);
    assert_eq!(by_identifier[0].category, Category::Rs);

    let by_category = repo.query_by_equality(RecordField::Category, "RA").unwrap();
    assert_eq!(by_category.len(), 1);
    assert_eq!(by_category[0].identifier, "RA005");

    let by_content = repo.query_by_equality(RecordField::Content, "five").unwrap();
    assert_eq!(by_content.len(), 2);
}

#[test]
fn query_by_membership_enforces_limit() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteRecordRepository::try_new(&conn).unwrap();
    repo.insert(&Record::new(Category::Wfd, "#1 WFD", "one")).unwrap();

    let at_limit = (1..=MEMBERSHIP_QUERY_LIMIT)
        .map(|n| format!("#{n} WFD"))
        .collect::<Vec<_>>();
    let found = repo
        .query_by_membership(RecordField::Identifier, &at_limit)
        .unwrap();
    assert_eq!(found.len(), 1);

    let over_limit = (1..=MEMBERSHIP_QUERY_LIMIT + 1)
        .map(|n| format!("#{n} WFD"))
        .collect::<Vec<_>>();
    let err = repo
        .query_by_membership(RecordField::Identifier, &over_limit)
        .unwrap_err();
    assert!(matches!(
        err,
        RepoError::MembershipLimitExceeded {
            requested,
            limit,
        } if requested == MEMBERSHIP_QUERY_LIMIT + 1 && limit == MEMBERSHIP_QUERY_LIMIT
    ));

    assert!(repo
        .query_by_membership(RecordField::Identifier, &[])
        .unwrap()
        .is_empty());
}

#[test]
fn update_bumps_version_and_applies_patch() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteRecordRepository::try_new(&conn).unwrap();
    let id = repo
        .insert(&Record::new(Category::Wfd, "#7 WFD", "draft"))
        .unwrap();

    let patch = RecordPatch {
        identifier: None,
        content: Some("final".to_string()),
    };
    let updated = repo.update(id, &patch, 1).unwrap();
    assert_eq!(updated.content, "final");
    assert_eq!(updated.identifier, "#7 WFD");
    assert_eq!(updated.version, 2);

    let loaded = repo.get(id).unwrap().unwrap();
    assert_eq!(loaded, updated);
}

#[test]
fn update_with_stale_version_conflicts_and_leaves_row_unchanged() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteRecordRepository::try_new(&conn).unwrap();
    let id = repo
        .insert(&Record::new(Category::Rs, "#2 RS", "original"))
        .unwrap();
    let first = RecordPatch {
        identifier: None,
        content: Some("first writer".to_string()),
    };
    repo.update(id, &first, 1).unwrap();

    let second = RecordPatch {
        identifier: None,
        content: Some("second writer".to_string()),
    };
    let err = repo.update(id, &second, 1).unwrap_err();
    assert!(matches!(
        err,
        RepoError::Conflict {
            expected_version: 1,
            actual_version: 2,
            ..
        }
    ));

    let loaded = repo.get(id).unwrap().unwrap();
    assert_eq!(loaded.content, "first writer");
    assert_eq!(loaded.version, 2);
}

#[test]
fn update_rejects_non_canonical_identifier() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteRecordRepository::try_new(&conn).unwrap();
    let id = repo
        .insert(&Record::new(Category::Ra, "RA010", "text"))
        .unwrap();

    let patch = RecordPatch {
        identifier: Some("#10 RA".to_string()),
        content: None,
    };
    assert!(matches!(
        repo.update(id, &patch, 1),
        Err(RepoError::Validation(_))
    ));
}

#[test]
fn update_and_delete_missing_record_return_not_found() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteRecordRepository::try_new(&conn).unwrap();
    let missing = Uuid::new_v4();

    let patch = RecordPatch {
        identifier: None,
        content: Some("x".to_string()),
    };
    assert!(matches!(
        repo.update(missing, &patch, 1),
        Err(RepoError::NotFound(id)) if id == missing
    ));
    assert!(matches!(
        repo.delete(missing),
        Err(RepoError::NotFound(id)) if id == missing
    ));
}

#[test]
fn delete_removes_record() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteRecordRepository::try_new(&conn).unwrap();
    let id = repo
        .insert(&Record::new(Category::Wfd, "#9 WFD", "gone soon"))
        .unwrap();

    repo.delete(id).unwrap();
    assert!(repo.get(id).unwrap().is_none());
}

#[test]
fn try_new_rejects_unmigrated_connection() {
    let conn = Connection::open_in_memory().unwrap();
    let err = SqliteRecordRepository::try_new(&conn).err().unwrap();
    assert!(matches!(
        err,
        RepoError::UninitializedConnection {
            actual_version: 0,
            ..
        }
    ));
}

#[test]
fn try_new_rejects_missing_table() {
    let conn = Connection::open_in_memory().unwrap();
    conn.execute_batch(&format!("PRAGMA user_version = {};", latest_version()))
        .unwrap();

    let err = SqliteRecordRepository::try_new(&conn).err().unwrap();
    assert!(matches!(err, RepoError::MissingRequiredTable("records")));
}

#[test]
fn try_new_rejects_missing_column() {
    let conn = Connection::open_in_memory().unwrap();
    conn.execute_batch(&format!(
        "CREATE TABLE records (id TEXT PRIMARY KEY, category TEXT, identifier TEXT, content TEXT);
         PRAGMA user_version = {};",
        latest_version()
    ))
    .unwrap();

    let err = SqliteRecordRepository::try_new(&conn).err().unwrap();
    assert!(matches!(
        err,
        RepoError::MissingRequiredColumn {
            table: "records",
            column: "version",
        }
    ));
}

#[test]
fn reading_invalid_persisted_row_fails() {
    let conn = open_db_in_memory().unwrap();
    conn.execute(
        "INSERT INTO records (id, category, identifier, content)
         VALUES ('not-a-uuid', 'WFD', '#1 WFD', 'text');",
        [],
    )
    .unwrap();
    let repo = SqliteRecordRepository::try_new(&conn).unwrap();

    assert!(matches!(repo.list_all(), Err(RepoError::InvalidData(_))));
}
