use qbank_core::db::open_db_in_memory;
use qbank_core::service::interchange::ImportError;
use qbank_core::{
    BulkProgress, Category, ItemOutcome, NormalizationError, Normalizer, NormalizerConfig,
    RecordListQuery, RecordService, RepoError, ServiceError, SqliteRecordRepository,
};
use uuid::Uuid;

#[test]
fn add_record_normalizes_identifier_and_reads_back() {
    let conn = open_db_in_memory().unwrap();
    let service = RecordService::new(SqliteRecordRepository::try_new(&conn).unwrap());

    let record = service
        .add_record("  12 ", Some(Category::Rs), "  Please repeat this.  ")
        .unwrap();
    assert!(record.id.is_some());
    assert_eq!(record.category, Category::Rs);
    assert_eq!(record.identifier, "#12 RS");
    assert_eq!(record.content, "Please repeat this.");
    assert_eq!(record.version, 1);

    let ra = service.add_record("7", Some(Category::Ra), "answer").unwrap();
    assert_eq!(ra.identifier, "RA007");
}

#[test]
fn add_record_uses_configured_default_category() {
    let conn = open_db_in_memory().unwrap();
    let normalizer = Normalizer::new(NormalizerConfig {
        default_category: Category::Rs,
    });
    let service =
        RecordService::with_normalizer(SqliteRecordRepository::try_new(&conn).unwrap(), normalizer);

    let record = service.add_record("418", None, "text").unwrap();
    assert_eq!(record.identifier, "#418 RS");
}

#[test]
fn add_record_rejects_duplicates_within_category_only() {
    let conn = open_db_in_memory().unwrap();
    let service = RecordService::new(SqliteRecordRepository::try_new(&conn).unwrap());

    service.add_record("5", Some(Category::Wfd), "first").unwrap();
    let err = service
        .add_record("#5 WFD", None, "second")
        .unwrap_err();
    assert!(matches!(
        err,
        ServiceError::DuplicateIdentifier(ref identifier) if identifier.value == "#5 WFD"
    ));

    service.add_record("5", Some(Category::Rs), "other category").unwrap();
}

#[test]
fn add_record_reports_normalization_and_validation_failures() {
    let conn = open_db_in_memory().unwrap();
    let service = RecordService::new(SqliteRecordRepository::try_new(&conn).unwrap());

    assert!(matches!(
        service.add_record("   ", None, "text"),
        Err(ServiceError::Normalization(NormalizationError::EmptyInput))
    ));
    assert!(matches!(
        service.add_record("abc", None, "text"),
        Err(ServiceError::Normalization(NormalizationError::NoDigitsFound(_)))
    ));
    assert!(matches!(
        service.add_record("3", Some(Category::Wfd), "   "),
        Err(ServiceError::Repo(RepoError::Validation(_)))
    ));
}

#[test]
fn add_many_continues_past_failures_and_duplicates() {
    let conn = open_db_in_memory().unwrap();
    let service = RecordService::new(SqliteRecordRepository::try_new(&conn).unwrap());
    service.add_record("2", Some(Category::Wfd), "existing").unwrap();

    let mut seen = Vec::new();
    let report = service.add_many("1, 2, abc, 3", Some(Category::Wfd), "shared", |progress| {
        seen.push(progress)
    });

    assert_eq!(report.total(), 4);
    assert_eq!(report.inserted_count(), 2);
    assert_eq!(report.skipped_count(), 1);
    assert_eq!(report.failed_count(), 1);
    assert!(!report.is_complete_success());
    assert_eq!(report.items[1].outcome, ItemOutcome::SkippedDuplicate);
    assert!(matches!(report.items[2].outcome, ItemOutcome::Failed { .. }));
    assert_eq!(
        seen.last(),
        Some(&BulkProgress {
            completed: 4,
            total: 4
        })
    );
    assert_eq!(seen.len(), 4);

    let stored = service
        .list_records(&RecordListQuery::default())
        .unwrap()
        .into_iter()
        .map(|record| record.identifier)
        .collect::<Vec<_>>();
    assert_eq!(stored, vec!["#1 WFD", "#2 WFD", "#3 WFD"]);
}

#[test]
fn import_block_inserts_parsed_lines_and_reports_rejects() {
    let conn = open_db_in_memory().unwrap();
    let service = RecordService::new(SqliteRecordRepository::try_new(&conn).unwrap());

    let text = "#418 WFD Music shapes emotions.\n\
                not a question\n\
                #12RS   Say it again.\n\
                RA001 Describe the chart.\n\
                #418 WFD Duplicate line.";
    let report = service.import_block(text, |_| {});

    assert_eq!(report.rejected_lines.len(), 1);
    assert_eq!(report.rejected_lines[0].line_number, 2);
    assert_eq!(report.bulk.total(), 4);
    assert_eq!(report.bulk.inserted_count(), 3);
    assert_eq!(report.bulk.skipped_count(), 1);

    let rs = service
        .list_records(&RecordListQuery {
            category: Some(Category::Rs),
            search_term: None,
        })
        .unwrap();
    assert_eq!(rs.len(), 1);
    assert_eq!(rs[0].identifier, "#12 RS");
    assert_eq!(rs[0].content, "Say it again.");
}

#[test]
fn import_json_is_all_or_nothing_on_validation() {
    let conn = open_db_in_memory().unwrap();
    let service = RecordService::new(SqliteRecordRepository::try_new(&conn).unwrap());

    let invalid = r##"[
        {"questionNo": "#1 WFD", "type": "WFD", "content": "ok"},
        {"questionNo": "12", "type": "WFD", "content": "bare number"}
    ]"##;
    let err = service.import_json(invalid, |_| {}).unwrap_err();
    assert!(matches!(
        err,
        ServiceError::InvalidImport(ImportError::InvalidIdentifier { index: 1, .. })
    ));
    assert!(service
        .list_records(&RecordListQuery::default())
        .unwrap()
        .is_empty());

    let valid = r##"[
        {"questionNo": "#1 WFD", "type": "WFD", "content": "one"},
        {"questionNo": "RA002", "type": "RA", "content": "two"}
    ]"##;
    let report = service.import_json(valid, |_| {}).unwrap();
    assert_eq!(report.inserted_count(), 2);
}

#[test]
fn list_records_filters_and_sorts_by_number() {
    let conn = open_db_in_memory().unwrap();
    let service = RecordService::new(SqliteRecordRepository::try_new(&conn).unwrap());
    service.add_record("10", Some(Category::Wfd), "Ten apples").unwrap();
    service.add_record("2", Some(Category::Wfd), "Two pears").unwrap();
    service.add_record("1", Some(Category::Rs), "One APPLE").unwrap();

    let all = service.list_records(&RecordListQuery::default()).unwrap();
    let numbers = all
        .iter()
        .map(|record| record.identifier.as_str())
        .collect::<Vec<_>>();
    assert_eq!(numbers, vec!["#1 RS", "#2 WFD", "#10 WFD"]);

    let apples = service
        .list_records(&RecordListQuery {
            category: None,
            search_term: Some("apple".to_string()),
        })
        .unwrap();
    assert_eq!(apples.len(), 2);

    let wfd_apples = service
        .list_records(&RecordListQuery {
            category: Some(Category::Wfd),
            search_term: Some("  APPLE ".to_string()),
        })
        .unwrap();
    assert_eq!(wfd_apples.len(), 1);
    assert_eq!(wfd_apples[0].identifier, "#10 WFD");
}

#[test]
fn edit_record_normalizes_within_category_and_checks_version() {
    let conn = open_db_in_memory().unwrap();
    let service = RecordService::new(SqliteRecordRepository::try_new(&conn).unwrap());
    let record = service.add_record("4", Some(Category::Ra), "draft").unwrap();
    let id = record.id.unwrap();

    let edited = service
        .edit_record(id, Some("40"), Some("final"), record.version)
        .unwrap();
    assert_eq!(edited.identifier, "RA040");
    assert_eq!(edited.content, "final");
    assert_eq!(edited.version, 2);

    let err = service
        .edit_record(id, None, Some("stale"), record.version)
        .unwrap_err();
    assert!(matches!(err, ServiceError::Repo(RepoError::Conflict { .. })));
}

#[test]
fn edit_record_rejects_taken_identifier() {
    let conn = open_db_in_memory().unwrap();
    let service = RecordService::new(SqliteRecordRepository::try_new(&conn).unwrap());
    service.add_record("1", Some(Category::Wfd), "one").unwrap();
    let two = service.add_record("2", Some(Category::Wfd), "two").unwrap();

    let err = service
        .edit_record(two.id.unwrap(), Some("1"), None, two.version)
        .unwrap_err();
    assert!(matches!(err, ServiceError::DuplicateIdentifier(_)));

    let unchanged = service
        .edit_record(two.id.unwrap(), Some("#2 WFD"), None, two.version)
        .unwrap();
    assert_eq!(unchanged, two);
}

#[test]
fn edit_and_delete_missing_record_report_not_found() {
    let conn = open_db_in_memory().unwrap();
    let service = RecordService::new(SqliteRecordRepository::try_new(&conn).unwrap());
    let missing = Uuid::new_v4();

    assert!(matches!(
        service.edit_record(missing, None, Some("x"), 1),
        Err(ServiceError::RecordNotFound(id)) if id == missing
    ));
    assert!(matches!(
        service.delete_record(missing),
        Err(ServiceError::RecordNotFound(id)) if id == missing
    ));
}

#[test]
fn delete_record_removes_it_from_listing() {
    let conn = open_db_in_memory().unwrap();
    let service = RecordService::new(SqliteRecordRepository::try_new(&conn).unwrap());
    let record = service.add_record("8", Some(Category::Rs), "bye").unwrap();

    service.delete_record(record.id.unwrap()).unwrap();
    assert!(service.get_record(record.id.unwrap()).unwrap().is_none());
}
