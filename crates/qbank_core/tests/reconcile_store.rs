use qbank_core::db::open_db_in_memory;
use qbank_core::repo::record_repo::MEMBERSHIP_QUERY_LIMIT;
use qbank_core::{
    reconcile, split_tokens, Category, RecordRepository, RecordService, SqliteRecordRepository,
};

#[test]
fn search_partitions_found_and_missing_in_input_order() {
    let conn = open_db_in_memory().unwrap();
    let service = RecordService::new(SqliteRecordRepository::try_new(&conn).unwrap());
    service.add_record("3", Some(Category::Wfd), "three").unwrap();
    service.add_record("1", Some(Category::Wfd), "one").unwrap();

    let result = service
        .search_identifiers("1, 2,3 ,, #1 WFD", Category::Wfd)
        .unwrap();
    let found = result
        .found
        .iter()
        .map(|record| record.identifier.as_str())
        .collect::<Vec<_>>();
    let missing = result
        .missing
        .iter()
        .map(|identifier| identifier.value.as_str())
        .collect::<Vec<_>>();
    assert_eq!(found, vec!["#1 WFD", "#3 WFD"]);
    assert_eq!(missing, vec!["#2 WFD"]);
    assert_eq!(result.total(), 3);
}

#[test]
fn search_is_scoped_to_requested_category() {
    let conn = open_db_in_memory().unwrap();
    let service = RecordService::new(SqliteRecordRepository::try_new(&conn).unwrap());
    service.add_record("5", Some(Category::Rs), "repeat").unwrap();

    let result = service.search_identifiers("5", Category::Wfd).unwrap();
    assert!(result.found.is_empty());
    assert!(result.is_missing("#5 WFD"));

    let result = service.search_identifiers("5", Category::Rs).unwrap();
    assert_eq!(result.found.len(), 1);
}

#[test]
fn search_chunks_inputs_beyond_membership_limit() {
    let conn = open_db_in_memory().unwrap();
    let service = RecordService::new(SqliteRecordRepository::try_new(&conn).unwrap());
    let count = MEMBERSHIP_QUERY_LIMIT * 2 + 5;
    for n in (1..=count).step_by(2) {
        service
            .add_record(&n.to_string(), Some(Category::Ra), "stored")
            .unwrap();
    }

    let input = (1..=count)
        .map(|n| n.to_string())
        .collect::<Vec<_>>()
        .join(",");
    let result = service.search_identifiers(&input, Category::Ra).unwrap();

    assert_eq!(result.total(), count);
    assert_eq!(result.found.len(), count.div_ceil(2));
    assert_eq!(result.missing.len(), count / 2);
    assert_eq!(result.found[0].identifier, "RA001");
    assert_eq!(result.missing[0].value, "RA002");
}

#[test]
fn inserted_missing_identifier_is_found_on_next_search() {
    let conn = open_db_in_memory().unwrap();
    let service = RecordService::new(SqliteRecordRepository::try_new(&conn).unwrap());

    let before = service.search_identifiers("12", Category::Rs).unwrap();
    let missing = before.missing[0].clone();
    service
        .add_record(&missing.value, Some(missing.category), "now stored")
        .unwrap();

    let after = service.search_identifiers("12", Category::Rs).unwrap();
    assert!(after.missing.is_empty());
    assert_eq!(after.found[0].identifier, "#12 RS");
}

#[test]
fn pure_reconcile_matches_store_backed_search() {
    let conn = open_db_in_memory().unwrap();
    let service = RecordService::new(SqliteRecordRepository::try_new(&conn).unwrap());
    service.add_record("1", Some(Category::Wfd), "one").unwrap();
    service.add_record("5", Some(Category::Rs), "five").unwrap();
    service.add_record("2", Some(Category::Rs), "two").unwrap();
    let existing = service.repository().list_all().unwrap();

    let input = "1, 2, #5 RS, #9 RS, RA3";
    let tokens = split_tokens(input);
    let pure = reconcile(tokens.as_slice(), Category::Wfd, &existing);
    let stored = service.search_identifiers(input, Category::Wfd).unwrap();

    assert_eq!(stored, pure);
    let found = stored
        .found
        .iter()
        .map(|record| record.identifier.as_str())
        .collect::<Vec<_>>();
    assert_eq!(found, vec!["#1 WFD", "#5 RS"]);
    assert!(stored.is_missing("#2 WFD"));
    assert!(stored.is_missing("#9 RS"));
    assert!(stored.is_missing("#3 WFD"));
}
