mod common;

use common::{course_draft, memory_store, notices};
use coursedesk_core::model::record::{FieldMap, FieldValue};
use coursedesk_core::service::courses::CourseService;
use coursedesk_core::store::query::{Condition, FetchQuery, SortDirection, WhereGroup};
use coursedesk_core::store::{RecordStore, RecordUpdate, SqliteRecordStore, StoreError};
use coursedesk_core::{CourseFilter, CourseListView};

fn course_fields(course_id: &str, name: &str, department: &str, credits: i64) -> FieldMap {
    let mut fields = FieldMap::new();
    fields.insert("course_id".to_string(), course_id.into());
    fields.insert("Name".to_string(), name.into());
    fields.insert("department".to_string(), department.into());
    fields.insert("credits".to_string(), credits.into());
    fields
}

fn seeded_store() -> SqliteRecordStore {
    let store = SqliteRecordStore::open_in_memory().unwrap();
    store
        .create_records(
            "course",
            vec![
                course_fields("CS101", "Intro to Programming", "Computer Science", 3),
                course_fields("MATH201", "linear algebra", "Mathematics", 4),
                course_fields("CS301", "Operating Systems", "Computer Science", 4),
                course_fields("PHYS100", "100% Physics", "Physics", 2),
            ],
        )
        .unwrap();
    store
}

fn names(store: &SqliteRecordStore, query: &FetchQuery) -> Vec<String> {
    store
        .fetch_records("course", query)
        .unwrap()
        .iter()
        .map(|record| record.text_or_empty("Name"))
        .collect()
}

#[test]
fn create_returns_stored_records_with_ids() {
    let store = SqliteRecordStore::open_in_memory().unwrap();
    let created = store
        .create_records("course", vec![course_fields("CS101", "Intro", "CS", 3)])
        .unwrap();

    assert_eq!(created.len(), 1);
    assert!(created[0].id > 0);
    assert_eq!(created[0].get("credits"), Some(&FieldValue::Integer(3)));
}

#[test]
fn fetch_is_scoped_to_entity() {
    let store = seeded_store();
    store
        .create_records("department", vec![course_fields("X", "Mathematics", "", 0)])
        .unwrap();

    let all = store
        .fetch_records("course", &FetchQuery::default())
        .unwrap();
    assert_eq!(all.len(), 4);
}

#[test]
fn name_ordering_is_case_insensitive() {
    let store = seeded_store();
    let query = FetchQuery::default().order("Name", SortDirection::Ascending);

    assert_eq!(
        names(&store, &query),
        vec![
            "100% Physics",
            "Intro to Programming",
            "linear algebra",
            "Operating Systems"
        ]
    );
}

#[test]
fn exact_and_contains_conditions_combine() {
    let store = seeded_store();
    let mut query = FetchQuery::default()
        .and_where(Condition::exact("department", "Computer Science"))
        .order("Name", SortDirection::Ascending);
    query.where_groups.push(WhereGroup::any(vec![
        Condition::contains("Name", "SYSTEMS"),
        Condition::contains("course_id", "zzz"),
    ]));

    assert_eq!(names(&store, &query), vec!["Operating Systems"]);
}

#[test]
fn contains_treats_like_wildcards_literally() {
    let store = seeded_store();
    let query = FetchQuery::default().and_where(Condition::contains("Name", "100%"));
    assert_eq!(names(&store, &query), vec!["100% Physics"]);

    let query = FetchQuery::default().and_where(Condition::contains("Name", "_"));
    assert!(names(&store, &query).is_empty());
}

#[test]
fn at_least_compares_numbers_and_limit_applies() {
    let store = seeded_store();
    let query = FetchQuery::default()
        .and_where(Condition::at_least("credits", 4))
        .order("Name", SortDirection::Ascending)
        .limit(1);

    assert_eq!(names(&store, &query), vec!["linear algebra"]);
}

#[test]
fn exact_any_with_no_values_matches_nothing() {
    let store = seeded_store();
    let query = FetchQuery::default().and_where(Condition::exact_any("Id", Vec::<i64>::new()));
    assert!(names(&store, &query).is_empty());
}

#[test]
fn field_names_are_validated() {
    let store = seeded_store();
    let query = FetchQuery::default().and_where(Condition::exact("Name') OR 1=1 --", "x"));

    let err = store.fetch_records("course", &query).unwrap_err();
    assert!(matches!(err, StoreError::InvalidField(_)));
}

#[test]
fn selected_fields_limit_returned_data() {
    let store = seeded_store();
    let query = FetchQuery::select(&["Name"]);
    let records = store.fetch_records("course", &query).unwrap();

    assert!(records.iter().all(|record| record.get("credits").is_none()));
    assert!(records.iter().all(|record| record.get("Name").is_some()));
}

#[test]
fn update_merges_fields_and_keeps_the_rest() {
    let store = seeded_store();
    let target = store
        .fetch_records(
            "course",
            &FetchQuery::default().and_where(Condition::exact("course_id", "CS101")),
        )
        .unwrap()
        .remove(0);

    let mut fields = FieldMap::new();
    fields.insert("credits".to_string(), 5.into());
    let updated = store
        .update_records(
            "course",
            vec![RecordUpdate {
                id: target.id,
                fields,
            }],
        )
        .unwrap();

    assert_eq!(updated[0].integer("course", "credits").ok(), Some(5));
    assert_eq!(updated[0].text_or_empty("course_id"), "CS101");

    let reloaded = store
        .get_record_by_id("course", target.id, &[])
        .unwrap()
        .unwrap();
    assert_eq!(reloaded.integer("course", "credits").ok(), Some(5));
}

#[test]
fn update_and_delete_of_missing_record_report_not_found() {
    let store = seeded_store();

    let err = store
        .update_records(
            "course",
            vec![RecordUpdate {
                id: 9_999,
                fields: FieldMap::new(),
            }],
        )
        .unwrap_err();
    assert!(matches!(err, StoreError::NotFound { id: 9_999, .. }));

    let err = store.delete_records("course", &[9_999]).unwrap_err();
    assert!(matches!(err, StoreError::NotFound { .. }));
}

#[test]
fn delete_removes_record() {
    let store = seeded_store();
    let first = store
        .fetch_records("course", &FetchQuery::default())
        .unwrap()
        .remove(0);

    store.delete_records("course", &[first.id]).unwrap();
    assert!(store
        .get_record_by_id("course", first.id, &[])
        .unwrap()
        .is_none());
}

#[test]
fn records_survive_reopening_a_file_database() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("courses.db");

    let store = SqliteRecordStore::open(&path).unwrap();
    store
        .create_records("course", vec![course_fields("CS101", "Intro", "CS", 3)])
        .unwrap();
    drop(store);

    let reopened = SqliteRecordStore::open(&path).unwrap();
    assert_eq!(
        reopened
            .fetch_records("course", &FetchQuery::default())
            .unwrap()
            .len(),
        1
    );
}

#[test]
fn contains_folds_case_of_non_ascii_text() {
    let store = SqliteRecordStore::open_in_memory().unwrap();
    store
        .create_records(
            "course",
            vec![
                course_fields("FR101", "École de français", "Languages", 3),
                course_fields("DE101", "Straße und Stadt", "Languages", 3),
            ],
        )
        .unwrap();

    let query = FetchQuery::default().and_where(Condition::contains("Name", "école"));
    assert_eq!(names(&store, &query), vec!["École de français"]);

    let query = FetchQuery::default().and_where(Condition::contains("Name", "STRASSE"));
    assert!(names(&store, &query).is_empty());
    let query = FetchQuery::default().and_where(Condition::contains("Name", "STRAẞE"));
    assert_eq!(names(&store, &query), vec!["Straße und Stadt"]);
}

#[test]
fn accented_search_matches_in_store_and_view_alike() {
    let (_queue, notifier) = notices();
    let service = CourseService::new(memory_store(), notifier);
    service
        .create(&course_draft("FR101", "École de français", "Languages", "Fall 2023"))
        .unwrap();
    service
        .create(&course_draft("CS101", "Intro", "Computer Science", "Fall 2023"))
        .unwrap();

    let filter = CourseFilter::new("école", "All", "All");
    let store_hits = service.list(&filter).unwrap();

    let mut view = CourseListView::new();
    view.refresh(&service).unwrap();
    view.set_search("école");
    let local_hits = view.visible();

    assert_eq!(store_hits.len(), 1);
    assert_eq!(local_hits.len(), 1);
    assert_eq!(store_hits[0].course_id, local_hits[0].course_id);
}
