mod common;

use common::{course_draft, memory_store, notices, FailingStore};
use coursedesk_core::model::course::Course;
use coursedesk_core::model::schema::Entity;
use coursedesk_core::notify::NoticeLevel;
use coursedesk_core::service::courses::CourseService;
use coursedesk_core::store::query::FetchQuery;
use coursedesk_core::store::RecordStore;
use coursedesk_core::{CourseFilter, ServiceError};

#[test]
fn created_course_appears_in_unfiltered_list() {
    let (queue, notifier) = notices();
    let service = CourseService::new(memory_store(), notifier);

    let created = service
        .create(&course_draft("CS999", "Test", "Computer Science", "Fall 2023"))
        .unwrap()
        .unwrap();
    assert_eq!(created.course_id, "CS999");
    assert_eq!(created.credits, 3);

    let listed = service.list(&CourseFilter::default()).unwrap();
    assert_eq!(listed, vec![created]);
    assert!(queue.drain().is_empty());
}

#[test]
fn credits_outside_range_are_rejected_without_notice() {
    let (queue, notifier) = notices();
    let store = memory_store();
    let service = CourseService::new(store.clone(), notifier);

    for credits in [0, 7] {
        let mut draft = course_draft("CS100", "Intro", "Computer Science", "Fall 2023");
        draft.credits = credits;
        match service.create(&draft).unwrap_err() {
            ServiceError::Validation(errors) => {
                assert_eq!(errors.get("credits"), Some("Credits must be between 1 and 6"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    for credits in [1, 6] {
        let mut draft = course_draft(&format!("CS10{credits}"), "Intro", "CS", "Fall 2023");
        draft.credits = credits;
        assert!(service.create(&draft).unwrap().is_some());
    }

    assert!(queue.drain().is_empty());
    assert_eq!(
        store.fetch_records("course", &FetchQuery::default()).unwrap().len(),
        2
    );
}

#[test]
fn update_cannot_change_business_id() {
    let (_queue, notifier) = notices();
    let service = CourseService::new(memory_store(), notifier);
    let created = service
        .create(&course_draft("CS101", "Intro", "Computer Science", "Fall 2023"))
        .unwrap()
        .unwrap();

    let mut draft = created.to_draft();
    draft.course_id = "HACKED".to_string();
    draft.name = "Intro to Programming".to_string();
    draft.credits = 4;
    let updated = service.update(created.id, &draft).unwrap().unwrap();

    assert_eq!(updated.course_id, "CS101");
    assert_eq!(updated.name, "Intro to Programming");
    assert_eq!(updated.credits, 4);
}

#[test]
fn search_and_category_filters_run_in_the_store() {
    let (_queue, notifier) = notices();
    let service = CourseService::new(memory_store(), notifier);
    for draft in [
        course_draft("CS101", "Intro to Programming", "Computer Science", "Fall 2023"),
        course_draft("CS201", "Data Structures", "Computer Science", "Spring 2024"),
        course_draft("MATH101", "Calculus", "Mathematics", "Fall 2023"),
    ] {
        service.create(&draft).unwrap();
    }

    let ids = |filter: &CourseFilter| {
        service
            .list(filter)
            .unwrap()
            .into_iter()
            .map(|course| course.course_id)
            .collect::<Vec<_>>()
    };

    assert_eq!(ids(&CourseFilter::new("cs101", "All", "All")), vec!["CS101"]);
    assert_eq!(
        ids(&CourseFilter::new("", "Computer Science", "Fall 2023")),
        vec!["CS101"]
    );
    assert_eq!(
        ids(&CourseFilter::new("lovelace", "All", "All")),
        vec!["MATH101", "CS201", "CS101"]
    );
    assert_eq!(ids(&CourseFilter::default()).len(), 3);
}

#[test]
fn recent_returns_newest_first_with_limit() {
    let (_queue, notifier) = notices();
    let service = CourseService::new(memory_store(), notifier);
    for index in 1..=6 {
        service
            .create(&course_draft(
                &format!("CS10{index}"),
                &format!("Course {index}"),
                "Computer Science",
                "Fall 2023",
            ))
            .unwrap();
    }

    let recent = service.recent(None).unwrap();
    let ids = recent
        .iter()
        .map(|course| course.course_id.as_str())
        .collect::<Vec<_>>();
    assert_eq!(ids, vec!["CS106", "CS105", "CS104", "CS103"]);
    assert_eq!(service.recent(Some(2)).unwrap().len(), 2);
}

#[test]
fn store_failure_is_notified_once_and_returned() {
    let (queue, notifier) = notices();
    let service: CourseService<FailingStore> =
        CourseService::new(FailingStore::new(memory_store(), Course::ENTITY), notifier);

    let err = service.list(&CourseFilter::default()).unwrap_err();
    assert!(matches!(err, ServiceError::Store(_)));

    let pending = queue.drain();
    assert_eq!(pending.len(), 1);
    assert_eq!(pending[0].level, NoticeLevel::Error);
    assert_eq!(pending[0].message, "Failed to fetch courses");
}

#[test]
fn find_by_business_id_is_exact() {
    let (_queue, notifier) = notices();
    let service = CourseService::new(memory_store(), notifier);
    service
        .create(&course_draft("CS101", "Intro", "Computer Science", "Fall 2023"))
        .unwrap();

    assert!(service.find_by_business_id("CS101").unwrap().is_some());
    assert!(service.find_by_business_id("cs10").unwrap().is_none());
}
