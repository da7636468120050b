mod common;

use chrono::NaiveDate;
use common::{course_draft, memory_store, notices, FailingStore};
use coursedesk_core::model::assignment::AssignmentDraft;
use coursedesk_core::model::enrollment::Enrollment;
use coursedesk_core::model::schema::Entity;
use coursedesk_core::model::student::StudentDraft;
use coursedesk_core::service::assignments::AssignmentService;
use coursedesk_core::service::course_detail::CourseDetailService;
use coursedesk_core::service::courses::CourseService;
use coursedesk_core::service::enrollments::EnrollmentService;
use coursedesk_core::service::students::StudentService;
use coursedesk_core::ServiceError;

#[test]
fn load_combines_course_assignments_and_roster() {
    let store = memory_store();
    let (_queue, notifier) = notices();
    let course = CourseService::new(store.clone(), notifier.clone())
        .create(&course_draft("CS101", "Intro", "Computer Science", "Fall 2023"))
        .unwrap()
        .unwrap();
    let assignments = AssignmentService::new(store.clone(), notifier.clone());
    for (title, day) in [("Late", "2024-05-01"), ("Early", "2024-01-15")] {
        assignments
            .create(&AssignmentDraft {
                title: title.to_string(),
                due_date: NaiveDate::parse_from_str(day, "%Y-%m-%d").unwrap(),
                description: String::new(),
                course: course.id,
                tags: String::new(),
            })
            .unwrap();
    }
    let student = StudentService::new(store.clone(), notifier.clone())
        .create(&StudentDraft {
            student_id: "S001".to_string(),
            full_name: "Ada".to_string(),
            email: "ada@example.edu".to_string(),
            tags: String::new(),
        })
        .unwrap()
        .unwrap();
    EnrollmentService::new(store.clone(), notifier.clone())
        .enroll(student.id, course.id)
        .unwrap();

    let detail = CourseDetailService::new(store, notifier);
    let overview = detail.load(course.id).unwrap().unwrap();

    assert_eq!(overview.course, course);
    assert_eq!(
        overview
            .assignments
            .iter()
            .map(|assignment| assignment.title.as_str())
            .collect::<Vec<_>>(),
        vec!["Early", "Late"]
    );
    assert_eq!(overview.students.len(), 1);
    assert_eq!(overview.students[0].student.id, student.id);
}

#[test]
fn missing_course_is_none() {
    let (_queue, notifier) = notices();
    let detail = CourseDetailService::new(memory_store(), notifier);
    assert!(detail.load(42).unwrap().is_none());
}

#[test]
fn failing_related_fetch_fails_the_load() {
    let store = memory_store();
    let (_queue, notifier) = notices();
    let course = CourseService::new(store.clone(), notifier.clone())
        .create(&course_draft("CS101", "Intro", "Computer Science", "Fall 2023"))
        .unwrap()
        .unwrap();

    let detail = CourseDetailService::new(FailingStore::new(store, Enrollment::ENTITY), notifier);
    let err = detail.load(course.id).unwrap_err();
    assert!(matches!(err, ServiceError::Store(_)));
}
