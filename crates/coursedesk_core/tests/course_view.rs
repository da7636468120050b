mod common;

use common::{course_draft, memory_store, notices, FailingStore};
use coursedesk_core::model::course::Course;
use coursedesk_core::model::schema::Entity;
use coursedesk_core::notify::NoticeLevel;
use coursedesk_core::service::courses::CourseService;
use coursedesk_core::{
    CourseField, CourseForm, CourseListView, FormError, FormMode, FormState, SqliteRecordStore,
};
use std::sync::Arc;

fn loaded_view() -> (CourseService<Arc<SqliteRecordStore>>, CourseListView) {
    let (_queue, notifier) = notices();
    let service = CourseService::new(memory_store(), notifier);
    for draft in [
        course_draft("CS101", "Intro to Programming", "Computer Science", "Fall 2023"),
        course_draft("CS201", "Data Structures", "Computer Science", "Spring 2024"),
        course_draft("MATH101", "Calculus", "Mathematics", "Fall 2023"),
    ] {
        service.create(&draft).unwrap();
    }
    let mut view = CourseListView::new();
    view.refresh(&service).unwrap();
    (service, view)
}

fn visible_ids(view: &CourseListView) -> Vec<&str> {
    view.visible()
        .into_iter()
        .map(|course| course.course_id.as_str())
        .collect()
}

#[test]
fn search_is_case_insensitive_and_reset_restores_full_list() {
    let (_service, mut view) = loaded_view();

    view.set_search("cs101");
    assert_eq!(visible_ids(&view), vec!["CS101"]);

    view.set_search("");
    view.set_department("Computer Science");
    view.set_term("Spring 2024");
    assert_eq!(visible_ids(&view), vec!["CS201"]);

    view.reset_filters();
    assert!(view.filter().is_default());
    assert_eq!(visible_ids(&view).len(), 3);
}

#[test]
fn term_options_come_from_loaded_courses() {
    let (_service, view) = loaded_view();
    let labels = view
        .term_options()
        .into_iter()
        .map(|option| option.label)
        .collect::<Vec<_>>();
    assert_eq!(labels, vec!["All Terms", "Fall 2023", "Spring 2024"]);
}

#[test]
fn form_create_appends_course_and_closes() {
    let (service, mut view) = loaded_view();
    let (queue, notifier) = notices();
    let mut form = CourseForm::new(notifier);

    form.open_new();
    assert_eq!(form.values().department, "Computer Science");
    assert_eq!(form.values().credits, "3");
    assert_eq!(form.values().term, "Fall 2023");

    form.set_field(CourseField::Id, "CS999").unwrap();
    form.set_field(CourseField::Name, "Test").unwrap();
    form.set_field(CourseField::Instructor, "Dr. X").unwrap();

    let created = form.submit(&service, &mut view).unwrap();
    assert_eq!(created.course_id, "CS999");
    assert_eq!(form.state(), FormState::Closed);
    assert!(view.courses().iter().any(|course| course.course_id == "CS999"));

    let pending = queue.drain();
    assert_eq!(pending.len(), 1);
    assert_eq!(pending[0].level, NoticeLevel::Success);
}

#[test]
fn duplicate_business_id_blocks_create_but_not_edit() {
    let (service, mut view) = loaded_view();
    let (queue, notifier) = notices();
    let mut form = CourseForm::new(notifier);

    form.open_new();
    form.set_field(CourseField::Id, "CS101").unwrap();
    form.set_field(CourseField::Name, "Duplicate").unwrap();
    form.set_field(CourseField::Instructor, "Dr. X").unwrap();
    assert!(matches!(
        form.submit(&service, &mut view),
        Err(FormError::Invalid(_))
    ));
    assert_eq!(form.errors().get("id"), Some("Course ID already exists"));
    assert_eq!(form.state(), FormState::Editing);
    assert_eq!(queue.drain().len(), 1);

    let existing = view
        .courses()
        .iter()
        .find(|course| course.course_id == "CS101")
        .cloned()
        .unwrap();
    form.cancel().unwrap();
    form.open_edit(&existing);
    assert_eq!(form.mode(), FormMode::Edit(existing.id));
    form.set_field(CourseField::Credits, "5").unwrap();

    let updated = form.submit(&service, &mut view).unwrap();
    assert_eq!(updated.id, existing.id);
    assert_eq!(updated.credits, 5);
    assert_eq!(view.courses().len(), 3);
    assert_eq!(
        view.courses()
            .iter()
            .find(|course| course.id == existing.id)
            .map(|course| course.credits),
        Some(5)
    );
}

#[test]
fn service_failure_returns_to_editing_with_values_kept() {
    let (_queue, notifier) = notices();
    let service = CourseService::new(
        FailingStore::new(memory_store(), Course::ENTITY),
        notifier.clone(),
    );
    let mut view = CourseListView::new();
    let mut form = CourseForm::new(notifier);

    form.open_new();
    form.set_field(CourseField::Id, "CS500").unwrap();
    form.set_field(CourseField::Name, "Compilers").unwrap();
    form.set_field(CourseField::Instructor, "Dr. Y").unwrap();

    assert!(matches!(
        form.submit(&service, &mut view),
        Err(FormError::Service(_))
    ));
    assert_eq!(form.state(), FormState::Editing);
    assert!(form.submit_failed());
    assert!(!form.inputs_disabled());
    assert_eq!(form.values().id, "CS500");
    assert!(view.courses().is_empty());

    form.set_field(CourseField::Name, "Compilers II").unwrap();
    assert_eq!(form.state(), FormState::Editing);
    assert!(!form.submit_failed());
}

#[test]
fn delete_mutates_list_only_after_store_success() {
    let (service, mut view) = loaded_view();
    let target = view.courses()[0].clone();

    let (queue, notifier) = notices();
    let failing = CourseService::new(FailingStore::new(memory_store(), Course::ENTITY), notifier);
    assert!(view.delete(&failing, target.id).is_err());
    assert_eq!(view.courses().len(), 3);
    assert!(!view.is_loading());
    assert_eq!(queue.drain()[0].message, "Failed to delete course");

    assert!(view.delete(&service, target.id).unwrap());
    assert_eq!(view.courses().len(), 2);
    assert!(service.get_by_id(target.id).unwrap().is_none());
}
