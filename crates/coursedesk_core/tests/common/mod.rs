#![allow(dead_code)]

use coursedesk_core::model::course::CourseDraft;
use coursedesk_core::model::record::{FieldMap, Record, RecordId};
use coursedesk_core::notify::{NoticeQueue, Notifier};
use coursedesk_core::store::query::FetchQuery;
use coursedesk_core::store::{
    RecordStore, RecordUpdate, SqliteRecordStore, StoreError, StoreResult,
};
use std::sync::Arc;

pub fn memory_store() -> Arc<SqliteRecordStore> {
    Arc::new(SqliteRecordStore::open_in_memory().unwrap())
}

pub fn notices() -> (Arc<NoticeQueue>, Arc<dyn Notifier>) {
    let queue = Arc::new(NoticeQueue::new());
    let notifier: Arc<dyn Notifier> = queue.clone();
    (queue, notifier)
}

pub fn course_draft(course_id: &str, name: &str, department: &str, term: &str) -> CourseDraft {
    CourseDraft {
        course_id: course_id.to_string(),
        name: name.to_string(),
        department: department.to_string(),
        credits: 3,
        term: term.to_string(),
        instructor: "Dr. Ada Lovelace".to_string(),
        tags: String::new(),
    }
}

/// Store wrapper whose calls for one entity fail.
#[derive(Clone)]
pub struct FailingStore {
    inner: Arc<SqliteRecordStore>,
    failing_entity: &'static str,
    reads_succeed: bool,
}

impl FailingStore {
    pub fn new(inner: Arc<SqliteRecordStore>, failing_entity: &'static str) -> Self {
        Self {
            inner,
            failing_entity,
            reads_succeed: false,
        }
    }

    /// Only creates, updates and deletes of `failing_entity` fail.
    pub fn writes_only(inner: Arc<SqliteRecordStore>, failing_entity: &'static str) -> Self {
        Self {
            reads_succeed: true,
            ..Self::new(inner, failing_entity)
        }
    }

    fn check(&self, entity: &str) -> StoreResult<()> {
        if entity == self.failing_entity {
            return Err(StoreError::Unavailable(format!("{entity} backend offline")));
        }
        Ok(())
    }

    fn check_read(&self, entity: &str) -> StoreResult<()> {
        if self.reads_succeed {
            return Ok(());
        }
        self.check(entity)
    }
}

impl RecordStore for FailingStore {
    fn fetch_records(&self, entity: &str, query: &FetchQuery) -> StoreResult<Vec<Record>> {
        self.check_read(entity)?;
        self.inner.fetch_records(entity, query)
    }

    fn create_records(&self, entity: &str, records: Vec<FieldMap>) -> StoreResult<Vec<Record>> {
        self.check(entity)?;
        self.inner.create_records(entity, records)
    }

    fn update_records(
        &self,
        entity: &str,
        updates: Vec<RecordUpdate>,
    ) -> StoreResult<Vec<Record>> {
        self.check(entity)?;
        self.inner.update_records(entity, updates)
    }

    fn delete_records(&self, entity: &str, ids: &[RecordId]) -> StoreResult<()> {
        self.check(entity)?;
        self.inner.delete_records(entity, ids)
    }

    fn get_record_by_id(
        &self,
        entity: &str,
        id: RecordId,
        fields: &[String],
    ) -> StoreResult<Option<Record>> {
        self.check_read(entity)?;
        self.inner.get_record_by_id(entity, id, fields)
    }
}
