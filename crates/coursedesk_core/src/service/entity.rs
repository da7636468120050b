//! Generic entity service instantiated once per entity type.
//!
//! # Responsibility
//! - Build store queries from entity filters and default ordering.
//! - Apply write allow-lists and integer coercion before every write.
//! - Log and notify on store failures, then return the error to the caller.
//!
//! # Invariants
//! - Only `E::CREATE_FIELDS` reach `create_records`.
//! - Only `E::UPDATE_FIELDS` reach `update_records`.
//! - `E::validate` runs before any write.

use crate::model::record::{FieldMap, FieldValue, Record, RecordId};
use crate::model::schema::{Entity, RecordFilter};
use crate::model::validation::FieldErrors;
use crate::notify::{Notice, Notifier};
use crate::service::{ServiceError, ServiceResult};
use crate::store::query::FetchQuery;
use crate::store::{RecordStore, RecordUpdate};
use log::{error, warn};
use std::marker::PhantomData;
use std::sync::Arc;

/// CRUD service for one entity type over a record store.
pub struct EntityService<S, E> {
    store: S,
    notifier: Arc<dyn Notifier>,
    _entity: PhantomData<fn() -> E>,
}

impl<S: Clone, E> Clone for EntityService<S, E> {
    fn clone(&self) -> Self {
        Self {
            store: self.store.clone(),
            notifier: Arc::clone(&self.notifier),
            _entity: PhantomData,
        }
    }
}

impl<S: RecordStore, E: Entity> EntityService<S, E> {
    pub fn new(store: S, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            store,
            notifier,
            _entity: PhantomData,
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn notifier(&self) -> &Arc<dyn Notifier> {
        &self.notifier
    }

    /// Query selecting `E::FIELDS` with the entity's default ordering.
    pub fn base_query(&self) -> FetchQuery {
        let query = FetchQuery::select(E::FIELDS);
        match E::ORDER_BY {
            Some((field, direction)) => query.order(field, direction),
            None => query,
        }
    }

    /// Lists entities matching `filter`.
    pub fn list(&self, filter: &E::Filter) -> ServiceResult<Vec<E>> {
        let mut query = self.base_query();
        filter.apply(&mut query);
        self.fetch(&query)
            .map_err(|err| self.report("fetch", E::PLURAL, err))
    }

    /// Runs a prepared query without user notification.
    pub fn fetch(&self, query: &FetchQuery) -> ServiceResult<Vec<E>> {
        let records = self.store.fetch_records(E::ENTITY, query)?;
        records
            .iter()
            .map(|record| E::from_record(record).map_err(ServiceError::from))
            .collect()
    }

    /// Counts records matching `query`, degrading to zero on failure.
    pub fn count_where(&self, mut query: FetchQuery) -> usize {
        query.fields = vec!["Id".to_string()];
        query.order_by.clear();
        match self.store.fetch_records(E::ENTITY, &query) {
            Ok(records) => records.len(),
            Err(err) => {
                warn!(
                    "event=entity_count module=service status=degraded entity={} error={err}",
                    E::ENTITY
                );
                0
            }
        }
    }

    /// Gets one entity by store id. Failures are logged, not notified.
    pub fn get_by_id(&self, id: RecordId) -> ServiceResult<Option<E>> {
        let fields = E::FIELDS
            .iter()
            .map(|field| (*field).to_string())
            .collect::<Vec<_>>();
        let result = self
            .store
            .get_record_by_id(E::ENTITY, id, &fields)
            .map_err(ServiceError::from)
            .and_then(|record| {
                record
                    .map(|record| E::from_record(&record))
                    .transpose()
                    .map_err(ServiceError::from)
            });

        if let Err(err) = &result {
            error!(
                "event=entity_get module=service status=error entity={} id={id} error={err}",
                E::ENTITY
            );
        }
        result
    }

    /// Creates an entity; `Ok(None)` when the store returns no record.
    pub fn create(&self, draft: &E::Draft) -> ServiceResult<Option<E>> {
        let created = self
            .prepare_write(draft, E::CREATE_FIELDS, "create")
            .and_then(|fields| Ok(self.store.create_records(E::ENTITY, vec![fields])?))
            .map_err(|err| self.report("create", E::LABEL, err))?;

        self.first_entity(created.first())
    }

    /// Like `create`, but leaves logging and notification to the caller.
    pub(crate) fn create_unreported(&self, draft: &E::Draft) -> ServiceResult<Option<E>> {
        let fields = self.prepare_write(draft, E::CREATE_FIELDS, "create")?;
        let created = self.store.create_records(E::ENTITY, vec![fields])?;
        created
            .first()
            .map(E::from_record)
            .transpose()
            .map_err(ServiceError::from)
    }

    /// Updates an existing entity; `Ok(None)` when the store returns no record.
    pub fn update(&self, id: RecordId, draft: &E::Draft) -> ServiceResult<Option<E>> {
        let updated = self
            .prepare_write(draft, E::UPDATE_FIELDS, "update")
            .and_then(|fields| {
                Ok(self
                    .store
                    .update_records(E::ENTITY, vec![RecordUpdate { id, fields }])?)
            })
            .map_err(|err| self.report("update", E::LABEL, err))?;

        self.first_entity(updated.first())
    }

    /// Deletes an entity by id; `Ok(true)` on success.
    pub fn delete(&self, id: RecordId) -> ServiceResult<bool> {
        self.store
            .delete_records(E::ENTITY, &[id])
            .map_err(|err| self.report("delete", E::LABEL, err.into()))?;
        Ok(true)
    }

    fn prepare_write(
        &self,
        draft: &E::Draft,
        allow_list: &[&str],
        action: &'static str,
    ) -> ServiceResult<FieldMap> {
        if let Err(errors) = E::validate(draft) {
            warn!(
                "event=entity_{action} module=service status=rejected entity={} fields={}",
                E::ENTITY,
                errors.len()
            );
            return Err(errors.into());
        }
        let mut fields = E::draft_fields(draft);
        fields.retain(|name, _| allow_list.contains(&name.as_str()));
        coerce_integer_fields(&mut fields, E::INTEGER_FIELDS)?;
        Ok(fields)
    }

    fn first_entity(&self, record: Option<&Record>) -> ServiceResult<Option<E>> {
        record
            .map(E::from_record)
            .transpose()
            .map_err(|err| self.report("read", E::LABEL, err.into()))
    }

    /// Logs and notifies a failure. Validation errors are left to the form.
    fn report(&self, action: &str, subject: &str, err: ServiceError) -> ServiceError {
        if matches!(err, ServiceError::Validation(_)) {
            return err;
        }
        error!(
            "event=entity_{action} module=service status=error entity={} error={err}",
            E::ENTITY
        );
        self.notifier
            .notify(Notice::error(format!("Failed to {action} {subject}")));
        err
    }
}

/// Converts numeric text in `integer_fields` to integers in place.
pub fn coerce_integer_fields(
    fields: &mut FieldMap,
    integer_fields: &[&str],
) -> Result<(), FieldErrors> {
    let mut errors = FieldErrors::new();
    for name in integer_fields {
        let Some(value) = fields.get_mut(*name) else {
            continue;
        };
        let parsed = match &*value {
            FieldValue::Text(text) => match text.trim().parse::<i64>() {
                Ok(number) => Some(number),
                Err(_) => {
                    errors.add(*name, format!("`{text}` is not a whole number"));
                    None
                }
            },
            FieldValue::Integer(_) | FieldValue::Null => None,
        };
        if let Some(number) = parsed {
            *value = FieldValue::Integer(number);
        }
    }
    errors.into_result()
}
