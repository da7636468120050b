//! SQLite-backed record store.
//!
//! Each record is one row of the `records` table: the entity name, a JSON
//! object holding its fields, and system columns (`id`, `created_on`,
//! `modified_on`). System columns are addressed as `Id`, `CreatedOn` and
//! `ModifiedOn` in queries; every other field name resolves to a JSON path.
//!
//! # Invariants
//! - Field names must match `[A-Za-z_][A-Za-z0-9_]*` before they reach SQL.
//! - Multi-record writes run in one transaction.
//! - Ordering always ends with `id ASC` so results are deterministic.

use crate::db::{open_db, open_db_in_memory, UNICODE_LOWER_FN};
use crate::model::record::{FieldMap, FieldValue, Record, RecordId};
use crate::store::query::{Condition, FetchQuery, GroupOperator, Operator, SortDirection};
use crate::store::{RecordStore, RecordUpdate, StoreError, StoreResult};
use log::debug;
use once_cell::sync::Lazy;
use regex::Regex;
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection, OptionalExtension, Row, Transaction};
use std::path::Path;
use std::sync::{Mutex, MutexGuard};

static FIELD_NAME_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").expect("valid field name regex"));

const RECORD_SELECT_SQL: &str = "SELECT id, created_on, data FROM records";
const SYSTEM_FIELDS: [(&str, &str); 3] = [
    ("Id", "id"),
    ("CreatedOn", "created_on"),
    ("ModifiedOn", "modified_on"),
];

/// Record store over one migrated SQLite connection.
pub struct SqliteRecordStore {
    conn: Mutex<Connection>,
}

impl SqliteRecordStore {
    /// Wraps a connection returned by `db::open_db*`.
    pub fn new(conn: Connection) -> Self {
        Self {
            conn: Mutex::new(conn),
        }
    }

    pub fn open(path: impl AsRef<Path>) -> StoreResult<Self> {
        Ok(Self::new(open_db(path)?))
    }

    pub fn open_in_memory() -> StoreResult<Self> {
        Ok(Self::new(open_db_in_memory()?))
    }

    fn lock(&self) -> StoreResult<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|_| StoreError::Unavailable("connection lock poisoned".to_string()))
    }
}

impl RecordStore for SqliteRecordStore {
    fn fetch_records(&self, entity: &str, query: &FetchQuery) -> StoreResult<Vec<Record>> {
        let mut sql = format!("{RECORD_SELECT_SQL} WHERE entity = ?");
        let mut bind_values = vec![Value::Text(entity.to_string())];

        for condition in &query.where_conditions {
            sql.push_str(" AND ");
            push_condition(&mut sql, &mut bind_values, condition)?;
        }

        for group in &query.where_groups {
            if group.conditions.is_empty() {
                continue;
            }
            let joiner = match group.operator {
                GroupOperator::And => " AND ",
                GroupOperator::Or => " OR ",
            };
            sql.push_str(" AND (");
            for (index, condition) in group.conditions.iter().enumerate() {
                if index > 0 {
                    sql.push_str(joiner);
                }
                push_condition(&mut sql, &mut bind_values, condition)?;
            }
            sql.push(')');
        }

        sql.push_str(" ORDER BY ");
        for order in &query.order_by {
            let expr = field_expr(&order.field)?;
            let collate = if is_system_field(&order.field) {
                ""
            } else {
                " COLLATE NOCASE"
            };
            let direction = match order.direction {
                SortDirection::Ascending => "ASC",
                SortDirection::Descending => "DESC",
            };
            sql.push_str(&format!("{expr}{collate} {direction}, "));
        }
        sql.push_str("id ASC");

        if let Some(limit) = query.paging.limit {
            sql.push_str(" LIMIT ?");
            bind_values.push(Value::Integer(i64::from(limit)));
            if query.paging.offset > 0 {
                sql.push_str(" OFFSET ?");
                bind_values.push(Value::Integer(i64::from(query.paging.offset)));
            }
        } else if query.paging.offset > 0 {
            sql.push_str(" LIMIT -1 OFFSET ?");
            bind_values.push(Value::Integer(i64::from(query.paging.offset)));
        }

        let conn = self.lock()?;
        let mut stmt = conn.prepare(&sql)?;
        let mut rows = stmt.query(params_from_iter(bind_values))?;
        let mut records = Vec::new();
        while let Some(row) = rows.next()? {
            records.push(parse_record_row(row, &query.fields)?);
        }

        debug!(
            "event=records_fetch module=store status=ok entity={entity} rows={}",
            records.len()
        );
        Ok(records)
    }

    fn create_records(&self, entity: &str, records: Vec<FieldMap>) -> StoreResult<Vec<Record>> {
        for fields in &records {
            ensure_writable_fields(fields)?;
        }

        let mut conn = self.lock()?;
        let tx = conn.transaction()?;
        let mut created = Vec::with_capacity(records.len());
        for fields in &records {
            let now = now_millis();
            tx.execute(
                "INSERT INTO records (entity, data, created_on, modified_on)
                 VALUES (?1, ?2, ?3, ?3);",
                params![entity, serde_json::to_string(fields)?, now],
            )?;
            let id = tx.last_insert_rowid();
            let record = load_record(&tx, entity, id)?.ok_or_else(|| StoreError::NotFound {
                entity: entity.to_string(),
                id,
            })?;
            created.push(record);
        }
        tx.commit()?;

        debug!(
            "event=records_create module=store status=ok entity={entity} count={}",
            created.len()
        );
        Ok(created)
    }

    fn update_records(
        &self,
        entity: &str,
        updates: Vec<RecordUpdate>,
    ) -> StoreResult<Vec<Record>> {
        for update in &updates {
            ensure_writable_fields(&update.fields)?;
        }

        let mut conn = self.lock()?;
        let tx = conn.transaction()?;
        let mut updated = Vec::with_capacity(updates.len());
        for update in updates {
            let Some(mut record) = load_record(&tx, entity, update.id)? else {
                return Err(StoreError::NotFound {
                    entity: entity.to_string(),
                    id: update.id,
                });
            };
            record.fields.extend(update.fields);
            tx.execute(
                "UPDATE records
                 SET data = ?1, modified_on = ?2
                 WHERE entity = ?3 AND id = ?4;",
                params![
                    serde_json::to_string(&record.fields)?,
                    now_millis(),
                    entity,
                    record.id
                ],
            )?;
            updated.push(record);
        }
        tx.commit()?;

        debug!(
            "event=records_update module=store status=ok entity={entity} count={}",
            updated.len()
        );
        Ok(updated)
    }

    fn delete_records(&self, entity: &str, ids: &[RecordId]) -> StoreResult<()> {
        let mut conn = self.lock()?;
        let tx = conn.transaction()?;
        for id in ids {
            let changed = tx.execute(
                "DELETE FROM records WHERE entity = ?1 AND id = ?2;",
                params![entity, id],
            )?;
            if changed == 0 {
                return Err(StoreError::NotFound {
                    entity: entity.to_string(),
                    id: *id,
                });
            }
        }
        tx.commit()?;

        debug!(
            "event=records_delete module=store status=ok entity={entity} count={}",
            ids.len()
        );
        Ok(())
    }

    fn get_record_by_id(
        &self,
        entity: &str,
        id: RecordId,
        fields: &[String],
    ) -> StoreResult<Option<Record>> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare(&format!(
            "{RECORD_SELECT_SQL} WHERE entity = ?1 AND id = ?2;"
        ))?;
        let mut rows = stmt.query(params![entity, id])?;
        match rows.next()? {
            Some(row) => Ok(Some(parse_record_row(row, fields)?)),
            None => Ok(None),
        }
    }
}

fn load_record(tx: &Transaction<'_>, entity: &str, id: RecordId) -> StoreResult<Option<Record>> {
    let row = tx
        .query_row(
            &format!("{RECORD_SELECT_SQL} WHERE entity = ?1 AND id = ?2;"),
            params![entity, id],
            |row| {
                Ok((
                    row.get::<_, i64>("id")?,
                    row.get::<_, i64>("created_on")?,
                    row.get::<_, String>("data")?,
                ))
            },
        )
        .optional()?;

    row.map(|(id, created_on, data)| decode_record(id, created_on, &data, &[]))
        .transpose()
}

fn parse_record_row(row: &Row<'_>, fields: &[String]) -> StoreResult<Record> {
    let id: i64 = row.get("id")?;
    let created_on: i64 = row.get("created_on")?;
    let data: String = row.get("data")?;
    decode_record(id, created_on, &data, fields)
}

fn decode_record(
    id: RecordId,
    created_on: i64,
    data: &str,
    fields: &[String],
) -> StoreResult<Record> {
    let mut map: FieldMap = serde_json::from_str(data)
        .map_err(|err| StoreError::InvalidData(format!("record {id}: {err}")))?;
    if !fields.is_empty() {
        map.retain(|name, _| fields.iter().any(|field| field == name));
    }
    Ok(Record::new(id, created_on, map))
}

fn push_condition(
    sql: &mut String,
    bind_values: &mut Vec<Value>,
    condition: &Condition,
) -> StoreResult<()> {
    let expr = field_expr(&condition.field)?;
    if condition.values.is_empty() {
        sql.push_str("0 = 1");
        return Ok(());
    }

    match condition.operator {
        Operator::ExactMatch => {
            let placeholders = vec!["?"; condition.values.len()].join(", ");
            sql.push_str(&format!("{expr} IN ({placeholders})"));
            bind_values.extend(condition.values.iter().map(to_sql_value));
        }
        Operator::Contains => {
            let clauses = condition
                .values
                .iter()
                .map(|value| {
                    let needle = match value {
                        FieldValue::Text(text) => text.to_lowercase(),
                        FieldValue::Integer(number) => number.to_string(),
                        FieldValue::Null => String::new(),
                    };
                    bind_values.push(Value::Text(format!("%{}%", escape_like(&needle))));
                    format!("{UNICODE_LOWER_FN}(CAST({expr} AS TEXT)) LIKE ? ESCAPE '\\'")
                })
                .collect::<Vec<_>>();
            sql.push('(');
            sql.push_str(&clauses.join(" OR "));
            sql.push(')');
        }
        Operator::GreaterThanOrEqual => {
            sql.push_str(&format!("{expr} >= ?"));
            bind_values.push(to_sql_value(&condition.values[0]));
        }
    }
    Ok(())
}

fn field_expr(field: &str) -> StoreResult<String> {
    if let Some((_, column)) = SYSTEM_FIELDS.iter().find(|(name, _)| *name == field) {
        return Ok((*column).to_string());
    }
    if !FIELD_NAME_RE.is_match(field) {
        return Err(StoreError::InvalidField(field.to_string()));
    }
    Ok(format!("json_extract(data, '$.{field}')"))
}

fn is_system_field(field: &str) -> bool {
    SYSTEM_FIELDS.iter().any(|(name, _)| *name == field)
}

fn ensure_writable_fields(fields: &FieldMap) -> StoreResult<()> {
    match fields
        .keys()
        .find(|name| is_system_field(name) || !FIELD_NAME_RE.is_match(name))
    {
        Some(name) => Err(StoreError::InvalidField(name.clone())),
        None => Ok(()),
    }
}

fn to_sql_value(value: &FieldValue) -> Value {
    match value {
        FieldValue::Null => Value::Null,
        FieldValue::Integer(number) => Value::Integer(*number),
        FieldValue::Text(text) => Value::Text(text.clone()),
    }
}

fn escape_like(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for ch in raw.chars() {
        if matches!(ch, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(ch);
    }
    escaped
}

fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}
