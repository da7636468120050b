//! Query model understood by every `RecordStore` implementation.
//!
//! Conditions in `where_conditions` are AND'd together and with every group
//! in `where_groups`. Inside a group, conditions are combined with the
//! group's operator.

use crate::model::record::FieldValue;

/// Comparison applied by one condition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operator {
    /// Field equals one of the condition values.
    ExactMatch,
    /// Case-insensitive substring match against any of the values.
    Contains,
    /// Field is greater than or equal to the first value.
    GreaterThanOrEqual,
}

/// One field predicate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Condition {
    pub field: String,
    pub operator: Operator,
    pub values: Vec<FieldValue>,
}

impl Condition {
    pub fn exact(field: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        Self {
            field: field.into(),
            operator: Operator::ExactMatch,
            values: vec![value.into()],
        }
    }

    /// Exact match against any of `values`; an empty list matches nothing.
    pub fn exact_any<V: Into<FieldValue>>(
        field: impl Into<String>,
        values: impl IntoIterator<Item = V>,
    ) -> Self {
        Self {
            field: field.into(),
            operator: Operator::ExactMatch,
            values: values.into_iter().map(Into::into).collect(),
        }
    }

    pub fn contains(field: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            operator: Operator::Contains,
            values: vec![FieldValue::Text(text.into())],
        }
    }

    pub fn at_least(field: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        Self {
            field: field.into(),
            operator: Operator::GreaterThanOrEqual,
            values: vec![value.into()],
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GroupOperator {
    And,
    Or,
}

/// Group of conditions joined by one operator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WhereGroup {
    pub operator: GroupOperator,
    pub conditions: Vec<Condition>,
}

impl WhereGroup {
    pub fn any(conditions: Vec<Condition>) -> Self {
        Self {
            operator: GroupOperator::Or,
            conditions,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Ascending,
    Descending,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderBy {
    pub field: String,
    pub direction: SortDirection,
}

/// Page window. `limit = None` returns every remaining row.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PagingInfo {
    pub limit: Option<u32>,
    pub offset: u32,
}

/// Complete fetch request.
///
/// An empty `fields` list projects every stored field.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FetchQuery {
    pub fields: Vec<String>,
    pub where_conditions: Vec<Condition>,
    pub where_groups: Vec<WhereGroup>,
    pub order_by: Vec<OrderBy>,
    pub paging: PagingInfo,
}

impl FetchQuery {
    /// Creates a query projecting the given fields.
    pub fn select(fields: &[&str]) -> Self {
        Self {
            fields: fields.iter().map(|field| (*field).to_string()).collect(),
            ..Self::default()
        }
    }

    pub fn and_where(mut self, condition: Condition) -> Self {
        self.where_conditions.push(condition);
        self
    }

    pub fn order(mut self, field: impl Into<String>, direction: SortDirection) -> Self {
        self.order_by.push(OrderBy {
            field: field.into(),
            direction,
        });
        self
    }

    pub fn limit(mut self, limit: u32) -> Self {
        self.paging.limit = Some(limit);
        self
    }
}
