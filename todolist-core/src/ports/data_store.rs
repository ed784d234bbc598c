//! Data store port - table access abstraction
//!
//! Stands in for a remote table API. Each operation kind takes a plain
//! request value describing the table, an optional equality filter and
//! (for selects) an optional ordering.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::domain::result::Result;
use crate::domain::Record;

/// Exact-equality match on one column
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Filter {
    pub column: String,
    pub value: Value,
}

impl Filter {
    pub fn eq(column: impl Into<String>, value: impl Into<Value>) -> Self {
        Self {
            column: column.into(),
            value: value.into(),
        }
    }

    /// Whether `record` satisfies this filter. A missing column never matches.
    pub fn matches(&self, record: &Record) -> bool {
        record.get(&self.column) == Some(&self.value)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Ascending,
    Descending,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    pub column: String,
    pub direction: Direction,
}

impl Order {
    pub fn ascending(column: impl Into<String>) -> Self {
        Self {
            column: column.into(),
            direction: Direction::Ascending,
        }
    }

    pub fn descending(column: impl Into<String>) -> Self {
        Self {
            column: column.into(),
            direction: Direction::Descending,
        }
    }
}

/// Column projection for selects
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Columns {
    /// `*`
    #[default]
    All,
    Only(Vec<String>),
}

impl Columns {
    /// Keep only the projected columns of `record`
    pub fn project(&self, record: Record) -> Record {
        match self {
            Columns::All => record,
            Columns::Only(names) => record
                .into_iter()
                .filter(|(k, _)| names.iter().any(|n| n == k))
                .collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SelectRequest {
    pub table: String,
    pub columns: Columns,
    pub filter: Option<Filter>,
    pub order: Option<Order>,
}

impl SelectRequest {
    /// `select *` from `table`
    pub fn new(table: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            columns: Columns::All,
            filter: None,
            order: None,
        }
    }

    pub fn with_columns(mut self, columns: &[&str]) -> Self {
        self.columns = Columns::Only(columns.iter().map(|c| c.to_string()).collect());
        self
    }

    pub fn with_filter(mut self, filter: Filter) -> Self {
        self.filter = Some(filter);
        self
    }

    pub fn with_order(mut self, order: Order) -> Self {
        self.order = Some(order);
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InsertRequest {
    pub table: String,
    pub record: Record,
}

impl InsertRequest {
    pub fn new(table: impl Into<String>, record: Record) -> Self {
        Self {
            table: table.into(),
            record,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpdateRequest {
    pub table: String,
    pub patch: Record,
    pub filter: Filter,
}

impl UpdateRequest {
    pub fn new(table: impl Into<String>, patch: Record, filter: Filter) -> Self {
        Self {
            table: table.into(),
            patch,
            filter,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeleteRequest {
    pub table: String,
    pub filter: Filter,
}

impl DeleteRequest {
    pub fn new(table: impl Into<String>, filter: Filter) -> Self {
        Self {
            table: table.into(),
            filter,
        }
    }
}

/// Table store abstraction
///
/// Implementations (adapters) hold the rows. Unknown tables behave as empty.
#[async_trait]
pub trait DataStore: Send + Sync {
    /// Rows matching the request's filter, projected and ordered
    async fn select(&self, request: &SelectRequest) -> Result<Vec<Record>>;

    /// First row of `select`, or `None`
    async fn select_single(&self, request: &SelectRequest) -> Result<Option<Record>> {
        Ok(self.select(request).await?.into_iter().next())
    }

    /// Store a row; returns it merged with its generated `id`
    async fn insert(&self, request: &InsertRequest) -> Result<Record>;

    /// Merge the patch into every matching row; returns the updated rows
    async fn update(&self, request: &UpdateRequest) -> Result<Vec<Record>>;

    /// Remove every matching row; returns how many were removed
    async fn delete(&self, request: &DeleteRequest) -> Result<usize>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record(value: Value) -> Record {
        match value {
            Value::Object(map) => map,
            _ => panic!("not an object"),
        }
    }

    #[test]
    fn test_filter_matches_exact_value() {
        let row = record(json!({"user_id": "u1", "completed": false}));
        assert!(Filter::eq("user_id", "u1").matches(&row));
        assert!(!Filter::eq("user_id", "u2").matches(&row));
        assert!(Filter::eq("completed", false).matches(&row));
        assert!(!Filter::eq("missing", Value::Null).matches(&row));
    }

    #[test]
    fn test_columns_project() {
        let row = record(json!({"id": "1", "task": "a", "user_id": "u"}));
        let projected = Columns::Only(vec!["id".to_string(), "task".to_string()]).project(row.clone());
        assert_eq!(projected.len(), 2);
        assert!(projected.get("user_id").is_none());
        assert_eq!(Columns::All.project(row.clone()), row);
    }

    #[test]
    fn test_select_request_builder() {
        let req = SelectRequest::new("todos")
            .with_columns(&["id"])
            .with_filter(Filter::eq("user_id", "u1"))
            .with_order(Order::descending("created_at"));
        assert_eq!(req.table, "todos");
        assert_eq!(req.columns, Columns::Only(vec!["id".to_string()]));
        assert_eq!(req.order.unwrap().direction, Direction::Descending);
    }
}
