//! In-memory table store
//!
//! Holds every table as a vector of JSON rows in insertion order. When opened
//! with a snapshot path, the full table set is loaded from that file and
//! rewritten after each mutation.
//!
//! Snapshot mutations run under an exclusive lock on a sibling `.lock` file
//! and start from a fresh read of the snapshot, so overlapping processes do
//! not drop each other's rows. A mutation is staged on a copy and only
//! becomes visible once the snapshot write succeeded. Selects read the
//! in-process copy, which may lag behind writes made by other processes
//! until this store next mutates.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use async_trait::async_trait;
use serde_json::Value;
use uuid::Uuid;

use super::files::{lock_path_for, write_atomic, FileLock};
use crate::domain::record::compare_values;
use crate::domain::result::{Error, Result};
use crate::domain::Record;
use crate::ports::{DataStore, DeleteRequest, Direction, InsertRequest, SelectRequest, UpdateRequest};

type Tables = BTreeMap<String, Vec<Record>>;

/// Name of the generated primary-key column
pub const ID_COLUMN: &str = "id";

/// Table store backed by process memory
pub struct InMemoryDataStore {
    tables: Mutex<Tables>,
    snapshot_path: Option<PathBuf>,
}

fn read_snapshot(path: &Path) -> Result<Tables> {
    if !path.exists() {
        return Ok(Tables::new());
    }
    let content = std::fs::read_to_string(path)?;
    if content.trim().is_empty() {
        return Ok(Tables::new());
    }
    Ok(serde_json::from_str(&content)?)
}

impl InMemoryDataStore {
    /// Create an empty store that is never written to disk
    pub fn new() -> Self {
        Self {
            tables: Mutex::new(Tables::new()),
            snapshot_path: None,
        }
    }

    /// Open a store snapshotted to `path`
    ///
    /// A missing file starts an empty store; the file is created on the
    /// first mutation.
    pub fn open(path: &Path) -> Result<Self> {
        let tables = read_snapshot(path)?;

        tracing::debug!(path = %path.display(), tables = tables.len(), "opened table snapshot");

        Ok(Self {
            tables: Mutex::new(tables),
            snapshot_path: Some(path.to_path_buf()),
        })
    }

    /// Path of the snapshot file, if any
    pub fn snapshot_path(&self) -> Option<&Path> {
        self.snapshot_path.as_deref()
    }

    /// Number of rows currently held in `table`
    pub fn row_count(&self, table: &str) -> Result<usize> {
        let tables = self.tables.lock()?;
        Ok(tables.get(table).map_or(0, Vec::len))
    }

    /// Apply `f` to a working copy of the tables and commit it if `f`
    /// succeeds and, when it reports a change, the snapshot write succeeds.
    fn mutate<T>(&self, f: impl FnOnce(&mut Tables) -> Result<(T, bool)>) -> Result<T> {
        let mut tables = self.tables.lock()?;

        let Some(path) = &self.snapshot_path else {
            let mut working = tables.clone();
            let (value, _) = f(&mut working)?;
            *tables = working;
            return Ok(value);
        };

        let _lock = FileLock::exclusive(&lock_path_for(path))?;
        let mut working = read_snapshot(path)?;
        let (value, changed) = f(&mut working)?;
        if changed {
            let content = serde_json::to_vec_pretty(&working)?;
            write_atomic(path, &content)?;
        }
        *tables = working;
        Ok(value)
    }
}

impl Default for InMemoryDataStore {
    fn default() -> Self {
        Self::new()
    }
}

/// Sort rows by `column`. Ties keep insertion order when ascending and come
/// out newest first when descending.
fn order_rows(rows: &mut Vec<Record>, column: &str, direction: Direction) {
    let key = |r: &Record| r.get(column).cloned().unwrap_or(Value::Null);
    match direction {
        Direction::Ascending => rows.sort_by(|a, b| compare_values(&key(a), &key(b))),
        Direction::Descending => {
            rows.reverse();
            rows.sort_by(|a, b| compare_values(&key(b), &key(a)));
        }
    }
}

#[async_trait]
impl DataStore for InMemoryDataStore {
    async fn select(&self, request: &SelectRequest) -> Result<Vec<Record>> {
        tracing::debug!(
            table = %request.table,
            columns = ?request.columns,
            filter = ?request.filter,
            order = ?request.order,
            "select"
        );

        let tables = self.tables.lock()?;
        let mut rows: Vec<Record> = tables
            .get(&request.table)
            .map(|rows| {
                rows.iter()
                    .filter(|r| request.filter.as_ref().map_or(true, |f| f.matches(r)))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default();
        drop(tables);

        if let Some(order) = &request.order {
            order_rows(&mut rows, &order.column, order.direction);
        }

        Ok(rows.into_iter().map(|r| request.columns.project(r)).collect())
    }

    async fn insert(&self, request: &InsertRequest) -> Result<Record> {
        tracing::debug!(table = %request.table, record = ?request.record, "insert");

        let mut record = request.record.clone();
        let id = match record.get(ID_COLUMN) {
            None | Some(Value::Null) => Value::String(Uuid::new_v4().to_string()),
            Some(existing) => existing.clone(),
        };
        record.insert(ID_COLUMN.to_string(), id.clone());

        self.mutate(|tables| {
            let rows = tables.entry(request.table.clone()).or_default();
            if rows.iter().any(|r| r.get(ID_COLUMN) == Some(&id)) {
                return Err(Error::conflict(format!(
                    "duplicate id {} in table {}",
                    id, request.table
                )));
            }
            rows.push(record.clone());
            Ok((record, true))
        })
    }

    async fn update(&self, request: &UpdateRequest) -> Result<Vec<Record>> {
        tracing::debug!(
            table = %request.table,
            patch = ?request.patch,
            filter = ?request.filter,
            "update"
        );

        self.mutate(|tables| {
            let Some(rows) = tables.get_mut(&request.table) else {
                return Ok((Vec::new(), false));
            };

            let mut updated = Vec::new();
            for row in rows.iter_mut().filter(|r| request.filter.matches(r)) {
                for (column, value) in &request.patch {
                    if column != ID_COLUMN {
                        row.insert(column.clone(), value.clone());
                    }
                }
                updated.push(row.clone());
            }

            let changed = !updated.is_empty();
            Ok((updated, changed))
        })
    }

    async fn delete(&self, request: &DeleteRequest) -> Result<usize> {
        tracing::debug!(table = %request.table, filter = ?request.filter, "delete");

        self.mutate(|tables| {
            let Some(rows) = tables.get_mut(&request.table) else {
                return Ok((0, false));
            };

            let before = rows.len();
            rows.retain(|r| !request.filter.matches(r));
            let removed = before - rows.len();
            Ok((removed, removed > 0))
        })
    }
}
