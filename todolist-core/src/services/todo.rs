//! Todo service - one user's todo items

use std::sync::Arc;

use serde_json::json;

use super::outcome::{finish, Failure};
use crate::domain::record::{from_record, to_record};
use crate::domain::result::{OperationResult, Result};
use crate::domain::{NewTodo, Record, Todo};
use crate::i18n::{Locale, Message};
use crate::ports::{DataStore, DeleteRequest, Filter, InsertRequest, Order, SelectRequest, UpdateRequest};

/// Table holding todo rows
pub const TODOS_TABLE: &str = "todos";

/// Todo service for listing, adding, completing and deleting todos
pub struct TodoService {
    store: Arc<dyn DataStore>,
    locale: Locale,
}

fn to_todos(rows: Vec<Record>) -> Result<Vec<Todo>> {
    rows.into_iter().map(from_record).collect()
}

impl TodoService {
    pub fn new(store: Arc<dyn DataStore>, locale: Locale) -> Self {
        Self { store, locale }
    }

    /// Todos of `user_id`, newest first. No todos is an empty list, not an error.
    pub async fn get_todos(&self, user_id: &str) -> OperationResult<Vec<Todo>> {
        let result = self.try_get_todos(user_id).await.map_err(Failure::from);
        finish("get_todos", self.locale, result, Message::LoadTodosFailed)
    }

    async fn try_get_todos(&self, user_id: &str) -> Result<Vec<Todo>> {
        let request = SelectRequest::new(TODOS_TABLE)
            .with_filter(Filter::eq("user_id", user_id))
            .with_order(Order::descending("created_at"));
        to_todos(self.store.select(&request).await?)
    }

    /// Add a not-yet-completed todo for `user_id`
    pub async fn add_todo(&self, user_id: &str, task: &str) -> OperationResult<Todo> {
        let result = self.try_add_todo(user_id, task.trim()).await;
        finish("add_todo", self.locale, result, Message::AddTodoFailed)
    }

    async fn try_add_todo(&self, user_id: &str, task: &str) -> std::result::Result<Todo, Failure> {
        if task.is_empty() {
            return Err(Failure::Rejected(Message::TaskRequired));
        }

        let record = to_record(&NewTodo::new(user_id, task))?;
        let stored = self.store.insert(&InsertRequest::new(TODOS_TABLE, record)).await?;
        let todo: Todo = from_record(stored)?;

        tracing::debug!(user_id, todo_id = %todo.id, "todo added");
        Ok(todo)
    }

    /// Mark a todo completed or not, returning the stored todo
    pub async fn set_completed(&self, todo_id: &str, completed: bool) -> OperationResult<Todo> {
        let result = self.try_set_completed(todo_id, completed).await;
        finish("set_completed", self.locale, result, Message::UpdateTodoFailed)
    }

    async fn try_set_completed(&self, todo_id: &str, completed: bool) -> std::result::Result<Todo, Failure> {
        let patch = to_record(&json!({ "completed": completed }))?;
        let request = UpdateRequest::new(TODOS_TABLE, patch, Filter::eq("id", todo_id));

        let updated = self.store.update(&request).await?;
        let row = updated
            .into_iter()
            .next()
            .ok_or(Failure::Rejected(Message::TodoNotFound))?;
        Ok(from_record(row)?)
    }

    /// Delete a todo by id. Deleting an id that no longer exists succeeds.
    pub async fn delete_todo(&self, todo_id: &str) -> OperationResult<()> {
        let result = self.try_delete_todo(todo_id).await.map_err(Failure::from);
        finish("delete_todo", self.locale, result, Message::DeleteTodoFailed)
    }

    async fn try_delete_todo(&self, todo_id: &str) -> Result<()> {
        let removed = self
            .store
            .delete(&DeleteRequest::new(TODOS_TABLE, Filter::eq("id", todo_id)))
            .await?;
        if removed == 0 {
            tracing::debug!(todo_id, "delete matched no todo");
        }
        Ok(())
    }
}
