//! Integration tests for todolist-core services
//!
//! These tests run the services over the real file-backed adapters in a
//! temporary data directory, reopening it to check what survives a restart.
//!
//! Run with: cargo test --test integration_tests -- --nocapture

use std::sync::Arc;

use tempfile::TempDir;

use todolist_core::adapters::InMemoryDataStore;
use todolist_core::services::{TodoService, REGISTERED_USERS_KEY};
use todolist_core::{Locale, Message, TodoContext, LOCAL_STORAGE_FILE, TABLES_FILE};

// ============================================================================
// Test Helpers
// ============================================================================

fn open(dir: &TempDir) -> TodoContext {
    TodoContext::new(dir.path()).expect("Failed to create context")
}

fn message(ctx: &TodoContext, message: Message) -> Option<String> {
    Some(message.text(ctx.config.locale).to_string())
}

// ============================================================================
// Account Scenario
// ============================================================================

/// register alice/pw1, register alice/pw2, login alice/pw2, login alice/pw1
#[tokio::test]
async fn test_alice_scenario() {
    let dir = TempDir::new().unwrap();
    let ctx = open(&dir);
    let auth = &ctx.auth_service;

    let registered = auth.sign_up("alice", "pw1").await;
    assert!(registered.success);
    let registered = registered.data.unwrap();
    assert_eq!(registered.username, "alice");

    let duplicate = auth.sign_up("alice", "pw2").await;
    assert!(!duplicate.success);
    assert_eq!(duplicate.error, message(&ctx, Message::UsernameExists));

    let wrong = auth.sign_in("alice", "pw2").await;
    assert_eq!(wrong.error, message(&ctx, Message::WrongCredentials));

    let first = auth.sign_in("alice", "pw1").await.into_result().unwrap();
    let second = auth.sign_in("alice", "pw1").await.into_result().unwrap();
    assert_eq!(first.id, registered.id);
    assert_eq!(second.id, registered.id);
}

#[tokio::test]
async fn test_unknown_user_cannot_sign_in() {
    let dir = TempDir::new().unwrap();
    let ctx = open(&dir);

    let result = ctx.auth_service.sign_in("ghost", "pw").await;
    assert!(!result.success);
    assert!(result.data.is_none());
    assert_eq!(result.error, message(&ctx, Message::NotRegistered));
}

// ============================================================================
// Persistence Tests
// ============================================================================

/// Registrations live in the local storage slot and survive a restart
#[tokio::test]
async fn test_registration_survives_restart() {
    let dir = TempDir::new().unwrap();
    let registered = {
        let ctx = open(&dir);
        ctx.auth_service.sign_up("bob", "hunter2").await.into_result().unwrap()
    };

    let raw = std::fs::read_to_string(dir.path().join(LOCAL_STORAGE_FILE)).unwrap();
    let slots: serde_json::Value = serde_json::from_str(&raw).unwrap();
    let users: serde_json::Value =
        serde_json::from_str(slots[REGISTERED_USERS_KEY].as_str().unwrap()).unwrap();
    assert_eq!(users["bob"]["id"], registered.id.as_str());
    assert_eq!(users["bob"]["email"], "bob@example.com");

    let ctx = open(&dir);
    let duplicate = ctx.auth_service.sign_up("bob", "other").await;
    assert_eq!(duplicate.error, message(&ctx, Message::UsernameExists));

    let signed_in = ctx.auth_service.sign_in("bob", "hunter2").await.into_result().unwrap();
    assert_eq!(signed_in, registered);

    // The gateway hands back the identity minted at sign-up, not a new one
    let identity = ctx.auth_service.current_identity().await.into_result().unwrap().unwrap();
    assert_eq!(identity.id, registered.id);
}

/// A context opened before another one registers a user still signs that
/// user in under the registered identity
#[tokio::test]
async fn test_sign_in_through_context_opened_before_registration() {
    let dir = TempDir::new().unwrap();
    let early = open(&dir);

    let registered = {
        let ctx = open(&dir);
        ctx.auth_service.sign_up("hana", "pw").await.into_result().unwrap()
    };

    let signed_in = early.auth_service.sign_in("hana", "pw").await.into_result().unwrap();
    assert_eq!(signed_in.id, registered.id);

    let identity = early.auth_service.current_identity().await.into_result().unwrap().unwrap();
    assert_eq!(identity.id, registered.id);
}

/// Two contexts adding todos to the same data directory keep both
#[tokio::test]
async fn test_overlapping_contexts_keep_each_others_todos() {
    let dir = TempDir::new().unwrap();
    let first = open(&dir);
    let second = open(&dir);

    first.todo_service.add_todo("user_1", "from first").await.into_result().unwrap();
    second.todo_service.add_todo("user_1", "from second").await.into_result().unwrap();

    let ctx = open(&dir);
    let todos = ctx.todo_service.get_todos("user_1").await.into_result().unwrap();
    assert_eq!(todos.len(), 2);
}

/// A todo whose snapshot write failed is reported as failed and not listed
#[tokio::test]
async fn test_failed_add_is_not_listed() {
    let dir = TempDir::new().unwrap();
    let blocker = dir.path().join("blocker");
    std::fs::write(&blocker, "regular file").unwrap();

    let store = Arc::new(InMemoryDataStore::open(&blocker.join(TABLES_FILE)).unwrap());
    let todos = TodoService::new(store, Locale::EnUs);

    let added = todos.add_todo("user_1", "buy milk").await;
    assert!(!added.success);
    assert_eq!(added.error.as_deref(), Some(Message::AddTodoFailed.text(Locale::EnUs)));

    let listed = todos.get_todos("user_1").await.into_result().unwrap();
    assert!(listed.is_empty());
}

/// Todos are written to the table snapshot and survive a restart
#[tokio::test]
async fn test_todos_survive_restart() {
    let dir = TempDir::new().unwrap();
    let (user_id, milk_id) = {
        let ctx = open(&dir);
        let user = ctx.auth_service.sign_up("carol", "pw").await.into_result().unwrap();
        let milk = ctx.todo_service.add_todo(&user.id, "buy milk").await.into_result().unwrap();
        ctx.todo_service.add_todo(&user.id, "walk dog").await.into_result().unwrap();
        (user.id, milk.id)
    };
    assert!(dir.path().join(TABLES_FILE).exists());

    let ctx = open(&dir);
    let todos = ctx.todo_service.get_todos(&user_id).await.into_result().unwrap();
    assert_eq!(todos.len(), 2);
    assert_eq!(todos[0].task, "walk dog");
    assert_eq!(todos[1].id, milk_id);

    ctx.todo_service.delete_todo(&milk_id).await.into_result().unwrap();

    let ctx = open(&dir);
    let todos = ctx.todo_service.get_todos(&user_id).await.into_result().unwrap();
    assert_eq!(todos.len(), 1);
    assert!(todos.iter().all(|t| t.id != milk_id));
}

// ============================================================================
// Todo Contract Tests
// ============================================================================

#[tokio::test]
async fn test_todo_lifecycle_for_signed_in_user() {
    let dir = TempDir::new().unwrap();
    let ctx = open(&dir);

    let user = ctx.auth_service.sign_up("dave", "pw").await.into_result().unwrap();
    let empty = ctx.todo_service.get_todos(&user.id).await;
    assert!(empty.success);
    assert!(empty.error.is_none());
    assert!(empty.data.unwrap().is_empty());

    let added = ctx.todo_service.add_todo(&user.id, "buy milk").await.into_result().unwrap();
    let todos = ctx.todo_service.get_todos(&user.id).await.into_result().unwrap();
    let milk: Vec<_> = todos.iter().filter(|t| t.task == "buy milk").collect();
    assert_eq!(milk.len(), 1);
    assert!(!milk[0].completed);

    let done = ctx.todo_service.set_completed(&added.id, true).await.into_result().unwrap();
    assert!(done.completed);

    ctx.todo_service.delete_todo(&added.id).await.into_result().unwrap();
    let todos = ctx.todo_service.get_todos(&user.id).await.into_result().unwrap();
    assert!(todos.is_empty());
}

#[tokio::test]
async fn test_users_do_not_see_each_others_todos() {
    let dir = TempDir::new().unwrap();
    let ctx = open(&dir);

    let erin = ctx.auth_service.sign_up("erin", "pw").await.into_result().unwrap();
    let frank = ctx.auth_service.sign_up("frank", "pw").await.into_result().unwrap();
    ctx.todo_service.add_todo(&erin.id, "erin's task").await.into_result().unwrap();

    let franks = ctx.todo_service.get_todos(&frank.id).await.into_result().unwrap();
    assert!(franks.is_empty());
}
