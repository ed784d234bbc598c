//! Todolist Core - auth and todo services over a mock backend
//!
//! This crate follows hexagonal architecture:
//!
//! - **domain**: Core entities (Identity, RegisteredUser, Todo, Session)
//! - **ports**: Trait definitions for the backend (DataStore, AuthGateway, KeyValueStore)
//! - **services**: Business logic orchestration (AuthService, TodoService)
//! - **adapters**: Concrete implementations (in-memory tables, JSON files)

pub mod adapters;
pub mod config;
pub mod domain;
pub mod i18n;
pub mod ports;
pub mod services;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};

use adapters::{FileKeyValueStore, InMemoryAuthGateway, InMemoryDataStore};
use config::Config;
use services::{AuthService, TodoService};

// Re-export commonly used types at crate root
pub use domain::result::{Error, OperationResult};
pub use domain::{AuthUser, Identity, RegisteredUser, Session, Todo};
pub use i18n::{Locale, Message};

/// File holding the key/value slots (registrations)
pub const LOCAL_STORAGE_FILE: &str = "local_storage.json";

/// File holding the table snapshot (users, todos)
pub const TABLES_FILE: &str = "tables.json";

/// Main context for todolist operations
///
/// Wires the file-backed adapters of one data directory into the services.
pub struct TodoContext {
    pub config: Config,
    pub data_dir: PathBuf,
    pub store: Arc<InMemoryDataStore>,
    pub gateway: Arc<InMemoryAuthGateway>,
    pub auth_service: AuthService,
    pub todo_service: TodoService,
}

impl TodoContext {
    /// Create a context over `data_dir`, creating the directory if needed
    pub fn new(data_dir: &Path) -> Result<Self> {
        std::fs::create_dir_all(data_dir)
            .with_context(|| format!("Failed to create data directory: {:?}", data_dir))?;

        let config = Config::load(data_dir)?;

        let storage = Arc::new(FileKeyValueStore::new(&data_dir.join(LOCAL_STORAGE_FILE)));
        let store = Arc::new(
            InMemoryDataStore::open(&data_dir.join(TABLES_FILE))
                .context("Failed to open table snapshot")?,
        );
        let gateway = Arc::new(InMemoryAuthGateway::new());

        let auth_service = AuthService::new(store.clone(), gateway.clone(), storage, &config);
        let todo_service = TodoService::new(store.clone(), config.locale);

        Ok(Self {
            config,
            data_dir: data_dir.to_path_buf(),
            store,
            gateway,
            auth_service,
            todo_service,
        })
    }
}
