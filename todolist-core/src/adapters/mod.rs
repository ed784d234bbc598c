//! Adapter implementations
//!
//! Adapters implement the port traits:
//! - In-memory tables (optionally snapshotted to a JSON file) for DataStore
//! - In-memory identity tracking for AuthGateway
//! - JSON file / in-memory slots for KeyValueStore

pub mod files;
pub mod local_storage;
pub mod memory_auth;
pub mod memory_store;

pub use local_storage::{FileKeyValueStore, MemoryKeyValueStore};
pub use memory_auth::InMemoryAuthGateway;
pub use memory_store::InMemoryDataStore;
