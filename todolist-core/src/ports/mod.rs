//! Port definitions (hexagonal architecture)
//!
//! Ports define the interfaces for the backend the services talk to. The
//! services depend only on these traits, not on concrete implementations.

mod auth_gateway;
mod data_store;
mod key_value;

pub use auth_gateway::AuthGateway;
pub use data_store::{
    Columns, DataStore, DeleteRequest, Direction, Filter, InsertRequest, Order, SelectRequest,
    UpdateRequest,
};
pub use key_value::KeyValueStore;
