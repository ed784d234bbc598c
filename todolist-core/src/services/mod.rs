//! Service layer - business logic orchestration
//!
//! Services coordinate domain logic and port interactions. Every public
//! operation returns an `OperationResult`; failures arrive as localized
//! strings, never as Rust errors.

mod auth;
pub mod logging;
mod outcome;
mod registry;
mod todo;

pub use auth::{AuthService, USERS_TABLE};
pub use registry::{UserRegistry, REGISTERED_USERS_KEY};
pub use todo::{TodoService, TODOS_TABLE};
