//! Core domain entities
//!
//! Pure data structures shared by ports, adapters and services - no I/O.

mod identity;
pub mod record;
pub mod result;
mod session;
mod todo;
mod user;

pub use identity::Identity;
pub use record::Record;
pub use session::Session;
pub use todo::{NewTodo, Todo};
pub use user::{AuthUser, RegisteredUser};
