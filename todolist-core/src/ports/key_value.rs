//! Key/value port - the durable local storage slots

use crate::domain::result::Result;

/// Durable string slots addressed by a fixed key.
///
/// `update` runs a read-modify-write under whatever exclusion the backend
/// provides, so concurrent writers do not lose each other's changes.
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>>;

    fn set(&self, key: &str, value: &str) -> Result<()>;

    fn remove(&self, key: &str) -> Result<()>;

    /// Atomically replace the value under `key` with `f(current)`.
    ///
    /// Returning `Ok(None)` from `f` leaves the slot untouched.
    fn update(
        &self,
        key: &str,
        f: &mut dyn FnMut(Option<String>) -> Result<Option<String>>,
    ) -> Result<()>;
}
