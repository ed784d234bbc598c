//! Registration records kept in local storage
//!
//! All registrations live in one slot as a JSON object keyed by username:
//! ```json
//! { "alice": { "id": "user_...", "email": "alice@example.com", "password": "..." } }
//! ```

use std::collections::BTreeMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::domain::result::{Error, Result};
use crate::domain::RegisteredUser;
use crate::ports::KeyValueStore;

/// Storage slot holding the registration document
pub const REGISTERED_USERS_KEY: &str = "registeredUsers";

#[derive(Debug, Clone, Serialize, Deserialize)]
struct StoredCredentials {
    id: String,
    email: String,
    password: String,
}

type Registrations = BTreeMap<String, StoredCredentials>;

fn parse(raw: Option<&str>) -> Result<Registrations> {
    match raw {
        Some(text) if !text.trim().is_empty() => Ok(serde_json::from_str(text)?),
        _ => Ok(Registrations::new()),
    }
}

/// Username → credentials mapping used for login validation
#[derive(Clone)]
pub struct UserRegistry {
    storage: Arc<dyn KeyValueStore>,
}

impl UserRegistry {
    pub fn new(storage: Arc<dyn KeyValueStore>) -> Self {
        Self { storage }
    }

    fn load(&self) -> Result<Registrations> {
        parse(self.storage.get(REGISTERED_USERS_KEY)?.as_deref())
    }

    /// Look up a registration by username
    pub fn find(&self, username: &str) -> Result<Option<RegisteredUser>> {
        Ok(self.load()?.remove(username).map(|c| RegisteredUser {
            username: username.to_string(),
            id: c.id,
            email: c.email,
            password: c.password,
        }))
    }

    /// All registrations, ordered by username
    pub fn all(&self) -> Result<Vec<RegisteredUser>> {
        Ok(self
            .load()?
            .into_iter()
            .map(|(username, c)| RegisteredUser {
                username,
                id: c.id,
                email: c.email,
                password: c.password,
            })
            .collect())
    }

    /// Persist a new registration
    ///
    /// The existence check and the write happen in one storage update, so a
    /// username already present fails with `Error::Conflict`.
    pub fn register(&self, user: &RegisteredUser) -> Result<()> {
        self.storage.update(REGISTERED_USERS_KEY, &mut |raw: Option<String>| -> Result<Option<String>> {
            let mut registrations = parse(raw.as_deref())?;
            if registrations.contains_key(&user.username) {
                return Err(Error::conflict(format!("username {} is taken", user.username)));
            }
            registrations.insert(
                user.username.clone(),
                StoredCredentials {
                    id: user.id.clone(),
                    email: user.email.clone(),
                    password: user.password.clone(),
                },
            );
            Ok(Some(serde_json::to_string(&registrations)?))
        })
    }
}
