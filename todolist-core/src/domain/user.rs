//! User domain models

use serde::{Deserialize, Serialize};

/// A registered account, the source of truth for login validation.
///
/// The password is kept in plaintext. This is a known insecurity of the mock
/// backend; a real deployment would store and compare a salted hash.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegisteredUser {
    pub username: String,
    /// Id of the identity minted at sign-up
    pub id: String,
    pub email: String,
    pub password: String,
}

impl RegisteredUser {
    /// Whether `password` matches the stored one
    pub fn password_matches(&self, password: &str) -> bool {
        self.password == password
    }

    pub fn to_auth_user(&self) -> AuthUser {
        AuthUser {
            id: self.id.clone(),
            username: self.username.clone(),
            email: self.email.clone(),
        }
    }
}

/// The signed-in user handed back to callers by sign-up and sign-in
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthUser {
    pub id: String,
    pub username: String,
    pub email: String,
}
