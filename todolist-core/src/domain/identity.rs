//! Identity domain model

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// An authentication principal minted by the auth gateway
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    pub id: String,
    pub email: String,
}

impl Identity {
    pub fn new(id: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            email: email.into(),
        }
    }

    /// Mint a fresh identity with a random id
    pub fn mint(email: impl Into<String>) -> Self {
        Self::new(format!("user_{}", Uuid::new_v4().simple()), email)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identity_creation() {
        let identity = Identity::new("user-123", "test@example.com");
        assert_eq!(identity.id, "user-123");
        assert_eq!(identity.email, "test@example.com");
    }

    #[test]
    fn test_minted_ids_are_unique() {
        let a = Identity::mint("a@example.com");
        let b = Identity::mint("a@example.com");
        assert!(a.id.starts_with("user_"));
        assert_ne!(a.id, b.id);
    }
}
