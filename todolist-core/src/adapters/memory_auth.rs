//! In-memory auth gateway
//!
//! Mints identities and tracks the current one. Identities are remembered by
//! email, so an email never maps to more than one identity for the lifetime
//! of the gateway.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::domain::result::{Error, Result};
use crate::domain::Identity;
use crate::ports::AuthGateway;

#[derive(Default)]
struct GatewayState {
    identities: HashMap<String, Identity>,
    current: Option<Identity>,
}

/// Auth gateway backed by process memory
#[derive(Default)]
pub struct InMemoryAuthGateway {
    state: Mutex<GatewayState>,
}

impl InMemoryAuthGateway {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of identities minted or remembered so far
    pub fn identity_count(&self) -> Result<usize> {
        Ok(self.state.lock()?.identities.len())
    }
}

#[async_trait]
impl AuthGateway for InMemoryAuthGateway {
    async fn sign_up(&self, email: &str, _password: &str) -> Result<Identity> {
        tracing::debug!(email, "gateway sign_up");

        let mut state = self.state.lock()?;
        if state.identities.contains_key(email) {
            return Err(Error::conflict(format!("identity already exists for {}", email)));
        }

        let identity = Identity::mint(email);
        state.identities.insert(email.to_string(), identity.clone());
        Ok(identity)
    }

    async fn sign_in_with_password(&self, email: &str, _password: &str) -> Result<Identity> {
        tracing::debug!(email, "gateway sign_in_with_password");

        let mut state = self.state.lock()?;
        let identity = state
            .identities
            .entry(email.to_string())
            .or_insert_with(|| Identity::mint(email))
            .clone();
        state.current = Some(identity.clone());
        Ok(identity)
    }

    async fn sign_out(&self) -> Result<()> {
        tracing::debug!("gateway sign_out");
        self.state.lock()?.current = None;
        Ok(())
    }

    async fn get_user(&self) -> Result<Option<Identity>> {
        Ok(self.state.lock()?.current.clone())
    }

    async fn remember(&self, identity: Identity) -> Result<()> {
        tracing::debug!(email = %identity.email, id = %identity.id, "gateway remember");
        let mut state = self.state.lock()?;
        state.identities.insert(identity.email.clone(), identity);
        Ok(())
    }

    async fn forget(&self, email: &str) -> Result<()> {
        tracing::debug!(email, "gateway forget");
        let mut state = self.state.lock()?;
        state.identities.remove(email);
        if state.current.as_ref().is_some_and(|c| c.email == email) {
            state.current = None;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_sign_up_mints_one_identity_per_email() {
        let gateway = InMemoryAuthGateway::new();

        let identity = gateway.sign_up("alice@example.com", "pw").await.unwrap();
        assert_eq!(identity.email, "alice@example.com");

        let err = gateway.sign_up("alice@example.com", "other").await.unwrap_err();
        assert!(matches!(err, Error::Conflict(_)));
        assert_eq!(gateway.identity_count().unwrap(), 1);
    }

    #[tokio::test]
    async fn test_sign_in_reuses_identity() {
        let gateway = InMemoryAuthGateway::new();
        let signed_up = gateway.sign_up("bob@example.com", "pw").await.unwrap();

        let first = gateway.sign_in_with_password("bob@example.com", "pw").await.unwrap();
        let second = gateway.sign_in_with_password("bob@example.com", "pw").await.unwrap();
        assert_eq!(first, signed_up);
        assert_eq!(second, signed_up);
        assert_eq!(gateway.get_user().await.unwrap(), Some(signed_up));
    }

    #[tokio::test]
    async fn test_sign_in_unknown_email_mints_once() {
        let gateway = InMemoryAuthGateway::new();
        let a = gateway.sign_in_with_password("new@example.com", "pw").await.unwrap();
        let b = gateway.sign_in_with_password("new@example.com", "pw").await.unwrap();
        assert_eq!(a.id, b.id);
        assert_eq!(gateway.identity_count().unwrap(), 1);
    }

    #[tokio::test]
    async fn test_remember_restores_identity() {
        let gateway = InMemoryAuthGateway::new();
        let known = Identity::new("user_known", "carol@example.com");
        gateway.remember(known.clone()).await.unwrap();

        let signed_in = gateway.sign_in_with_password("carol@example.com", "pw").await.unwrap();
        assert_eq!(signed_in, known);
    }

    #[tokio::test]
    async fn test_remember_replaces_minted_identity() {
        let gateway = InMemoryAuthGateway::new();
        let minted = gateway.sign_in_with_password("erin@example.com", "pw").await.unwrap();

        let registered = Identity::new("user_registered", "erin@example.com");
        gateway.remember(registered.clone()).await.unwrap();

        let signed_in = gateway.sign_in_with_password("erin@example.com", "pw").await.unwrap();
        assert_ne!(signed_in.id, minted.id);
        assert_eq!(signed_in, registered);
        assert_eq!(gateway.identity_count().unwrap(), 1);
    }

    #[tokio::test]
    async fn test_forget_allows_sign_up_again() {
        let gateway = InMemoryAuthGateway::new();
        gateway.sign_up("frank@example.com", "pw").await.unwrap();
        gateway.sign_in_with_password("frank@example.com", "pw").await.unwrap();

        gateway.forget("frank@example.com").await.unwrap();
        assert!(gateway.get_user().await.unwrap().is_none());
        assert_eq!(gateway.identity_count().unwrap(), 0);

        assert!(gateway.sign_up("frank@example.com", "pw").await.is_ok());
        gateway.forget("nobody@example.com").await.unwrap();
    }

    #[tokio::test]
    async fn test_sign_out_clears_current() {
        let gateway = InMemoryAuthGateway::new();
        assert!(gateway.get_user().await.unwrap().is_none());

        gateway.sign_in_with_password("dave@example.com", "pw").await.unwrap();
        assert!(gateway.get_user().await.unwrap().is_some());

        gateway.sign_out().await.unwrap();
        assert!(gateway.get_user().await.unwrap().is_none());
    }
}
