//! Auth service - username/password accounts over the mock gateway
//!
//! Usernames map onto synthetic identity emails (`{username}@{domain}`).
//! Login validation runs against the registration records in local storage;
//! the gateway only does session bookkeeping.

use std::sync::Arc;

use serde::Serialize;
use tokio::sync::Mutex;

use super::outcome::{finish, Failure};
use super::registry::UserRegistry;
use crate::config::Config;
use crate::domain::record::to_record;
use crate::domain::result::{Error, OperationResult};
use crate::domain::{AuthUser, Identity, RegisteredUser};
use crate::i18n::{Locale, Message};
use crate::ports::{AuthGateway, DataStore, DeleteRequest, Filter, InsertRequest, KeyValueStore};

/// Table receiving one `{id, username}` row per sign-up
pub const USERS_TABLE: &str = "users";

#[derive(Serialize)]
struct UserRow<'a> {
    id: &'a str,
    username: &'a str,
}

/// Auth service for sign-up, sign-in and sign-out
pub struct AuthService {
    store: Arc<dyn DataStore>,
    gateway: Arc<dyn AuthGateway>,
    registry: UserRegistry,
    config: Config,
    // Serializes sign-ups so the existence check and the write can't interleave
    sign_up_lock: Mutex<()>,
}

impl AuthService {
    pub fn new(
        store: Arc<dyn DataStore>,
        gateway: Arc<dyn AuthGateway>,
        storage: Arc<dyn KeyValueStore>,
        config: &Config,
    ) -> Self {
        Self {
            store,
            gateway,
            registry: UserRegistry::new(storage),
            config: config.clone(),
            sign_up_lock: Mutex::new(()),
        }
    }

    /// The registration records this service validates against
    pub fn registry(&self) -> &UserRegistry {
        &self.registry
    }

    fn locale(&self) -> Locale {
        self.config.locale
    }

    /// Register a new account
    ///
    /// Fails with "username exists" when the username is already registered,
    /// whatever the password.
    pub async fn sign_up(&self, username: &str, password: &str) -> OperationResult<AuthUser> {
        let result = self.try_sign_up(username.trim(), password).await;
        finish("sign_up", self.locale(), result, Message::SignUpFailed)
    }

    async fn try_sign_up(&self, username: &str, password: &str) -> Result<AuthUser, Failure> {
        if username.is_empty() || password.trim().is_empty() {
            return Err(Failure::Rejected(Message::CredentialsRequired));
        }

        let _guard = self.sign_up_lock.lock().await;

        if self.registry.find(username)?.is_some() {
            return Err(Failure::Rejected(Message::UsernameExists));
        }

        let email = self.config.email_for(username);
        let identity = match self.gateway.sign_up(&email, password).await {
            Ok(identity) => identity,
            Err(Error::Conflict(_)) => return Err(Failure::Rejected(Message::UsernameExists)),
            Err(e) => return Err(e.into()),
        };

        let user = RegisteredUser {
            username: username.to_string(),
            id: identity.id,
            email,
            password: password.to_string(),
        };

        match self.record_registration(&user).await {
            Ok(()) => {
                tracing::info!(username, id = %user.id, "user registered");
                Ok(user.to_auth_user())
            }
            Err(e) => {
                self.undo_registration(&user).await;
                match e {
                    Error::Conflict(_) => Err(Failure::Rejected(Message::UsernameExists)),
                    e => Err(e.into()),
                }
            }
        }
    }

    /// Write the `users` row and the registration record for a fresh identity
    async fn record_registration(&self, user: &RegisteredUser) -> crate::domain::result::Result<()> {
        let row = to_record(&UserRow {
            id: &user.id,
            username: &user.username,
        })?;
        self.store.insert(&InsertRequest::new(USERS_TABLE, row)).await?;
        self.registry.register(user)
    }

    /// Roll back the gateway identity and `users` row of a sign-up that could
    /// not be recorded, so the username stays free
    async fn undo_registration(&self, user: &RegisteredUser) {
        if let Err(e) = self.gateway.forget(&user.email).await {
            tracing::warn!(username = %user.username, error = %e, "could not forget gateway identity");
        }
        let request = DeleteRequest::new(USERS_TABLE, Filter::eq("id", user.id.as_str()));
        if let Err(e) = self.store.delete(&request).await {
            tracing::warn!(username = %user.username, error = %e, "could not remove users row");
        }
    }

    /// Sign in with a registered username
    ///
    /// On success the returned id is the one recorded at sign-up.
    pub async fn sign_in(&self, username: &str, password: &str) -> OperationResult<AuthUser> {
        let result = self.try_sign_in(username.trim(), password).await;
        finish("sign_in", self.locale(), result, Message::SignInFailed)
    }

    async fn try_sign_in(&self, username: &str, password: &str) -> Result<AuthUser, Failure> {
        if username.is_empty() || password.trim().is_empty() {
            return Err(Failure::Rejected(Message::CredentialsRequired));
        }

        let user = self
            .registry
            .find(username)?
            .ok_or(Failure::Rejected(Message::NotRegistered))?;

        if !user.password_matches(password) {
            return Err(Failure::Rejected(Message::WrongCredentials));
        }

        // The registration may come from another process whose gateway minted it
        let registered = Identity::new(user.id.clone(), user.email.clone());
        let gateway_result = match self.gateway.remember(registered).await {
            Ok(()) => self.gateway.sign_in_with_password(&user.email, password).await,
            Err(e) => Err(e),
        };
        if let Err(e) = gateway_result {
            tracing::warn!(username, error = %e, "gateway refused sign-in");
            return Err(Failure::Rejected(Message::WrongCredentials));
        }

        tracing::info!(username, "user signed in");
        Ok(user.to_auth_user())
    }

    /// Sign the current identity out of the gateway
    pub async fn sign_out(&self) -> OperationResult<()> {
        let result = self.gateway.sign_out().await.map_err(Failure::from);
        finish("sign_out", self.locale(), result, Message::SignOutFailed)
    }

    /// The gateway's current identity, if any
    pub async fn current_identity(&self) -> OperationResult<Option<Identity>> {
        let result = self.gateway.get_user().await.map_err(Failure::from);
        finish("current_identity", self.locale(), result, Message::SignInFailed)
    }
}
