//! Auth gateway port - identity minting and session bookkeeping

use async_trait::async_trait;

use crate::domain::result::Result;
use crate::domain::Identity;

/// Authentication backend abstraction
///
/// The gateway only mints and tracks identities. Credential checks live in
/// `AuthService`, which owns the registration records.
#[async_trait]
pub trait AuthGateway: Send + Sync {
    /// Create an identity for `email`
    async fn sign_up(&self, email: &str, password: &str) -> Result<Identity>;

    /// Make the identity for `email` the current one and return it
    async fn sign_in_with_password(&self, email: &str, password: &str) -> Result<Identity>;

    /// Forget the current identity
    async fn sign_out(&self) -> Result<()>;

    /// The current identity, if someone is signed in
    async fn get_user(&self) -> Result<Option<Identity>>;

    /// Make `identity` the one `email` maps to, e.g. when restoring a
    /// registration made through another gateway instance
    async fn remember(&self, identity: Identity) -> Result<()>;

    /// Drop the identity for `email`; signs it out if it is current.
    /// Unknown emails are ignored.
    async fn forget(&self, email: &str) -> Result<()>;
}
