//! Identity and OAuth surface consumed by the controller.

use async_trait::async_trait;

use telehost_common::Error;

/// Supplies the signed-in account's tokens and addresses.
#[async_trait]
pub trait IdentityResolver: Send + Sync {
    /// Bearer token used for directory and signaling access.
    async fn token(&self) -> Result<String, Error>;

    /// Canonical email address of the account.
    async fn email(&self) -> Result<String, Error>;

    /// Cached refresh token from the regular user credential flow, used when
    /// the directory does not issue an authorization code.
    fn refresh_token(&self) -> Option<String>;
}
