//! Contract of the privileged host daemon.

use async_trait::async_trait;

use telehost_common::types::{
    AsyncResult, AuthCodeCredentials, ControllerState, HostConfig, HostConfigUpdate, KeyPair,
    PairedClient, UsageStatsConsent,
};
use telehost_common::Error;

/// Optional daemon capabilities probed via [`DaemonFacade::has_feature`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Feature {
    PairingRegistry,
    OauthClient,
}

impl Feature {
    pub fn as_str(&self) -> &'static str {
        match self {
            Feature::PairingRegistry => "pairingRegistry",
            Feature::OauthClient => "oauthClient",
        }
    }
}

/// Asynchronous surface of the host daemon's communication channel.
///
/// The transport (native messaging, RPC socket) is implemented elsewhere; the
/// controller depends only on this contract. Every call either resolves with
/// its value or fails with a [`Error`]; mutation calls additionally report an
/// [`AsyncResult`] code on success.
#[async_trait]
pub trait DaemonFacade: Send + Sync {
    /// Version of the installed daemon, empty when not installed.
    async fn daemon_version(&self) -> Result<String, Error>;

    async fn has_feature(&self, feature: Feature) -> Result<bool, Error>;

    async fn usage_stats_consent(&self) -> Result<UsageStatsConsent, Error>;

    /// Human-readable name of the machine.
    async fn host_name(&self) -> Result<String, Error>;

    /// Generate a fresh asymmetric key pair for one start attempt.
    async fn generate_key_pair(&self) -> Result<KeyPair, Error>;

    /// OAuth client id scoped to this daemon installation. Only meaningful
    /// when [`Feature::OauthClient`] is supported.
    async fn host_client_id(&self) -> Result<String, Error>;

    /// Hash a PIN with the host id as salt.
    async fn pin_hash(&self, host_id: &str, pin: &str) -> Result<String, Error>;

    /// Exchange a directory authorization code for service-account
    /// credentials.
    async fn credentials_from_auth_code(&self, code: &str)
        -> Result<AuthCodeCredentials, Error>;

    async fn start_daemon(&self, config: &HostConfig, consent: bool)
        -> Result<AsyncResult, Error>;

    async fn stop_daemon(&self) -> Result<AsyncResult, Error>;

    /// Currently persisted daemon config, `None` when the daemon has none.
    async fn daemon_config(&self) -> Result<Option<HostConfig>, Error>;

    async fn update_daemon_config(&self, update: &HostConfigUpdate)
        -> Result<AsyncResult, Error>;

    async fn daemon_state(&self) -> Result<ControllerState, Error>;

    async fn paired_clients(&self) -> Result<Vec<PairedClient>, Error>;

    async fn delete_paired_client(&self, client_id: &str) -> Result<(), Error>;

    async fn clear_paired_clients(&self) -> Result<(), Error>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_feature_wire_names() {
        assert_eq!(Feature::PairingRegistry.as_str(), "pairingRegistry");
        assert_eq!(Feature::OauthClient.as_str(), "oauthClient");
    }
}
