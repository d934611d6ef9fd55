//! Wire-level types shared between the controller and the host daemon.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::Error;

/// Host configuration persisted by the daemon.
///
/// Field names match the daemon's JSON config keys. Optional fields are
/// omitted from serialized output entirely so a config round-trips without
/// sprouting null entries.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HostConfig {
    #[serde(default)]
    pub xmpp_login: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub oauth_refresh_token: Option<String>,
    #[serde(default)]
    pub host_id: String,
    #[serde(default)]
    pub host_name: String,
    #[serde(default)]
    pub host_secret_hash: String,
    #[serde(default)]
    pub private_key: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub host_owner: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub host_owner_email: Option<String>,
}

impl HostConfig {
    /// A config without a host id or login is treated as absent by lookups.
    pub fn is_valid(&self) -> bool {
        !self.host_id.is_empty() && !self.xmpp_login.is_empty()
    }
}

/// Partial daemon config; only populated fields are rewritten by the daemon.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HostConfigUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub host_secret_hash: Option<String>,
}

/// Result code reported by every daemon mutation call.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AsyncResult {
    Ok,
    Failed,
    Cancelled,
    FailedDirectory,
}

impl FromStr for AsyncResult {
    type Err = Error;

    fn from_str(name: &str) -> Result<Self, Error> {
        match name {
            "OK" => Ok(AsyncResult::Ok),
            "FAILED" => Ok(AsyncResult::Failed),
            "CANCELLED" => Ok(AsyncResult::Cancelled),
            "FAILED_DIRECTORY" => Ok(AsyncResult::FailedDirectory),
            other => Err(Error::unexpected(format!("unknown async result '{other}'"))),
        }
    }
}

/// Lifecycle state of the local host daemon.
///
/// `NotInstalled` is inferred client-side from a missing messaging channel;
/// the remaining values are reported by the daemon itself.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ControllerState {
    NotImplemented,
    NotInstalled,
    Stopped,
    Starting,
    Started,
    Stopping,
    Unknown,
}

impl FromStr for ControllerState {
    type Err = Error;

    fn from_str(name: &str) -> Result<Self, Error> {
        match name {
            "NOT_IMPLEMENTED" => Ok(ControllerState::NotImplemented),
            "STOPPED" => Ok(ControllerState::Stopped),
            "STARTING" => Ok(ControllerState::Starting),
            "STARTED" => Ok(ControllerState::Started),
            "STOPPING" => Ok(ControllerState::Stopping),
            "UNKNOWN" => Ok(ControllerState::Unknown),
            other => Err(Error::unexpected(format!(
                "unknown controller state '{other}'"
            ))),
        }
    }
}

/// Asymmetric key pair generated by the daemon for one start attempt.
/// The controller never persists it; the daemon owns the private key's
/// lifetime once the start config is submitted.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyPair {
    pub private_key: String,
    pub public_key: String,
}

/// Credentials minted by the daemon from a directory authorization code.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthCodeCredentials {
    pub refresh_token: String,
    pub user_email: String,
}

/// User consent to usage-stats collection, as reported by the daemon.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct UsageStatsConsent {
    pub supported: bool,
    pub allowed: bool,
    pub set_by_policy: bool,
}

/// One client paired with the local host.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PairedClient {
    pub client_id: String,
    pub client_name: String,
    pub created_time: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_host_config_validity() {
        assert!(!HostConfig::default().is_valid());

        let mut config = HostConfig {
            host_id: "8b4f0a52-66a7-4b23-b9ac-6e76ad4f6c51".into(),
            xmpp_login: "user@example.com".into(),
            ..Default::default()
        };
        assert!(config.is_valid());

        config.xmpp_login.clear();
        assert!(!config.is_valid());

        config.xmpp_login = "user@example.com".into();
        config.host_id.clear();
        assert!(!config.is_valid());
    }

    #[test]
    fn test_host_config_omits_absent_owner_fields() {
        let config = HostConfig {
            xmpp_login: "user@example.com".into(),
            host_id: "id".into(),
            host_name: "host".into(),
            host_secret_hash: "hash".into(),
            private_key: "key".into(),
            ..Default::default()
        };
        let json = serde_json::to_value(&config).expect("serialize");
        let object = json.as_object().expect("object");
        assert!(!object.contains_key("oauth_refresh_token"));
        assert!(!object.contains_key("host_owner"));
        assert!(!object.contains_key("host_owner_email"));
    }

    #[test]
    fn test_config_update_serializes_secret_hash_only() {
        let update = HostConfigUpdate {
            host_secret_hash: Some("hash".into()),
        };
        let json = serde_json::to_value(&update).expect("serialize");
        assert_eq!(json, serde_json::json!({ "host_secret_hash": "hash" }));
    }

    #[test]
    fn test_async_result_from_wire_names() {
        assert_eq!("OK".parse::<AsyncResult>(), Ok(AsyncResult::Ok));
        assert_eq!("FAILED".parse::<AsyncResult>(), Ok(AsyncResult::Failed));
        assert_eq!(
            "CANCELLED".parse::<AsyncResult>(),
            Ok(AsyncResult::Cancelled)
        );
        assert_eq!(
            "FAILED_DIRECTORY".parse::<AsyncResult>(),
            Ok(AsyncResult::FailedDirectory)
        );
        assert!(matches!(
            "EXPLODED".parse::<AsyncResult>(),
            Err(Error::Unexpected { .. })
        ));
    }

    #[test]
    fn test_controller_state_from_wire_names() {
        assert_eq!(
            "STARTED".parse::<ControllerState>(),
            Ok(ControllerState::Started)
        );
        assert_eq!(
            "STOPPING".parse::<ControllerState>(),
            Ok(ControllerState::Stopping)
        );
        // NOT_INSTALLED is a client-side inference, never a wire value.
        assert!(matches!(
            "NOT_INSTALLED".parse::<ControllerState>(),
            Err(Error::Unexpected { .. })
        ));
        assert!(matches!(
            "REBOOTING".parse::<ControllerState>(),
            Err(Error::Unexpected { .. })
        ));
    }
}
