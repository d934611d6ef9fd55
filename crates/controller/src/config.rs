//! Controller-level settings.

use serde::{Deserialize, Serialize};

pub const DEFAULT_DIRECTORY_BASE_URL: &str = "https://api.telehost.dev/v1";
pub const DEFAULT_SIGNALING_SERVER: &str = "xmpp.telehost.dev:5222";

/// Endpoints the controller talks to. Everything else (socket paths, token
/// caches) is owned by the individual collaborators.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct ControllerConfig {
    pub directory_base_url: String,
    pub signaling_server: String,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            directory_base_url: DEFAULT_DIRECTORY_BASE_URL.to_string(),
            signaling_server: DEFAULT_SIGNALING_SERVER.to_string(),
        }
    }
}

impl ControllerConfig {
    /// Defaults with `TELEHOST_DIRECTORY_URL` / `TELEHOST_SIGNALING_SERVER`
    /// overrides applied.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Ok(url) = std::env::var("TELEHOST_DIRECTORY_URL") {
            config.directory_base_url = url;
        }
        if let Ok(server) = std::env::var("TELEHOST_SIGNALING_SERVER") {
            config.signaling_server = server;
        }
        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ControllerConfig::default();
        assert_eq!(config.directory_base_url, DEFAULT_DIRECTORY_BASE_URL);
        assert_eq!(config.signaling_server, DEFAULT_SIGNALING_SERVER);
    }
}
