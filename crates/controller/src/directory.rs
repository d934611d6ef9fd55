//! Client for the host directory's registration API.

use async_trait::async_trait;

use serde_json::{json, Value};
use telehost_common::Error;
use tracing::{debug, warn};

use crate::config::ControllerConfig;

/// Directory response to a host registration attempt.
///
/// Anything other than HTTP 200 is a hard failure; a successful response may
/// carry an authorization code for the service-account credential flow.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RegisterResponse {
    pub status: u16,
    pub authorization_code: Option<String>,
}

impl RegisterResponse {
    pub fn is_success(&self) -> bool {
        self.status == 200
    }
}

/// Performs the registration call against the directory service.
#[async_trait]
pub trait DirectoryClient: Send + Sync {
    async fn register_host(
        &self,
        host_id: &str,
        host_name: &str,
        public_key: &str,
        host_client_id: Option<&str>,
        token: &str,
    ) -> Result<RegisterResponse, Error>;
}

/// [`DirectoryClient`] speaking the directory's HTTP API.
pub struct HttpDirectoryClient {
    client: reqwest::Client,
    base_url: String,
}

impl HttpDirectoryClient {
    pub fn new(config: &ControllerConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: config.directory_base_url.trim_end_matches('/').to_string(),
        }
    }
}

#[async_trait]
impl DirectoryClient for HttpDirectoryClient {
    async fn register_host(
        &self,
        host_id: &str,
        host_name: &str,
        public_key: &str,
        host_client_id: Option<&str>,
        token: &str,
    ) -> Result<RegisterResponse, Error> {
        let body = json!({
            "data": {
                "hostId": host_id,
                "hostName": host_name,
                "publicKey": public_key,
            }
        });

        let mut request = self
            .client
            .post(format!("{}/@me/hosts", self.base_url))
            .bearer_auth(token)
            .json(&body);
        if let Some(client_id) = host_client_id {
            request = request.query(&[("hostClientId", client_id)]);
        }

        let response = request.send().await.map_err(|err| {
            warn!("directory request failed: {err}");
            Error::unexpected("register_host")
        })?;

        let status = response.status().as_u16();
        let text = response.text().await.unwrap_or_default();
        let authorization_code = extract_authorization_code(&text);
        debug!(
            status,
            has_auth_code = authorization_code.is_some(),
            "host registration response"
        );

        Ok(RegisterResponse {
            status,
            authorization_code,
        })
    }
}

/// Pull `data.authorizationCode` out of a response body; a malformed body
/// reads the same as a body without a code.
fn extract_authorization_code(body: &str) -> Option<String> {
    let value: Value = serde_json::from_str(body).ok()?;
    value
        .get("data")?
        .get("authorizationCode")?
        .as_str()
        .map(str::to_string)
}
