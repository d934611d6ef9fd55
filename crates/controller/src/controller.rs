//! Orchestration of host registration and daemon lifecycle.

use std::sync::Arc;

use tracing::{debug, info, warn};
use uuid::Uuid;

use telehost_common::types::{
    AsyncResult, ControllerState, HostConfig, HostConfigUpdate, KeyPair, PairedClient,
    UsageStatsConsent,
};
use telehost_common::Error;

use crate::config::ControllerConfig;
use crate::directory::DirectoryClient;
use crate::facade::{DaemonFacade, Feature};
use crate::identity::IdentityResolver;
use crate::registry::HostRegistry;
use crate::signaling::{resolve_owner_jid, SignalingConnector};

/// Sequences the collaborators needed to provision, start, stop and
/// reconfigure the local remote-access host.
///
/// Every workflow is a linear async function: each step awaits the previous
/// one, nothing blocks a thread, and nothing is retried here. Concurrent
/// invocations are independent; each `start` owns its own freshly generated
/// host id and its own transient signaling session.
pub struct HostController {
    config: ControllerConfig,
    facade: Arc<dyn DaemonFacade>,
    directory: Arc<dyn DirectoryClient>,
    identity: Arc<dyn IdentityResolver>,
    registry: Arc<dyn HostRegistry>,
    signaling: Arc<dyn SignalingConnector>,
}

impl HostController {
    pub fn new(
        config: ControllerConfig,
        facade: Arc<dyn DaemonFacade>,
        directory: Arc<dyn DirectoryClient>,
        identity: Arc<dyn IdentityResolver>,
        registry: Arc<dyn HostRegistry>,
        signaling: Arc<dyn SignalingConnector>,
    ) -> Self {
        Self {
            config,
            facade,
            directory,
            identity,
            registry,
            signaling,
        }
    }

    /// Log the installed daemon version once at startup; a missing daemon is
    /// a normal condition, not an error.
    pub async fn report_daemon_version(&self) {
        match self.facade.daemon_version().await {
            Ok(version) if version.is_empty() => info!("host daemon not installed"),
            Ok(version) => info!(%version, "host daemon version"),
            Err(err) => debug!("host daemon version not available: {err}"),
        }
    }

    /// Register the host with the directory and start the daemon.
    ///
    /// A fresh host id is minted per attempt and never reused. Failures
    /// before the directory accepts the registration abort with no side
    /// effects; once registration has succeeded, any later failure
    /// unregisters the new host id again before the error is returned.
    pub async fn start(&self, pin: &str, consent: bool) -> Result<(), Error> {
        let host_id = Uuid::new_v4().to_string();

        // Up to the registration call the directory knows nothing about the
        // new host id, so these steps need no cleanup.
        let host_name = self.facade.host_name().await?;
        let key_pair = self.facade.generate_key_pair().await?;
        let host_client_id = if self.facade.has_feature(Feature::OauthClient).await? {
            Some(self.facade.host_client_id().await?)
        } else {
            None
        };
        let token = self.identity.token().await?;

        let response = self
            .directory
            .register_host(
                &host_id,
                &host_name,
                &key_pair.public_key,
                host_client_id.as_deref(),
                &token,
            )
            .await?;
        if !response.is_success() {
            warn!(status = response.status, "host registration rejected");
            return Err(Error::RegistrationFailed);
        }
        debug!(%host_id, "host registered with directory");

        match self
            .finish_start(
                &host_id,
                &host_name,
                key_pair,
                response.authorization_code,
                pin,
                consent,
            )
            .await
        {
            Ok(()) => Ok(()),
            Err(err) => {
                self.roll_back_registration(&host_id).await;
                Err(err)
            }
        }
    }

    /// Steps of `start` that run after the directory has accepted the
    /// registration; any error out of here requires a compensating
    /// unregistration of `host_id`.
    async fn finish_start(
        &self,
        host_id: &str,
        host_name: &str,
        key_pair: KeyPair,
        authorization_code: Option<String>,
        pin: &str,
        consent: bool,
    ) -> Result<(), Error> {
        let (xmpp_login, refresh_token) = match authorization_code {
            Some(code) => {
                let creds = self.facade.credentials_from_auth_code(&code).await?;
                (creds.user_email, Some(creds.refresh_token))
            }
            // No authorization code issued: fall back to the regular user
            // credential flow.
            None => (self.identity.email().await?, self.identity.refresh_token()),
        };

        let owner_jid = resolve_owner_jid(
            self.signaling.as_ref(),
            self.identity.as_ref(),
            &self.config.signaling_server,
        )
        .await?;
        let host_secret_hash = self.facade.pin_hash(host_id, pin).await?;

        let mut host_config = HostConfig {
            xmpp_login,
            oauth_refresh_token: refresh_token,
            host_id: host_id.to_string(),
            host_name: host_name.to_string(),
            host_secret_hash,
            private_key: key_pair.private_key,
            host_owner: None,
            host_owner_email: None,
        };
        // Most accounts use one identity for login and ownership; the owner
        // fields are only recorded when the two differ.
        if owner_jid != host_config.xmpp_login {
            let owner_email = self.identity.email().await?;
            if owner_email != owner_jid {
                host_config.host_owner_email = Some(owner_email);
            }
            host_config.host_owner = Some(owner_jid);
        }

        match self.facade.start_daemon(&host_config, consent).await? {
            AsyncResult::Ok => {
                self.registry
                    .local_host_started(host_name, host_id, &key_pair.public_key)
                    .await;
                info!(%host_id, "host daemon started");
                Ok(())
            }
            AsyncResult::Cancelled => Err(Error::Cancelled),
            other => {
                warn!(result = ?other, "daemon refused to start");
                Err(Error::unexpected("start_daemon"))
            }
        }
    }

    /// Compensating unregistration after a failed start. Awaited before the
    /// error is surfaced; its own failure is logged and swallowed so the
    /// original error always wins.
    async fn roll_back_registration(&self, host_id: &str) {
        if let Err(err) = self.registry.unregister_host(host_id).await {
            warn!(%host_id, "failed to unregister host after aborted start: {err}");
        }
    }

    /// Stop the daemon and drop the local host's directory registration.
    ///
    /// On CANCELLED or failure the registration is intentionally left in
    /// place; the daemon is still running.
    pub async fn stop(&self) -> Result<(), Error> {
        match self.facade.stop_daemon().await? {
            AsyncResult::Ok => {}
            AsyncResult::Cancelled => return Err(Error::Cancelled),
            other => {
                warn!(result = ?other, "daemon refused to stop");
                return Err(Error::unexpected("stop_daemon"));
            }
        }

        if let Some(host_id) = self.local_host_id().await {
            // The daemon is already down; unregistration failures only log.
            if let Err(err) = self.registry.unregister_host(&host_id).await {
                warn!(%host_id, "daemon stopped but unregistration failed: {err}");
            }
        }
        info!("host daemon stopped");
        Ok(())
    }

    /// Re-hash the PIN and persist it in the daemon config.
    pub async fn update_pin(&self, new_pin: &str) -> Result<(), Error> {
        let config = self
            .facade
            .daemon_config()
            .await?
            .filter(HostConfig::is_valid)
            .ok_or_else(|| Error::unexpected("daemon_config"))?;

        let host_secret_hash = self.facade.pin_hash(&config.host_id, new_pin).await?;
        let update = HostConfigUpdate {
            host_secret_hash: Some(host_secret_hash),
        };
        match self.facade.update_daemon_config(&update).await? {
            AsyncResult::Ok => {
                info!("host PIN updated");
                Ok(())
            }
            AsyncResult::Cancelled => Err(Error::Cancelled),
            other => {
                warn!(result = ?other, "daemon rejected config update");
                Err(Error::unexpected("update_daemon_config"))
            }
        }
    }

    /// Host id of the locally configured host, or `None` when the daemon has
    /// no usable config. Transport failures degrade to `None` as well.
    pub async fn local_host_id(&self) -> Option<String> {
        match self.facade.daemon_config().await {
            Ok(Some(config)) if config.is_valid() => Some(config.host_id),
            Ok(_) => None,
            Err(err) => {
                debug!("daemon config unavailable: {err}");
                None
            }
        }
    }

    /// Lifecycle state of the local daemon. A missing messaging channel
    /// reads as `NotInstalled`, any other failure as `Unknown`.
    pub async fn local_host_state(&self) -> ControllerState {
        match self.facade.daemon_state().await {
            Ok(state) => state,
            Err(Error::MissingPlugin) => ControllerState::NotInstalled,
            Err(err) => {
                debug!("daemon state unavailable: {err}");
                ControllerState::Unknown
            }
        }
    }

    /// Probe one optional daemon capability; failures read as unsupported.
    pub async fn has_feature(&self, feature: Feature) -> bool {
        self.facade.has_feature(feature).await.unwrap_or(false)
    }

    pub async fn consent(&self) -> Result<UsageStatsConsent, Error> {
        self.facade.usage_stats_consent().await
    }

    pub async fn daemon_version(&self) -> Result<String, Error> {
        self.facade.daemon_version().await
    }

    // Paired-client management is a straight pass-through to the daemon.

    pub async fn paired_clients(&self) -> Result<Vec<PairedClient>, Error> {
        self.facade.paired_clients().await
    }

    pub async fn delete_paired_client(&self, client_id: &str) -> Result<(), Error> {
        self.facade.delete_paired_client(client_id).await
    }

    pub async fn clear_paired_clients(&self) -> Result<(), Error> {
        self.facade.clear_paired_clients().await
    }
}
