//! Host-list model notified of registration outcomes.

use async_trait::async_trait;

use telehost_common::Error;

/// Tracks the hosts registered to this account.
#[async_trait]
pub trait HostRegistry: Send + Sync {
    /// Drop a host's directory registration, e.g. to roll back a start
    /// attempt that failed after the directory had accepted it.
    async fn unregister_host(&self, host_id: &str) -> Result<(), Error>;

    /// Record that the local host came online.
    async fn local_host_started(&self, host_name: &str, host_id: &str, public_key: &str);
}
