//! Transient signaling sessions, used to resolve the account's canonical
//! bare address for host-ownership attribution.

use async_trait::async_trait;

use telehost_common::Error;
use tracing::debug;

use crate::identity::IdentityResolver;

/// Observable states of a signaling session.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SignalingState {
    Connecting,
    Connected,
    Failed,
}

/// One signaling connection. Dropping the session releases the connection;
/// reconnect handling belongs to the signaling implementation, not here.
#[async_trait]
pub trait SignalingSession: Send {
    /// Next observed state transition.
    async fn next_state(&mut self) -> SignalingState;

    /// Full address assigned by the server; meaningful once connected.
    fn jid(&self) -> String;

    /// Underlying failure; meaningful once failed.
    fn error(&self) -> Error;
}

/// Opens transient signaling sessions.
#[async_trait]
pub trait SignalingConnector: Send + Sync {
    async fn connect(
        &self,
        server: &str,
        username: &str,
        token: &str,
    ) -> Result<Box<dyn SignalingSession>, Error>;
}

/// Resolve the signed-in account's bare address: the part of the session JID
/// before the first `/`, lower-cased.
///
/// The session is owned by this call and dropped on both exits. Only the
/// Connected and Failed transitions are acted upon.
pub async fn resolve_owner_jid(
    connector: &dyn SignalingConnector,
    identity: &dyn IdentityResolver,
    server: &str,
) -> Result<String, Error> {
    let token = identity.token().await?;
    let email = identity.email().await?;
    let mut session = connector.connect(server, &email, &token).await?;
    loop {
        match session.next_state().await {
            SignalingState::Connected => {
                let jid = session.jid();
                let bare = jid.split('/').next().unwrap_or(&jid).to_ascii_lowercase();
                debug!(owner = %bare, "resolved owner address");
                return Ok(bare);
            }
            SignalingState::Failed => return Err(session.error()),
            SignalingState::Connecting => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::VecDeque;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    use super::*;

    struct StubIdentity;

    #[async_trait]
    impl IdentityResolver for StubIdentity {
        async fn token(&self) -> Result<String, Error> {
            Ok("token".into())
        }

        async fn email(&self) -> Result<String, Error> {
            Ok("user@example.com".into())
        }

        fn refresh_token(&self) -> Option<String> {
            None
        }
    }

    struct StubSession {
        transitions: VecDeque<SignalingState>,
        jid: String,
        drops: Arc<AtomicUsize>,
    }

    impl Drop for StubSession {
        fn drop(&mut self) {
            self.drops.fetch_add(1, Ordering::SeqCst);
        }
    }

    #[async_trait]
    impl SignalingSession for StubSession {
        async fn next_state(&mut self) -> SignalingState {
            self.transitions
                .pop_front()
                .unwrap_or(SignalingState::Failed)
        }

        fn jid(&self) -> String {
            self.jid.clone()
        }

        fn error(&self) -> Error {
            Error::unexpected("signaling")
        }
    }

    struct StubConnector {
        transitions: Vec<SignalingState>,
        jid: String,
        drops: Arc<AtomicUsize>,
    }

    #[async_trait]
    impl SignalingConnector for StubConnector {
        async fn connect(
            &self,
            _server: &str,
            _username: &str,
            _token: &str,
        ) -> Result<Box<dyn SignalingSession>, Error> {
            Ok(Box::new(StubSession {
                transitions: self.transitions.iter().copied().collect(),
                jid: self.jid.clone(),
                drops: self.drops.clone(),
            }))
        }
    }

    #[tokio::test]
    async fn test_resolves_lowercased_bare_jid() {
        let drops = Arc::new(AtomicUsize::new(0));
        let connector = StubConnector {
            transitions: vec![SignalingState::Connecting, SignalingState::Connected],
            jid: "Owner@Example.COM/work-laptop".into(),
            drops: drops.clone(),
        };

        let jid = resolve_owner_jid(&connector, &StubIdentity, "sig.example.com")
            .await
            .expect("resolve");
        assert_eq!(jid, "owner@example.com");
        assert_eq!(drops.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_jid_without_resource_is_kept_whole() {
        let drops = Arc::new(AtomicUsize::new(0));
        let connector = StubConnector {
            transitions: vec![SignalingState::Connected],
            jid: "owner@example.com".into(),
            drops: drops.clone(),
        };

        let jid = resolve_owner_jid(&connector, &StubIdentity, "sig.example.com")
            .await
            .expect("resolve");
        assert_eq!(jid, "owner@example.com");
    }

    #[tokio::test]
    async fn test_failed_connection_disposes_session_once() {
        let drops = Arc::new(AtomicUsize::new(0));
        let connector = StubConnector {
            transitions: vec![SignalingState::Connecting, SignalingState::Failed],
            jid: String::new(),
            drops: drops.clone(),
        };

        let err = resolve_owner_jid(&connector, &StubIdentity, "sig.example.com")
            .await
            .expect_err("must fail");
        assert_eq!(err, Error::unexpected("signaling"));
        assert_eq!(drops.load(Ordering::SeqCst), 1);
    }
}
