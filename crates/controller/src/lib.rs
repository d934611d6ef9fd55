//! Registration and lifecycle orchestration for the telehost host daemon.
//!
//! The [`HostController`] sequences the collaborators needed to provision a
//! remote-access host: the privileged daemon behind [`DaemonFacade`], the
//! directory HTTP API behind [`DirectoryClient`], the account's identity
//! provider, the signaling service used to attribute host ownership, and the
//! host-list model that tracks registrations. The transports themselves live
//! elsewhere; this crate owns only the call contracts and their ordering.

pub mod config;
pub mod controller;
pub mod directory;
pub mod facade;
pub mod identity;
pub mod registry;
pub mod signaling;

pub use config::ControllerConfig;
pub use controller::HostController;
pub use directory::{DirectoryClient, HttpDirectoryClient, RegisterResponse};
pub use facade::{DaemonFacade, Feature};
pub use identity::IdentityResolver;
pub use registry::HostRegistry;
pub use signaling::{SignalingConnector, SignalingSession, SignalingState};
