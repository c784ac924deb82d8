//! Contracts for the external collaborators the gate consumes.
//!
//! The wallet signer, the verification backend and the router live outside
//! this crate. Implementations must be `Send + Sync`; the probe shares them
//! with a detached task.

pub mod memory;

use async_trait::async_trait;

use crate::types::{Destination, NavParams, SessionCredential};

/// Signs a login message with the wallet and exchanges it for a session token.
///
/// Never fails: every failure is encoded as `SessionCredential::Failed`.
#[async_trait]
pub trait WalletLogin: Send + Sync {
    /// Attempt a login.
    async fn login(&self) -> SessionCredential;
}

/// Backend citizenship lookup for the current wallet.
#[async_trait]
pub trait CitizenshipCheck: Send + Sync {
    /// Error type for failed lookups.
    type Error: std::error::Error + Send + Sync;

    /// Whether the wallet is a verified citizen.
    async fn is_citizen(&self) -> Result<bool, Self::Error>;
}

/// Server-side top-wallet verification. Best-effort telemetry only.
#[async_trait]
pub trait TopWalletVerifier: Send + Sync {
    /// Error type for failed verification calls.
    type Error: std::error::Error + Send + Sync;

    /// Ask the backend to verify the wallet. The response is opaque.
    async fn verify_top_wallet(&self) -> Result<serde_json::Value, Self::Error>;
}

/// Application router.
pub trait Navigator: Send + Sync {
    /// Navigate to `destination`, passing `params` along.
    fn navigate(&self, destination: Destination, params: Option<NavParams>);
}

pub use memory::{
    MemoryCollaboratorError, NavigationCall, RecordingNavigator, StaticCitizenshipCheck,
    StaticTopWalletVerifier, StaticWalletLogin,
};
