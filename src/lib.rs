//! # wallet-auth-gate
//!
//! Launch-time authentication gate for a wallet application.
//!
//! On every cold start the gate answers one question:
//!
//! > Is this wallet logged in **and** a verified citizen?
//!
//! ## Core Contract
//!
//! 1. Run the wallet login, the citizenship check and a minimum splash delay
//!    concurrently, and wait for all three
//! 2. Reconcile the results under partial failure, failing closed
//! 3. Commit the session flag and issue **exactly one** navigation
//!
//! ## Architecture
//!
//! ```text
//! WalletLogin ─┐
//! Citizenship ─┼─▶ CredentialProbe ─▶ GateOutcome ─▶ AuthGateRouter ─▶ Navigator
//! min delay ───┘         │                                 │
//!                        └─▶ TopWalletVerifier (detached)  └─▶ SessionState
//!                                                                   │
//!                                                           DialogOverlay ◀─ rendering
//! ```
//!
//! ## Guarantees
//!
//! - Same login + citizenship results → same outcome, whatever the completion order
//! - The gate never resolves before the minimum delay
//! - A failed or late citizenship check never routes to the authenticated app
//! - One navigation per mount, however often `evaluate` is called

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod types;
pub mod collaborators;
pub mod config;
pub mod probe;
pub mod overlay;
pub mod session;
pub mod router;

// Re-exports
pub use types::{
    SessionCredential, CitizenshipStatus, LaunchState, NavParams,
    Destination, GateOutcome, GateDecision,
    DialogDescriptor, DialogButton,
};
pub use collaborators::{WalletLogin, CitizenshipCheck, TopWalletVerifier, Navigator};
pub use config::{GateConfig, ConfigError};
pub use probe::CredentialProbe;
pub use overlay::DialogOverlay;
pub use session::{SessionState, SessionSnapshot, CommittedRoute};
pub use router::{AuthGateRouter, GatePhase};
