//! In-memory collaborators for testing and simulation.
//!
//! Each double returns a fixed answer after an optional delay and counts how
//! often it was called. A double built with `hanging()` never answers.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use async_trait::async_trait;
use parking_lot::Mutex;

use crate::types::{Destination, NavParams, SessionCredential};
use super::{CitizenshipCheck, Navigator, TopWalletVerifier, WalletLogin};

/// Error type for in-memory collaborators.
#[derive(Debug, Clone, thiserror::Error)]
pub enum MemoryCollaboratorError {
    /// Backend rejected the request.
    #[error("Rejected: {0}")]
    Rejected(String),
}

async fn respond<T: Clone>(delay: Duration, response: &Option<T>) -> T {
    if !delay.is_zero() {
        tokio::time::sleep(delay).await;
    }
    match response {
        Some(value) => value.clone(),
        None => std::future::pending().await,
    }
}

/// Wallet login with a fixed result.
#[derive(Debug)]
pub struct StaticWalletLogin {
    response: Option<SessionCredential>,
    delay: Duration,
    calls: AtomicUsize,
}

impl StaticWalletLogin {
    /// Login that returns `credential` immediately.
    pub fn new(credential: SessionCredential) -> Self {
        Self {
            response: Some(credential),
            delay: Duration::ZERO,
            calls: AtomicUsize::new(0),
        }
    }

    /// Login that never completes.
    pub fn hanging() -> Self {
        Self {
            response: None,
            delay: Duration::ZERO,
            calls: AtomicUsize::new(0),
        }
    }

    /// Answer only after `delay`.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Number of login attempts so far.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl WalletLogin for StaticWalletLogin {
    async fn login(&self) -> SessionCredential {
        self.calls.fetch_add(1, Ordering::SeqCst);
        respond(self.delay, &self.response).await
    }
}

/// Citizenship check with a fixed answer or rejection.
#[derive(Debug)]
pub struct StaticCitizenshipCheck {
    response: Option<Result<bool, String>>,
    delay: Duration,
    calls: AtomicUsize,
}

impl StaticCitizenshipCheck {
    /// Check that answers `is_citizen`.
    pub fn answering(is_citizen: bool) -> Self {
        Self::with_response(Some(Ok(is_citizen)))
    }

    /// Check that rejects with `reason`.
    pub fn rejecting(reason: impl Into<String>) -> Self {
        Self::with_response(Some(Err(reason.into())))
    }

    /// Check that never completes.
    pub fn hanging() -> Self {
        Self::with_response(None)
    }

    fn with_response(response: Option<Result<bool, String>>) -> Self {
        Self {
            response,
            delay: Duration::ZERO,
            calls: AtomicUsize::new(0),
        }
    }

    /// Answer only after `delay`.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Number of lookups so far.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl CitizenshipCheck for StaticCitizenshipCheck {
    type Error = MemoryCollaboratorError;

    async fn is_citizen(&self) -> Result<bool, Self::Error> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        respond(self.delay, &self.response)
            .await
            .map_err(MemoryCollaboratorError::Rejected)
    }
}

/// Top-wallet verifier with a fixed response.
#[derive(Debug)]
pub struct StaticTopWalletVerifier {
    response: Result<serde_json::Value, String>,
    delay: Duration,
    calls: AtomicUsize,
}

impl StaticTopWalletVerifier {
    /// Verifier that succeeds with `response`.
    pub fn ok(response: serde_json::Value) -> Self {
        Self {
            response: Ok(response),
            delay: Duration::ZERO,
            calls: AtomicUsize::new(0),
        }
    }

    /// Verifier that fails with `reason`.
    pub fn failing(reason: impl Into<String>) -> Self {
        Self {
            response: Err(reason.into()),
            delay: Duration::ZERO,
            calls: AtomicUsize::new(0),
        }
    }

    /// Answer only after `delay`.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Number of verification calls so far.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl TopWalletVerifier for StaticTopWalletVerifier {
    type Error = MemoryCollaboratorError;

    async fn verify_top_wallet(&self) -> Result<serde_json::Value, Self::Error> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        self.response.clone().map_err(MemoryCollaboratorError::Rejected)
    }
}

/// One recorded navigation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavigationCall {
    /// Destination navigated to.
    pub destination: Destination,
    /// Parameters passed.
    pub params: Option<NavParams>,
}

/// Navigator that records every call.
#[derive(Debug, Default)]
pub struct RecordingNavigator {
    calls: Mutex<Vec<NavigationCall>>,
}

impl RecordingNavigator {
    /// Create an empty recorder.
    pub fn new() -> Self {
        Self::default()
    }

    /// All navigations so far, in order.
    pub fn calls(&self) -> Vec<NavigationCall> {
        self.calls.lock().clone()
    }
}

impl Navigator for RecordingNavigator {
    fn navigate(&self, destination: Destination, params: Option<NavParams>) {
        self.calls.lock().push(NavigationCall { destination, params });
    }
}
