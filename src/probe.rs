//! Concurrent credential probe.
//!
//! Runs the wallet login, the citizenship check and the minimum splash delay
//! as one join. All three are started before any is awaited, and the probe
//! resolves only after every one of them has settled.
//!
//! ## Deadline
//!
//! Login and citizenship share one absolute deadline measured from probe
//! start. Each is bounded on its own, so a late collaborator fails closed
//! without discarding the other's answer:
//!
//! | Missed deadline | Result |
//! |-----------------|--------|
//! | login | `SessionCredential::Failed { detail: "deadline exceeded" }` |
//! | citizenship | `CitizenshipStatus::Unverified` |
//!
//! With no deadline configured a hung collaborator keeps the probe pending.

use std::future::Future;
use std::sync::Arc;
use tokio::time::Instant;
use tracing::Instrument;

use crate::collaborators::{CitizenshipCheck, TopWalletVerifier, WalletLogin};
use crate::config::GateConfig;
use crate::types::{CitizenshipStatus, GateOutcome, SessionCredential, DEADLINE_EXCEEDED};

/// Await `fut`, giving up at `deadline` if one is set.
async fn settle_by<F: Future>(deadline: Option<Instant>, fut: F) -> Option<F::Output> {
    match deadline {
        Some(deadline) => tokio::time::timeout_at(deadline, fut).await.ok(),
        None => Some(fut.await),
    }
}

/// Fan-out/join over the gate's collaborators.
pub struct CredentialProbe<W, C, V> {
    wallet: Arc<W>,
    citizenship: Arc<C>,
    verifier: Arc<V>,
    config: GateConfig,
}

impl<W, C, V> CredentialProbe<W, C, V>
where
    W: WalletLogin + 'static,
    C: CitizenshipCheck + 'static,
    V: TopWalletVerifier + 'static,
{
    /// Create a probe over the given collaborators.
    pub fn new(wallet: Arc<W>, citizenship: Arc<C>, verifier: Arc<V>, config: GateConfig) -> Self {
        Self {
            wallet,
            citizenship,
            verifier,
            config,
        }
    }

    /// Timing configuration.
    pub fn config(&self) -> &GateConfig {
        &self.config
    }

    /// Run the three checks and reconcile their results.
    ///
    /// Never fails. Also starts the detached top-wallet verification once
    /// the join has settled; that call is not awaited.
    pub async fn run(&self) -> GateOutcome {
        let started = Instant::now();
        let deadline = self.config.effective_deadline().map(|d| started + d);

        let (credential, citizenship, ()) = tokio::join!(
            self.login(deadline),
            self.check_citizenship(deadline),
            tokio::time::sleep(self.config.min_delay),
        );

        tracing::debug!(
            latency_ms = started.elapsed().as_millis() as u64,
            authenticated = credential.is_authenticated(),
            citizenship = ?citizenship,
            "Credential probe settled"
        );

        self.spawn_top_wallet_verification();

        GateOutcome::reconcile(credential, citizenship)
    }

    async fn login(&self, deadline: Option<Instant>) -> SessionCredential {
        settle_by(deadline, self.wallet.login())
            .await
            .unwrap_or_else(|| SessionCredential::failed(DEADLINE_EXCEEDED))
    }

    async fn check_citizenship(&self, deadline: Option<Instant>) -> CitizenshipStatus {
        match settle_by(deadline, self.citizenship.is_citizen()).await {
            Some(Ok(answer)) => CitizenshipStatus::from_answer(answer),
            Some(Err(e)) => {
                tracing::warn!(error = %e, "Citizenship check failed, treating as not a citizen");
                CitizenshipStatus::Unverified { reason: e.to_string() }
            }
            None => {
                tracing::warn!("Citizenship check missed the probe deadline, treating as not a citizen");
                CitizenshipStatus::Unverified { reason: DEADLINE_EXCEEDED.to_string() }
            }
        }
    }

    /// Best-effort telemetry; the result never reaches the routing decision.
    fn spawn_top_wallet_verification(&self) {
        let verifier = Arc::clone(&self.verifier);
        tokio::spawn(
            async move {
                match verifier.verify_top_wallet().await {
                    Ok(result) => tracing::info!(result = %result, "Top wallet result"),
                    Err(e) => tracing::warn!(error = %e, "Top wallet verification failed"),
                }
            }
            .in_current_span(),
        );
    }
}
