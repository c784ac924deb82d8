//! Authentication gate router.
//!
//! Turns one credential probe into exactly one navigation.
//!
//! ```text
//! Initial ──evaluate()──▶ Pending ──probe settled──▶ Resolved
//!                                                     │
//!                           logged-in citizen ────────┼──▶ AppNavigation (flag = true)
//!                           anything else ────────────┴──▶ Auth + deep-link params (flag = false)
//! ```
//!
//! ## Single trigger
//!
//! `evaluate()` can be called from every render. The first call starts the
//! evaluation as a detached task that runs to completion even if every caller
//! goes away. All calls, first or later, wait on the same published decision;
//! later calls are logged as duplicate triggers. This holds in every build
//! profile.

use std::sync::Arc;
use chrono::Utc;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use tokio::sync::watch;
use tokio::time::Instant;
use tracing::Instrument;
use uuid::Uuid;

use crate::collaborators::{CitizenshipCheck, Navigator, TopWalletVerifier, WalletLogin};
use crate::probe::CredentialProbe;
use crate::session::SessionState;
use crate::types::{GateDecision, GateOutcome, LaunchState};

/// Lifecycle of the gate for one mount.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GatePhase {
    /// Not triggered yet.
    Initial,
    /// Probe running.
    Pending,
    /// Navigation issued. Terminal.
    Resolved,
}

/// State owned by the evaluation task.
struct GateTask<W, C, V, N> {
    probe: CredentialProbe<W, C, V>,
    session: Arc<SessionState>,
    navigator: Arc<N>,
    launch: LaunchState,
    phase: Mutex<GatePhase>,
}

/// Routes the user once per mount based on the credential probe.
pub struct AuthGateRouter<W, C, V, N> {
    task: Arc<GateTask<W, C, V, N>>,
    /// Taken by the first trigger; `None` afterwards.
    publisher: Mutex<Option<watch::Sender<Option<GateDecision>>>>,
    decision: watch::Receiver<Option<GateDecision>>,
}

impl<W, C, V, N> AuthGateRouter<W, C, V, N>
where
    W: WalletLogin + 'static,
    C: CitizenshipCheck + 'static,
    V: TopWalletVerifier + 'static,
    N: Navigator + 'static,
{
    /// Mount a gate.
    ///
    /// # Arguments
    /// * `probe` - Credential probe over the login/citizenship collaborators
    /// * `session` - Session state shared with the rendering boundary
    /// * `navigator` - Application router
    /// * `launch` - Navigation state the app was launched with
    pub fn new(
        probe: CredentialProbe<W, C, V>,
        session: Arc<SessionState>,
        navigator: Arc<N>,
        launch: LaunchState,
    ) -> Self {
        let (publisher, decision) = watch::channel(None);
        Self {
            task: Arc::new(GateTask {
                probe,
                session,
                navigator,
                launch,
                phase: Mutex::new(GatePhase::Initial),
            }),
            publisher: Mutex::new(Some(publisher)),
            decision,
        }
    }

    /// Current lifecycle phase.
    pub fn phase(&self) -> GatePhase {
        *self.task.phase.lock()
    }

    /// The decision, once resolved.
    pub fn decision(&self) -> Option<GateDecision> {
        self.decision.borrow().clone()
    }

    /// Session this gate writes to.
    pub fn session(&self) -> &Arc<SessionState> {
        &self.task.session
    }

    /// Start the gate if needed and wait for its decision.
    ///
    /// Dropping the returned future does not cancel the evaluation.
    pub async fn evaluate(&self) -> GateDecision {
        let publisher = self.publisher.lock().take();
        match publisher {
            Some(publisher) => self.spawn_evaluation(publisher),
            None => tracing::warn!(
                phase = ?self.phase(),
                "Gate triggered again for this mount, keeping first result"
            ),
        }

        let mut decision = self.decision.clone();
        let resolved = decision
            .wait_for(Option::is_some)
            .await
            .map(|d| d.clone());

        match resolved {
            Ok(Some(decision)) => decision,
            _ => {
                // Publisher dropped without a decision: the task panicked.
                tracing::error!("Gate evaluation ended without a decision");
                std::future::pending().await
            }
        }
    }

    fn spawn_evaluation(&self, publisher: watch::Sender<Option<GateDecision>>) {
        *self.task.phase.lock() = GatePhase::Pending;

        let evaluation_id = Uuid::new_v4();
        let span = tracing::info_span!("gate_evaluation", evaluation_id = %evaluation_id);
        let task = Arc::clone(&self.task);

        tokio::spawn(
            async move {
                let decision = task.run(evaluation_id).await;
                publisher.send_replace(Some(decision));
            }
            .instrument(span),
        );
    }
}

impl<W, C, V, N> GateTask<W, C, V, N>
where
    W: WalletLogin + 'static,
    C: CitizenshipCheck + 'static,
    V: TopWalletVerifier + 'static,
    N: Navigator + 'static,
{
    async fn run(&self, evaluation_id: Uuid) -> GateDecision {
        let started = Instant::now();

        let outcome = self.probe.run().await;
        log_outcome(&outcome);

        let (destination, params) = outcome.route(&self.launch);
        self.session.commit_route(
            outcome.is_logged_in_citizen(),
            destination,
            params.clone(),
            self.navigator.as_ref(),
        );
        *self.phase.lock() = GatePhase::Resolved;

        let elapsed = started.elapsed();
        tracing::info!(
            destination = %destination,
            forwarded_params = params.is_some(),
            latency_ms = elapsed.as_millis() as u64,
            "Gate resolved"
        );

        GateDecision {
            evaluation_id,
            destination,
            params,
            outcome,
            resolved_at: Utc::now(),
            elapsed,
        }
    }
}

fn log_outcome(outcome: &GateOutcome) {
    if outcome.is_logged_in_citizen() {
        tracing::info!("Logged-in citizen");
    } else if outcome.is_authenticated {
        tracing::debug!(
            citizenship = ?outcome.citizenship,
            "New account, not verified, or did not finish signup"
        );
    } else {
        tracing::error!(
            detail = outcome.credential.failure_detail().unwrap_or("unknown"),
            "Failed to sign in"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use serde_json::json;
    use crate::collaborators::memory::{
        RecordingNavigator, StaticCitizenshipCheck, StaticTopWalletVerifier, StaticWalletLogin,
    };
    use crate::config::GateConfig;
    use crate::types::{Destination, SessionCredential};

    type TestRouter =
        AuthGateRouter<StaticWalletLogin, StaticCitizenshipCheck, StaticTopWalletVerifier, RecordingNavigator>;

    struct Harness {
        router: Arc<TestRouter>,
        login: Arc<StaticWalletLogin>,
        navigator: Arc<RecordingNavigator>,
        session: Arc<SessionState>,
    }

    fn harness(credential: SessionCredential, check: StaticCitizenshipCheck) -> Harness {
        let login = Arc::new(StaticWalletLogin::new(credential).with_delay(Duration::from_millis(200)));
        let navigator = Arc::new(RecordingNavigator::new());
        let session = Arc::new(SessionState::new());
        let probe = CredentialProbe::new(
            Arc::clone(&login),
            Arc::new(check),
            Arc::new(StaticTopWalletVerifier::ok(json!(null))),
            GateConfig::default(),
        );
        let router = Arc::new(AuthGateRouter::new(
            probe,
            Arc::clone(&session),
            Arc::clone(&navigator),
            LaunchState::new("/"),
        ));
        Harness { router, login, navigator, session }
    }

    #[tokio::test(start_paused = true)]
    async fn test_phases() {
        let h = harness(SessionCredential::issued("abc"), StaticCitizenshipCheck::answering(true));
        assert_eq!(h.router.phase(), GatePhase::Initial);
        assert!(h.router.decision().is_none());

        let router = Arc::clone(&h.router);
        let task = tokio::spawn(async move { router.evaluate().await });

        tokio::time::sleep(Duration::from_millis(500)).await;
        assert_eq!(h.router.phase(), GatePhase::Pending);
        assert!(h.navigator.calls().is_empty());

        let decision = task.await.unwrap();
        assert_eq!(h.router.phase(), GatePhase::Resolved);
        assert_eq!(decision.destination, Destination::Authenticated);
        assert!(h.session.logged_in_citizen());
        assert!(decision.elapsed >= Duration::from_millis(1000));
    }

    #[tokio::test(start_paused = true)]
    async fn test_repeat_evaluate_keeps_first_result() {
        let h = harness(SessionCredential::issued("abc"), StaticCitizenshipCheck::answering(false));

        let first = h.router.evaluate().await;
        let second = h.router.evaluate().await;

        assert_eq!(first, second);
        assert_eq!(h.login.calls(), 1);
        assert_eq!(h.navigator.calls().len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_concurrent_evaluate_navigates_once() {
        let h = harness(SessionCredential::failed("invalid signature"), StaticCitizenshipCheck::answering(true));

        let (a, b, c) = tokio::join!(h.router.evaluate(), h.router.evaluate(), h.router.evaluate());

        assert_eq!(a.evaluation_id, b.evaluation_id);
        assert_eq!(b.evaluation_id, c.evaluation_id);
        assert_eq!(h.login.calls(), 1);
        assert_eq!(h.navigator.calls().len(), 1);
        assert_eq!(h.navigator.calls()[0].destination, Destination::Onboarding);
        assert!(!h.session.logged_in_citizen());
    }

    #[tokio::test(start_paused = true)]
    async fn test_dropped_caller_does_not_cancel_gate() {
        let h = harness(SessionCredential::issued("abc"), StaticCitizenshipCheck::answering(true));

        let router = Arc::clone(&h.router);
        let caller = tokio::spawn(async move { router.evaluate().await });

        // Tear the caller down mid-probe.
        tokio::time::sleep(Duration::from_millis(500)).await;
        caller.abort();
        tokio::time::sleep(Duration::from_secs(5)).await;

        assert_eq!(h.router.phase(), GatePhase::Resolved);
        assert_eq!(h.navigator.calls().len(), 1);
        assert_eq!(h.login.calls(), 1);
        assert!(h.session.logged_in_citizen());

        let decision = h.router.evaluate().await;
        assert_eq!(Some(decision.clone()), h.router.decision());
        assert_eq!(decision.destination, Destination::Authenticated);
        assert_eq!(h.login.calls(), 1);
        assert_eq!(h.navigator.calls().len(), 1);
    }
}
