//! Reconciled gate outcome and the routing decision derived from it.

use std::time::Duration;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::credential::{CitizenshipStatus, SessionCredential};
use super::launch::{LaunchState, NavParams};

/// Where the gate sends the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Destination {
    /// The authenticated application.
    Authenticated,
    /// Onboarding / authentication flow.
    Onboarding,
}

impl Destination {
    /// Route name understood by the application router.
    pub fn route_name(&self) -> &'static str {
        match self {
            Self::Authenticated => "AppNavigation",
            Self::Onboarding => "Auth",
        }
    }
}

impl std::fmt::Display for Destination {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.route_name())
    }
}

/// Joined result of one credential probe.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GateOutcome {
    /// Whether the wallet login produced a non-empty token.
    pub is_authenticated: bool,
    /// Whether the citizenship check answered `true`.
    pub is_citizen: bool,
    /// The login result.
    pub credential: SessionCredential,
    /// Raw citizenship status, kept so failures stay visible.
    pub citizenship: CitizenshipStatus,
}

impl GateOutcome {
    /// Reconcile the two gating results.
    pub fn reconcile(credential: SessionCredential, citizenship: CitizenshipStatus) -> Self {
        Self {
            is_authenticated: credential.is_authenticated(),
            is_citizen: citizenship.is_citizen(),
            credential,
            citizenship,
        }
    }

    /// Whether both checks passed.
    pub fn is_logged_in_citizen(&self) -> bool {
        self.is_authenticated && self.is_citizen
    }

    /// Destination for this outcome.
    pub fn destination(&self) -> Destination {
        if self.is_logged_in_citizen() {
            Destination::Authenticated
        } else {
            Destination::Onboarding
        }
    }

    /// Destination plus the parameters to forward with it.
    ///
    /// Only onboarding carries launch parameters forward.
    pub fn route(&self, launch: &LaunchState) -> (Destination, Option<NavParams>) {
        match self.destination() {
            Destination::Authenticated => (Destination::Authenticated, None),
            Destination::Onboarding => (Destination::Onboarding, launch.passthrough_params()),
        }
    }
}

/// Final record of one gate evaluation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GateDecision {
    /// Correlation ID shared with the evaluation's log span.
    pub evaluation_id: Uuid,
    /// Where the user was sent.
    pub destination: Destination,
    /// Parameters passed with the navigation.
    pub params: Option<NavParams>,
    /// The reconciled outcome.
    pub outcome: GateOutcome,
    /// When the decision was committed.
    pub resolved_at: DateTime<Utc>,
    /// Time from trigger to commit.
    pub elapsed: Duration,
}
