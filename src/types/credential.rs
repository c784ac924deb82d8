//! Results of the two gating checks: wallet login and citizenship.
//!
//! Both checks encode their failures as values. The gate never sees a
//! collaborator error directly; the probe folds it into one of these types so
//! every path still ends in a routing decision.

use serde::{Deserialize, Serialize};

/// Detail recorded when the login did not yield a session token before the
/// probe deadline.
pub const DEADLINE_EXCEEDED: &str = "deadline exceeded";

/// Outcome of one wallet login attempt.
///
/// Created fresh for every gate evaluation and never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum SessionCredential {
    /// The backend accepted the signed login and issued a session token.
    Issued {
        /// Session token (JWT).
        token: String,
    },
    /// Login failed: network error, invalid signature, server rejection or
    /// deadline.
    Failed {
        /// Opaque failure detail, kept for logging only.
        detail: String,
    },
}

impl SessionCredential {
    /// Credential carrying a session token.
    pub fn issued(token: impl Into<String>) -> Self {
        Self::Issued { token: token.into() }
    }

    /// Failed credential with the given detail.
    pub fn failed(detail: impl Into<String>) -> Self {
        Self::Failed { detail: detail.into() }
    }

    /// The session token, if one was issued and it is non-empty.
    pub fn token(&self) -> Option<&str> {
        match self {
            Self::Issued { token } if !token.is_empty() => Some(token.as_str()),
            _ => None,
        }
    }

    /// Whether this credential authenticates the wallet.
    ///
    /// An issued but empty token does not count.
    pub fn is_authenticated(&self) -> bool {
        self.token().is_some()
    }

    /// Failure detail for logging.
    ///
    /// An issued empty token reports a synthetic detail so the failure is
    /// still visible in logs.
    pub fn failure_detail(&self) -> Option<&str> {
        match self {
            Self::Failed { detail } => Some(detail.as_str()),
            Self::Issued { token } if token.is_empty() => Some("empty session token"),
            Self::Issued { .. } => None,
        }
    }
}

/// Result of the citizenship lookup.
///
/// `Unverified` keeps a failed check distinguishable from a clean "not a
/// citizen" answer; both resolve to `false` for routing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum CitizenshipStatus {
    /// Backend confirmed the wallet is a verified citizen.
    Citizen,
    /// Backend answered that the wallet is not a citizen.
    NotCitizen,
    /// The check rejected or missed the deadline.
    Unverified {
        /// Why the check could not produce an answer.
        reason: String,
    },
}

impl CitizenshipStatus {
    /// Status from a clean boolean answer.
    pub fn from_answer(is_citizen: bool) -> Self {
        if is_citizen {
            Self::Citizen
        } else {
            Self::NotCitizen
        }
    }

    /// Routing value. Fails closed.
    pub fn is_citizen(&self) -> bool {
        matches!(self, Self::Citizen)
    }

    /// Whether the check itself failed.
    pub fn is_unverified(&self) -> bool {
        matches!(self, Self::Unverified { .. })
    }
}
