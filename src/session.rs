//! Session-scoped shared state.
//!
//! One `SessionState` lives for one application session and is passed by
//! `Arc` to the gate router and to the rendering boundary. Mutation goes
//! through typed operations only.

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};

use crate::collaborators::Navigator;
use crate::overlay::DialogOverlay;
use crate::types::{Destination, NavParams};

/// Route committed by the gate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommittedRoute {
    /// Destination navigated to.
    pub destination: Destination,
    /// Parameters passed along.
    pub params: Option<NavParams>,
}

#[derive(Debug, Default)]
struct AuthState {
    logged_in_citizen: bool,
    route: Option<CommittedRoute>,
}

/// Point-in-time view of the auth part of the session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionSnapshot {
    /// Logged-in-citizen flag.
    pub logged_in_citizen: bool,
    /// Route committed by the gate, if it has resolved.
    pub route: Option<CommittedRoute>,
}

/// Shared session state: auth flag, committed route, current dialog.
#[derive(Debug, Default)]
pub struct SessionState {
    auth: RwLock<AuthState>,
    dialog: DialogOverlay,
}

impl SessionState {
    /// Fresh session: not logged in, no route, no dialog.
    pub fn new() -> Self {
        Self::default()
    }

    /// Logged-in-citizen flag.
    pub fn logged_in_citizen(&self) -> bool {
        self.auth.read().logged_in_citizen
    }

    /// Route committed by the gate.
    pub fn committed_route(&self) -> Option<CommittedRoute> {
        self.auth.read().route.clone()
    }

    /// Flag and route read under one lock.
    pub fn snapshot(&self) -> SessionSnapshot {
        let auth = self.auth.read();
        SessionSnapshot {
            logged_in_citizen: auth.logged_in_citizen,
            route: auth.route.clone(),
        }
    }

    /// The session's dialog register.
    pub fn dialog(&self) -> &DialogOverlay {
        &self.dialog
    }

    /// Navigate and set the flag as one step.
    ///
    /// The write lock is held across the navigation call, so no reader
    /// observes the flag without the matching navigation. Flag and route are
    /// written only after `navigate` returns; a panicking navigator leaves
    /// the session untouched. `navigator` must not read this session's auth
    /// state from inside `navigate`.
    pub fn commit_route<N: Navigator + ?Sized>(
        &self,
        logged_in_citizen: bool,
        destination: Destination,
        params: Option<NavParams>,
        navigator: &N,
    ) {
        let mut auth = self.auth.write();
        navigator.navigate(destination, params.clone());
        auth.logged_in_citizen = logged_in_citizen;
        auth.route = Some(CommittedRoute { destination, params });
    }
}
