//! Launch intent and deep-link passthrough.

use std::collections::BTreeMap;
use serde::{Deserialize, Serialize};

/// Navigation parameters, ordered for stable serialization.
pub type NavParams = BTreeMap<String, String>;

/// Parameter key the onboarding flow reads to resume a deferred deep link.
pub const DESTINATION_PATH_KEY: &str = "destinationPath";

/// Navigation state the application was launched with.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LaunchState {
    /// Path the launch intent pointed at.
    pub path: String,
    /// Query or route parameters carried by the intent.
    pub params: NavParams,
}

impl LaunchState {
    /// Create a launch state with no parameters.
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            params: NavParams::new(),
        }
    }

    /// Add a parameter.
    pub fn with_param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.insert(key.into(), value.into());
        self
    }

    /// Parameters to forward to onboarding so a deep link can resume later.
    ///
    /// - Params that already name a non-empty `destinationPath` are forwarded
    ///   unchanged.
    /// - Any other non-empty params are wrapped as `destinationPath` holding the
    ///   JSON of the whole launch state.
    /// - A plain launch forwards nothing.
    pub fn passthrough_params(&self) -> Option<NavParams> {
        let has_destination = self
            .params
            .get(DESTINATION_PATH_KEY)
            .is_some_and(|path| !path.is_empty());

        if has_destination {
            return Some(self.params.clone());
        }

        if self.params.is_empty() {
            return None;
        }

        let encoded = match serde_json::to_string(self) {
            Ok(encoded) => encoded,
            Err(e) => {
                tracing::warn!(error = %e, path = %self.path, "Failed to encode launch state");
                self.path.clone()
            }
        };

        let mut params = NavParams::new();
        params.insert(DESTINATION_PATH_KEY.to_string(), encoded);
        Some(params)
    }
}
