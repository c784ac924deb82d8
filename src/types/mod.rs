//! Core types for the authentication gate.

pub mod credential;
pub mod launch;
pub mod outcome;
pub mod dialog;

pub use credential::{SessionCredential, CitizenshipStatus, DEADLINE_EXCEEDED};
pub use launch::{LaunchState, NavParams, DESTINATION_PATH_KEY};
pub use outcome::{Destination, GateOutcome, GateDecision};
pub use dialog::{DialogDescriptor, DialogButton, ButtonHandler, DismissHandler};
