//! Auth Gate Simulator
//!
//! Runs one gate evaluation against simulated collaborators and prints the
//! decision as JSON. Useful for checking routing and log output without a
//! wallet or backend.
//!
//! ## Configuration
//!
//! Environment variables:
//! - `AUTH_GATE_MIN_DELAY_MS`, `AUTH_GATE_DEADLINE_MS`: gate timing (see `GateConfig`)
//! - `SIM_WALLET_TOKEN`: session token the login returns; unset means login fails
//! - `SIM_LOGIN_DELAY_MS`: login latency (default: 300)
//! - `SIM_CITIZEN`: `true`, `false`, `error` or `hang` (default: true)
//! - `SIM_LAUNCH_PATH`: launch path (default: /)
//! - `SIM_DESTINATION_PATH`: deep-link destination carried on the launch intent
//! - `RUST_LOG`: Log level filter (default: info)
//! - `LOG_FORMAT`: "json" for structured logs, "pretty" for development (default: json)
//!
//! ## Usage
//!
//! ```bash
//! SIM_WALLET_TOKEN=abc SIM_CITIZEN=false LOG_FORMAT=pretty cargo run --bin auth_gate_sim --features sim
//! ```

use std::sync::Arc;
use std::time::Duration;

use tracing::info;
use tracing_subscriber::{
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
    EnvFilter,
};

use wallet_auth_gate::collaborators::{
    RecordingNavigator, StaticCitizenshipCheck, StaticTopWalletVerifier, StaticWalletLogin,
};
use wallet_auth_gate::config::env_millis;
use wallet_auth_gate::{
    AuthGateRouter, ConfigError, CredentialProbe, GateConfig, LaunchState, SessionCredential, SessionState,
};

/// Initialize the tracing subscriber with JSON or pretty format
fn init_tracing() {
    let log_format = std::env::var("LOG_FORMAT").unwrap_or_else(|_| "json".to_string());

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "auth_gate_sim=info,wallet_auth_gate=info".into());

    if log_format == "pretty" {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .with_target(true)
                    .with_span_events(FmtSpan::CLOSE)
            )
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .json()
                    .with_target(true)
                    .with_current_span(true)
                    .with_span_events(FmtSpan::CLOSE)
                    .flatten_event(true)
            )
            .init();
    }
}

fn simulated_login() -> Result<StaticWalletLogin, ConfigError> {
    let credential = match std::env::var("SIM_WALLET_TOKEN") {
        Ok(token) if !token.is_empty() => SessionCredential::issued(token),
        _ => SessionCredential::failed("invalid signature"),
    };
    let delay = env_millis("SIM_LOGIN_DELAY_MS")?.unwrap_or(Duration::from_millis(300));
    Ok(StaticWalletLogin::new(credential).with_delay(delay))
}

fn simulated_citizenship() -> StaticCitizenshipCheck {
    let check = match std::env::var("SIM_CITIZEN").as_deref() {
        Ok("false") => StaticCitizenshipCheck::answering(false),
        Ok("error") => StaticCitizenshipCheck::rejecting("citizenship backend unavailable"),
        Ok("hang") => StaticCitizenshipCheck::hanging(),
        _ => StaticCitizenshipCheck::answering(true),
    };
    check.with_delay(Duration::from_millis(150))
}

fn simulated_launch() -> LaunchState {
    let path = std::env::var("SIM_LAUNCH_PATH").unwrap_or_else(|_| "/".to_string());
    let launch = LaunchState::new(path);
    match std::env::var("SIM_DESTINATION_PATH") {
        Ok(destination) if !destination.is_empty() => launch.with_param("destinationPath", destination),
        _ => launch,
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();

    let config = GateConfig::from_env()?;
    info!(
        version = env!("CARGO_PKG_VERSION"),
        min_delay_ms = config.min_delay.as_millis() as u64,
        deadline_ms = config.probe_deadline.map(|d| d.as_millis() as u64),
        "Starting auth gate simulation"
    );

    let navigator = Arc::new(RecordingNavigator::new());
    let session = Arc::new(SessionState::new());
    let probe = CredentialProbe::new(
        Arc::new(simulated_login()?),
        Arc::new(simulated_citizenship()),
        Arc::new(
            StaticTopWalletVerifier::ok(serde_json::json!({"ok": 1}))
                .with_delay(Duration::from_millis(50)),
        ),
        config,
    );
    let router = AuthGateRouter::new(probe, Arc::clone(&session), Arc::clone(&navigator), simulated_launch());

    let decision = router.evaluate().await;

    // Give the detached verification call a moment to log before exit.
    tokio::time::sleep(Duration::from_millis(100)).await;

    println!("{}", serde_json::to_string_pretty(&decision)?);
    info!(
        navigations = navigator.calls().len(),
        logged_in_citizen = session.logged_in_citizen(),
        "Simulation complete"
    );

    Ok(())
}
