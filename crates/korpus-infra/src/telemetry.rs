//! Tracing bootstrap.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Initialize structured tracing for a Korpus process.
///
/// The filter comes from `RUST_LOG` when set; otherwise `korpus=debug`.
/// Safe to call more than once (later calls are no-ops), so tests can call
/// it without coordination.
pub fn init_telemetry() {
    let _ = tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "korpus=debug".into()))
        .with(tracing_subscriber::fmt::layer())
        .try_init();
}

pub async fn shutdown_telemetry() {
    tracing::debug!("Telemetry shutdown");
}
