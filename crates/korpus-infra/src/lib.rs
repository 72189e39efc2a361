//! Cross-cutting infrastructure for Korpus services.

pub mod telemetry;

pub use telemetry::{init_telemetry, shutdown_telemetry};
