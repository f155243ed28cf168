/// Layered settings.
pub mod config;
/// Logging setup.
pub mod telemetry;
