//! Structured logging for simulation debugging
//!
//! The engine and the availability model emit `tracing` events: unit
//! lifecycle transitions and pool activity at `debug`, per-event dispatch at
//! `trace`, study progress at `info`. These helpers install a subscriber for
//! binaries and examples; libraries and tests just emit and let the embedder
//! decide.
//!
//! `RUST_LOG` takes precedence when set, e.g.:
//!
//! ```bash
//! RUST_LOG=avail_model=debug cargo run --example readiness_curve
//! ```

use tracing::info;
use tracing_subscriber::{filter::EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize logging at the default `info` level.
pub fn init_simulation_logging() {
    init_simulation_logging_with_level("info")
}

/// Initialize logging at a specific level.
///
/// The debug toggle of a study configuration maps here: pass `"debug"` to see
/// every unit failure, repair grant and release as it happens.
///
/// Later calls are no-ops, so tests and examples can both call this safely.
///
/// # Arguments
/// * `level` - Log level: "trace", "debug", "info", "warn", or "error"
pub fn init_simulation_logging_with_level(level: &str) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| format!("{level},avail_core=info").into());

    let installed = tracing_subscriber::registry()
        .with(fmt::layer().with_target(true).with_level(true))
        .with(filter)
        .try_init()
        .is_ok();

    if installed {
        info!("simulation logging initialized at level: {}", level);
    }
}
