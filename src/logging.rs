//! Diagnostic logging.
//!
//! Off unless `NGSHIM_LOG` is set (for example `NGSHIM_LOG=debug`). Events go
//! to stderr so the child's stdout is never touched.

use tracing_subscriber::EnvFilter;

pub const LOG_VAR: &str = "NGSHIM_LOG";

/// Install the global subscriber. Safe to call more than once.
pub fn init() {
    let filter = EnvFilter::try_from_env(LOG_VAR).unwrap_or_else(|_| EnvFilter::new("off"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
