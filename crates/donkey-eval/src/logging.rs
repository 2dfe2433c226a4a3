//! Tracing setup for hosts embedding the evaluator.

use std::sync::Once;

/// Filter directives are read from this variable, e.g. `DONKEY_LOG=donkey_eval=trace`.
pub const LOG_VAR: &str = "DONKEY_LOG";

static TRACING_INIT: Once = Once::new();

/// Installs a `tracing` subscriber writing to stderr.
///
/// Does nothing unless `DONKEY_LOG` is set. Safe to call multiple times, and
/// leaves an already-installed global subscriber in place.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{fmt, prelude::*, EnvFilter};

        if std::env::var(LOG_VAR).is_err() {
            return;
        }
        let filter = EnvFilter::try_from_env(LOG_VAR).unwrap_or_else(|_| EnvFilter::new("warn"));
        let _ = tracing_subscriber::registry()
            .with(fmt::layer().with_writer(std::io::stderr).with_target(true).with_level(true))
            .with(filter)
            .try_init();
    });
}
