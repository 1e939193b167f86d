//! Tracing setup shared by the CLI binary and tests.

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Initialize logging at the default `warn` level.
///
/// The CLI talks to the user over stdout, so diagnostics stay quiet
/// unless `RUST_LOG` asks for more.
pub fn init() {
    init_with_level("warn")
}

/// Initialize logging with the given default level; `RUST_LOG` still
/// wins when set.
pub fn init_with_level(default_level: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().compact().with_target(false))
        .init();
}

/// Test-writer variant so captured output lands with the owning test
#[cfg(test)]
pub fn init_test() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_env_filter(EnvFilter::new("debug"))
        .try_init();
}
