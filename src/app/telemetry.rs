//! Tracing setup for binaries and tests embedding the client

use tracing_subscriber::EnvFilter;

/// Install a formatting subscriber filtered by `RUST_LOG`, or by `default`
/// when the variable is unset
///
/// Returns `false` when a global subscriber was already installed; calling
/// it twice is harmless.
pub fn init_tracing(default: &str) -> bool {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init()
        .is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_tracing_is_idempotent() {
        init_tracing("civic=debug");
        assert!(!init_tracing("civic=debug"));
    }
}
