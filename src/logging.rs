// 📝 Logging setup
//
// `RUST_LOG` wins over the configured filter when set.

use tracing_subscriber::EnvFilter;

use crate::error::{RecordError, Result};

/// Install the global fmt subscriber. A second call is a no-op.
pub fn init_logging(default_filter: &str) -> Result<()> {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(default_filter)
            .map_err(|e| RecordError::Config(format!("Invalid log filter '{}': {}", default_filter, e)))?,
    };

    // try_init fails only when a subscriber is already installed
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init();
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_twice_is_harmless() {
        assert!(init_logging("civic_records=debug").is_ok());
        assert!(init_logging("civic_records=info").is_ok());
    }
}
