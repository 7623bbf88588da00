//! Tracing setup for the unidir CLI
//!
//! Usage:
//!   unidir --debug ...              # Debug logging to console
//!   RUST_LOG=unidir_server=debug    # Fine-grained log control
//!
//! Environment variables:
//!   RUST_LOG                        # Log filter (default: info)

use anyhow::{anyhow, Result};
use tracing_subscriber::EnvFilter;

/// Tracing configuration options
#[derive(Debug, Clone, Default)]
pub struct TracingConfig {
    /// Enable debug logging (sets the filter to debug if RUST_LOG is not set)
    pub debug: bool,
}

impl TracingConfig {
    fn default_directive(&self) -> &'static str {
        if self.debug {
            "debug"
        } else {
            "info"
        }
    }
}

/// Initialize console tracing.
pub fn init_tracing(config: &TracingConfig) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.default_directive()));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(config.debug) // Show targets in debug mode
        .compact()
        .try_init()
        .map_err(|err| anyhow!(err))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn debug_flag_selects_directive() {
        assert_eq!(TracingConfig::default().default_directive(), "info");
        assert_eq!(TracingConfig { debug: true }.default_directive(), "debug");
    }
}
