use tracing_subscriber::filter::EnvFilter;
use tracing_subscriber::fmt::SubscriberBuilder;

use crate::config::EngineConfig;
use crate::errors::{Result, VerdictError};

/// Builds the filter for `level`. `RUST_LOG` takes precedence when set.
fn env_filter(level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level))
}

/// Installs the global fmt subscriber. `RUST_LOG` takes precedence over `level`.
pub fn init_tracing(level: Option<&str>) -> Result<()> {
    SubscriberBuilder::default()
        .with_env_filter(env_filter(level.unwrap_or("info")))
        .with_target(true)
        .with_ansi(atty::is(atty::Stream::Stdout))
        .try_init()
        .map_err(|err| VerdictError::Logging(err.to_string()))
}

/// Installs the subscriber at the level configured through `VERDICT_LOG`.
///
/// Production hosts get plain output without ANSI colours or targets.
pub fn init_from_config(config: &EngineConfig) -> Result<()> {
    if !config.is_production() {
        return init_tracing(Some(&config.log_level));
    }

    SubscriberBuilder::default()
        .with_env_filter(env_filter(&config.log_level))
        .with_target(false)
        .with_ansi(false)
        .try_init()
        .map_err(|err| VerdictError::Logging(err.to_string()))
}
