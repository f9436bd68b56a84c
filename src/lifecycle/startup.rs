//! Startup orchestration.
//!
//! Merges the optional config file with command-line overrides, validates
//! the result and resolves the target. Any error here is fatal.

use crate::config::validation::validate_config;
use crate::config::{ProxyConfig, Target};
use crate::error::ConfigError;

/// Values given on the command line. They win over the config file.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub port: Option<u16>,
    pub target: Option<String>,
    pub log_level: Option<String>,
}

/// Produce the final configuration and the resolved target.
pub fn resolve(mut config: ProxyConfig, overrides: Overrides) -> Result<(ProxyConfig, Target), ConfigError> {
    if let Some(port) = overrides.port {
        config.listener.port = port;
    }
    if let Some(target) = overrides.target {
        config.target = Some(target);
    }
    if let Some(level) = overrides.log_level {
        config.observability.log_level = level;
    }

    let raw_target = config.target.clone().ok_or(ConfigError::MissingTarget)?;
    let target = Target::parse(&raw_target)?;
    validate_config(&config).map_err(ConfigError::Validation)?;

    Ok((config, target))
}
