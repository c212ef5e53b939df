use std::env;

use crate::errors::ConfigError;
use crate::ordering::RuleOrdering;

const DEFAULT_PREFIX: &str = "VERDICT_";

/// Runtime environment used by the process.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Environment {
    #[default]
    Development,
    Staging,
    Production,
}

impl Environment {
    fn from_str(value: &str) -> Self {
        match value.to_ascii_lowercase().as_str() {
            "production" | "prod" => Environment::Production,
            "staging" | "stage" => Environment::Staging,
            _ => Environment::Development,
        }
    }
}

/// Settings a host process applies when building registries and engines.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineConfig {
    pub environment: Environment,
    pub log_level: String,
    pub rule_ordering: RuleOrdering,
    pub sync_short_circuit: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            environment: Environment::default(),
            log_level: "info".to_string(),
            rule_ordering: RuleOrdering::default(),
            sync_short_circuit: false,
        }
    }
}

impl EngineConfig {
    /// Loads configuration from `VERDICT_*` variables, reading `.env` first.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_env_with_prefix(DEFAULT_PREFIX)
    }

    /// Loads configuration from env vars prefixed with the provided value (e.g. `BILLING_`).
    pub fn from_env_with_prefix(prefix: &str) -> Result<Self, ConfigError> {
        Self::from_lookup(prefix, |key| env::var(key).ok())
    }

    // Shared by the env loaders and the tests, which supply their own lookup.
    fn from_lookup(
        prefix: &str,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ConfigError> {
        let key = |suffix: &str| format!("{}{}", prefix, suffix);
        let defaults = Self::default();

        let environment = lookup(&key("ENV"))
            .map(|raw| Environment::from_str(&raw))
            .unwrap_or_default();

        let log_level = lookup(&key("LOG")).unwrap_or(defaults.log_level);

        let ordering_key = key("RULE_ORDERING");
        let rule_ordering = match lookup(&ordering_key) {
            Some(raw) => raw.parse::<RuleOrdering>().map_err(|_| ConfigError::InvalidValue {
                key: ordering_key.clone(),
                value: raw,
            })?,
            None => defaults.rule_ordering,
        };

        let short_circuit_key = key("SYNC_SHORT_CIRCUIT");
        let sync_short_circuit = match lookup(&short_circuit_key) {
            Some(raw) => parse_bool(&raw).ok_or_else(|| ConfigError::InvalidValue {
                key: short_circuit_key.clone(),
                value: raw,
            })?,
            None => defaults.sync_short_circuit,
        };

        Ok(Self {
            environment,
            log_level,
            rule_ordering,
            sync_short_circuit,
        })
    }

    /// Whether the service is running in production.
    pub fn is_production(&self) -> bool {
        matches!(self.environment, Environment::Production)
    }
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
