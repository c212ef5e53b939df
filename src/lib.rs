//! Verdict: category-keyed rule evaluation.
//!
//! Rules register under a category at startup, and an engine bound to a
//! category and a context folds their checks into one boolean verdict.
//!
//! * `verdict-rules`: registry, rule definitions and the evaluation engine
//! * `verdict-core`: configuration, tracing setup and shared errors
//! * [`customer`]: sample rules exercising both evaluation paths

pub mod customer;

pub use verdict_core::{config, errors, logging, ordering, EngineConfig, VerdictError};
pub use verdict_rules::{
    Check, CheckFailure, EngineOptions, EvaluationMode, EvaluationReport, RuleDefinition,
    RuleEngine, RuleError, RuleOrdering, RuleRegistry, RuleVerdict,
};

/// Loads [`EngineConfig`] from the environment (and `.env`) and installs
/// tracing at the configured level. Call once at process start.
pub fn init() -> Result<EngineConfig, VerdictError> {
    let config = EngineConfig::from_env()?;
    logging::init_from_config(&config)?;
    tracing::info!(
        ordering = %config.rule_ordering,
        sync_short_circuit = config.sync_short_circuit,
        "verdict initialised"
    );
    Ok(config)
}
