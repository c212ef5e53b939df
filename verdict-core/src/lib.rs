//! Core shared library for Verdict.
//!
//! Exposes the pieces every host process needs around the rule engine:
//! environment driven configuration, rule ordering, tracing setup and the
//! common error type.

pub mod config;
pub mod errors;
pub mod logging;
pub mod ordering;

pub use config::{EngineConfig, Environment};
pub use errors::{ConfigError, Result as CoreResult, VerdictError};
pub use ordering::{RuleOrdering, UnknownOrdering};
