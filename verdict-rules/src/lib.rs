//! Rule evaluation engine for Verdict.
//!
//! Rules are registered under a category at process start and frozen into a
//! [`RuleRegistry`]. A [`RuleEngine`] bound to a category and a caller
//! supplied context then runs every matching rule's checks and folds them into
//! one boolean verdict. The synchronous path is a plain AND reduction; the
//! asynchronous path awaits checks one by one and stops at the first `false`.

mod check;
mod engine;
mod error;
mod outcome;
mod registry;
mod rule;

pub use check::{Check, CheckResult};
pub use engine::{EngineOptions, RuleEngine};
pub use error::{CheckFailure, RuleError};
pub use futures::future::{BoxFuture, FutureExt};
pub use outcome::{EvaluationMode, EvaluationReport, RuleVerdict};
pub use registry::{RuleRegistry, RuleRegistryBuilder};
pub use rule::{RuleDefinition, RuleDefinitionBuilder};
pub use verdict_core::{EngineConfig, RuleOrdering, UnknownOrdering};
