use std::error::Error as StdError;
use std::fmt;

use thiserror::Error;

/// Errors returned by the rules engine when registering or evaluating rule sets.
#[derive(Debug, Error)]
pub enum RuleError {
    #[error("rule category must not be empty (rule: {rule})")]
    EmptyCategory { rule: String },
    #[error("rule identifier must not be empty")]
    EmptyRuleId,
    #[error("duplicate rule identifier detected: {id}")]
    DuplicateRule { id: String },
    #[error("check {check} of rule {rule} failed to execute")]
    CheckFailed {
        rule: String,
        check: String,
        #[source]
        source: CheckFailure,
    },
}

impl RuleError {
    /// Wraps a check's own error with the identity of the rule and check that raised it.
    pub fn check_failed(
        rule: impl Into<String>,
        check: impl Into<String>,
        source: CheckFailure,
    ) -> Self {
        RuleError::CheckFailed {
            rule: rule.into(),
            check: check.into(),
            source,
        }
    }
}

/// Error raised by a check body instead of producing a boolean.
pub struct CheckFailure(Box<dyn StdError + Send + Sync + 'static>);

impl CheckFailure {
    /// Boxes any error (or message) raised by a check body.
    pub fn new<E>(err: E) -> Self
    where
        E: Into<Box<dyn StdError + Send + Sync + 'static>>,
    {
        Self(err.into())
    }
}

impl fmt::Debug for CheckFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&self.0, f)
    }
}

impl fmt::Display for CheckFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl StdError for CheckFailure {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        self.0.source()
    }
}
