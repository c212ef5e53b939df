use std::fmt;

use crate::check::Check;
use crate::error::RuleError;

/// A named unit of validation logic registered under a category.
pub struct RuleDefinition<C> {
    id: String,
    category: String,
    priority: i32,
    description: Option<String>,
    checks: Vec<Check<C>>,
}

impl<C> RuleDefinition<C> {
    /// Default ordering priority. Lower numbers sort first under ascending ordering.
    pub const DEFAULT_PRIORITY: i32 = 100;

    /// Starts a definition for rule `id` under `category` with default priority and no checks.
    pub fn builder(id: impl Into<String>, category: impl Into<String>) -> RuleDefinitionBuilder<C> {
        RuleDefinitionBuilder {
            id: id.into(),
            category: category.into(),
            priority: Self::DEFAULT_PRIORITY,
            description: None,
            checks: Vec::new(),
        }
    }

    /// Unique identifier, used for deduplication and reporting.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Category key, stored exactly as supplied.
    pub fn category(&self) -> &str {
        &self.category
    }

    /// Ordering hint, only consulted under a priority [`RuleOrdering`](crate::RuleOrdering).
    pub fn priority(&self) -> i32 {
        self.priority
    }

    /// Optional human readable description.
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// All checks in declaration order, both kinds.
    pub fn checks(&self) -> &[Check<C>] {
        &self.checks
    }

    /// Checks run by the synchronous path.
    pub fn sync_checks(&self) -> impl Iterator<Item = &Check<C>> {
        self.checks.iter().filter(|check| !check.is_async())
    }

    /// Checks run by the asynchronous path.
    pub fn async_checks(&self) -> impl Iterator<Item = &Check<C>> {
        self.checks.iter().filter(|check| check.is_async())
    }
}

impl<C> Clone for RuleDefinition<C> {
    fn clone(&self) -> Self {
        Self {
            id: self.id.clone(),
            category: self.category.clone(),
            priority: self.priority,
            description: self.description.clone(),
            checks: self.checks.clone(),
        }
    }
}

impl<C> fmt::Debug for RuleDefinition<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RuleDefinition")
            .field("id", &self.id)
            .field("category", &self.category)
            .field("priority", &self.priority)
            .field("description", &self.description)
            .field("checks", &self.checks)
            .finish()
    }
}

/// Builder returned by [`RuleDefinition::builder`].
pub struct RuleDefinitionBuilder<C> {
    id: String,
    category: String,
    priority: i32,
    description: Option<String>,
    checks: Vec<Check<C>>,
}

impl<C> RuleDefinitionBuilder<C> {
    /// Overrides [`RuleDefinition::DEFAULT_PRIORITY`].
    pub fn priority(mut self, priority: i32) -> Self {
        self.priority = priority;
        self
    }

    /// Describes the rule in logs of failed evaluations.
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Appends a check; declaration order is evaluation order.
    pub fn check(mut self, check: Check<C>) -> Self {
        self.checks.push(check);
        self
    }

    /// Appends several checks at once.
    pub fn checks(mut self, checks: impl IntoIterator<Item = Check<C>>) -> Self {
        self.checks.extend(checks);
        self
    }

    /// Validates the definition. Id and category are kept verbatim so that
    /// registry lookups match the exact string the rule was declared with.
    pub fn build(self) -> Result<RuleDefinition<C>, RuleError> {
        if self.id.trim().is_empty() {
            return Err(RuleError::EmptyRuleId);
        }

        if self.category.trim().is_empty() {
            return Err(RuleError::EmptyCategory { rule: self.id });
        }

        Ok(RuleDefinition {
            id: self.id,
            category: self.category,
            priority: self.priority,
            description: self.description,
            checks: self.checks,
        })
    }
}
