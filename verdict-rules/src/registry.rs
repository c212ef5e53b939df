use std::collections::{HashMap, HashSet};

use tracing::debug;

use crate::error::RuleError;
use crate::rule::RuleDefinition;
use crate::RuleOrdering;

/// Collects rule definitions during startup before freezing them into a [`RuleRegistry`].
pub struct RuleRegistryBuilder<C> {
    rules: Vec<RuleDefinition<C>>,
    ids: HashSet<String>,
    ordering: RuleOrdering,
}

impl<C> Default for RuleRegistryBuilder<C> {
    fn default() -> Self {
        Self {
            rules: Vec::new(),
            ids: HashSet::new(),
            ordering: RuleOrdering::default(),
        }
    }
}

impl<C> RuleRegistryBuilder<C> {
    /// Empty builder using registration order.
    pub fn new() -> Self {
        Self::default()
    }

    /// Order in which [`RuleRegistry::lookup`] returns rules of a category.
    pub fn with_ordering(mut self, ordering: RuleOrdering) -> Self {
        self.ordering = ordering;
        self
    }

    /// Adds a rule definition. Rule ids must be unique across all categories.
    pub fn register(&mut self, rule: RuleDefinition<C>) -> Result<&mut Self, RuleError> {
        if !self.ids.insert(rule.id().to_string()) {
            return Err(RuleError::DuplicateRule {
                id: rule.id().to_string(),
            });
        }

        debug!(rule_id = %rule.id(), category = %rule.category(), "registered rule");
        self.rules.push(rule);
        Ok(self)
    }

    /// Registers every definition, stopping at the first duplicate id.
    pub fn register_all(
        &mut self,
        rules: impl IntoIterator<Item = RuleDefinition<C>>,
    ) -> Result<&mut Self, RuleError> {
        for rule in rules {
            self.register(rule)?;
        }
        Ok(self)
    }

    /// Number of definitions registered so far.
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Whether nothing has been registered yet.
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Freezes the registry. No definition can be added or removed afterwards.
    pub fn build(self) -> RuleRegistry<C> {
        let mut rules = self.rules;
        self.ordering.sort(&mut rules, |rule| rule.priority());

        let mut by_category: HashMap<String, Vec<usize>> = HashMap::new();
        for (index, rule) in rules.iter().enumerate() {
            by_category
                .entry(rule.category().to_string())
                .or_default()
                .push(index);
        }

        RuleRegistry {
            rules,
            by_category,
            ordering: self.ordering,
        }
    }
}

/// Immutable, category-indexed set of rule definitions.
///
/// Lookups take no lock; share the registry by reference or `Arc` once built.
pub struct RuleRegistry<C> {
    rules: Vec<RuleDefinition<C>>,
    by_category: HashMap<String, Vec<usize>>,
    ordering: RuleOrdering,
}

impl<C> RuleRegistry<C> {
    /// Shorthand for [`RuleRegistryBuilder::new`].
    pub fn builder() -> RuleRegistryBuilder<C> {
        RuleRegistryBuilder::new()
    }

    /// Every definition registered under `category`. Unknown categories yield nothing.
    pub fn lookup(&self, category: &str) -> Vec<&RuleDefinition<C>> {
        self.by_category
            .get(category)
            .map(|indexes| indexes.iter().map(|&index| &self.rules[index]).collect())
            .unwrap_or_default()
    }

    /// Known categories, sorted alphabetically.
    pub fn categories(&self) -> Vec<&str> {
        let mut categories: Vec<&str> = self.by_category.keys().map(String::as_str).collect();
        categories.sort_unstable();
        categories
    }

    /// Ordering applied when the registry was built.
    pub fn ordering(&self) -> RuleOrdering {
        self.ordering
    }

    /// Total number of definitions across all categories.
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Whether the registry holds no rules at all.
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

impl<C> Default for RuleRegistry<C> {
    fn default() -> Self {
        RuleRegistryBuilder::new().build()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::check::Check;

    struct Ctx;

    fn rule(id: &str, category: &str, priority: i32) -> RuleDefinition<Ctx> {
        RuleDefinition::builder(id, category)
            .priority(priority)
            .check(Check::sync("noop", |_: &Ctx| true))
            .build()
            .expect("valid rule")
    }

    fn ids(rules: Vec<&RuleDefinition<Ctx>>) -> Vec<&str> {
        rules.into_iter().map(RuleDefinition::id).collect()
    }

    #[test]
    fn lookup_preserves_registration_order() {
        let mut builder = RuleRegistry::builder();
        builder
            .register_all(vec![
                rule("b", "Customer", 2),
                rule("x", "Order", 1),
                rule("a", "Customer", 1),
            ])
            .expect("register");
        let registry = builder.build();

        assert_eq!(ids(registry.lookup("Customer")), vec!["b", "a"]);
        assert_eq!(ids(registry.lookup("Order")), vec!["x"]);
        assert_eq!(registry.categories(), vec!["Customer", "Order"]);
        assert_eq!(registry.len(), 3);
    }

    #[test]
    fn unknown_category_is_empty() {
        let registry = RuleRegistry::<Ctx>::default();
        assert!(registry.lookup("Customer").is_empty());
        assert!(registry.is_empty());
    }

    #[test]
    fn duplicate_ids_are_rejected() {
        let mut builder = RuleRegistry::builder();
        builder.register(rule("dup", "Customer", 1)).expect("first");
        let err = builder
            .register(rule("dup", "Order", 1))
            .err()
            .expect("duplicate rejected");
        assert!(matches!(err, RuleError::DuplicateRule { id } if id == "dup"));
        assert_eq!(builder.len(), 1);
    }

    #[test]
    fn padded_category_is_found_by_the_same_key() {
        use crate::RuleEngine;

        let mut builder = RuleRegistry::builder();
        builder
            .register(
                RuleDefinition::builder("deny-all", "Customer ")
                    .check(Check::sync("never", |_: &Ctx| false))
                    .build()
                    .expect("valid rule"),
            )
            .expect("register");
        let registry = builder.build();

        assert_eq!(ids(registry.lookup("Customer ")), vec!["deny-all"]);
        assert!(registry.lookup("Customer").is_empty());

        let engine = RuleEngine::new(&registry, "Customer ", Ctx);
        assert!(!engine.is_valid().expect("evaluate"));
    }

    #[test]
    fn priority_ordering_is_stable() {
        let mut builder =
            RuleRegistry::builder().with_ordering(RuleOrdering::PriorityAscending);
        builder
            .register_all(vec![
                rule("late", "Customer", 5),
                rule("tie-1", "Customer", 1),
                rule("tie-2", "Customer", 1),
            ])
            .expect("register");
        let registry = builder.build();
        assert_eq!(ids(registry.lookup("Customer")), vec!["tie-1", "tie-2", "late"]);

        let mut builder =
            RuleRegistry::builder().with_ordering(RuleOrdering::PriorityDescending);
        builder
            .register_all(vec![
                rule("tie-1", "Customer", 1),
                rule("late", "Customer", 5),
                rule("tie-2", "Customer", 1),
            ])
            .expect("register");
        let registry = builder.build();
        assert_eq!(ids(registry.lookup("Customer")), vec!["late", "tie-1", "tie-2"]);
        assert_eq!(registry.ordering(), RuleOrdering::PriorityDescending);
    }
}
