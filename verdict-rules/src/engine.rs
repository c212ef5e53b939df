use tracing::{debug, debug_span, trace, Instrument};
use verdict_core::EngineConfig;

use crate::error::RuleError;
use crate::outcome::{EvaluationMode, EvaluationReport, RuleVerdict};
use crate::registry::RuleRegistry;
use crate::rule::RuleDefinition;

/// Tuning knobs that do not change verdicts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EngineOptions {
    /// Stop the synchronous path at the first failing check.
    /// Checks are expected to be pure, so only the report differs.
    pub short_circuit_sync: bool,
}

impl EngineOptions {
    /// Options selected through `VERDICT_SYNC_SHORT_CIRCUIT`.
    pub fn from_config(config: &EngineConfig) -> Self {
        Self {
            short_circuit_sync: config.sync_short_circuit,
        }
    }
}

/// Evaluates every rule of one category against one context.
///
/// An engine is built per request and bound to its category and context for
/// its whole lifetime. Rules are read straight from the frozen registry, so
/// nothing survives between calls.
pub struct RuleEngine<'r, C> {
    registry: &'r RuleRegistry<C>,
    category: String,
    context: C,
    options: EngineOptions,
}

impl<'r, C> RuleEngine<'r, C> {
    /// Binds an engine to `category` and `context` for a single request.
    pub fn new(registry: &'r RuleRegistry<C>, category: impl Into<String>, context: C) -> Self {
        Self {
            registry,
            category: category.into(),
            context,
            options: EngineOptions::default(),
        }
    }

    /// Replaces the default [`EngineOptions`].
    pub fn with_options(mut self, options: EngineOptions) -> Self {
        self.options = options;
        self
    }

    /// Category whose rules this engine evaluates.
    pub fn category(&self) -> &str {
        &self.category
    }

    /// Context forwarded to every check.
    pub fn context(&self) -> &C {
        &self.context
    }

    /// Logical AND over the synchronous checks of every matching rule.
    pub fn is_valid(&self) -> Result<bool, RuleError> {
        self.evaluate().map(|report| report.verdict)
    }

    /// Sequential evaluation of asynchronous checks, stopping at the first `false`.
    pub async fn is_valid_async(&self) -> Result<bool, RuleError> {
        self.evaluate_async().await.map(|report| report.verdict)
    }

    /// Report-producing form of [`RuleEngine::is_valid`].
    pub fn evaluate(&self) -> Result<EvaluationReport, RuleError> {
        let _span = debug_span!("evaluate", category = %self.category, mode = "sync").entered();
        let mut report = EvaluationReport::new(&self.category, EvaluationMode::Sync);

        for rule in self.registry.lookup(&self.category) {
            let verdict = self.run_sync_rule(rule)?;
            log_verdict(rule, &verdict);
            let passed = verdict.passed;
            report.push(verdict);

            if !passed && self.options.short_circuit_sync {
                break;
            }
        }

        debug!(verdict = report.verdict, rules = report.rules.len(), "evaluation finished");
        Ok(report)
    }

    fn run_sync_rule(&self, rule: &RuleDefinition<C>) -> Result<RuleVerdict, RuleError> {
        let mut verdict = RuleVerdict::new(rule.id());

        for check in rule.checks() {
            let Some(result) = check.call_sync(&self.context) else {
                continue;
            };
            let passed = result
                .map_err(|source| RuleError::check_failed(rule.id(), check.name(), source))?;
            trace!(rule_id = %rule.id(), check = %check.name(), passed, "check finished");
            verdict.record(check.name(), passed);

            if !passed && self.options.short_circuit_sync {
                break;
            }
        }

        Ok(verdict)
    }

    /// Report-producing form of [`RuleEngine::is_valid_async`]. Rules skipped
    /// after a failure are absent from the report.
    pub async fn evaluate_async(&self) -> Result<EvaluationReport, RuleError> {
        let span = debug_span!("evaluate", category = %self.category, mode = "async");
        self.run_async().instrument(span).await
    }

    async fn run_async(&self) -> Result<EvaluationReport, RuleError> {
        let mut report = EvaluationReport::new(&self.category, EvaluationMode::Async);

        for rule in self.registry.lookup(&self.category) {
            let mut verdict = RuleVerdict::new(rule.id());

            for check in rule.checks() {
                let Some(pending) = check.call_async(&self.context) else {
                    continue;
                };
                let passed = pending
                    .await
                    .map_err(|source| RuleError::check_failed(rule.id(), check.name(), source))?;
                trace!(rule_id = %rule.id(), check = %check.name(), passed, "check finished");
                verdict.record(check.name(), passed);

                if !passed {
                    break;
                }
            }

            log_verdict(rule, &verdict);
            let passed = verdict.passed;
            report.push(verdict);

            if !passed {
                debug!(rule_id = %rule.id(), "short-circuiting remaining rules");
                break;
            }
        }

        debug!(verdict = report.verdict, rules = report.rules.len(), "evaluation finished");
        Ok(report)
    }
}

fn log_verdict<C>(rule: &RuleDefinition<C>, verdict: &RuleVerdict) {
    if verdict.passed {
        debug!(rule_id = %rule.id(), checks = verdict.checks_run, "rule passed");
    } else {
        debug!(
            rule_id = %rule.id(),
            check = verdict.failed_check.as_deref().unwrap_or_default(),
            description = rule.description().unwrap_or_default(),
            "rule failed"
        );
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    use futures::future::FutureExt;

    use super::*;
    use crate::check::Check;

    #[derive(Debug, Clone)]
    struct Ctx {
        value: i64,
    }

    fn registry(rules: Vec<RuleDefinition<Ctx>>) -> RuleRegistry<Ctx> {
        let mut builder = RuleRegistry::builder();
        builder.register_all(rules).expect("register");
        builder.build()
    }

    fn counting_sync(name: &str, result: bool, calls: &Arc<AtomicUsize>) -> Check<Ctx> {
        let calls = Arc::clone(calls);
        Check::sync(name, move |_: &Ctx| {
            calls.fetch_add(1, Ordering::SeqCst);
            result
        })
    }

    fn counting_async(name: &str, result: bool, calls: &Arc<AtomicUsize>) -> Check<Ctx> {
        let calls = Arc::clone(calls);
        Check::asynchronous(name, move |_: &Ctx| {
            calls.fetch_add(1, Ordering::SeqCst);
            async move { result }.boxed()
        })
    }

    fn rule(id: &str, checks: Vec<Check<Ctx>>) -> RuleDefinition<Ctx> {
        RuleDefinition::builder(id, "Customer")
            .checks(checks)
            .build()
            .expect("rule")
    }

    #[test]
    fn empty_category_is_vacuously_valid() {
        let registry = registry(vec![]);
        let engine = RuleEngine::new(&registry, "Customer", Ctx { value: 1 });
        assert!(engine.is_valid().expect("evaluate"));
    }

    #[test]
    fn sync_path_reduces_every_rule_by_default() {
        let calls = Arc::new(AtomicUsize::new(0));
        let registry = registry(vec![
            rule("fails", vec![counting_sync("no", false, &calls)]),
            rule("passes", vec![counting_sync("yes", true, &calls)]),
        ]);

        let report = RuleEngine::new(&registry, "Customer", Ctx { value: 1 })
            .evaluate()
            .expect("evaluate");

        assert!(!report.verdict);
        assert_eq!(report.rules.len(), 2);
        assert_eq!(calls.load(Ordering::SeqCst), 2);
        assert_eq!(report.rules[0].failed_check.as_deref(), Some("no"));
    }

    #[test]
    fn sync_short_circuit_keeps_verdict() {
        let calls = Arc::new(AtomicUsize::new(0));
        let registry = registry(vec![
            rule("fails", vec![counting_sync("no", false, &calls)]),
            rule("passes", vec![counting_sync("yes", true, &calls)]),
        ]);

        let engine = RuleEngine::new(&registry, "Customer", Ctx { value: 1 }).with_options(
            EngineOptions {
                short_circuit_sync: true,
            },
        );

        assert!(!engine.is_valid().expect("evaluate"));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn options_follow_config() {
        let config = EngineConfig {
            sync_short_circuit: true,
            ..EngineConfig::default()
        };
        assert!(EngineOptions::from_config(&config).short_circuit_sync);
        assert_eq!(
            EngineOptions::from_config(&EngineConfig::default()),
            EngineOptions::default()
        );
    }

    #[test]
    fn sync_path_ignores_async_checks() {
        let calls = Arc::new(AtomicUsize::new(0));
        let registry = registry(vec![
            rule("remote-only", vec![counting_async("remote", false, &calls)]),
            rule("positive", vec![Check::sync("positive", |ctx: &Ctx| ctx.value > 0)]),
        ]);

        let engine = RuleEngine::new(&registry, "Customer", Ctx { value: 3 });
        assert!(engine.is_valid().expect("evaluate"));
        assert_eq!(calls.load(Ordering::SeqCst), 0);

        let engine = RuleEngine::new(&registry, "Customer", Ctx { value: -3 });
        assert!(!engine.is_valid().expect("evaluate"));
    }

    #[test]
    fn sync_check_failure_names_rule_and_check() {
        let registry = registry(vec![rule(
            "explodes",
            vec![Check::try_sync("lookup", |_: &Ctx| -> Result<bool, String> {
                Err("unavailable".into())
            })],
        )]);

        let err = RuleEngine::new(&registry, "Customer", Ctx { value: 1 })
            .is_valid()
            .expect_err("check error propagates");
        match err {
            RuleError::CheckFailed { rule, check, source } => {
                assert_eq!(rule, "explodes");
                assert_eq!(check, "lookup");
                assert_eq!(source.to_string(), "unavailable");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn async_path_short_circuits_on_first_false() {
        let before = Arc::new(AtomicUsize::new(0));
        let after = Arc::new(AtomicUsize::new(0));
        let registry = registry(vec![
            rule(
                "membership",
                vec![
                    counting_async("active", false, &before),
                    counting_async("same-rule-later", true, &after),
                ],
            ),
            rule("two-factor", vec![counting_async("otp", true, &after)]),
        ]);

        let report = RuleEngine::new(&registry, "Customer", Ctx { value: 1 })
            .evaluate_async()
            .await
            .expect("evaluate");

        assert!(!report.verdict);
        assert_eq!(before.load(Ordering::SeqCst), 1);
        assert_eq!(after.load(Ordering::SeqCst), 0);
        assert_eq!(report.rules.len(), 1);
        assert_eq!(report.mode, EvaluationMode::Async);
    }

    #[tokio::test]
    async fn async_path_skips_rules_without_async_checks() {
        let calls = Arc::new(AtomicUsize::new(0));
        let registry = registry(vec![
            rule("sync-only", vec![counting_sync("local", false, &calls)]),
            rule("empty", vec![]),
            rule(
                "remote",
                vec![Check::asynchronous("positive", |ctx: &Ctx| {
                    async move { ctx.value > 0 }.boxed()
                })],
            ),
        ]);

        let engine = RuleEngine::new(&registry, "Customer", Ctx { value: 2 });
        assert!(engine.is_valid_async().await.expect("evaluate"));
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn async_check_error_propagates() {
        let registry = registry(vec![rule(
            "backend",
            vec![Check::try_asynchronous("lookup", |_: &Ctx| {
                async { Err::<bool, _>("timeout talking to directory") }.boxed()
            })],
        )]);

        let err = RuleEngine::new(&registry, "Customer", Ctx { value: 1 })
            .is_valid_async()
            .await
            .expect_err("error propagates");
        assert!(matches!(err, RuleError::CheckFailed { ref rule, .. } if rule == "backend"));
    }
}
