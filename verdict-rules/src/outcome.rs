use serde::Serialize;

/// Which entry point produced a report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EvaluationMode {
    Sync,
    Async,
}

/// Verdict of a single rule within one evaluation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RuleVerdict {
    pub rule_id: String,
    pub passed: bool,
    /// First check that returned `false`, if any.
    pub failed_check: Option<String>,
    pub checks_run: usize,
}

impl RuleVerdict {
    pub fn new(rule_id: impl Into<String>) -> Self {
        Self {
            rule_id: rule_id.into(),
            passed: true,
            failed_check: None,
            checks_run: 0,
        }
    }

    pub(crate) fn record(&mut self, check: &str, passed: bool) {
        self.checks_run += 1;
        if !passed && self.passed {
            self.passed = false;
            self.failed_check = Some(check.to_string());
        }
    }
}

/// Aggregated result of evaluating every rule of a category against one context.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EvaluationReport {
    pub category: String,
    pub mode: EvaluationMode,
    pub verdict: bool,
    pub rules: Vec<RuleVerdict>,
}

impl EvaluationReport {
    pub fn new(category: impl Into<String>, mode: EvaluationMode) -> Self {
        Self {
            category: category.into(),
            mode,
            verdict: true,
            rules: Vec::new(),
        }
    }

    pub(crate) fn push(&mut self, rule: RuleVerdict) {
        self.verdict &= rule.passed;
        self.rules.push(rule);
    }

    pub fn failed_rules(&self) -> impl Iterator<Item = &RuleVerdict> {
        self.rules.iter().filter(|rule| !rule.passed)
    }

    pub fn is_valid(&self) -> bool {
        self.verdict
    }
}
