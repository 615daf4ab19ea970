//! Validation Facade - Registry Plus Evaluator
//!
//! `Validator` owns one registry and runs rule expressions against it.
//! `check` folds every outcome (including errors) into a serializable report.

use serde::Serialize;

use crate::error::RuleError;
use crate::evaluator;
use crate::registry::Registry;
use crate::rules::{Options, RuleExpr};
use crate::value::Value;

#[derive(Debug, Clone, Serialize)]
pub struct OutcomeError {
    pub kind: &'static str,
    pub message: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ValidationOutcome {
    pub valid: bool,
    pub rules: RuleExpr,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<OutcomeError>,
}

impl ValidationOutcome {
    pub fn success(rules: RuleExpr, valid: bool) -> Self {
        Self { valid, rules, error: None }
    }

    pub fn failure(rules: RuleExpr, error: &RuleError) -> Self {
        Self {
            valid: false,
            rules,
            error: Some(OutcomeError {
                kind: error.kind(),
                message: error.to_string(),
            }),
        }
    }

    /// True when the call itself was misused, as opposed to the value
    /// failing its rules.
    pub fn is_usage_error(&self) -> bool {
        self.error
            .as_ref()
            .is_some_and(|e| e.kind != "validation_failure")
    }
}

#[derive(Debug, Clone)]
pub struct Validator {
    registry: Registry,
}

impl Validator {
    pub fn new(registry: Registry) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn registry_mut(&mut self) -> &mut Registry {
        &mut self.registry
    }

    /// Strict when `description` is a non-empty string, soft otherwise.
    pub fn validate(
        &self,
        value: &Value,
        rules: impl Into<RuleExpr>,
        description: Option<&str>,
        options: &Options,
    ) -> Result<bool, RuleError> {
        evaluator::validate(&self.registry, value, &rules.into(), description, options)
    }

    /// Soft check with default options.
    pub fn is_valid(&self, value: &Value, rules: impl Into<RuleExpr>) -> Result<bool, RuleError> {
        self.validate(value, rules, None, &Options::default())
    }

    pub fn check(
        &self,
        value: &Value,
        rules: impl Into<RuleExpr>,
        description: Option<&str>,
        options: &Options,
    ) -> ValidationOutcome {
        let rules = rules.into();
        match evaluator::validate(&self.registry, value, &rules, description, options) {
            Ok(valid) => ValidationOutcome::success(rules, valid),
            Err(err) => ValidationOutcome::failure(rules, &err),
        }
    }
}

impl Default for Validator {
    fn default() -> Self {
        Self::new(Registry::with_builtins())
    }
}
