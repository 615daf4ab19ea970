//! Error Taxonomy
//!
//! Usage errors are fatal in every mode. `ValidationFailure` only exists in
//! strict mode, when the caller supplied a failure description.

use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RuleError {
    #[error("Rule: {rule} is not an available validator.\nMake sure rules are separated by: '{delimiter}'")]
    UnknownRule { rule: String, delimiter: String },

    #[error("Rule {rule} requires the `{option}` option")]
    MissingOption { rule: String, option: String },

    #[error("Cannot perform {rule} validation on {found} value")]
    TypeMismatch { rule: String, found: &'static str },

    /// `value` and `options` hold the JSON text of what was validated.
    #[error("Validation failed on rule \"{rule}\".\n{description} was: {value}\noptions were: {options}")]
    ValidationFailure {
        rule: String,
        description: String,
        value: String,
        options: String,
    },
}

impl RuleError {
    /// True for strict-mode failures, false for registry and usage errors.
    pub fn is_validation_failure(&self) -> bool {
        matches!(self, RuleError::ValidationFailure { .. })
    }

    pub fn kind(&self) -> &'static str {
        match self {
            RuleError::UnknownRule { .. } => "unknown_rule",
            RuleError::MissingOption { .. } => "missing_option",
            RuleError::TypeMismatch { .. } => "type_mismatch",
            RuleError::ValidationFailure { .. } => "validation_failure",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_rule_mentions_delimiter() {
        let err = RuleError::UnknownRule { rule: "number;string".into(), delimiter: ",".into() };
        let message = err.to_string();
        assert!(message.contains("number;string"));
        assert!(message.contains("separated by: ','"));
        assert!(!err.is_validation_failure());
    }

    #[test]
    fn test_failure_message_layout() {
        let err = RuleError::ValidationFailure {
            rule: "number".into(),
            description: "count".into(),
            value: "[5]".into(),
            options: "{}".into(),
        };
        assert_eq!(
            err.to_string(),
            "Validation failed on rule \"number\".\ncount was: [5]\noptions were: {}"
        );
        assert_eq!(err.kind(), "validation_failure");
    }
}
