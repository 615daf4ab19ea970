//! Evaluator - Recursive Rule Application
//!
//! Soft mode (no description) applies every token and returns the
//! conjunction. Strict mode raises on the first token that fails.

use serde::Serialize;
use tracing::{debug, trace, warn};

use crate::error::RuleError;
use crate::predicates::Scope;
use crate::registry::{Registry, Resolution};
use crate::rules::{Options, RuleExpr, RuleToken, OPTIONAL_TOKEN};
use crate::value::Value;

/// Validates `value` against `rules`.
///
/// A leading `optional` token accepts any value listed in
/// `options.allowed_optional_values` outright. Arguments in `options` named
/// by `options.rules_requiring_args` add their rule when it is not already
/// listed. Composites and collection predicates recurse with the same
/// `options` and `description`.
///
/// Unknown rules and predicate misuse are errors in both modes.
pub fn validate(
    registry: &Registry,
    value: &Value,
    rules: &RuleExpr,
    description: Option<&str>,
    options: &Options,
) -> Result<bool, RuleError> {
    let delimiter = options.delimiter();
    let description = description.filter(|d| !d.is_empty());
    let mut tokens = rules.tokens(delimiter);

    if tokens.first().map(|t| t.trim()) == Some(OPTIONAL_TOKEN) {
        if options.allowed_optional_values.contains(value) {
            trace!(value = %value.type_name(), "optional value absent, rules skipped");
            return Ok(true);
        }
        tokens.remove(0);
    }

    for implied in options.implied_rules() {
        if !tokens.iter().any(|t| t == implied) {
            trace!(rule = implied, "rule implied by its argument");
            tokens.push(implied.to_string());
        }
    }

    let mut valid = true;
    for raw in &tokens {
        let token = RuleToken::parse(raw, options.negate_character);
        let outcome = match registry.resolve(token.name, delimiter)? {
            Resolution::Primitive { name, predicate } => {
                debug!(rule = %token, resolved = name, "applying primitive");
                let scope = Scope {
                    registry,
                    options,
                    description,
                    rule: name,
                };
                predicate.check(value, &scope)?
            }
            Resolution::Composite { name, rules } => {
                debug!(rule = %token, resolved = name, "expanding composite");
                validate(registry, value, rules, description, options)?
            }
        };

        let passed = outcome != token.is_negated();
        valid &= passed;

        if !passed {
            if let Some(description) = description {
                warn!(rule = %token, description, "validation failed");
                return Err(failure(&token, description, value, options));
            }
        }
    }

    Ok(valid)
}

fn failure(token: &RuleToken<'_>, description: &str, value: &Value, options: &Options) -> RuleError {
    RuleError::ValidationFailure {
        rule: token.to_string(),
        description: description.to_string(),
        value: value.to_json_text(),
        options: json_text(options),
    }
}

fn json_text<T: Serialize>(item: &T) -> String {
    serde_json::to_string(item).unwrap_or_else(|_| "{}".to_string())
}
