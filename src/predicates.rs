//! Predicate Library - Leaf Checks
//!
//! Every predicate answers `Ok(true)` / `Ok(false)`. Errors are reserved
//! for misuse, such as a bound rule applied without its bound.

use std::cmp::Ordering;

use crate::error::RuleError;
use crate::evaluator;
use crate::registry::Registry;
use crate::rules::{Options, RuleExpr};
use crate::value::Value;

/// Uniform collaborator signature for everything in the predicate library.
pub trait Predicate: Send + Sync {
    fn check(&self, value: &Value, scope: &Scope<'_>) -> Result<bool, RuleError>;
}

impl<F> Predicate for F
where
    F: Fn(&Value, &Scope<'_>) -> Result<bool, RuleError> + Send + Sync,
{
    fn check(&self, value: &Value, scope: &Scope<'_>) -> Result<bool, RuleError> {
        self(value, scope)
    }
}

/// Context handed to a predicate for one token of one evaluation.
pub struct Scope<'a> {
    pub registry: &'a Registry,
    pub options: &'a Options,
    /// `None` in soft mode and for negated tokens.
    pub description: Option<&'a str>,
    /// Canonical name the token resolved to.
    pub rule: &'a str,
}

impl Scope<'_> {
    /// Re-enters the evaluator with this scope's registry, options and
    /// failure description.
    pub fn validate(&self, value: &Value, rules: &RuleExpr) -> Result<bool, RuleError> {
        evaluator::validate(self.registry, value, rules, self.description, self.options)
    }

    /// Argument stored under `option`, or `MissingOption` for this rule.
    pub fn require_arg(&self, option: &str) -> Result<&Value, RuleError> {
        self.options.arg(option).ok_or_else(|| self.missing(option))
    }

    pub fn missing(&self, option: &str) -> RuleError {
        RuleError::MissingOption {
            rule: self.rule.to_string(),
            option: option.to_string(),
        }
    }
}

/// Installs the leaf catalog.
pub fn install(registry: &mut Registry) {
    registry.register_predicate("isNaN", is_nan);
    registry.register_predicate("isInteger", is_integer);
    registry.register_predicate("isFinite", is_finite);
    registry.register_predicate("isZero", is_zero);

    registry.register_predicate("typeIsNumber", type_is_number);
    registry.register_predicate("typeIsString", type_is_string);
    registry.register_predicate("typeIsObject", type_is_object);
    registry.register_predicate("typeIsBoolean", type_is_boolean);
    registry.register_predicate("isNull", is_null);
    registry.register_predicate("isArray", is_array);
    registry.register_predicate("isUndefined", is_undefined);

    registry.register_predicate("positiveLength", positive_length);
    registry.register_predicate("hasNonWhitespace", has_non_whitespace);
    registry.register_predicate("hasNoTemplateStrings", has_no_template_strings);
    registry.register_predicate("hasAProperty", has_a_property);

    registry.register_predicate("min", min);
    registry.register_predicate("strictMin", strict_min);
    registry.register_predicate("max", max);
    registry.register_predicate("strictMax", strict_max);

    registry.register_predicate("length", length);
    registry.register_predicate("minLength", min_length);
    registry.register_predicate("strictMinLength", strict_min_length);
    registry.register_predicate("maxLength", max_length);
    registry.register_predicate("strictMaxLength", strict_max_length);
}

// --- Numeric ---

fn is_nan(value: &Value, _: &Scope<'_>) -> Result<bool, RuleError> {
    Ok(value.to_number().is_nan())
}

/// A number whose 32-bit truncation is itself.
fn is_integer(value: &Value, _: &Scope<'_>) -> Result<bool, RuleError> {
    Ok(match value {
        Value::Number(n) => {
            n.fract() == 0.0 && *n >= f64::from(i32::MIN) && *n <= f64::from(i32::MAX)
        }
        _ => false,
    })
}

fn is_finite(value: &Value, _: &Scope<'_>) -> Result<bool, RuleError> {
    Ok(value.to_number().is_finite())
}

fn is_zero(value: &Value, _: &Scope<'_>) -> Result<bool, RuleError> {
    Ok(matches!(value, Value::Number(n) if *n == 0.0))
}

// --- Types ---

fn type_is_number(value: &Value, _: &Scope<'_>) -> Result<bool, RuleError> {
    Ok(matches!(value, Value::Number(_)))
}

fn type_is_string(value: &Value, _: &Scope<'_>) -> Result<bool, RuleError> {
    Ok(matches!(value, Value::String(_)))
}

/// Objects, arrays and `null` all count.
fn type_is_object(value: &Value, _: &Scope<'_>) -> Result<bool, RuleError> {
    Ok(matches!(value, Value::Object(_) | Value::Array(_) | Value::Null))
}

fn type_is_boolean(value: &Value, _: &Scope<'_>) -> Result<bool, RuleError> {
    Ok(matches!(value, Value::Bool(_)))
}

fn is_null(value: &Value, _: &Scope<'_>) -> Result<bool, RuleError> {
    Ok(matches!(value, Value::Null))
}

fn is_array(value: &Value, _: &Scope<'_>) -> Result<bool, RuleError> {
    Ok(matches!(value, Value::Array(_)))
}

fn is_undefined(value: &Value, _: &Scope<'_>) -> Result<bool, RuleError> {
    Ok(value.is_undefined())
}

// --- Properties of the value ---

// strings and arrays only; objects answer through hasAProperty
fn positive_length(value: &Value, _: &Scope<'_>) -> Result<bool, RuleError> {
    match value {
        Value::String(_) | Value::Array(_) => Ok(value.length().is_some_and(|len| len > 0)),
        _ => Ok(false),
    }
}

fn has_non_whitespace(value: &Value, scope: &Scope<'_>) -> Result<bool, RuleError> {
    let Some(text) = value.as_str() else {
        return Ok(false);
    };
    let trimmed = Value::from(text.trim());
    evaluator::validate(
        scope.registry,
        &trimmed,
        &RuleExpr::from("positiveLength"),
        None,
        &Options::default(),
    )
}

fn has_no_template_strings(value: &Value, _: &Scope<'_>) -> Result<bool, RuleError> {
    Ok(value
        .as_str()
        .map_or(true, |text| !text.contains("{{") && !text.contains("}}")))
}

fn has_a_property(value: &Value, _: &Scope<'_>) -> Result<bool, RuleError> {
    Ok(value.length().is_some_and(|len| len > 0))
}

// --- Bounds ---

/// Strings compare lexically against string bounds, everything else
/// numerically. `None` when either side is `NaN`.
fn compare(value: &Value, bound: &Value) -> Option<Ordering> {
    match (value, bound) {
        (Value::String(a), Value::String(b)) => Some(a.cmp(b)),
        _ => value.to_number().partial_cmp(&bound.to_number()),
    }
}

fn bound_rule(
    value: &Value,
    scope: &Scope<'_>,
    option: &str,
    accept: fn(Ordering) -> bool,
) -> Result<bool, RuleError> {
    let bound = scope.require_arg(option)?;
    Ok(compare(value, bound).is_some_and(accept))
}

fn min(value: &Value, scope: &Scope<'_>) -> Result<bool, RuleError> {
    bound_rule(value, scope, "min", Ordering::is_ge)
}

fn strict_min(value: &Value, scope: &Scope<'_>) -> Result<bool, RuleError> {
    bound_rule(value, scope, "strictMin", Ordering::is_gt)
}

fn max(value: &Value, scope: &Scope<'_>) -> Result<bool, RuleError> {
    bound_rule(value, scope, "max", Ordering::is_le)
}

fn strict_max(value: &Value, scope: &Scope<'_>) -> Result<bool, RuleError> {
    bound_rule(value, scope, "strictMax", Ordering::is_lt)
}

// --- Lengths ---

fn length_rule(
    value: &Value,
    scope: &Scope<'_>,
    option: &str,
    accept: fn(Ordering) -> bool,
) -> Result<bool, RuleError> {
    let bound = scope.require_arg(option)?.to_number();
    Ok(value
        .length()
        .and_then(|len| (len as f64).partial_cmp(&bound))
        .is_some_and(accept))
}

/// Exact length; the bound must itself be a number.
fn length(value: &Value, scope: &Scope<'_>) -> Result<bool, RuleError> {
    let expected = match scope.require_arg("length")? {
        Value::Number(n) => *n,
        _ => return Ok(false),
    };
    Ok(value.length().is_some_and(|len| len as f64 == expected))
}

fn min_length(value: &Value, scope: &Scope<'_>) -> Result<bool, RuleError> {
    length_rule(value, scope, "minLength", Ordering::is_ge)
}

fn strict_min_length(value: &Value, scope: &Scope<'_>) -> Result<bool, RuleError> {
    length_rule(value, scope, "strictMinLength", Ordering::is_gt)
}

fn max_length(value: &Value, scope: &Scope<'_>) -> Result<bool, RuleError> {
    length_rule(value, scope, "maxLength", Ordering::is_le)
}

fn strict_max_length(value: &Value, scope: &Scope<'_>) -> Result<bool, RuleError> {
    length_rule(value, scope, "strictMaxLength", Ordering::is_lt)
}
