//! Collection Validators
//!
//! `eachElement` and `eachElementProperty` are ordinary predicates that
//! re-enter the evaluator once per element, with the same registry, options
//! and failure description as the call that reached them.

use crate::error::RuleError;
use crate::predicates::{Predicate, Scope};
use crate::registry::Registry;
use crate::rules::RuleExpr;
use crate::value::Value;

/// Applies `options.rules` to every array element or object member.
pub struct EachElement;

/// Applies `options.rules` to `element[options.propertyName]` for every
/// array element or object member.
pub struct EachElementProperty;

impl Predicate for EachElement {
    fn check(&self, value: &Value, scope: &Scope<'_>) -> Result<bool, RuleError> {
        let rules = child_rules(scope)?;
        all_members(value, scope.rule, |member| scope.validate(member, rules))
    }
}

impl Predicate for EachElementProperty {
    fn check(&self, value: &Value, scope: &Scope<'_>) -> Result<bool, RuleError> {
        let rules = child_rules(scope)?;
        let property_name = scope
            .options
            .property_name
            .as_deref()
            .ok_or_else(|| scope.missing("propertyName"))?;

        all_members(value, scope.rule, |member| {
            let property = member.property(property_name).ok_or_else(|| {
                RuleError::TypeMismatch {
                    rule: scope.rule.to_string(),
                    found: member.type_name(),
                }
            })?;
            scope.validate(property, rules)
        })
    }
}

pub fn install(registry: &mut Registry) {
    registry.register_predicate("eachElement", EachElement);
    registry.register_predicate("eachElementProperty", EachElementProperty);
}

fn child_rules<'a>(scope: &Scope<'a>) -> Result<&'a RuleExpr, RuleError> {
    scope.options.rules.as_ref().ok_or_else(|| scope.missing("rules"))
}

/// Conjunction over every member. Soft checks run for all members; an
/// error (including a strict-mode failure) stops at the member raising it.
fn all_members<F>(value: &Value, rule: &str, mut check: F) -> Result<bool, RuleError>
where
    F: FnMut(&Value) -> Result<bool, RuleError>,
{
    let members: Box<dyn Iterator<Item = &Value> + '_> = match value {
        Value::Array(items) => Box::new(items.iter()),
        Value::Object(map) => Box::new(map.values()),
        other => {
            return Err(RuleError::TypeMismatch {
                rule: rule.to_string(),
                found: other.type_name(),
            })
        }
    };

    let mut all_valid = true;
    for member in members {
        all_valid &= check(member)?;
    }
    Ok(all_valid)
}
