//! Rule Registry - Primitives, Aliases, Composites
//!
//! Lookup order is fixed: primitive, then alias of a primitive, then
//! composite, then alias of a composite. Alias chains are exactly one hop.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use crate::collections;
use crate::error::RuleError;
use crate::predicates::{self, Predicate};
use crate::rules::RuleExpr;

const BUILTIN_ALIASES: &[(&str, &str)] = &[
    // builtin types
    ("number", "typeIsNumber"),
    ("object", "typeIsObject"),
    ("string", "typeIsString"),
    ("boolean", "typeIsBoolean"),
    ("array", "isArray"),
    ("undefined", "isUndefined"),
    ("null", "isNull"),
    ("finite", "isFinite"),
    ("integer", "isInteger"),
    // composites
    ("validString", "isNonEmptyString"),
    ("validArray", "isNonEmptyArray"),
    ("validObject", "isNonEmptyObject"),
];

const BUILTIN_COMPOSITES: &[(&str, &[&str])] = &[
    // negations
    ("notNull", &["!isNull"]),
    ("isDefined", &["!isUndefined"]),
    ("notZero", &["!isZero"]),
    ("notBoolean", &["!typeIsBoolean"]),
    ("notArray", &["!isArray"]),
    ("hasNoProperties", &["!hasAProperty"]),
    // numerics
    ("validNumeric", &["!null", "!boolean", "!array", "isFinite"]),
    ("validNumber", &["validNumeric", "number"]),
    ("validIntegerish", &["validNumeric", "integer"]),
    ("validInteger", &["validNumber", "integer"]),
    // object-ish
    ("strictObject", &["object", "!null", "!array"]),
    ("isNonEmptyString", &["string", "positiveLength", "hasNonWhitespace"]),
    ("isNonEmptyArray", &["array", "positiveLength"]),
    ("isNonEmptyObject", &["strictObject", "hasAProperty"]),
];

/// What a rule name stands for.
pub enum Resolution<'r> {
    Primitive {
        name: &'r str,
        predicate: &'r dyn Predicate,
    },
    Composite {
        name: &'r str,
        rules: &'r RuleExpr,
    },
}

impl Resolution<'_> {
    /// Canonical name in the table that matched.
    pub fn name(&self) -> &str {
        match self {
            Resolution::Primitive { name, .. } | Resolution::Composite { name, .. } => name,
        }
    }

    pub fn is_composite(&self) -> bool {
        matches!(self, Resolution::Composite { .. })
    }
}

/// Predicate library, alias table and composite table owned by the host.
#[derive(Clone, Default)]
pub struct Registry {
    predicates: HashMap<String, Arc<dyn Predicate>>,
    aliases: HashMap<String, String>,
    composites: HashMap<String, RuleExpr>,
}

impl Registry {
    /// An empty registry with no rules at all.
    pub fn new() -> Self {
        Self::default()
    }

    /// The built-in predicate catalog, aliases and composites.
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        predicates::install(&mut registry);
        collections::install(&mut registry);
        for (alias, target) in BUILTIN_ALIASES {
            registry.register_alias(*alias, *target);
        }
        for (name, rules) in BUILTIN_COMPOSITES {
            registry.register_composite(*name, rules.to_vec());
        }
        registry
    }

    pub fn register_predicate<P>(&mut self, name: impl Into<String>, predicate: P)
    where
        P: Predicate + 'static,
    {
        self.predicates.insert(name.into(), Arc::new(predicate));
    }

    /// `target` must name a primitive or a composite, never another alias.
    pub fn register_alias(&mut self, alias: impl Into<String>, target: impl Into<String>) {
        self.aliases.insert(alias.into(), target.into());
    }

    /// Composites may reference other composites; cycles are not detected.
    pub fn register_composite(&mut self, name: impl Into<String>, rules: impl Into<RuleExpr>) {
        self.composites.insert(name.into(), rules.into());
    }

    pub fn predicates(&self) -> &HashMap<String, Arc<dyn Predicate>> {
        &self.predicates
    }

    pub fn aliases(&self) -> &HashMap<String, String> {
        &self.aliases
    }

    pub fn composites(&self) -> &HashMap<String, RuleExpr> {
        &self.composites
    }

    pub fn contains(&self, name: &str) -> bool {
        self.predicates.contains_key(name)
            || self.aliases.contains_key(name)
            || self.composites.contains_key(name)
    }

    /// Resolves one (unnegated) rule name. `delimiter` is only carried into
    /// the error, since a mistyped separator is the usual cause.
    pub fn resolve(&self, name: &str, delimiter: &str) -> Result<Resolution<'_>, RuleError> {
        if let Some((name, predicate)) = self.predicates.get_key_value(name) {
            return Ok(Resolution::Primitive { name: name.as_str(), predicate: predicate.as_ref() });
        }

        let target = self.aliases.get(name).map(String::as_str);

        if let Some((name, predicate)) = target.and_then(|t| self.predicates.get_key_value(t)) {
            return Ok(Resolution::Primitive { name: name.as_str(), predicate: predicate.as_ref() });
        }

        let composite = self
            .composites
            .get_key_value(name)
            .or_else(|| target.and_then(|t| self.composites.get_key_value(t)));

        match composite {
            Some((name, rules)) => Ok(Resolution::Composite { name: name.as_str(), rules }),
            None => Err(RuleError::UnknownRule {
                rule: name.to_string(),
                delimiter: delimiter.to_string(),
            }),
        }
    }
}

impl fmt::Debug for Registry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut predicates: Vec<_> = self.predicates.keys().collect();
        predicates.sort();
        f.debug_struct("Registry")
            .field("predicates", &predicates)
            .field("aliases", &self.aliases)
            .field("composites", &self.composites)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::predicates::Scope;
    use crate::value::Value;

    fn always(_: &Value, _: &Scope<'_>) -> Result<bool, RuleError> {
        Ok(true)
    }

    #[test]
    fn test_alias_resolves_to_primitive() {
        let registry = Registry::with_builtins();
        let resolved = registry.resolve("number", ",").unwrap();
        assert_eq!(resolved.name(), "typeIsNumber");
        assert!(!resolved.is_composite());
    }

    #[test]
    fn test_alias_resolves_to_composite() {
        let registry = Registry::with_builtins();
        let resolved = registry.resolve("validString", ",").unwrap();
        assert_eq!(resolved.name(), "isNonEmptyString");
        assert!(resolved.is_composite());
    }

    #[test]
    fn test_primitive_wins_name_collisions() {
        let mut registry = Registry::new();
        registry.register_predicate("shared", always);
        registry.register_composite("shared", "other");
        registry.register_alias("shared", "elsewhere");
        assert!(!registry.resolve("shared", ",").unwrap().is_composite());
    }

    #[test]
    fn test_alias_of_primitive_beats_composite() {
        let mut registry = Registry::new();
        registry.register_predicate("target", always);
        registry.register_alias("name", "target");
        registry.register_composite("name", ["target"]);
        assert_eq!(registry.resolve("name", ",").unwrap().name(), "target");
    }

    #[test]
    fn test_aliases_are_one_hop() {
        let mut registry = Registry::new();
        registry.register_predicate("leaf", always);
        registry.register_alias("first", "second");
        registry.register_alias("second", "leaf");
        assert!(registry.resolve("second", ",").is_ok());
        assert!(matches!(
            registry.resolve("first", ";"),
            Err(RuleError::UnknownRule { rule, delimiter }) if rule == "first" && delimiter == ";"
        ));
    }

    #[test]
    fn test_new_registry_is_empty() {
        let registry = Registry::new();
        assert!(!registry.contains("number"));
        assert!(Registry::with_builtins().contains("number"));
        assert!(Registry::with_builtins().contains("eachElementProperty"));
    }
}
