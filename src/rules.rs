//! Rule Expressions - The Only Wire Format
//!
//! `token (delimiter token)*`, each token optionally prefixed with the
//! negation character, with the reserved leading token `optional`.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::value::Value;

pub const DEFAULT_RULE_DELIMITER: &str = ",";
pub const DEFAULT_NEGATE_CHARACTER: char = '!';
pub const OPTIONAL_TOKEN: &str = "optional";

/// Rules whose argument lives in the options under the rule's own name.
/// Supplying the argument is enough to apply the rule.
pub const RULES_REQUIRING_ARGS: [&str; 9] = [
    "minLength",
    "strictMinLength",
    "maxLength",
    "strictMaxLength",
    "length",
    "min",
    "strictMin",
    "max",
    "strictMax",
];

/// A delimited rule string or an already split token sequence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RuleExpr {
    Text(String),
    Tokens(Vec<String>),
}

impl RuleExpr {
    /// Raw (untrimmed) tokens in order.
    pub fn tokens(&self, delimiter: &str) -> Vec<String> {
        match self {
            RuleExpr::Text(text) => text.split(delimiter).map(str::to_string).collect(),
            RuleExpr::Tokens(tokens) => tokens.clone(),
        }
    }
}

impl fmt::Display for RuleExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RuleExpr::Text(text) => f.write_str(text),
            RuleExpr::Tokens(tokens) => f.write_str(&tokens.join(", ")),
        }
    }
}

impl From<&str> for RuleExpr {
    fn from(text: &str) -> Self {
        RuleExpr::Text(text.to_string())
    }
}

impl From<String> for RuleExpr {
    fn from(text: String) -> Self {
        RuleExpr::Text(text)
    }
}

impl From<Vec<String>> for RuleExpr {
    fn from(tokens: Vec<String>) -> Self {
        RuleExpr::Tokens(tokens)
    }
}

impl From<Vec<&str>> for RuleExpr {
    fn from(tokens: Vec<&str>) -> Self {
        RuleExpr::Tokens(tokens.into_iter().map(str::to_string).collect())
    }
}

impl<const N: usize> From<[&str; N]> for RuleExpr {
    fn from(tokens: [&str; N]) -> Self {
        RuleExpr::Tokens(tokens.iter().map(|t| t.to_string()).collect())
    }
}

impl From<&RuleExpr> for RuleExpr {
    fn from(expr: &RuleExpr) -> Self {
        expr.clone()
    }
}

/// One trimmed rule reference with its negation marker split off.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RuleToken<'a> {
    pub name: &'a str,
    pub negation: Option<char>,
}

impl<'a> RuleToken<'a> {
    pub fn parse(raw: &'a str, negate_character: char) -> Self {
        let trimmed = raw.trim();
        match trimmed.strip_prefix(negate_character) {
            Some(name) => Self { name, negation: Some(negate_character) },
            None => Self { name: trimmed, negation: None },
        }
    }

    pub fn is_negated(&self) -> bool {
        self.negation.is_some()
    }
}

impl fmt::Display for RuleToken<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(marker) = self.negation {
            write!(f, "{}", marker)?;
        }
        f.write_str(self.name)
    }
}

/// Configuration threaded unchanged through every nested evaluation of one
/// top-level call.
///
/// Keys the struct does not name are rule arguments (`{"max": 12}`), kept
/// in `args` in insertion order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Options {
    #[serde(skip_serializing_if = "is_default_delimiter")]
    pub rule_delimiter: String,
    #[serde(skip_serializing_if = "is_default_optional_values")]
    pub allowed_optional_values: Vec<Value>,
    #[serde(skip_serializing_if = "is_default_rules_requiring_args")]
    pub rules_requiring_args: Vec<String>,
    #[serde(skip_serializing_if = "is_default_negate_character")]
    pub negate_character: char,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rules: Option<RuleExpr>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub property_name: Option<String>,
    #[serde(flatten)]
    pub args: IndexMap<String, Value>,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            rule_delimiter: DEFAULT_RULE_DELIMITER.to_string(),
            allowed_optional_values: vec![Value::Undefined],
            rules_requiring_args: RULES_REQUIRING_ARGS.iter().map(|r| r.to_string()).collect(),
            negate_character: DEFAULT_NEGATE_CHARACTER,
            rules: None,
            property_name: None,
            args: IndexMap::new(),
        }
    }
}

fn is_default_delimiter(delimiter: &String) -> bool {
    delimiter == DEFAULT_RULE_DELIMITER
}

fn is_default_optional_values(values: &Vec<Value>) -> bool {
    values.len() == 1 && values[0].is_undefined()
}

fn is_default_rules_requiring_args(rules: &Vec<String>) -> bool {
    rules.iter().map(String::as_str).eq(RULES_REQUIRING_ARGS)
}

fn is_default_negate_character(c: &char) -> bool {
    *c == DEFAULT_NEGATE_CHARACTER
}

impl Options {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets a rule argument, e.g. `with_arg("max", 12)`.
    pub fn with_arg(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.args.insert(name.into(), value.into());
        self
    }

    /// Child rules for `eachElement` / `eachElementProperty`.
    pub fn with_rules(mut self, rules: impl Into<RuleExpr>) -> Self {
        self.rules = Some(rules.into());
        self
    }

    pub fn with_property_name(mut self, name: impl Into<String>) -> Self {
        self.property_name = Some(name.into());
        self
    }

    pub fn with_delimiter(mut self, delimiter: impl Into<String>) -> Self {
        self.rule_delimiter = delimiter.into();
        self
    }

    pub fn with_negate_character(mut self, c: char) -> Self {
        self.negate_character = c;
        self
    }

    pub fn with_allowed_optional_values(mut self, values: Vec<Value>) -> Self {
        self.allowed_optional_values = values;
        self
    }

    pub fn with_rules_requiring_args(mut self, rules: Vec<String>) -> Self {
        self.rules_requiring_args = rules;
        self
    }

    pub fn arg(&self, name: &str) -> Option<&Value> {
        self.args.get(name)
    }

    /// Active delimiter; an empty one falls back to the default.
    pub fn delimiter(&self) -> &str {
        if self.rule_delimiter.is_empty() {
            DEFAULT_RULE_DELIMITER
        } else {
            &self.rule_delimiter
        }
    }

    /// Rule names implied by arguments present in these options.
    pub fn implied_rules(&self) -> impl Iterator<Item = &str> {
        self.args
            .keys()
            .map(String::as_str)
            .filter(move |key| self.rules_requiring_args.iter().any(|r| r == key))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_text_splits_on_delimiter() {
        let expr = RuleExpr::from("string; positiveLength");
        assert_eq!(expr.tokens(";"), vec!["string", " positiveLength"]);
        assert_eq!(expr.tokens(","), vec!["string; positiveLength"]);
    }

    #[test]
    fn test_token_negation() {
        let token = RuleToken::parse("  !null ", '!');
        assert_eq!(token.name, "null");
        assert!(token.is_negated());
        assert_eq!(token.to_string(), "!null");

        let custom = RuleToken::parse("~array", '~');
        assert_eq!(custom.name, "array");
        assert_eq!(RuleToken::parse("~array", '!').name, "~array");
    }

    #[test]
    fn test_options_deserialize_rule_args() {
        let options: Options =
            serde_json::from_value(json!({"max": 12, "rules": "validNumber", "propertyName": "id"}))
                .unwrap();
        assert_eq!(options.arg("max"), Some(&Value::Number(12.0)));
        assert_eq!(options.rules, Some(RuleExpr::from("validNumber")));
        assert_eq!(options.property_name.as_deref(), Some("id"));
        assert_eq!(options.delimiter(), ",");
        assert_eq!(options.implied_rules().collect::<Vec<_>>(), vec!["max"]);
    }

    #[test]
    fn test_options_serialize_only_what_was_set() {
        let options = Options::new().with_arg("max", 3);
        assert_eq!(serde_json::to_string(&options).unwrap(), r#"{"max":3}"#);

        let options = Options::new().with_delimiter("|").with_rules(["number"]);
        assert_eq!(
            serde_json::to_string(&options).unwrap(),
            r#"{"ruleDelimiter":"|","rules":["number"]}"#
        );
    }

    #[test]
    fn test_unrelated_args_imply_nothing() {
        let options = Options::new().with_arg("label", "x").with_arg("minLength", 2);
        assert_eq!(options.implied_rules().collect::<Vec<_>>(), vec!["minLength"]);
    }
}
