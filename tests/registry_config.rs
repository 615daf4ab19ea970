//! Rule Set Loading Tests

use std::fs;

use ruleval_core::{ConfigError, Options, Registry, RuleError, Validator, Value};
use serde_json::json;

#[test]
fn rule_sets_extend_builtins_in_file_name_order() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(
        dir.path().join("10-base.json"),
        r#"{"composites": {"port": ["validInteger", "!isZero"]}, "aliases": {"tcpPort": "port"}}"#,
    )
    .unwrap();
    fs::write(
        dir.path().join("20-override.json"),
        r#"{"composites": {"port": "validInteger"}}"#,
    )
    .unwrap();
    fs::write(dir.path().join("notes.txt"), "ignored").unwrap();

    let registry = Registry::load_from_dir(dir.path()).unwrap();
    assert!(registry.contains("number"));

    let validator = Validator::new(registry);
    // later file replaced the composite, so zero is accepted
    assert_eq!(validator.is_valid(&Value::from(0), "tcpPort"), Ok(true));
    assert_eq!(validator.is_valid(&Value::from(2.5), "tcpPort"), Ok(false));
}

#[test]
fn missing_directory_yields_builtins() {
    let dir = tempfile::tempdir().unwrap();
    let registry = Registry::load_from_dir(&dir.path().join("absent")).unwrap();
    assert!(registry.contains("validNumber"));
    assert!(registry.aliases().contains_key("validString"));
}

#[test]
fn malformed_rule_set_names_the_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("broken.json");
    fs::write(&path, r#"{"aliases": ["not", "a", "map"]}"#).unwrap();

    let err = Registry::load_from_dir(dir.path()).unwrap_err();
    assert!(matches!(err, ConfigError::Json { .. }));
    assert!(err.to_string().contains("broken.json"));
}

#[test]
fn composite_may_reference_unknown_rules_until_used() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("typo.json");
    fs::write(&path, r#"{"composites": {"money": "validNumber, positve"}}"#).unwrap();

    let mut registry = Registry::with_builtins();
    registry.extend_from_file(&path).unwrap();
    let validator = Validator::new(registry);

    let err = validator
        .validate(&Value::from(5), "money", None, &Options::default())
        .unwrap_err();
    assert_eq!(
        err,
        RuleError::UnknownRule { rule: "positve".into(), delimiter: ",".into() }
    );
}

#[test]
fn host_predicates_join_the_library() {
    fn even(value: &Value, _: &ruleval_core::Scope<'_>) -> Result<bool, RuleError> {
        Ok(matches!(value, Value::Number(n) if n % 2.0 == 0.0))
    }

    let mut registry = Registry::with_builtins();
    registry.register_predicate("isEven", even);
    registry.register_alias("even", "isEven");
    registry.register_composite("evenInteger", ["validInteger", "even"]);

    let validator = Validator::new(registry);
    assert_eq!(validator.is_valid(&Value::from(4), "evenInteger"), Ok(true));
    assert_eq!(validator.is_valid(&Value::from(3), "evenInteger"), Ok(false));

    let opts: Options = serde_json::from_value(json!({"rules": "!even"})).unwrap();
    let odd = Value::from(json!([1, 3, 5]));
    assert_eq!(validator.validate(&odd, "eachElement", None, &opts), Ok(true));
}
