//! ruleval Core - Declarative Value Validation
//!
//! Callers describe constraints as short rule expressions such as
//! `"string, positiveLength"`. Each name resolves against a [`Registry`]
//! of primitive predicates, aliases and composites, and the evaluator
//! applies the result to a [`Value`].
//!
//! # Rule Grammar
//! - Tokens are separated by the rule delimiter (`,` by default)
//! - A token prefixed with the negation character (`!`) is inverted
//! - A leading `optional` token accepts absent values outright
//! - Every token must pass (conjunction)

pub mod value;
pub mod rules;
pub mod error;
pub mod predicates;
pub mod collections;
pub mod registry;
pub mod evaluator;
pub mod config;
pub mod validation;

pub use value::Value;
pub use rules::{Options, RuleExpr, RuleToken};
pub use error::RuleError;
pub use predicates::{Predicate, Scope};
pub use collections::{EachElement, EachElementProperty};
pub use registry::{Registry, Resolution};
pub use evaluator::validate;
pub use config::{ConfigError, RuleSet};
pub use validation::{ValidationOutcome, Validator};

pub const ENGINE_VERSION: &str = env!("CARGO_PKG_VERSION");
