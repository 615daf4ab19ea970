//! ruleval CLI - Inspect a registry and run rule expressions
//!
//! Commands: rules, resolve, validate
//! Outputs JSON to stdout
//! Returns 2 when a value fails its rules, 1 on usage errors

use clap::{Parser, Subcommand};
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::process::ExitCode;

use ruleval_core::{Options, Registry, Resolution, RuleToken, Validator, Value};

#[derive(Parser)]
#[command(name = "ruleval-cli", version)]
#[command(about = "ruleval CLI - Declarative value validation")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Directory of JSON rule sets extending the built-in registry
    #[arg(long, default_value = "rules")]
    rules_dir: PathBuf,
}

#[derive(Subcommand)]
enum Commands {
    /// List predicates, aliases and composites
    Rules,

    /// Show what a rule name resolves to
    Resolve {
        /// Rule name, optionally negated
        #[arg(short, long)]
        name: String,
    },

    /// Validate a JSON value
    Validate {
        /// JSON value to inspect
        #[arg(short, long)]
        value: String,

        /// Rule expression, e.g. "optional, validNumber"
        #[arg(short, long)]
        rules: String,

        /// Failure description; enables strict mode
        #[arg(short, long)]
        description: Option<String>,

        /// JSON options object, e.g. '{"max": 12}'
        #[arg(short, long)]
        options: Option<String>,
    },
}

fn emit<T: Serialize>(output: &T) {
    match serde_json::to_string_pretty(output) {
        Ok(text) => println!("{}", text),
        Err(e) => println!(r#"{{"error": "Failed to encode output: {}"}}"#, e),
    }
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let registry = match Registry::load_from_dir(&cli.rules_dir) {
        Ok(r) => r,
        Err(e) => {
            emit(&serde_json::json!({ "error": e.to_string() }));
            return ExitCode::FAILURE;
        }
    };

    let validator = Validator::new(registry);

    match cli.command {
        Commands::Rules => {
            let registry = validator.registry();
            let mut predicates: Vec<_> = registry.predicates().keys().collect();
            predicates.sort();
            let aliases: BTreeMap<_, _> = registry.aliases().iter().collect();
            let composites: BTreeMap<_, _> = registry.composites().iter().collect();

            emit(&serde_json::json!({
                "predicates": predicates,
                "aliases": aliases,
                "composites": composites,
            }));
            ExitCode::SUCCESS
        }

        Commands::Resolve { name } => {
            let options = Options::default();
            let token = RuleToken::parse(&name, options.negate_character);

            match validator.registry().resolve(token.name, options.delimiter()) {
                Ok(Resolution::Primitive { name: target, .. }) => {
                    emit(&serde_json::json!({
                        "name": name,
                        "negated": token.is_negated(),
                        "kind": "primitive",
                        "target": target,
                    }));
                    ExitCode::SUCCESS
                }
                Ok(Resolution::Composite { name: target, rules }) => {
                    emit(&serde_json::json!({
                        "name": name,
                        "negated": token.is_negated(),
                        "kind": "composite",
                        "target": target,
                        "rules": rules,
                    }));
                    ExitCode::SUCCESS
                }
                Err(e) => {
                    emit(&serde_json::json!({ "name": name, "error": e.to_string() }));
                    ExitCode::FAILURE
                }
            }
        }

        Commands::Validate { value, rules, description, options } => {
            let value: Value = match serde_json::from_str(&value) {
                Ok(v) => v,
                Err(e) => {
                    emit(&serde_json::json!({ "valid": false, "error": format!("Invalid value: {}", e) }));
                    return ExitCode::FAILURE;
                }
            };

            let options: Options = match options.as_deref().map(serde_json::from_str::<Options>).transpose() {
                Ok(o) => o.unwrap_or_default(),
                Err(e) => {
                    emit(&serde_json::json!({ "valid": false, "error": format!("Invalid options: {}", e) }));
                    return ExitCode::FAILURE;
                }
            };

            let outcome = validator.check(&value, rules, description.as_deref(), &options);
            emit(&outcome);

            if outcome.is_usage_error() {
                ExitCode::FAILURE
            } else if outcome.valid {
                ExitCode::SUCCESS
            } else {
                ExitCode::from(2)
            }
        }
    }
}
