//! Configuration parsing & validation engine
//!
//! Turns the declarative YAML run manifest into a single validated,
//! immutable [`ParsedConfig`] or fails fast with a section-specific error.

mod parse;
mod schema;
mod validate;

pub use parse::{parse_config, parse_config_str};
pub use schema::{ConfigPaths, ModelSection, ParsedConfig, PathsSection, RunManifest};
pub use validate::{validate_hyperparameters, HyperparameterValue};
