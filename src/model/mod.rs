//! Estimator adapters and the registry that resolves model names to them
//!
//! Estimators form a closed, compile-time-known set of adapters implementing
//! a common fit/predict/parameter-introspection capability trait. The
//! parameter map returned by [`Estimator::params`] doubles as the validation
//! surface for user-supplied hyperparameters.

mod knn;
mod linear;
mod registry;

pub use knn::KNeighborsRegressor;
pub use linear::{Lasso, LinearRegression, Ridge};
pub use registry::{EstimatorRegistry, EstimatorSpec};

use crate::error::{Error, Result};
use ndarray::{Array1, Array2};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// A single hyperparameter value
///
/// Closed value type covering everything the YAML config can express for a
/// hyperparameter cell. Deserialization order matters for the untagged
/// representation: integers must be tried before floats.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ParamValue {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
}

impl ParamValue {
    /// Human-readable type name used in validation error messages
    pub fn type_name(&self) -> &'static str {
        match self {
            ParamValue::Null => "null",
            ParamValue::Bool(_) => "bool",
            ParamValue::Int(_) => "int",
            ParamValue::Float(_) => "float",
            ParamValue::Str(_) => "str",
        }
    }

    /// Get as float (widens int to float)
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            ParamValue::Float(v) => Some(*v),
            ParamValue::Int(v) => Some(*v as f64),
            _ => None,
        }
    }

    /// Get as int
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            ParamValue::Int(v) => Some(*v),
            _ => None,
        }
    }

    /// Get as bool
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            ParamValue::Bool(v) => Some(*v),
            _ => None,
        }
    }

    /// Get as string slice
    pub fn as_str(&self) -> Option<&str> {
        match self {
            ParamValue::Str(s) => Some(s),
            _ => None,
        }
    }
}

impl fmt::Display for ParamValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParamValue::Null => write!(f, "null"),
            ParamValue::Bool(v) => write!(f, "{v}"),
            ParamValue::Int(v) => write!(f, "{v}"),
            ParamValue::Float(v) => write!(f, "{v}"),
            ParamValue::Str(s) => write!(f, "{s}"),
        }
    }
}

/// Canonical parameter map of an estimator
pub type ParamMap = BTreeMap<String, ParamValue>;

/// Hyperparameter grid: parameter name → ordered candidate values
///
/// Uniformly sequence-valued; the parser normalizes scalar cells into
/// single-element lists. Every list is non-empty.
pub type ParamGrid = BTreeMap<String, Vec<ParamValue>>;

/// Serializable snapshot of a fitted estimator
///
/// Persisted as the `{model_name}_best_model` artifact. The `state` value is
/// estimator-specific (coefficients for linear models, stored neighbors for
/// KNN).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelArtifact {
    /// Registry name of the estimator
    pub model_name: String,
    /// Hyperparameters the estimator was fitted with
    pub params: ParamMap,
    /// Fitted state
    pub state: serde_json::Value,
}

/// Common capability trait for all registered regression estimators
pub trait Estimator: std::fmt::Debug {
    /// Fit on training features and labels
    ///
    /// Shape mismatches and numerically unsolvable systems fail with a
    /// training error; failures propagate unhandled, never retried.
    fn fit(&mut self, x: &Array2<f64>, y: &Array1<f64>) -> Result<()>;

    /// Predict labels for a feature matrix; fails if the estimator has not
    /// been fitted
    fn predict(&self, x: &Array2<f64>) -> Result<Array1<f64>>;

    /// Canonical parameter-name → current-value map
    ///
    /// Used both for hyperparameter validation (key membership and type
    /// compatibility against the defaults) and for reporting `best_params`.
    fn params(&self) -> ParamMap;

    /// Set a single hyperparameter by name
    fn set_param(&mut self, name: &str, value: &ParamValue) -> Result<()>;

    /// Fresh unfitted copy carrying the same hyperparameters
    fn fresh(&self) -> Box<dyn Estimator>;

    /// Serializable snapshot of the fitted state
    fn artifact(&self) -> Result<ModelArtifact>;
}

/// Error for a parameter name the estimator does not accept
pub(crate) fn unknown_param(model: &str, name: &str) -> Error {
    Error::ModelInitialization(format!("unknown parameter '{name}' for model '{model}'"))
}

/// Error for an estimator used before fitting
pub(crate) fn not_fitted(model: &str) -> Error {
    Error::Training(format!("{model} estimator has not been fitted"))
}

/// Extract a float parameter value, widening ints
pub(crate) fn expect_f64(name: &str, value: &ParamValue) -> Result<f64> {
    value.as_f64().ok_or_else(|| {
        Error::ModelInitialization(format!(
            "parameter '{name}' expects a float value, received {}",
            value.type_name()
        ))
    })
}

/// Extract an integer parameter value
pub(crate) fn expect_i64(name: &str, value: &ParamValue) -> Result<i64> {
    value.as_i64().ok_or_else(|| {
        Error::ModelInitialization(format!(
            "parameter '{name}' expects an int value, received {}",
            value.type_name()
        ))
    })
}

/// Extract a bool parameter value
pub(crate) fn expect_bool(name: &str, value: &ParamValue) -> Result<bool> {
    value.as_bool().ok_or_else(|| {
        Error::ModelInitialization(format!(
            "parameter '{name}' expects a bool value, received {}",
            value.type_name()
        ))
    })
}

/// Extract a string parameter value
pub(crate) fn expect_str(name: &str, value: &ParamValue) -> Result<String> {
    value.as_str().map(str::to_string).ok_or_else(|| {
        Error::ModelInitialization(format!(
            "parameter '{name}' expects a str value, received {}",
            value.type_name()
        ))
    })
}
