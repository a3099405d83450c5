//! Hyperparameter validation against an estimator's accepted parameter set
//!
//! Type compatibility is inferred from each adapter's declared default
//! values rather than an explicit schema; a `null` default widens acceptance
//! to null/int/float/string. Grid lists pass as candidate sequences without
//! per-element checks; incompatible candidates surface later through
//! `set_param`. Ambiguous scalar values are rejected rather than silently
//! accepted.

use crate::error::{Error, Result};
use crate::model::{EstimatorRegistry, ParamValue};
use std::collections::BTreeMap;

/// A hyperparameter cell as written in the config: one value or a grid list
#[derive(Debug, Clone, PartialEq)]
pub enum HyperparameterValue {
    Scalar(ParamValue),
    Grid(Vec<ParamValue>),
}

impl HyperparameterValue {
    /// Convert a raw YAML value into a hyperparameter cell
    pub fn from_yaml(param: &str, value: &serde_yaml::Value) -> Result<Self> {
        match value {
            serde_yaml::Value::Sequence(items) => {
                let candidates = items
                    .iter()
                    .map(|item| scalar_from_yaml(param, item))
                    .collect::<Result<Vec<_>>>()?;
                Ok(HyperparameterValue::Grid(candidates))
            }
            other => Ok(HyperparameterValue::Scalar(scalar_from_yaml(param, other)?)),
        }
    }

    /// Normalize into a uniformly sequence-valued grid cell
    pub fn into_candidates(self) -> Vec<ParamValue> {
        match self {
            HyperparameterValue::Scalar(v) => vec![v],
            HyperparameterValue::Grid(list) => list,
        }
    }
}

/// Convert one scalar YAML value; nested collections are rejected
fn scalar_from_yaml(param: &str, value: &serde_yaml::Value) -> Result<ParamValue> {
    match value {
        serde_yaml::Value::Null => Ok(ParamValue::Null),
        serde_yaml::Value::Bool(b) => Ok(ParamValue::Bool(*b)),
        serde_yaml::Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                Ok(ParamValue::Int(i))
            } else if let Some(f) = n.as_f64() {
                Ok(ParamValue::Float(f))
            } else {
                Err(Error::Config(format!(
                    "Hyperparameter '{param}' has a numeric value outside the supported range"
                )))
            }
        }
        serde_yaml::Value::String(s) => Ok(ParamValue::Str(s.clone())),
        _ => Err(Error::Config(format!(
            "Hyperparameter '{param}' has an unsupported value shape; expected a scalar or a \
             list of scalars"
        ))),
    }
}

/// Whether `value` is acceptable where `default` is the declared default
///
/// Ints are accepted where floats are expected (lossless widening). A null
/// default cannot pin down a type, so acceptance widens to
/// null/int/float/string.
fn type_allows(default: &ParamValue, value: &ParamValue) -> bool {
    match default {
        ParamValue::Null => matches!(
            value,
            ParamValue::Null | ParamValue::Int(_) | ParamValue::Float(_) | ParamValue::Str(_)
        ),
        ParamValue::Float(_) => matches!(value, ParamValue::Float(_) | ParamValue::Int(_)),
        _ => std::mem::discriminant(default) == std::mem::discriminant(value),
    }
}

/// Expected-type description for mismatch messages
fn expected_type_name(default: &ParamValue) -> &'static str {
    match default {
        ParamValue::Null => "null, int, float or str",
        other => other.type_name(),
    }
}

/// Validate proposed hyperparameters against the resolved estimator
///
/// Every key must be a recognized tunable parameter and every scalar value
/// must be type-compatible with that parameter's declared default. Never
/// mutates its input; fails fast on the first offending entry.
pub fn validate_hyperparameters(
    registry: &EstimatorRegistry,
    model_name: &str,
    hyperparameters: &BTreeMap<String, HyperparameterValue>,
) -> Result<()> {
    let spec = registry.resolve(model_name)?;
    // Throwaway default instance; its parameter map is the validation surface
    let allowed_params = spec.instantiate().params();

    for (param, value) in hyperparameters {
        let Some(default) = allowed_params.get(param) else {
            let allowed: Vec<&str> = allowed_params.keys().map(String::as_str).collect();
            return Err(Error::Config(format!(
                "Invalid hyperparameter '{param}' for model '{model_name}'. Allowed parameters: {}",
                allowed.join(", ")
            )));
        };

        match value {
            HyperparameterValue::Scalar(v) => {
                if !type_allows(default, v) {
                    return Err(Error::Config(format!(
                        "Hyperparameter '{param}' should be of type {} for model \
                         '{model_name}'. Received type: {}",
                        expected_type_name(default),
                        v.type_name()
                    )));
                }
            }
            HyperparameterValue::Grid(candidates) => {
                if candidates.is_empty() {
                    return Err(Error::Config(format!(
                        "Hyperparameter '{param}' for model '{model_name}' has an empty \
                         candidate list"
                    )));
                }
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registry() -> EstimatorRegistry {
        EstimatorRegistry::with_builtin()
    }

    fn scalar(v: ParamValue) -> HyperparameterValue {
        HyperparameterValue::Scalar(v)
    }

    #[test]
    fn test_accepts_known_param_with_matching_type() {
        let params = BTreeMap::from([("alpha".to_string(), scalar(ParamValue::Float(0.5)))]);
        assert!(validate_hyperparameters(&registry(), "Ridge", &params).is_ok());
    }

    #[test]
    fn test_accepts_int_where_float_expected() {
        let params = BTreeMap::from([("alpha".to_string(), scalar(ParamValue::Int(2)))]);
        assert!(validate_hyperparameters(&registry(), "Ridge", &params).is_ok());
    }

    #[test]
    fn test_rejects_unknown_param_naming_it() {
        let params = BTreeMap::from([("gamma".to_string(), scalar(ParamValue::Float(0.5)))]);
        let err = validate_hyperparameters(&registry(), "Ridge", &params).unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("Invalid hyperparameter 'gamma'"));
        assert!(msg.contains("alpha"));
        assert!(msg.contains("fit_intercept"));
    }

    #[test]
    fn test_rejects_type_mismatch_naming_types() {
        let params = BTreeMap::from([(
            "fit_intercept".to_string(),
            scalar(ParamValue::Str("yes".into())),
        )]);
        let err = validate_hyperparameters(&registry(), "Ridge", &params).unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("should be of type bool"));
        assert!(msg.contains("Received type: str"));
    }

    #[test]
    fn test_grid_list_passes_without_element_checks() {
        let params = BTreeMap::from([(
            "alpha".to_string(),
            HyperparameterValue::Grid(vec![ParamValue::Float(0.1), ParamValue::Str("x".into())]),
        )]);
        assert!(validate_hyperparameters(&registry(), "Ridge", &params).is_ok());
    }

    #[test]
    fn test_rejects_empty_grid_list() {
        let params =
            BTreeMap::from([("alpha".to_string(), HyperparameterValue::Grid(Vec::new()))]);
        let err = validate_hyperparameters(&registry(), "Ridge", &params).unwrap_err();
        assert!(err.to_string().contains("empty candidate list"));
    }

    #[test]
    fn test_unknown_model_fails_resolution() {
        let params = BTreeMap::new();
        let err = validate_hyperparameters(&registry(), "SVR", &params).unwrap_err();
        assert!(err.to_string().contains("'SVR' is not recognized"));
    }

    #[test]
    fn test_from_yaml_scalar_and_list() {
        let v: serde_yaml::Value = serde_yaml::from_str("0.5").expect("yaml");
        assert_eq!(
            HyperparameterValue::from_yaml("alpha", &v).expect("convert"),
            HyperparameterValue::Scalar(ParamValue::Float(0.5))
        );

        let v: serde_yaml::Value = serde_yaml::from_str("[1, 2]").expect("yaml");
        assert_eq!(
            HyperparameterValue::from_yaml("alpha", &v).expect("convert"),
            HyperparameterValue::Grid(vec![ParamValue::Int(1), ParamValue::Int(2)])
        );
    }

    #[test]
    fn test_from_yaml_rejects_nested_mapping() {
        let v: serde_yaml::Value = serde_yaml::from_str("{inner: 1}").expect("yaml");
        assert!(HyperparameterValue::from_yaml("alpha", &v).is_err());
    }

    #[test]
    fn test_into_candidates_normalizes_scalars() {
        let cell = HyperparameterValue::Scalar(ParamValue::Int(3));
        assert_eq!(cell.into_candidates(), vec![ParamValue::Int(3)]);

        let grid = HyperparameterValue::Grid(vec![ParamValue::Int(1), ParamValue::Int(2)]);
        assert_eq!(
            grid.into_candidates(),
            vec![ParamValue::Int(1), ParamValue::Int(2)]
        );
    }
}
