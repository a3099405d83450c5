//! Estimator registry: model-name → constructor lookup
//!
//! An explicit registration table populated at construction from the closed
//! set of estimator adapters. Resolution is a pure, case-sensitive lookup
//! with no side effects.

use super::{Estimator, KNeighborsRegressor, Lasso, LinearRegression, Ridge};
use crate::error::{Error, Result};
use std::collections::BTreeMap;

type Constructor = fn() -> Box<dyn Estimator>;

/// A resolved registry entry
#[derive(Clone, Copy, Debug)]
pub struct EstimatorSpec {
    /// Canonical registry name
    pub name: &'static str,
    constructor: Constructor,
}

impl EstimatorSpec {
    /// Build a fresh estimator instance with default hyperparameters
    pub fn instantiate(&self) -> Box<dyn Estimator> {
        (self.constructor)()
    }
}

/// Registration table for all known regression estimators
pub struct EstimatorRegistry {
    entries: BTreeMap<&'static str, Constructor>,
}

impl Default for EstimatorRegistry {
    fn default() -> Self {
        Self::with_builtin()
    }
}

impl EstimatorRegistry {
    /// Registry populated with the built-in estimator adapters
    pub fn with_builtin() -> Self {
        let mut entries: BTreeMap<&'static str, Constructor> = BTreeMap::new();
        entries.insert("KNeighborsRegressor", || {
            Box::new(KNeighborsRegressor::new())
        });
        entries.insert("Lasso", || Box::new(Lasso::new()));
        entries.insert("LinearRegression", || Box::new(LinearRegression::new()));
        entries.insert("Ridge", || Box::new(Ridge::new()));
        Self { entries }
    }

    /// All registered names, sorted
    pub fn names(&self) -> Vec<&'static str> {
        self.entries.keys().copied().collect()
    }

    /// Resolve a model name to its registry entry
    ///
    /// Unknown names fail with a configuration error enumerating every
    /// registered name so the config can be fixed without reading source.
    pub fn resolve(&self, name: &str) -> Result<EstimatorSpec> {
        match self.entries.get_key_value(name) {
            Some((canonical, constructor)) => Ok(EstimatorSpec {
                name: canonical,
                constructor: *constructor,
            }),
            None => Err(Error::Config(format!(
                "Model '{name}' is not recognized. Available models are: {}",
                self.names().join(", ")
            ))),
        }
    }
}
