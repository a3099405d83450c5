//! K-nearest-neighbors regression adapter

use super::{
    expect_i64, expect_str, not_fitted, unknown_param, Estimator, ModelArtifact, ParamMap,
    ParamValue,
};
use crate::error::{Error, Result};
use ndarray::{Array1, Array2};
use serde_json::json;

/// Neighbor weighting scheme
const WEIGHTS_UNIFORM: &str = "uniform";
const WEIGHTS_DISTANCE: &str = "distance";

/// Regressor predicting the (weighted) mean label of the k nearest training
/// rows under Euclidean distance
#[derive(Debug, Clone)]
pub struct KNeighborsRegressor {
    n_neighbors: i64,
    weights: String,
    train_x: Option<Array2<f64>>,
    train_y: Option<Array1<f64>>,
}

impl Default for KNeighborsRegressor {
    fn default() -> Self {
        Self::new()
    }
}

impl KNeighborsRegressor {
    pub fn new() -> Self {
        Self {
            n_neighbors: 5,
            weights: WEIGHTS_UNIFORM.to_string(),
            train_x: None,
            train_y: None,
        }
    }

    /// Mean label over the k nearest stored rows for a single query row
    fn predict_row(
        &self,
        train_x: &Array2<f64>,
        train_y: &Array1<f64>,
        x: &Array2<f64>,
        row: usize,
        k: usize,
    ) -> f64 {
        let query = x.row(row);
        let mut distances: Vec<(f64, f64)> = train_x
            .rows()
            .into_iter()
            .zip(train_y.iter())
            .map(|(train_row, &label)| {
                let dist = query
                    .iter()
                    .zip(train_row.iter())
                    .map(|(a, b)| (a - b) * (a - b))
                    .sum::<f64>()
                    .sqrt();
                (dist, label)
            })
            .collect();
        distances.sort_by(|a, b| a.0.partial_cmp(&b.0).unwrap_or(std::cmp::Ordering::Equal));
        distances.truncate(k);

        if self.weights == WEIGHTS_DISTANCE {
            // An exact match dominates; fall back to its label directly
            if let Some(&(_, label)) = distances.iter().find(|(d, _)| *d == 0.0) {
                return label;
            }
            let weight_sum: f64 = distances.iter().map(|(d, _)| 1.0 / d).sum();
            distances.iter().map(|(d, y)| y / d).sum::<f64>() / weight_sum
        } else {
            distances.iter().map(|(_, y)| y).sum::<f64>() / k as f64
        }
    }
}

impl Estimator for KNeighborsRegressor {
    fn fit(&mut self, x: &Array2<f64>, y: &Array1<f64>) -> Result<()> {
        if x.nrows() != y.len() {
            return Err(Error::Training(format!(
                "KNeighborsRegressor: feature matrix has {} rows but label vector has {} entries",
                x.nrows(),
                y.len()
            )));
        }
        if self.n_neighbors < 1 {
            return Err(Error::Training(format!(
                "KNeighborsRegressor: n_neighbors must be at least 1, got {}",
                self.n_neighbors
            )));
        }
        if (x.nrows() as i64) < self.n_neighbors {
            return Err(Error::Training(format!(
                "KNeighborsRegressor: n_neighbors = {} exceeds the {} training samples",
                self.n_neighbors,
                x.nrows()
            )));
        }
        if self.weights != WEIGHTS_UNIFORM && self.weights != WEIGHTS_DISTANCE {
            return Err(Error::Training(format!(
                "KNeighborsRegressor: weights must be '{WEIGHTS_UNIFORM}' or \
                 '{WEIGHTS_DISTANCE}', got '{}'",
                self.weights
            )));
        }
        self.train_x = Some(x.clone());
        self.train_y = Some(y.clone());
        Ok(())
    }

    fn predict(&self, x: &Array2<f64>) -> Result<Array1<f64>> {
        let (Some(train_x), Some(train_y)) = (self.train_x.as_ref(), self.train_y.as_ref())
        else {
            return Err(not_fitted("KNeighborsRegressor"));
        };
        if x.ncols() != train_x.ncols() {
            return Err(Error::Training(format!(
                "KNeighborsRegressor: expected {} features, received {}",
                train_x.ncols(),
                x.ncols()
            )));
        }
        let k = self.n_neighbors as usize;
        let predictions: Vec<f64> = (0..x.nrows())
            .map(|i| self.predict_row(train_x, train_y, x, i, k))
            .collect();
        Ok(Array1::from_vec(predictions))
    }

    fn params(&self) -> ParamMap {
        ParamMap::from([
            ("n_neighbors".to_string(), ParamValue::Int(self.n_neighbors)),
            ("weights".to_string(), ParamValue::Str(self.weights.clone())),
        ])
    }

    fn set_param(&mut self, name: &str, value: &ParamValue) -> Result<()> {
        match name {
            "n_neighbors" => self.n_neighbors = expect_i64(name, value)?,
            "weights" => self.weights = expect_str(name, value)?,
            _ => return Err(unknown_param("KNeighborsRegressor", name)),
        }
        Ok(())
    }

    fn fresh(&self) -> Box<dyn Estimator> {
        Box::new(Self {
            n_neighbors: self.n_neighbors,
            weights: self.weights.clone(),
            train_x: None,
            train_y: None,
        })
    }

    fn artifact(&self) -> Result<ModelArtifact> {
        let train_x = self
            .train_x
            .as_ref()
            .ok_or_else(|| not_fitted("KNeighborsRegressor"))?;
        let train_y = self.train_y.as_ref().ok_or_else(|| not_fitted("KNeighborsRegressor"))?;
        let rows: Vec<Vec<f64>> = train_x.rows().into_iter().map(|r| r.to_vec()).collect();
        Ok(ModelArtifact {
            model_name: "KNeighborsRegressor".to_string(),
            params: self.params(),
            state: json!({
                "train_x": rows,
                "train_y": train_y.to_vec(),
            }),
        })
    }
}
