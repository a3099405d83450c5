//! Training orchestration: single fit or cross-validated grid search
//!
//! The search criterion is fixed to negative mean squared error regardless
//! of which metrics were requested for reporting. This decoupling is
//! deliberate: the optimization target stays stable while reporting remains
//! configurable.

use super::grid::combinations;
use super::kfold::KFold;
use crate::error::{Error, Result};
use crate::eval::Metric;
use crate::model::{Estimator, ParamGrid, ParamMap};
use ndarray::{Array1, Array2, Axis};
use serde::{Deserialize, Serialize};

/// One scored fold of one parameter combination
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CvRecord {
    /// Index of the parameter combination in grid-enumeration order
    pub combination: usize,
    /// The swept parameter values of this combination
    pub params: ParamMap,
    /// Fold index within the combination
    pub fold: usize,
    /// Negative mean squared error on this fold's validation slice
    pub test_score: f64,
    /// Mean test score across all folds of this combination
    pub mean_test_score: f64,
    /// Standard deviation of the test score across this combination's folds
    pub std_test_score: f64,
}

/// Full search trace: one row per (combination × fold)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CvResults {
    pub records: Vec<CvRecord>,
}

impl CvResults {
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Best mean test score in the trace
    pub fn best_mean_score(&self) -> Option<f64> {
        self.records
            .iter()
            .map(|r| r.mean_test_score)
            .fold(None, |best, score| match best {
                Some(b) if b >= score => Some(b),
                _ => Some(score),
            })
    }
}

/// Outcome of [`train_model`]
#[derive(Debug)]
pub struct TrainingResult {
    /// The fitted estimator, refit on the full training set after a search
    pub best_model: Box<dyn Estimator>,
    /// Winning combination after a search, or the model's current parameters
    /// for a direct fit
    pub best_params: ParamMap,
    /// Search trace; `None` when no search ran (cv ≤ 1)
    pub cv_results: Option<CvResults>,
}

/// Train an estimator, searching the hyperparameter grid when cv > 1
///
/// With `cv <= 1` the supplied model is fitted directly and the grid is not
/// swept; `best_params` is then simply the model's current parameter map.
/// This asymmetry is intentional. Any fit failure propagates unhandled.
pub fn train_model(
    model_name: &str,
    mut model: Box<dyn Estimator>,
    x_train: &Array2<f64>,
    y_train: &Array1<f64>,
    param_grid: &ParamGrid,
    cv: usize,
    evaluation_metrics: &[String],
) -> Result<TrainingResult> {
    let known = evaluation_metrics
        .iter()
        .filter(|name| Metric::parse(name).is_ok())
        .count();
    if known == 0 {
        return Err(Error::Training(
            "No valid scoring metrics found in the evaluation metrics list.".to_string(),
        ));
    }

    if cv > 1 {
        grid_search(model_name, model.as_ref(), x_train, y_train, param_grid, cv)
    } else {
        model.fit(x_train, y_train)?;
        let best_params = model.params();
        Ok(TrainingResult {
            best_model: model,
            best_params,
            cv_results: None,
        })
    }
}

/// Fresh estimator configured with one grid combination
fn configured(prototype: &dyn Estimator, combo: &ParamMap) -> Result<Box<dyn Estimator>> {
    let mut model = prototype.fresh();
    for (name, value) in combo {
        model.set_param(name, value)?;
    }
    Ok(model)
}

/// Exhaustive cross-validated search over every grid combination
///
/// Ties on the mean score keep the first combination encountered, which is
/// deterministic given the fixed grid-enumeration order and fold
/// assignment.
fn grid_search(
    model_name: &str,
    prototype: &dyn Estimator,
    x_train: &Array2<f64>,
    y_train: &Array1<f64>,
    param_grid: &ParamGrid,
    cv: usize,
) -> Result<TrainingResult> {
    let combos = combinations(param_grid);
    let folds = KFold::new(cv).split(x_train.nrows())?;

    let mut records = Vec::with_capacity(combos.len() * folds.len());
    let mut best: Option<(usize, f64)> = None;

    for (combo_idx, combo) in combos.iter().enumerate() {
        let mut fold_scores = Vec::with_capacity(folds.len());
        for (train_idx, val_idx) in &folds {
            let mut candidate = configured(prototype, combo)?;
            let x_fit = x_train.select(Axis(0), train_idx);
            let y_fit = y_train.select(Axis(0), train_idx);
            let x_val = x_train.select(Axis(0), val_idx);
            let y_val = y_train.select(Axis(0), val_idx);

            candidate.fit(&x_fit, &y_fit)?;
            let y_pred = candidate.predict(&x_val)?;
            fold_scores.push(-Metric::Mse.compute(&y_val, &y_pred));
        }

        let n = fold_scores.len() as f64;
        let mean = fold_scores.iter().sum::<f64>() / n;
        let std = (fold_scores.iter().map(|s| (s - mean) * (s - mean)).sum::<f64>() / n).sqrt();
        for (fold, &score) in fold_scores.iter().enumerate() {
            records.push(CvRecord {
                combination: combo_idx,
                params: combo.clone(),
                fold,
                test_score: score,
                mean_test_score: mean,
                std_test_score: std,
            });
        }

        // Strict improvement only: equal scores keep the earlier combination
        if best.map_or(true, |(_, best_mean)| mean > best_mean) {
            best = Some((combo_idx, mean));
        }
    }

    let (best_idx, _) = best.ok_or_else(|| {
        Error::Training(format!("grid search for '{model_name}' produced no candidates"))
    })?;
    let best_combo = combos[best_idx].clone();

    // Refit the winner on the full training set
    let mut best_model = configured(prototype, &best_combo)?;
    best_model.fit(x_train, y_train)?;

    Ok(TrainingResult {
        best_model,
        best_params: best_combo,
        cv_results: Some(CvResults { records }),
    })
}
