//! Regression metrics as a closed enum
//!
//! Each variant carries its own pure scoring function, so dispatch is
//! exhaustive by construction; unknown metric names can only fail at the
//! parse boundary.

use crate::error::{Error, Result};
use ndarray::Array1;
use std::fmt;

/// The five supported evaluation metrics
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Metric {
    Mae,
    Mse,
    Rmse,
    R2,
    ExplainedVariance,
}

/// All metrics, in canonical order
pub const ALL_METRICS: [Metric; 5] = [
    Metric::Mae,
    Metric::Mse,
    Metric::Rmse,
    Metric::R2,
    Metric::ExplainedVariance,
];

impl Metric {
    /// Resolve a configured metric name
    ///
    /// Names are exact and case-sensitive; anything outside the fixed five
    /// fails with an evaluation error listing the supported names.
    pub fn parse(name: &str) -> Result<Self> {
        match name {
            "MAE" => Ok(Metric::Mae),
            "MSE" => Ok(Metric::Mse),
            "RMSE" => Ok(Metric::Rmse),
            "R2" => Ok(Metric::R2),
            "Explained Variance" => Ok(Metric::ExplainedVariance),
            _ => Err(Error::Evaluation(format!(
                "Unsupported evaluation metric '{name}' specified. Supported metrics: {}",
                supported_names().join(", ")
            ))),
        }
    }

    /// Canonical metric name as written in configs
    pub fn name(&self) -> &'static str {
        match self {
            Metric::Mae => "MAE",
            Metric::Mse => "MSE",
            Metric::Rmse => "RMSE",
            Metric::R2 => "R2",
            Metric::ExplainedVariance => "Explained Variance",
        }
    }

    /// Whether higher values are better for this metric
    pub fn higher_is_better(&self) -> bool {
        !matches!(self, Metric::Mae | Metric::Mse | Metric::Rmse)
    }

    /// Score predictions against true labels
    ///
    /// Degenerate inputs stay finite: with zero target variance, R² and
    /// explained variance are 1.0 for an exact prediction and 0.0
    /// otherwise; empty inputs score 0.0.
    pub fn compute(&self, y_true: &Array1<f64>, y_pred: &Array1<f64>) -> f64 {
        if y_true.is_empty() {
            return 0.0;
        }
        match self {
            Metric::Mae => mean_absolute_error(y_true, y_pred),
            Metric::Mse => mean_squared_error(y_true, y_pred),
            Metric::Rmse => mean_squared_error(y_true, y_pred).sqrt(),
            Metric::R2 => r_squared(y_true, y_pred),
            Metric::ExplainedVariance => explained_variance(y_true, y_pred),
        }
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Canonical names of the supported metrics
pub fn supported_names() -> Vec<&'static str> {
    ALL_METRICS.iter().map(Metric::name).collect()
}

fn mean_absolute_error(y_true: &Array1<f64>, y_pred: &Array1<f64>) -> f64 {
    let n = y_true.len() as f64;
    y_true
        .iter()
        .zip(y_pred.iter())
        .map(|(t, p)| (t - p).abs())
        .sum::<f64>()
        / n
}

fn mean_squared_error(y_true: &Array1<f64>, y_pred: &Array1<f64>) -> f64 {
    let n = y_true.len() as f64;
    y_true
        .iter()
        .zip(y_pred.iter())
        .map(|(t, p)| (t - p) * (t - p))
        .sum::<f64>()
        / n
}

/// R² = 1 - SS_res / SS_tot
fn r_squared(y_true: &Array1<f64>, y_pred: &Array1<f64>) -> f64 {
    let mean = y_true.mean().unwrap_or(0.0);
    let ss_tot: f64 = y_true.iter().map(|t| (t - mean) * (t - mean)).sum();
    let ss_res: f64 = y_true
        .iter()
        .zip(y_pred.iter())
        .map(|(t, p)| (t - p) * (t - p))
        .sum();
    if ss_tot == 0.0 {
        return if ss_res == 0.0 { 1.0 } else { 0.0 };
    }
    1.0 - ss_res / ss_tot
}

/// Explained variance = 1 - Var(y - ŷ) / Var(y)
fn explained_variance(y_true: &Array1<f64>, y_pred: &Array1<f64>) -> f64 {
    let n = y_true.len() as f64;
    let residuals: Vec<f64> = y_true
        .iter()
        .zip(y_pred.iter())
        .map(|(t, p)| t - p)
        .collect();
    let res_mean = residuals.iter().sum::<f64>() / n;
    let var_res = residuals
        .iter()
        .map(|r| (r - res_mean) * (r - res_mean))
        .sum::<f64>()
        / n;

    let y_mean = y_true.mean().unwrap_or(0.0);
    let var_y = y_true
        .iter()
        .map(|t| (t - y_mean) * (t - y_mean))
        .sum::<f64>()
        / n;

    if var_y == 0.0 {
        return if var_res == 0.0 { 1.0 } else { 0.0 };
    }
    1.0 - var_res / var_y
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use ndarray::array;

    #[test]
    fn test_parse_all_supported_names() {
        for metric in ALL_METRICS {
            assert_eq!(Metric::parse(metric.name()).expect("parse"), metric);
        }
    }

    #[test]
    fn test_parse_rejects_unknown_metric() {
        let err = Metric::parse("Accuracy").unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("Unsupported evaluation metric 'Accuracy'"));
        assert!(msg.contains("Explained Variance"));
    }

    #[test]
    fn test_parse_is_case_sensitive() {
        assert!(Metric::parse("mae").is_err());
    }

    #[test]
    fn test_mae() {
        let y_true = array![1.0, 2.0, 3.0];
        let y_pred = array![1.5, 2.5, 3.5];
        assert_abs_diff_eq!(Metric::Mae.compute(&y_true, &y_pred), 0.5, epsilon = 1e-12);
    }

    #[test]
    fn test_mse_and_rmse() {
        let y_true = array![0.0, 0.0];
        let y_pred = array![3.0, 4.0];
        assert_abs_diff_eq!(Metric::Mse.compute(&y_true, &y_pred), 12.5, epsilon = 1e-12);
        assert_abs_diff_eq!(
            Metric::Rmse.compute(&y_true, &y_pred),
            12.5f64.sqrt(),
            epsilon = 1e-12
        );
    }

    #[test]
    fn test_r2_perfect_prediction() {
        let y = array![1.0, 2.0, 3.0];
        assert_abs_diff_eq!(Metric::R2.compute(&y, &y), 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_r2_mean_prediction_is_zero() {
        let y_true = array![1.0, 2.0, 3.0];
        let y_pred = array![2.0, 2.0, 2.0];
        assert_abs_diff_eq!(Metric::R2.compute(&y_true, &y_pred), 0.0, epsilon = 1e-12);
    }

    #[test]
    fn test_r2_single_point_does_not_panic() {
        let y_true = array![8.0];
        let y_pred = array![8.0];
        assert_abs_diff_eq!(Metric::R2.compute(&y_true, &y_pred), 1.0, epsilon = 1e-12);

        let y_off = array![7.0];
        assert_abs_diff_eq!(Metric::R2.compute(&y_true, &y_off), 0.0, epsilon = 1e-12);
    }

    #[test]
    fn test_explained_variance_ignores_constant_offset() {
        let y_true = array![1.0, 2.0, 3.0, 4.0];
        let y_pred = array![2.0, 3.0, 4.0, 5.0];
        // Residuals are constant, so their variance is zero
        assert_abs_diff_eq!(
            Metric::ExplainedVariance.compute(&y_true, &y_pred),
            1.0,
            epsilon = 1e-12
        );
        // While R2 penalizes the offset
        assert!(Metric::R2.compute(&y_true, &y_pred) < 1.0);
    }

    #[test]
    fn test_higher_is_better() {
        assert!(!Metric::Mae.higher_is_better());
        assert!(!Metric::Mse.higher_is_better());
        assert!(!Metric::Rmse.higher_is_better());
        assert!(Metric::R2.higher_is_better());
        assert!(Metric::ExplainedVariance.higher_is_better());
    }
}
