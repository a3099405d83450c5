//! Model evaluation against held-out test data

use super::metrics::Metric;
use crate::error::{Error, Result};
use crate::model::Estimator;
use ndarray::{Array1, Array2};
use std::collections::BTreeMap;

/// Metric name → computed score, one entry per requested metric
///
/// Map semantics dedupe duplicate requests by key.
pub type EvaluationResult = BTreeMap<String, f64>;

/// Compute every requested metric for a fitted model
///
/// Predictions are computed exactly once; each metric is then scored from
/// the same prediction vector. An unknown metric name fails the whole call
/// with an evaluation error.
pub fn evaluate_model(
    model: &dyn Estimator,
    x_test: &Array2<f64>,
    y_test: &Array1<f64>,
    evaluation_metrics: &[String],
) -> Result<EvaluationResult> {
    if x_test.nrows() != y_test.len() {
        return Err(Error::DataValidation(format!(
            "test features have {} rows but test labels have {} entries",
            x_test.nrows(),
            y_test.len()
        )));
    }

    let y_pred = model.predict(x_test)?;

    let mut metrics = EvaluationResult::new();
    for name in evaluation_metrics {
        let metric = Metric::parse(name)?;
        metrics.insert(metric.name().to_string(), metric.compute(y_test, &y_pred));
    }
    Ok(metrics)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Estimator, LinearRegression};
    use approx::assert_abs_diff_eq;
    use ndarray::array;

    fn fitted_linear() -> LinearRegression {
        let x = array![[1.0], [2.0], [3.0]];
        let y = array![2.0, 4.0, 6.0];
        let mut model = LinearRegression::new();
        model.fit(&x, &y).expect("fit");
        model
    }

    #[test]
    fn test_evaluate_computes_each_requested_metric() {
        let model = fitted_linear();
        let x_test = array![[4.0]];
        let y_test = array![8.0];
        let metrics = evaluate_model(
            &model,
            &x_test,
            &y_test,
            &["MAE".to_string(), "R2".to_string()],
        )
        .expect("evaluate");

        assert_eq!(metrics.len(), 2);
        assert_abs_diff_eq!(metrics["MAE"], 0.0, epsilon = 1e-9);
        // Single-point R2 is degenerate but must not raise
        assert!(metrics["R2"].is_finite());
    }

    #[test]
    fn test_evaluate_rejects_unknown_metric() {
        let model = fitted_linear();
        let err = evaluate_model(
            &model,
            &array![[4.0]],
            &array![8.0],
            &["Accuracy".to_string()],
        )
        .unwrap_err();
        assert!(matches!(err, Error::Evaluation(_)));
    }

    #[test]
    fn test_duplicate_metric_requests_dedupe() {
        let model = fitted_linear();
        let metrics = evaluate_model(
            &model,
            &array![[4.0], [5.0]],
            &array![8.0, 10.0],
            &["MAE".to_string(), "MAE".to_string(), "MSE".to_string()],
        )
        .expect("evaluate");
        assert_eq!(metrics.len(), 2);
    }

    #[test]
    fn test_evaluate_rejects_shape_mismatch() {
        let model = fitted_linear();
        let err = evaluate_model(
            &model,
            &array![[4.0], [5.0]],
            &array![8.0],
            &["MAE".to_string()],
        )
        .unwrap_err();
        assert!(matches!(err, Error::DataValidation(_)));
    }
}
