//! Linear estimator adapters: ordinary least squares, Ridge, Lasso

use super::{
    expect_bool, expect_f64, expect_i64, not_fitted, unknown_param, Estimator, ModelArtifact,
    ParamMap, ParamValue,
};
use crate::error::{Error, Result};
use ndarray::{Array1, Array2, Axis};
use serde_json::json;

/// Matrix inversion for small systems using Gauss-Jordan elimination
///
/// Returns `None` for non-square or numerically singular input.
fn matrix_inverse(m: &Array2<f64>) -> Option<Array2<f64>> {
    let n = m.nrows();
    if n != m.ncols() {
        return None;
    }

    // Augmented matrix [M | I]
    let mut aug = Array2::zeros((n, 2 * n));
    for i in 0..n {
        for j in 0..n {
            aug[[i, j]] = m[[i, j]];
        }
        aug[[i, n + i]] = 1.0;
    }

    for col in 0..n {
        // Partial pivoting
        let mut max_row = col;
        for row in col + 1..n {
            if aug[[row, col]].abs() > aug[[max_row, col]].abs() {
                max_row = row;
            }
        }
        if max_row != col {
            for j in 0..2 * n {
                let tmp = aug[[col, j]];
                aug[[col, j]] = aug[[max_row, j]];
                aug[[max_row, j]] = tmp;
            }
        }

        if aug[[col, col]].abs() < 1e-12 {
            return None;
        }

        let pivot = aug[[col, col]];
        for j in 0..2 * n {
            aug[[col, j]] /= pivot;
        }
        for row in 0..n {
            if row != col {
                let factor = aug[[row, col]];
                for j in 0..2 * n {
                    aug[[row, j]] -= factor * aug[[col, j]];
                }
            }
        }
    }

    let mut inv = Array2::zeros((n, n));
    for i in 0..n {
        for j in 0..n {
            inv[[i, j]] = aug[[i, n + j]];
        }
    }
    Some(inv)
}

/// Check that feature and label row counts agree
fn check_fit_shapes(model: &str, x: &Array2<f64>, y: &Array1<f64>) -> Result<()> {
    if x.nrows() != y.len() {
        return Err(Error::Training(format!(
            "{model}: feature matrix has {} rows but label vector has {} entries",
            x.nrows(),
            y.len()
        )));
    }
    if x.nrows() == 0 {
        return Err(Error::Training(format!("{model}: empty training set")));
    }
    Ok(())
}

/// Center features and labels for intercept fitting
///
/// Returns (x_centered, y_centered, x_mean, y_mean); means are zero vectors
/// when `fit_intercept` is false so the intercept collapses to 0.
fn center(
    x: &Array2<f64>,
    y: &Array1<f64>,
    fit_intercept: bool,
) -> (Array2<f64>, Array1<f64>, Array1<f64>, f64) {
    if fit_intercept {
        let x_mean = x
            .mean_axis(Axis(0))
            .unwrap_or_else(|| Array1::zeros(x.ncols()));
        let y_mean = y.mean().unwrap_or(0.0);
        let x_centered = x - &x_mean.clone().insert_axis(Axis(0));
        let y_centered = y - y_mean;
        (x_centered, y_centered, x_mean, y_mean)
    } else {
        (x.clone(), y.clone(), Array1::zeros(x.ncols()), 0.0)
    }
}

/// Solve (X^T X + alpha*I) w = X^T y via Gauss-Jordan inversion
fn solve_normal_equations(
    model: &str,
    x: &Array2<f64>,
    y: &Array1<f64>,
    alpha: f64,
) -> Result<Array1<f64>> {
    let mut xtx = x.t().dot(x);
    if alpha > 0.0 {
        for i in 0..xtx.nrows() {
            xtx[[i, i]] += alpha;
        }
    }
    let xty = x.t().dot(y);
    match matrix_inverse(&xtx) {
        Some(inv) => Ok(inv.dot(&xty)),
        None => Err(Error::Training(format!(
            "{model}: normal equations are singular; the feature matrix may contain \
             linearly dependent columns"
        ))),
    }
}

/// Shared linear prediction: X w + b
fn predict_linear(
    model: &str,
    coefficients: Option<&Array1<f64>>,
    intercept: f64,
    x: &Array2<f64>,
) -> Result<Array1<f64>> {
    let coefs = coefficients.ok_or_else(|| not_fitted(model))?;
    if x.ncols() != coefs.len() {
        return Err(Error::Training(format!(
            "{model}: expected {} features, received {}",
            coefs.len(),
            x.ncols()
        )));
    }
    Ok(x.dot(coefs) + intercept)
}

/// Fitted-state snapshot shared by the linear family
fn linear_artifact(
    model: &str,
    params: ParamMap,
    coefficients: Option<&Array1<f64>>,
    intercept: f64,
) -> Result<ModelArtifact> {
    let coefs = coefficients.ok_or_else(|| not_fitted(model))?;
    Ok(ModelArtifact {
        model_name: model.to_string(),
        params,
        state: json!({
            "coefficients": coefs.to_vec(),
            "intercept": intercept,
        }),
    })
}

/// Ordinary least squares regression
///
/// Solves the centered normal equations; the intercept is recovered from the
/// training means.
#[derive(Debug, Clone)]
pub struct LinearRegression {
    fit_intercept: bool,
    coefficients: Option<Array1<f64>>,
    intercept: f64,
}

impl Default for LinearRegression {
    fn default() -> Self {
        Self::new()
    }
}

impl LinearRegression {
    pub fn new() -> Self {
        Self {
            fit_intercept: true,
            coefficients: None,
            intercept: 0.0,
        }
    }
}

impl Estimator for LinearRegression {
    fn fit(&mut self, x: &Array2<f64>, y: &Array1<f64>) -> Result<()> {
        check_fit_shapes("LinearRegression", x, y)?;
        let (x_c, y_c, x_mean, y_mean) = center(x, y, self.fit_intercept);
        let coefs = solve_normal_equations("LinearRegression", &x_c, &y_c, 0.0)?;
        self.intercept = y_mean - x_mean.dot(&coefs);
        self.coefficients = Some(coefs);
        Ok(())
    }

    fn predict(&self, x: &Array2<f64>) -> Result<Array1<f64>> {
        predict_linear(
            "LinearRegression",
            self.coefficients.as_ref(),
            self.intercept,
            x,
        )
    }

    fn params(&self) -> ParamMap {
        ParamMap::from([(
            "fit_intercept".to_string(),
            ParamValue::Bool(self.fit_intercept),
        )])
    }

    fn set_param(&mut self, name: &str, value: &ParamValue) -> Result<()> {
        match name {
            "fit_intercept" => self.fit_intercept = expect_bool(name, value)?,
            _ => return Err(unknown_param("LinearRegression", name)),
        }
        Ok(())
    }

    fn fresh(&self) -> Box<dyn Estimator> {
        Box::new(Self {
            fit_intercept: self.fit_intercept,
            coefficients: None,
            intercept: 0.0,
        })
    }

    fn artifact(&self) -> Result<ModelArtifact> {
        linear_artifact(
            "LinearRegression",
            self.params(),
            self.coefficients.as_ref(),
            self.intercept,
        )
    }
}

/// L2-regularized linear regression
#[derive(Debug, Clone)]
pub struct Ridge {
    alpha: f64,
    fit_intercept: bool,
    coefficients: Option<Array1<f64>>,
    intercept: f64,
}

impl Default for Ridge {
    fn default() -> Self {
        Self::new()
    }
}

impl Ridge {
    pub fn new() -> Self {
        Self {
            alpha: 1.0,
            fit_intercept: true,
            coefficients: None,
            intercept: 0.0,
        }
    }
}

impl Estimator for Ridge {
    fn fit(&mut self, x: &Array2<f64>, y: &Array1<f64>) -> Result<()> {
        check_fit_shapes("Ridge", x, y)?;
        if self.alpha < 0.0 {
            return Err(Error::Training(format!(
                "Ridge: alpha must be non-negative, got {}",
                self.alpha
            )));
        }
        let (x_c, y_c, x_mean, y_mean) = center(x, y, self.fit_intercept);
        let coefs = solve_normal_equations("Ridge", &x_c, &y_c, self.alpha)?;
        self.intercept = y_mean - x_mean.dot(&coefs);
        self.coefficients = Some(coefs);
        Ok(())
    }

    fn predict(&self, x: &Array2<f64>) -> Result<Array1<f64>> {
        predict_linear("Ridge", self.coefficients.as_ref(), self.intercept, x)
    }

    fn params(&self) -> ParamMap {
        ParamMap::from([
            ("alpha".to_string(), ParamValue::Float(self.alpha)),
            (
                "fit_intercept".to_string(),
                ParamValue::Bool(self.fit_intercept),
            ),
        ])
    }

    fn set_param(&mut self, name: &str, value: &ParamValue) -> Result<()> {
        match name {
            "alpha" => self.alpha = expect_f64(name, value)?,
            "fit_intercept" => self.fit_intercept = expect_bool(name, value)?,
            _ => return Err(unknown_param("Ridge", name)),
        }
        Ok(())
    }

    fn fresh(&self) -> Box<dyn Estimator> {
        Box::new(Self {
            alpha: self.alpha,
            fit_intercept: self.fit_intercept,
            coefficients: None,
            intercept: 0.0,
        })
    }

    fn artifact(&self) -> Result<ModelArtifact> {
        linear_artifact(
            "Ridge",
            self.params(),
            self.coefficients.as_ref(),
            self.intercept,
        )
    }
}

/// Soft-thresholding operator used by coordinate descent
fn soft_threshold(value: f64, threshold: f64) -> f64 {
    if value > threshold {
        value - threshold
    } else if value < -threshold {
        value + threshold
    } else {
        0.0
    }
}

/// L1-regularized linear regression fitted by coordinate descent
///
/// Minimizes (1/2n)||y - Xw||² + alpha*||w||₁ on centered data. Iterates
/// until the largest coefficient update falls below `tol` or `max_iter`
/// sweeps have run.
#[derive(Debug, Clone)]
pub struct Lasso {
    alpha: f64,
    fit_intercept: bool,
    max_iter: i64,
    tol: f64,
    coefficients: Option<Array1<f64>>,
    intercept: f64,
}

impl Default for Lasso {
    fn default() -> Self {
        Self::new()
    }
}

impl Lasso {
    pub fn new() -> Self {
        Self {
            alpha: 1.0,
            fit_intercept: true,
            max_iter: 1000,
            tol: 1e-4,
            coefficients: None,
            intercept: 0.0,
        }
    }
}

impl Estimator for Lasso {
    fn fit(&mut self, x: &Array2<f64>, y: &Array1<f64>) -> Result<()> {
        check_fit_shapes("Lasso", x, y)?;
        if self.alpha < 0.0 {
            return Err(Error::Training(format!(
                "Lasso: alpha must be non-negative, got {}",
                self.alpha
            )));
        }
        if self.max_iter < 1 {
            return Err(Error::Training(format!(
                "Lasso: max_iter must be at least 1, got {}",
                self.max_iter
            )));
        }

        let (x_c, y_c, x_mean, y_mean) = center(x, y, self.fit_intercept);
        let n_samples = x_c.nrows();
        let n_features = x_c.ncols();

        // Column squared norms; zero-norm columns keep a zero coefficient
        let col_norms: Vec<f64> = (0..n_features)
            .map(|j| x_c.column(j).mapv(|v| v * v).sum())
            .collect();

        let threshold = self.alpha * n_samples as f64;
        let mut w = Array1::<f64>::zeros(n_features);
        let mut residual = y_c.clone();

        for _ in 0..self.max_iter {
            let mut max_delta = 0.0f64;
            for j in 0..n_features {
                if col_norms[j] == 0.0 {
                    continue;
                }
                // Correlation with the partial residual (residual with the
                // j-th contribution added back)
                let rho = x_c.column(j).dot(&residual) + w[j] * col_norms[j];
                let w_new = soft_threshold(rho, threshold) / col_norms[j];
                let delta = w_new - w[j];
                if delta != 0.0 {
                    for i in 0..n_samples {
                        residual[i] -= x_c[[i, j]] * delta;
                    }
                    w[j] = w_new;
                }
                max_delta = max_delta.max(delta.abs());
            }
            if max_delta < self.tol {
                break;
            }
        }

        if w.iter().any(|v| !v.is_finite()) {
            return Err(Error::Training(
                "Lasso: coordinate descent diverged to non-finite coefficients".to_string(),
            ));
        }

        self.intercept = y_mean - x_mean.dot(&w);
        self.coefficients = Some(w);
        Ok(())
    }

    fn predict(&self, x: &Array2<f64>) -> Result<Array1<f64>> {
        predict_linear("Lasso", self.coefficients.as_ref(), self.intercept, x)
    }

    fn params(&self) -> ParamMap {
        ParamMap::from([
            ("alpha".to_string(), ParamValue::Float(self.alpha)),
            (
                "fit_intercept".to_string(),
                ParamValue::Bool(self.fit_intercept),
            ),
            ("max_iter".to_string(), ParamValue::Int(self.max_iter)),
            ("tol".to_string(), ParamValue::Float(self.tol)),
        ])
    }

    fn set_param(&mut self, name: &str, value: &ParamValue) -> Result<()> {
        match name {
            "alpha" => self.alpha = expect_f64(name, value)?,
            "fit_intercept" => self.fit_intercept = expect_bool(name, value)?,
            "max_iter" => self.max_iter = expect_i64(name, value)?,
            "tol" => self.tol = expect_f64(name, value)?,
            _ => return Err(unknown_param("Lasso", name)),
        }
        Ok(())
    }

    fn fresh(&self) -> Box<dyn Estimator> {
        Box::new(Self {
            alpha: self.alpha,
            fit_intercept: self.fit_intercept,
            max_iter: self.max_iter,
            tol: self.tol,
            coefficients: None,
            intercept: 0.0,
        })
    }

    fn artifact(&self) -> Result<ModelArtifact> {
        linear_artifact(
            "Lasso",
            self.params(),
            self.coefficients.as_ref(),
            self.intercept,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use ndarray::array;

    #[test]
    fn test_linear_regression_exact_fit() {
        let x = array![[1.0], [2.0], [3.0]];
        let y = array![2.0, 4.0, 6.0];
        let mut model = LinearRegression::new();
        model.fit(&x, &y).expect("fit");

        let pred = model.predict(&array![[4.0]]).expect("predict");
        assert_abs_diff_eq!(pred[0], 8.0, epsilon = 1e-9);
    }

    #[test]
    fn test_linear_regression_recovers_intercept() {
        let x = array![[0.0], [1.0], [2.0], [3.0]];
        let y = array![1.0, 3.0, 5.0, 7.0]; // y = 2x + 1
        let mut model = LinearRegression::new();
        model.fit(&x, &y).expect("fit");

        let pred = model.predict(&array![[10.0]]).expect("predict");
        assert_abs_diff_eq!(pred[0], 21.0, epsilon = 1e-9);
    }

    #[test]
    fn test_linear_regression_shape_mismatch() {
        let x = array![[1.0], [2.0]];
        let y = array![1.0, 2.0, 3.0];
        let mut model = LinearRegression::new();
        assert!(model.fit(&x, &y).is_err());
    }

    #[test]
    fn test_predict_before_fit_fails() {
        let model = LinearRegression::new();
        let err = model.predict(&array![[1.0]]).unwrap_err();
        assert!(err.to_string().contains("not been fitted"));
    }

    #[test]
    fn test_ridge_zero_alpha_matches_ols() {
        let x = array![[1.0, 2.0], [2.0, 1.0], [3.0, 3.0], [4.0, 1.0]];
        let y = array![5.0, 4.0, 9.0, 6.0];

        let mut ols = LinearRegression::new();
        ols.fit(&x, &y).expect("fit");
        let mut ridge = Ridge::new();
        ridge.set_param("alpha", &ParamValue::Float(0.0)).expect("set");
        ridge.fit(&x, &y).expect("fit");

        let probe = array![[2.0, 2.0]];
        let p_ols = ols.predict(&probe).expect("predict");
        let p_ridge = ridge.predict(&probe).expect("predict");
        assert_abs_diff_eq!(p_ols[0], p_ridge[0], epsilon = 1e-8);
    }

    #[test]
    fn test_ridge_shrinks_coefficients() {
        let x = array![[1.0], [2.0], [3.0], [4.0]];
        let y = array![2.0, 4.0, 6.0, 8.0];

        let mut strong = Ridge::new();
        strong.set_param("alpha", &ParamValue::Float(100.0)).expect("set");
        strong.fit(&x, &y).expect("fit");
        let artifact = strong.artifact().expect("artifact");
        let coefs = artifact.state["coefficients"].as_array().expect("array");
        assert!(coefs[0].as_f64().expect("f64") < 2.0);
    }

    #[test]
    fn test_lasso_near_exact_with_tiny_alpha() {
        let x = array![[1.0], [2.0], [3.0], [4.0]];
        let y = array![2.0, 4.0, 6.0, 8.0];
        let mut model = Lasso::new();
        model.set_param("alpha", &ParamValue::Float(1e-6)).expect("set");
        model.fit(&x, &y).expect("fit");

        let pred = model.predict(&array![[5.0]]).expect("predict");
        assert_abs_diff_eq!(pred[0], 10.0, epsilon = 1e-3);
    }

    #[test]
    fn test_lasso_large_alpha_zeroes_coefficients() {
        let x = array![[1.0], [2.0], [3.0], [4.0]];
        let y = array![2.0, 4.0, 6.0, 8.0];
        let mut model = Lasso::new();
        model.set_param("alpha", &ParamValue::Float(1e6)).expect("set");
        model.fit(&x, &y).expect("fit");

        let artifact = model.artifact().expect("artifact");
        let coefs = artifact.state["coefficients"].as_array().expect("array");
        assert_abs_diff_eq!(coefs[0].as_f64().expect("f64"), 0.0, epsilon = 1e-12);
    }

    #[test]
    fn test_set_param_rejects_unknown_name() {
        let mut model = Ridge::new();
        let err = model
            .set_param("learning_rate", &ParamValue::Float(0.1))
            .unwrap_err();
        assert!(err.to_string().contains("learning_rate"));
    }

    #[test]
    fn test_set_param_rejects_wrong_type() {
        let mut model = Ridge::new();
        let err = model
            .set_param("alpha", &ParamValue::Str("big".into()))
            .unwrap_err();
        assert!(err.to_string().contains("expects a float"));
    }

    #[test]
    fn test_set_param_widens_int_to_float() {
        let mut model = Ridge::new();
        model.set_param("alpha", &ParamValue::Int(2)).expect("set");
        assert_eq!(
            model.params().get("alpha"),
            Some(&ParamValue::Float(2.0))
        );
    }

    #[test]
    fn test_fresh_clone_keeps_params_drops_fit() {
        let x = array![[1.0], [2.0], [3.0]];
        let y = array![2.0, 4.0, 6.0];
        let mut model = Ridge::new();
        model.set_param("alpha", &ParamValue::Float(0.5)).expect("set");
        model.fit(&x, &y).expect("fit");

        let copy = model.fresh();
        assert_eq!(copy.params().get("alpha"), Some(&ParamValue::Float(0.5)));
        assert!(copy.predict(&x).is_err());
    }

    #[test]
    fn test_matrix_inverse_identity() {
        let m = array![[2.0, 0.0], [0.0, 4.0]];
        let inv = matrix_inverse(&m).expect("invertible");
        assert_abs_diff_eq!(inv[[0, 0]], 0.5, epsilon = 1e-12);
        assert_abs_diff_eq!(inv[[1, 1]], 0.25, epsilon = 1e-12);
    }

    #[test]
    fn test_matrix_inverse_singular_returns_none() {
        let m = array![[1.0, 2.0], [2.0, 4.0]];
        assert!(matrix_inverse(&m).is_none());
    }
}
