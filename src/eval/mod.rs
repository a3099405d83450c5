//! Evaluation: the closed metric set and the test-set evaluator

mod evaluator;
mod metrics;

pub use evaluator::{evaluate_model, EvaluationResult};
pub use metrics::{supported_names, Metric, ALL_METRICS};
