//! Training orchestration: grid expansion, fold assignment, and the
//! single-fit / grid-search dispatcher

mod grid;
mod kfold;
mod orchestrator;

pub use grid::combinations;
pub use kfold::KFold;
pub use orchestrator::{train_model, CvRecord, CvResults, TrainingResult};
