//! Results persistence and the per-run summary document

mod persist;

pub use persist::{
    create_results_directory, persist_artifacts, save_run_summary, RunSummary,
};
