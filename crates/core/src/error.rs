use std::path::PathBuf;
use thiserror::Error;

/// Failure of a single analysis run.
///
/// A run is all-or-nothing: any of these rejects the whole batch and no
/// diagnostics from that invocation are surfaced.
#[derive(Error, Debug)]
pub enum AnalysisError {
    #[error("failed to start {}: {source}", .program.display())]
    Spawn {
        program: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("input channel of {} is unavailable", .0.display())]
    StdinUnavailable(PathBuf),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("analysis tool exited unsuccessfully (code {code:?}): {stderr}")]
    Execution { code: Option<i32>, stderr: String },
    #[error("analysis task failed: {0}")]
    Task(String),
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON serialization/deserialization error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, AnalysisError>;
