use thiserror::Error;

#[derive(Debug, Error)]
pub enum DashboardError {
    /// Unknown or malformed `gov` value. The resolver recovers from this
    /// locally; it never reaches a caller.
    #[error("invalid governorate selection '{0}'")]
    InvalidSelection(String),
    #[error("dashboard initialization failed: {0}")]
    Initialization(String),
    #[error("failed to write snapshot: {0}")]
    Snapshot(#[from] serde_json::Error),
}

pub type DashboardResult<T> = Result<T, DashboardError>;
