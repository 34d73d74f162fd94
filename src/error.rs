use thiserror::Error;

pub type PlotResult<T> = Result<T, PlotError>;

#[derive(Debug, Error)]
pub enum PlotError {
    #[error("invalid data: {0}")]
    InvalidData(String),

    #[error("reshape pipeline has been disposed")]
    PipelineDisposed,

    #[error("no async runtime available: {0}")]
    RuntimeUnavailable(String),

    #[error("render failed: {0}")]
    Render(String),
}
