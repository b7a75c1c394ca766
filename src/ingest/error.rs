use thiserror::Error;

#[derive(Debug, Error)]
pub enum IngestError {
    #[error("failed to read catalog source: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed catalog source: {0}")]
    Csv(#[from] csv::Error),

    #[error("internal error: {0}")]
    Internal(#[from] anyhow::Error),
}
