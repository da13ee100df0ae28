use std::io;

use thiserror::Error;

use crate::types::SourceId;

/// Error type for source decoding, task partitioning, and collaborator failures.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("data source '{source_id}' is unavailable: {reason}")]
    SourceUnavailable { source_id: SourceId, reason: String },
    #[error("malformed event at row {row}: {details}")]
    MalformedEvent { row: usize, details: String },
    #[error("requested {requested} tasks but only {available} distinct categories exist")]
    InsufficientCategories { available: usize, requested: usize },
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error("configuration error: {0}")]
    Configuration(String),
}
