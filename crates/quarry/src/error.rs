//! Top-level error type.

use thiserror::Error;

/// Result type for Quarry operations.
pub type Result<T> = std::result::Result<T, QuarryError>;

/// Errors surfaced by the orchestration layer.
#[derive(Debug, Error)]
pub enum QuarryError {
    /// Data-layer failure.
    #[error(transparent)]
    Data(#[from] quarry_data::DataError),

    /// Export failure.
    #[error(transparent)]
    Export(#[from] quarry_output::ExportError),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// No transcript could be located for a ticker.
    #[error("No earnings-call transcript found for {0}")]
    TranscriptNotFound(String),

    /// A transcript page produced no text after conversion.
    #[error("Transcript at {0} produced no text")]
    EmptyTranscript(String),
}
