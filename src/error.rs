//! Error types for the sniffrom binary

use std::path::PathBuf;
use thiserror::Error;

/// Errors that terminate a run
#[derive(Debug, Error)]
pub enum SniffError {
    /// Failed to open the capture file
    #[error("Failed to open {}: {source}", .path.display())]
    OpenCapture {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Decoding failed (capacity exceeded, read error)
    #[error(transparent)]
    Decode(#[from] sniffrom_core::Error),

    /// Failed to persist a reconstructed image
    #[error("Failed to write the output file {}: {source}", .path.display())]
    OutputWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Failed to persist the access map graph
    #[error("Failed to write graph {}: {source}", .path.display())]
    GraphWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Progress bar template rejected
    #[error("Invalid progress template: {0}")]
    Progress(#[from] indicatif::style::TemplateError),
}

/// Result type for the binary
pub type Result<T> = std::result::Result<T, SniffError>;
