//! Error types for sniffrom-core

use thiserror::Error;

/// Core error type
///
/// Only [`Error::CapacityExceeded`] and [`Error::Io`] terminate a run.
/// Malformed capture rows are reported through [`Error::MalformedRecord`]
/// by the row parser, but the capture reader recovers from them by skipping
/// the row.
#[derive(Debug, Error)]
pub enum Error {
    /// A capture row could not be parsed (header line, truncated row, bad hex)
    #[error("malformed record on line {line}: {reason}")]
    MalformedRecord {
        /// 1-based line number in the capture
        line: usize,
        /// What was wrong with the row
        reason: &'static str,
    },

    /// A decoded address lies outside the allocated image
    #[error("address 0x{address:08X} exceeds image capacity of {capacity} bytes")]
    CapacityExceeded {
        /// Offending address (base address + running offset)
        address: u64,
        /// Configured image capacity in bytes
        capacity: usize,
    },

    /// Reading the capture stream failed
    #[error("failed to read capture: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration value outside the supported range
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Result type alias using the core Error type
pub type Result<T> = std::result::Result<T, Error>;
