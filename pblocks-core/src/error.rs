//! The error type shared by every pblocks crate.

use thiserror::Error;

/// What went wrong while reading inputs or assigning Protein Blocks.
#[derive(Debug, Error)]
pub enum PbError {
    /// Underlying file or stream failure.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Malformed structure, topology, or trajectory data.
    #[error("parse error: {0}")]
    Parse(String),

    /// Arguments that do not fit together, e.g. a frame whose atom count
    /// differs from its topology.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Malformed reference block definitions.
    #[error("invalid PB definition: {0}")]
    Definition(String),
}

pub type Result<T> = std::result::Result<T, PbError>;
