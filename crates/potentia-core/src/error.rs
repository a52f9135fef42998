//! Error taxonomy shared by every potentia crate

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum PotentialError {
    /// Result size, dimension product, buffer or table lengths disagree.
    /// Detected at entry, before any output is written.
    #[error("size mismatch: {0}")]
    SizeMismatch(String),

    /// The mixed-radix counter ran out of variables while iterations remained.
    #[error("dimension mismatch: counter exhausted before position {position} of {result_size}")]
    DimensionMismatch { position: usize, result_size: usize },

    /// Inconsistent operand lists, out-of-range coordinates, bad variables.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
}

pub type Result<T, E = PotentialError> = core::result::Result<T, E>;
