//! Grid error types.

use std::error::Error;
use std::fmt;

/// Errors from grid construction and bulk loads.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GridError {
    /// Width or height is zero.
    ZeroDimension {
        /// Requested width.
        width: u32,
        /// Requested height.
        height: u32,
    },
    /// `width * height` does not fit in `u32`.
    CellCountOverflow {
        /// Requested width.
        width: u32,
        /// Requested height.
        height: u32,
    },
    /// A bulk load did not supply exactly one entry per cell.
    SizeMismatch {
        /// `width * height`.
        expected: usize,
        /// Entries supplied.
        got: usize,
    },
}

impl fmt::Display for GridError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ZeroDimension { width, height } => {
                write!(f, "grid dimensions must be non-zero, got {width}x{height}")
            }
            Self::CellCountOverflow { width, height } => {
                write!(f, "grid {width}x{height} exceeds u32::MAX cells")
            }
            Self::SizeMismatch { expected, got } => {
                write!(f, "expected {expected} tiles, got {got}")
            }
        }
    }
}

impl Error for GridError {}
