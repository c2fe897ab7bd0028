//! Error types shared across the Kiln crates.

use std::error::Error;
use std::fmt;

use crate::field::CellField;
use crate::id::MaterialId;
use crate::kind::MaterialKind;

// ── StepError ─────────────────────────────────────────────────────

/// Errors from a simulation step.
///
/// A failed step never swaps buffers: the front buffer stays the
/// last committed state.
#[derive(Clone, Debug, PartialEq)]
pub enum StepError {
    /// A pass returned an error during execution.
    PassFailed {
        /// Name of the failing pass.
        name: String,
        /// The underlying pass error.
        reason: PassError,
    },
    /// Stepping is disabled after too many consecutive failures.
    StepDisabled,
}

impl fmt::Display for StepError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::PassFailed { name, reason } => write!(f, "pass '{name}' failed: {reason}"),
            Self::StepDisabled => write!(f, "stepping disabled after consecutive failures"),
        }
    }
}

impl Error for StepError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::PassFailed { reason, .. } => Some(reason),
            Self::StepDisabled => None,
        }
    }
}

// ── PassError ─────────────────────────────────────────────────────

/// Errors from an individual pass.
///
/// Wrapped into [`StepError::PassFailed`] by the pipeline.
#[derive(Clone, Debug, PartialEq)]
pub enum PassError {
    /// The pass could not complete.
    ExecutionFailed {
        /// Human-readable description.
        reason: String,
    },
    /// The read and write buffers disagree in size.
    BufferMismatch {
        /// Cells in the read buffer.
        expected: usize,
        /// Cells in the write buffer.
        got: usize,
    },
    /// A floating-point field produced NaN or infinity.
    NonFinite {
        /// The offending field.
        field: CellField,
        /// Flat index of the offending cell.
        cell: usize,
    },
}

impl fmt::Display for PassError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ExecutionFailed { reason } => write!(f, "execution failed: {reason}"),
            Self::BufferMismatch { expected, got } => {
                write!(f, "buffer size mismatch: read has {expected} cells, write has {got}")
            }
            Self::NonFinite { field, cell } => {
                write!(f, "non-finite value in field '{field}' at cell {cell}")
            }
        }
    }
}

impl Error for PassError {}

// ── RegistryError ─────────────────────────────────────────────────

/// Errors from material registration and lookup.
#[derive(Clone, Debug, PartialEq)]
pub enum RegistryError {
    /// No material is registered under this name.
    UnknownMaterial {
        /// The name that was looked up.
        name: String,
    },
    /// No material is registered under this id.
    UnknownId {
        /// The id that was looked up.
        id: MaterialId,
    },
    /// A material with this name already exists.
    DuplicateName {
        /// The conflicting name.
        name: String,
    },
    /// A material with this behavioural kind already exists.
    DuplicateKind {
        /// The conflicting kind.
        kind: MaterialKind,
    },
    /// All `u16` ids are in use.
    RegistryFull,
    /// A definition failed validation.
    InvalidDefinition {
        /// Name of the rejected material.
        name: String,
        /// What was wrong with it.
        reason: String,
    },
}

impl fmt::Display for RegistryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownMaterial { name } => write!(f, "unknown material '{name}'"),
            Self::UnknownId { id } => write!(f, "unknown material id {id}"),
            Self::DuplicateName { name } => write!(f, "material '{name}' registered twice"),
            Self::DuplicateKind { kind } => {
                write!(f, "material kind {kind:?} registered twice")
            }
            Self::RegistryFull => write!(f, "material registry is full"),
            Self::InvalidDefinition { name, reason } => {
                write!(f, "invalid definition for '{name}': {reason}")
            }
        }
    }
}

impl Error for RegistryError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pass_failed_exposes_source() {
        let err = StepError::PassFailed {
            name: "thermal".into(),
            reason: PassError::NonFinite {
                field: CellField::Temp,
                cell: 12,
            },
        };
        assert_eq!(
            err.to_string(),
            "pass 'thermal' failed: non-finite value in field 'temp' at cell 12"
        );
        assert!(err.source().is_some());
        assert!(StepError::StepDisabled.source().is_none());
    }

    #[test]
    fn registry_messages_name_the_material() {
        let err = RegistryError::UnknownMaterial {
            name: "Mithril".into(),
        };
        assert_eq!(err.to_string(), "unknown material 'Mithril'");
    }
}
