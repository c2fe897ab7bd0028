//! Core types for the Kiln materials simulator.
//!
//! This crate is the leaf dependency for all other Kiln crates. It holds
//! strongly-typed identifiers, the closed set of material categories and
//! behavioural kinds, the per-cell field enumeration, and the error types
//! shared across the pass pipeline and engine.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod error;
pub mod field;
pub mod id;
pub mod kind;

pub use error::{PassError, RegistryError, StepError};
pub use field::CellField;
pub use id::{ChunkKey, MaterialId, TickId};
pub use kind::{Category, FuelOrigin, MaterialKind};

/// Temperature every cell relaxes toward, in °C.
///
/// Also the temperature `clear()` writes into every cell.
pub const AMBIENT_TEMPERATURE_C: f32 = 20.0;
