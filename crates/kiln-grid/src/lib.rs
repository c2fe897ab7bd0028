//! Cell storage for the Kiln simulator.
//!
//! A [`Grid`] owns two identically shaped [`CellBuffer`]s. The front buffer
//! holds the last committed state and is only read during a step; the back
//! buffer is seeded from the front at step start, written by the passes,
//! and becomes the front on [`Grid::swap`].
//!
//! [`DirtyChunks`] records which coarse regions changed so an external
//! renderer can redraw incrementally.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod buffer;
pub mod dirty;
pub mod error;
pub mod grid;

pub use buffer::{CellBuffer, FLAG_CLAIMED};
pub use dirty::DirtyChunks;
pub use error::GridError;
pub use grid::{Grid, StepBuffers};
