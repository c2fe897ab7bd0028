//! Material definitions for the Kiln simulator.
//!
//! A [`MaterialRegistry`] is built once at startup (usually via
//! [`MaterialRegistry::standard`]), then shared immutably with the engine.
//! Passes never read definitions directly in their hot loops; they go
//! through the flat per-id arrays of a [`PropertyCache`].

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod cache;
pub mod def;
pub mod presets;
pub mod registry;

pub use cache::PropertyCache;
pub use def::MaterialDef;
pub use registry::MaterialRegistry;
