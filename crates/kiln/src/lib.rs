//! Kiln: a deterministic tile-based materials simulator.
//!
//! This is the top-level facade crate that re-exports the public API from
//! all Kiln sub-crates. For most users, adding `kiln` as a single
//! dependency is sufficient.
//!
//! # Quick start
//!
//! ```rust
//! use kiln::prelude::*;
//! use kiln::materials::presets::{SAND, STONE};
//!
//! let mut engine = Engine::new(EngineConfig::new(32, 32).with_seed(42)).unwrap();
//! for x in 4..28 {
//!     engine.paint(x, 28, STONE, 0).unwrap();
//! }
//! engine.paint(16, 8, SAND, 2).unwrap();
//! engine.run(120).unwrap();
//!
//! // The sand has landed on the floor.
//! assert_eq!(engine.sample(16, 27).unwrap().mat, SAND);
//! assert_eq!(engine.tick(), TickId(120));
//! ```
//!
//! # Custom passes
//!
//! ```rust
//! use kiln::prelude::*;
//!
//! /// Nudges every temperature up by one degree per step.
//! struct Warm;
//!
//! impl Pass for Warm {
//!     fn name(&self) -> &str { "warm" }
//!     fn execute(&self, ctx: &mut PassContext<'_>) -> Result<(), PassError> {
//!         ctx.write.temp.iter_mut().for_each(|t| *t += 1.0);
//!         Ok(())
//!     }
//! }
//!
//! let mut engine = Engine::with_passes(
//!     EngineConfig::new(8, 8),
//!     MaterialRegistry::standard().unwrap(),
//!     vec![Box::new(Warm)],
//! )
//! .unwrap();
//! engine.step().unwrap();
//! assert_eq!(engine.sample(3, 3).unwrap().temp, 21.0);
//! ```
//!
//! # Modules
//!
//! | Module | Sub-crate | Contents |
//! |--------|-----------|----------|
//! | [`types`] | `kiln-core` | ids, categories, kinds, cell fields, shared errors |
//! | [`materials`] | `kiln-material` | material definitions, registry, presets, property cache |
//! | [`grid`] | `kiln-grid` | cell buffers, the double-buffered grid, dirty chunks |
//! | [`pass`] | `kiln-pass` | the pass trait, step context, pipeline, random stream |
//! | [`passes`] | `kiln-passes` | the standard passes and their tuned constants |
//! | [`engine`] | `kiln-engine` | the engine, configuration, metrics and hashing |

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

/// Core ids, enums and error types (`kiln-core`).
pub use kiln_core as types;

/// Material definitions and lookups (`kiln-material`).
///
/// [`materials::presets`] holds the ids of the standard table built by
/// [`materials::MaterialRegistry::standard`].
pub use kiln_material as materials;

/// Cell storage (`kiln-grid`).
pub use kiln_grid as grid;

/// The pass trait and pipeline (`kiln-pass`).
///
/// [`pass::Pass`] is the main extension point for custom behaviour.
pub use kiln_pass as pass;

/// The standard passes (`kiln-passes`).
///
/// [`passes::default_passes`] returns them in execution order.
pub use kiln_passes as passes;

/// The engine (`kiln-engine`).
pub use kiln_engine as engine;

/// Common imports for typical Kiln usage.
///
/// ```rust
/// use kiln::prelude::*;
/// ```
pub mod prelude {
    // Core types
    pub use kiln_core::{
        Category, CellField, ChunkKey, FuelOrigin, MaterialId, MaterialKind, TickId,
    };

    // Errors
    pub use kiln_core::{PassError, RegistryError, StepError};

    // Materials
    pub use kiln_material::{MaterialDef, MaterialRegistry, PropertyCache};

    // Grid
    pub use kiln_grid::{CellBuffer, DirtyChunks};

    // Passes
    pub use kiln_pass::{Pass, PassContext, SimRng, StepInfo};
    pub use kiln_passes::default_passes;

    // Engine
    pub use kiln_engine::{
        CellSample, ConfigError, EditError, Engine, EngineConfig, StepMetrics,
    };
}
