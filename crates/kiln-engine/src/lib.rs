//! Step loop, editing operations and snapshot hashing for the Kiln
//! materials simulator.
//!
//! [`Engine`] owns a double-buffered grid, a material registry, the pass
//! pipeline and one seeded random stream. Every [`Engine::step`] runs the
//! pipeline once against the committed front buffer and publishes the
//! result by swapping buffers; a failed step publishes nothing.
//!
//! ```no_run
//! use kiln_engine::{Engine, EngineConfig};
//! use kiln_material::presets::{SAND, WATER};
//!
//! let mut engine = Engine::new(EngineConfig::new(64, 64).with_seed(42))?;
//! engine.paint(20, 10, SAND, 3)?;
//! engine.paint(40, 10, WATER, 4)?;
//! engine.run(120)?;
//! println!("{:016x}", engine.material_hash());
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod config;
pub mod engine;
pub mod error;
pub mod hash;
pub mod metrics;

pub use config::{ConfigError, EngineConfig};
pub use engine::{CellSample, Engine, MAX_CONSECUTIVE_FAILURES};
pub use error::EditError;
pub use hash::{config_hash, material_hash, snapshot_hash};
pub use metrics::StepMetrics;
