//! Pass trait and step context for the Kiln simulator.
//!
//! A [`Pass`] is a stateless operator run once per step. The
//! [`PassPipeline`] runs its passes in a fixed order against one
//! [`PassContext`] per pass, all drawing from the same [`SimRng`].

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod context;
pub mod pass;
pub mod pipeline;
pub mod rng;

pub use context::{PassContext, StepInfo};
pub use pass::Pass;
pub use pipeline::{PassPipeline, PipelineError};
pub use rng::SimRng;
