//! Ordered pass execution.
//!
//! [`PassPipeline::new`] validates the pass list once at startup;
//! [`PassPipeline::run`] executes it every step, refreshing the property
//! cache first so passes never see stale material data.

use std::error::Error;
use std::fmt;
use std::time::Instant;

use indexmap::IndexMap;
use kiln_core::StepError;
use kiln_grid::{DirtyChunks, StepBuffers};
use kiln_material::{MaterialRegistry, PropertyCache};

use crate::context::{PassContext, StepInfo};
use crate::pass::Pass;
use crate::rng::SimRng;

// ── Errors ─────────────────────────────────────────────────────────

/// Errors from pipeline validation (startup-time, not per-step).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PipelineError {
    /// No passes registered.
    EmptyPipeline,
    /// Two passes share a name, which would make failures ambiguous.
    DuplicateName {
        /// The repeated name.
        name: String,
    },
}

impl fmt::Display for PipelineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyPipeline => write!(f, "pipeline has no passes"),
            Self::DuplicateName { name } => write!(f, "pass name '{name}' used twice"),
        }
    }
}

impl Error for PipelineError {}

// ── Pipeline ───────────────────────────────────────────────────────

/// A validated, ordered list of passes plus the property cache they share.
pub struct PassPipeline {
    passes: Vec<Box<dyn Pass>>,
    props: PropertyCache,
}

impl PassPipeline {
    /// Validate `passes` and build a pipeline around them.
    pub fn new(passes: Vec<Box<dyn Pass>>) -> Result<Self, PipelineError> {
        if passes.is_empty() {
            return Err(PipelineError::EmptyPipeline);
        }
        let mut seen: IndexMap<&str, usize> = IndexMap::new();
        for (i, pass) in passes.iter().enumerate() {
            if seen.insert(pass.name(), i).is_some() {
                return Err(PipelineError::DuplicateName {
                    name: pass.name().to_string(),
                });
            }
        }
        Ok(Self {
            passes,
            props: PropertyCache::default(),
        })
    }

    /// Number of passes.
    pub fn len(&self) -> usize {
        self.passes.len()
    }

    /// Always false for a validated pipeline.
    pub fn is_empty(&self) -> bool {
        self.passes.is_empty()
    }

    /// Pass names in execution order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.passes.iter().map(|p| p.name())
    }

    /// The property cache as of the last [`run`](Self::run) or
    /// [`refresh`](Self::refresh).
    pub fn properties(&self) -> &PropertyCache {
        &self.props
    }

    /// Bring the property cache up to date with `registry`.
    pub fn refresh(&mut self, registry: &MaterialRegistry) -> bool {
        self.props.ensure(registry)
    }

    /// Run every pass in order against `buffers`.
    ///
    /// Returns per-pass wall time in microseconds. Stops at the first
    /// failing pass; the caller must then discard the back buffer.
    pub fn run(
        &mut self,
        registry: &MaterialRegistry,
        buffers: StepBuffers<'_>,
        rng: &mut SimRng,
        dirty: &mut DirtyChunks,
        info: StepInfo,
    ) -> Result<Vec<(String, u64)>, StepError> {
        self.props.ensure(registry);
        let StepBuffers { read, write } = buffers;
        let mut timings = Vec::with_capacity(self.passes.len());
        for pass in &self.passes {
            let start = Instant::now();
            let result =
                PassContext::new(read, &mut *write, &self.props, &mut *rng, &mut *dirty, info)
                    .and_then(|mut ctx| pass.execute(&mut ctx));
            if let Err(reason) = result {
                return Err(StepError::PassFailed {
                    name: pass.name().to_string(),
                    reason,
                });
            }
            timings.push((pass.name().to_string(), start.elapsed().as_micros() as u64));
        }
        Ok(timings)
    }
}

impl fmt::Debug for PassPipeline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PassPipeline")
            .field("passes", &self.names().collect::<Vec<_>>())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kiln_core::{MaterialId, PassError, TickId};
    use kiln_grid::Grid;

    struct Named(&'static str);

    impl Pass for Named {
        fn name(&self) -> &str {
            self.0
        }
        fn execute(&self, ctx: &mut PassContext<'_>) -> Result<(), PassError> {
            // Leave a trace of execution order in aux[0].
            ctx.write.aux[0] = ctx.write.aux[0] * 10 + self.0.len() as u16;
            Ok(())
        }
    }

    struct Broken;

    impl Pass for Broken {
        fn name(&self) -> &str {
            "broken"
        }
        fn execute(&self, ctx: &mut PassContext<'_>) -> Result<(), PassError> {
            ctx.write.mat[0] = MaterialId(9);
            Err(PassError::ExecutionFailed {
                reason: "boom".into(),
            })
        }
    }

    fn info() -> StepInfo {
        StepInfo {
            width: 3,
            height: 3,
            tick: TickId(1),
            dt: 1.0 / 60.0,
        }
    }

    #[test]
    fn empty_pipeline_rejected() {
        assert_eq!(
            PassPipeline::new(vec![]).err(),
            Some(PipelineError::EmptyPipeline)
        );
    }

    #[test]
    fn duplicate_names_rejected() {
        let err = PassPipeline::new(vec![Box::new(Named("a")), Box::new(Named("a"))]).err();
        assert_eq!(
            err,
            Some(PipelineError::DuplicateName { name: "a".into() })
        );
    }

    #[test]
    fn passes_run_in_order_with_timings() {
        let mut pipeline =
            PassPipeline::new(vec![Box::new(Named("a")), Box::new(Named("bbb"))]).unwrap();
        let reg = MaterialRegistry::standard().unwrap();
        let mut grid = Grid::new(3, 3).unwrap();
        let mut rng = SimRng::new(1);
        let mut dirty = DirtyChunks::new(4);
        let timings = pipeline
            .run(&reg, grid.begin_step(), &mut rng, &mut dirty, info())
            .unwrap();
        assert_eq!(timings.len(), 2);
        assert_eq!(timings[0].0, "a");
        assert_eq!(grid.back().aux[0], 13);
        assert_eq!(pipeline.properties().len(), reg.len() + 1);
    }

    #[test]
    fn failure_names_the_pass_and_stops() {
        let mut pipeline =
            PassPipeline::new(vec![Box::new(Broken), Box::new(Named("after"))]).unwrap();
        let reg = MaterialRegistry::new();
        let mut grid = Grid::new(3, 3).unwrap();
        let mut rng = SimRng::new(1);
        let mut dirty = DirtyChunks::new(4);
        let err = pipeline
            .run(&reg, grid.begin_step(), &mut rng, &mut dirty, info())
            .unwrap_err();
        assert!(matches!(err, StepError::PassFailed { ref name, .. } if name == "broken"));
        assert_eq!(grid.back().aux[0], 0);
        assert_eq!(grid.front().mat[0], MaterialId::EMPTY);
    }
}
