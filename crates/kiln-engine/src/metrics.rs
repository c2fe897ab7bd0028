//! Per-step timing for the simulation engine.
//!
//! [`StepMetrics`] is refreshed after every successful
//! [`Engine::step`](crate::Engine::step) and read back through
//! [`Engine::last_metrics`](crate::Engine::last_metrics).

use kiln_core::TickId;

/// Timing and bookkeeping collected during a single step.
///
/// All durations are in microseconds.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct StepMetrics {
    /// Tick committed by this step.
    pub tick: TickId,
    /// Wall-clock time for the whole step.
    pub total_us: u64,
    /// Per-pass execution times: `(name, microseconds)`, in pipeline order.
    pub pass_us: Vec<(String, u64)>,
    /// Chunks marked dirty by this step.
    pub dirty_chunks: usize,
    /// Cumulative number of failed steps since construction.
    pub failed_steps: u64,
}

impl StepMetrics {
    /// Time spent in the named pass, if it ran.
    pub fn pass_time(&self, name: &str) -> Option<u64> {
        self.pass_us
            .iter()
            .find(|(n, _)| n == name)
            .map(|&(_, us)| us)
    }
}
