//! Reusable pass fixtures.
//!
//! - [`FailingPass`]: fails deterministically after N calls.
//! - [`CountingPass`]: counts calls and touches nothing.
//! - [`RecordingPass`]: records the tick of every call.
//! - [`PoisonPass`]: writes NaN into one temperature.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use kiln_core::{PassError, TickId};
use kiln_pass::{Pass, PassContext};

/// Fails deterministically after a configurable number of successful calls.
///
/// Successful calls stamp the call index into `aux[0]` of the back buffer,
/// so a test can tell whether a failed step leaked into the front.
pub struct FailingPass {
    pub name: String,
    pub succeed_count: usize,
    calls: Arc<AtomicUsize>,
}

impl FailingPass {
    /// Create a pass that succeeds `succeed_count` times then fails.
    pub fn new(name: impl Into<String>, succeed_count: usize) -> Self {
        Self {
            name: name.into(),
            succeed_count,
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Shared handle to the call counter, usable after the pass is boxed.
    pub fn counter(&self) -> Arc<AtomicUsize> {
        Arc::clone(&self.calls)
    }
}

impl Pass for FailingPass {
    fn name(&self) -> &str {
        &self.name
    }

    fn execute(&self, ctx: &mut PassContext<'_>) -> Result<(), PassError> {
        let n = self.calls.fetch_add(1, Ordering::Relaxed);
        if n >= self.succeed_count {
            // Scribble first: the engine must not publish this.
            ctx.write.aux.fill(u16::MAX);
            return Err(PassError::ExecutionFailed {
                reason: format!(
                    "deliberate failure after {} successful calls",
                    self.succeed_count
                ),
            });
        }
        ctx.write.aux[0] = n as u16 + 1;
        Ok(())
    }
}

/// Counts calls; never touches the buffers.
pub struct CountingPass {
    pub name: String,
    calls: Arc<AtomicUsize>,
}

impl CountingPass {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Shared handle to the call counter.
    pub fn counter(&self) -> Arc<AtomicUsize> {
        Arc::clone(&self.calls)
    }
}

impl Pass for CountingPass {
    fn name(&self) -> &str {
        &self.name
    }

    fn execute(&self, _ctx: &mut PassContext<'_>) -> Result<(), PassError> {
        self.calls.fetch_add(1, Ordering::Relaxed);
        Ok(())
    }
}

/// Records `(tick, dt)` for every call.
pub struct RecordingPass {
    pub name: String,
    log: Arc<Mutex<Vec<(TickId, f64)>>>,
}

impl RecordingPass {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            log: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Shared handle to the call log.
    pub fn log(&self) -> Arc<Mutex<Vec<(TickId, f64)>>> {
        Arc::clone(&self.log)
    }
}

impl Pass for RecordingPass {
    fn name(&self) -> &str {
        &self.name
    }

    fn execute(&self, ctx: &mut PassContext<'_>) -> Result<(), PassError> {
        let mut log = self.log.lock().map_err(|_| PassError::ExecutionFailed {
            reason: "recording log poisoned".into(),
        })?;
        log.push((ctx.tick(), ctx.dt()));
        Ok(())
    }
}

/// Writes NaN into the temperature of one cell, for exercising
/// non-finite detection downstream.
pub struct PoisonPass {
    pub cell: usize,
}

impl Pass for PoisonPass {
    fn name(&self) -> &str {
        "poison"
    }

    fn execute(&self, ctx: &mut PassContext<'_>) -> Result<(), PassError> {
        if let Some(t) = ctx.write.temp.get_mut(self.cell) {
            *t = f32::NAN;
        }
        Ok(())
    }
}
