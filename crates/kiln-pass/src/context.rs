//! Execution context handed to each pass.
//!
//! [`PassContext`] exposes its buffers as public fields so a pass can hold
//! the read view, the write view, the generator and the dirty set at the
//! same time without fighting the borrow checker.

use kiln_core::{PassError, TickId};
use kiln_grid::{CellBuffer, DirtyChunks};
use kiln_material::PropertyCache;

use crate::rng::SimRng;

/// Scalar facts about the step being executed.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct StepInfo {
    /// Grid columns.
    pub width: u32,
    /// Grid rows.
    pub height: u32,
    /// Tick that this step will produce once committed.
    pub tick: TickId,
    /// Simulated seconds per step.
    pub dt: f64,
}

impl StepInfo {
    /// Step length in 60 Hz frames, at least 1. Used as an exponent for
    /// per-frame decay factors.
    pub fn frames(&self) -> f32 {
        ((self.dt * 60.0) as f32).max(1.0)
    }

    /// Step length in whole 60 Hz frames, at least 1. Used to scale integer
    /// counters.
    pub fn whole_frames(&self) -> u16 {
        (self.dt * 60.0).round().clamp(1.0, u16::MAX as f64) as u16
    }
}

/// Everything a pass may touch during one step.
///
/// # Split-borrow semantics
///
/// - `read` is the committed front buffer. It never changes during a step,
///   so every pass sees the same starting state.
/// - `write` is the back buffer. It starts as a copy of `read` and
///   accumulates the writes of every earlier pass in the pipeline.
pub struct PassContext<'a> {
    /// Committed front buffer.
    pub read: &'a CellBuffer,
    /// In-progress back buffer.
    pub write: &'a mut CellBuffer,
    /// Per-id material properties.
    pub props: &'a PropertyCache,
    /// Shared random stream.
    pub rng: &'a mut SimRng,
    /// Chunks changed this step.
    pub dirty: &'a mut DirtyChunks,
    info: StepInfo,
}

impl<'a> PassContext<'a> {
    /// Assemble a context, checking both buffers match the grid size.
    pub fn new(
        read: &'a CellBuffer,
        write: &'a mut CellBuffer,
        props: &'a PropertyCache,
        rng: &'a mut SimRng,
        dirty: &'a mut DirtyChunks,
        info: StepInfo,
    ) -> Result<Self, PassError> {
        let expected = info.width as usize * info.height as usize;
        for got in [read.len(), write.len()] {
            if got != expected {
                return Err(PassError::BufferMismatch { expected, got });
            }
        }
        Ok(Self {
            read,
            write,
            props,
            rng,
            dirty,
            info,
        })
    }

    /// Step metadata.
    pub fn info(&self) -> StepInfo {
        self.info
    }

    /// Grid columns.
    pub fn width(&self) -> u32 {
        self.info.width
    }

    /// Grid rows.
    pub fn height(&self) -> u32 {
        self.info.height
    }

    /// Simulated seconds per step.
    pub fn dt(&self) -> f64 {
        self.info.dt
    }

    /// Tick this step produces.
    pub fn tick(&self) -> TickId {
        self.info.tick
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kiln_material::MaterialRegistry;

    fn info(dt: f64) -> StepInfo {
        StepInfo {
            width: 4,
            height: 3,
            tick: TickId(1),
            dt,
        }
    }

    #[test]
    fn frames_never_drop_below_one() {
        assert_eq!(info(1.0 / 60.0).frames(), 1.0);
        assert_eq!(info(1.0 / 120.0).frames(), 1.0);
        assert_eq!(info(1.0 / 30.0).frames(), 2.0);
        assert_eq!(info(1.0 / 120.0).whole_frames(), 1);
        assert_eq!(info(0.05).whole_frames(), 3);
    }

    #[test]
    fn mismatched_buffers_rejected() {
        let reg = MaterialRegistry::new();
        let props = PropertyCache::new(&reg);
        let read = CellBuffer::new(12);
        let mut write = CellBuffer::new(10);
        let mut rng = SimRng::new(0);
        let mut dirty = DirtyChunks::new(8);
        let err = PassContext::new(&read, &mut write, &props, &mut rng, &mut dirty, info(0.1))
            .err();
        assert_eq!(
            err,
            Some(PassError::BufferMismatch {
                expected: 12,
                got: 10
            })
        );
    }
}
