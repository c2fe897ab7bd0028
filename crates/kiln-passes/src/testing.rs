//! Single-pass harness for unit tests.

use kiln_core::{MaterialId, PassError, TickId};
use kiln_grid::{CellBuffer, DirtyChunks};
use kiln_material::{MaterialRegistry, PropertyCache};
use kiln_pass::{Pass, PassContext, SimRng, StepInfo};

/// A grid of standard materials stepped one pass at a time.
pub(crate) struct Scene {
    pub w: u32,
    pub h: u32,
    pub front: CellBuffer,
    pub props: PropertyCache,
    pub rng: SimRng,
    pub dirty: DirtyChunks,
    pub dt: f64,
}

impl Scene {
    /// `w x h` grid of empty cells at `temp`.
    pub fn new(w: u32, h: u32, temp: f32) -> Self {
        let registry = MaterialRegistry::standard().expect("standard registry");
        let mut front = CellBuffer::new((w * h) as usize);
        front.fill_empty(temp);
        Self {
            w,
            h,
            front,
            props: PropertyCache::new(&registry),
            rng: SimRng::new(7),
            dirty: DirtyChunks::new(4),
            dt: 1.0 / 60.0,
        }
    }

    pub fn idx(&self, x: u32, y: u32) -> usize {
        (y * self.w + x) as usize
    }

    pub fn set(&mut self, x: u32, y: u32, mat: MaterialId, temp: f32) -> usize {
        let i = self.idx(x, y);
        self.front.mat[i] = mat;
        self.front.temp[i] = temp;
        i
    }

    pub fn mat(&self, x: u32, y: u32) -> MaterialId {
        self.front.mat[self.idx(x, y)]
    }

    pub fn count(&self, mat: MaterialId) -> usize {
        self.front.mat.iter().filter(|&&m| m == mat).count()
    }

    /// Build a context over a fresh back buffer, run `f`, then commit.
    pub fn with_context<R>(&mut self, f: impl FnOnce(&mut PassContext<'_>) -> R) -> R {
        let mut back = self.front.clone();
        back.seed_from(&self.front);
        self.dirty.clear();
        let info = StepInfo {
            width: self.w,
            height: self.h,
            tick: TickId(1),
            dt: self.dt,
        };
        let out = {
            let mut ctx = PassContext::new(
                &self.front,
                &mut back,
                &self.props,
                &mut self.rng,
                &mut self.dirty,
                info,
            )
            .expect("matching buffers");
            f(&mut ctx)
        };
        self.front = back;
        out
    }

    /// Run `passes` in order as one step and commit the result.
    pub fn step(&mut self, passes: &[&dyn Pass]) {
        self.with_context(|ctx| {
            for pass in passes {
                pass.execute(ctx).expect("pass succeeds");
            }
        });
    }

    /// One step of `pass`, reporting its error instead of panicking.
    pub fn try_step(&mut self, pass: &dyn Pass) -> Result<(), PassError> {
        self.with_context(|ctx| pass.execute(ctx))
    }

    pub fn run(&mut self, pass: &dyn Pass, steps: usize) {
        for _ in 0..steps {
            self.step(&[pass]);
        }
    }
}
