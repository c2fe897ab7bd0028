//! The engine: owns the grid, the registry, the pass pipeline and the
//! random stream, and exposes the step and editing operations.

use std::time::Instant;

use kiln_core::{
    ChunkKey, FuelOrigin, MaterialId, MaterialKind, RegistryError, StepError, TickId,
    AMBIENT_TEMPERATURE_C,
};
use kiln_grid::{CellBuffer, DirtyChunks, Grid};
use kiln_material::MaterialRegistry;
use kiln_pass::{Pass, PassPipeline, SimRng, StepInfo};

use crate::config::{ConfigError, EngineConfig, MAX_CHUNKS_PER_AXIS};
use crate::error::EditError;
use crate::hash;
use crate::metrics::StepMetrics;

/// Consecutive failed steps after which stepping is disabled.
pub const MAX_CONSECUTIVE_FAILURES: u32 = 3;

/// Painted ice is at most this cold.
const PAINT_ICE_MAX_C: f32 = -5.0;
/// Cells around painted ice are chilled to at most this.
const PAINT_ICE_CHILL_C: f32 = 0.0;
/// Painted lava is at least this hot.
const PAINT_LAVA_MIN_C: f32 = 800.0;
/// Painted water is at most this warm.
const PAINT_WATER_MAX_C: f32 = 25.0;
/// Painted fire is at least this hot.
const PAINT_FIRE_MIN_C: f32 = 420.0;

/// What a kinematic collaborator sees at one cell.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CellSample {
    /// Material id.
    pub mat: MaterialId,
    /// Temperature in °C.
    pub temp: f32,
    /// Horizontal velocity hint.
    pub vel_x: i8,
    /// Vertical velocity hint.
    pub vel_y: i8,
}

/// A single-threaded, deterministic materials simulation.
///
/// Each [`step`](Self::step) runs every pass once, in order, against the
/// committed front buffer and publishes the result with an O(1) buffer
/// swap. A failed step publishes nothing. Edits
/// ([`paint`](Self::paint), [`clear`](Self::clear),
/// [`load_tiles`](Self::load_tiles)) write the front buffer directly and
/// belong between steps.
pub struct Engine {
    config: EngineConfig,
    registry: MaterialRegistry,
    pipeline: PassPipeline,
    grid: Grid,
    rng: SimRng,
    dirty: DirtyChunks,
    tick: TickId,
    consecutive_failures: u32,
    failed_steps: u64,
    disabled: bool,
    last_metrics: StepMetrics,
}

impl Engine {
    /// Engine over the standard materials and the default pipeline.
    pub fn new(config: EngineConfig) -> Result<Self, ConfigError> {
        let registry = MaterialRegistry::standard()?;
        Self::with_registry(config, registry)
    }

    /// Engine over `registry` and the default pipeline.
    pub fn with_registry(
        config: EngineConfig,
        registry: MaterialRegistry,
    ) -> Result<Self, ConfigError> {
        Self::with_passes(config, registry, kiln_passes::default_passes())
    }

    /// Engine over `registry` and a custom pass list.
    pub fn with_passes(
        config: EngineConfig,
        registry: MaterialRegistry,
        passes: Vec<Box<dyn Pass>>,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        let mut pipeline = PassPipeline::new(passes)?;
        pipeline.refresh(&registry);
        let mut grid = Grid::new(config.width, config.height)?;
        grid.reset(AMBIENT_TEMPERATURE_C);
        let mut dirty = DirtyChunks::new(config.chunk_size);
        dirty.mark_all(config.width, config.height);

        log::debug!(
            "engine {}x{} seed={} dt={} materials={} passes=[{}]",
            config.width,
            config.height,
            config.seed,
            config.dt,
            registry.len(),
            pipeline.names().collect::<Vec<_>>().join(", "),
        );

        Ok(Self {
            rng: SimRng::new(config.seed),
            config,
            registry,
            pipeline,
            grid,
            dirty,
            tick: TickId(0),
            consecutive_failures: 0,
            failed_steps: 0,
            disabled: false,
            last_metrics: StepMetrics::default(),
        })
    }

    // ── Stepping ───────────────────────────────────────────────────

    /// Advance the simulation by one step.
    ///
    /// On success the back buffer becomes the front and the tick advances.
    /// On failure the front buffer is left exactly as it was; after
    /// [`MAX_CONSECUTIVE_FAILURES`] failures in a row every further call
    /// returns [`StepError::StepDisabled`] until the grid is cleared,
    /// reloaded or [`reset_failures`](Self::reset_failures) is called.
    pub fn step(&mut self) -> Result<&StepMetrics, StepError> {
        if self.disabled {
            return Err(StepError::StepDisabled);
        }
        let start = Instant::now();
        let next = TickId(self.tick.0 + 1);
        let info = StepInfo {
            width: self.grid.width(),
            height: self.grid.height(),
            tick: next,
            dt: self.config.dt,
        };

        self.dirty.clear();
        let buffers = self.grid.begin_step();
        let result = self.pipeline.run(
            &self.registry,
            buffers,
            &mut self.rng,
            &mut self.dirty,
            info,
        );

        let pass_us = match result {
            Ok(pass_us) => pass_us,
            Err(e) => {
                self.record_failure(&e);
                return Err(e);
            }
        };

        self.grid.swap();
        self.tick = next;
        self.consecutive_failures = 0;
        self.last_metrics = StepMetrics {
            tick: next,
            total_us: start.elapsed().as_micros() as u64,
            pass_us,
            dirty_chunks: self.dirty.len(),
            failed_steps: self.failed_steps,
        };
        log::trace!(
            "tick {} in {}us, {} dirty chunks",
            next.0,
            self.last_metrics.total_us,
            self.last_metrics.dirty_chunks
        );
        Ok(&self.last_metrics)
    }

    /// Run `n` steps, stopping at the first failure.
    pub fn run(&mut self, n: usize) -> Result<(), StepError> {
        for _ in 0..n {
            self.step()?;
        }
        Ok(())
    }

    fn record_failure(&mut self, e: &StepError) {
        // The back buffer may be half-written; it is never swapped in.
        self.dirty.clear();
        self.failed_steps += 1;
        self.consecutive_failures += 1;
        log::warn!(
            "step {} failed ({} in a row): {e}",
            self.tick.0 + 1,
            self.consecutive_failures
        );
        if self.consecutive_failures >= MAX_CONSECUTIVE_FAILURES && !self.disabled {
            self.disabled = true;
            log::warn!(
                "stepping disabled after {} consecutive failures",
                self.consecutive_failures
            );
        }
    }

    /// Re-enable stepping and forget consecutive failures.
    pub fn reset_failures(&mut self) {
        self.consecutive_failures = 0;
        self.disabled = false;
    }

    // ── Editing ────────────────────────────────────────────────────

    /// Stamp a filled disk of `id` centred on `(x, y)` into the front
    /// buffer.
    ///
    /// Cells with `dx² + dy² <= radius²` that lie on the grid are
    /// overwritten. Each painted cell loses its pressure, impulse, aux,
    /// humidity, phase and velocity hints, then gets a temperature that
    /// depends on the material: ice is at most -5 °C and chills its
    /// 3×3 neighbourhood to 0 °C, lava is at least 800 °C, water at most
    /// 25 °C, and fire at least 420 °C with its fuel origin taken from the
    /// material it replaces.
    pub fn paint(&mut self, x: i32, y: i32, id: MaterialId, radius: u32) -> Result<(), EditError> {
        if !self.registry.contains(id) {
            return Err(RegistryError::UnknownId { id }.into());
        }
        let kind = self
            .registry
            .get(id)
            .map_or(MaterialKind::Generic, |def| def.kind);
        let r = radius.min(i32::MAX as u32) as i64;
        let (x, y) = (x as i64, y as i64);
        let (w, h) = (self.grid.width() as i64, self.grid.height() as i64);

        for cy in (y - r).max(0)..=(y + r).min(h - 1) {
            for cx in (x - r).max(0)..=(x + r).min(w - 1) {
                let (dx, dy) = (cx - x, cy - y);
                if dx * dx + dy * dy > r * r {
                    continue;
                }
                let (cx, cy) = (cx as i32, cy as i32);
                let Some(i) = self.grid.index(cx, cy) else {
                    continue;
                };
                let replaced = self.grid.front().mat[i];
                let origin = self
                    .registry
                    .get(replaced)
                    .map_or(FuelOrigin::Unknown, |def| FuelOrigin::of_kind(def.kind));

                let buf = self.grid.front_mut();
                stamp(buf, i, id);
                match kind {
                    MaterialKind::Ice => buf.temp[i] = buf.temp[i].min(PAINT_ICE_MAX_C),
                    MaterialKind::Lava => buf.temp[i] = buf.temp[i].max(PAINT_LAVA_MIN_C),
                    MaterialKind::Water => buf.temp[i] = buf.temp[i].min(PAINT_WATER_MAX_C),
                    MaterialKind::Fire => {
                        buf.temp[i] = buf.temp[i].max(PAINT_FIRE_MIN_C);
                        buf.vel_x[i] = origin.code();
                    }
                    _ => {}
                }
                self.dirty.mark(cx as u32, cy as u32);

                if kind == MaterialKind::Ice {
                    self.chill_around(cx, cy);
                }
            }
        }
        Ok(())
    }

    fn chill_around(&mut self, x: i32, y: i32) {
        for ny in y - 1..=y + 1 {
            for nx in x - 1..=x + 1 {
                if let Some(j) = self.grid.index(nx, ny) {
                    let t = &mut self.grid.front_mut().temp[j];
                    *t = t.min(PAINT_ICE_CHILL_C);
                }
            }
        }
    }

    /// Reset both buffers to empty space at ambient temperature and mark
    /// every chunk dirty. Also re-enables stepping.
    pub fn clear(&mut self) {
        self.grid.reset(AMBIENT_TEMPERATURE_C);
        self.mark_all_dirty();
        self.reset_failures();
        log::info!("grid cleared at tick {}", self.tick.0);
    }

    /// Mark the chunk containing `(x, y)` for redraw. Out-of-bounds cells
    /// are ignored.
    pub fn mark_dirty(&mut self, x: i32, y: i32) {
        if self.grid.index(x, y).is_some() {
            self.dirty.mark(x as u32, y as u32);
        }
    }

    /// Replace the whole grid with `(material, temperature)` tiles in
    /// row-major order.
    ///
    /// Every id must be empty or registered and there must be exactly one
    /// tile per cell; otherwise nothing changes. Also re-enables stepping.
    pub fn load_tiles(&mut self, tiles: &[(MaterialId, f32)]) -> Result<(), EditError> {
        if let Some(&(id, _)) = tiles.iter().find(|(id, _)| !self.registry.contains(*id)) {
            return Err(RegistryError::UnknownId { id }.into());
        }
        self.grid.load(tiles)?;
        self.mark_all_dirty();
        self.reset_failures();
        log::info!(
            "loaded {} tiles into {}x{} grid",
            tiles.len(),
            self.grid.width(),
            self.grid.height()
        );
        Ok(())
    }

    /// Grow the grid to `new_width` columns, keeping existing rows.
    ///
    /// New columns are empty and zero-filled. Returns `false` and changes
    /// nothing when `new_width` is not wider or the grid would become too
    /// large.
    pub fn expand_width(&mut self, new_width: u32) -> bool {
        if new_width.div_ceil(self.config.chunk_size) > MAX_CHUNKS_PER_AXIS {
            return false;
        }
        let old = self.grid.width();
        if !self.grid.expand_width(new_width) {
            return false;
        }
        self.config.width = new_width;
        self.mark_all_dirty();
        log::info!("grid widened from {old} to {new_width} columns");
        true
    }

    fn mark_all_dirty(&mut self) {
        self.dirty.mark_all(self.grid.width(), self.grid.height());
    }

    // ── Queries ────────────────────────────────────────────────────

    /// Material, temperature and velocity hints at `(x, y)`, or `None` out
    /// of bounds.
    pub fn sample(&self, x: i32, y: i32) -> Option<CellSample> {
        let i = self.grid.index(x, y)?;
        let front = self.grid.front();
        Some(CellSample {
            mat: front.mat[i],
            temp: front.temp[i],
            vel_x: front.vel_x[i],
            vel_y: front.vel_y[i],
        })
    }

    /// Flat index of `(x, y)`, or `None` out of bounds.
    pub fn index(&self, x: i32, y: i32) -> Option<usize> {
        self.grid.index(x, y)
    }

    /// The committed buffer.
    pub fn front(&self) -> &CellBuffer {
        self.grid.front()
    }

    /// Chunks touched by the last step or edit.
    pub fn dirty(&self) -> &DirtyChunks {
        &self.dirty
    }

    /// Forget dirty marks once a consumer has redrawn them.
    pub fn take_dirty(&mut self) -> Vec<ChunkKey> {
        let keys: Vec<_> = self.dirty.iter().collect();
        self.dirty.clear();
        keys
    }

    /// Columns.
    pub fn width(&self) -> u32 {
        self.grid.width()
    }

    /// Rows.
    pub fn height(&self) -> u32 {
        self.grid.height()
    }

    /// Last committed tick.
    pub fn tick(&self) -> TickId {
        self.tick
    }

    /// Current configuration. `width` follows [`expand_width`](Self::expand_width).
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// The material registry.
    pub fn registry(&self) -> &MaterialRegistry {
        &self.registry
    }

    /// Pass names in execution order.
    pub fn pass_names(&self) -> Vec<&str> {
        self.pipeline.names().collect()
    }

    /// Metrics from the most recent successful step.
    pub fn last_metrics(&self) -> &StepMetrics {
        &self.last_metrics
    }

    /// Whether stepping is disabled.
    pub fn is_disabled(&self) -> bool {
        self.disabled
    }

    /// Failed steps since the last success.
    pub fn consecutive_failures(&self) -> u32 {
        self.consecutive_failures
    }

    /// FNV-1a hash over every field of the front buffer.
    pub fn snapshot_hash(&self) -> u64 {
        hash::snapshot_hash(self.grid.front())
    }

    /// FNV-1a hash over the front buffer's materials.
    pub fn material_hash(&self) -> u64 {
        hash::material_hash(self.grid.front())
    }
}

impl std::fmt::Debug for Engine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Engine")
            .field("config", &self.config)
            .field("tick", &self.tick)
            .field("pipeline", &self.pipeline)
            .field("consecutive_failures", &self.consecutive_failures)
            .field("disabled", &self.disabled)
            .finish_non_exhaustive()
    }
}

/// Overwrite cell `i` with `id`, zeroing everything but temperature.
fn stamp(buf: &mut CellBuffer, i: usize, id: MaterialId) {
    buf.mat[i] = id;
    buf.vel_x[i] = 0;
    buf.vel_y[i] = 0;
    buf.pressure[i] = 0;
    buf.impulse[i] = 0;
    buf.aux[i] = 0;
    buf.humidity[i] = 0;
    buf.phase[i] = 0.0;
}

#[cfg(test)]
mod tests {
    use super::*;
    use kiln_material::presets::{FIRE, ICE, LAVA, OIL, SAND, STONE, WATER, WOOD};

    fn engine(w: u32, h: u32) -> Engine {
        Engine::new(EngineConfig::new(w, h).with_seed(7)).unwrap()
    }

    #[test]
    fn new_engine_is_ambient_and_fully_dirty() {
        let e = engine(10, 10);
        assert!(e.front().mat.iter().all(|m| m.is_empty()));
        assert!(e.front().temp.iter().all(|&t| t == AMBIENT_TEMPERATURE_C));
        assert_eq!(e.dirty().len(), 1);
        assert_eq!(e.tick(), TickId(0));
    }

    #[test]
    fn step_advances_tick_and_records_every_pass() {
        let mut e = engine(10, 10);
        let m = e.step().unwrap();
        assert_eq!(m.tick, TickId(1));
        assert_eq!(m.pass_us.len(), 9);
        assert_eq!(m.pass_us[0].0, "pressure");
        assert_eq!(m.pass_us[8].0, "thermal");
        assert_eq!(e.tick(), TickId(1));
    }

    #[test]
    fn paint_clips_to_the_grid() {
        let mut e = engine(6, 6);
        e.paint(0, 0, STONE, 2).unwrap();
        let painted = e.front().mat.iter().filter(|&&m| m == STONE).count();
        // Quarter disk of radius 2 at the corner: (0..=2, 0..=2) with dx²+dy² <= 4.
        assert_eq!(painted, 6);
    }

    #[test]
    fn paint_applies_material_temperatures() {
        let mut e = engine(12, 12);
        e.paint(3, 3, LAVA, 0).unwrap();
        e.paint(5, 3, WATER, 0).unwrap();
        e.paint(8, 8, ICE, 0).unwrap();
        assert_eq!(e.sample(3, 3).unwrap().temp, 800.0);
        assert_eq!(e.sample(5, 3).unwrap().temp, 20.0);
        assert_eq!(e.sample(8, 8).unwrap().temp, -5.0);
        assert_eq!(e.sample(7, 7).unwrap().temp, 0.0);
        assert_eq!(e.sample(9, 9).unwrap().temp, 0.0);
        assert_eq!(e.sample(10, 8).unwrap().temp, 20.0);
    }

    #[test]
    fn hot_water_is_capped() {
        let mut e = engine(8, 8);
        e.paint(3, 3, LAVA, 0).unwrap();
        e.paint(3, 3, WATER, 0).unwrap();
        assert_eq!(e.sample(3, 3).unwrap().temp, 25.0);
    }

    #[test]
    fn painted_fire_remembers_its_fuel() {
        let mut e = engine(8, 8);
        e.paint(2, 2, OIL, 0).unwrap();
        e.paint(4, 2, WOOD, 0).unwrap();
        e.paint(2, 2, FIRE, 0).unwrap();
        e.paint(4, 2, FIRE, 0).unwrap();
        e.paint(6, 2, FIRE, 0).unwrap();
        assert_eq!(e.sample(2, 2).unwrap().vel_x, FuelOrigin::Oil.code());
        assert_eq!(e.sample(4, 2).unwrap().vel_x, FuelOrigin::Wood.code());
        assert_eq!(e.sample(6, 2).unwrap().vel_x, FuelOrigin::Unknown.code());
        assert_eq!(e.sample(6, 2).unwrap().temp, 420.0);
    }

    #[test]
    fn paint_rejects_unknown_material() {
        let mut e = engine(8, 8);
        let before = e.snapshot_hash();
        let err = e.paint(3, 3, MaterialId(999), 1).unwrap_err();
        assert_eq!(
            err,
            EditError::Registry(RegistryError::UnknownId {
                id: MaterialId(999)
            })
        );
        assert_eq!(e.snapshot_hash(), before);
    }

    #[test]
    fn erase_with_empty() {
        let mut e = engine(8, 8);
        e.paint(3, 3, SAND, 1).unwrap();
        e.paint(3, 3, MaterialId::EMPTY, 1).unwrap();
        assert!(e.front().mat.iter().all(|m| m.is_empty()));
    }

    #[test]
    fn mark_dirty_ignores_out_of_bounds() {
        let mut e = Engine::new(EngineConfig::new(16, 16).with_chunk_size(4)).unwrap();
        e.take_dirty();
        e.mark_dirty(-1, 3);
        e.mark_dirty(16, 0);
        assert!(e.dirty().is_empty());
        e.mark_dirty(5, 9);
        assert!(e.dirty().contains(ChunkKey::new(1, 2)));
        assert_eq!(e.take_dirty().len(), 1);
        assert!(e.dirty().is_empty());
    }

    #[test]
    fn clear_resets_to_ambient() {
        let mut e = engine(8, 8);
        e.paint(3, 3, LAVA, 2).unwrap();
        e.take_dirty();
        e.clear();
        assert!(e.front().mat.iter().all(|m| m.is_empty()));
        assert!(e.front().temp.iter().all(|&t| t == AMBIENT_TEMPERATURE_C));
        assert!(!e.dirty().is_empty());
    }

    #[test]
    fn sample_out_of_bounds_is_none() {
        let e = engine(8, 8);
        assert!(e.sample(8, 0).is_none());
        assert!(e.sample(0, -1).is_none());
        assert!(e.sample(7, 7).is_some());
    }
}
