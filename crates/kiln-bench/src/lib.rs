//! Reference scenes for benchmarking and demos of the Kiln simulator.
//!
//! - [`reference_scene`]: 128x128 grid (16K cells) with every movement
//!   category and the main reactions in play
//! - [`stress_scene`]: 512x256 grid (128K cells) tiled with the same mix
//! - [`scatter_positions`]: deterministic cell placement via seed

#![forbid(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]

use std::collections::HashSet;

use kiln_engine::{ConfigError, EditError, Engine, EngineConfig};
use kiln_material::presets::{
    ACID, BOMB, DUST, FIRE, ICE, LAVA, OIL, SAND, STONE, WATER, WOOD,
};

/// Errors from building a scene.
pub type SceneResult = Result<Engine, Box<dyn std::error::Error>>;

/// Paint one 128x128 tile of the reference mix with its origin at `(ox, oy)`.
fn paint_tile(engine: &mut Engine, ox: i32, oy: i32, seed: u64) -> Result<(), EditError> {
    // Floor and two basins.
    for x in 2..126 {
        engine.paint(ox + x, oy + 120, STONE, 1)?;
    }
    for y in 90..120 {
        engine.paint(ox + 40, oy + y, STONE, 0)?;
        engine.paint(ox + 88, oy + y, STONE, 0)?;
    }
    // Water over lava in the middle basin, oil and wood on the left,
    // sand and dust on the right.
    engine.paint(ox + 64, oy + 112, LAVA, 5)?;
    engine.paint(ox + 64, oy + 80, WATER, 12)?;
    engine.paint(ox + 20, oy + 112, WOOD, 6)?;
    engine.paint(ox + 20, oy + 100, OIL, 5)?;
    engine.paint(ox + 20, oy + 92, FIRE, 1)?;
    engine.paint(ox + 104, oy + 40, SAND, 10)?;
    engine.paint(ox + 112, oy + 20, DUST, 5)?;
    engine.paint(ox + 100, oy + 110, ICE, 4)?;
    engine.paint(ox + 70, oy + 10, ACID, 2)?;

    let scatter = [SAND, WATER, OIL, BOMB];
    for (n, (x, y)) in scatter_positions(120, 60, 24, seed).into_iter().enumerate() {
        let mat = scatter[n % scatter.len()];
        engine.paint(ox + 4 + x as i32, oy + 4 + y as i32, mat, 0)?;
    }
    Ok(())
}

/// Build the reference scene: one 128x128 tile.
pub fn reference_scene(seed: u64) -> SceneResult {
    let mut engine = Engine::new(EngineConfig::new(128, 128).with_seed(seed))?;
    paint_tile(&mut engine, 0, 0, seed)?;
    Ok(engine)
}

/// Build the stress scene: a 4x2 arrangement of reference tiles.
pub fn stress_scene(seed: u64) -> SceneResult {
    let mut engine = Engine::new(EngineConfig::new(512, 256).with_seed(seed))?;
    for ty in 0..2 {
        for tx in 0..4 {
            paint_tile(&mut engine, tx * 128, ty * 128, seed ^ (tx * 2 + ty) as u64)?;
        }
    }
    Ok(engine)
}

/// Build an empty engine of the given size, for per-pass baselines.
pub fn empty_scene(width: u32, height: u32, seed: u64) -> Result<Engine, ConfigError> {
    Engine::new(EngineConfig::new(width, height).with_seed(seed))
}

/// Generate `n` distinct deterministic `(x, y)` positions in a
/// `width x height` box.
pub fn scatter_positions(width: u32, height: u32, n: usize, seed: u64) -> Vec<(u32, u32)> {
    let cells = width as u64 * height as u64;
    let n = n.min(cells as usize);
    let mut taken = HashSet::with_capacity(n);
    let mut out = Vec::with_capacity(n);
    for i in 0..n as u64 {
        let mut pos = seed
            .wrapping_mul(6364136223846793005)
            .wrapping_add(i.wrapping_mul(1442695040888963407))
            % cells;
        // Step linearly past collisions.
        while !taken.insert(pos) {
            pos = (pos + 1) % cells;
        }
        out.push(((pos % width as u64) as u32, (pos / width as u64) as u32));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reference_scene_builds_and_steps() {
        let mut engine = reference_scene(42).unwrap();
        assert_eq!((engine.width(), engine.height()), (128, 128));
        engine.run(5).unwrap();
    }

    #[test]
    fn stress_scene_builds() {
        let engine = stress_scene(42).unwrap();
        assert_eq!(engine.front().len(), 512 * 256);
    }

    #[test]
    fn scenes_are_deterministic() {
        let a = reference_scene(7).unwrap();
        let b = reference_scene(7).unwrap();
        assert_eq!(a.snapshot_hash(), b.snapshot_hash());
    }

    #[test]
    fn scatter_positions_are_distinct_and_in_bounds() {
        let positions = scatter_positions(10, 10, 30, 42);
        assert_eq!(positions.len(), 30);
        let unique: HashSet<_> = positions.iter().copied().collect();
        assert_eq!(unique.len(), 30);
        assert!(positions.iter().all(|&(x, y)| x < 10 && y < 10));
        assert_eq!(positions, scatter_positions(10, 10, 30, 42));
    }

    #[test]
    fn scatter_caps_at_the_box_size() {
        assert_eq!(scatter_positions(3, 3, 50, 1).len(), 9);
    }
}
