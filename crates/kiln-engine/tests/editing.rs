//! Painting, tile loading and width expansion.

use kiln_core::{MaterialId, RegistryError, TickId, AMBIENT_TEMPERATURE_C};
use kiln_engine::{EditError, Engine, EngineConfig};
use kiln_grid::GridError;
use kiln_material::presets::{ACID, ICE, LAVA, SAND, STONE, WATER, WOOD};
use kiln_test_utils::{count, TileMap};
use proptest::prelude::*;

fn engine(w: u32, h: u32) -> Engine {
    Engine::new(EngineConfig::new(w, h).with_seed(5).with_chunk_size(8)).unwrap()
}

/// A grid with busy scratch fields: wood soaking lava exposure, acid
/// etching stone, water wetting sand.
fn warmed() -> Engine {
    let mut map = TileMap::new(24, 24);
    map.rect((2, 20), (21, 22), STONE, AMBIENT_TEMPERATURE_C)
        .set(4, 19, WOOD, 20.0)
        .set(5, 19, LAVA, 900.0)
        .set(6, 19, STONE, 20.0)
        .set(10, 19, ACID, 20.0)
        .rect((12, 17), (16, 19), SAND, 20.0)
        .rect((12, 14), (16, 16), WATER, 20.0)
        .set(18, 19, ICE, -10.0);
    let mut e = engine(24, 24);
    e.load_tiles(map.tiles()).unwrap();
    e.run(30).unwrap();
    e
}

#[test]
fn load_tiles_replaces_the_grid() {
    let mut map = TileMap::new(10, 10);
    map.rect((1, 8), (8, 8), STONE, 20.0).set(4, 7, SAND, 35.0);
    let mut e = engine(10, 10);
    e.paint(5, 5, WATER, 2).unwrap();
    e.take_dirty();
    e.load_tiles(map.tiles()).unwrap();

    assert_eq!(count(e.front(), STONE), 8);
    assert_eq!(count(e.front(), WATER), 0);
    let s = e.sample(4, 7).unwrap();
    assert_eq!((s.mat, s.temp), (SAND, 35.0));
    assert_eq!(e.dirty().len(), 4);
    assert!(e.front().aux.iter().all(|&a| a == 0));
}

#[test]
fn load_tiles_rejects_wrong_size_untouched() {
    let mut e = engine(10, 10);
    e.paint(5, 5, SAND, 1).unwrap();
    let before = e.snapshot_hash();
    let err = e
        .load_tiles(&vec![(MaterialId::EMPTY, 20.0); 99])
        .unwrap_err();
    assert_eq!(
        err,
        EditError::Grid(GridError::SizeMismatch {
            expected: 100,
            got: 99
        })
    );
    assert_eq!(e.snapshot_hash(), before);
}

#[test]
fn load_tiles_rejects_unknown_material_untouched() {
    let mut e = engine(10, 10);
    let before = e.snapshot_hash();
    let mut tiles = vec![(MaterialId::EMPTY, 20.0); 100];
    tiles[42] = (MaterialId(4000), 20.0);
    let err = e.load_tiles(&tiles).unwrap_err();
    assert_eq!(
        err,
        EditError::Registry(RegistryError::UnknownId {
            id: MaterialId(4000)
        })
    );
    assert_eq!(e.snapshot_hash(), before);
}

#[test]
fn expand_width_keeps_rows() {
    let mut e = engine(10, 6);
    e.paint(8, 3, STONE, 0).unwrap();
    e.paint(1, 4, WOOD, 0).unwrap();
    e.run(2).unwrap();
    e.take_dirty();

    assert!(e.expand_width(20));
    assert_eq!((e.width(), e.height()), (20, 6));
    assert_eq!(e.config().width, 20);
    assert_eq!(e.sample(8, 3).unwrap().mat, STONE);
    assert_eq!(e.sample(1, 4).unwrap().mat, WOOD);
    let fresh = e.sample(15, 3).unwrap();
    assert_eq!((fresh.mat, fresh.temp), (MaterialId::EMPTY, 0.0));
    // 20x6 in 8-cell chunks: three columns, one row.
    assert_eq!(e.dirty().len(), 3);
    assert_eq!(e.tick(), TickId(2));

    e.run(5).unwrap();
    assert_eq!(e.sample(8, 3).unwrap().mat, STONE);
}

#[test]
fn expand_width_refuses_to_shrink() {
    let mut e = engine(10, 6);
    let before = e.snapshot_hash();
    assert!(!e.expand_width(10));
    assert!(!e.expand_width(4));
    assert_eq!(e.width(), 10);
    assert_eq!(e.snapshot_hash(), before);
}

#[test]
fn paint_marks_touched_chunks_only() {
    let mut e = engine(32, 32);
    e.take_dirty();
    e.paint(3, 3, SAND, 1).unwrap();
    assert_eq!(e.dirty().len(), 1);
    e.paint(8, 8, SAND, 1).unwrap();
    // The plus-shaped stamp at (8, 8) reaches three more chunks.
    assert_eq!(e.dirty().len(), 4);
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn paint_always_resets_scratch_fields(
        x in 0i32..24,
        y in 0i32..24,
        r in 0u32..5,
        pick in 0usize..7,
    ) {
        let mats = [MaterialId::EMPTY, STONE, WOOD, SAND, WATER, LAVA, ICE];
        let mut e = warmed();
        e.paint(x, y, mats[pick], r).unwrap();
        let buf = e.front();
        let r = r as i32;
        for cy in (y - r).max(0)..=(y + r).min(23) {
            for cx in (x - r).max(0)..=(x + r).min(23) {
                if (cx - x).pow(2) + (cy - y).pow(2) > r * r {
                    continue;
                }
                let i = e.index(cx, cy).unwrap();
                prop_assert_eq!(buf.mat[i], mats[pick]);
                prop_assert_eq!(buf.aux[i], 0);
                prop_assert_eq!(buf.humidity[i], 0);
                prop_assert_eq!(buf.phase[i], 0.0);
                prop_assert_eq!(buf.pressure[i], 0);
                prop_assert_eq!(buf.impulse[i], 0);
            }
        }
    }
}
