//! The default pass list driven through a real engine.

use kiln_core::AMBIENT_TEMPERATURE_C;
use kiln_engine::{Engine, EngineConfig};
use kiln_material::presets::{
    ACID, ASH, BEDROCK, BOMB, EMBER, FIRE, RUBBLE, SMOKE, STONE, WOOD,
};
use kiln_passes::constants::{ACID_ETCH_GAIN, ACID_ETCH_THRESHOLD, BOMB_FUSE_FRAMES};
use kiln_test_utils::{count, TileMap};

const T: f32 = AMBIENT_TEMPERATURE_C;

fn engine(map: &TileMap, config: EngineConfig) -> Engine {
    let mut e = Engine::new(config).unwrap();
    e.load_tiles(map.tiles()).unwrap();
    e
}

fn bomb_on_a_floor() -> TileMap {
    let mut map = TileMap::new(24, 24);
    map.rect((1, 21), (22, 22), STONE, T)
        .set(12, 20, BOMB, T)
        .set(15, 20, BEDROCK, T);
    map
}

#[test]
fn default_engine_runs_every_pass_in_order() {
    let e = Engine::new(EngineConfig::new(16, 16)).unwrap();
    assert_eq!(
        e.pass_names(),
        [
            "pressure", "powder", "liquid", "gas", "solid", "energy", "objects", "acid",
            "thermal"
        ]
    );
}

#[test]
fn bomb_on_a_floor_explodes_after_its_fuse() {
    let map = bomb_on_a_floor();
    let mut e = engine(&map, EngineConfig::new(24, 24).with_seed(8));
    e.run(BOMB_FUSE_FRAMES as usize - 1).unwrap();
    assert_eq!(count(e.front(), BOMB), 1);

    e.step().unwrap();
    assert_eq!(count(e.front(), BOMB), 0);
    assert!(count(e.front(), FIRE) + count(e.front(), SMOKE) > 0);
    assert_eq!(e.sample(15, 20).unwrap().mat, BEDROCK);
    let peak = e.front().impulse.iter().copied().max().unwrap();
    assert!(peak > 100, "peak impulse {peak}");

    e.run(120).unwrap();
    let later = e.front().impulse.iter().copied().max().unwrap();
    assert!(later < peak / 4, "impulse still {later}");
}

#[test]
fn longer_steps_burn_the_fuse_faster() {
    let map = bomb_on_a_floor();
    let mut e = engine(&map, EngineConfig::new(24, 24).with_dt(2.0 / 60.0));
    e.run(BOMB_FUSE_FRAMES as usize / 2 - 1).unwrap();
    assert_eq!(count(e.front(), BOMB), 1);
    e.step().unwrap();
    assert_eq!(count(e.front(), BOMB), 0);
}

#[test]
fn acid_in_a_pit_etches_its_walls_then_vents() {
    let mut map = TileMap::new(12, 12);
    map.rect((1, 7), (10, 10), STONE, T).set(5, 7, ACID, T);
    let mut e = engine(&map, EngineConfig::new(12, 12));
    let steps = ACID_ETCH_THRESHOLD.div_ceil(ACID_ETCH_GAIN as u16) as usize;

    e.run(steps - 1).unwrap();
    assert_eq!(count(e.front(), RUBBLE), 0);
    assert_eq!(e.sample(5, 7).unwrap().mat, ACID);

    e.step().unwrap();
    assert_eq!(count(e.front(), RUBBLE), 3);
    assert_eq!(count(e.front(), ACID), 0);
    assert_eq!(e.sample(5, 7).unwrap().mat, SMOKE);
}

#[test]
fn burning_wood_leaves_residue() {
    let mut map = TileMap::new(20, 20);
    map.rect((1, 17), (18, 18), STONE, T)
        .rect((7, 12), (12, 16), WOOD, T);
    let mut e = engine(&map, EngineConfig::new(20, 20).with_seed(99));
    let wood = count(e.front(), WOOD);
    e.paint(9, 11, FIRE, 1).unwrap();
    e.run(900).unwrap();

    assert!(count(e.front(), WOOD) < wood);
    let residue = [ASH, EMBER, FIRE, SMOKE]
        .iter()
        .map(|&m| count(e.front(), m))
        .sum::<usize>();
    assert!(residue > 0);
}
