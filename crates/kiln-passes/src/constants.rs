//! Tuned constants shared by the passes.
//!
//! These are pacing knobs, not physical quantities. "Per frame" means per
//! 60 Hz frame; passes scale them by the step's frame count.

// ── Pressure / impulse ──────────────────────────────────────────

/// Multiplicative decay of static pressure per frame.
pub const STATIC_PRESSURE_DECAY: f32 = 0.95;
/// Multiplicative decay of impulse per frame.
pub const IMPULSE_DECAY: f32 = 0.8;
/// Weight of the 4-neighbour average in the smoothing blend.
pub const PRESSURE_DIFFUSION_ALPHA: f32 = 0.05;
/// Fraction of impulse folded into the effective pressure.
pub const IMPULSE_BLEND_FACTOR: f32 = 0.6;
/// Pressure drop from the cell below to a gas cell.
pub const GAS_PRESSURE_DROP: i32 = 1;

// ── Powder ──────────────────────────────────────────────────────

/// Slip lost at full humidity.
pub const WET_SLIP_PENALTY: f32 = 0.4;
/// Slip gained per gas neighbour moving away from the grain.
pub const WIND_SLIP_BONUS: f32 = 0.1;

// ── Liquid ──────────────────────────────────────────────────────

/// Density gap above which immiscible liquids still exchange places.
pub const IMMISCIBLE_DENSITY_GAP: f32 = 1.5;
/// Chance that immiscible liquids exchange places anyway.
pub const IMMISCIBLE_SWAP_CHANCE: f32 = 0.2;
/// A side must have a pressure stack this much lower to be preferred.
pub const SPILL_PRESSURE_MARGIN: i32 = 2;
/// Lateral search radius at zero viscosity.
pub const MAX_SPREAD: f32 = 3.0;
/// Humidity added to neighbours by water each step.
pub const WATER_WETTING: u8 = 12;
/// Humidity added to neighbours by foam each step.
pub const FOAM_WETTING: u8 = 6;
/// Humidity added to neighbours by acid each step.
pub const ACID_WETTING: u8 = 4;
/// Temperature lava adds to a flammable neighbour each step.
pub const LAVA_PREHEAT_STEP_C: f32 = 3.0;
/// Lava preheating never pushes a neighbour above this.
pub const LAVA_PREHEAT_MAX_C: f32 = 400.0;
/// Water at or above this flashes against lava immediately.
pub const WATER_LAVA_FLASH_TEMP_C: f32 = 80.0;
/// Per-step chance that cooler water reacts with lava.
pub const WATER_LAVA_REACT_CHANCE: f32 = 0.05;
/// Temperature floor of stone produced by water meeting lava.
pub const QUENCH_STONE_MIN_C: f32 = 200.0;
/// Temperature floor of steam produced by water meeting lava.
pub const QUENCH_STEAM_MIN_C: f32 = 110.0;
/// Radius of the impulse burst from a water-lava reaction.
pub const QUENCH_BURST_RADIUS: i32 = 2;

// ── Gas ─────────────────────────────────────────────────────────

/// Gas above this temperature gains buoyancy.
pub const BUOYANCY_START_C: f32 = 100.0;
/// Degrees above [`BUOYANCY_START_C`] per unit of buoyancy boost.
pub const BUOYANCY_SPAN_C: f32 = 100.0;
/// Cap on the buoyancy boost.
pub const BUOYANCY_MAX: f32 = 2.0;
/// Base chance that gas trapped under liquid bubbles up.
pub const BUBBLE_BASE_CHANCE: f32 = 0.25;
/// Bubble chance added per unit of buoyancy boost.
pub const BUBBLE_BOOST_GAIN: f32 = 0.12;
/// Degrees above [`BUOYANCY_START_C`] per unit of extra bubble chance.
pub const BUBBLE_HEAT_SPAN_C: f32 = 150.0;
/// Cap on the extra bubble chance from heat.
pub const BUBBLE_HEAT_MAX: f32 = 0.5;
/// Base chance that non-steam gas rises straight up.
pub const RISE_BASE_CHANCE: f32 = 0.3;
/// Straight-rise chance added per unit of buoyancy boost.
pub const RISE_BOOST_GAIN: f32 = 0.15;
/// Cap on the straight-rise chance.
pub const RISE_MAX_CHANCE: f32 = 0.9;
/// Base chance of a diagonal rise.
pub const DIAGONAL_RISE_CHANCE: f32 = 0.5;
/// Diagonal-rise chance added per unit of buoyancy boost.
pub const DIAGONAL_BOOST_GAIN: f32 = 0.2;
/// Gas hotter than this drifts right more often than left.
pub const HOT_DRIFT_TEMP_C: f32 = 110.0;
/// Chance that hot gas drifts right.
pub const HOT_DRIFT_BIAS: f32 = 0.6;
/// Per-step chance that smoke vanishes.
pub const SMOKE_DISSIPATION_CHANCE: f32 = 0.015;
/// Cap on the extra dissipation chance from enclosing pressure.
pub const SMOKE_PRESSURE_DISSIPATION_CAP: f32 = 0.03;
/// Effective pressure per unit of extra smoke dissipation chance.
pub const SMOKE_PRESSURE_DISSIPATION_SCALE: f32 = 4000.0;
/// Minimum effective-pressure drop for a vent move.
pub const VENT_MIN_DROP: i32 = 2;
/// Base chance of a vent move.
pub const VENT_CHANCE: f32 = 0.1;
/// Vent chance added per unit of buoyancy boost.
pub const VENT_BOOST_GAIN: f32 = 0.05;

// ── Objects ─────────────────────────────────────────────────────

/// Bomb fuse length in frames.
pub const BOMB_FUSE_FRAMES: u16 = 180;
/// Bomb blast radius in cells.
pub const BOMB_RADIUS: i32 = 8;
/// Blast temperature floor.
pub const BLAST_TEMP_C: f32 = 300.0;
/// Fraction of the radius inside which the blast leaves fire.
pub const BLAST_FIRE_FRACTION: f32 = 0.6;
/// Fraction of the radius beyond which solids may shatter.
pub const BLAST_SHRAPNEL_FRACTION: f32 = 0.5;
/// Chance that a solid in the shrapnel ring becomes rubble.
pub const BLAST_RUBBLE_CHANCE: f32 = 0.05;
/// Heat a meteor adds to each neighbour per step.
pub const METEOR_HEAT_C: f32 = 2.0;

// ── Fire ────────────────────────────────────────────────────────

/// Fire cells never drop below this.
pub const FIRE_MIN_TEMP_C: f32 = 420.0;
/// Neighbours are heated to the fire temperature minus this.
pub const FIRE_NEIGHBOR_HEAT_DROP_C: f32 = 150.0;
/// Margin above combustion temperature that ignites without a roll.
pub const IGNITION_DETERMINISTIC_MARGIN_C: f32 = 60.0;
/// Per-step ignition chance of an adjacent flammable cell.
pub const BASE_IGNITION_CHANCE: f32 = 0.04;
/// Ignition suppression per foam cell around the fuel.
pub const FOAM_HALO_PER_NEIGHBOR: f32 = 0.25;
/// Cap on foam-halo suppression.
pub const FOAM_HALO_MAX: f32 = 0.9;
/// Ignition suppression at full humidity.
pub const HUMIDITY_IGNITION_REDUCTION: f32 = 0.8;
/// Divisor turning degrees above combustion into ignition chance.
pub const TEMP_IGNITION_BOOST_DIVISOR: f32 = 400.0;
/// Cap on the temperature ignition bonus.
pub const TEMP_IGNITION_BOOST_CAP: f32 = 0.3;
/// Ignition bonus per oil cell adjacent to burning oil.
pub const OIL_CHAIN_BONUS_PER: f32 = 0.05;
/// Cap on the oil chain bonus.
pub const OIL_CHAIN_BONUS_CAP: f32 = 0.15;
/// Chance of a smoke puff per empty cell around a fresh ignition.
pub const IGNITION_SMOKE_CHANCE: f32 = 0.1;
/// Chance of a smoke puff per empty cell around a wood fire.
pub const WOOD_SMOKE_CHANCE: f32 = 0.02;
/// Fire life in frames for wood fuel.
pub const FIRE_LIFE_WOOD: u16 = 240;
/// Fire life in frames for oil fuel.
pub const FIRE_LIFE_OIL: u16 = 90;
/// Fire life in frames for unknown fuel.
pub const FIRE_LIFE_DEFAULT: u16 = 120;
/// Neighbours below this count as cold.
pub const FIRE_COLD_NEIGHBOR_C: f32 = 60.0;
/// Cold neighbours needed to speed up burnout.
pub const FIRE_COLD_NEIGHBOR_COUNT: usize = 2;
/// Extra life lost per step by fire with nothing left to burn.
pub const FIRE_STARVED_BURN: u16 = 2;
/// Oil fire burns out into smoke clamped to this range.
pub const BURNOUT_SMOKE_MIN_C: f32 = 60.0;
/// See [`BURNOUT_SMOKE_MIN_C`].
pub const BURNOUT_SMOKE_MAX_C: f32 = 200.0;
/// Burnt-out ember temperature cap.
pub const BURNOUT_EMBER_MAX_C: f32 = 260.0;
/// Chance a wood burnout drops ash into an empty neighbour.
pub const BURNOUT_ASH_CHANCE: f32 = 0.3;
/// Quenched wood fire becomes ember capped at this temperature.
pub const QUENCH_WOOD_CAP_C: f32 = 200.0;
/// Quenched oil fire becomes smoke capped at this temperature.
pub const QUENCH_OIL_CAP_C: f32 = 120.0;
/// Quenched fire of unknown origin becomes smoke capped at this temperature.
pub const QUENCH_DEFAULT_CAP_C: f32 = 150.0;
/// Temperature floor of steam raised by quenching.
pub const QUENCH_STEAM_FLOOR_C: f32 = 100.0;
/// Foam smothers fire unconditionally below this.
pub const FOAM_SMOTHER_MAX_C: f32 = 900.0;
/// Chance foam still smothers hotter fire.
pub const FOAM_SMOTHER_HOT_CHANCE: f32 = 0.3;
/// Temperature cap of fire smothered into foam.
pub const FOAM_SMOTHER_TEMP_C: f32 = 90.0;
/// Dust neighbours needed for a flash.
pub const DUST_FLASH_COUNT: usize = 2;
/// Per-step chance of a dust flash.
pub const DUST_FLASH_CHANCE: f32 = 0.2;
/// Impulse at the fire cell of a dust flash.
pub const DUST_FLASH_IMPULSE_CENTER: i16 = 60;
/// Impulse on the neighbours of a dust flash.
pub const DUST_FLASH_IMPULSE_NEIGHBOR: i16 = 30;

// ── Ember ───────────────────────────────────────────────────────

/// Ember life in frames.
pub const EMBER_LIFE: u16 = 300;
/// Warm floor of a fresh ember; scales down with remaining life.
pub const EMBER_WARM_FLOOR_C: f32 = 180.0;
/// Neighbours are warmed to the ember temperature minus this.
pub const EMBER_NEIGHBOR_DROP_C: f32 = 60.0;
/// An ember above this next to fuel becomes fire again.
pub const EMBER_REIGNITE_C: f32 = 320.0;
/// An ember below this turns to ash.
pub const EMBER_ASH_C: f32 = 80.0;
/// Chance an ember ignites dust beneath it.
pub const EMBER_IGNITE_DUST_CHANCE: f32 = 0.05;
/// Temperature floor of dust lit by an ember.
pub const EMBER_DUST_FIRE_C: f32 = 300.0;
/// Chance an ember crumbles after lighting dust.
pub const EMBER_CRUMBLE_AFTER_IGNITE: f32 = 0.3;
/// Per-step chance an unsupported ember crumbles.
pub const EMBER_FREE_FALL_CRUMBLE: f32 = 0.01;
/// Chance of a diagonal ember slip.
pub const EMBER_SLIP_CHANCE: f32 = 0.4;

// ── Acid ────────────────────────────────────────────────────────

/// Etch budget gained per frame by an adjacent solid at 20 °C.
pub const ACID_ETCH_GAIN: f32 = 4.0;
/// Degrees above ambient that double the etch rate.
pub const ACID_HEAT_SCALE_C: f32 = 200.0;
/// Etch budget at which the solid becomes rubble.
pub const ACID_ETCH_THRESHOLD: u16 = 240;
/// Heat released by an etch.
pub const ACID_ETCH_HEAT_C: f32 = 5.0;
/// Humidity raised on the etched cell.
pub const ACID_ETCH_HUMIDITY: u8 = 30;
/// Etches before the acid vents as smoke.
pub const ACID_SMOKE_AFTER: u16 = 3;

// ── Thermal ─────────────────────────────────────────────────────

/// Conduction coupling per second at unit conductivity.
pub const CONDUCTION_RATE_PER_SEC: f32 = 6.0;
/// Per-pair coupling cap, keeps the exchange from overshooting.
pub const MAX_COUPLING: f32 = 0.2;
/// Per-frame pull toward ambient for empty space.
pub const AMBIENT_RATE_EMPTY: f32 = 0.05;
/// Per-frame pull toward ambient for gases.
pub const AMBIENT_RATE_GAS: f32 = 0.02;
/// Per-frame pull toward ambient for liquids.
pub const AMBIENT_RATE_LIQUID: f32 = 0.004;
/// Per-frame pull toward ambient for powders.
pub const AMBIENT_RATE_POWDER: f32 = 0.003;
/// Per-frame pull toward ambient for solids.
pub const AMBIENT_RATE_SOLID: f32 = 0.002;
/// Per-frame pull toward ambient for fire and embers.
pub const AMBIENT_RATE_ENERGY: f32 = 0.004;
/// Per-frame pull toward ambient for objects.
pub const AMBIENT_RATE_OBJECT: f32 = 0.003;
/// Extra cooling of warm water.
pub const WATER_COOLANT_BOOST: f32 = 0.015;
/// Extra cooling of warm ice.
pub const ICE_COOLANT_BOOST: f32 = 0.03;
/// Extra cooling of warm foam.
pub const FOAM_COOLANT_BOOST: f32 = 0.008;
/// Radiative losses start above this.
pub const RADIATIVE_START_C: f32 = 200.0;
/// Extra cooling rate at `RADIATIVE_START_C + RADIATIVE_SPAN_C`.
pub const RADIATIVE_RATE: f32 = 0.01;
/// See [`RADIATIVE_RATE`].
pub const RADIATIVE_SPAN_C: f32 = 800.0;
/// Lava cooling per second.
pub const LAVA_COOLING_PER_SEC: f32 = 0.15;
/// Lava at or below this accumulates solidification energy.
pub const LAVA_SOLIDIFY_TEMP_C: f32 = 180.0;
/// Energy lava must shed before becoming stone.
pub const LAVA_SOLIDIFY_ENERGY: f32 = 6000.0;
/// Energy to melt or freeze one cell.
pub const LATENT_FUSION_ENERGY: f32 = 4000.0;
/// Per-frame cap on latent energy moved into or out of a cell.
pub const MAX_LATENT_STEP: f32 = 20.0;
/// Cap on the boiling-point rise from pressure.
pub const BOIL_PRESSURE_CAP_C: f32 = 30.0;
/// Boil progress per degree of superheat per frame.
pub const BOIL_PROGRESS_PER_DEGREE: f32 = 2.0;
/// Boil progress that turns water to steam.
pub const BOIL_THRESHOLD: u16 = 600;
/// Steam temperature gained per unit of progress past the threshold.
pub const BOIL_SURPLUS_HEAT: f32 = 0.05;
/// Boil progress lost per frame below the boiling point.
pub const BOIL_DECAY: u16 = 4;
/// Steam condenses below this.
pub const CONDENSE_TEMP_C: f32 = 85.0;
/// Steam must be this old to condense.
pub const CONDENSE_MIN_AGE: u16 = 45;
/// Condensation temperature next to ice or cold solids.
pub const CONDENSE_COLD_TEMP_C: f32 = 95.0;
/// Age requirement next to ice or cold solids.
pub const CONDENSE_COLD_MIN_AGE: u16 = 10;
/// Solids below this count as cold surfaces.
pub const COLD_SURFACE_C: f32 = 30.0;
/// Exposure a flammable cell gains per frame next to lava.
pub const LAVA_IGNITION_GAIN: f32 = 3.0;
/// Exposure at which lava proximity ignites the cell.
pub const LAVA_IGNITION_THRESHOLD: f32 = 120.0;
/// Exposure lost per frame away from lava.
pub const LAVA_EXPOSURE_DECAY: f32 = 1.0;
/// Degrees ice takes from warmer neighbours each step.
pub const ICE_CHILL_C: f32 = 1.5;
/// Rubber becomes smoke at this temperature.
pub const RUBBER_POP_C: f32 = 260.0;
/// Lower bound of the wood charring band.
pub const WOOD_CHAR_MIN_C: f32 = 220.0;
/// Per-step chance that charring wood becomes ash.
pub const WOOD_CHAR_CHANCE: f32 = 0.001;
/// Per-step chance that foam collapses.
pub const FOAM_DECAY_CHANCE: f32 = 0.0005;
/// Collapsing foam above this releases steam instead of smoke.
pub const FOAM_STEAM_C: f32 = 80.0;
/// Sand above this may vitrify.
pub const VITRIFY_C: f32 = 900.0;
/// Per-step chance of vitrification.
pub const VITRIFY_CHANCE: f32 = 0.002;

// ── Humidity ────────────────────────────────────────────────────

/// Humidity lost per step.
pub const HUMIDITY_DECAY: u8 = 1;
/// Chance dust next to water becomes mud.
pub const DUST_TO_MUD_CHANCE: f32 = 0.1;
/// Humidity of freshly made mud.
pub const MUD_HUMIDITY: u8 = 200;
/// Dust at or above this humidity may turn to mud on its own.
pub const DUST_SOAK_HUMIDITY: u8 = 150;
/// Chance that soaked dust turns to mud.
pub const DUST_SOAK_CHANCE: f32 = 0.05;
/// Mud above this wicks moisture into dust; below it, mud may dry.
pub const MUD_WET_HUMIDITY: u8 = 40;
/// Humidity wicked from mud into each dust neighbour.
pub const MUD_WICK: u8 = 3;
/// Chance dry mud turns to sand.
pub const MUD_DRY_CHANCE: f32 = 0.02;
