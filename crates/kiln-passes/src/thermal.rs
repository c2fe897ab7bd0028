//! Heat conduction and temperature-driven reactions.
//!
//! The pass runs in two phases over the write buffer:
//!
//! 1. **Conduction.** Every interior cell exchanges heat with its right
//!    and down neighbours. The exchanged energy is split by thermal mass,
//!    so the exchange is antisymmetric and conserves energy to first
//!    order.
//! 2. **Reactions.** Ambient and radiative cooling, latent fusion,
//!    boiling, condensation, ignition, humidity, and per-material
//!    terminal transitions, visited top-down once all conduction is done.
//!
//! Scratch usage: `phase` is the latent-heat accumulator (positive while
//! ice melts or lava solidifies, negative while water freezes) and the
//! lava-exposure budget of flammable cells; `aux` is boil progress for
//! water, age for steam and life for embers. Flammable cells leave `aux`
//! to the acid etch budget.

use kiln_core::{
    Category, CellField, FuelOrigin, MaterialId, MaterialKind, PassError, AMBIENT_TEMPERATURE_C,
};
use kiln_material::PropertyCache;
use kiln_pass::{Pass, PassContext};

use crate::cells::{ignite, transmute, Area};
use crate::constants::{
    AMBIENT_RATE_EMPTY, AMBIENT_RATE_ENERGY, AMBIENT_RATE_GAS, AMBIENT_RATE_LIQUID,
    AMBIENT_RATE_OBJECT, AMBIENT_RATE_POWDER, AMBIENT_RATE_SOLID, BOIL_DECAY,
    BOIL_PRESSURE_CAP_C, BOIL_PROGRESS_PER_DEGREE, BOIL_SURPLUS_HEAT, BOIL_THRESHOLD,
    COLD_SURFACE_C, CONDENSE_COLD_MIN_AGE, CONDENSE_COLD_TEMP_C, CONDENSE_MIN_AGE,
    CONDENSE_TEMP_C, CONDUCTION_RATE_PER_SEC, DUST_SOAK_CHANCE, DUST_SOAK_HUMIDITY,
    DUST_TO_MUD_CHANCE, EMBER_ASH_C, EMBER_LIFE, EMBER_NEIGHBOR_DROP_C, EMBER_REIGNITE_C,
    EMBER_WARM_FLOOR_C, FOAM_COOLANT_BOOST, FOAM_DECAY_CHANCE, FOAM_STEAM_C, HUMIDITY_DECAY,
    ICE_CHILL_C, ICE_COOLANT_BOOST, LATENT_FUSION_ENERGY, LAVA_COOLING_PER_SEC,
    LAVA_EXPOSURE_DECAY, LAVA_IGNITION_GAIN, LAVA_IGNITION_THRESHOLD, LAVA_PREHEAT_MAX_C,
    LAVA_PREHEAT_STEP_C, LAVA_SOLIDIFY_ENERGY, LAVA_SOLIDIFY_TEMP_C,
    MAX_COUPLING, MAX_LATENT_STEP, MUD_DRY_CHANCE, MUD_HUMIDITY, MUD_WET_HUMIDITY, MUD_WICK,
    RADIATIVE_RATE, RADIATIVE_SPAN_C, RADIATIVE_START_C, RUBBER_POP_C, VITRIFY_C,
    VITRIFY_CHANCE, WATER_COOLANT_BOOST, WOOD_CHAR_CHANCE, WOOD_CHAR_MIN_C,
};

/// Conduction plus every temperature-driven transition. Runs last.
#[derive(Clone, Copy, Debug, Default)]
pub struct ThermalPass;

/// Byproduct ids resolved once per step.
struct Roles {
    water: Option<MaterialId>,
    ice: Option<MaterialId>,
    steam: Option<MaterialId>,
    stone: Option<MaterialId>,
    smoke: Option<MaterialId>,
    fire: Option<MaterialId>,
    ash: Option<MaterialId>,
    glass: Option<MaterialId>,
    mud: Option<MaterialId>,
    sand: Option<MaterialId>,
}

impl Roles {
    fn of(props: &PropertyCache) -> Self {
        Self {
            water: props.role(MaterialKind::Water),
            ice: props.role(MaterialKind::Ice),
            steam: props.role(MaterialKind::Steam),
            stone: props.role(MaterialKind::Stone),
            smoke: props.role(MaterialKind::Smoke),
            fire: props.role(MaterialKind::Fire),
            ash: props.role(MaterialKind::Ash),
            glass: props.role(MaterialKind::Glass),
            mud: props.role(MaterialKind::Mud),
            sand: props.role(MaterialKind::Sand),
        }
    }
}

/// Per-frame fraction of the gap to ambient closed by cooling.
fn ambient_rate(props: &PropertyCache, id: MaterialId, t: f32) -> f32 {
    let mut rate = match props.category(id) {
        None => AMBIENT_RATE_EMPTY,
        Some(Category::Gas) => AMBIENT_RATE_GAS,
        Some(Category::Liquid) => AMBIENT_RATE_LIQUID,
        Some(Category::Powder) => AMBIENT_RATE_POWDER,
        Some(Category::Solid) => AMBIENT_RATE_SOLID,
        Some(Category::Energy) => AMBIENT_RATE_ENERGY,
        Some(Category::Object) => AMBIENT_RATE_OBJECT,
    };
    if t > AMBIENT_TEMPERATURE_C {
        rate += match props.kind(id) {
            MaterialKind::Water => WATER_COOLANT_BOOST,
            MaterialKind::Ice => ICE_COOLANT_BOOST,
            MaterialKind::Foam => FOAM_COOLANT_BOOST,
            _ => 0.0,
        };
    }
    if t > RADIATIVE_START_C {
        rate += RADIATIVE_RATE * (t - RADIATIVE_START_C) / RADIATIVE_SPAN_C;
    }
    rate.clamp(0.0, 1.0)
}

fn has_neighbour(
    ctx: &PassContext<'_>,
    area: Area,
    i: usize,
    pred: impl Fn(MaterialId, f32) -> bool,
) -> bool {
    area.interior_neighbours(i)
        .into_iter()
        .any(|j| pred(ctx.write.mat[j], ctx.write.temp[j]))
}

impl ThermalPass {
    fn conduct(ctx: &mut PassContext<'_>, area: Area) {
        let props = ctx.props;
        let rate = CONDUCTION_RATE_PER_SEC * ctx.dt() as f32;
        let write = &mut *ctx.write;
        for y in area.rows_down() {
            for x in 1..area.w - 1 {
                let a = area.idx(x, y);
                for b in [a + 1, a + area.w] {
                    if !area.interior(b) {
                        continue;
                    }
                    let (ma, mb) = (write.mat[a], write.mat[b]);
                    let k = 0.5 * (props.conductivity(ma) + props.conductivity(mb));
                    let coupling = (k * rate).min(MAX_COUPLING);
                    let q = (write.temp[a] - write.temp[b]) * coupling;
                    write.temp[a] -= q / props.thermal_mass(ma);
                    write.temp[b] += q / props.thermal_mass(mb);
                }
            }
        }
    }

    /// Lava preheats its neighbours and builds an exposure budget in the
    /// flammable ones, then cools slowly, and solidifies once it has shed
    /// enough energy below the solidification temperature.
    fn lava(ctx: &mut PassContext<'_>, area: Area, i: usize, roles: &Roles, frames: f32) {
        let props = ctx.props;
        let ceiling = ctx.write.temp[i].min(LAVA_PREHEAT_MAX_C);
        for j in area.interior_neighbours(i) {
            let tj = &mut ctx.write.temp[j];
            if *tj < ceiling {
                *tj = (*tj + LAVA_PREHEAT_STEP_C * frames).min(ceiling);
            }
            let fuel = ctx.write.mat[j];
            if !props.flammable(fuel) {
                continue;
            }
            let Some(fire) = roles.fire else { continue };
            let exposure = ctx.write.phase[j] + LAVA_IGNITION_GAIN * frames;
            ctx.write.phase[j] = exposure;
            if exposure >= LAVA_IGNITION_THRESHOLD {
                let origin = FuelOrigin::of_kind(props.kind(fuel));
                ignite(ctx.write, ctx.dirty, area, j, fire, origin);
            }
        }

        let keep = (1.0 - LAVA_COOLING_PER_SEC * ctx.dt() as f32).clamp(0.0, 1.0);
        let t = AMBIENT_TEMPERATURE_C + (ctx.write.temp[i] - AMBIENT_TEMPERATURE_C) * keep;
        ctx.write.temp[i] = t;
        if t > LAVA_SOLIDIFY_TEMP_C {
            return;
        }
        let shed = ctx.write.phase[i] + (LAVA_SOLIDIFY_TEMP_C - t + 1.0) * frames;
        ctx.write.phase[i] = shed;
        if shed >= LAVA_SOLIDIFY_ENERGY {
            if let Some(stone) = roles.stone {
                transmute(ctx.write, ctx.dirty, area, i, stone);
            }
        }
    }

    /// Ice above its melting point banks heat in `phase`, held at the
    /// melting point, and melts once the bank is full.
    fn ice(ctx: &mut PassContext<'_>, area: Area, i: usize, roles: &Roles, frames: f32) {
        let props = ctx.props;
        for j in area.interior_neighbours(i) {
            let tj = &mut ctx.write.temp[j];
            if *tj > AMBIENT_TEMPERATURE_C {
                *tj = (*tj - ICE_CHILL_C).max(AMBIENT_TEMPERATURE_C);
            }
        }

        let id = ctx.write.mat[i];
        let mp = props.melting_point(id).unwrap_or(0.0);
        let t = ctx.write.temp[i];
        if t <= mp {
            return;
        }
        let mass = props.thermal_mass(id);
        let take = ((t - mp) * mass).min(MAX_LATENT_STEP * frames);
        let bank = ctx.write.phase[i] + take;
        ctx.write.phase[i] = bank;
        if bank < LATENT_FUSION_ENERGY {
            ctx.write.temp[i] = mp;
            return;
        }
        let Some(water) = roles.water else { return };
        let t = t - take / mass;
        transmute(ctx.write, ctx.dirty, area, i, water);
        let surplus = (bank - LATENT_FUSION_ENERGY) / props.thermal_mass(water);
        ctx.write.temp[i] = t + surplus;
    }

    /// Water below freezing banks cold in a negative `phase`; above its
    /// pressure-adjusted boiling point it accumulates boil progress.
    fn water(ctx: &mut PassContext<'_>, area: Area, i: usize, roles: &Roles, frames: f32) {
        let props = ctx.props;
        let whole = ctx.info().whole_frames();
        let id = ctx.write.mat[i];
        let t = ctx.write.temp[i];
        let mass = props.thermal_mass(id);

        if let Some(fp) = props.freezing_point(id) {
            if t < fp {
                let take = ((fp - t) * mass).min(MAX_LATENT_STEP * frames);
                let bank = ctx.write.phase[i] - take;
                ctx.write.phase[i] = bank;
                ctx.write.temp[i] = t + take / mass;
                if bank <= -LATENT_FUSION_ENERGY {
                    if let Some(ice) = roles.ice {
                        let t = ctx.write.temp[i];
                        transmute(ctx.write, ctx.dirty, area, i, ice);
                        let surplus = (-bank - LATENT_FUSION_ENERGY) / props.thermal_mass(ice);
                        ctx.write.temp[i] = t - surplus;
                    }
                }
                return;
            }
        }

        let Some(bp) = props.boiling_point(id) else { return };
        let head = (ctx.write.pressure[i].max(0) as f32).sqrt().min(BOIL_PRESSURE_CAP_C);
        let boil_at = bp + head;
        if t <= boil_at {
            ctx.write.aux[i] = ctx.write.aux[i].saturating_sub(BOIL_DECAY * whole);
            return;
        }
        let superheat = t - boil_at;
        let gain = (superheat * BOIL_PROGRESS_PER_DEGREE * frames).ceil() as u16;
        let progress = ctx.write.aux[i].saturating_add(gain);
        ctx.write.aux[i] = progress;
        if progress < BOIL_THRESHOLD {
            return;
        }
        if let Some(steam) = roles.steam {
            transmute(ctx.write, ctx.dirty, area, i, steam);
            let surplus = (progress - BOIL_THRESHOLD) as f32 * BOIL_SURPLUS_HEAT;
            ctx.write.temp[i] = boil_at + superheat + surplus;
        }
    }

    /// Steam ages, then condenses once cool; cold surroundings shorten
    /// the wait and raise the condensation temperature.
    fn steam(ctx: &mut PassContext<'_>, area: Area, i: usize, roles: &Roles) {
        let props = ctx.props;
        let age = ctx.write.aux[i].saturating_add(ctx.info().whole_frames());
        ctx.write.aux[i] = age;
        let Some(water) = roles.water else { return };
        let t = ctx.write.temp[i];
        let settled = t < CONDENSE_TEMP_C && age >= CONDENSE_MIN_AGE;
        let chilled = t < CONDENSE_COLD_TEMP_C
            && age >= CONDENSE_COLD_MIN_AGE
            && has_neighbour(ctx, area, i, |m, tj| {
                props.kind(m) == MaterialKind::Ice
                    || (props.is(m, Category::Solid) && tj < COLD_SURFACE_C)
            });
        if settled || chilled {
            transmute(ctx.write, ctx.dirty, area, i, water);
        }
    }

    fn ember(ctx: &mut PassContext<'_>, area: Area, i: usize, roles: &Roles) {
        let props = ctx.props;
        let mut life = ctx.write.aux[i];
        if life == 0 {
            life = EMBER_LIFE;
        }
        life = life.saturating_sub(ctx.info().whole_frames());
        ctx.write.aux[i] = life;

        let floor = EMBER_WARM_FLOOR_C * life as f32 / EMBER_LIFE as f32;
        let t = ctx.write.temp[i].max(floor);
        ctx.write.temp[i] = t;
        for j in area.interior_neighbours(i) {
            let tj = &mut ctx.write.temp[j];
            *tj = tj.max(t - EMBER_NEIGHBOR_DROP_C);
        }

        if t > EMBER_REIGNITE_C && has_neighbour(ctx, area, i, |m, _| props.flammable(m)) {
            if let Some(fire) = roles.fire {
                ignite(ctx.write, ctx.dirty, area, i, fire, FuelOrigin::Unknown);
                return;
            }
        }
        if life == 0 || t < EMBER_ASH_C {
            if let Some(ash) = roles.ash {
                transmute(ctx.write, ctx.dirty, area, i, ash);
            }
        }
    }

    fn foam(ctx: &mut PassContext<'_>, area: Area, i: usize, roles: &Roles) {
        if !ctx.rng.chance(FOAM_DECAY_CHANCE) {
            return;
        }
        let Some(water) = roles.water else { return };
        let t = ctx.write.temp[i];
        transmute(ctx.write, ctx.dirty, area, i, water);
        let bubble = if t > FOAM_STEAM_C { roles.steam } else { roles.smoke };
        let Some(bubble) = bubble else { return };
        let free = area
            .interior_neighbours(i)
            .into_iter()
            .find(|&j| ctx.write.mat[j].is_empty());
        if let Some(j) = free {
            transmute(ctx.write, ctx.dirty, area, j, bubble);
            ctx.write.temp[j] = t;
        }
    }

    fn dust(ctx: &mut PassContext<'_>, area: Area, i: usize, roles: &Roles) {
        let Some(mud) = roles.mud else { return };
        let props = ctx.props;
        let wet = has_neighbour(ctx, area, i, |m, _| props.kind(m) == MaterialKind::Water);
        let soaks = if wet {
            ctx.rng.chance(DUST_TO_MUD_CHANCE)
        } else {
            ctx.write.humidity[i] >= DUST_SOAK_HUMIDITY && ctx.rng.chance(DUST_SOAK_CHANCE)
        };
        if soaks {
            transmute(ctx.write, ctx.dirty, area, i, mud);
            ctx.write.humidity[i] = MUD_HUMIDITY;
        }
    }

    fn mud(ctx: &mut PassContext<'_>, area: Area, i: usize, roles: &Roles) {
        let props = ctx.props;
        if ctx.write.humidity[i] > MUD_WET_HUMIDITY {
            for j in area.interior_neighbours(i) {
                if props.kind(ctx.write.mat[j]) != MaterialKind::Dust {
                    continue;
                }
                let given = MUD_WICK.min(ctx.write.humidity[i]);
                ctx.write.humidity[i] -= given;
                ctx.write.humidity[j] = ctx.write.humidity[j].saturating_add(given);
            }
            return;
        }
        let Some(sand) = roles.sand else { return };
        let wet = has_neighbour(ctx, area, i, |m, _| props.kind(m) == MaterialKind::Water);
        if !wet && ctx.write.humidity[i] < MUD_WET_HUMIDITY && ctx.rng.chance(MUD_DRY_CHANCE) {
            transmute(ctx.write, ctx.dirty, area, i, sand);
        }
    }
}

impl Pass for ThermalPass {
    fn name(&self) -> &str {
        "thermal"
    }

    fn execute(&self, ctx: &mut PassContext<'_>) -> Result<(), PassError> {
        let info = ctx.info();
        let area = Area::of(info);
        if !area.has_interior() {
            return Ok(());
        }
        Self::conduct(ctx, area);

        let props = ctx.props;
        let roles = Roles::of(props);
        let frames = info.frames();

        for y in area.rows_down() {
            for x in 1..area.w - 1 {
                let i = area.idx(x, y);
                let t = ctx.write.temp[i];
                if !t.is_finite() {
                    return Err(PassError::NonFinite {
                        field: CellField::Temp,
                        cell: i,
                    });
                }
                ctx.write.humidity[i] = ctx.write.humidity[i].saturating_sub(HUMIDITY_DECAY);

                let id = ctx.write.mat[i];
                let kind = props.kind(id);
                if kind == MaterialKind::Lava {
                    Self::lava(ctx, area, i, &roles, frames);
                    continue;
                }
                let keep = (1.0 - ambient_rate(props, id, t)).powf(frames);
                let t = AMBIENT_TEMPERATURE_C + (t - AMBIENT_TEMPERATURE_C) * keep;
                ctx.write.temp[i] = t;

                if props.flammable(id) {
                    if t >= props.combustion_temp(id) {
                        if let Some(fire) = roles.fire {
                            ignite(ctx.write, ctx.dirty, area, i, fire, FuelOrigin::of_kind(kind));
                            continue;
                        }
                    }
                    let near_lava =
                        has_neighbour(ctx, area, i, |m, _| props.kind(m) == MaterialKind::Lava);
                    if !near_lava {
                        let exposure = ctx.write.phase[i] - LAVA_EXPOSURE_DECAY * frames;
                        ctx.write.phase[i] = exposure.max(0.0);
                    }
                }

                match kind {
                    MaterialKind::Ice => Self::ice(ctx, area, i, &roles, frames),
                    MaterialKind::Water => Self::water(ctx, area, i, &roles, frames),
                    MaterialKind::Steam => Self::steam(ctx, area, i, &roles),
                    MaterialKind::Ember => Self::ember(ctx, area, i, &roles),
                    MaterialKind::Foam => Self::foam(ctx, area, i, &roles),
                    MaterialKind::Dust => Self::dust(ctx, area, i, &roles),
                    MaterialKind::Mud => Self::mud(ctx, area, i, &roles),
                    MaterialKind::Rubber if t >= RUBBER_POP_C => {
                        if let Some(smoke) = roles.smoke {
                            transmute(ctx.write, ctx.dirty, area, i, smoke);
                        }
                    }
                    MaterialKind::Wood if t >= WOOD_CHAR_MIN_C => {
                        if let Some(ash) = roles.ash {
                            if ctx.rng.chance(WOOD_CHAR_CHANCE) {
                                transmute(ctx.write, ctx.dirty, area, i, ash);
                            }
                        }
                    }
                    MaterialKind::Sand if t > VITRIFY_C => {
                        if let Some(glass) = roles.glass {
                            if ctx.rng.chance(VITRIFY_CHANCE) {
                                transmute(ctx.write, ctx.dirty, area, i, glass);
                            }
                        }
                    }
                    _ => {}
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::Scene;
    use kiln_material::presets::{
        ASH, DUST, EMBER, FIRE, ICE, LAVA, MUD, OIL, RUBBER, SMOKE, STEAM, STONE, WATER, WOOD,
    };

    #[test]
    fn conduction_moves_both_cells_toward_each_other() {
        let mut s = Scene::new(8, 8, 20.0);
        let hot = s.set(3, 3, STONE, 200.0);
        let cold = s.set(4, 3, STONE, 20.0);
        s.run(&ThermalPass, 1);
        let (th, tc) = (s.front.temp[hot], s.front.temp[cold]);
        assert!(20.0 < tc && tc < th && th < 200.0, "{th} {tc}");
    }

    #[test]
    fn equal_masses_exchange_equal_degrees() {
        let mut s = Scene::new(8, 8, 20.0);
        for x in 1..7 {
            for y in 1..7 {
                s.set(x, y, STONE, 20.0);
            }
        }
        let hot = s.set(3, 3, STONE, 100.0);
        let before: f32 = s.front.temp.iter().sum();
        s.with_context(|ctx| {
            let area = Area::of(ctx.info());
            ThermalPass::conduct(ctx, area);
        });
        let after: f32 = s.front.temp.iter().sum();
        assert!((before - after).abs() < 1e-2);
        assert!(s.front.temp[hot] < 100.0);
    }

    #[test]
    fn hot_air_relaxes_to_ambient() {
        let mut s = Scene::new(12, 12, 20.0);
        let i = s.set(5, 5, MaterialId::EMPTY, 400.0);
        s.run(&ThermalPass, 1);
        assert!(s.front.temp[i] < 400.0);
        s.run(&ThermalPass, 200);
        assert!(s.front.temp[i] < 60.0);
    }

    #[test]
    fn ice_holds_at_melting_while_banking_heat() {
        let mut s = Scene::new(12, 12, 20.0);
        let i = s.set(5, 5, ICE, -5.0);
        for (x, y) in [(4, 5), (6, 5), (5, 4), (5, 6)] {
            s.set(x, y, STONE, 100.0);
        }
        let frames = s.dt as f32 * 60.0;
        let steps = (LATENT_FUSION_ENERGY / (MAX_LATENT_STEP * frames)) as usize - 1;
        for step in 0..steps {
            s.run(&ThermalPass, 1);
            assert_eq!(s.front.mat[i], ICE, "melted at step {step}");
            let t = s.front.temp[i];
            assert!(t <= 1e-3, "step {step}: {t}");
        }
        assert!(s.front.phase[i] > 0.0);
    }

    #[test]
    fn full_bank_melts_ice_into_water() {
        let mut s = Scene::new(8, 8, 20.0);
        let i = s.set(3, 3, ICE, 10.0);
        s.front.phase[i] = LATENT_FUSION_ENERGY - 1.0;
        s.run(&ThermalPass, 1);
        assert_eq!(s.front.mat[i], WATER);
        assert_eq!(s.front.phase[i], 0.0);
    }

    #[test]
    fn superheated_water_boils_after_a_delay() {
        let mut s = Scene::new(8, 8, 20.0);
        let i = s.set(3, 3, WATER, 400.0);
        s.run(&ThermalPass, 1);
        assert_eq!(s.front.mat[i], WATER);
        assert!(s.front.aux[i] > 0);
        s.run(&ThermalPass, 10);
        assert_eq!(s.front.mat[i], STEAM);
        assert!(s.front.temp[i] > 100.0);
    }

    #[test]
    fn pressure_raises_the_boiling_point() {
        let mut s = Scene::new(8, 8, 20.0);
        let i = s.set(3, 3, WATER, 110.0);
        s.front.pressure[i] = 400;
        s.run(&ThermalPass, 1);
        assert_eq!(s.front.aux[i], 0);
    }

    #[test]
    fn fresh_steam_waits_before_condensing() {
        let mut s = Scene::new(8, 8, 20.0);
        let i = s.set(3, 3, STEAM, 50.0);
        s.run(&ThermalPass, CONDENSE_MIN_AGE as usize - 1);
        assert_eq!(s.front.mat[i], STEAM);
        s.run(&ThermalPass, 1);
        assert_eq!(s.front.mat[i], WATER);
    }

    #[test]
    fn cold_surfaces_condense_steam_sooner() {
        let mut s = Scene::new(8, 8, 20.0);
        let i = s.set(3, 3, STEAM, 90.0);
        s.set(3, 4, STONE, 0.0);
        s.run(&ThermalPass, CONDENSE_COLD_MIN_AGE as usize);
        assert_eq!(s.front.mat[i], WATER);
    }

    #[test]
    fn lava_exposure_ignites_wood_before_it_is_hot() {
        let mut s = Scene::new(8, 8, 20.0);
        s.set(3, 3, LAVA, 500.0);
        let wood = s.set(4, 3, WOOD, 20.0);
        let steps = (LAVA_IGNITION_THRESHOLD / LAVA_IGNITION_GAIN).ceil() as usize;
        s.run(&ThermalPass, steps - 1);
        assert_eq!(s.front.mat[wood], WOOD);
        assert!(s.front.temp[wood] < WOOD_CHAR_MIN_C);
        s.run(&ThermalPass, 1);
        assert_eq!(s.front.mat[wood], FIRE);
        assert_eq!(s.front.vel_x[wood], FuelOrigin::Wood.code());
    }

    #[test]
    fn lava_preheats_neighbours_beyond_conduction() {
        let mut heated = Scene::new(8, 8, 20.0);
        heated.set(3, 3, LAVA, 1000.0);
        let near = heated.set(4, 3, STONE, 20.0);
        heated.run(&ThermalPass, 1);

        let mut conducted = Scene::new(8, 8, 20.0);
        conducted.set(3, 3, LAVA, 1000.0);
        let plain = conducted.set(4, 3, STONE, 20.0);
        conducted.with_context(|ctx| {
            let area = Area::of(ctx.info());
            ThermalPass::conduct(ctx, area);
        });

        let (t, c) = (heated.front.temp[near], conducted.front.temp[plain]);
        assert!(t > c + LAVA_PREHEAT_STEP_C * 0.5, "{t} vs {c}");
        assert!(t <= LAVA_PREHEAT_MAX_C);
    }

    #[test]
    fn preheat_stops_at_the_lava_temperature() {
        let mut s = Scene::new(8, 8, 20.0);
        s.set(3, 3, LAVA, 200.0);
        let near = s.set(4, 3, STONE, 199.0);
        s.with_context(|ctx| {
            let area = Area::of(ctx.info());
            let roles = Roles::of(ctx.props);
            let i = area.idx(3, 3);
            ThermalPass::lava(ctx, area, i, &roles, 1.0);
        });
        assert_eq!(s.front.temp[near], 200.0);
    }

    #[test]
    fn wood_keeps_its_etch_budget_beside_lava_exposure() {
        let mut s = Scene::new(8, 8, 20.0);
        let wood = s.set(4, 3, WOOD, 20.0);
        s.front.aux[wood] = 100;
        s.front.phase[wood] = 10.0;
        s.run(&ThermalPass, 1);
        assert_eq!(s.front.aux[wood], 100);
        assert!(s.front.phase[wood] < 10.0);
    }

    #[test]
    fn cold_lava_solidifies_gradually() {
        let mut s = Scene::new(8, 8, 20.0);
        let i = s.set(3, 3, LAVA, 100.0);
        s.run(&ThermalPass, 5);
        assert_eq!(s.front.mat[i], LAVA);
        assert!(s.front.phase[i] > 0.0);
        s.run(&ThermalPass, 200);
        assert_eq!(s.front.mat[i], STONE);
    }

    #[test]
    fn oil_at_combustion_temperature_ignites() {
        let mut s = Scene::new(8, 8, 20.0);
        let i = s.set(3, 3, OIL, 300.0);
        s.run(&ThermalPass, 1);
        assert_eq!(s.front.mat[i], FIRE);
        assert_eq!(s.front.vel_x[i], FuelOrigin::Oil.code());
    }

    #[test]
    fn hot_rubber_pops_into_smoke() {
        let mut s = Scene::new(8, 8, 20.0);
        let i = s.set(3, 3, RUBBER, 400.0);
        s.run(&ThermalPass, 1);
        assert_eq!(s.front.mat[i], SMOKE);
    }

    #[test]
    fn ice_chills_but_never_below_ambient() {
        let mut s = Scene::new(8, 8, 20.0);
        s.set(3, 3, ICE, -5.0);
        let warm = s.set(4, 3, STONE, 60.0);
        let cool = s.set(2, 3, STONE, 5.0);
        s.run(&ThermalPass, 1);
        assert!(s.front.temp[warm] < 60.0 - ICE_CHILL_C + 1.0);
        assert!(s.front.temp[cool] < 20.0);
    }

    #[test]
    fn ember_burns_down_to_ash() {
        let mut s = Scene::new(8, 8, 20.0);
        let i = s.set(3, 3, EMBER, 250.0);
        s.run(&ThermalPass, 10);
        assert_eq!(s.front.mat[i], EMBER);
        s.run(&ThermalPass, EMBER_LIFE as usize);
        assert_eq!(s.front.mat[i], ASH);
    }

    #[test]
    fn hot_ember_relights_only_next_to_fuel() {
        let mut s = Scene::new(10, 8, 20.0);
        let lone = s.set(2, 3, EMBER, 400.0);
        let fed = s.set(6, 3, EMBER, 400.0);
        s.set(7, 3, WOOD, 20.0);
        s.run(&ThermalPass, 1);
        assert_eq!(s.front.mat[lone], EMBER);
        assert_eq!(s.front.mat[fed], FIRE);
    }

    #[test]
    fn dust_touching_water_turns_to_mud() {
        let mut s = Scene::new(8, 8, 20.0);
        let i = s.set(3, 3, DUST, 20.0);
        s.set(3, 4, WATER, 20.0);
        s.run(&ThermalPass, 100);
        assert_eq!(s.front.mat[i], MUD);
    }

    #[test]
    fn wet_mud_wicks_into_dust() {
        let mut s = Scene::new(8, 8, 20.0);
        let m = s.set(3, 3, MUD, 20.0);
        s.front.humidity[m] = 200;
        let d = s.set(4, 3, DUST, 20.0);
        s.run(&ThermalPass, 1);
        assert!(s.front.humidity[d] > 0);
        assert!(s.front.humidity[m] < 200);
    }

    #[test]
    fn nan_temperature_fails_the_pass() {
        let mut s = Scene::new(6, 6, 20.0);
        s.set(2, 2, STONE, f32::NAN);
        let err = s.try_step(&ThermalPass).unwrap_err();
        assert!(matches!(
            err,
            PassError::NonFinite {
                field: CellField::Temp,
                ..
            }
        ));
    }
}
