//! Fire and ember behaviour.
//!
//! Fire keeps its remaining life in `aux` (frames) and its fuel origin in
//! `vel_x`. Ember life is owned by the thermal pass; here embers only
//! fall, crumble, light dust and drown.

use kiln_core::{Category, FuelOrigin, MaterialId, MaterialKind, PassError};
use kiln_pass::{Pass, PassContext};

use crate::cells::{can_write, ignite, swap, transmute, Area};
use crate::constants::{
    BASE_IGNITION_CHANCE, BURNOUT_ASH_CHANCE, BURNOUT_EMBER_MAX_C, BURNOUT_SMOKE_MAX_C,
    BURNOUT_SMOKE_MIN_C, DUST_FLASH_CHANCE, DUST_FLASH_COUNT, DUST_FLASH_IMPULSE_CENTER,
    DUST_FLASH_IMPULSE_NEIGHBOR, EMBER_ASH_C, EMBER_CRUMBLE_AFTER_IGNITE, EMBER_DUST_FIRE_C,
    EMBER_FREE_FALL_CRUMBLE, EMBER_IGNITE_DUST_CHANCE, EMBER_SLIP_CHANCE, FIRE_COLD_NEIGHBOR_C,
    FIRE_COLD_NEIGHBOR_COUNT, FIRE_LIFE_DEFAULT, FIRE_LIFE_OIL, FIRE_LIFE_WOOD, FIRE_MIN_TEMP_C,
    FIRE_NEIGHBOR_HEAT_DROP_C, FIRE_STARVED_BURN, FOAM_HALO_MAX, FOAM_HALO_PER_NEIGHBOR,
    FOAM_SMOTHER_HOT_CHANCE, FOAM_SMOTHER_MAX_C, FOAM_SMOTHER_TEMP_C,
    HUMIDITY_IGNITION_REDUCTION, IGNITION_DETERMINISTIC_MARGIN_C, IGNITION_SMOKE_CHANCE,
    OIL_CHAIN_BONUS_CAP, OIL_CHAIN_BONUS_PER, QUENCH_DEFAULT_CAP_C, QUENCH_OIL_CAP_C,
    QUENCH_STEAM_FLOOR_C, QUENCH_WOOD_CAP_C, TEMP_IGNITION_BOOST_CAP, TEMP_IGNITION_BOOST_DIVISOR,
    WOOD_SMOKE_CHANCE,
};

/// Combustion pass: runs after movement, before objects.
#[derive(Clone, Copy, Debug, Default)]
pub struct EnergyPass;

/// Role ids resolved once per step. Missing roles disable the rules that
/// would produce them.
struct Roles {
    fire: MaterialId,
    ember: Option<MaterialId>,
    smoke: Option<MaterialId>,
    steam: Option<MaterialId>,
    foam: Option<MaterialId>,
    ash: Option<MaterialId>,
}

fn life_for(origin: FuelOrigin) -> u16 {
    match origin {
        FuelOrigin::Wood => FIRE_LIFE_WOOD,
        FuelOrigin::Oil => FIRE_LIFE_OIL,
        FuelOrigin::Unknown => FIRE_LIFE_DEFAULT,
    }
}

fn count_kind(ctx: &PassContext<'_>, area: Area, i: usize, kind: MaterialKind) -> usize {
    area.neighbours(i)
        .into_iter()
        .filter(|&j| ctx.props.kind(ctx.read.mat[j]) == kind)
        .count()
}

/// Turn an empty, unclaimed cell into smoke with probability `p`.
fn puff(ctx: &mut PassContext<'_>, area: Area, k: usize, smoke: MaterialId, p: f32) {
    if area.interior(k)
        && ctx.read.mat[k].is_empty()
        && can_write(ctx.read, ctx.write, k)
        && ctx.rng.chance(p)
    {
        transmute(ctx.write, ctx.dirty, area, k, smoke);
    }
}

impl EnergyPass {
    fn ember(ctx: &mut PassContext<'_>, area: Area, i: usize, roles: &Roles) {
        let read = ctx.read;
        let props = ctx.props;
        if !can_write(read, ctx.write, i) {
            return;
        }

        if let Some(ash) = roles.ash {
            if count_kind(ctx, area, i, MaterialKind::Water) > 0 {
                transmute(ctx.write, ctx.dirty, area, i, ash);
                ctx.write.temp[i] = ctx.write.temp[i].min(EMBER_ASH_C);
                return;
            }
        }

        let below = i + area.w;
        if !area.interior(below) {
            return;
        }
        if props.kind(read.mat[below]) == MaterialKind::Dust
            && can_write(read, ctx.write, below)
            && ctx.rng.chance(EMBER_IGNITE_DUST_CHANCE)
        {
            ignite(ctx.write, ctx.dirty, area, below, roles.fire, FuelOrigin::Unknown);
            ctx.write.temp[below] = ctx.write.temp[below].max(EMBER_DUST_FIRE_C);
            if let Some(ash) = roles.ash {
                if ctx.rng.chance(EMBER_CRUMBLE_AFTER_IGNITE) {
                    transmute(ctx.write, ctx.dirty, area, i, ash);
                    return;
                }
            }
        }

        if props.is_passable(read.mat[below]) {
            if let Some(ash) = roles.ash {
                if ctx.rng.chance(EMBER_FREE_FALL_CRUMBLE) {
                    transmute(ctx.write, ctx.dirty, area, i, ash);
                    return;
                }
            }
            if can_write(read, ctx.write, below) {
                swap(ctx.write, ctx.dirty, area, i, below);
                return;
            }
        }

        for (diag, side) in [(below - 1, i - 1), (below + 1, i + 1)] {
            if area.interior(diag)
                && read.mat[diag].is_empty()
                && read.mat[side].is_empty()
                && can_write(read, ctx.write, diag)
                && ctx.rng.chance(EMBER_SLIP_CHANCE)
            {
                swap(ctx.write, ctx.dirty, area, i, diag);
                return;
            }
        }
    }

    /// Water or foam next to the fire puts it out. Returns whether it did.
    fn quench(ctx: &mut PassContext<'_>, area: Area, i: usize, roles: &Roles) -> bool {
        for j in area.neighbours(i) {
            match ctx.props.kind(ctx.read.mat[j]) {
                MaterialKind::Water => {
                    if let Some(steam) = roles.steam {
                        if area.interior(j) && can_write(ctx.read, ctx.write, j) {
                            transmute(ctx.write, ctx.dirty, area, j, steam);
                            ctx.write.temp[j] = ctx.write.temp[j].max(QUENCH_STEAM_FLOOR_C);
                        }
                    }
                    let origin = FuelOrigin::from_code(ctx.write.vel_x[i]);
                    let (to, cap) = match origin {
                        FuelOrigin::Wood => (roles.ember, QUENCH_WOOD_CAP_C),
                        FuelOrigin::Oil => (roles.smoke, QUENCH_OIL_CAP_C),
                        FuelOrigin::Unknown => (roles.smoke, QUENCH_DEFAULT_CAP_C),
                    };
                    let to = to.unwrap_or(MaterialId::EMPTY);
                    transmute(ctx.write, ctx.dirty, area, i, to);
                    ctx.write.temp[i] = ctx.write.temp[i].min(cap);
                    return true;
                }
                MaterialKind::Foam => {
                    let Some(foam) = roles.foam else { continue };
                    let smothers = ctx.write.temp[i] < FOAM_SMOTHER_MAX_C
                        || ctx.rng.chance(FOAM_SMOTHER_HOT_CHANCE);
                    if smothers {
                        transmute(ctx.write, ctx.dirty, area, i, foam);
                        ctx.write.temp[i] = ctx.write.temp[i].min(FOAM_SMOTHER_TEMP_C);
                        return true;
                    }
                }
                _ => {}
            }
        }
        false
    }

    /// Heat neighbours and try to light the flammable ones.
    fn spread(ctx: &mut PassContext<'_>, area: Area, i: usize, roles: &Roles) {
        let read = ctx.read;
        let props = ctx.props;
        let t_fire = ctx.write.temp[i];
        for j in area.interior_neighbours(i) {
            let fuel = read.mat[j];
            if fuel.is_empty() {
                continue;
            }
            let tj = &mut ctx.write.temp[j];
            *tj = tj.max(t_fire - FIRE_NEIGHBOR_HEAT_DROP_C);
            let tj = *tj;
            if !props.flammable(fuel) {
                continue;
            }
            let kind = props.kind(fuel);
            let origin = FuelOrigin::of_kind(kind);
            let threshold = props.combustion_temp(fuel);
            if tj >= threshold + IGNITION_DETERMINISTIC_MARGIN_C {
                if can_write(read, ctx.write, j) {
                    ignite(ctx.write, ctx.dirty, area, j, roles.fire, origin);
                }
                continue;
            }

            let halo = count_kind(ctx, area, j, MaterialKind::Foam) as f32;
            let suppression = (halo * FOAM_HALO_PER_NEIGHBOR).min(FOAM_HALO_MAX);
            let wet = ctx.write.humidity[j] as f32 / 255.0;
            let damp = (wet * HUMIDITY_IGNITION_REDUCTION).min(HUMIDITY_IGNITION_REDUCTION);
            let mut chance = BASE_IGNITION_CHANCE * (1.0 - suppression) * (1.0 - damp);
            chance += ((tj - threshold) / TEMP_IGNITION_BOOST_DIVISOR)
                .clamp(0.0, TEMP_IGNITION_BOOST_CAP);
            if kind == MaterialKind::Oil {
                let chain = count_kind(ctx, area, j, MaterialKind::Oil) as f32;
                chance += (chain * OIL_CHAIN_BONUS_PER).min(OIL_CHAIN_BONUS_CAP);
            }
            if ctx.rng.chance(chance) && can_write(read, ctx.write, j) {
                ignite(ctx.write, ctx.dirty, area, j, roles.fire, origin);
                if let Some(smoke) = roles.smoke {
                    for k in area.interior_neighbours(j) {
                        puff(ctx, area, k, smoke, IGNITION_SMOKE_CHANCE);
                    }
                }
            }
        }
    }

    /// Count down the fire's life; returns `true` once it has burnt out.
    fn burn(ctx: &mut PassContext<'_>, area: Area, i: usize, roles: &Roles, frames: u16) -> bool {
        let read = ctx.read;
        let props = ctx.props;
        let mut origin = FuelOrigin::from_code(ctx.write.vel_x[i]);
        let mut life = ctx.write.aux[i];
        if life == 0 {
            if origin == FuelOrigin::Unknown {
                for j in area.neighbours(i) {
                    match props.kind(read.mat[j]) {
                        MaterialKind::Wood => {
                            origin = FuelOrigin::Wood;
                            break;
                        }
                        MaterialKind::Oil => origin = FuelOrigin::Oil,
                        _ => {}
                    }
                }
                ctx.write.vel_x[i] = origin.code();
            }
            life = life_for(origin);
        }
        life = life.saturating_sub(frames);
        ctx.write.aux[i] = life;

        if life == 0 {
            match origin {
                FuelOrigin::Oil => {
                    let to = roles.smoke.unwrap_or(MaterialId::EMPTY);
                    transmute(ctx.write, ctx.dirty, area, i, to);
                    ctx.write.temp[i] =
                        ctx.write.temp[i].clamp(BURNOUT_SMOKE_MIN_C, BURNOUT_SMOKE_MAX_C);
                }
                FuelOrigin::Wood | FuelOrigin::Unknown => {
                    let to = roles.ember.unwrap_or(MaterialId::EMPTY);
                    transmute(ctx.write, ctx.dirty, area, i, to);
                    ctx.write.temp[i] = ctx.write.temp[i].min(BURNOUT_EMBER_MAX_C);
                    if let (FuelOrigin::Wood, Some(ash)) = (origin, roles.ash) {
                        let k = area.neighbours(i)[ctx.rng.below(4)];
                        if area.interior(k)
                            && ctx.write.mat[k].is_empty()
                            && can_write(read, ctx.write, k)
                            && ctx.rng.chance(BURNOUT_ASH_CHANCE)
                        {
                            transmute(ctx.write, ctx.dirty, area, k, ash);
                        }
                    }
                }
            }
            return true;
        }

        let mut cold = 0;
        let mut fuelled = false;
        for j in area.neighbours(i) {
            let flammable = props.flammable(read.mat[j]);
            fuelled |= flammable;
            if ctx.write.temp[j] < FIRE_COLD_NEIGHBOR_C && !flammable {
                cold += 1;
            }
        }
        // Zero would re-arm the fire, so shortened life stops at one frame.
        let aux = &mut ctx.write.aux[i];
        if cold >= FIRE_COLD_NEIGHBOR_COUNT {
            *aux = aux.saturating_sub(1).max(1);
        }
        if origin != FuelOrigin::Wood && !fuelled {
            *aux = aux.saturating_sub(FIRE_STARVED_BURN).max(1);
        }
        false
    }

    /// Fire next to enough dust flashes it all to smoke with a small blast.
    fn dust_flash(ctx: &mut PassContext<'_>, area: Area, i: usize, smoke: MaterialId) {
        if count_kind(ctx, area, i, MaterialKind::Dust) < DUST_FLASH_COUNT
            || !ctx.rng.chance(DUST_FLASH_CHANCE)
        {
            return;
        }
        for j in area.interior_neighbours(i) {
            if ctx.props.kind(ctx.read.mat[j]) == MaterialKind::Dust {
                transmute(ctx.write, ctx.dirty, area, j, smoke);
            }
        }
        let imp = &mut ctx.write.impulse;
        imp[i] = imp[i].max(DUST_FLASH_IMPULSE_CENTER);
        for j in area.interior_neighbours(i) {
            imp[j] = imp[j].max(DUST_FLASH_IMPULSE_NEIGHBOR);
        }
    }
}

impl Pass for EnergyPass {
    fn name(&self) -> &str {
        "energy"
    }

    fn execute(&self, ctx: &mut PassContext<'_>) -> Result<(), PassError> {
        let info = ctx.info();
        let area = Area::of(info);
        if !area.has_interior() {
            return Ok(());
        }
        let props = ctx.props;
        let Some(fire) = props.role(MaterialKind::Fire) else {
            return Ok(());
        };
        let roles = Roles {
            fire,
            ember: props.role(MaterialKind::Ember),
            smoke: props.role(MaterialKind::Smoke),
            steam: props.role(MaterialKind::Steam),
            foam: props.role(MaterialKind::Foam),
            ash: props.role(MaterialKind::Ash),
        };
        let frames = info.whole_frames();

        for y in area.rows_down() {
            for x in 1..area.w - 1 {
                let i = area.idx(x, y);
                let id = ctx.read.mat[i];
                if !props.is(id, Category::Energy) {
                    continue;
                }
                match props.kind(id) {
                    MaterialKind::Ember => Self::ember(ctx, area, i, &roles),
                    MaterialKind::Fire => {
                        if !can_write(ctx.read, ctx.write, i) {
                            continue;
                        }
                        let t = &mut ctx.write.temp[i];
                        *t = t.max(FIRE_MIN_TEMP_C);
                        if Self::quench(ctx, area, i, &roles) {
                            continue;
                        }
                        Self::spread(ctx, area, i, &roles);
                        if let Some(smoke) = roles.smoke {
                            if FuelOrigin::from_code(ctx.write.vel_x[i]) == FuelOrigin::Wood {
                                for k in area.neighbours(i) {
                                    puff(ctx, area, k, smoke, WOOD_SMOKE_CHANCE);
                                }
                            }
                        }
                        if Self::burn(ctx, area, i, &roles, frames) {
                            continue;
                        }
                        if let Some(smoke) = roles.smoke {
                            Self::dust_flash(ctx, area, i, smoke);
                        }
                    }
                    _ => {}
                }
            }
        }
        Ok(())
    }
}
