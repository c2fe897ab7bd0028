//! Liquids: wetting, lava contact reactions, density layering, falling,
//! spilling and pressure-driven lateral flow.

use kiln_core::{Category, FuelOrigin, MaterialId, MaterialKind, PassError};
use kiln_pass::{Pass, PassContext};

use crate::cells::{can_write, clamp16, ignite, swap, transmute, Area};
use crate::constants::{
    ACID_WETTING, FOAM_WETTING, IMMISCIBLE_DENSITY_GAP, IMMISCIBLE_SWAP_CHANCE,
    LAVA_PREHEAT_MAX_C, LAVA_PREHEAT_STEP_C, MAX_SPREAD, QUENCH_BURST_RADIUS, QUENCH_STEAM_MIN_C,
    QUENCH_STONE_MIN_C, SPILL_PRESSURE_MARGIN, WATER_LAVA_FLASH_TEMP_C, WATER_LAVA_REACT_CHANCE,
    WATER_WETTING,
};

/// Moves liquid cells, bottom row first.
#[derive(Clone, Copy, Debug, Default)]
pub struct LiquidPass;

fn wetting(kind: MaterialKind) -> u8 {
    match kind {
        MaterialKind::Water => WATER_WETTING,
        MaterialKind::Foam => FOAM_WETTING,
        MaterialKind::Acid => ACID_WETTING,
        _ => 0,
    }
}

impl LiquidPass {
    /// Lava warms flammable neighbours and lights them once they reach
    /// their combustion temperature. Acts on whatever currently occupies
    /// the neighbour, claimed or not.
    fn lava_contact(ctx: &mut PassContext<'_>, area: Area, i: usize, fire: MaterialId) {
        for j in area.interior_neighbours(i) {
            let fuel = ctx.write.mat[j];
            if !ctx.props.flammable(fuel) {
                continue;
            }
            let t = &mut ctx.write.temp[j];
            if *t < LAVA_PREHEAT_MAX_C {
                *t = (*t + LAVA_PREHEAT_STEP_C).min(LAVA_PREHEAT_MAX_C);
            }
            if *t >= ctx.props.combustion_temp(fuel) {
                let origin = FuelOrigin::of_kind(ctx.props.kind(fuel));
                ignite(ctx.write, ctx.dirty, area, j, fire, origin);
            }
        }
    }

    /// Water touching lava turns to steam and the lava to stone, with a
    /// small radial impulse. Cool water only reacts on a lucky roll.
    fn quench_lava(
        ctx: &mut PassContext<'_>,
        area: Area,
        i: usize,
        lava: usize,
        steam: MaterialId,
        stone: MaterialId,
    ) -> bool {
        if !can_write(ctx.read, ctx.write, lava) {
            return false;
        }
        let hot = ctx.write.temp[i] >= WATER_LAVA_FLASH_TEMP_C;
        if !hot && !ctx.rng.chance(WATER_LAVA_REACT_CHANCE) {
            return false;
        }
        transmute(ctx.write, ctx.dirty, area, i, steam);
        transmute(ctx.write, ctx.dirty, area, lava, stone);
        ctx.write.temp[i] = ctx.write.temp[i].max(QUENCH_STEAM_MIN_C);
        ctx.write.temp[lava] = ctx.write.temp[lava].max(QUENCH_STONE_MIN_C);

        let (cx, cy) = ((i % area.w) as i32, (i / area.w) as i32);
        let r = QUENCH_BURST_RADIUS;
        for dy in -r..=r {
            for dx in -r..=r {
                let d2 = dx * dx + dy * dy;
                if d2 > r * r {
                    continue;
                }
                let (px, py) = (cx + dx, cy + dy);
                if px < 1 || py < 1 || px >= area.w as i32 - 1 || py >= area.h as i32 - 1 {
                    continue;
                }
                let k = area.idx(px as usize, py as usize);
                let push = clamp16(r * 4 - d2);
                ctx.write.impulse[k] = ctx.write.impulse[k].max(push);
            }
        }
        true
    }

    /// Whether two vertically adjacent liquids may exchange places.
    fn may_exchange(ctx: &mut PassContext<'_>, heavy: MaterialId, light: MaterialId) -> bool {
        if !ctx.props.is_immiscible(heavy, light) {
            return true;
        }
        let gap = ctx.props.density(heavy) - ctx.props.density(light);
        gap > IMMISCIBLE_DENSITY_GAP || ctx.rng.chance(IMMISCIBLE_SWAP_CHANCE)
    }
}

impl Pass for LiquidPass {
    fn name(&self) -> &str {
        "liquid"
    }

    fn execute(&self, ctx: &mut PassContext<'_>) -> Result<(), PassError> {
        let area = Area::of(ctx.info());
        if !area.has_interior() {
            return Ok(());
        }
        let w = area.w;
        let read = ctx.read;
        let props = ctx.props;
        let fire = props.role(MaterialKind::Fire);
        let steam = props.role(MaterialKind::Steam);
        let stone = props.role(MaterialKind::Stone);

        for y in area.rows_up() {
            for x in 1..w - 1 {
                let i = area.idx(x, y);
                let id = read.mat[i];
                if !props.is(id, Category::Liquid) {
                    continue;
                }
                let kind = props.kind(id);

                let wet = wetting(kind);
                if wet > 0 {
                    for j in area.neighbours(i) {
                        let other = ctx.write.mat[j];
                        if !other.is_empty() && props.kind(other) != kind {
                            let h = &mut ctx.write.humidity[j];
                            *h = h.saturating_add(wet);
                        }
                    }
                }

                if kind == MaterialKind::Lava {
                    if let Some(fire) = fire {
                        Self::lava_contact(ctx, area, i, fire);
                    }
                }

                if !can_write(read, ctx.write, i) {
                    continue;
                }

                let below = i + w;
                let above = i - w;
                let has_below = area.interior(below);
                let has_above = area.interior(above);

                if kind == MaterialKind::Water {
                    if let (Some(steam), Some(stone)) = (steam, stone) {
                        let lava = [below, above].into_iter().find(|&j| {
                            area.interior(j) && props.kind(read.mat[j]) == MaterialKind::Lava
                        });
                        if let Some(lava) = lava {
                            if Self::quench_lava(ctx, area, i, lava, steam, stone) {
                                continue;
                            }
                        }
                    }
                }

                if has_below && can_write(read, ctx.write, below) {
                    let under = read.mat[below];
                    if props.is(under, Category::Liquid)
                        && props.density(id) > props.density(under)
                        && Self::may_exchange(ctx, id, under)
                    {
                        swap(ctx.write, ctx.dirty, area, i, below);
                        continue;
                    }
                }
                if has_above && can_write(read, ctx.write, above) {
                    let over = read.mat[above];
                    if props.is(over, Category::Liquid)
                        && props.density(id) < props.density(over)
                        && Self::may_exchange(ctx, over, id)
                    {
                        swap(ctx.write, ctx.dirty, area, i, above);
                        continue;
                    }
                }

                if has_below
                    && props.is_passable(read.mat[below])
                    && can_write(read, ctx.write, below)
                {
                    swap(ctx.write, ctx.dirty, area, i, below);
                    ctx.write.vel_y[below] = 1;
                    continue;
                }

                let p = &ctx.write.pressure;
                let (dl, dr) = (below - 1, below + 1);
                let left_stack = p[i - 1] as i32 + p[dl] as i32;
                let right_stack = p[i + 1] as i32 + p[dr] as i32;
                let prefer_left = left_stack < right_stack - SPILL_PRESSURE_MARGIN;
                let even = x % 2 == 0;
                let spill = |diag: usize, side: usize, write: &kiln_grid::CellBuffer| {
                    area.interior(diag)
                        && props.is_passable(read.mat[diag])
                        && props.is_passable(read.mat[side])
                        && can_write(read, write, diag)
                };
                if (prefer_left || even) && spill(dl, i - 1, &*ctx.write) {
                    swap(ctx.write, ctx.dirty, area, i, dl);
                    ctx.write.vel_x[dl] = -1;
                    continue;
                }
                if (!prefer_left || !even) && spill(dr, i + 1, &*ctx.write) {
                    swap(ctx.write, ctx.dirty, area, i, dr);
                    ctx.write.vel_x[dr] = 1;
                    continue;
                }

                let spread = (MAX_SPREAD - props.viscosity(id)).floor().max(1.0) as usize;
                let p = &ctx.write.pressure;
                let here = p[i] as i32;
                let mut best: Option<(usize, i8)> = None;
                let mut best_drop = 0;
                let (mut left_open, mut right_open) = (true, true);
                for s in 1..=spread {
                    for (open, target, dx) in [
                        (&mut left_open, i.wrapping_sub(s), -1i8),
                        (&mut right_open, i + s, 1i8),
                    ] {
                        if !*open {
                            continue;
                        }
                        let row_ok = if dx < 0 { x > s } else { x + s < w - 1 };
                        if !row_ok
                            || !props.is_passable(read.mat[target])
                            || !can_write(read, ctx.write, target)
                        {
                            *open = false;
                            continue;
                        }
                        let drop = here - p[target] as i32;
                        if drop > best_drop {
                            best_drop = drop;
                            best = Some((target, dx));
                        }
                    }
                }
                if let Some((target, dx)) = best {
                    swap(ctx.write, ctx.dirty, area, i, target);
                    ctx.write.vel_x[target] = dx;
                }
            }
        }
        Ok(())
    }
}
