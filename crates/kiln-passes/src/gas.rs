//! Gases: dissipation, bubbling through liquid, buoyant rise, diagonal and
//! lateral drift, and venting toward lower effective pressure.

use kiln_core::{Category, MaterialId, MaterialKind, PassError};
use kiln_pass::{Pass, PassContext};

use crate::cells::{can_write, swap, transmute, Area};
use crate::constants::{
    BUBBLE_BASE_CHANCE, BUBBLE_BOOST_GAIN, BUBBLE_HEAT_MAX, BUBBLE_HEAT_SPAN_C, BUOYANCY_MAX,
    BUOYANCY_SPAN_C, BUOYANCY_START_C, DIAGONAL_BOOST_GAIN, DIAGONAL_RISE_CHANCE, HOT_DRIFT_BIAS,
    HOT_DRIFT_TEMP_C, RISE_BASE_CHANCE, RISE_BOOST_GAIN, RISE_MAX_CHANCE,
    SMOKE_DISSIPATION_CHANCE, SMOKE_PRESSURE_DISSIPATION_CAP, SMOKE_PRESSURE_DISSIPATION_SCALE,
    VENT_BOOST_GAIN, VENT_CHANCE, VENT_MIN_DROP,
};

/// Moves gas cells, top row first, alternating column direction per row.
///
/// Steam only bubbles and rises; it never drifts sideways, which keeps
/// plumes coherent.
#[derive(Clone, Copy, Debug, Default)]
pub struct GasPass;

/// Extra buoyancy of gas at `t`, from 0 up to [`BUOYANCY_MAX`].
fn buoyancy(t: f32) -> f32 {
    ((t - BUOYANCY_START_C) / BUOYANCY_SPAN_C).clamp(0.0, BUOYANCY_MAX)
}

/// Effective pressure at `i`: static plus impulse.
fn effective(ctx: &PassContext<'_>, i: usize) -> i32 {
    ctx.write.pressure[i] as i32 + ctx.write.impulse[i] as i32
}

impl Pass for GasPass {
    fn name(&self) -> &str {
        "gas"
    }

    fn execute(&self, ctx: &mut PassContext<'_>) -> Result<(), PassError> {
        let area = Area::of(ctx.info());
        if !area.has_interior() {
            return Ok(());
        }
        let w = area.w;
        let read = ctx.read;
        let props = ctx.props;
        // Free cells for sideways moves must be truly empty, not other gas.
        let open = |j: usize, write: &kiln_grid::CellBuffer| {
            area.interior(j) && read.mat[j].is_empty() && can_write(read, write, j)
        };

        for y in area.rows_down() {
            let rightward = y % 2 == 0;
            for x in area.columns(rightward) {
                let i = area.idx(x, y);
                let id = read.mat[i];
                if !props.is(id, Category::Gas) || !can_write(read, ctx.write, i) {
                    continue;
                }
                let kind = props.kind(id);
                let steam = kind == MaterialKind::Steam;
                let t = ctx.write.temp[i];
                let boost = buoyancy(t);

                if kind == MaterialKind::Smoke {
                    let enclosed = effective(ctx, i).unsigned_abs() as f32;
                    let bonus = (enclosed / SMOKE_PRESSURE_DISSIPATION_SCALE)
                        .min(SMOKE_PRESSURE_DISSIPATION_CAP);
                    if ctx.rng.chance(SMOKE_DISSIPATION_CHANCE + bonus) {
                        transmute(ctx.write, ctx.dirty, area, i, MaterialId::EMPTY);
                        continue;
                    }
                }

                let up = i - w;
                let up_free = area.interior(up) && can_write(read, ctx.write, up);

                if up_free && props.is(read.mat[up], Category::Liquid) {
                    let hot =
                        ((t - BUOYANCY_START_C) / BUBBLE_HEAT_SPAN_C).clamp(0.0, BUBBLE_HEAT_MAX);
                    if ctx.rng.chance(BUBBLE_BASE_CHANCE + BUBBLE_BOOST_GAIN * boost + hot) {
                        swap(ctx.write, ctx.dirty, area, i, up);
                        ctx.write.vel_y[up] = -1;
                        continue;
                    }
                }

                if up_free && props.is_passable(read.mat[up]) {
                    let rise_chance =
                        (RISE_BASE_CHANCE + RISE_BOOST_GAIN * boost).min(RISE_MAX_CHANCE);
                    let rises = steam || ctx.rng.chance(rise_chance);
                    if rises {
                        swap(ctx.write, ctx.dirty, area, i, up);
                        ctx.write.vel_y[up] = -1;
                        continue;
                    }
                }

                if steam {
                    continue;
                }

                let diagonals: [(usize, i8); 2] = if rightward {
                    [(up - 1, -1), (up + 1, 1)]
                } else {
                    [(up + 1, 1), (up - 1, -1)]
                };
                let mut moved = false;
                for (diag, dx) in diagonals {
                    if open(diag, &*ctx.write)
                        && ctx.rng.chance(DIAGONAL_RISE_CHANCE + DIAGONAL_BOOST_GAIN * boost)
                    {
                        swap(ctx.write, ctx.dirty, area, i, diag);
                        ctx.write.vel_x[diag] = dx;
                        moved = true;
                        break;
                    }
                }
                if moved {
                    continue;
                }

                let here = effective(ctx, i);
                for (side, dx) in [(i - 1, -1i8), (i + 1, 1i8)] {
                    if open(side, &*ctx.write)
                        && here - effective(ctx, side) > VENT_MIN_DROP
                        && ctx.rng.chance(VENT_CHANCE + VENT_BOOST_GAIN * boost)
                    {
                        swap(ctx.write, ctx.dirty, area, i, side);
                        ctx.write.vel_x[side] = dx;
                        moved = true;
                        break;
                    }
                }
                if moved {
                    continue;
                }

                let bias = if t > HOT_DRIFT_TEMP_C { HOT_DRIFT_BIAS } else { 0.5 };
                let (side, dx) = if ctx.rng.chance(bias) {
                    (i + 1, 1)
                } else {
                    (i - 1, -1)
                };
                if open(side, &*ctx.write) {
                    swap(ctx.write, ctx.dirty, area, i, side);
                    ctx.write.vel_x[side] = dx;
                }
            }
        }
        Ok(())
    }
}
