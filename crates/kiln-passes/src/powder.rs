//! Granular materials: fall, sink through lighter liquids, slip diagonally.

use kiln_core::{Category, PassError};
use kiln_pass::{Pass, PassContext};

use crate::cells::{can_write, swap, Area};
use crate::constants::{WET_SLIP_PENALTY, WIND_SLIP_BONUS};

/// Moves powder cells. Rows run bottom to top; the column direction
/// alternates per row so piles do not drift to one side.
#[derive(Clone, Copy, Debug, Default)]
pub struct PowderPass;

impl Pass for PowderPass {
    fn name(&self) -> &str {
        "powder"
    }

    fn execute(&self, ctx: &mut PassContext<'_>) -> Result<(), PassError> {
        let area = Area::of(ctx.info());
        if !area.has_interior() {
            return Ok(());
        }
        let w = area.w;
        let read = ctx.read;
        let props = ctx.props;

        for y in area.rows_up() {
            for x in area.columns(y % 2 == 1) {
                let i = area.idx(x, y);
                let id = read.mat[i];
                if !props.is(id, Category::Powder) || !can_write(read, ctx.write, i) {
                    continue;
                }

                let below = i + w;
                if area.interior(below) && can_write(read, ctx.write, below) {
                    let under = read.mat[below];
                    let sinks = props.is(under, Category::Liquid)
                        && props.density(under) < props.density(id);
                    if props.is_passable(under) || sinks {
                        swap(ctx.write, ctx.dirty, area, i, below);
                        ctx.write.vel_y[below] = 1;
                        continue;
                    }
                }

                let wet = ctx.write.humidity[i] as f32 / 255.0;
                let mut wind = 0.0;
                if props.is(read.mat[i - 1], Category::Gas) && read.vel_x[i - 1] < 0 {
                    wind += WIND_SLIP_BONUS;
                }
                if props.is(read.mat[i + 1], Category::Gas) && read.vel_x[i + 1] > 0 {
                    wind += WIND_SLIP_BONUS;
                }
                let slip = (props.slip(id) - WET_SLIP_PENALTY * wet + wind).clamp(0.0, 1.0);

                let sides: [(usize, usize, i8); 2] = if ctx.rng.chance(0.5) {
                    [(i - 1, below - 1, -1), (i + 1, below + 1, 1)]
                } else {
                    [(i + 1, below + 1, 1), (i - 1, below - 1, -1)]
                };
                for (side, diag, dx) in sides {
                    if area.interior(diag)
                        && props.is_passable(read.mat[diag])
                        && can_write(read, ctx.write, diag)
                        && props.is_passable(read.mat[side])
                        && ctx.rng.chance(slip)
                    {
                        swap(ctx.write, ctx.dirty, area, i, diag);
                        ctx.write.vel_x[diag] = dx;
                        break;
                    }
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
    use kiln_material::presets::{EMPTY, SAND, SMOKE, STONE, WATER};

    #[test]
    fn grain_falls_one_cell_per_step() {
        let mut s = Scene::new(8, 10, 20.0);
        s.set(4, 2, SAND, 20.0);
        s.run(&PowderPass, 1);
        assert_eq!(s.mat(4, 2), EMPTY);
        assert_eq!(s.mat(4, 3), SAND);
        s.run(&PowderPass, 1);
        assert_eq!(s.mat(4, 4), SAND);
    }

    #[test]
    fn grain_rests_on_the_border() {
        let mut s = Scene::new(6, 6, 20.0);
        s.set(2, 4, SAND, 20.0);
        let i = s.idx(1, 5);
        s.front.mat[i] = STONE;
        let i = s.idx(3, 5);
        s.front.mat[i] = STONE;
        s.run(&PowderPass, 5);
        assert_eq!(s.count(SAND), 1);
        assert_eq!(s.front.mat[s.idx(2, 5)], EMPTY);
    }

    #[test]
    fn grain_sinks_through_water_and_swaps_gas_upward() {
        let mut s = Scene::new(6, 8, 20.0);
        s.set(2, 2, SAND, 20.0);
        s.set(2, 3, WATER, 20.0);
        s.set(3, 2, SAND, 20.0);
        s.set(3, 3, SMOKE, 20.0);
        s.run(&PowderPass, 1);
        assert_eq!(s.mat(2, 3), SAND);
        assert_eq!(s.mat(2, 2), WATER);
        assert_eq!(s.mat(3, 3), SAND);
        assert_eq!(s.mat(3, 2), SMOKE);
    }

    #[test]
    fn moves_carry_temperature() {
        let mut s = Scene::new(6, 8, 20.0);
        s.set(2, 2, SAND, 300.0);
        s.run(&PowderPass, 1);
        assert_eq!(s.front.temp[s.idx(2, 3)], 300.0);
        assert_eq!(s.front.temp[s.idx(2, 2)], 20.0);
    }

    #[test]
    fn pile_conserves_grains() {
        let mut s = Scene::new(20, 20, 20.0);
        for x in 6..14 {
            for y in 2..6 {
                s.set(x, y, SAND, 20.0);
            }
        }
        s.run(&PowderPass, 60);
        assert_eq!(s.count(SAND), 32);
        // Everything has settled onto the bottom rows.
        let low = (1..19).filter(|&x| s.mat(x, 18) == SAND).count();
        assert!(low >= 8);
    }
}
