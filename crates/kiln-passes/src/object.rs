//! Free objects: gravity, bomb fuses and explosions, meteors.

use kiln_core::{Category, MaterialId, MaterialKind, PassError};
use kiln_pass::{Pass, PassContext};

use crate::cells::{can_write, clamp16, swap, transmute, Area};
use crate::constants::{
    BLAST_FIRE_FRACTION, BLAST_RUBBLE_CHANCE, BLAST_SHRAPNEL_FRACTION, BLAST_TEMP_C,
    BOMB_FUSE_FRAMES, BOMB_RADIUS, METEOR_HEAT_C,
};

/// Moves object cells one row per step and runs bomb and meteor rules.
///
/// A bomb's fuse lives in `aux`, counted in frames; zero means "not yet
/// lit", so the first step a bomb is seen arms it.
#[derive(Clone, Copy, Debug, Default)]
pub struct ObjectPass;

/// Materials a blast produces.
struct Blast {
    fire: Option<MaterialId>,
    smoke: Option<MaterialId>,
    rubble: Option<MaterialId>,
}

impl ObjectPass {
    /// Radius-limited blast centred on `(cx, cy)`, clipped to the interior.
    fn explode(ctx: &mut PassContext<'_>, area: Area, cx: usize, cy: usize, r: i32, blast: &Blast) {
        let (cx, cy) = (cx as i32, cy as i32);
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
                let here = ctx.write.mat[k];
                if ctx.props.kind(here) == MaterialKind::Bedrock {
                    continue;
                }
                let dist = (d2 as f32).sqrt();
                if ctx.props.is(here, Category::Solid) {
                    if let Some(rubble) = blast.rubble {
                        if dist > r as f32 * BLAST_SHRAPNEL_FRACTION
                            && ctx.rng.chance(BLAST_RUBBLE_CHANCE)
                        {
                            transmute(ctx.write, ctx.dirty, area, k, rubble);
                        }
                    }
                } else {
                    let inner = dist < r as f32 * BLAST_FIRE_FRACTION;
                    let fill = match (inner, blast.fire, blast.smoke) {
                        (true, Some(fire), _) => fire,
                        (_, _, Some(smoke)) => smoke,
                        _ => MaterialId::EMPTY,
                    };
                    transmute(ctx.write, ctx.dirty, area, k, fill);
                }
                ctx.write.temp[k] = ctx.write.temp[k].max(BLAST_TEMP_C);
                ctx.write.impulse[k] = ctx.write.impulse[k].max(clamp16(r * 20 - d2));
                ctx.dirty.mark(px as u32, py as u32);
            }
        }
    }

    /// Push powder or liquid under the meteor into a free diagonal-below
    /// slot and drop the meteor into its place.
    fn displace(ctx: &mut PassContext<'_>, area: Area, i: usize, below: usize) -> bool {
        let read = ctx.read;
        let medium = read.mat[below];
        if !(ctx.props.is(medium, Category::Powder) || ctx.props.is(medium, Category::Liquid))
            || !can_write(read, ctx.write, below)
        {
            return false;
        }
        let target = [below - 1, below + 1].into_iter().find(|&t| {
            area.interior(t) && read.mat[t].is_empty() && can_write(read, ctx.write, t)
        });
        match target {
            Some(target) => {
                swap(ctx.write, ctx.dirty, area, below, target);
                swap(ctx.write, ctx.dirty, area, i, below);
                true
            }
            None => false,
        }
    }
}

impl Pass for ObjectPass {
    fn name(&self) -> &str {
        "objects"
    }

    fn execute(&self, ctx: &mut PassContext<'_>) -> Result<(), PassError> {
        let info = ctx.info();
        let area = Area::of(info);
        if !area.has_interior() {
            return Ok(());
        }
        let w = area.w;
        let read = ctx.read;
        let props = ctx.props;
        let blast = Blast {
            fire: props.role(MaterialKind::Fire),
            smoke: props.role(MaterialKind::Smoke),
            rubble: props.role(MaterialKind::Rubble),
        };
        let tick_frames = info.whole_frames();

        for y in area.rows_up() {
            for x in 1..w - 1 {
                let i = area.idx(x, y);
                let id = read.mat[i];
                if !props.is(id, Category::Object) || !can_write(read, ctx.write, i) {
                    continue;
                }
                let below = i + w;
                match props.kind(id) {
                    MaterialKind::Bomb => {
                        let fuse = &mut ctx.write.aux[i];
                        if *fuse == 0 {
                            *fuse = BOMB_FUSE_FRAMES;
                        }
                        *fuse = fuse.saturating_sub(tick_frames);
                        if *fuse == 0 {
                            Self::explode(ctx, area, x, y, BOMB_RADIUS, &blast);
                            continue;
                        }
                    }
                    MaterialKind::Meteor => {
                        for j in area.neighbours(i) {
                            ctx.write.temp[j] += METEOR_HEAT_C;
                        }
                    }
                    _ => {}
                }

                if !area.interior(below) {
                    continue;
                }
                if props.is_passable(read.mat[below]) && can_write(read, ctx.write, below) {
                    swap(ctx.write, ctx.dirty, area, i, below);
                    ctx.write.vel_y[below] = 1;
                    continue;
                }
                if props.kind(id) == MaterialKind::Meteor {
                    Self::displace(ctx, area, i, below);
                }
            }
        }
        Ok(())
    }
}
