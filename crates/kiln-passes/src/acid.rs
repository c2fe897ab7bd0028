//! Acid etching.

use kiln_core::{MaterialId, MaterialKind, PassError, AMBIENT_TEMPERATURE_C};
use kiln_pass::{Pass, PassContext};

use crate::cells::{transmute, Area};
use crate::constants::{
    ACID_ETCH_GAIN, ACID_ETCH_HEAT_C, ACID_ETCH_HUMIDITY, ACID_ETCH_THRESHOLD, ACID_HEAT_SCALE_C,
    ACID_SMOKE_AFTER,
};

/// Acid wears down adjacent stone, wood and glass.
///
/// Each etchable solid keeps an etch budget in `aux`; warm acid fills it
/// faster. A full budget turns the solid into rubble. The acid counts its
/// own etches in `aux` and vents as smoke once spent.
///
/// Acid is found at its post-movement position, so this pass reads the
/// write buffer rather than the committed one.
#[derive(Clone, Copy, Debug, Default)]
pub struct AcidPass;

impl Pass for AcidPass {
    fn name(&self) -> &str {
        "acid"
    }

    fn execute(&self, ctx: &mut PassContext<'_>) -> Result<(), PassError> {
        let info = ctx.info();
        let area = Area::of(info);
        if !area.has_interior() {
            return Ok(());
        }
        let props = ctx.props;
        let Some(acid) = props.role(MaterialKind::Acid) else {
            return Ok(());
        };
        let rubble = props.role(MaterialKind::Rubble);
        let smoke = props.role(MaterialKind::Smoke).unwrap_or(MaterialId::EMPTY);
        let frames = info.frames();

        for y in area.rows_down() {
            for x in 1..area.w - 1 {
                let i = area.idx(x, y);
                if ctx.write.mat[i] != acid {
                    continue;
                }
                let heat =
                    ((ctx.write.temp[i] - AMBIENT_TEMPERATURE_C) / ACID_HEAT_SCALE_C).max(0.0);
                let gain = (ACID_ETCH_GAIN * (1.0 + heat) * frames).round() as u16;

                for j in area.interior_neighbours(i) {
                    if !props.kind(ctx.write.mat[j]).is_etchable() {
                        continue;
                    }
                    let budget = ctx.write.aux[j].saturating_add(gain);
                    ctx.write.aux[j] = budget;
                    if budget < ACID_ETCH_THRESHOLD {
                        continue;
                    }
                    let Some(rubble) = rubble else { continue };
                    transmute(ctx.write, ctx.dirty, area, j, rubble);
                    ctx.write.temp[j] += ACID_ETCH_HEAT_C;
                    ctx.write.humidity[j] =
                        ctx.write.humidity[j].saturating_add(ACID_ETCH_HUMIDITY);

                    let spent = ctx.write.aux[i].saturating_add(1);
                    ctx.write.aux[i] = spent;
                    if spent >= ACID_SMOKE_AFTER {
                        transmute(ctx.write, ctx.dirty, area, i, smoke);
                        break;
                    }
                }
            }
        }
        Ok(())
    }
}
