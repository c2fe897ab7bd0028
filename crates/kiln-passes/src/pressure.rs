//! Quasi-hydrostatic pressure field with a fast-decaying impulse layer.
//!
//! Each step:
//! 1. decays `pressure` and `impulse` by per-frame factors raised to the
//!    frame count, nudges both one unit toward zero, and saturates;
//! 2. carries pressure bottom-up through liquid columns and lets gas sit
//!    slightly below the cell underneath it;
//! 3. smooths the field once with the 4-neighbour average;
//! 4. folds a fraction of the impulse into `pressure`, which is the
//!    effective value movement passes read.
//!
//! The outer border is left out of steps 2 to 4.
//!
//! Constructed with [`PressurePass::default`] or [`PressurePass::builder`].

use kiln_core::{Category, PassError};
use kiln_pass::{Pass, PassContext};

use crate::cells::{clamp16, step_toward_zero, Area};
use crate::constants::{
    GAS_PRESSURE_DROP, IMPULSE_BLEND_FACTOR, IMPULSE_DECAY, PRESSURE_DIFFUSION_ALPHA,
    STATIC_PRESSURE_DECAY,
};

/// Pressure and impulse solver. Always the first pass of a step.
#[derive(Clone, Debug)]
pub struct PressurePass {
    static_decay: f32,
    impulse_decay: f32,
    diffusion_alpha: f32,
    impulse_blend: f32,
}

/// Builder for [`PressurePass`]. Every knob starts at its tuned default.
#[derive(Clone, Debug)]
pub struct PressurePassBuilder {
    static_decay: f32,
    impulse_decay: f32,
    diffusion_alpha: f32,
    impulse_blend: f32,
}

impl Default for PressurePass {
    fn default() -> Self {
        Self {
            static_decay: STATIC_PRESSURE_DECAY,
            impulse_decay: IMPULSE_DECAY,
            diffusion_alpha: PRESSURE_DIFFUSION_ALPHA,
            impulse_blend: IMPULSE_BLEND_FACTOR,
        }
    }
}

impl PressurePass {
    /// Start configuring a pressure pass.
    pub fn builder() -> PressurePassBuilder {
        PressurePassBuilder {
            static_decay: STATIC_PRESSURE_DECAY,
            impulse_decay: IMPULSE_DECAY,
            diffusion_alpha: PRESSURE_DIFFUSION_ALPHA,
            impulse_blend: IMPULSE_BLEND_FACTOR,
        }
    }
}

impl PressurePassBuilder {
    /// Per-frame decay of static pressure, in `(0, 1]`.
    pub fn static_decay(mut self, v: f32) -> Self {
        self.static_decay = v;
        self
    }

    /// Per-frame decay of impulse, in `(0, 1]`.
    pub fn impulse_decay(mut self, v: f32) -> Self {
        self.impulse_decay = v;
        self
    }

    /// Smoothing weight, in `[0, 1]`.
    pub fn diffusion_alpha(mut self, v: f32) -> Self {
        self.diffusion_alpha = v;
        self
    }

    /// Fraction of impulse added to the effective pressure, `>= 0`.
    pub fn impulse_blend(mut self, v: f32) -> Self {
        self.impulse_blend = v;
        self
    }

    /// Validate and build.
    ///
    /// # Errors
    ///
    /// Returns a description of the first out-of-range or non-finite knob.
    pub fn build(self) -> Result<PressurePass, String> {
        for (name, v) in [
            ("static_decay", self.static_decay),
            ("impulse_decay", self.impulse_decay),
        ] {
            if !v.is_finite() || v <= 0.0 || v > 1.0 {
                return Err(format!("{name} must be in (0, 1], got {v}"));
            }
        }
        if !self.diffusion_alpha.is_finite() || !(0.0..=1.0).contains(&self.diffusion_alpha) {
            return Err(format!(
                "diffusion_alpha must be in [0, 1], got {}",
                self.diffusion_alpha
            ));
        }
        if !self.impulse_blend.is_finite() || self.impulse_blend < 0.0 {
            return Err(format!(
                "impulse_blend must be finite and >= 0, got {}",
                self.impulse_blend
            ));
        }
        Ok(PressurePass {
            static_decay: self.static_decay,
            impulse_decay: self.impulse_decay,
            diffusion_alpha: self.diffusion_alpha,
            impulse_blend: self.impulse_blend,
        })
    }
}

fn decay_field(values: &mut [i16], factor: f32) {
    for v in values.iter_mut() {
        let decayed = (*v as f32 * factor) as i32;
        *v = clamp16(step_toward_zero(decayed));
    }
}

impl Pass for PressurePass {
    fn name(&self) -> &str {
        "pressure"
    }

    fn execute(&self, ctx: &mut PassContext<'_>) -> Result<(), PassError> {
        let info = ctx.info();
        let frames = info.frames();
        let area = Area::of(info);
        let write = &mut *ctx.write;

        decay_field(&mut write.pressure, self.static_decay.powf(frames));
        decay_field(&mut write.impulse, self.impulse_decay.powf(frames));

        if !area.has_interior() {
            return Ok(());
        }

        let w = area.w;
        let p = &mut write.pressure;
        for y in area.rows_up() {
            for x in 1..w - 1 {
                let i = area.idx(x, y);
                let id = ctx.read.mat[i];
                let below = p[i + w] as i32;
                match ctx.props.category(id) {
                    Some(Category::Liquid) => {
                        let head = (ctx.props.density(id) * 2.0).floor().max(1.0);
                        let next = below + (head * frames).round() as i32;
                        if (p[i] as i32) < next {
                            p[i] = clamp16(next);
                        }
                    }
                    Some(Category::Gas) => {
                        let next = below - GAS_PRESSURE_DROP;
                        if (p[i] as i32) > next {
                            p[i] = clamp16(next);
                        }
                    }
                    _ => {}
                }
            }
        }

        if self.diffusion_alpha > 0.0 {
            for y in area.rows_down() {
                for x in 1..w - 1 {
                    let i = area.idx(x, y);
                    let here = p[i] as i32;
                    let sum: i32 = area.neighbours(i).iter().map(|&j| p[j] as i32).sum();
                    let avg = sum / 4;
                    let blended = here as f32 + (avg - here) as f32 * self.diffusion_alpha;
                    p[i] = clamp16(blended as i32);
                }
            }
        }

        if self.impulse_blend > 0.0 {
            let imp = &write.impulse;
            for y in area.rows_down() {
                for x in 1..w - 1 {
                    let i = area.idx(x, y);
                    let add = (imp[i] as f32 * self.impulse_blend) as i32;
                    p[i] = clamp16(p[i] as i32 + add);
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
    use kiln_material::presets::{SMOKE, WATER};

    #[test]
    fn builder_defaults_match_default() {
        let built = PressurePass::builder().build().unwrap();
        let def = PressurePass::default();
        assert_eq!(built.static_decay, def.static_decay);
        assert_eq!(built.impulse_blend, def.impulse_blend);
    }

    #[test]
    fn builder_rejects_out_of_range() {
        assert!(PressurePass::builder().static_decay(0.0).build().is_err());
        assert!(PressurePass::builder().impulse_decay(1.5).build().is_err());
        assert!(PressurePass::builder()
            .diffusion_alpha(f32::NAN)
            .build()
            .is_err());
        assert!(PressurePass::builder().impulse_blend(-0.1).build().is_err());
    }

    #[test]
    fn decay_moves_toward_zero_everywhere() {
        let mut s = Scene::new(8, 8, 20.0);
        s.front.pressure[0] = 100;
        s.front.pressure[5] = -100;
        s.run(&PressurePass::default(), 1);
        // 100 * 0.95, truncated, then one unit toward zero.
        assert!((93..=94).contains(&s.front.pressure[0]));
        assert_eq!(s.front.pressure[5], -s.front.pressure[0]);
    }

    #[test]
    fn liquid_column_accumulates_bottom_up() {
        let mut s = Scene::new(24, 24, 20.0);
        for y in 6..=16 {
            s.set(12, y, WATER, 20.0);
        }
        s.run(&PressurePass::default(), 1);
        let top = s.front.pressure[s.idx(12, 6)];
        let mid = s.front.pressure[s.idx(12, 11)];
        let bot = s.front.pressure[s.idx(12, 16)];
        assert!(top > mid, "top {top} mid {mid}");
        assert!(mid > bot, "mid {mid} bot {bot}");
        assert!(bot > 0);
    }

    #[test]
    fn gas_sits_below_the_cell_underneath() {
        let mut s = Scene::new(8, 8, 20.0);
        let i = s.set(4, 4, SMOKE, 20.0);
        s.front.pressure[i] = 50;
        s.run(&PressurePass::builder().diffusion_alpha(0.0).build().unwrap(), 1);
        assert_eq!(s.front.pressure[i], -1);
    }

    #[test]
    fn impulse_folds_into_pressure_and_decays() {
        let mut s = Scene::new(20, 16, 20.0);
        let i = s.idx(10, 8);
        s.front.impulse[i] = 100;
        s.run(&PressurePass::default(), 1);
        assert!(s.front.pressure[i] > 0);
        let mut last = s.front.impulse[i];
        for _ in 0..30 {
            s.run(&PressurePass::default(), 1);
            assert!(s.front.impulse[i] <= last);
            last = s.front.impulse[i];
        }
        assert_eq!(last, 0);
    }

    #[test]
    fn border_is_not_accumulated() {
        let mut s = Scene::new(6, 6, 20.0);
        let i = s.set(0, 5, WATER, 20.0);
        s.run(&PressurePass::default(), 1);
        assert_eq!(s.front.pressure[i], 0);
    }
}
