//! Material passes for the Kiln simulator.
//!
//! Each pass is a stateless [`Pass`] that reads the committed front buffer
//! and writes the back buffer through a [`PassContext`](kiln_pass::PassContext).
//! Movement passes swap whole cell payloads and claim both ends, so later
//! passes in the same step never move a cell twice.
//!
//! # Pipeline order (each step)
//!
//! 1. [`PressurePass`]: decay, hydrostatic accumulation, smoothing, impulse blend
//! 2. [`PowderPass`]: fall, sink, diagonal slip
//! 3. [`LiquidPass`]: wetting, lava contact, layering, fall, spill, lateral flow
//! 4. [`GasPass`]: dissipation, bubbling, rise, drift, venting
//! 5. [`SolidPass`]: no autonomous movement
//! 6. [`EnergyPass`]: fire spread, quenching, burnout, ember motion
//! 7. [`ObjectPass`]: gravity, bomb fuses, meteors
//! 8. [`AcidPass`]: etch budgets and rubble
//! 9. [`ThermalPass`]: conduction, cooling, phase changes, reactions
//!
//! [`default_passes`] returns exactly this list.

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod acid;
pub(crate) mod cells;
pub mod constants;
pub mod energy;
pub mod gas;
pub mod liquid;
pub mod object;
pub mod powder;
pub mod pressure;
pub mod solid;
pub mod thermal;

#[cfg(test)]
mod testing;

pub use acid::AcidPass;
pub use energy::EnergyPass;
pub use gas::GasPass;
pub use liquid::LiquidPass;
pub use object::ObjectPass;
pub use powder::PowderPass;
pub use pressure::{PressurePass, PressurePassBuilder};
pub use solid::SolidPass;
pub use thermal::ThermalPass;

use kiln_pass::Pass;

/// The standard pipeline, in execution order.
pub fn default_passes() -> Vec<Box<dyn Pass>> {
    vec![
        Box::new(PressurePass::default()),
        Box::new(PowderPass),
        Box::new(LiquidPass),
        Box::new(GasPass),
        Box::new(SolidPass),
        Box::new(EnergyPass),
        Box::new(ObjectPass),
        Box::new(AcidPass),
        Box::new(ThermalPass),
    ]
}
