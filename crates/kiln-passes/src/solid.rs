//! Solids never move on their own.

use kiln_core::PassError;
use kiln_pass::{Pass, PassContext};

/// Placeholder slot in the pipeline. Solids change only through blasts,
/// acid and the thermal pass, so this pass writes nothing.
#[derive(Clone, Copy, Debug, Default)]
pub struct SolidPass;

impl Pass for SolidPass {
    fn name(&self) -> &str {
        "solid"
    }

    fn execute(&self, _ctx: &mut PassContext<'_>) -> Result<(), PassError> {
        Ok(())
    }
}
