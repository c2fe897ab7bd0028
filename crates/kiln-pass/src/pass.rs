//! The [`Pass`] trait.

use kiln_core::PassError;

use crate::context::PassContext;

/// A stateless operator in the per-step pipeline.
///
/// # Contract
///
/// - `execute()` MUST be deterministic: the same buffers and the same
///   generator state produce identical writes and identical draws.
/// - `&self`: passes keep no state between steps; anything that must
///   persist lives in the cell fields.
/// - Only `ctx.write` may be mutated. `ctx.read` is the committed state.
///
/// # Object safety
///
/// The pipeline stores passes as `Vec<Box<dyn Pass>>`.
///
/// # Examples
///
/// ```
/// use kiln_core::PassError;
/// use kiln_pass::{Pass, PassContext};
///
/// /// Warms every cell by one degree.
/// struct Warm;
///
/// impl Pass for Warm {
///     fn name(&self) -> &str { "warm" }
///
///     fn execute(&self, ctx: &mut PassContext<'_>) -> Result<(), PassError> {
///         for t in ctx.write.temp.iter_mut() {
///             *t += 1.0;
///         }
///         Ok(())
///     }
/// }
///
/// assert_eq!(Warm.name(), "warm");
/// ```
pub trait Pass: Send + 'static {
    /// Unique name for error reporting and timing.
    fn name(&self) -> &str;

    /// Run the pass for one step.
    fn execute(&self, ctx: &mut PassContext<'_>) -> Result<(), PassError>;
}
