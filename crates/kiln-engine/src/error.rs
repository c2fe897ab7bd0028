//! Errors from editing the grid between steps.

use std::error::Error;
use std::fmt;

use kiln_core::RegistryError;
use kiln_grid::GridError;

/// Errors from [`Engine::paint`](crate::Engine::paint) and
/// [`Engine::load_tiles`](crate::Engine::load_tiles).
///
/// A failed edit leaves the grid untouched.
#[derive(Clone, Debug, PartialEq)]
pub enum EditError {
    /// The edit names a material the registry does not hold.
    Registry(RegistryError),
    /// The edit does not fit the grid.
    Grid(GridError),
}

impl fmt::Display for EditError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Registry(e) => write!(f, "registry: {e}"),
            Self::Grid(e) => write!(f, "grid: {e}"),
        }
    }
}

impl Error for EditError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Registry(e) => Some(e),
            Self::Grid(e) => Some(e),
        }
    }
}

impl From<RegistryError> for EditError {
    fn from(e: RegistryError) -> Self {
        Self::Registry(e)
    }
}

impl From<GridError> for EditError {
    fn from(e: GridError) -> Self {
        Self::Grid(e)
    }
}
