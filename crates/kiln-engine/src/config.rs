//! Engine configuration, validation, and error types.
//!
//! [`EngineConfig`] is the builder input for [`Engine`](crate::Engine).
//! [`validate()`](EngineConfig::validate) checks structural invariants
//! before any buffer is allocated.

use std::error::Error;
use std::fmt;

use kiln_core::RegistryError;
use kiln_grid::GridError;
use kiln_pass::PipelineError;

/// Default RNG seed.
pub const DEFAULT_SEED: u64 = 1337;
/// Default step length: one 60 Hz frame.
pub const DEFAULT_DT: f64 = 1.0 / 60.0;
/// Default dirty-chunk edge length in cells.
pub const DEFAULT_CHUNK_SIZE: u32 = 64;
/// Smallest grid edge that still has an interior cell.
pub const MIN_DIMENSION: u32 = 3;
/// Chunk keys pack 16 bits per axis.
pub const MAX_CHUNKS_PER_AXIS: u32 = 1 << 16;

// ── ConfigError ────────────────────────────────────────────────────

/// Errors detected while building an [`Engine`](crate::Engine).
#[derive(Debug, PartialEq)]
pub enum ConfigError {
    /// Width or height is below [`MIN_DIMENSION`].
    InvalidDimensions {
        /// Configured columns.
        width: u32,
        /// Configured rows.
        height: u32,
    },
    /// `width * height` does not fit in `u32`.
    CellCountOverflow {
        /// The overflowing product.
        value: u64,
    },
    /// `dt` is NaN, infinite, zero, or negative.
    InvalidDt {
        /// The invalid value.
        value: f64,
    },
    /// Chunk size is zero or yields too many chunks along an axis.
    InvalidChunkSize {
        /// The configured chunk size.
        chunk_size: u32,
    },
    /// Pass pipeline validation failed.
    Pipeline(PipelineError),
    /// Grid allocation failed.
    Grid(GridError),
    /// The material registry could not be built.
    Registry(RegistryError),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidDimensions { width, height } => write!(
                f,
                "grid {width}x{height} is smaller than the minimum {MIN_DIMENSION}x{MIN_DIMENSION}"
            ),
            Self::CellCountOverflow { value } => {
                write!(f, "cell count {value} exceeds u32::MAX")
            }
            Self::InvalidDt { value } => write!(f, "dt must be finite and positive, got {value}"),
            Self::InvalidChunkSize { chunk_size } => {
                write!(f, "chunk size {chunk_size} is invalid for this grid")
            }
            Self::Pipeline(e) => write!(f, "pipeline: {e}"),
            Self::Grid(e) => write!(f, "grid: {e}"),
            Self::Registry(e) => write!(f, "registry: {e}"),
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Pipeline(e) => Some(e),
            Self::Grid(e) => Some(e),
            Self::Registry(e) => Some(e),
            _ => None,
        }
    }
}

impl From<PipelineError> for ConfigError {
    fn from(e: PipelineError) -> Self {
        Self::Pipeline(e)
    }
}

impl From<GridError> for ConfigError {
    fn from(e: GridError) -> Self {
        Self::Grid(e)
    }
}

impl From<RegistryError> for ConfigError {
    fn from(e: RegistryError) -> Self {
        Self::Registry(e)
    }
}

// ── EngineConfig ───────────────────────────────────────────────────

/// Everything needed to construct an [`Engine`](crate::Engine).
#[derive(Clone, Debug, PartialEq)]
pub struct EngineConfig {
    /// Grid columns, including the 1-cell border.
    pub width: u32,
    /// Grid rows, including the 1-cell border.
    pub height: u32,
    /// Seed for the shared random stream.
    pub seed: u64,
    /// Simulated seconds per step.
    pub dt: f64,
    /// Dirty-chunk edge length in cells.
    pub chunk_size: u32,
}

impl EngineConfig {
    /// A `width x height` grid with default seed, dt and chunk size.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            seed: DEFAULT_SEED,
            dt: DEFAULT_DT,
            chunk_size: DEFAULT_CHUNK_SIZE,
        }
    }

    /// Replace the seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Replace the step length.
    pub fn with_dt(mut self, dt: f64) -> Self {
        self.dt = dt;
        self
    }

    /// Replace the dirty-chunk size.
    pub fn with_chunk_size(mut self, chunk_size: u32) -> Self {
        self.chunk_size = chunk_size;
        self
    }

    /// Check every structural invariant.
    pub fn validate(&self) -> Result<(), ConfigError> {
        // 1. There must be an interior.
        if self.width < MIN_DIMENSION || self.height < MIN_DIMENSION {
            return Err(ConfigError::InvalidDimensions {
                width: self.width,
                height: self.height,
            });
        }
        // 2. Cell count must fit in u32.
        let cells = self.width as u64 * self.height as u64;
        if u32::try_from(cells).is_err() {
            return Err(ConfigError::CellCountOverflow { value: cells });
        }
        // 3. dt must be finite and positive.
        if !self.dt.is_finite() || self.dt <= 0.0 {
            return Err(ConfigError::InvalidDt { value: self.dt });
        }
        // 4. Chunk keys must stay packable.
        if self.chunk_size == 0 {
            return Err(ConfigError::InvalidChunkSize {
                chunk_size: self.chunk_size,
            });
        }
        let chunks = self.width.max(self.height).div_ceil(self.chunk_size);
        if chunks > MAX_CHUNKS_PER_AXIS {
            return Err(ConfigError::InvalidChunkSize {
                chunk_size: self.chunk_size,
            });
        }
        Ok(())
    }
}
