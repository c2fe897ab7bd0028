//! The per-cell fields stored by every grid buffer.

use std::fmt;

/// One of the parallel per-cell arrays of a grid buffer.
///
/// The declaration order is the canonical order used for hashing and
/// diagnostics.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CellField {
    /// Material id (`u16`).
    Mat,
    /// Temperature in °C (`f32`).
    Temp,
    /// Horizontal velocity hint or fire fuel-origin tag (`i8`).
    VelX,
    /// Vertical velocity hint (`i8`).
    VelY,
    /// Per-step scratch flags, cleared every step (`u8`).
    Flags,
    /// Quasi-hydrostatic static pressure (`i16`).
    Pressure,
    /// Fast-decaying transient pressure (`i16`).
    Impulse,
    /// Material-dependent counter (`u16`).
    Aux,
    /// Wetness proxy (`u8`).
    Humidity,
    /// Latent-heat accumulator (`f32`).
    Phase,
}

impl CellField {
    /// Every field in canonical order.
    pub const ALL: [CellField; 10] = [
        CellField::Mat,
        CellField::Temp,
        CellField::VelX,
        CellField::VelY,
        CellField::Flags,
        CellField::Pressure,
        CellField::Impulse,
        CellField::Aux,
        CellField::Humidity,
        CellField::Phase,
    ];

    /// Field name as used in logs and error messages.
    pub fn name(self) -> &'static str {
        match self {
            Self::Mat => "mat",
            Self::Temp => "temp",
            Self::VelX => "vel_x",
            Self::VelY => "vel_y",
            Self::Flags => "flags",
            Self::Pressure => "pressure",
            Self::Impulse => "impulse",
            Self::Aux => "aux",
            Self::Humidity => "humidity",
            Self::Phase => "phase",
        }
    }
}

impl fmt::Display for CellField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
