//! Material categories, behavioural kinds and fire fuel origins.

use std::fmt;

/// Broad movement class of a material.
///
/// Determines which movement pass, if any, updates cells of this material.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Category {
    /// Static; moved only by explosions, acid or thermal transitions.
    Solid,
    /// Granular; falls and slips diagonally.
    Powder,
    /// Flows, layers by density and spreads by pressure.
    Liquid,
    /// Rises, diffuses and vents.
    Gas,
    /// Fire and embers.
    Energy,
    /// Rigid single-cell bodies such as bombs and meteors.
    Object,
}

impl Category {
    /// All categories in code order.
    pub const ALL: [Category; 6] = [
        Category::Solid,
        Category::Powder,
        Category::Liquid,
        Category::Gas,
        Category::Energy,
        Category::Object,
    ];

    /// Compact code used in lookup tables. `0` is reserved for empty.
    pub fn code(self) -> u8 {
        match self {
            Self::Solid => 1,
            Self::Powder => 2,
            Self::Liquid => 3,
            Self::Gas => 4,
            Self::Energy => 5,
            Self::Object => 6,
        }
    }

    /// Lowercase name.
    pub fn name(self) -> &'static str {
        match self {
            Self::Solid => "solid",
            Self::Powder => "powder",
            Self::Liquid => "liquid",
            Self::Gas => "gas",
            Self::Energy => "energy",
            Self::Object => "object",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Behavioural role of a material.
///
/// Passes dispatch on the kind instead of comparing names. Each kind other
/// than [`MaterialKind::Generic`] may be registered at most once per
/// registry; `Generic` materials act only through their category and
/// numeric properties.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MaterialKind {
    /// No special behaviour.
    Generic,
    /// Product of lava quenching and solidification.
    Stone,
    /// Burns to embers.
    Wood,
    /// Melts through the fusion accumulator.
    Ice,
    /// Pops into smoke when hot.
    Rubber,
    /// Vitrifies into glass when very hot.
    Sand,
    /// Flashes near fire, turns to mud when wet.
    Dust,
    /// Boils, freezes, quenches fire and wets neighbours.
    Water,
    /// Etches stone, wood and glass.
    Acid,
    /// Smothers fire and decays into water.
    Foam,
    /// Dissipates over time.
    Smoke,
    /// Rises and condenses.
    Steam,
    /// Burning cell with a lifetime.
    Fire,
    /// Fast-burning liquid fuel.
    Oil,
    /// Hot liquid that ignites and solidifies.
    Lava,
    /// Wet powder that dries into sand.
    Mud,
    /// Falling glowing remnant of burnt wood.
    Ember,
    /// Object with a fuse that explodes.
    Bomb,
    /// Hot object that bores through powders and liquids.
    Meteor,
    /// Plain falling object.
    Ball,
    /// Debris from explosions and etching.
    Rubble,
    /// Burnt residue.
    Ash,
    /// Product of sand vitrification.
    Glass,
    /// Indestructible boundary solid.
    Bedrock,
}

impl MaterialKind {
    /// Kinds acid can dissolve into rubble.
    pub fn is_etchable(self) -> bool {
        matches!(self, Self::Stone | Self::Wood | Self::Glass)
    }

    /// Kinds that wet their neighbours.
    pub fn is_wetting(self) -> bool {
        matches!(self, Self::Water | Self::Foam | Self::Acid)
    }
}

/// Fuel a fire cell originated from, stored in the `vel_x` slot.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum FuelOrigin {
    /// Unknown or generic fuel.
    #[default]
    Unknown,
    /// Oil; burns short and leaves smoke.
    Oil,
    /// Wood; burns long and leaves embers.
    Wood,
}

impl FuelOrigin {
    /// Code written into the `vel_x` scratch slot.
    pub fn code(self) -> i8 {
        match self {
            Self::Unknown => 0,
            Self::Oil => 1,
            Self::Wood => 2,
        }
    }

    /// Decode a scratch tag; unrecognised codes read as `Unknown`.
    pub fn from_code(code: i8) -> Self {
        match code {
            1 => Self::Oil,
            2 => Self::Wood,
            _ => Self::Unknown,
        }
    }

    /// Origin recorded when a material of this kind catches fire.
    pub fn of_kind(kind: MaterialKind) -> Self {
        match kind {
            MaterialKind::Oil => Self::Oil,
            MaterialKind::Wood => Self::Wood,
            _ => Self::Unknown,
        }
    }
}
