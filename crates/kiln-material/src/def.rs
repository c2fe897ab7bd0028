//! Material definitions and their validation.

use kiln_core::{Category, MaterialKind, RegistryError};

/// Immutable description of one material.
///
/// Optional properties are filled with category defaults by the
/// [`PropertyCache`](crate::PropertyCache).
#[derive(Clone, Debug, PartialEq)]
pub struct MaterialDef {
    /// Unique name, used by scene loaders.
    pub name: String,
    /// Behavioural role.
    pub kind: MaterialKind,
    /// Movement class.
    pub category: Category,
    /// Signed density. Negative values rise (gases, fire).
    pub density: f32,
    /// Flow resistance for liquids. Larger spreads less.
    pub viscosity: Option<f32>,
    /// Diagonal slip probability for powders, `[0, 1]`.
    pub slip: Option<f32>,
    /// Restitution for kinematic collaborators; unused by the passes.
    pub bounciness: Option<f32>,
    /// Whether fire and heat can ignite this material.
    pub flammable: bool,
    /// Ignition temperature in °C.
    pub combustion_temp: Option<f32>,
    /// Specific heat used for thermal mass.
    pub heat_capacity: Option<f32>,
    /// Conductivity, clamped to `[0, 1]` by the cache.
    pub conductivity: Option<f32>,
    /// Melting point in °C.
    pub melting_point: Option<f32>,
    /// Freezing point in °C.
    pub freezing_point: Option<f32>,
    /// Boiling point in °C.
    pub boiling_point: Option<f32>,
    /// Evaporation rate; informational.
    pub evaporation_rate: Option<f32>,
    /// Names of materials this one resists mixing with.
    pub immiscible_with: Vec<String>,
}

impl MaterialDef {
    /// Start a definition with the required properties.
    pub fn new(
        name: impl Into<String>,
        kind: MaterialKind,
        category: Category,
        density: f32,
    ) -> Self {
        Self {
            name: name.into(),
            kind,
            category,
            density,
            viscosity: None,
            slip: None,
            bounciness: None,
            flammable: false,
            combustion_temp: None,
            heat_capacity: None,
            conductivity: None,
            melting_point: None,
            freezing_point: None,
            boiling_point: None,
            evaporation_rate: None,
            immiscible_with: Vec::new(),
        }
    }

    /// Mark flammable with the given ignition temperature.
    pub fn flammable(mut self, combustion_temp: f32) -> Self {
        self.flammable = true;
        self.combustion_temp = Some(combustion_temp);
        self
    }

    /// Set the ignition temperature without making the material flammable.
    pub fn combustion_temp(mut self, temp: f32) -> Self {
        self.combustion_temp = Some(temp);
        self
    }

    /// Set viscosity.
    pub fn viscosity(mut self, v: f32) -> Self {
        self.viscosity = Some(v);
        self
    }

    /// Set slip.
    pub fn slip(mut self, v: f32) -> Self {
        self.slip = Some(v);
        self
    }

    /// Set bounciness.
    pub fn bounciness(mut self, v: f32) -> Self {
        self.bounciness = Some(v);
        self
    }

    /// Set heat capacity.
    pub fn heat_capacity(mut self, v: f32) -> Self {
        self.heat_capacity = Some(v);
        self
    }

    /// Set conductivity.
    pub fn conductivity(mut self, v: f32) -> Self {
        self.conductivity = Some(v);
        self
    }

    /// Set the melting point.
    pub fn melting_point(mut self, v: f32) -> Self {
        self.melting_point = Some(v);
        self
    }

    /// Set the freezing point.
    pub fn freezing_point(mut self, v: f32) -> Self {
        self.freezing_point = Some(v);
        self
    }

    /// Set the boiling point.
    pub fn boiling_point(mut self, v: f32) -> Self {
        self.boiling_point = Some(v);
        self
    }

    /// Set the evaporation rate.
    pub fn evaporation_rate(mut self, v: f32) -> Self {
        self.evaporation_rate = Some(v);
        self
    }

    /// Declare materials this one resists mixing with.
    pub fn immiscible_with<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.immiscible_with = names.into_iter().map(Into::into).collect();
        self
    }

    /// Check structural invariants.
    ///
    /// Rejects empty names, non-finite numbers, negative viscosity and
    /// slip outside `[0, 1]`. Conductivity outside `[0, 1]` is accepted
    /// and clamped later.
    pub fn validate(&self) -> Result<(), RegistryError> {
        let fail = |reason: String| RegistryError::InvalidDefinition {
            name: self.name.clone(),
            reason,
        };
        if self.name.trim().is_empty() {
            return Err(fail("name must not be empty".into()));
        }
        if !self.density.is_finite() {
            return Err(fail(format!("density must be finite, got {}", self.density)));
        }
        let optional = [
            ("viscosity", self.viscosity),
            ("slip", self.slip),
            ("bounciness", self.bounciness),
            ("combustion_temp", self.combustion_temp),
            ("heat_capacity", self.heat_capacity),
            ("conductivity", self.conductivity),
            ("melting_point", self.melting_point),
            ("freezing_point", self.freezing_point),
            ("boiling_point", self.boiling_point),
            ("evaporation_rate", self.evaporation_rate),
        ];
        for (label, value) in optional {
            if let Some(v) = value {
                if !v.is_finite() {
                    return Err(fail(format!("{label} must be finite, got {v}")));
                }
            }
        }
        if let Some(v) = self.viscosity {
            if v < 0.0 {
                return Err(fail(format!("viscosity must be non-negative, got {v}")));
            }
        }
        if let Some(v) = self.slip {
            if !(0.0..=1.0).contains(&v) {
                return Err(fail(format!("slip must be in [0, 1], got {v}")));
            }
        }
        if let Some(v) = self.heat_capacity {
            if v <= 0.0 {
                return Err(fail(format!("heat_capacity must be positive, got {v}")));
            }
        }
        if self.immiscible_with.iter().any(|n| *n == self.name) {
            return Err(fail("material cannot be immiscible with itself".into()));
        }
        Ok(())
    }
}
