//! Flat per-id property arrays derived from a registry.
//!
//! Passes index these arrays by material id in their inner loops. Missing
//! optional properties are replaced by category defaults at build time.

use indexmap::IndexMap;
use kiln_core::{Category, MaterialId, MaterialKind};
use smallvec::SmallVec;

use crate::registry::MaterialRegistry;

/// Lower bound on thermal mass so near-massless cells stay stable.
pub const MIN_THERMAL_MASS: f32 = 1.0;

/// Density used for materials whose definition is unusable.
const DEFAULT_DENSITY: f32 = 5.0;

/// Ignition temperature for materials that do not declare one.
const DEFAULT_COMBUSTION_TEMP_C: f32 = 300.0;

const DEFAULT_VISCOSITY: f32 = 1.0;
const DEFAULT_SLIP: f32 = 0.7;

/// Heat capacity when a material omits it. `None` is empty space.
fn default_heat_capacity(category: Option<Category>) -> f32 {
    match category {
        None => 1.0,
        Some(Category::Solid) => 1.0,
        Some(Category::Powder) => 0.9,
        Some(Category::Liquid) => 3.0,
        Some(Category::Gas) => 0.6,
        Some(Category::Energy) => 1.0,
        Some(Category::Object) => 1.0,
    }
}

/// Conductivity when a material omits it. `None` is empty space.
fn default_conductivity(category: Option<Category>) -> f32 {
    match category {
        None => 0.02,
        Some(Category::Solid) => 0.5,
        Some(Category::Powder) => 0.25,
        Some(Category::Liquid) => 0.4,
        Some(Category::Gas) => 0.03,
        Some(Category::Energy) => 0.1,
        Some(Category::Object) => 0.4,
    }
}

/// Structure-of-arrays view of a [`MaterialRegistry`].
///
/// Index 0 always holds the empty-space defaults. Lookups for ids beyond
/// the table return empty-space values.
#[derive(Clone, Debug, Default)]
pub struct PropertyCache {
    size: usize,
    category: Vec<Option<Category>>,
    kind: Vec<MaterialKind>,
    density: Vec<f32>,
    heat_capacity: Vec<f32>,
    conductivity: Vec<f32>,
    thermal_mass: Vec<f32>,
    flammable: Vec<bool>,
    combustion_temp: Vec<f32>,
    viscosity: Vec<f32>,
    slip: Vec<f32>,
    melting_point: Vec<Option<f32>>,
    freezing_point: Vec<Option<f32>>,
    boiling_point: Vec<Option<f32>>,
    immiscible: Vec<SmallVec<[MaterialId; 4]>>,
    roles: IndexMap<MaterialKind, MaterialId>,
}

impl PropertyCache {
    /// Build a cache for `registry`.
    pub fn new(registry: &MaterialRegistry) -> Self {
        let mut cache = Self::default();
        cache.rebuild(registry);
        cache
    }

    /// Rebuild if the registry's highest id changed. Returns whether a
    /// rebuild happened.
    pub fn ensure(&mut self, registry: &MaterialRegistry) -> bool {
        let wanted = registry.max_id().index() + 1;
        if self.size == wanted {
            return false;
        }
        self.rebuild(registry);
        true
    }

    fn rebuild(&mut self, registry: &MaterialRegistry) {
        let size = registry.max_id().index() + 1;
        self.size = size;
        self.category = vec![None; size];
        self.kind = vec![MaterialKind::Generic; size];
        self.density = vec![0.0; size];
        self.heat_capacity = vec![default_heat_capacity(None); size];
        self.conductivity = vec![default_conductivity(None); size];
        self.thermal_mass = vec![MIN_THERMAL_MASS; size];
        self.flammable = vec![false; size];
        self.combustion_temp = vec![DEFAULT_COMBUSTION_TEMP_C; size];
        self.viscosity = vec![DEFAULT_VISCOSITY; size];
        self.slip = vec![DEFAULT_SLIP; size];
        self.melting_point = vec![None; size];
        self.freezing_point = vec![None; size];
        self.boiling_point = vec![None; size];
        self.immiscible = vec![SmallVec::new(); size];
        self.roles = registry.kinds().clone();

        for (id, def) in registry.iter() {
            let i = id.index();
            let category = Some(def.category);
            let density = if def.density.is_finite() {
                def.density.abs()
            } else {
                DEFAULT_DENSITY
            };
            let heat_capacity = def
                .heat_capacity
                .unwrap_or_else(|| default_heat_capacity(category));
            self.category[i] = category;
            self.kind[i] = def.kind;
            self.density[i] = density;
            self.heat_capacity[i] = heat_capacity;
            self.conductivity[i] = def
                .conductivity
                .unwrap_or_else(|| default_conductivity(category))
                .clamp(0.0, 1.0);
            self.thermal_mass[i] = (heat_capacity * density).max(MIN_THERMAL_MASS);
            self.flammable[i] = def.flammable;
            self.combustion_temp[i] = def.combustion_temp.unwrap_or(DEFAULT_COMBUSTION_TEMP_C);
            self.viscosity[i] = def.viscosity.unwrap_or(DEFAULT_VISCOSITY);
            self.slip[i] = def.slip.unwrap_or(DEFAULT_SLIP);
            self.melting_point[i] = def.melting_point;
            self.freezing_point[i] = def.freezing_point;
            self.boiling_point[i] = def.boiling_point;
            self.immiscible[i] = def
                .immiscible_with
                .iter()
                .filter_map(|name| registry.find(name))
                .collect();
        }
        log::debug!("property cache rebuilt for {} materials", size - 1);
    }

    /// Number of ids covered, including empty.
    pub fn len(&self) -> usize {
        self.size
    }

    /// Whether the cache has never been built.
    pub fn is_empty(&self) -> bool {
        self.size == 0
    }

    /// Category of `id`; `None` for empty space.
    #[inline]
    pub fn category(&self, id: MaterialId) -> Option<Category> {
        self.category.get(id.index()).copied().flatten()
    }

    /// Whether `id` belongs to `category`.
    #[inline]
    pub fn is(&self, id: MaterialId, category: Category) -> bool {
        self.category(id) == Some(category)
    }

    /// Behavioural kind of `id`.
    #[inline]
    pub fn kind(&self, id: MaterialId) -> MaterialKind {
        self.kind
            .get(id.index())
            .copied()
            .unwrap_or(MaterialKind::Generic)
    }

    /// Empty space or any gas: cells that powders, liquids and objects
    /// may displace.
    #[inline]
    pub fn is_passable(&self, id: MaterialId) -> bool {
        id.is_empty() || self.is(id, Category::Gas)
    }

    /// Absolute density.
    #[inline]
    pub fn density(&self, id: MaterialId) -> f32 {
        self.density.get(id.index()).copied().unwrap_or(0.0)
    }

    /// Heat capacity with category default applied.
    #[inline]
    pub fn heat_capacity(&self, id: MaterialId) -> f32 {
        self.heat_capacity
            .get(id.index())
            .copied()
            .unwrap_or_else(|| default_heat_capacity(None))
    }

    /// Conductivity in `[0, 1]` with category default applied.
    #[inline]
    pub fn conductivity(&self, id: MaterialId) -> f32 {
        self.conductivity
            .get(id.index())
            .copied()
            .unwrap_or_else(|| default_conductivity(None))
    }

    /// `max(MIN_THERMAL_MASS, heat_capacity * density)`.
    #[inline]
    pub fn thermal_mass(&self, id: MaterialId) -> f32 {
        self.thermal_mass
            .get(id.index())
            .copied()
            .unwrap_or(MIN_THERMAL_MASS)
    }

    /// Whether `id` can burn.
    #[inline]
    pub fn flammable(&self, id: MaterialId) -> bool {
        self.flammable.get(id.index()).copied().unwrap_or(false)
    }

    /// Ignition temperature.
    #[inline]
    pub fn combustion_temp(&self, id: MaterialId) -> f32 {
        self.combustion_temp
            .get(id.index())
            .copied()
            .unwrap_or(DEFAULT_COMBUSTION_TEMP_C)
    }

    /// Viscosity.
    #[inline]
    pub fn viscosity(&self, id: MaterialId) -> f32 {
        self.viscosity
            .get(id.index())
            .copied()
            .unwrap_or(DEFAULT_VISCOSITY)
    }

    /// Slip probability.
    #[inline]
    pub fn slip(&self, id: MaterialId) -> f32 {
        self.slip.get(id.index()).copied().unwrap_or(DEFAULT_SLIP)
    }

    /// Melting point, if declared.
    #[inline]
    pub fn melting_point(&self, id: MaterialId) -> Option<f32> {
        self.melting_point.get(id.index()).copied().flatten()
    }

    /// Freezing point, if declared.
    #[inline]
    pub fn freezing_point(&self, id: MaterialId) -> Option<f32> {
        self.freezing_point.get(id.index()).copied().flatten()
    }

    /// Boiling point, if declared.
    #[inline]
    pub fn boiling_point(&self, id: MaterialId) -> Option<f32> {
        self.boiling_point.get(id.index()).copied().flatten()
    }

    /// Whether either material lists the other as immiscible.
    pub fn is_immiscible(&self, a: MaterialId, b: MaterialId) -> bool {
        let lists = |x: MaterialId, y: MaterialId| {
            self.immiscible
                .get(x.index())
                .is_some_and(|list| list.contains(&y))
        };
        lists(a, b) || lists(b, a)
    }

    /// Material registered for a behavioural role.
    #[inline]
    pub fn role(&self, kind: MaterialKind) -> Option<MaterialId> {
        self.roles.get(&kind).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::def::MaterialDef;
    use crate::presets;
    use proptest::prelude::*;

    fn standard() -> (MaterialRegistry, PropertyCache) {
        let reg = MaterialRegistry::standard().unwrap();
        let cache = PropertyCache::new(&reg);
        (reg, cache)
    }

    #[test]
    fn index_zero_is_empty() {
        let (_, cache) = standard();
        assert_eq!(cache.category(MaterialId::EMPTY), None);
        assert_eq!(cache.density(MaterialId::EMPTY), 0.0);
        assert!(cache.is_passable(MaterialId::EMPTY));
        assert_eq!(cache.thermal_mass(MaterialId::EMPTY), MIN_THERMAL_MASS);
    }

    #[test]
    fn gas_density_is_stored_unsigned() {
        let (_, cache) = standard();
        assert_eq!(cache.density(presets::SMOKE), 2.0);
        assert!(cache.is_passable(presets::STEAM));
        assert!(!cache.is_passable(presets::WATER));
    }

    #[test]
    fn category_defaults_fill_missing_fields() {
        let (_, cache) = standard();
        // Sand declares conductivity but not heat capacity.
        assert_eq!(cache.conductivity(presets::SAND), 0.2);
        assert_eq!(cache.heat_capacity(presets::SAND), 0.9);
        // Gases conduct and store less heat than solids.
        assert!(cache.conductivity(presets::SMOKE) < cache.conductivity(presets::BOMB));
        assert!(cache.heat_capacity(presets::STEAM) < cache.heat_capacity(presets::BOMB));
        assert_eq!(cache.combustion_temp(presets::SAND), 300.0);
    }

    #[test]
    fn conductivity_is_clamped() {
        let mut reg = MaterialRegistry::new();
        let id = reg
            .register(
                MaterialDef::new("Hot", MaterialKind::Generic, Category::Solid, 1.0)
                    .conductivity(4.0),
            )
            .unwrap();
        let cache = PropertyCache::new(&reg);
        assert_eq!(cache.conductivity(id), 1.0);
    }

    #[test]
    fn immiscibility_is_symmetric_even_when_declared_once() {
        let (_, cache) = standard();
        assert!(cache.is_immiscible(presets::WATER, presets::OIL));
        assert!(cache.is_immiscible(presets::OIL, presets::WATER));
        // Declared only by Lava.
        assert!(cache.is_immiscible(presets::ACID, presets::LAVA));
        assert!(!cache.is_immiscible(presets::WATER, presets::ACID));
    }

    #[test]
    fn ensure_is_noop_until_registry_grows() {
        let mut reg = MaterialRegistry::new();
        reg.register(MaterialDef::new(
            "A",
            MaterialKind::Generic,
            Category::Solid,
            1.0,
        ))
        .unwrap();
        let mut cache = PropertyCache::default();
        assert!(cache.is_empty());
        assert!(cache.ensure(&reg));
        assert!(!cache.ensure(&reg));
        reg.register(MaterialDef::new(
            "B",
            MaterialKind::Generic,
            Category::Powder,
            2.0,
        ))
        .unwrap();
        assert!(cache.ensure(&reg));
        assert_eq!(cache.len(), 3);
    }

    #[test]
    fn roles_resolve_kinds() {
        let (_, cache) = standard();
        assert_eq!(cache.role(MaterialKind::Steam), Some(presets::STEAM));
        assert_eq!(cache.kind(presets::LAVA), MaterialKind::Lava);
        assert_eq!(cache.kind(MaterialId(999)), MaterialKind::Generic);
    }

    proptest! {
        #[test]
        fn immiscible_query_is_commutative(a in 0u16..45, b in 0u16..45) {
            let (_, cache) = standard();
            prop_assert_eq!(
                cache.is_immiscible(MaterialId(a), MaterialId(b)),
                cache.is_immiscible(MaterialId(b), MaterialId(a))
            );
        }
    }
}
