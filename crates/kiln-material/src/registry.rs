//! The immutable-after-construction material table.

use indexmap::IndexMap;
use kiln_core::{MaterialId, MaterialKind, RegistryError};

use crate::def::MaterialDef;

/// Name- and kind-indexed table of material definitions.
///
/// Ids are assigned sequentially from 1 in registration order. Build the
/// registry at startup, then hand it to the engine behind an `Arc`; the
/// engine never registers materials itself.
#[derive(Clone, Debug, Default)]
pub struct MaterialRegistry {
    /// `defs[n]` is the definition for `MaterialId(n + 1)`.
    defs: Vec<MaterialDef>,
    by_name: IndexMap<String, MaterialId>,
    by_kind: IndexMap<MaterialKind, MaterialId>,
}

impl MaterialRegistry {
    /// An empty registry. Only [`MaterialId::EMPTY`] is valid.
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate and register a material, returning its new id.
    pub fn register(&mut self, def: MaterialDef) -> Result<MaterialId, RegistryError> {
        def.validate()?;
        if self.by_name.contains_key(&def.name) {
            return Err(RegistryError::DuplicateName { name: def.name });
        }
        if def.kind != MaterialKind::Generic && self.by_kind.contains_key(&def.kind) {
            return Err(RegistryError::DuplicateKind { kind: def.kind });
        }
        let next = u16::try_from(self.defs.len() + 1).map_err(|_| RegistryError::RegistryFull)?;
        let id = MaterialId(next);
        self.by_name.insert(def.name.clone(), id);
        if def.kind != MaterialKind::Generic {
            self.by_kind.insert(def.kind, id);
        }
        self.defs.push(def);
        Ok(id)
    }

    /// Check that every immiscibility reference names a registered material.
    ///
    /// References may point forward during registration, so this runs once
    /// the table is complete.
    pub fn check_links(&self) -> Result<(), RegistryError> {
        for def in &self.defs {
            for other in &def.immiscible_with {
                if !self.by_name.contains_key(other) {
                    return Err(RegistryError::InvalidDefinition {
                        name: def.name.clone(),
                        reason: format!("immiscible_with names unknown material '{other}'"),
                    });
                }
            }
        }
        Ok(())
    }

    /// Definition for `id`, or `None` for empty and unregistered ids.
    pub fn get(&self, id: MaterialId) -> Option<&MaterialDef> {
        if id.is_empty() {
            return None;
        }
        self.defs.get(id.index() - 1)
    }

    /// Id registered under `name`.
    ///
    /// Unknown names are an error; nothing is substituted.
    pub fn id(&self, name: &str) -> Result<MaterialId, RegistryError> {
        self.find(name).ok_or_else(|| RegistryError::UnknownMaterial {
            name: name.to_string(),
        })
    }

    /// Id registered under `name`, if any.
    pub fn find(&self, name: &str) -> Option<MaterialId> {
        self.by_name.get(name).copied()
    }

    /// Id of the material registered with a non-generic `kind`.
    pub fn id_of_kind(&self, kind: MaterialKind) -> Option<MaterialId> {
        self.by_kind.get(&kind).copied()
    }

    /// Whether `id` is empty or registered.
    pub fn contains(&self, id: MaterialId) -> bool {
        id.index() <= self.defs.len()
    }

    /// Highest assigned id; [`MaterialId::EMPTY`] when nothing is registered.
    pub fn max_id(&self) -> MaterialId {
        // `register` caps the table at u16::MAX entries.
        MaterialId(self.defs.len() as u16)
    }

    /// Number of registered materials, excluding empty.
    pub fn len(&self) -> usize {
        self.defs.len()
    }

    /// Whether no materials are registered.
    pub fn is_empty(&self) -> bool {
        self.defs.is_empty()
    }

    /// Registered `(id, definition)` pairs in id order.
    pub fn iter(&self) -> impl Iterator<Item = (MaterialId, &MaterialDef)> {
        self.defs
            .iter()
            .enumerate()
            .map(|(n, def)| (MaterialId(n as u16 + 1), def))
    }

    /// Kinds with a registered material, in registration order.
    pub fn kinds(&self) -> &IndexMap<MaterialKind, MaterialId> {
        &self.by_kind
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kiln_core::Category;

    fn water() -> MaterialDef {
        MaterialDef::new("Water", MaterialKind::Water, Category::Liquid, 5.5)
    }

    #[test]
    fn ids_start_at_one_and_are_sequential() {
        let mut reg = MaterialRegistry::new();
        let a = reg.register(water()).unwrap();
        let b = reg
            .register(MaterialDef::new(
                "Sand",
                MaterialKind::Sand,
                Category::Powder,
                7.0,
            ))
            .unwrap();
        assert_eq!(a, MaterialId(1));
        assert_eq!(b, MaterialId(2));
        assert_eq!(reg.max_id(), MaterialId(2));
        assert_eq!(reg.get(b).map(|d| d.name.as_str()), Some("Sand"));
        assert!(reg.get(MaterialId::EMPTY).is_none());
        assert!(reg.get(MaterialId(3)).is_none());
    }

    #[test]
    fn unknown_name_fails_loudly() {
        let reg = MaterialRegistry::new();
        assert_eq!(
            reg.id("Water"),
            Err(RegistryError::UnknownMaterial {
                name: "Water".into()
            })
        );
    }

    #[test]
    fn duplicate_name_rejected() {
        let mut reg = MaterialRegistry::new();
        reg.register(water()).unwrap();
        let dup = MaterialDef::new("Water", MaterialKind::Generic, Category::Liquid, 1.0);
        assert!(matches!(
            reg.register(dup),
            Err(RegistryError::DuplicateName { .. })
        ));
        assert_eq!(reg.len(), 1);
    }

    #[test]
    fn duplicate_kind_rejected_but_generic_repeats() {
        let mut reg = MaterialRegistry::new();
        reg.register(water()).unwrap();
        let again = MaterialDef::new("Brine", MaterialKind::Water, Category::Liquid, 6.0);
        assert_eq!(
            reg.register(again),
            Err(RegistryError::DuplicateKind {
                kind: MaterialKind::Water
            })
        );
        for name in ["Brick", "Tile"] {
            reg.register(MaterialDef::new(
                name,
                MaterialKind::Generic,
                Category::Solid,
                8.0,
            ))
            .unwrap();
        }
        assert_eq!(reg.id_of_kind(MaterialKind::Water), Some(MaterialId(1)));
        assert_eq!(reg.id_of_kind(MaterialKind::Generic), None);
        assert_eq!(reg.len(), 3);
    }

    #[test]
    fn dangling_immiscibility_reported() {
        let mut reg = MaterialRegistry::new();
        reg.register(water().immiscible_with(["Oil"])).unwrap();
        assert!(reg.check_links().is_err());
        reg.register(MaterialDef::new(
            "Oil",
            MaterialKind::Oil,
            Category::Liquid,
            5.0,
        ))
        .unwrap();
        assert!(reg.check_links().is_ok());
    }

    #[test]
    fn contains_covers_empty_and_registered() {
        let mut reg = MaterialRegistry::new();
        assert!(reg.contains(MaterialId::EMPTY));
        assert!(!reg.contains(MaterialId(1)));
        reg.register(water()).unwrap();
        assert!(reg.contains(MaterialId(1)));
    }
}
