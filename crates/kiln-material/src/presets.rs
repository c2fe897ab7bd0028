//! The standard material table.
//!
//! Ids are assigned in table order, so the constants below are valid for
//! any registry produced by [`MaterialRegistry::standard`].

use kiln_core::{Category, MaterialId, MaterialKind, RegistryError};

use crate::def::MaterialDef;
use crate::registry::MaterialRegistry;

/// Empty space.
pub const EMPTY: MaterialId = MaterialId::EMPTY;
/// `Stone` in the standard table.
pub const STONE: MaterialId = MaterialId(1);
/// `Wood` in the standard table.
pub const WOOD: MaterialId = MaterialId(2);
/// `Ice` in the standard table.
pub const ICE: MaterialId = MaterialId(3);
/// `Rubber` in the standard table.
pub const RUBBER: MaterialId = MaterialId(4);
/// `Sand` in the standard table.
pub const SAND: MaterialId = MaterialId(5);
/// `Dust` in the standard table.
pub const DUST: MaterialId = MaterialId(6);
/// `Water` in the standard table.
pub const WATER: MaterialId = MaterialId(7);
/// `Acid` in the standard table.
pub const ACID: MaterialId = MaterialId(8);
/// `Foam` in the standard table.
pub const FOAM: MaterialId = MaterialId(9);
/// `Smoke` in the standard table.
pub const SMOKE: MaterialId = MaterialId(10);
/// `Steam` in the standard table.
pub const STEAM: MaterialId = MaterialId(11);
/// `Fire` in the standard table.
pub const FIRE: MaterialId = MaterialId(12);
/// `Oil` in the standard table.
pub const OIL: MaterialId = MaterialId(13);
/// `Lava` in the standard table.
pub const LAVA: MaterialId = MaterialId(14);
/// `Mud` in the standard table.
pub const MUD: MaterialId = MaterialId(15);
/// `Ember` in the standard table.
pub const EMBER: MaterialId = MaterialId(16);
/// `Bomb` in the standard table.
pub const BOMB: MaterialId = MaterialId(17);
/// `Meteor` in the standard table.
pub const METEOR: MaterialId = MaterialId(18);
/// `Ball` in the standard table.
pub const BALL: MaterialId = MaterialId(19);
/// `Rubble` in the standard table.
pub const RUBBLE: MaterialId = MaterialId(20);
/// `Ash` in the standard table.
pub const ASH: MaterialId = MaterialId(21);
/// `Glass` in the standard table.
pub const GLASS: MaterialId = MaterialId(22);
/// `Bedrock` in the standard table.
pub const BEDROCK: MaterialId = MaterialId(23);

/// The standard definitions in id order.
pub fn standard_defs() -> Vec<MaterialDef> {
    use Category::*;
    use MaterialKind as K;
    vec![
        MaterialDef::new("Stone", K::Stone, Solid, 9.0)
            .conductivity(0.7)
            .heat_capacity(0.8)
            .melting_point(1200.0),
        MaterialDef::new("Wood", K::Wood, Solid, 5.0)
            .flammable(300.0)
            .conductivity(0.1)
            .heat_capacity(1.5),
        MaterialDef::new("Ice", K::Ice, Solid, 9.2)
            .melting_point(0.0)
            .conductivity(0.5)
            .heat_capacity(2.1),
        MaterialDef::new("Rubber", K::Rubber, Solid, 6.0)
            .conductivity(0.05)
            .bounciness(0.8),
        MaterialDef::new("Sand", K::Sand, Powder, 7.0)
            .slip(0.75)
            .conductivity(0.2),
        MaterialDef::new("Dust", K::Dust, Powder, 3.0)
            .slip(0.9)
            .flammable(380.0),
        MaterialDef::new("Water", K::Water, Liquid, 5.5)
            .viscosity(2.0)
            .heat_capacity(4.2)
            .freezing_point(0.0)
            .boiling_point(100.0)
            .evaporation_rate(0.001)
            .immiscible_with(["Oil", "Lava"]),
        MaterialDef::new("Acid", K::Acid, Liquid, 5.4)
            .viscosity(1.0)
            .immiscible_with(["Oil"]),
        MaterialDef::new("Foam", K::Foam, Liquid, 2.0)
            .viscosity(3.0)
            .immiscible_with(["Oil"]),
        MaterialDef::new("Smoke", K::Smoke, Gas, -2.0),
        MaterialDef::new("Steam", K::Steam, Gas, -1.5),
        MaterialDef::new("Fire", K::Fire, Energy, -0.5).combustion_temp(300.0),
        MaterialDef::new("Oil", K::Oil, Liquid, 5.0)
            .viscosity(3.0)
            .flammable(250.0)
            .immiscible_with(["Water", "Foam", "Acid"]),
        MaterialDef::new("Lava", K::Lava, Liquid, 8.0)
            .viscosity(5.0)
            .immiscible_with(["Water", "Oil", "Foam", "Acid"]),
        MaterialDef::new("Mud", K::Mud, Powder, 6.2).slip(0.4),
        MaterialDef::new("Ember", K::Ember, Energy, -0.2),
        MaterialDef::new("Bomb", K::Bomb, Object, 9.0),
        MaterialDef::new("Meteor", K::Meteor, Object, 9.5),
        MaterialDef::new("Ball", K::Ball, Object, 7.0).bounciness(0.7),
        MaterialDef::new("Rubble", K::Rubble, Powder, 7.5).slip(0.5),
        MaterialDef::new("Ash", K::Ash, Powder, 2.0).slip(0.9),
        MaterialDef::new("Glass", K::Glass, Solid, 7.2)
            .melting_point(700.0)
            .conductivity(0.3),
        MaterialDef::new("Bedrock", K::Bedrock, Solid, 10.0).conductivity(0.05),
        // Scenery.
        MaterialDef::new("Dirt", K::Generic, Powder, 6.0)
            .slip(0.6)
            .conductivity(0.12),
        MaterialDef::new("Grass", K::Generic, Solid, 2.2)
            .flammable(260.0)
            .conductivity(0.08),
        MaterialDef::new("Bush", K::Generic, Solid, 1.8).flammable(240.0),
        MaterialDef::new("Reed", K::Generic, Solid, 1.5).flammable(230.0),
        MaterialDef::new("Leaf", K::Generic, Solid, 1.4).flammable(240.0),
        MaterialDef::new("WoodenPlank", K::Generic, Solid, 5.0).flammable(300.0),
        MaterialDef::new("Thatch", K::Generic, Solid, 1.6).flammable(240.0),
        MaterialDef::new("TileFloor", K::Generic, Solid, 8.2).conductivity(0.4),
        MaterialDef::new("SteelWall", K::Generic, Solid, 9.0).conductivity(0.9),
        MaterialDef::new("SteelGirder", K::Generic, Solid, 8.8).conductivity(0.85),
        MaterialDef::new("Ladder", K::Generic, Solid, 4.2).flammable(300.0),
        MaterialDef::new("StoneBrick", K::Generic, Solid, 9.0).conductivity(0.6),
        MaterialDef::new("SteelGrating", K::Generic, Solid, 8.0).conductivity(0.8),
        MaterialDef::new("Log", K::Generic, Solid, 5.5).flammable(300.0),
        MaterialDef::new("Crate", K::Generic, Object, 7.2),
        MaterialDef::new("SteelBarrel", K::Generic, Object, 8.6),
        MaterialDef::new("PurpleChem", K::Generic, Liquid, 5.3)
            .viscosity(1.0)
            .immiscible_with(["Oil"]),
    ]
}

impl MaterialRegistry {
    /// Registry holding [`standard_defs`] in order.
    pub fn standard() -> Result<Self, RegistryError> {
        let mut reg = MaterialRegistry::new();
        for def in standard_defs() {
            reg.register(def)?;
        }
        reg.check_links()?;
        Ok(reg)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn standard_registry_builds() {
        let reg = MaterialRegistry::standard().unwrap();
        assert_eq!(reg.len(), standard_defs().len());
    }

    #[test]
    fn constants_match_registration_order() {
        let reg = MaterialRegistry::standard().unwrap();
        let expected = [
            (STONE, MaterialKind::Stone),
            (WOOD, MaterialKind::Wood),
            (ICE, MaterialKind::Ice),
            (RUBBER, MaterialKind::Rubber),
            (SAND, MaterialKind::Sand),
            (DUST, MaterialKind::Dust),
            (WATER, MaterialKind::Water),
            (ACID, MaterialKind::Acid),
            (FOAM, MaterialKind::Foam),
            (SMOKE, MaterialKind::Smoke),
            (STEAM, MaterialKind::Steam),
            (FIRE, MaterialKind::Fire),
            (OIL, MaterialKind::Oil),
            (LAVA, MaterialKind::Lava),
            (MUD, MaterialKind::Mud),
            (EMBER, MaterialKind::Ember),
            (BOMB, MaterialKind::Bomb),
            (METEOR, MaterialKind::Meteor),
            (BALL, MaterialKind::Ball),
            (RUBBLE, MaterialKind::Rubble),
            (ASH, MaterialKind::Ash),
            (GLASS, MaterialKind::Glass),
            (BEDROCK, MaterialKind::Bedrock),
        ];
        for (id, kind) in expected {
            assert_eq!(reg.id_of_kind(kind), Some(id), "{kind:?}");
        }
    }

    #[test]
    fn scenery_resolves_by_name() {
        let reg = MaterialRegistry::standard().unwrap();
        let plank = reg.id("WoodenPlank").unwrap();
        assert!(reg.get(plank).is_some_and(|d| d.flammable));
        assert!(reg.id("Unobtainium").is_err());
    }
}
