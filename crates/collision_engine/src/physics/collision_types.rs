//! Gameplay collision categories
//!
//! The collision manager only uses a type id as a dispatch-table key; the
//! meaning of each id belongs to the game. The constants below are the
//! standard taxonomy, and games may mint their own with [`CollisionTypeId::custom`].

use std::fmt;

/// Small integer naming a gameplay category (player, enemy, bullet, ...)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CollisionTypeId(pub u32);

impl CollisionTypeId {
    /// Static world geometry
    pub const WORLD: Self = Self(0);

    /// Player character
    pub const PLAYER: Self = Self(1);

    /// Enemy character
    pub const ENEMY: Self = Self(2);

    /// Player projectile
    pub const BULLET: Self = Self(3);

    /// Enemy projectile
    pub const ENEMY_BULLET: Self = Self(4);

    /// Pickups and collectibles
    pub const ITEM: Self = Self(5);

    /// Boss character
    pub const BOSS: Self = Self(6);

    /// Melee weapon hit volume
    pub const WEAPON: Self = Self(7);

    /// First id available for game-defined categories
    pub const FIRST_CUSTOM: u32 = 16;

    /// Game-defined category `n` (offset past the standard ids)
    pub const fn custom(n: u32) -> Self {
        Self(Self::FIRST_CUSTOM + n)
    }

    /// Raw integer id
    pub const fn id(self) -> u32 {
        self.0
    }

    /// Name of a standard category, `None` for custom ids
    pub const fn name(self) -> Option<&'static str> {
        match self.0 {
            0 => Some("world"),
            1 => Some("player"),
            2 => Some("enemy"),
            3 => Some("bullet"),
            4 => Some("enemy_bullet"),
            5 => Some("item"),
            6 => Some("boss"),
            7 => Some("weapon"),
            _ => None,
        }
    }
}

impl fmt::Display for CollisionTypeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.name() {
            Some(name) => f.write_str(name),
            None => write!(f, "type#{}", self.0),
        }
    }
}

impl From<u32> for CollisionTypeId {
    fn from(id: u32) -> Self {
        Self(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_names() {
        assert_eq!(CollisionTypeId::PLAYER.to_string(), "player");
        assert_eq!(CollisionTypeId::ENEMY_BULLET.to_string(), "enemy_bullet");
    }

    #[test]
    fn test_custom_ids_do_not_clash() {
        let custom = CollisionTypeId::custom(0);
        assert_eq!(custom.id(), CollisionTypeId::FIRST_CUSTOM);
        assert!(custom.name().is_none());
        assert_eq!(custom.to_string(), "type#16");
        assert_eq!(CollisionTypeId::from(2), CollisionTypeId::ENEMY);
    }
}
