//! Game constants and rule tables.

use bitflags::bitflags;

use crate::clothing::ClothingType;

// =============================================================================
// Clothing
// =============================================================================

/// Maximum length of a wear-style string such as "tied around the waist".
pub const WEARSTYLE_MAXLENGTH: usize = 50;

/// Maximum number of garments a character can wear at once.
pub const CLOTHING_OVERALL_LIMIT: usize = 20;

/// Order in which worn garments are listed in a character's description.
pub const CLOTHING_TYPE_ORDER: [ClothingType; 11] = [
    ClothingType::Hat,
    ClothingType::Face,
    ClothingType::Fullbody,
    ClothingType::Jacket,
    ClothingType::Shirt,
    ClothingType::Pants,
    ClothingType::Underwear,
    ClothingType::Gloves,
    ClothingType::Socks,
    ClothingType::Shoes,
    ClothingType::Accessory,
];

/// How many garments of a given type can be worn at once. Types missing from
/// this table are only bound by [`CLOTHING_OVERALL_LIMIT`].
pub const CLOTHING_TYPE_LIMIT: [(ClothingType, usize); 4] = [
    (ClothingType::Hat, 1),
    (ClothingType::Gloves, 1),
    (ClothingType::Socks, 1),
    (ClothingType::Shoes, 1),
];

/// Garment types that are covered automatically when a garment of the key
/// type is put on over them. Only garments already worn at that moment are
/// covered.
pub const CLOTHING_TYPE_AUTOCOVER: [(ClothingType, &[ClothingType]); 4] = [
    (
        ClothingType::Fullbody,
        &[ClothingType::Jacket, ClothingType::Shirt, ClothingType::Pants],
    ),
    (ClothingType::Jacket, &[ClothingType::Shirt]),
    (ClothingType::Pants, &[ClothingType::Underwear]),
    (ClothingType::Shoes, &[ClothingType::Socks]),
];

/// Garment types that can never be used to cover another garment.
pub const CLOTHING_TYPE_CANT_COVER_WITH: [ClothingType; 1] = [ClothingType::Jewelry];

// =============================================================================
// Containers and liquids
// =============================================================================

pub const DEFAULT_MASS: f64 = 1.0;
pub const DEFAULT_CONTAINER_CAPACITY: f64 = 100.0;
pub const DEFAULT_MASS_REDUCTION: f64 = 0.90;
pub const DEFAULT_LIQUID_CONTAINER_CAPACITY: u32 = 10;

/// Size prefixes for freestanding liquid, keyed by volume.
pub const PUDDLE_SIZES: [(u32, &str); 6] = [
    (1, "tiny"),
    (3, "small"),
    (6, "medium"),
    (12, "large"),
    (22, "huge"),
    (40, "massive"),
];

// =============================================================================
// Characters
// =============================================================================

/// Seconds needed to traverse an exit when the character has no own speed.
pub const DEFAULT_MOVE_SPEED: u32 = 4;
pub const DEFAULT_HEALTH: i32 = 10;
pub const DEFAULT_STAT: i32 = 8;
pub const REGEN_INTERVAL_SECONDS: u64 = 30;
pub const REGEN_AMOUNT: i32 = 2;

// =============================================================================
// Display
// =============================================================================

pub const DESCRIPTION_WIDTH: usize = 78;
pub const MINIMAP_WIDTH: i32 = 3;
pub const MINIMAP_HEIGHT: i32 = 3;
pub const DEFAULT_ROOM_SYMBOL: &str = "[]";
pub const EMPTY_MAP_SYMBOL: &str = "  ";
pub const PLAYER_MAP_SYMBOL: &str = "()";

/// Redacted stand-ins used when an observer can't see who or what acted.
pub const DARK_SUBJECT: &str = "someone";
pub const DARK_OBJECT: &str = "something";

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct ItemFlags: u32 {
        /// Emits light; any lit item lights up a dark room for everyone in it.
        const LIT = 1 << 0;
        /// Listed as room furniture instead of "on the ground".
        const FURNITURE = 1 << 1;
        /// Cannot be picked up.
        const NO_GET = 1 << 2;
    }
}

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct CharacterFlags: u32 {
        /// Controlled by a connected account.
        const PLAYER = 1 << 0;
        /// Sees full detail in an unlit dark room.
        const NIGHT_VISION = 1 << 1;
        /// May use building commands.
        const BUILDER = 1 << 2;
    }
}

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct RoomFlags: u32 {
        const DARK = 1 << 0;
    }
}
