use bincode::{Decode, Encode};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Identity of any entity in the world. Items, characters, rooms and exits
/// share one id space.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Encode, Decode, Serialize, Deserialize,
)]
pub struct ObjectId(pub u32);

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Where an item currently is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Encode, Decode, Serialize, Deserialize)]
pub enum Location {
    #[default]
    Nowhere,
    /// Lying in a room.
    Room(ObjectId),
    /// In a character's inventory.
    Carried(ObjectId),
    /// Inside a container item.
    Inside(ObjectId),
}

impl Location {
    /// Rooms and containers merge like liquids; inventories do not.
    pub fn merges_liquids(&self) -> bool {
        matches!(self, Location::Room(_) | Location::Inside(_))
    }
}
