//! Clothing rule tables: ordering, limits and automatic covering.

use bincode::{Decode, Encode};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::constants::{
    CLOTHING_OVERALL_LIMIT, CLOTHING_TYPE_AUTOCOVER, CLOTHING_TYPE_CANT_COVER_WITH,
    CLOTHING_TYPE_LIMIT, CLOTHING_TYPE_ORDER,
};
use crate::error::RuleError;

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Encode, Decode, Serialize, Deserialize,
)]
pub enum ClothingType {
    Hat,
    Face,
    Fullbody,
    Jacket,
    Shirt,
    Pants,
    Underwear,
    Gloves,
    Socks,
    Shoes,
    Accessory,
    Jewelry,
}

impl fmt::Display for ClothingType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ClothingType::Hat => "hat",
            ClothingType::Face => "face",
            ClothingType::Fullbody => "fullbody",
            ClothingType::Jacket => "jacket",
            ClothingType::Shirt => "shirt",
            ClothingType::Pants => "pants",
            ClothingType::Underwear => "underwear",
            ClothingType::Gloves => "gloves",
            ClothingType::Socks => "socks",
            ClothingType::Shoes => "shoes",
            ClothingType::Accessory => "accessory",
            ClothingType::Jewelry => "jewelry",
        };
        f.write_str(name)
    }
}

impl FromStr for ClothingType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let t = match s.trim().to_lowercase().as_str() {
            "hat" => ClothingType::Hat,
            "face" => ClothingType::Face,
            "fullbody" => ClothingType::Fullbody,
            "jacket" => ClothingType::Jacket,
            "shirt" => ClothingType::Shirt,
            "pants" => ClothingType::Pants,
            "underwear" => ClothingType::Underwear,
            "gloves" => ClothingType::Gloves,
            "socks" => ClothingType::Socks,
            "shoes" => ClothingType::Shoes,
            "accessory" => ClothingType::Accessory,
            "jewelry" => ClothingType::Jewelry,
            other => return Err(format!("Unknown clothing type '{other}'.")),
        };
        Ok(t)
    }
}

impl ClothingType {
    /// Per-type worn limit, if this type has one.
    pub fn limit(&self) -> Option<usize> {
        CLOTHING_TYPE_LIMIT
            .iter()
            .find(|(t, _)| t == self)
            .map(|(_, limit)| *limit)
    }

    /// Types hidden when a garment of this type is put on over them.
    pub fn autocovers(&self) -> &'static [ClothingType] {
        CLOTHING_TYPE_AUTOCOVER
            .iter()
            .find(|(t, _)| t == self)
            .map(|(_, covered)| *covered)
            .unwrap_or(&[])
    }

    pub fn can_cover_with(&self) -> bool {
        !CLOTHING_TYPE_CANT_COVER_WITH.contains(self)
    }

    /// Position in the description order; unlisted types sort last.
    fn order_rank(&self) -> usize {
        CLOTHING_TYPE_ORDER
            .iter()
            .position(|t| t == self)
            .unwrap_or(CLOTHING_TYPE_ORDER.len())
    }
}

/// Orders garments by [`CLOTHING_TYPE_ORDER`]. Garments of the same type keep
/// their relative order, and types missing from the order go last.
pub fn order_clothes<T>(mut clothes: Vec<T>, type_of: impl Fn(&T) -> ClothingType) -> Vec<T> {
    clothes.sort_by_key(|garment| type_of(garment).order_rank());
    clothes
}

pub fn single_type_count(worn: &[ClothingType], clothing_type: ClothingType) -> usize {
    worn.iter().filter(|t| **t == clothing_type).count()
}

/// Checks whether one more garment of `new_type` may be worn on top of
/// `worn`. Both the overall and the per-type limit are enforced.
pub fn check_wear_limits(worn: &[ClothingType], new_type: ClothingType) -> Result<(), RuleError> {
    if worn.len() >= CLOTHING_OVERALL_LIMIT {
        return Err(RuleError::TooManyWorn);
    }
    if let Some(limit) = new_type.limit() {
        if single_type_count(worn, new_type) >= limit {
            return Err(RuleError::TypeLimit(new_type.to_string()));
        }
    }
    Ok(())
}
