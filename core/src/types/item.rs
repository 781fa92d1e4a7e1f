//! Item structure

use bincode::{Decode, Encode};
use serde::{Deserialize, Serialize};

use crate::clothing::ClothingType;
use crate::constants::{
    ItemFlags, DEFAULT_CONTAINER_CAPACITY, DEFAULT_MASS, DEFAULT_MASS_REDUCTION,
};
use crate::types::{Location, ObjectId};

/// How a garment is being worn.
#[derive(Debug, Clone, PartialEq, Eq, Default, Encode, Decode, Serialize, Deserialize)]
pub enum Worn {
    #[default]
    No,
    /// Worn without any particular style.
    Plain,
    /// Worn in a described way, e.g. "tied around the waist".
    Styled(String),
}

impl Worn {
    pub fn is_worn(&self) -> bool {
        !matches!(self, Worn::No)
    }
}

#[derive(Debug, Clone, PartialEq, Encode, Decode, Serialize, Deserialize)]
pub struct Garment {
    pub clothing_type: ClothingType,
    pub worn: Worn,
    pub covered_by: Option<ObjectId>,
}

#[derive(Debug, Clone, PartialEq, Encode, Decode, Serialize, Deserialize)]
pub struct Container {
    /// Mass the container can hold, after reduction.
    pub capacity: f64,
    /// Multiplier applied to the mass of everything inside.
    pub mass_reduction: f64,
}

impl Default for Container {
    fn default() -> Self {
        Container {
            capacity: DEFAULT_CONTAINER_CAPACITY,
            mass_reduction: DEFAULT_MASS_REDUCTION,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Encode, Decode, Serialize, Deserialize)]
pub struct LiquidContainer {
    /// Volume the container can hold.
    pub capacity: u32,
}

/// Something that happens to whoever consumes an item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Encode, Decode, Serialize, Deserialize)]
pub enum Effect {
    Health(i32),
}

#[derive(Debug, Clone, PartialEq, Eq, Encode, Decode, Serialize, Deserialize)]
pub struct Consumable {
    pub uses: u32,
    pub effects: Vec<Effect>,
}

/// A stack of liquid. `uses` is its volume; `original_name` is its identity,
/// independent of the puddle name shown while it lies freestanding.
#[derive(Debug, Clone, PartialEq, Eq, Encode, Decode, Serialize, Deserialize)]
pub struct Liquid {
    pub original_name: String,
    pub uses: u32,
    pub effects: Vec<Effect>,
}

#[derive(Debug, Clone, PartialEq, Encode, Decode, Serialize, Deserialize)]
pub enum ItemKind {
    Plain,
    Garment(Garment),
    Container(Container),
    LiquidContainer(LiquidContainer),
    Consumable(Consumable),
    Liquid(Liquid),
}

#[derive(Debug, Clone, PartialEq, Encode, Decode, Serialize, Deserialize)]
pub struct Item {
    pub id: ObjectId,
    pub name: String,
    pub aliases: Vec<String>,
    pub description: String,
    /// Own mass. For liquids this is the mass of a single unit.
    pub mass: f64,
    pub flags: u32,
    pub location: Location,
    pub kind: ItemKind,
}

impl Item {
    pub fn new(id: ObjectId, name: &str, kind: ItemKind) -> Self {
        Item {
            id,
            name: name.to_string(),
            aliases: Vec::new(),
            description: String::new(),
            mass: DEFAULT_MASS,
            flags: 0,
            location: Location::Nowhere,
            kind,
        }
    }

    pub fn has_flag(&self, flag: ItemFlags) -> bool {
        ItemFlags::from_bits_truncate(self.flags).contains(flag)
    }

    pub fn set_flag(&mut self, flag: ItemFlags, on: bool) {
        let mut flags = ItemFlags::from_bits_truncate(self.flags);
        flags.set(flag, on);
        self.flags = flags.bits();
    }

    pub fn is_lit(&self) -> bool {
        self.has_flag(ItemFlags::LIT)
    }

    /// Mass of the item itself, ignoring anything inside it.
    pub fn own_mass(&self) -> f64 {
        match &self.kind {
            ItemKind::Liquid(liquid) => self.mass * f64::from(liquid.uses),
            _ => self.mass,
        }
    }

    pub fn garment(&self) -> Option<&Garment> {
        match &self.kind {
            ItemKind::Garment(garment) => Some(garment),
            _ => None,
        }
    }

    pub fn garment_mut(&mut self) -> Option<&mut Garment> {
        match &mut self.kind {
            ItemKind::Garment(garment) => Some(garment),
            _ => None,
        }
    }

    pub fn is_worn(&self) -> bool {
        self.garment().is_some_and(|g| g.worn.is_worn())
    }

    pub fn container(&self) -> Option<&Container> {
        match &self.kind {
            ItemKind::Container(container) => Some(container),
            _ => None,
        }
    }

    pub fn liquid(&self) -> Option<&Liquid> {
        match &self.kind {
            ItemKind::Liquid(liquid) => Some(liquid),
            _ => None,
        }
    }

    pub fn liquid_mut(&mut self) -> Option<&mut Liquid> {
        match &mut self.kind {
            ItemKind::Liquid(liquid) => Some(liquid),
            _ => None,
        }
    }

    pub fn liquid_capacity(&self) -> Option<u32> {
        match &self.kind {
            ItemKind::LiquidContainer(lc) => Some(lc.capacity),
            _ => None,
        }
    }
}
