//! Character structure - represents both players and NPCs

use bincode::{Decode, Encode};
use serde::{Deserialize, Serialize};

use crate::constants::{CharacterFlags, DEFAULT_HEALTH, DEFAULT_MOVE_SPEED, DEFAULT_STAT};
use crate::types::ObjectId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Encode, Decode, Serialize, Deserialize)]
pub struct Stats {
    pub strength: i32,
    pub dexterity: i32,
    pub intelligence: i32,
    pub toughness: i32,
    pub perception: i32,
    pub charisma: i32,
}

impl Default for Stats {
    fn default() -> Self {
        Stats {
            strength: DEFAULT_STAT,
            dexterity: DEFAULT_STAT,
            intelligence: DEFAULT_STAT,
            toughness: DEFAULT_STAT,
            perception: DEFAULT_STAT,
            charisma: DEFAULT_STAT,
        }
    }
}

impl Stats {
    /// Stats in sheet order, paired with their names.
    pub fn named(&self) -> [(&'static str, i32); 6] {
        [
            ("Strength", self.strength),
            ("Dexterity", self.dexterity),
            ("Intelligence", self.intelligence),
            ("Toughness", self.toughness),
            ("Perception", self.perception),
            ("Charisma", self.charisma),
        ]
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Encode, Decode, Serialize, Deserialize)]
pub struct Character {
    pub id: ObjectId,
    pub name: String,
    pub aliases: Vec<String>,
    pub description: String,
    /// Room the character stands in.
    pub location: Option<ObjectId>,
    /// Room the character returns to on death.
    pub home: Option<ObjectId>,
    pub flags: u32,
    /// Seconds per exit traversal; `None` uses the default walking speed.
    pub move_speed: Option<u32>,
    pub stats: Stats,
    pub health: i32,
    pub health_max: i32,
}

impl Character {
    pub fn new(id: ObjectId, name: &str) -> Self {
        Character {
            id,
            name: name.to_string(),
            aliases: Vec::new(),
            description: String::new(),
            location: None,
            home: None,
            flags: 0,
            move_speed: None,
            stats: Stats::default(),
            health: DEFAULT_HEALTH,
            health_max: DEFAULT_HEALTH,
        }
    }

    pub fn has_flag(&self, flag: CharacterFlags) -> bool {
        CharacterFlags::from_bits_truncate(self.flags).contains(flag)
    }

    pub fn set_flag(&mut self, flag: CharacterFlags, on: bool) {
        let mut flags = CharacterFlags::from_bits_truncate(self.flags);
        flags.set(flag, on);
        self.flags = flags.bits();
    }

    pub fn is_player(&self) -> bool {
        self.has_flag(CharacterFlags::PLAYER)
    }

    pub fn has_night_vision(&self) -> bool {
        self.has_flag(CharacterFlags::NIGHT_VISION)
    }

    pub fn is_builder(&self) -> bool {
        self.has_flag(CharacterFlags::BUILDER)
    }

    pub fn move_speed(&self) -> u32 {
        self.move_speed.unwrap_or(DEFAULT_MOVE_SPEED)
    }

    /// Sets health, clamped to `0..=health_max`. Returns true when the
    /// character has just dropped to zero.
    pub fn set_health(&mut self, value: i32) -> bool {
        let was_alive = self.health > 0;
        self.health = value.clamp(0, self.health_max);
        was_alive && self.health == 0
    }
}
