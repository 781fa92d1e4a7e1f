use bincode::{Decode, Encode};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::constants::RoomFlags;
use crate::gametime::Season;
use crate::types::ObjectId;

#[derive(Debug, Clone, PartialEq, Eq, Encode, Decode, Serialize, Deserialize)]
pub struct Room {
    pub id: ObjectId,
    pub name: String,
    /// Zone tag; rooms sharing a zone are drawn on one map and hear yells.
    pub zone: String,
    pub x: i32,
    pub y: i32,
    pub z: i32,
    pub symbol: Option<String>,
    pub flags: u32,
    /// Fallback description when the current season has none.
    pub general_desc: String,
    pub spring_desc: String,
    pub summer_desc: String,
    pub autumn_desc: String,
    pub winter_desc: String,
    /// Lower-cased keyword to description.
    pub details: BTreeMap<String, String>,
}

impl Room {
    pub fn new(id: ObjectId, name: &str, zone: &str) -> Self {
        Room {
            id,
            name: name.to_string(),
            zone: zone.to_string(),
            x: 0,
            y: 0,
            z: 0,
            symbol: None,
            flags: 0,
            general_desc: String::new(),
            spring_desc: String::new(),
            summer_desc: String::new(),
            autumn_desc: String::new(),
            winter_desc: String::new(),
            details: BTreeMap::new(),
        }
    }

    pub fn is_dark(&self) -> bool {
        RoomFlags::from_bits_truncate(self.flags).contains(RoomFlags::DARK)
    }

    pub fn set_dark(&mut self, dark: bool) {
        let mut flags = RoomFlags::from_bits_truncate(self.flags);
        flags.set(RoomFlags::DARK, dark);
        self.flags = flags.bits();
    }

    pub fn coords(&self) -> (i32, i32, i32) {
        (self.x, self.y, self.z)
    }

    /// Raw description for `season`, still containing time-slot markup.
    pub fn raw_desc(&self, season: Season) -> &str {
        let seasonal = match season {
            Season::Spring => &self.spring_desc,
            Season::Summer => &self.summer_desc,
            Season::Autumn => &self.autumn_desc,
            Season::Winter => &self.winter_desc,
        };
        if seasonal.is_empty() {
            &self.general_desc
        } else {
            seasonal
        }
    }

    pub fn desc_slot_mut(&mut self, season: Option<Season>) -> &mut String {
        match season {
            None => &mut self.general_desc,
            Some(Season::Spring) => &mut self.spring_desc,
            Some(Season::Summer) => &mut self.summer_desc,
            Some(Season::Autumn) => &mut self.autumn_desc,
            Some(Season::Winter) => &mut self.winter_desc,
        }
    }

    pub fn set_detail(&mut self, key: &str, description: &str) {
        self.details
            .insert(key.trim().to_lowercase(), description.to_string());
    }

    /// Removing a detail that doesn't exist is not an error.
    pub fn del_detail(&mut self, key: &str) -> bool {
        self.details.remove(&key.trim().to_lowercase()).is_some()
    }

    pub fn detail(&self, key: &str) -> Option<&str> {
        self.details
            .get(&key.trim().to_lowercase())
            .map(String::as_str)
    }
}
