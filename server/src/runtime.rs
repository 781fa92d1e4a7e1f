//! Transient per-entity state. Nothing here is persisted: a restart forgets
//! every walk in progress and every cached description.

use std::collections::HashMap;

use gloaming_core::gametime::{Season, TimeSlot};
use gloaming_core::types::ObjectId;

use crate::scheduler::TimerHandle;

/// Rendered room description and the season/time slot it was rendered for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CachedDesc {
    pub season: Season,
    pub time_slot: TimeSlot,
    pub text: String,
}

#[derive(Debug, Default)]
pub struct Runtime {
    /// Characters currently walking through an exit.
    pub moving: HashMap<ObjectId, TimerHandle>,
    /// At most one movement command waiting for the current walk to end.
    pub queued: HashMap<ObjectId, String>,
    pub room_descs: HashMap<ObjectId, CachedDesc>,
}

impl Runtime {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drops everything held for `character`, returning its timer handle.
    pub fn forget_character(&mut self, character: ObjectId) -> Option<TimerHandle> {
        self.queued.remove(&character);
        self.moving.remove(&character)
    }

    pub fn invalidate_room(&mut self, room: ObjectId) {
        self.room_descs.remove(&room);
    }
}
