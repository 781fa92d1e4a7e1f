use gloaming_core::message::{Message, Rendering};
use gloaming_core::types::{Location, ObjectId};
use gloaming_core::visibility::partition;

use crate::state::State;

impl State {
    /// Whether anything in `room` gives off light: an item lying there, or one
    /// carried by anybody present. One light source lights the whole room.
    pub fn light_present(&self, room: ObjectId) -> bool {
        let repo = &self.repository;
        let lit_at = |location: Location| {
            repo.items_at(location)
                .into_iter()
                .any(|id| repo.item(id).is_some_and(|item| item.is_lit()))
        };

        lit_at(Location::Room(room))
            || repo
                .characters_in(room)
                .into_iter()
                .any(|c| lit_at(Location::Carried(c)))
    }

    /// Whether `looker` can make out what is in the room it stands in.
    pub fn can_see(&self, looker: ObjectId) -> bool {
        let Some(character) = self.repository.character(looker) else {
            return false;
        };
        let Some(room) = character.location.and_then(|r| self.repository.room(r)) else {
            return false;
        };
        !room.is_dark() || character.has_night_vision() || self.light_present(room.id)
    }

    /// Sends `text` to everyone in `room` except `exclude`.
    pub fn send_to_occupants(&mut self, room: ObjectId, text: &str, exclude: &[ObjectId]) {
        for occupant in self.repository.characters_in(room) {
            if !exclude.contains(&occupant) {
                self.msg(occupant, text);
            }
        }
    }

    /// Darkness-aware room message.
    ///
    /// Observers who can see get the lit rendering; the rest get the dark one.
    /// Characters in `exclude` receive neither.
    ///
    /// # Arguments
    /// * `room` - Room whose occupants hear the message
    /// * `message` - Message with lit and dark slot values
    /// * `exclude` - Characters that must not receive anything
    pub fn broadcast(&mut self, room: ObjectId, message: &Message, exclude: &[ObjectId]) {
        let Some(is_dark) = self.repository.room(room).map(|r| r.is_dark()) else {
            log::warn!("broadcast to missing room {}", room);
            return;
        };

        if !is_dark {
            self.send_to_occupants(room, &message.render(Rendering::Lit), exclude);
            return;
        }

        let light = self.light_present(room);
        let occupants: Vec<(ObjectId, bool)> = self
            .repository
            .characters_in(room)
            .into_iter()
            .filter_map(|id| self.repository.character(id))
            .map(|c| (c.id, c.has_night_vision()))
            .collect();
        let audience = partition(is_dark, light, &occupants, exclude);

        if !audience.lit.is_empty() {
            let lit = message.render(Rendering::Lit);
            for id in audience.lit {
                self.msg(id, lit.clone());
            }
        }
        if !audience.dark.is_empty() {
            let dark = message.render(Rendering::Dark);
            for id in audience.dark {
                self.msg(id, dark.clone());
            }
        }
    }

    /// Broadcast in the room `character` currently stands in.
    pub(crate) fn broadcast_around(
        &mut self,
        character: ObjectId,
        message: &Message,
        exclude: &[ObjectId],
    ) {
        if let Some(room) = self.repository.character(character).and_then(|c| c.location) {
            self.broadcast(room, message, exclude);
        }
    }
}
