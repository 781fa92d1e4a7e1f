use gloaming_core::message::Message;
use gloaming_core::types::ObjectId;
use gloaming_core::RuleError;

use crate::helpers::get_direction;
use crate::state::State;

impl State {
    pub fn say(&mut self, speaker: ObjectId, text: &str) -> Result<(), RuleError> {
        let text = text.trim();
        if text.is_empty() {
            return Err(RuleError::Usage("Say what?".to_string()));
        }
        self.msg(speaker, format!("You say, \"{}\"", text));
        let message = Message::new()
            .subject(&self.repository.name_of(speaker))
            .text(&format!(" says, \"{}\"", text));
        self.broadcast_around(speaker, &message, &[speaker]);
        Ok(())
    }

    /// Emote: the text follows the actor's name. No space is inserted before
    /// text starting with `'`, `,` or `:`, so "pose 's hat falls" works.
    pub fn pose(&mut self, actor: ObjectId, text: &str) -> Result<(), RuleError> {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return Err(RuleError::Usage("What do you want to do?".to_string()));
        }
        let tail = if trimmed.starts_with(['\'', ',', ':']) {
            trimmed.to_string()
        } else {
            format!(" {}", trimmed)
        };
        let message = Message::new()
            .subject(&self.repository.name_of(actor))
            .text(&tail);
        self.broadcast_around(actor, &message, &[]);
        Ok(())
    }

    /// Yell to the whole zone. The yeller's room hears who it was; every
    /// other room in the zone only hears the direction it came from.
    pub fn yell(&mut self, actor: ObjectId, text: &str) -> Result<(), RuleError> {
        let text = text.trim();
        if text.is_empty() {
            return Err(RuleError::Usage("Yell what?".to_string()));
        }
        let Some(here) = self
            .repository
            .character(actor)
            .and_then(|c| c.location)
            .and_then(|r| self.repository.room(r))
        else {
            return Err(RuleError::Usage("You are nowhere.".to_string()));
        };
        let (room_id, zone, origin) = (here.id, here.zone.clone(), here.coords());

        self.msg(actor, format!("You yell, \"{}\".", text));
        let message = Message::new()
            .subject(&self.repository.name_of(actor))
            .text(&format!(" yells, \"{}\".", text));
        self.broadcast(room_id, &message, &[actor]);

        for other in self.repository.rooms_in_zone(&zone) {
            if other == room_id {
                continue;
            }
            let Some(coords) = self.repository.room(other).map(|r| r.coords()) else {
                continue;
            };
            let heard = match get_direction(origin, coords) {
                Some(dir) => format!("From the {} you hear someone yell, \"{}\".", dir, text),
                None => format!("From somewhere nearby you hear someone yell, \"{}\".", text),
            };
            self.send_to_occupants(other, &heard, &[actor]);
        }
        Ok(())
    }
}
