//! Timed exit traversal with a one-slot queue for the next movement command.
//!
//! A character is either idle or walking through exactly one exit. While it
//! walks, a new movement command replaces whatever was queued; the queued
//! command runs as soon as the current walk succeeds.

use gloaming_core::message::Message;
use gloaming_core::types::ObjectId;
use gloaming_core::RuleError;

use crate::enums::{arrival_phrase, Direction};
use crate::scheduler::Task;
use crate::state::State;

impl State {
    /// Whether `character` has a traversal timer that hasn't fired yet.
    pub fn is_moving(&self, character: ObjectId) -> bool {
        self.runtime
            .moving
            .get(&character)
            .is_some_and(|handle| self.scheduler.is_pending(*handle))
    }

    /// The exit in `room` that a movement command names. Compass aliases
    /// ("n") reach exits keyed by the full direction ("north").
    pub fn resolve_exit(&self, room: ObjectId, command: &str) -> Option<ObjectId> {
        let exits = self.repository.exits_in(room);
        let answers = |key: &str| {
            exits
                .iter()
                .copied()
                .find(|id| self.repository.exit(*id).is_some_and(|e| e.answers_to(key)))
        };
        answers(command).or_else(|| {
            command
                .parse::<Direction>()
                .ok()
                .and_then(|dir| answers(dir.key()))
        })
    }

    /// Whether `command` would be taken as a movement command in `room`.
    pub fn is_movement_command(&self, room: Option<ObjectId>, command: &str) -> bool {
        command.parse::<Direction>().is_ok()
            || room.is_some_and(|r| self.resolve_exit(r, command).is_some())
    }

    /// Handles a movement command.
    ///
    /// An idle character starts walking; a walking character has the command
    /// queued (replacing any earlier one) to be dispatched on arrival.
    ///
    /// # Arguments
    /// * `character` - Character that issued the command
    /// * `command` - Exit key, alias or compass direction
    pub fn move_command(&mut self, character: ObjectId, command: &str) -> Result<(), RuleError> {
        let command = command.trim().to_lowercase();

        if self.is_moving(character) {
            log::debug!("{} queues '{}'", character, command);
            self.runtime.queued.insert(character, command.clone());
            self.msg(
                character,
                format!("You will go {} when you arrive.", command),
            );
            return Ok(());
        }

        let room = self
            .repository
            .character(character)
            .and_then(|c| c.location)
            .ok_or(RuleError::NoExit)?;
        let exit = self.resolve_exit(room, &command).ok_or(RuleError::NoExit)?;
        self.start_traverse(character, exit);
        Ok(())
    }

    fn start_traverse(&mut self, character: ObjectId, exit: ObjectId) {
        let Some(record) = self.repository.character(character) else {
            return;
        };
        let speed = record.move_speed();
        let name = record.name.clone();
        let Some((key, room)) = self.repository.exit(exit).map(|e| (e.key.clone(), e.location)) else {
            return;
        };

        let delay = self.seconds_to_ticks(u64::from(speed));
        let now = self.now();
        let handle = self
            .scheduler
            .schedule(now, delay, Task::Traverse { character, exit });
        self.runtime.moving.insert(character, handle);
        log::debug!("{} starts through {} ({} ticks)", character, exit, delay);

        self.msg(
            character,
            format!("You start moving {}. It will take {} seconds.", key, speed),
        );
        let message = Message::new()
            .subject(&name)
            .text(" starts moving ")
            .text(&key)
            .text(&format!(" (it will take {} seconds).", speed));
        self.broadcast(room, &message, &[character]);
    }

    /// Cancels the walk in progress and forgets the queued command.
    pub fn stop(&mut self, character: ObjectId) -> Result<(), RuleError> {
        if !self.is_moving(character) {
            return Err(RuleError::NotMoving);
        }
        if let Some(handle) = self.runtime.forget_character(character) {
            self.scheduler.cancel(handle);
        }
        log::debug!("{} stopped moving", character);

        self.msg(character, "You stop moving.");
        let message = Message::new()
            .subject(&self.repository.name_of(character))
            .text(" stops.");
        self.broadcast_around(character, &message, &[character]);
        Ok(())
    }

    /// Drops any walk in progress without announcing anything, e.g. when the
    /// character is moved by other means.
    pub(crate) fn cancel_movement(&mut self, character: ObjectId) {
        if let Some(handle) = self.runtime.forget_character(character) {
            self.scheduler.cancel(handle);
        }
    }

    /// Timer callback: moves the character through the exit, then dispatches
    /// the queued command if there is one.
    pub(crate) fn finish_traverse(&mut self, character: ObjectId, exit: ObjectId) {
        self.runtime.moving.remove(&character);
        let queued = self.runtime.queued.remove(&character);

        let origin = self.repository.character(character).and_then(|c| c.location);
        let Some(record) = self.repository.exit(exit) else {
            log::warn!("{} was walking through missing exit {}", character, exit);
            self.msg(character, "You cannot go there.");
            return;
        };
        let (key, from, destination) = (record.key.clone(), record.location, record.destination);
        let err_traverse = record.err_traverse.clone();
        let passable = !record.blocked
            && origin == Some(from)
            && self.repository.room(destination).is_some();

        if !passable {
            log::warn!("{} failed to traverse {}", character, exit);
            if let Some(cmd) = queued {
                log::debug!("{} drops queued '{}'", character, cmd);
            }
            let text = err_traverse.unwrap_or_else(|| "You cannot go there.".to_string());
            self.msg(character, text);
            return;
        }

        self.relocate_character(character, from, destination, Some(&key));
        log::debug!("{} arrived in {}", character, destination);

        if let Some(cmd) = queued {
            log::debug!("{} runs queued '{}'", character, cmd);
            self.execute_command(character, &cmd);
        }
    }

    /// Moves a character between rooms with leave and arrival announcements,
    /// then shows it the new room.
    ///
    /// # Arguments
    /// * `exit_key` - Exit used; `None` for teleports
    pub(crate) fn relocate_character(
        &mut self,
        character: ObjectId,
        from: ObjectId,
        to: ObjectId,
        exit_key: Option<&str>,
    ) {
        let name = self.repository.name_of(character);

        let leaving = Message::new()
            .subject(&name)
            .text(" leaves ")
            .text(exit_key.unwrap_or("somewhere"))
            .text(".");
        self.broadcast(from, &leaving, &[character]);

        if let Some(record) = self.repository.character_mut(character) {
            record.location = Some(to);
        }

        let back = self
            .repository
            .exits_in(to)
            .into_iter()
            .filter_map(|id| self.repository.exit(id))
            .find(|e| e.destination == from)
            .map(|e| arrival_phrase(&e.key))
            .or_else(|| {
                let dir = exit_key?.parse::<Direction>().ok()?;
                Some(arrival_phrase(dir.opposite().key()))
            })
            .unwrap_or_else(|| "somewhere".to_string());
        let arriving = Message::new()
            .subject(&name)
            .text(" arrives from ")
            .text(&back)
            .text(".");
        self.broadcast(to, &arriving, &[character]);

        self.look_around(character);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::Repository;

    struct Fixture {
        state: State,
        south_room: ObjectId,
        middle: ObjectId,
        north_room: ObjectId,
        walker: ObjectId,
        watcher: ObjectId,
    }

    fn setup() -> Fixture {
        let mut repo = Repository::new();
        let south_room = repo.create_room("Gate", "town");
        let middle = repo.create_room("Square", "town");
        let north_room = repo.create_room("Temple", "town");
        repo.create_exit("north", south_room, middle);
        repo.create_exit("south", middle, south_room);
        repo.create_exit("north", middle, north_room);
        repo.create_exit("south", north_room, middle);
        let walker = repo.create_character("Ayla", Some(middle));
        let watcher = repo.create_character("Bran", Some(middle));
        Fixture {
            state: State::new(repo, 10, 1.0),
            south_room,
            middle,
            north_room,
            walker,
            watcher,
        }
    }

    fn location(f: &Fixture, id: ObjectId) -> Option<ObjectId> {
        f.state.repository.character(id).unwrap().location
    }

    #[test]
    fn test_traversal_takes_move_speed_seconds() {
        let mut f = setup();
        f.state.move_command(f.walker, "north").unwrap();
        assert!(f.state.is_moving(f.walker));
        assert_eq!(
            f.state.network.drain_for(f.watcher),
            vec!["Ayla starts moving north (it will take 4 seconds)."]
        );

        f.state.advance(39);
        assert_eq!(location(&f, f.walker), Some(f.middle));
        f.state.advance(1);
        assert_eq!(location(&f, f.walker), Some(f.north_room));
        assert!(!f.state.is_moving(f.walker));
        assert_eq!(f.state.network.drain_for(f.watcher), vec!["Ayla leaves north."]);
    }

    #[test]
    fn test_one_way_exit_arrival_uses_the_opposite_direction() {
        let mut f = setup();
        let pit = f.state.repository.create_room("Pit", "town");
        f.state.repository.create_exit("east", f.middle, pit);
        let lurker = f.state.repository.create_character("Cade", Some(pit));

        f.state.move_command(f.walker, "east").unwrap();
        f.state.advance(40);
        assert_eq!(location(&f, f.walker), Some(pit));
        assert_eq!(
            f.state.network.drain_for(lurker),
            vec!["Ayla arrives from the west."]
        );
    }

    #[test]
    fn test_alias_and_unknown_direction() {
        let mut f = setup();
        assert_eq!(f.state.move_command(f.walker, "east"), Err(RuleError::NoExit));
        f.state.move_command(f.walker, "n").unwrap();
        assert!(f.state.is_moving(f.walker));
    }

    #[test]
    fn test_second_command_replaces_queued_one() {
        let mut f = setup();
        f.state.move_command(f.walker, "north").unwrap();
        f.state.move_command(f.walker, "north").unwrap();
        f.state.move_command(f.walker, "south").unwrap();
        assert_eq!(
            f.state.runtime.queued.get(&f.walker).map(String::as_str),
            Some("south")
        );
        assert_eq!(f.state.scheduler.len(), 1);
    }

    #[test]
    fn test_stop_cancels_and_clears_queue() {
        let mut f = setup();
        assert_eq!(f.state.stop(f.walker), Err(RuleError::NotMoving));

        f.state.move_command(f.walker, "north").unwrap();
        f.state.move_command(f.walker, "south").unwrap();
        f.state.stop(f.walker).unwrap();
        assert!(f.state.runtime.queued.is_empty());

        f.state.advance(100);
        assert_eq!(location(&f, f.walker), Some(f.middle));
        assert_eq!(f.state.stop(f.walker), Err(RuleError::NotMoving));
    }

    #[test]
    fn test_blocked_exit_fails_and_drops_queue() {
        let mut f = setup();
        let exit = f.state.resolve_exit(f.middle, "south").unwrap();
        {
            let record = f.state.repository.exit_mut(exit).unwrap();
            record.blocked = true;
            record.err_traverse = Some("The gate is shut.".to_string());
        }
        f.state.move_command(f.walker, "south").unwrap();
        f.state.move_command(f.walker, "north").unwrap();
        f.state.network.drain_for(f.walker);

        f.state.advance(40);
        assert_eq!(location(&f, f.walker), Some(f.middle));
        assert_eq!(f.state.network.drain_for(f.walker), vec!["The gate is shut."]);
        assert!(!f.state.is_moving(f.walker));
        assert!(f.state.runtime.queued.is_empty());
    }

    #[test]
    fn test_arrival_announcement_names_the_way_back() {
        let mut f = setup();
        let greeter = f
            .state
            .repository
            .create_character("Cat", Some(f.south_room));
        f.state.move_command(f.walker, "south").unwrap();
        f.state.advance(40);
        assert_eq!(
            f.state.network.drain_for(greeter),
            vec!["Ayla arrives from the north."]
        );
    }
}
