use gloaming_core::constants::REGEN_AMOUNT;
use gloaming_core::message::Message;
use gloaming_core::types::{Effect, Location, ObjectId};

use crate::state::State;

impl State {
    pub(crate) fn apply_effects(&mut self, character: ObjectId, effects: &[Effect]) {
        for effect in effects {
            match effect {
                Effect::Health(amount) => self.change_health(character, *amount),
            }
        }
    }

    /// Adjusts health by `amount`, tells the character, and handles death
    /// when health reaches zero.
    pub fn change_health(&mut self, character: ObjectId, amount: i32) {
        let Some(record) = self.repository.character_mut(character) else {
            return;
        };
        let died = record.set_health(record.health + amount);
        let (health, max) = (record.health, record.health_max);

        self.msg(character, format!("Health changed by {}.", amount));
        self.msg(character, format!("Current health: {} / {}", health, max));
        if died {
            self.die(character);
        }
    }

    pub fn full_heal(&mut self, character: ObjectId, quiet: bool) {
        if let Some(record) = self.repository.character_mut(character) {
            record.health = record.health_max;
        }
        if !quiet {
            self.msg(character, "You feel completely healed!");
        }
    }

    /// Drops everything carried, sends the character home and heals it.
    pub fn die(&mut self, character: ObjectId) {
        log::info!("{} has died", character);
        self.msg(character, "You have died!!");
        self.cancel_movement(character);

        let Some(record) = self.repository.character(character) else {
            return;
        };
        let room = record.location;
        let home = record.home.or(self.repository.globals().start_room);

        if let Some(room) = room {
            for item in self.repository.items_at(Location::Carried(character)) {
                // Clear worn state first so nothing lands on the floor worn.
                self.at_get(item);
                self.move_item(item, Location::Room(room));
            }
            let message = Message::new()
                .subject(&self.repository.name_of(character))
                .text(" collapses.");
            self.broadcast(room, &message, &[character]);
        }

        if let Some(home) = home.filter(|h| self.repository.room(*h).is_some()) {
            if let Some(record) = self.repository.character_mut(character) {
                record.location = Some(home);
            }
        } else {
            log::warn!("{} has no home to return to", character);
        }
        self.full_heal(character, true);
    }

    /// Periodic regeneration for player characters below full health.
    pub(crate) fn regenerate(&mut self) {
        let wounded: Vec<ObjectId> = self
            .repository
            .world()
            .characters
            .values()
            .filter(|c| c.is_player() && c.health < c.health_max)
            .map(|c| c.id)
            .collect();
        for character in wounded {
            self.change_health(character, REGEN_AMOUNT);
        }
    }

    /// The `sheet` command output.
    pub fn sheet(&self, character: ObjectId) -> String {
        let Some(record) = self.repository.character(character) else {
            return String::new();
        };
        let stats = record.stats.named();
        let mut out = format!("{}'s Character Sheet\n\n", record.name);
        for row in stats.chunks(3) {
            let cells: Vec<String> = row
                .iter()
                .map(|(name, value)| format!("{:<13}[ {:>2} ]", format!("{}:", name), value))
                .collect();
            out.push_str(&cells.join("  "));
            out.push('\n');
        }
        out.push_str(&format!(
            "\nHealth: [ {} / {} ]",
            record.health, record.health_max
        ));
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::Repository;
    use gloaming_core::clothing::ClothingType;
    use gloaming_core::constants::CharacterFlags;
    use gloaming_core::types::{Garment, ItemKind, Worn};

    struct Fixture {
        state: State,
        home: ObjectId,
        arena: ObjectId,
        hero: ObjectId,
    }

    fn setup() -> Fixture {
        let mut repo = Repository::new();
        let home = repo.create_room("Temple", "town");
        let arena = repo.create_room("Arena", "town");
        let hero = repo.create_character("Ayla", Some(home));
        repo.character_mut(hero).unwrap().location = Some(arena);
        Fixture {
            state: State::new(repo, 10, 1.0),
            home,
            arena,
            hero,
        }
    }

    fn health(f: &Fixture) -> i32 {
        f.state.repository.character(f.hero).unwrap().health
    }

    #[test]
    fn test_change_health_clamps_and_reports() {
        let mut f = setup();
        f.state.change_health(f.hero, 5);
        assert_eq!(health(&f), 10);
        assert_eq!(
            f.state.network.drain_for(f.hero),
            vec!["Health changed by 5.", "Current health: 10 / 10"]
        );
        f.state.change_health(f.hero, -3);
        assert_eq!(health(&f), 7);
    }

    #[test]
    fn test_death_drops_items_and_returns_home() {
        let mut f = setup();
        let cloak = f.state.repository.create_item(
            "a cloak",
            ItemKind::Garment(Garment {
                clothing_type: ClothingType::Fullbody,
                worn: Worn::Plain,
                covered_by: None,
            }),
            Location::Carried(f.hero),
        );

        f.state.change_health(f.hero, -20);
        let hero = f.state.repository.character(f.hero).unwrap();
        assert_eq!(hero.location, Some(f.home));
        assert_eq!(hero.health, hero.health_max);

        let cloak = f.state.repository.item(cloak).unwrap();
        assert_eq!(cloak.location, Location::Room(f.arena));
        assert!(!cloak.is_worn());
    }

    #[test]
    fn test_regeneration_every_thirty_seconds_for_players() {
        let mut f = setup();
        f.state
            .repository
            .character_mut(f.hero)
            .unwrap()
            .set_flag(CharacterFlags::PLAYER, true);
        f.state.repository.character_mut(f.hero).unwrap().health = 5;

        f.state.advance(299);
        assert_eq!(health(&f), 5);
        f.state.advance(1);
        assert_eq!(health(&f), 7);
    }

    #[test]
    fn test_sheet_lists_stats_and_health() {
        let f = setup();
        let sheet = f.state.sheet(f.hero);
        assert!(sheet.starts_with("Ayla's Character Sheet"));
        assert!(sheet.contains("Strength:"));
        assert!(sheet.contains("Charisma:"));
        assert!(sheet.contains("[  8 ]"));
        assert!(sheet.ends_with("Health: [ 10 / 10 ]"));
    }
}
