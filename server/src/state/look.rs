//! What characters see: rooms, other characters, items and room details.

use gloaming_core::constants::{ItemFlags, DESCRIPTION_WIDTH};
use gloaming_core::gametime::{clock_string, replace_timeslots};
use gloaming_core::string_operations::{capitalize, list_to_string, wrap};
use gloaming_core::types::{ItemKind, Location, ObjectId};
use gloaming_core::RuleError;

use crate::mapping::{draw_default_mini_map, unpack_description};
use crate::runtime::CachedDesc;
use crate::state::State;

const PITCH_BLACK: &str = "It is pitch black here. You can't make anything out.";

impl State {
    /// Shows `character` the room it stands in.
    pub fn look_around(&mut self, character: ObjectId) {
        match self.repository.character(character).and_then(|c| c.location) {
            Some(room) => {
                let text = self.room_appearance(room, character);
                self.msg(character, text);
            }
            None => self.msg(character, "You are nowhere."),
        }
    }

    /// The `look` command. Without a target it shows the room; otherwise the
    /// target is searched among carried items, then the room's items,
    /// characters and exits, and finally the room's details.
    pub fn look(&mut self, character: ObjectId, target: Option<&str>) -> Result<(), RuleError> {
        let Some(query) = target.map(str::trim).filter(|q| !q.is_empty()) else {
            self.look_around(character);
            return Ok(());
        };

        if let Some(item) = self
            .repository
            .find_item(query, &[Location::Carried(character)])
        {
            let text = self.item_appearance(item);
            self.msg(character, text);
            return Ok(());
        }

        let room = self
            .repository
            .character(character)
            .and_then(|c| c.location)
            .ok_or_else(|| RuleError::Usage("You are nowhere.".to_string()))?;
        if !self.can_see(character) {
            return Err(RuleError::Usage(
                "It is too dark to make anything out.".to_string(),
            ));
        }

        let text = if let Some(item) = self.repository.find_item(query, &[Location::Room(room)]) {
            self.item_appearance(item)
        } else if let Some(other) = self.repository.find_character_in(room, query) {
            self.character_appearance(other)
        } else if let Some(exit) = self.repository.find_exit_in(room, query) {
            let destination = self
                .repository
                .exit(exit)
                .map(|e| e.destination)
                .filter(|d| self.repository.room(*d).is_some())
                .ok_or_else(|| RuleError::NotFound(query.to_string()))?;
            self.room_appearance(destination, character)
        } else {
            let (_, slot) = self.time_and_season();
            let detail = self
                .repository
                .room(room)
                .and_then(|r| r.detail(query))
                .ok_or_else(|| RuleError::NotFound(query.to_string()))?;
            replace_timeslots(detail, slot)
        };

        self.msg(character, text);
        Ok(())
    }

    /// Room description for the current season and time slot. Re-rendered
    /// only when either changes or the room was edited.
    fn current_description(&mut self, room: ObjectId) -> String {
        let (season, time_slot) = self.time_and_season();
        if let Some(cached) = self.runtime.room_descs.get(&room) {
            if cached.season == season && cached.time_slot == time_slot {
                return cached.text.clone();
            }
        }

        let text = self
            .repository
            .room(room)
            .map(|r| replace_timeslots(r.raw_desc(season), time_slot))
            .unwrap_or_default();
        log::trace!("Rendered description of {} for {} {}", room, season, time_slot);
        self.runtime.room_descs.insert(
            room,
            CachedDesc {
                season,
                time_slot,
                text: text.clone(),
            },
        );
        text
    }

    /// Whether `looker` could see inside `room`, which need not be the room
    /// it stands in.
    fn sees_in(&self, looker: ObjectId, room: ObjectId) -> bool {
        let night_vision = self
            .repository
            .character(looker)
            .is_some_and(|c| c.has_night_vision());
        let dark = self.repository.room(room).is_some_and(|r| r.is_dark());
        !dark || night_vision || self.light_present(room)
    }

    /// Full room display: header, description, furniture, items on the
    /// ground, other characters and exits, beside the mini map.
    pub fn room_appearance(&mut self, room: ObjectId, looker: ObjectId) -> String {
        let Some(record) = self.repository.room(room) else {
            return "You see nothing.".to_string();
        };
        let header = format!(
            "{} ({}) {}",
            record.name,
            record.zone,
            clock_string(&self.game_time())
        );
        let mini_map = draw_default_mini_map(&self.repository, room);

        let mut lines = vec![header];
        if !self.sees_in(looker, room) {
            lines.push(PITCH_BLACK.to_string());
            return unpack_description(&mini_map, &lines);
        }

        lines.extend(wrap(&self.current_description(room), DESCRIPTION_WIDTH));

        let (furniture, loose): (Vec<ObjectId>, Vec<ObjectId>) = self
            .repository
            .items_at(Location::Room(room))
            .into_iter()
            .partition(|id| {
                self.repository
                    .item(*id)
                    .is_some_and(|i| i.has_flag(ItemFlags::FURNITURE))
            });
        let names = |ids: &[ObjectId]| -> Vec<String> {
            ids.iter().map(|id| self.repository.name_of(*id)).collect()
        };

        if !furniture.is_empty() {
            let text = format!("{}.", capitalize(&list_to_string(&names(&furniture))));
            lines.extend(wrap(&text, DESCRIPTION_WIDTH));
        }
        if !loose.is_empty() {
            let text = format!("You see {} on the ground.", list_to_string(&names(&loose)));
            lines.extend(wrap(&text, DESCRIPTION_WIDTH));
        }

        let others: Vec<ObjectId> = self
            .repository
            .characters_in(room)
            .into_iter()
            .filter(|c| *c != looker)
            .collect();
        if !others.is_empty() {
            let verb = if others.len() == 1 { "is" } else { "are" };
            let text = format!(
                "{} {} standing here.",
                list_to_string(&names(&others)),
                verb
            );
            lines.extend(wrap(&text, DESCRIPTION_WIDTH));
        }

        let mut exits = String::from("[ Exits:  ");
        for exit in self.repository.exits_in(room) {
            exits.push_str(&self.repository.name_of(exit));
            exits.push_str("  ");
        }
        exits.push(']');
        lines.push(exits);

        unpack_description(&mini_map, &lines)
    }

    /// Name, description and visible clothing of a character.
    pub fn character_appearance(&self, character: ObjectId) -> String {
        let Some(record) = self.repository.character(character) else {
            return "You see nothing.".to_string();
        };
        let mut out = record.name.clone();
        if !record.description.is_empty() {
            out.push('\n');
            out.push_str(&record.description);
        }
        out.push_str("\n\n");
        out.push_str(&self.worn_summary(character));
        out
    }

    pub fn item_appearance(&self, item: ObjectId) -> String {
        let Some(record) = self.repository.item(item) else {
            return "You see nothing.".to_string();
        };
        let mut out = record.name.clone();
        if !record.description.is_empty() {
            out.push('\n');
            out.push_str(&record.description);
        }

        let extra = match &record.kind {
            ItemKind::Container(_) => Some(self.contents_listing(item, "It is empty.")),
            ItemKind::LiquidContainer(_) => Some(
                self.liquid_in(item)
                    .and_then(|stack| self.repository.item(stack))
                    .and_then(|stack| {
                        let liquid = stack.liquid()?;
                        Some(format!(
                            "It holds {} {} of {}.",
                            liquid.uses,
                            units(liquid.uses),
                            liquid.original_name
                        ))
                    })
                    .unwrap_or_else(|| "It is empty.".to_string()),
            ),
            ItemKind::Liquid(liquid) => Some(format!(
                "There {} {} {} of {}.",
                if liquid.uses == 1 { "is" } else { "are" },
                liquid.uses,
                units(liquid.uses),
                liquid.original_name
            )),
            ItemKind::Consumable(food) => Some(format!(
                "It has {} {} left.",
                food.uses,
                if food.uses == 1 { "use" } else { "uses" }
            )),
            ItemKind::Plain | ItemKind::Garment(_) => None,
        };
        if let Some(extra) = extra {
            out.push_str("\n\n");
            out.push_str(&extra);
        }
        out
    }
}

fn units(count: u32) -> &'static str {
    if count == 1 {
        "unit"
    } else {
        "units"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::Repository;
    use gloaming_core::types::{Container, Liquid, LiquidContainer};

    struct Fixture {
        state: State,
        square: ObjectId,
        alley: ObjectId,
        ayla: ObjectId,
        bran: ObjectId,
    }

    fn setup() -> Fixture {
        let mut repo = Repository::new();
        let square = repo.create_room("Town Square", "town");
        let alley = repo.create_room("Dark Alley", "town");
        {
            let room = repo.room_mut(square).unwrap();
            room.general_desc =
                "A wide square.<night> Lamps flicker.</night><morning> Sun shines.</morning>"
                    .to_string();
            room.set_detail("fountain", "An old stone fountain.");
        }
        {
            let room = repo.room_mut(alley).unwrap();
            room.x = 1;
            room.set_dark(true);
            room.general_desc = "Rats everywhere.".to_string();
        }
        repo.create_exit("east", square, alley);
        repo.create_exit("west", alley, square);
        let ayla = repo.create_character("Ayla", Some(square));
        let bran = repo.create_character("Bran", Some(square));
        Fixture {
            state: State::new(repo, 10, 1.0),
            square,
            alley,
            ayla,
            bran,
        }
    }

    #[test]
    fn test_room_appearance_lists_everything() {
        let mut f = setup();
        f.state
            .repository
            .create_item("an apple", ItemKind::Plain, Location::Room(f.square));
        let bench = f
            .state
            .repository
            .create_item("a bench", ItemKind::Plain, Location::Room(f.square));
        f.state
            .repository
            .item_mut(bench)
            .unwrap()
            .set_flag(ItemFlags::FURNITURE, true);

        let text = f.state.room_appearance(f.square, f.ayla);
        assert!(text.contains("Town Square (town) 12:00am"));
        assert!(text.contains("A wide square. Lamps flicker."));
        assert!(!text.contains("Sun shines"));
        assert!(text.contains("A bench."));
        assert!(text.contains("You see an apple on the ground."));
        assert!(text.contains("Bran is standing here."));
        assert!(text.contains("[ Exits:  east  ]"));
        assert!(text.contains("()[]"));
    }

    #[test]
    fn test_dark_room_is_pitch_black_without_light() {
        let mut f = setup();
        f.state.repository.character_mut(f.ayla).unwrap().location = Some(f.alley);
        let text = f.state.room_appearance(f.alley, f.ayla);
        assert!(text.contains(PITCH_BLACK));
        assert!(!text.contains("Rats"));

        let lantern =
            f.state
                .repository
                .create_item("a lantern", ItemKind::Plain, Location::Carried(f.ayla));
        f.state
            .repository
            .item_mut(lantern)
            .unwrap()
            .set_flag(ItemFlags::LIT, true);
        let text = f.state.room_appearance(f.alley, f.ayla);
        assert!(text.contains("Rats everywhere."));
    }

    #[test]
    fn test_description_cache_until_invalidated() {
        let mut f = setup();
        f.state.room_appearance(f.square, f.ayla);
        f.state.repository.room_mut(f.square).unwrap().general_desc = "Rebuilt.".to_string();
        assert!(!f.state.room_appearance(f.square, f.ayla).contains("Rebuilt."));

        f.state.runtime.invalidate_room(f.square);
        assert!(f.state.room_appearance(f.square, f.ayla).contains("Rebuilt."));
    }

    #[test]
    fn test_look_at_targets() {
        let mut f = setup();
        f.state.repository.character_mut(f.bran).unwrap().description =
            "A tall miller.".to_string();

        f.state.look(f.ayla, Some("bran")).unwrap();
        assert_eq!(
            f.state.network.drain_for(f.ayla),
            vec!["Bran\nA tall miller.\n\nBran is not wearing anything."]
        );

        f.state.look(f.ayla, Some("Fountain")).unwrap();
        assert_eq!(
            f.state.network.drain_for(f.ayla),
            vec!["An old stone fountain."]
        );

        f.state.look(f.ayla, Some("east")).unwrap();
        let seen = f.state.network.drain_for(f.ayla);
        assert!(seen[0].contains("Dark Alley"));
        assert!(seen[0].contains(PITCH_BLACK));

        assert_eq!(
            f.state.look(f.ayla, Some("statue")),
            Err(RuleError::NotFound("statue".to_string()))
        );
    }

    #[test]
    fn test_item_appearance_by_kind() {
        let mut f = setup();
        let bag = f.state.repository.create_item(
            "a bag",
            ItemKind::Container(Container::default()),
            Location::Carried(f.ayla),
        );
        assert_eq!(f.state.item_appearance(bag), "a bag\n\nIt is empty.");

        let flask = f.state.repository.create_item(
            "a flask",
            ItemKind::LiquidContainer(LiquidContainer { capacity: 5 }),
            Location::Carried(f.ayla),
        );
        f.state.repository.create_item(
            "water",
            ItemKind::Liquid(Liquid {
                original_name: "water".to_string(),
                uses: 3,
                effects: Vec::new(),
            }),
            Location::Inside(flask),
        );
        assert_eq!(
            f.state.item_appearance(flask),
            "a flask\n\nIt holds 3 units of water."
        );
    }

    #[test]
    fn test_look_in_the_dark_only_reaches_carried_items() {
        let mut f = setup();
        f.state.repository.character_mut(f.ayla).unwrap().location = Some(f.alley);
        f.state
            .repository
            .create_item("a rat", ItemKind::Plain, Location::Room(f.alley));
        f.state
            .repository
            .create_item("a coin", ItemKind::Plain, Location::Carried(f.ayla));

        assert!(f.state.look(f.ayla, Some("rat")).is_err());
        f.state.look(f.ayla, Some("coin")).unwrap();
        assert_eq!(f.state.network.drain_for(f.ayla), vec!["a coin"]);
    }
}
