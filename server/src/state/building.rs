//! Builder commands: coordinate-aware digging, room details and
//! descriptions, plus the `time` report.

use gloaming_core::gametime::Season;
use gloaming_core::types::{Location, ObjectId};
use gloaming_core::RuleError;

use crate::enums::Direction;
use crate::helpers::split_aliases;
use crate::state::State;

const DIG_USAGE: &str = "Usage: dig[/teleport] <roomname>[;alias;alias...] [= <exit_there>[;alias;alias..]] [, <exit_back_here>[;alias;alias..]]";

fn alias_suffix(aliases: &[String]) -> String {
    if aliases.is_empty() {
        String::new()
    } else {
        format!(" ({})", aliases.join(", "))
    }
}

impl State {
    fn require_builder(&self, character: ObjectId) -> Result<(), RuleError> {
        if self
            .repository
            .character(character)
            .is_some_and(|c| c.is_builder())
        {
            Ok(())
        } else {
            Err(RuleError::NoPermission)
        }
    }

    /// Creates a room next to the builder's, optionally wired with an exit
    /// there and one back. When the exit is named after a compass direction
    /// the new room's coordinates are offset accordingly.
    ///
    /// # Arguments
    /// * `lhs` - "name[;alias...]" of the new room
    /// * `rhs` - "exit[;alias...][, back exit[;alias...]]"
    pub fn dig(
        &mut self,
        builder: ObjectId,
        switches: &[String],
        lhs: &str,
        rhs: Option<&str>,
    ) -> Result<ObjectId, RuleError> {
        self.require_builder(builder)?;
        if lhs.trim().is_empty() {
            return Err(RuleError::Usage(DIG_USAGE.to_string()));
        }
        let (room_name, _) = split_aliases(lhs);
        if room_name.is_empty() {
            return Err(RuleError::Usage("You must supply a new room name.".to_string()));
        }

        let here = self
            .repository
            .character(builder)
            .and_then(|c| c.location)
            .and_then(|r| self.repository.room(r))
            .map(|r| (r.id, r.name.clone(), r.zone.clone(), r.coords()));
        let zone = here.as_ref().map(|h| h.2.clone()).unwrap_or_default();
        let mut coords = here.as_ref().map(|h| h.3).unwrap_or((0, 0, 0));

        let new_room = self.repository.create_room(&room_name, &zone);
        let mut report = format!("Created room {}({}).", room_name, new_room);

        let mut exit_specs = rhs.map(|r| r.splitn(2, ',')).into_iter().flatten();
        if let Some(spec) = exit_specs.next() {
            let (key, aliases) = split_aliases(spec);
            match &here {
                _ if key.is_empty() => report.push_str("\nNo exit created to new room."),
                None => report.push_str("\nYou cannot create an exit from a None-location."),
                Some((from, from_name, _, _)) => {
                    if let Ok(direction) = key.parse::<Direction>() {
                        let (dx, dy, dz) = direction.offset();
                        coords = (coords.0 + dx, coords.1 + dy, coords.2 + dz);
                    }
                    let exit = self.repository.create_exit(&key, *from, new_room);
                    if let Some(record) = self.repository.exit_mut(exit) {
                        record.aliases = aliases.clone();
                    }
                    report.push_str(&format!(
                        "\nCreated Exit from {} to {}: {}({}){}.",
                        from_name,
                        room_name,
                        key,
                        exit,
                        alias_suffix(&aliases)
                    ));
                }
            }
        }
        if let Some(spec) = exit_specs.next() {
            let (key, aliases) = split_aliases(spec);
            match &here {
                _ if key.is_empty() => report.push_str("\nNo back exit created."),
                None => {
                    report.push_str("\nYou cannot create an exit back to a None-location.")
                }
                Some((from, from_name, _, _)) => {
                    let exit = self.repository.create_exit(&key, new_room, *from);
                    if let Some(record) = self.repository.exit_mut(exit) {
                        record.aliases = aliases.clone();
                    }
                    report.push_str(&format!(
                        "\nCreated Exit back from {} to {}: {}({}){}.",
                        room_name,
                        from_name,
                        key,
                        exit,
                        alias_suffix(&aliases)
                    ));
                }
            }
        }

        if let Some(record) = self.repository.room_mut(new_room) {
            (record.x, record.y, record.z) = coords;
        }
        log::info!("{} dug {} at {:?} in '{}'", builder, new_room, coords, zone);
        self.msg(builder, report);

        if switches.iter().any(|s| s == "teleport" || s == "tel") {
            self.cancel_movement(builder);
            match here {
                Some((from, ..)) => self.relocate_character(builder, from, new_room, None),
                None => {
                    if let Some(record) = self.repository.character_mut(builder) {
                        record.location = Some(new_room);
                    }
                    self.look_around(builder);
                }
            }
        }
        Ok(new_room)
    }

    /// `@detail` in its forms: list, show one, set (for every `;` alias) and
    /// `/del`.
    pub fn detail(
        &mut self,
        builder: ObjectId,
        switches: &[String],
        lhs: &str,
        rhs: Option<&str>,
    ) -> Result<(), RuleError> {
        self.require_builder(builder)?;
        let room_id = self
            .repository
            .character(builder)
            .and_then(|c| c.location)
            .ok_or_else(|| RuleError::Usage("You are nowhere.".to_string()))?;
        let room = self
            .repository
            .room_mut(room_id)
            .ok_or_else(|| RuleError::Usage("You are nowhere.".to_string()))?;
        let deleting = switches.iter().any(|s| s == "del");
        let lhs = lhs.trim();

        let reply = if lhs.is_empty() {
            if room.details.is_empty() {
                format!("The room {} doesn't have any detail set.", room.name)
            } else {
                let listed: Vec<String> = room
                    .details
                    .iter()
                    .map(|(key, desc)| format!("{}: {}", key, desc))
                    .collect();
                format!("Details on Room:\n{}", listed.join("\n"))
            }
        } else if rhs.is_none() && !deleting {
            match room.detail(lhs) {
                Some(desc) => format!("Detail '{}' on Room:\n{}", lhs, desc),
                None => format!("Detail '{}' not found.", lhs),
            }
        } else if deleting {
            for key in lhs.split(';') {
                room.del_detail(key);
            }
            format!("Detail {} deleted, if it existed.", lhs)
        } else {
            let text = rhs.unwrap_or_default();
            for key in lhs.split(';').filter(|k| !k.trim().is_empty()) {
                room.set_detail(key, text);
            }
            format!("Detail set '{}': '{}'", lhs, text)
        };

        self.msg(builder, reply);
        Ok(())
    }

    /// `@desc`: with a season switch sets that season's room description;
    /// `@desc <target> = <text>` describes an item or character; otherwise
    /// sets the room's general description. No arguments lists them all.
    pub fn describe(
        &mut self,
        builder: ObjectId,
        switches: &[String],
        args: &str,
        lhs: &str,
        rhs: Option<&str>,
    ) -> Result<(), RuleError> {
        self.require_builder(builder)?;
        let room = self
            .repository
            .character(builder)
            .and_then(|c| c.location)
            .filter(|r| self.repository.room(*r).is_some())
            .ok_or_else(|| RuleError::Usage("No location was found!".to_string()))?;
        let room_name = self.repository.name_of(room);
        let args = args.trim();

        if args.is_empty() {
            let Some(record) = self.repository.room(room) else {
                return Ok(());
            };
            let listing = format!(
                "Descriptions on {}:\n spring: {}\n summer: {}\n autumn: {}\n winter: {}\n general: {}",
                record.name,
                record.spring_desc,
                record.summer_desc,
                record.autumn_desc,
                record.winter_desc,
                record.general_desc
            );
            self.msg(builder, listing);
            return Ok(());
        }

        let season = switches.first().and_then(|s| s.parse::<Season>().ok());
        if let Some(season) = season {
            if rhs.is_some() {
                return Err(RuleError::Usage(
                    "Seasonal descs only work with rooms, not objects.".to_string(),
                ));
            }
            if let Some(record) = self.repository.room_mut(room) {
                *record.desc_slot_mut(Some(season)) = args.to_string();
            }
            self.runtime.invalidate_room(room);
            self.msg(
                builder,
                format!("Seasonal description was set on {}.", room_name),
            );
            return Ok(());
        }

        if let Some(text) = rhs {
            let target = lhs.trim();
            let described = if let Some(item) = self
                .repository
                .find_item(target, &[Location::Carried(builder), Location::Room(room)])
            {
                if let Some(record) = self.repository.item_mut(item) {
                    record.description = text.to_string();
                }
                item
            } else if let Some(other) = self.repository.find_character_in(room, target) {
                if let Some(record) = self.repository.character_mut(other) {
                    record.description = text.to_string();
                }
                other
            } else {
                return Err(RuleError::NotFound(target.to_string()));
            };
            let name = self.repository.name_of(described);
            self.msg(builder, format!("The description was set on {}.", name));
            return Ok(());
        }

        if let Some(record) = self.repository.room_mut(room) {
            *record.desc_slot_mut(None) = args.to_string();
        }
        self.runtime.invalidate_room(room);
        self.msg(
            builder,
            format!("General description was set on {}.", room_name),
        );
        Ok(())
    }

    /// The `time` report: season, time slot, clock and date.
    pub fn time_report(&mut self, character: ObjectId) {
        let located = self
            .repository
            .character(character)
            .is_some_and(|c| c.location.is_some());
        if !located {
            self.msg(character, "No location available - you are outside time.");
            return;
        }
        let (season, slot) = self.time_and_season();
        let article = if season == Season::Autumn { "an" } else { "a" };
        let now = self.game_time();
        self.msg(
            character,
            format!(
                "It's {} {} {}.\nThe time is: {}\nThe date is: {}",
                article,
                season,
                slot,
                now.format("%I:%M %p"),
                now.format("%x")
            ),
        );
    }
}
