use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use anyhow::Context;
use bincode::{Decode, Encode};
use serde::{Deserialize, Serialize};

use gloaming_core::string_operations::name_matches;
use gloaming_core::types::{Character, Exit, Globals, Item, ItemKind, Location, ObjectId, Room};

/// Everything that survives a restart. Runtime-only state (movement timers,
/// queued commands, description caches) lives in `Runtime` instead.
#[derive(Debug, Clone, Default, PartialEq, Encode, Decode, Serialize, Deserialize)]
pub struct World {
    pub next_id: u32,
    pub globals: Globals,
    pub rooms: BTreeMap<ObjectId, Room>,
    pub exits: BTreeMap<ObjectId, Exit>,
    pub characters: BTreeMap<ObjectId, Character>,
    pub items: BTreeMap<ObjectId, Item>,
}

// Contains the persistent world data for the server
pub struct Repository {
    world: World,
}

impl Default for Repository {
    fn default() -> Self {
        Self::new()
    }
}

impl Repository {
    pub fn new() -> Self {
        Self {
            world: World {
                next_id: 1,
                ..World::default()
            },
        }
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    /// Reads a bincode snapshot written by [`Repository::save`].
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        log::info!("Loading world from {}...", path.display());
        let data = fs::read(path).with_context(|| format!("reading {}", path.display()))?;
        let (world, read): (World, usize) =
            bincode::decode_from_slice(&data, bincode::config::standard())
                .with_context(|| format!("decoding {}", path.display()))?;

        if read != data.len() {
            log::warn!(
                "World snapshot has {} trailing bytes, ignoring them",
                data.len() - read
            );
        }

        log::info!(
            "World loaded: {} rooms, {} exits, {} characters, {} items.",
            world.rooms.len(),
            world.exits.len(),
            world.characters.len(),
            world.items.len()
        );
        Ok(Self { world })
    }

    /// Writes the world to `path`, going through a temporary file so a crash
    /// mid-write never leaves a truncated snapshot behind.
    pub fn save(&self, path: &Path) -> anyhow::Result<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)
                    .with_context(|| format!("creating {}", parent.display()))?;
            }
        }

        let data = bincode::encode_to_vec(&self.world, bincode::config::standard())
            .context("encoding world")?;
        let tmp = path.with_extension("tmp");
        fs::write(&tmp, &data).with_context(|| format!("writing {}", tmp.display()))?;
        fs::rename(&tmp, path).with_context(|| format!("replacing {}", path.display()))?;

        log::debug!("World saved to {} ({} bytes)", path.display(), data.len());
        Ok(())
    }

    /// Dumps the world as pretty JSON for inspection.
    pub fn export_json(&self, path: &Path) -> anyhow::Result<()> {
        let json = serde_json::to_string_pretty(&self.world).context("serializing world")?;
        fs::write(path, json).with_context(|| format!("writing {}", path.display()))?;
        log::info!("World exported to {}", path.display());
        Ok(())
    }

    pub fn globals(&self) -> &Globals {
        &self.world.globals
    }

    pub fn globals_mut(&mut self) -> &mut Globals {
        &mut self.world.globals
    }

    fn allocate_id(&mut self) -> ObjectId {
        let id = ObjectId(self.world.next_id.max(1));
        self.world.next_id = id.0 + 1;
        id
    }

    // ---------------------------------------------------------------------
    // Creation
    // ---------------------------------------------------------------------

    pub fn create_room(&mut self, name: &str, zone: &str) -> ObjectId {
        let id = self.allocate_id();
        self.world.rooms.insert(id, Room::new(id, name, zone));
        log::debug!("Created room {} ({})", name, id);
        id
    }

    pub fn create_exit(&mut self, key: &str, from: ObjectId, to: ObjectId) -> ObjectId {
        let id = self.allocate_id();
        self.world.exits.insert(id, Exit::new(id, key, from, to));
        log::debug!("Created exit {} ({}) from {} to {}", key, id, from, to);
        id
    }

    pub fn create_character(&mut self, name: &str, room: Option<ObjectId>) -> ObjectId {
        let id = self.allocate_id();
        let mut character = Character::new(id, name);
        character.location = room;
        character.home = room;
        self.world.characters.insert(id, character);
        log::debug!("Created character {} ({})", name, id);
        id
    }

    /// Creates an item at `location`. No arrival rules run here; callers that
    /// need liquid merging go through `State::move_item`.
    pub fn create_item(&mut self, name: &str, kind: ItemKind, location: Location) -> ObjectId {
        let id = self.allocate_id();
        let mut item = Item::new(id, name, kind);
        item.location = location;
        self.world.items.insert(id, item);
        log::debug!("Created item {} ({})", name, id);
        id
    }

    // ---------------------------------------------------------------------
    // Lookup
    // ---------------------------------------------------------------------

    pub fn room(&self, id: ObjectId) -> Option<&Room> {
        self.world.rooms.get(&id)
    }

    pub fn room_mut(&mut self, id: ObjectId) -> Option<&mut Room> {
        self.world.rooms.get_mut(&id)
    }

    pub fn exit(&self, id: ObjectId) -> Option<&Exit> {
        self.world.exits.get(&id)
    }

    pub fn exit_mut(&mut self, id: ObjectId) -> Option<&mut Exit> {
        self.world.exits.get_mut(&id)
    }

    pub fn character(&self, id: ObjectId) -> Option<&Character> {
        self.world.characters.get(&id)
    }

    pub fn character_mut(&mut self, id: ObjectId) -> Option<&mut Character> {
        self.world.characters.get_mut(&id)
    }

    pub fn item(&self, id: ObjectId) -> Option<&Item> {
        self.world.items.get(&id)
    }

    pub fn item_mut(&mut self, id: ObjectId) -> Option<&mut Item> {
        self.world.items.get_mut(&id)
    }

    pub fn character_named(&self, name: &str) -> Option<ObjectId> {
        self.world
            .characters
            .values()
            .find(|c| c.name.eq_ignore_ascii_case(name))
            .map(|c| c.id)
    }

    /// Display name of any entity, or "something" when it no longer exists.
    pub fn name_of(&self, id: ObjectId) -> String {
        if let Some(item) = self.item(id) {
            return item.name.clone();
        }
        if let Some(character) = self.character(id) {
            return character.name.clone();
        }
        if let Some(room) = self.room(id) {
            return room.name.clone();
        }
        if let Some(exit) = self.exit(id) {
            return exit.key.clone();
        }
        "something".to_string()
    }

    // ---------------------------------------------------------------------
    // Contents
    // ---------------------------------------------------------------------

    /// Items at `location`, in creation order.
    pub fn items_at(&self, location: Location) -> Vec<ObjectId> {
        self.world
            .items
            .values()
            .filter(|item| item.location == location)
            .map(|item| item.id)
            .collect()
    }

    pub fn characters_in(&self, room: ObjectId) -> Vec<ObjectId> {
        self.world
            .characters
            .values()
            .filter(|c| c.location == Some(room))
            .map(|c| c.id)
            .collect()
    }

    pub fn exits_in(&self, room: ObjectId) -> Vec<ObjectId> {
        self.world
            .exits
            .values()
            .filter(|e| e.location == room)
            .map(|e| e.id)
            .collect()
    }

    pub fn rooms_in_zone(&self, zone: &str) -> Vec<ObjectId> {
        self.world
            .rooms
            .values()
            .filter(|r| r.zone == zone)
            .map(|r| r.id)
            .collect()
    }

    pub fn room_at(&self, zone: &str, coords: (i32, i32, i32)) -> Option<ObjectId> {
        self.world
            .rooms
            .values()
            .find(|r| r.zone == zone && r.coords() == coords)
            .map(|r| r.id)
    }

    /// Finds an item by name among `locations`, searched in order. Exact
    /// name or alias matches win over prefix matches.
    pub fn find_item(&self, query: &str, locations: &[Location]) -> Option<ObjectId> {
        let query = query.trim();
        if query.is_empty() {
            return None;
        }

        let candidates: Vec<&Item> = locations
            .iter()
            .flat_map(|loc| self.items_at(*loc))
            .filter_map(|id| self.item(id))
            .collect();

        candidates
            .iter()
            .find(|item| {
                item.name.eq_ignore_ascii_case(query)
                    || item.aliases.iter().any(|a| a.eq_ignore_ascii_case(query))
            })
            .or_else(|| {
                candidates
                    .iter()
                    .find(|item| name_matches(query, &item.name, &item.aliases))
            })
            .map(|item| item.id)
    }

    pub fn find_character_in(&self, room: ObjectId, query: &str) -> Option<ObjectId> {
        let query = query.trim();
        if query.is_empty() {
            return None;
        }
        let here: Vec<&Character> = self
            .characters_in(room)
            .into_iter()
            .filter_map(|id| self.character(id))
            .collect();

        here.iter()
            .find(|c| c.name.eq_ignore_ascii_case(query))
            .or_else(|| {
                here.iter()
                    .find(|c| name_matches(query, &c.name, &c.aliases))
            })
            .map(|c| c.id)
    }

    pub fn find_exit_in(&self, room: ObjectId, query: &str) -> Option<ObjectId> {
        self.exits_in(room)
            .into_iter()
            .find(|id| self.exit(*id).is_some_and(|e| e.matches(query)))
    }

    /// True when `item` is `ancestor` or sits somewhere inside it.
    pub fn is_within(&self, item: ObjectId, ancestor: ObjectId) -> bool {
        let mut current = Some(item);
        while let Some(id) = current {
            if id == ancestor {
                return true;
            }
            current = match self.item(id).map(|i| i.location) {
                Some(Location::Inside(parent)) => Some(parent),
                _ => None,
            };
        }
        false
    }

    // ---------------------------------------------------------------------
    // Mutation
    // ---------------------------------------------------------------------

    /// Raw location change; arrival rules live in `State::move_item`.
    pub fn set_item_location(&mut self, id: ObjectId, location: Location) -> bool {
        match self.item_mut(id) {
            Some(item) => {
                item.location = location;
                true
            }
            None => false,
        }
    }

    /// Deletes an item and everything inside it.
    pub fn delete_item(&mut self, id: ObjectId) {
        for child in self.items_at(Location::Inside(id)) {
            self.delete_item(child);
        }
        if self.world.items.remove(&id).is_some() {
            log::debug!("Deleted item {}", id);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gloaming_core::types::{Container, Liquid};

    fn sample() -> (Repository, ObjectId, ObjectId) {
        let mut repo = Repository::new();
        let room = repo.create_room("Town Square", "town");
        let ch = repo.create_character("Ayla", Some(room));
        (repo, room, ch)
    }

    #[test]
    fn test_ids_are_unique_across_kinds() {
        let (mut repo, room, ch) = sample();
        let item = repo.create_item("a stone", ItemKind::Plain, Location::Room(room));
        assert_ne!(room, ch);
        assert_ne!(ch, item);
        assert_eq!(repo.name_of(item), "a stone");
        assert_eq!(repo.name_of(ObjectId(999)), "something");
    }

    #[test]
    fn test_find_item_prefers_exact_match() {
        let (mut repo, room, _) = sample();
        let long = repo.create_item("red hat band", ItemKind::Plain, Location::Room(room));
        let exact = repo.create_item("red hat", ItemKind::Plain, Location::Room(room));

        assert_eq!(repo.find_item("red hat", &[Location::Room(room)]), Some(exact));
        assert_eq!(repo.find_item("band", &[Location::Room(room)]), Some(long));
        assert_eq!(repo.find_item("", &[Location::Room(room)]), None);
    }

    #[test]
    fn test_find_item_searches_locations_in_order() {
        let (mut repo, room, ch) = sample();
        let on_floor = repo.create_item("apple", ItemKind::Plain, Location::Room(room));
        let carried = repo.create_item("apple", ItemKind::Plain, Location::Carried(ch));

        let found = repo.find_item("apple", &[Location::Carried(ch), Location::Room(room)]);
        assert_eq!(found, Some(carried));
        let found = repo.find_item("apple", &[Location::Room(room), Location::Carried(ch)]);
        assert_eq!(found, Some(on_floor));
    }

    #[test]
    fn test_delete_item_removes_nested_contents() {
        let (mut repo, room, _) = sample();
        let bag = repo.create_item(
            "a bag",
            ItemKind::Container(Container::default()),
            Location::Room(room),
        );
        let inner = repo.create_item("a pouch", ItemKind::Plain, Location::Inside(bag));
        let coin = repo.create_item("a coin", ItemKind::Plain, Location::Inside(inner));

        assert!(repo.is_within(coin, bag));
        repo.delete_item(bag);
        assert!(repo.item(inner).is_none());
        assert!(repo.item(coin).is_none());
    }

    #[test]
    fn test_save_and_load_snapshot() {
        let (mut repo, room, _) = sample();
        repo.create_item(
            "water",
            ItemKind::Liquid(Liquid {
                original_name: "water".to_string(),
                uses: 4,
                effects: Vec::new(),
            }),
            Location::Room(room),
        );
        repo.globals_mut().ticker = 42;

        let dir = std::env::temp_dir().join(format!("gloaming-repo-{}", std::process::id()));
        let path = dir.join("world.bin");
        repo.save(&path).unwrap();
        let loaded = Repository::load(&path).unwrap();
        assert_eq!(loaded.world(), repo.world());

        let _ = fs::remove_dir_all(&dir);
    }
}
