use gloaming_core::constants::ItemFlags;
use gloaming_core::message::Message;
use gloaming_core::types::{Location, ObjectId};
use gloaming_core::RuleError;

use crate::state::State;

impl State {
    fn room_of(&self, character: ObjectId) -> Result<ObjectId, RuleError> {
        self.repository
            .character(character)
            .and_then(|c| c.location)
            .ok_or_else(|| RuleError::Usage("You are nowhere.".to_string()))
    }

    /// Name of a carried, droppable item.
    fn carried_loose(&self, actor: ObjectId, item: ObjectId) -> Result<String, RuleError> {
        let record = self
            .repository
            .item(item)
            .ok_or_else(|| RuleError::NotFound(self.repository.name_of(item)))?;
        if record.location != Location::Carried(actor) {
            return Err(RuleError::NotCarrying(record.name.clone()));
        }
        if record.is_worn() {
            return Err(RuleError::WearingItem);
        }
        Ok(record.name.clone())
    }

    /// Picks an item up off the floor.
    pub fn get(&mut self, actor: ObjectId, item: ObjectId) -> Result<(), RuleError> {
        let room = self.room_of(actor)?;
        let record = self
            .repository
            .item(item)
            .ok_or_else(|| RuleError::NotFound(self.repository.name_of(item)))?;
        let name = record.name.clone();
        if record.location != Location::Room(room) {
            return Err(RuleError::NotFound(name));
        }
        if record.has_flag(ItemFlags::NO_GET) || record.has_flag(ItemFlags::FURNITURE) {
            return Err(RuleError::CantGet(name));
        }

        self.move_item(item, Location::Carried(actor));
        log::debug!("{} picked up {}", actor, item);

        self.msg(actor, format!("You pick up {}.", name));
        let message = Message::new()
            .subject(&self.repository.name_of(actor))
            .text(" picks up ")
            .object(&name)
            .text(".");
        self.broadcast(room, &message, &[actor]);
        Ok(())
    }

    /// Takes an item out of a container.
    pub fn get_from(
        &mut self,
        actor: ObjectId,
        item: ObjectId,
        container: ObjectId,
    ) -> Result<(), RuleError> {
        let container_name = self.repository.name_of(container);
        let is_container = self
            .repository
            .item(container)
            .is_some_and(|c| c.container().is_some());
        if !is_container {
            return Err(RuleError::NotContainer(container_name));
        }
        let record = self
            .repository
            .item(item)
            .ok_or_else(|| RuleError::NotFound(self.repository.name_of(item)))?;
        let name = record.name.clone();
        if record.location != Location::Inside(container) {
            return Err(RuleError::NotFound(name));
        }

        self.move_item(item, Location::Carried(actor));
        self.msg(actor, format!("You get {} from {}.", name, container_name));
        let message = Message::new()
            .subject(&self.repository.name_of(actor))
            .text(" gets ")
            .object(&name)
            .text(" from ")
            .object(&container_name)
            .text(".");
        self.broadcast_around(actor, &message, &[actor]);
        Ok(())
    }

    pub fn drop(&mut self, actor: ObjectId, item: ObjectId) -> Result<(), RuleError> {
        let room = self.room_of(actor)?;
        let name = self.carried_loose(actor, item)?;

        self.move_item(item, Location::Room(room));
        log::debug!("{} dropped {}", actor, item);

        self.msg(actor, format!("You drop {}.", name));
        let message = Message::new()
            .subject(&self.repository.name_of(actor))
            .text(" drops ")
            .object(&name)
            .text(".");
        self.broadcast(room, &message, &[actor]);
        Ok(())
    }

    /// Puts a carried item into a container, subject to its capacity.
    pub fn put(
        &mut self,
        actor: ObjectId,
        item: ObjectId,
        container: ObjectId,
    ) -> Result<(), RuleError> {
        let name = self.carried_loose(actor, item)?;
        let container_name = self.repository.name_of(container);
        self.insert_into(item, container)?;

        self.msg(actor, format!("You put {} in {}.", name, container_name));
        let message = Message::new()
            .subject(&self.repository.name_of(actor))
            .text(" puts ")
            .object(&name)
            .text(" in ")
            .object(&container_name)
            .text(".");
        self.broadcast_around(actor, &message, &[actor]);
        Ok(())
    }

    pub fn give(
        &mut self,
        actor: ObjectId,
        item: ObjectId,
        target: ObjectId,
    ) -> Result<(), RuleError> {
        let room = self.room_of(actor)?;
        let name = self.carried_loose(actor, item)?;
        let target_name = self.repository.name_of(target);
        let same_room = self
            .repository
            .character(target)
            .is_some_and(|c| c.location == Some(room));
        if !same_room {
            return Err(RuleError::NotFound(target_name));
        }
        if target == actor {
            return Err(RuleError::Usage(format!("You keep {}.", name)));
        }

        self.move_item(item, Location::Carried(target));
        log::debug!("{} gave {} to {}", actor, item, target);

        let actor_name = self.repository.name_of(actor);
        self.msg(actor, format!("You give {} to {}.", name, target_name));
        self.msg(target, format!("{} gives you {}.", actor_name, name));
        let message = Message::new()
            .subject(&actor_name)
            .text(" gives ")
            .object(&name)
            .text(" to ")
            .slot(&target_name, "someone")
            .text(".");
        self.broadcast(room, &message, &[actor, target]);
        Ok(())
    }

    /// The `inventory` listing: carried items grouped by name with their mass.
    pub fn inventory_listing(&self, actor: ObjectId) -> String {
        let items = self.repository.items_at(Location::Carried(actor));
        if items.is_empty() {
            return "You are not carrying anything.".to_string();
        }

        let mut out = String::from("You are carrying:\n\n");
        for (name, count, mass) in self.group_by_name(&items) {
            out.push_str(&format!(
                " * {:<58} {:>8.1}\n",
                format!("x{} {}", count, name),
                mass
            ));
        }
        out.push_str(&format!("\nTotal Weight: {:.1}", self.carried_mass(actor)));
        out
    }

    /// Lists what a container holds, or `empty` when it holds nothing.
    pub fn contents_listing(&self, container: ObjectId, empty: &str) -> String {
        let items = self.repository.items_at(Location::Inside(container));
        if items.is_empty() {
            return empty.to_string();
        }
        let mut out = String::from("Contents:");
        for (name, count, _) in self.group_by_name(&items) {
            out.push_str(&format!("\n * x{} {}", count, name));
        }
        out
    }

    /// Groups consecutive items that share a name: (name, count, total mass).
    fn group_by_name(&self, items: &[ObjectId]) -> Vec<(String, usize, f64)> {
        let mut groups: Vec<(String, usize, f64)> = Vec::new();
        for id in items {
            let Some(item) = self.repository.item(*id) else {
                continue;
            };
            let mass = self.get_mass(*id, 1.0);
            match groups.last_mut() {
                Some((name, count, total)) if *name == item.name => {
                    *count += 1;
                    *total += mass;
                }
                _ => groups.push((item.name.clone(), 1, mass)),
            }
        }
        groups
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::Repository;
    use gloaming_core::clothing::ClothingType;
    use gloaming_core::types::{Container, Garment, ItemKind, Worn};

    struct Fixture {
        state: State,
        room: ObjectId,
        actor: ObjectId,
        other: ObjectId,
    }

    fn setup() -> Fixture {
        let mut repo = Repository::new();
        let room = repo.create_room("Market", "town");
        let actor = repo.create_character("Ayla", Some(room));
        let other = repo.create_character("Bran", Some(room));
        Fixture {
            state: State::new(repo, 10, 1.0),
            room,
            actor,
            other,
        }
    }

    fn location(f: &Fixture, id: ObjectId) -> Location {
        f.state.repository.item(id).unwrap().location
    }

    #[test]
    fn test_get_and_drop() {
        let mut f = setup();
        let apple = f
            .state
            .repository
            .create_item("an apple", ItemKind::Plain, Location::Room(f.room));

        f.state.get(f.actor, apple).unwrap();
        assert_eq!(location(&f, apple), Location::Carried(f.actor));
        assert_eq!(f.state.network.drain_for(f.actor), vec!["You pick up an apple."]);
        assert_eq!(
            f.state.network.drain_for(f.other),
            vec!["Ayla picks up an apple."]
        );

        f.state.drop(f.actor, apple).unwrap();
        assert_eq!(location(&f, apple), Location::Room(f.room));
        assert_eq!(
            f.state.drop(f.actor, apple),
            Err(RuleError::NotCarrying("an apple".to_string()))
        );
    }

    #[test]
    fn test_cannot_get_fixed_items() {
        let mut f = setup();
        let bench = f
            .state
            .repository
            .create_item("a bench", ItemKind::Plain, Location::Room(f.room));
        f.state
            .repository
            .item_mut(bench)
            .unwrap()
            .set_flag(ItemFlags::FURNITURE, true);
        assert_eq!(
            f.state.get(f.actor, bench),
            Err(RuleError::CantGet("a bench".to_string()))
        );
    }

    #[test]
    fn test_worn_items_cannot_be_dropped_or_given() {
        let mut f = setup();
        let hat = f.state.repository.create_item(
            "a hat",
            ItemKind::Garment(Garment {
                clothing_type: ClothingType::Hat,
                worn: Worn::Plain,
                covered_by: None,
            }),
            Location::Carried(f.actor),
        );
        assert_eq!(f.state.drop(f.actor, hat), Err(RuleError::WearingItem));
        assert_eq!(f.state.give(f.actor, hat, f.other), Err(RuleError::WearingItem));
        assert_eq!(location(&f, hat), Location::Carried(f.actor));
    }

    #[test]
    fn test_put_get_from_and_give() {
        let mut f = setup();
        let bag = f.state.repository.create_item(
            "a bag",
            ItemKind::Container(Container::default()),
            Location::Room(f.room),
        );
        let coin = f
            .state
            .repository
            .create_item("a coin", ItemKind::Plain, Location::Carried(f.actor));

        f.state.put(f.actor, coin, bag).unwrap();
        assert_eq!(location(&f, coin), Location::Inside(bag));
        assert_eq!(
            f.state.contents_listing(bag, "It is empty."),
            "Contents:\n * x1 a coin"
        );

        f.state.get_from(f.actor, coin, bag).unwrap();
        assert_eq!(location(&f, coin), Location::Carried(f.actor));
        assert_eq!(f.state.contents_listing(bag, "It is empty."), "It is empty.");

        f.state.network.drain_for(f.other);
        f.state.give(f.actor, coin, f.other).unwrap();
        assert_eq!(location(&f, coin), Location::Carried(f.other));
        assert_eq!(
            f.state.network.drain_for(f.other),
            vec!["Ayla gives you a coin."]
        );
    }

    #[test]
    fn test_inventory_listing_groups_by_name() {
        let mut f = setup();
        assert_eq!(
            f.state.inventory_listing(f.actor),
            "You are not carrying anything."
        );
        for _ in 0..2 {
            f.state
                .repository
                .create_item("an apple", ItemKind::Plain, Location::Carried(f.actor));
        }
        f.state
            .repository
            .create_item("a lantern", ItemKind::Plain, Location::Carried(f.actor));

        let listing = f.state.inventory_listing(f.actor);
        assert!(listing.starts_with("You are carrying:"));
        assert!(listing.contains("x2 an apple"));
        assert!(listing.contains("x1 a lantern"));
        assert!(listing.ends_with("Total Weight: 3.0"));
    }
}
