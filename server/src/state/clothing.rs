use gloaming_core::clothing::{check_wear_limits, order_clothes, ClothingType};
use gloaming_core::constants::WEARSTYLE_MAXLENGTH;
use gloaming_core::message::Message;
use gloaming_core::string_operations::list_to_string;
use gloaming_core::types::{Location, ObjectId, Worn};
use gloaming_core::RuleError;

use crate::state::State;

impl State {
    /// Garments `wearer` has on, in description order.
    ///
    /// # Arguments
    /// * `wearer` - Character whose clothes are listed
    /// * `exclude_covered` - Leave out garments hidden under another one
    pub fn worn_clothes(&self, wearer: ObjectId, exclude_covered: bool) -> Vec<ObjectId> {
        let worn: Vec<(ObjectId, ClothingType)> = self
            .repository
            .items_at(Location::Carried(wearer))
            .into_iter()
            .filter_map(|id| {
                let garment = self.repository.item(id)?.garment()?;
                if !garment.worn.is_worn() {
                    return None;
                }
                if exclude_covered && garment.covered_by.is_some() {
                    return None;
                }
                Some((id, garment.clothing_type))
            })
            .collect();

        order_clothes(worn, |(_, t)| *t)
            .into_iter()
            .map(|(id, _)| id)
            .collect()
    }

    /// Puts on a carried garment, optionally in a described style, and covers
    /// whatever worn garments its type hides.
    ///
    /// Re-wearing something already worn only changes its style.
    pub fn wear(
        &mut self,
        wearer: ObjectId,
        item: ObjectId,
        style: Option<&str>,
    ) -> Result<(), RuleError> {
        let record = self
            .repository
            .item(item)
            .ok_or_else(|| RuleError::NotFound(self.repository.name_of(item)))?;
        let name = record.name.clone();
        if record.location != Location::Carried(wearer) {
            return Err(RuleError::NotCarrying(name));
        }
        let Some(garment) = record.garment() else {
            return Err(RuleError::NotClothing(name));
        };
        let clothing_type = garment.clothing_type;
        let already_worn = garment.worn.is_worn();

        let style = style.map(str::trim).filter(|s| !s.is_empty());
        if let Some(style) = style {
            if style.chars().count() > WEARSTYLE_MAXLENGTH {
                return Err(RuleError::StyleTooLong(WEARSTYLE_MAXLENGTH));
            }
        }

        if already_worn {
            if style.is_none() {
                return Err(RuleError::AlreadyWearing(name));
            }
        } else {
            let worn_types: Vec<ClothingType> = self
                .worn_clothes(wearer, false)
                .into_iter()
                .filter_map(|id| self.repository.item(id)?.garment().map(|g| g.clothing_type))
                .collect();
            check_wear_limits(&worn_types, clothing_type)?;
        }

        // Restyling leaves existing coverage alone.
        let to_cover: Vec<ObjectId> = if already_worn {
            Vec::new()
        } else {
            self.worn_clothes(wearer, false)
                .into_iter()
                .filter(|id| *id != item)
                .filter(|id| {
                    self.repository
                        .item(*id)
                        .and_then(|i| i.garment())
                        .is_some_and(|g| clothing_type.autocovers().contains(&g.clothing_type))
                })
                .collect()
        };

        if let Some(garment) = self.repository.item_mut(item).and_then(|i| i.garment_mut()) {
            garment.worn = match style {
                Some(style) => Worn::Styled(style.to_string()),
                None => Worn::Plain,
            };
        }
        let mut covered_names = Vec::new();
        for id in &to_cover {
            if let Some(other) = self.repository.item_mut(*id) {
                covered_names.push(other.name.clone());
                if let Some(garment) = other.garment_mut() {
                    garment.covered_by = Some(item);
                }
            }
        }
        log::debug!("{} wears {} covering {:?}", wearer, item, to_cover);

        let wearer_name = self.repository.name_of(wearer);
        let mut message = Message::new().subject(&wearer_name);
        message = match style {
            Some(style) => message
                .text(" wears ")
                .object(&name)
                .text(&format!(" {}", style)),
            None => message.text(" puts on ").object(&name),
        };
        if !covered_names.is_empty() {
            message = message
                .text(", covering ")
                .object(&list_to_string(&covered_names));
        }
        message = message.text(".");
        self.broadcast_around(wearer, &message, &[]);
        Ok(())
    }

    /// Takes off a worn garment and uncovers anything it was covering.
    pub fn remove(&mut self, wearer: ObjectId, item: ObjectId) -> Result<(), RuleError> {
        let record = self
            .repository
            .item(item)
            .ok_or_else(|| RuleError::NotFound(self.repository.name_of(item)))?;
        let name = record.name.clone();
        let garment = match record.garment() {
            Some(g) if record.location == Location::Carried(wearer) && g.worn.is_worn() => g,
            _ => return Err(RuleError::NotWearing(name)),
        };
        if let Some(cover) = garment.covered_by {
            return Err(RuleError::CoveredBy(self.repository.name_of(cover)));
        }

        if let Some(garment) = self.repository.item_mut(item).and_then(|i| i.garment_mut()) {
            garment.worn = Worn::No;
        }
        let revealed = self.uncover_all_under(wearer, item);
        log::debug!("{} removes {} revealing {:?}", wearer, item, revealed);

        let mut message = Message::new()
            .subject(&self.repository.name_of(wearer))
            .text(" removes ")
            .object(&name);
        if !revealed.is_empty() {
            message = message
                .text(", revealing ")
                .object(&list_to_string(&revealed));
        }
        message = message.text(".");
        self.broadcast_around(wearer, &message, &[]);
        Ok(())
    }

    /// Clears `covered_by` on every carried garment covered by `cover` and
    /// returns their names.
    fn uncover_all_under(&mut self, wearer: ObjectId, cover: ObjectId) -> Vec<String> {
        let mut names = Vec::new();
        for id in self.repository.items_at(Location::Carried(wearer)) {
            let Some(other) = self.repository.item_mut(id) else {
                continue;
            };
            let name = other.name.clone();
            if let Some(garment) = other.garment_mut() {
                if garment.covered_by == Some(cover) {
                    garment.covered_by = None;
                    names.push(name);
                }
            }
        }
        names
    }

    /// Covers one worn garment with another.
    ///
    /// # Arguments
    /// * `wearer` - Character wearing both garments
    /// * `target` - Garment to hide
    /// * `cover` - Garment to hide it under
    pub fn cover(
        &mut self,
        wearer: ObjectId,
        target: ObjectId,
        cover: ObjectId,
    ) -> Result<(), RuleError> {
        let target_name = self.repository.name_of(target);
        let cover_name = self.repository.name_of(cover);
        let target_garment = self.worn_garment(wearer, target)?;
        let cover_garment = self.worn_garment(wearer, cover)?;

        if target == cover {
            return Err(RuleError::Usage(
                "You can't cover an item with itself!".to_string(),
            ));
        }
        if !cover_garment.0.can_cover_with() {
            return Err(RuleError::CantCoverWith(cover_name));
        }
        if target_garment.1.is_some() {
            return Err(RuleError::AlreadyCovered(target_name));
        }
        if cover_garment.1.is_some() {
            return Err(RuleError::CoveringIsCovered(cover_name));
        }

        if let Some(garment) = self.repository.item_mut(target).and_then(|i| i.garment_mut()) {
            garment.covered_by = Some(cover);
        }
        log::debug!("{} covers {} with {}", wearer, target, cover);

        let message = Message::new()
            .subject(&self.repository.name_of(wearer))
            .text(" covers ")
            .object(&target_name)
            .text(" with ")
            .object(&cover_name)
            .text(".");
        self.broadcast_around(wearer, &message, &[]);
        Ok(())
    }

    /// Reveals a covered garment. Only the outermost layer can be moved.
    pub fn uncover(&mut self, wearer: ObjectId, target: ObjectId) -> Result<(), RuleError> {
        let target_name = self.repository.name_of(target);
        let (_, covered_by) = self.worn_garment(wearer, target)?;
        let Some(cover) = covered_by else {
            return Err(RuleError::NotCovered(target_name));
        };
        let cover_is_covered = self
            .repository
            .item(cover)
            .and_then(|i| i.garment())
            .is_some_and(|g| g.covered_by.is_some());
        if cover_is_covered {
            return Err(RuleError::TooManyLayers(target_name));
        }

        if let Some(garment) = self.repository.item_mut(target).and_then(|i| i.garment_mut()) {
            garment.covered_by = None;
        }
        log::debug!("{} uncovers {}", wearer, target);

        let message = Message::new()
            .subject(&self.repository.name_of(wearer))
            .text(" uncovers ")
            .object(&target_name)
            .text(".");
        self.broadcast_around(wearer, &message, &[]);
        Ok(())
    }

    /// Type and cover of a garment `wearer` is wearing.
    fn worn_garment(
        &self,
        wearer: ObjectId,
        item: ObjectId,
    ) -> Result<(ClothingType, Option<ObjectId>), RuleError> {
        let record = self
            .repository
            .item(item)
            .ok_or_else(|| RuleError::NotFound(self.repository.name_of(item)))?;
        match record.garment() {
            Some(g) if record.location == Location::Carried(wearer) && g.worn.is_worn() => {
                Ok((g.clothing_type, g.covered_by))
            }
            _ => Err(RuleError::NotWearing(record.name.clone())),
        }
    }

    /// A garment entering an inventory is never worn or covered.
    pub(crate) fn at_get(&mut self, item: ObjectId) {
        if let Some(garment) = self.repository.item_mut(item).and_then(|i| i.garment_mut()) {
            garment.worn = Worn::No;
            garment.covered_by = None;
        }
    }

    /// "Ayla is wearing a hat and boots." line of a character description.
    pub fn worn_summary(&self, wearer: ObjectId) -> String {
        let name = self.repository.name_of(wearer);
        let shown: Vec<String> = self
            .worn_clothes(wearer, true)
            .into_iter()
            .filter_map(|id| {
                let item = self.repository.item(id)?;
                Some(match &item.garment()?.worn {
                    Worn::Styled(style) => format!("{} {}", item.name, style),
                    _ => item.name.clone(),
                })
            })
            .collect();

        if shown.is_empty() {
            format!("{} is not wearing anything.", name)
        } else {
            format!("{} is wearing {}.", name, list_to_string(&shown))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::Repository;
    use gloaming_core::types::{Garment, ItemKind};

    struct Fixture {
        state: State,
        room: ObjectId,
        wearer: ObjectId,
        watcher: ObjectId,
    }

    fn setup() -> Fixture {
        let mut repo = Repository::new();
        let room = repo.create_room("Dressing Room", "town");
        let wearer = repo.create_character("Ayla", Some(room));
        let watcher = repo.create_character("Bran", Some(room));
        Fixture {
            state: State::new(repo, 10, 1.0),
            room,
            wearer,
            watcher,
        }
    }

    fn garment(f: &mut Fixture, name: &str, clothing_type: ClothingType) -> ObjectId {
        f.state.repository.create_item(
            name,
            ItemKind::Garment(Garment {
                clothing_type,
                worn: Worn::No,
                covered_by: None,
            }),
            Location::Carried(f.wearer),
        )
    }

    fn covered_by(f: &Fixture, id: ObjectId) -> Option<ObjectId> {
        f.state
            .repository
            .item(id)
            .and_then(|i| i.garment())
            .and_then(|g| g.covered_by)
    }

    #[test]
    fn test_wear_and_remove_with_autocover() {
        let mut f = setup();
        let shirt = garment(&mut f, "a linen shirt", ClothingType::Shirt);
        let jacket = garment(&mut f, "a leather jacket", ClothingType::Jacket);

        f.state.wear(f.wearer, shirt, None).unwrap();
        f.state.network.drain_for(f.watcher);
        f.state.wear(f.wearer, jacket, None).unwrap();
        assert_eq!(covered_by(&f, shirt), Some(jacket));
        assert_eq!(
            f.state.network.drain_for(f.watcher),
            vec!["Ayla puts on a leather jacket, covering a linen shirt."]
        );

        assert_eq!(
            f.state.remove(f.wearer, shirt),
            Err(RuleError::CoveredBy("a leather jacket".to_string()))
        );
        assert!(f.state.repository.item(shirt).unwrap().is_worn());

        f.state.remove(f.wearer, jacket).unwrap();
        assert_eq!(covered_by(&f, shirt), None);
        assert_eq!(
            f.state.network.drain_for(f.watcher),
            vec!["Ayla removes a leather jacket, revealing a linen shirt."]
        );
    }

    #[test]
    fn test_autocover_is_not_retroactive() {
        let mut f = setup();
        let shirt = garment(&mut f, "a shirt", ClothingType::Shirt);
        let jacket = garment(&mut f, "a jacket", ClothingType::Jacket);

        f.state.wear(f.wearer, jacket, None).unwrap();
        f.state.wear(f.wearer, shirt, None).unwrap();
        assert_eq!(covered_by(&f, shirt), None);
    }

    #[test]
    fn test_restyling_keeps_existing_coverage() {
        let mut f = setup();
        let jacket = garment(&mut f, "a jacket", ClothingType::Jacket);
        let shirt = garment(&mut f, "a shirt", ClothingType::Shirt);
        f.state.wear(f.wearer, jacket, None).unwrap();
        f.state.wear(f.wearer, shirt, None).unwrap();
        f.state.cover(f.wearer, jacket, shirt).unwrap();
        f.state.network.drain_for(f.watcher);

        f.state.wear(f.wearer, jacket, Some("unbuttoned")).unwrap();
        assert_eq!(covered_by(&f, jacket), Some(shirt));
        assert_eq!(covered_by(&f, shirt), None);
        assert_eq!(
            f.state.network.drain_for(f.watcher),
            vec!["Ayla wears a jacket unbuttoned."]
        );

        f.state.remove(f.wearer, shirt).unwrap();
        f.state.remove(f.wearer, jacket).unwrap();
        assert!(f.state.worn_clothes(f.wearer, false).is_empty());
    }

    #[test]
    fn test_type_limit_rejects_without_wearing() {
        let mut f = setup();
        let first = garment(&mut f, "a straw hat", ClothingType::Hat);
        let second = garment(&mut f, "a felt hat", ClothingType::Hat);

        f.state.wear(f.wearer, first, None).unwrap();
        assert_eq!(
            f.state.wear(f.wearer, second, None),
            Err(RuleError::TypeLimit("hat".to_string()))
        );
        assert!(!f.state.repository.item(second).unwrap().is_worn());
    }

    #[test]
    fn test_overall_limit() {
        let mut f = setup();
        for n in 0..gloaming_core::constants::CLOTHING_OVERALL_LIMIT {
            let ring = garment(&mut f, &format!("ring {}", n), ClothingType::Jewelry);
            f.state.wear(f.wearer, ring, None).unwrap();
        }
        let extra = garment(&mut f, "one ring too many", ClothingType::Jewelry);
        assert_eq!(f.state.wear(f.wearer, extra, None), Err(RuleError::TooManyWorn));
        assert!(!f.state.repository.item(extra).unwrap().is_worn());
    }

    #[test]
    fn test_wear_validation() {
        let mut f = setup();
        let rock = f
            .state
            .repository
            .create_item("a rock", ItemKind::Plain, Location::Carried(f.wearer));
        assert_eq!(
            f.state.wear(f.wearer, rock, None),
            Err(RuleError::NotClothing("a rock".to_string()))
        );

        let hat = garment(&mut f, "a hat", ClothingType::Hat);
        f.state.wear(f.wearer, hat, None).unwrap();
        assert_eq!(
            f.state.wear(f.wearer, hat, None),
            Err(RuleError::AlreadyWearing("a hat".to_string()))
        );
        let long = "x".repeat(WEARSTYLE_MAXLENGTH + 1);
        assert_eq!(
            f.state.wear(f.wearer, hat, Some(&long)),
            Err(RuleError::StyleTooLong(WEARSTYLE_MAXLENGTH))
        );

        f.state.wear(f.wearer, hat, Some("at a jaunty angle")).unwrap();
        assert_eq!(
            f.state.worn_summary(f.wearer),
            "Ayla is wearing a hat at a jaunty angle."
        );

        let floor_hat = f.state.repository.create_item(
            "a cap",
            ItemKind::Plain,
            Location::Room(f.room),
        );
        assert_eq!(
            f.state.wear(f.wearer, floor_hat, None),
            Err(RuleError::NotCarrying("a cap".to_string()))
        );
    }

    #[test]
    fn test_cover_and_uncover_rules() {
        let mut f = setup();
        let shirt = garment(&mut f, "a shirt", ClothingType::Shirt);
        let scarf = garment(&mut f, "a scarf", ClothingType::Accessory);
        let cloak = garment(&mut f, "a cloak", ClothingType::Fullbody);
        let ring = garment(&mut f, "a ring", ClothingType::Jewelry);
        for id in [shirt, scarf, cloak, ring] {
            f.state.wear(f.wearer, id, None).unwrap();
        }
        // The cloak already covered the shirt when it went on.
        assert_eq!(covered_by(&f, shirt), Some(cloak));

        assert_eq!(
            f.state.cover(f.wearer, scarf, ring),
            Err(RuleError::CantCoverWith("a ring".to_string()))
        );
        assert_eq!(
            f.state.cover(f.wearer, shirt, scarf),
            Err(RuleError::AlreadyCovered("a shirt".to_string()))
        );
        assert_eq!(
            f.state.cover(f.wearer, scarf, shirt),
            Err(RuleError::CoveringIsCovered("a shirt".to_string()))
        );

        f.state.cover(f.wearer, cloak, scarf).unwrap();
        assert_eq!(covered_by(&f, cloak), Some(scarf));
        assert_eq!(
            f.state.uncover(f.wearer, shirt),
            Err(RuleError::TooManyLayers("a shirt".to_string()))
        );
        f.state.uncover(f.wearer, cloak).unwrap();
        f.state.uncover(f.wearer, shirt).unwrap();
        assert_eq!(
            f.state.uncover(f.wearer, shirt),
            Err(RuleError::NotCovered("a shirt".to_string()))
        );
        assert_eq!(
            f.state.worn_summary(f.wearer),
            "Ayla is wearing a cloak, a shirt, a scarf and a ring."
        );
    }

    #[test]
    fn test_worn_clothes_ordering_and_exclusion() {
        let mut f = setup();
        let shoes = garment(&mut f, "boots", ClothingType::Shoes);
        let socks = garment(&mut f, "socks", ClothingType::Socks);
        let hat = garment(&mut f, "a hat", ClothingType::Hat);
        f.state.wear(f.wearer, socks, None).unwrap();
        f.state.wear(f.wearer, shoes, None).unwrap();
        f.state.wear(f.wearer, hat, None).unwrap();

        assert_eq!(f.state.worn_clothes(f.wearer, false), vec![hat, socks, shoes]);
        assert_eq!(f.state.worn_clothes(f.wearer, true), vec![hat, shoes]);
    }

    #[test]
    fn test_picking_up_clears_worn_state() {
        let mut f = setup();
        let hat = garment(&mut f, "a hat", ClothingType::Hat);
        f.state.wear(f.wearer, hat, None).unwrap();
        f.state.repository.set_item_location(hat, Location::Room(f.room));

        f.state.move_item(hat, Location::Carried(f.watcher));
        assert!(!f.state.repository.item(hat).unwrap().is_worn());
        assert_eq!(f.state.worn_summary(f.wearer), "Ayla is not wearing anything.");
    }
}
