use gloaming_core::types::{ItemKind, Location, ObjectId};
use gloaming_core::RuleError;

use crate::state::State;

impl State {
    /// Mass of an item plus everything inside it.
    ///
    /// Children are summed recursively and multiplied by `modifier`; a
    /// container always uses its own mass reduction as the modifier for its
    /// contents.
    ///
    /// # Arguments
    /// * `item` - Item to weigh
    /// * `modifier` - Multiplier for the contents of a non-container
    pub fn get_mass(&self, item: ObjectId, modifier: f64) -> f64 {
        let Some(record) = self.repository.item(item) else {
            return 0.0;
        };
        let modifier = match &record.kind {
            ItemKind::Container(container) => container.mass_reduction,
            _ => modifier,
        };
        let children: f64 = self
            .repository
            .items_at(Location::Inside(item))
            .into_iter()
            .map(|child| self.get_mass(child, 1.0))
            .sum();
        record.own_mass() + children * modifier
    }

    /// Reduced mass of a container's direct contents, as counted against its
    /// capacity.
    pub fn get_contents_mass(&self, container: ObjectId) -> f64 {
        let reduction = self
            .repository
            .item(container)
            .and_then(|c| c.container())
            .map_or(1.0, |c| c.mass_reduction);
        self.repository
            .items_at(Location::Inside(container))
            .into_iter()
            .map(|child| self.get_mass(child, 1.0) * reduction)
            .sum()
    }

    /// Total mass a character carries.
    pub fn carried_mass(&self, character: ObjectId) -> f64 {
        self.repository
            .items_at(Location::Carried(character))
            .into_iter()
            .map(|id| self.get_mass(id, 1.0))
            .sum()
    }

    /// Checks that `item` may go into `container` without exceeding its
    /// capacity. Equality with the free space is allowed.
    pub fn check_fits(&self, item: ObjectId, container: ObjectId) -> Result<(), RuleError> {
        let item_name = self.repository.name_of(item);
        let target = self
            .repository
            .item(container)
            .ok_or_else(|| RuleError::NotFound(self.repository.name_of(container)))?;
        let Some(spec) = target.container() else {
            return Err(RuleError::NotContainer(target.name.clone()));
        };
        if self.repository.is_within(container, item) {
            return Err(RuleError::IntoItself);
        }

        let obj_mass = self.get_mass(item, 1.0) * spec.mass_reduction;
        let free = spec.capacity - self.get_contents_mass(container);
        if obj_mass > free {
            log::debug!(
                "{} ({:.2}) does not fit in {} ({:.2} free)",
                item,
                obj_mass,
                container,
                free
            );
            return Err(RuleError::OverCapacity {
                item: item_name,
                container: target.name.clone(),
            });
        }
        Ok(())
    }

    /// Capacity-checked move into a container. Nothing moves when the check
    /// fails.
    pub fn insert_into(&mut self, item: ObjectId, container: ObjectId) -> Result<(), RuleError> {
        self.check_fits(item, container)?;
        self.move_item(item, Location::Inside(container));
        Ok(())
    }
}
