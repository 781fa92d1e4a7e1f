use gloaming_core::liquid::{plan_fill, puddle_name, FillPlan};
use gloaming_core::message::Message;
use gloaming_core::types::{Effect, ItemKind, Liquid, Location, ObjectId};
use gloaming_core::RuleError;

use crate::state::State;

impl State {
    /// Moves an item and runs the arrival rules for its new location:
    /// picked-up garments come off, liquids merge with like liquids and take
    /// the name that fits where they now are.
    pub fn move_item(&mut self, item: ObjectId, to: Location) {
        if !self.repository.set_item_location(item, to) {
            log::warn!("move_item: no item {}", item);
            return;
        }

        if matches!(to, Location::Carried(_)) {
            self.at_get(item);
        }

        let is_liquid = self
            .repository
            .item(item)
            .is_some_and(|i| i.liquid().is_some());
        if is_liquid {
            if to.merges_liquids() {
                self.merge_liquids(item);
            }
            self.refresh_liquid_name(item);
        }
    }

    /// The single liquid stack held by a liquid container, if any.
    pub fn liquid_in(&self, container: ObjectId) -> Option<ObjectId> {
        self.repository
            .items_at(Location::Inside(container))
            .into_iter()
            .find(|id| {
                self.repository
                    .item(*id)
                    .is_some_and(|i| i.liquid().is_some())
            })
    }

    /// Absorbs every other stack of the same liquid sharing `item`'s location.
    fn merge_liquids(&mut self, item: ObjectId) {
        let Some((location, name)) = self
            .repository
            .item(item)
            .and_then(|i| i.liquid().map(|l| (i.location, l.original_name.clone())))
        else {
            return;
        };

        let others: Vec<(ObjectId, u32)> = self
            .repository
            .items_at(location)
            .into_iter()
            .filter(|id| *id != item)
            .filter_map(|id| {
                let other = self.repository.item(id)?;
                let liquid = other.liquid()?;
                (liquid.original_name == name).then_some((id, liquid.uses))
            })
            .collect();

        if others.is_empty() {
            return;
        }

        let absorbed: u32 = others.iter().map(|(_, uses)| *uses).sum();
        if let Some(liquid) = self.repository.item_mut(item).and_then(|i| i.liquid_mut()) {
            liquid.uses += absorbed;
        }
        for (id, _) in &others {
            self.repository.delete_item(*id);
        }
        log::debug!(
            "Merged {} stack(s) of {} into {} (+{} units)",
            others.len(),
            name,
            item,
            absorbed
        );
    }

    /// Puddle name while lying in a room, the plain liquid name anywhere else.
    pub(crate) fn refresh_liquid_name(&mut self, item: ObjectId) {
        let Some(record) = self.repository.item_mut(item) else {
            return;
        };
        let location = record.location;
        let Some(liquid) = record.liquid() else {
            return;
        };
        let name = match location {
            Location::Room(_) => puddle_name(&liquid.original_name, liquid.uses),
            _ => liquid.original_name.clone(),
        };
        record.name = name;
    }

    /// Fills a liquid container from a liquid or another liquid container.
    ///
    /// # Arguments
    /// * `actor` - Character doing the filling
    /// * `container` - Liquid container being filled
    /// * `source` - A liquid stack, or a liquid container to pour from
    ///
    /// # Returns
    /// * `Ok(units)` - Units transferred
    pub fn fill(
        &mut self,
        actor: ObjectId,
        container: ObjectId,
        source: ObjectId,
    ) -> Result<u32, RuleError> {
        let target = self
            .repository
            .item(container)
            .ok_or_else(|| RuleError::NotFound(self.repository.name_of(container)))?;
        let container_name = target.name.clone();
        let Some(capacity) = target.liquid_capacity() else {
            return Err(RuleError::NotLiquidContainer(container_name));
        };
        if source == container {
            return Err(RuleError::Usage(format!(
                "You can't fill {} from itself.",
                container_name
            )));
        }

        let source_record = self
            .repository
            .item(source)
            .ok_or_else(|| RuleError::NotFound(self.repository.name_of(source)))?;
        let source_label = source_record.name.clone();
        let stack = match &source_record.kind {
            ItemKind::Liquid(_) => source,
            ItemKind::LiquidContainer(_) => self
                .liquid_in(source)
                .ok_or_else(|| RuleError::SourceEmpty(source_label.clone()))?,
            _ => return Err(RuleError::NotLiquid(source_label)),
        };

        let source_liquid: Liquid = self
            .repository
            .item(stack)
            .and_then(|i| i.liquid())
            .cloned()
            .ok_or_else(|| RuleError::SourceEmpty(source_label.clone()))?;
        let held_id = self.liquid_in(container);
        let held: Option<Liquid> = held_id
            .and_then(|id| self.repository.item(id))
            .and_then(|i| i.liquid())
            .cloned();

        let plan = plan_fill(&container_name, capacity, held.as_ref(), &source_liquid)?;
        log::debug!("fill {} from {}: {:?}", container, stack, plan);

        let moved = match plan {
            FillPlan::TopUp(units) => {
                if let Some(liquid) = held_id
                    .and_then(|id| self.repository.item_mut(id))
                    .and_then(|i| i.liquid_mut())
                {
                    liquid.uses += units;
                }
                self.drain_stack(stack, units);
                units
            }
            FillPlan::Split(units) => {
                self.split_stack(stack, units, Location::Inside(container));
                self.drain_stack(stack, units);
                units
            }
            FillPlan::MoveWhole => {
                self.move_item(stack, Location::Inside(container));
                source_liquid.uses
            }
        };

        self.msg(
            actor,
            format!(
                "You fill {} with {} from {}.",
                container_name, source_liquid.original_name, source_label
            ),
        );
        let message = Message::new()
            .subject(&self.repository.name_of(actor))
            .text(" fills ")
            .object(&container_name)
            .text(" from ")
            .object(&source_label)
            .text(".");
        self.broadcast_around(actor, &message, &[actor]);
        Ok(moved)
    }

    /// Takes `units` from a stack, deleting it when nothing is left.
    fn drain_stack(&mut self, stack: ObjectId, units: u32) {
        let remaining = match self.repository.item_mut(stack).and_then(|i| i.liquid_mut()) {
            Some(liquid) => {
                liquid.uses = liquid.uses.saturating_sub(units);
                liquid.uses
            }
            None => return,
        };
        if remaining == 0 {
            self.repository.delete_item(stack);
        } else {
            self.refresh_liquid_name(stack);
        }
    }

    /// Creates a new stack of `units` copied from `stack` at `to`.
    fn split_stack(&mut self, stack: ObjectId, units: u32, to: Location) -> Option<ObjectId> {
        let template = self.repository.item(stack)?.clone();
        let mut liquid = template.liquid()?.clone();
        liquid.uses = units;

        let name = liquid.original_name.clone();
        let id = self
            .repository
            .create_item(&name, ItemKind::Liquid(liquid), Location::Nowhere);
        if let Some(split) = self.repository.item_mut(id) {
            split.aliases = template.aliases.clone();
            split.description = template.description.clone();
            split.mass = template.mass;
            split.flags = template.flags;
        }
        self.move_item(id, to);
        Some(id)
    }

    /// Pours a liquid container's contents out where the actor stands.
    pub fn dump(&mut self, actor: ObjectId, container: ObjectId) -> Result<(), RuleError> {
        let target = self
            .repository
            .item(container)
            .ok_or_else(|| RuleError::NotFound(self.repository.name_of(container)))?;
        let container_name = target.name.clone();
        if target.liquid_capacity().is_none() {
            return Err(RuleError::NotLiquidContainer(container_name));
        }
        let stack = self
            .liquid_in(container)
            .ok_or_else(|| RuleError::AlreadyEmpty(container_name.clone()))?;
        let room = self
            .repository
            .character(actor)
            .and_then(|c| c.location)
            .ok_or_else(|| RuleError::Usage("You have nowhere to pour it.".to_string()))?;

        let liquid_name = self.repository.name_of(stack);
        self.move_item(stack, Location::Room(room));
        log::debug!("{} dumped {} from {}", actor, stack, container);

        self.msg(
            actor,
            format!("You pour {} out of {}.", liquid_name, container_name),
        );
        let message = Message::new()
            .subject(&self.repository.name_of(actor))
            .text(" pours ")
            .object(&liquid_name)
            .text(" out of ")
            .object(&container_name)
            .text(".");
        self.broadcast(room, &message, &[actor]);
        Ok(())
    }

    /// Drinks one unit from a liquid or a liquid container.
    pub fn drink(&mut self, actor: ObjectId, target: ObjectId) -> Result<(), RuleError> {
        let record = self
            .repository
            .item(target)
            .ok_or_else(|| RuleError::NotFound(self.repository.name_of(target)))?;
        let target_name = record.name.clone();
        let (stack, from) = match &record.kind {
            ItemKind::Liquid(_) => (target, None),
            ItemKind::LiquidContainer(_) => (
                self.liquid_in(target)
                    .ok_or_else(|| RuleError::SourceEmpty(target_name.clone()))?,
                Some(target_name.clone()),
            ),
            _ => return Err(RuleError::NotConsumable(target_name)),
        };
        let liquid_name = self
            .repository
            .item(stack)
            .and_then(|i| i.liquid())
            .map(|l| l.original_name.clone())
            .unwrap_or_else(|| target_name.clone());

        let suffix = from.map(|c| format!(" from {}", c)).unwrap_or_default();
        self.msg(actor, format!("You drink some {}{}.", liquid_name, suffix));
        let message = Message::new()
            .subject(&self.repository.name_of(actor))
            .text(" drinks some ")
            .object(&liquid_name)
            .text(&format!("{}.", suffix));
        self.broadcast_around(actor, &message, &[actor]);

        let effects = self.consume_unit(stack);
        self.apply_effects(actor, &effects);
        Ok(())
    }

    /// Eats or uses one unit of a consumable.
    pub fn consume(&mut self, actor: ObjectId, target: ObjectId, verb: &str) -> Result<(), RuleError> {
        let record = self
            .repository
            .item(target)
            .ok_or_else(|| RuleError::NotFound(self.repository.name_of(target)))?;
        let name = record.name.clone();
        if !matches!(record.kind, ItemKind::Consumable(_)) {
            return Err(RuleError::NotConsumable(name));
        }

        self.msg(actor, format!("You {} {}.", verb, name));
        let message = Message::new()
            .subject(&self.repository.name_of(actor))
            .text(&format!(" {}s ", verb))
            .object(&name)
            .text(".");
        self.broadcast_around(actor, &message, &[actor]);

        let effects = self.consume_unit(target);
        self.apply_effects(actor, &effects);
        Ok(())
    }

    /// Uses up one unit of a liquid or consumable stack and returns its
    /// effects. The stack is deleted when it runs out.
    fn consume_unit(&mut self, stack: ObjectId) -> Vec<Effect> {
        let Some(record) = self.repository.item_mut(stack) else {
            return Vec::new();
        };
        let (remaining, effects) = match &mut record.kind {
            ItemKind::Liquid(liquid) => {
                liquid.uses = liquid.uses.saturating_sub(1);
                (liquid.uses, liquid.effects.clone())
            }
            ItemKind::Consumable(consumable) => {
                consumable.uses = consumable.uses.saturating_sub(1);
                (consumable.uses, consumable.effects.clone())
            }
            _ => return Vec::new(),
        };

        if remaining == 0 {
            log::debug!("{} used up", stack);
            self.repository.delete_item(stack);
        } else {
            self.refresh_liquid_name(stack);
        }
        effects
    }
}
