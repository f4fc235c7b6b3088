//! Ordered per-level item stores.
//!
//! A [`Registry`] holds every item of one hierarchy level in document order
//! along with its activation flags. Registries never create or remove items
//! after discovery; navigation only toggles `active` and `current`.
use std::collections::HashMap;

use serde::Serialize;

use crate::{
    error::{Error, Result},
    item::{Entry, Input, ItemId, ItemState, ParentHierarchy},
    level::{Direction, Level},
};

/// Addresses one item in a registry, by position or by id.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Selector<'a> {
    /// Document-order position.
    Index(usize),
    /// Item id.
    Id(&'a str),
}

impl From<usize> for Selector<'_> {
    fn from(index: usize) -> Self {
        Self::Index(index)
    }
}

impl<'a> From<&'a str> for Selector<'a> {
    fn from(id: &'a str) -> Self {
        Self::Id(id)
    }
}

impl<'a> From<&'a ItemId> for Selector<'a> {
    fn from(id: &'a ItemId) -> Self {
        Self::Id(id.as_str())
    }
}

/// Published view of one item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ItemSnapshot {
    /// Item id.
    pub id: ItemId,
    /// Document-order position.
    pub index: usize,
    /// Flags at the time of the snapshot.
    pub state: ItemState,
}

/// The computed state of a whole level, not yet committed anywhere.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LevelPatch {
    /// Level the patch describes.
    pub level: Level,
    /// One snapshot per item, document order.
    pub items: Vec<ItemSnapshot>,
}

impl LevelPatch {
    /// Ids of the items flagged current.
    pub fn current(&self) -> Option<&ItemId> {
        self.items
            .iter()
            .find(|i| i.state.current)
            .map(|i| &i.id)
    }
}

/// An ordered store of the items at one level.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Registry<T> {
    /// Level served by this registry.
    level: Level,
    /// Items in document order.
    items: Vec<T>,
    /// Id to position lookup.
    by_id: HashMap<ItemId, usize>,
}

impl<T: Entry> Registry<T> {
    /// Build a registry from items in document order. Each item's index must
    /// equal its position and ids must be unique.
    pub fn new(level: Level, items: Vec<T>) -> Result<Self> {
        let mut by_id = HashMap::with_capacity(items.len());
        for (pos, item) in items.iter().enumerate() {
            if item.index() != pos {
                return Err(Error::Discovery(format!(
                    "{level} {} has index {} at position {pos}",
                    item.id(),
                    item.index()
                )));
            }
            if by_id.insert(item.id().clone(), pos).is_some() {
                return Err(Error::Discovery(format!(
                    "duplicate {level} id: {}",
                    item.id()
                )));
            }
        }
        Ok(Self {
            level,
            items,
            by_id,
        })
    }

    /// Level served by this registry.
    pub fn level(&self) -> Level {
        self.level
    }

    /// Number of items.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Does the registry hold no items?
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Iterate over all items in document order.
    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.items.iter()
    }

    /// The item at `index`, if any.
    pub fn get(&self, index: usize) -> Option<&T> {
        self.items.get(index)
    }

    /// The item with `id`, if any.
    pub fn get_by_id(&self, id: &str) -> Option<&T> {
        self.by_id.get(id).and_then(|pos| self.items.get(*pos))
    }

    /// Resolve a selector to a position, failing if it addresses nothing.
    pub fn resolve(&self, sel: Selector<'_>) -> Result<usize> {
        match sel {
            Selector::Index(index) if index < self.items.len() => Ok(index),
            Selector::Index(index) => Err(Error::IndexOutOfRange {
                level: self.level,
                index,
                len: self.items.len(),
            }),
            Selector::Id(id) => self.by_id.get(id).copied().ok_or(Error::UnknownItem {
                level: self.level,
                id: id.to_string(),
            }),
        }
    }

    /// Mutable access to a selected item.
    fn item_mut(&mut self, sel: Selector<'_>) -> Result<&mut T> {
        let pos = self.resolve(sel)?;
        Ok(&mut self.items[pos])
    }

    /// The current item, if any.
    pub fn current(&self) -> Option<&T> {
        self.items.iter().find(|i| i.state().current)
    }

    /// Position of the current item, if any.
    pub fn current_index(&self) -> Option<usize> {
        self.current().map(Entry::index)
    }

    /// Position after the current item. `None` at the end, or when nothing
    /// is current.
    pub fn next_position(&self) -> Option<usize> {
        let next = self.current_index()? + 1;
        (next < self.items.len()).then_some(next)
    }

    /// Position before the current item. `None` at the start, or when
    /// nothing is current.
    pub fn prev_position(&self) -> Option<usize> {
        self.current_index()?.checked_sub(1)
    }

    /// Neighbouring position in `dir`.
    pub fn position(&self, dir: Direction) -> Option<usize> {
        match dir {
            Direction::Next => self.next_position(),
            Direction::Prev => self.prev_position(),
        }
    }

    /// Drop `active` and `current` from every item.
    pub fn clear_active_and_current(&mut self) {
        for item in &mut self.items {
            let state = item.state_mut();
            state.active = false;
            state.current = false;
        }
    }

    /// Mark one item active. Other items are left alone.
    pub fn set_active<'a>(&mut self, sel: impl Into<Selector<'a>>) -> Result<()> {
        self.item_mut(sel.into())?.state_mut().active = true;
        Ok(())
    }

    /// Mark one item current, and therefore active. Other items are left
    /// alone.
    pub fn set_current<'a>(&mut self, sel: impl Into<Selector<'a>>) -> Result<()> {
        let state = self.item_mut(sel.into())?.state_mut();
        state.active = true;
        state.current = true;
        Ok(())
    }

    /// Mark every child of the given parent active, and optionally the first
    /// of them current. Returns the number of children found.
    pub fn set_active_by_parent(
        &mut self,
        parent_level: Level,
        parent_index: usize,
        first_is_current: bool,
    ) -> usize {
        let mut count = 0;
        for item in &mut self.items {
            if item.parents().index_of(parent_level) != Some(parent_index) {
                continue;
            }
            let state = item.state_mut();
            state.active = true;
            if first_is_current && count == 0 {
                state.current = true;
            }
            count += 1;
        }
        count
    }

    /// The active run, document order.
    pub fn active(&self) -> Vec<&T> {
        self.filter(|i| i.state().active)
    }

    /// Items matching `pred`, document order.
    pub fn filter(&self, pred: impl Fn(&T) -> bool) -> Vec<&T> {
        self.items.iter().filter(|i| pred(i)).collect()
    }

    /// Recompute derived per-item fields.
    pub fn rebuild_all(&mut self) {
        for item in &mut self.items {
            let state = item.state_mut();
            state.visible = state.active;
        }
    }

    /// Snapshot the level without committing it.
    pub fn calculate_states(&self) -> LevelPatch {
        LevelPatch {
            level: self.level,
            items: self
                .items
                .iter()
                .map(|i| ItemSnapshot {
                    id: i.id().clone(),
                    index: i.index(),
                    state: *i.state(),
                })
                .collect(),
        }
    }
}

impl Registry<Input> {
    /// Record a validation result. Returns true if the value changed.
    pub fn set_valid<'a>(&mut self, sel: impl Into<Selector<'a>>, valid: bool) -> Result<bool> {
        let input = self.item_mut(sel.into())?;
        let changed = input.is_valid() != valid;
        input.set_valid(valid);
        Ok(changed)
    }

    /// Record whether an input takes part in gating. Returns true if the
    /// value changed.
    pub fn set_included<'a>(
        &mut self,
        sel: impl Into<Selector<'a>>,
        included: bool,
    ) -> Result<bool> {
        let input = self.item_mut(sel.into())?;
        let changed = input.is_included() != included;
        input.set_included(included);
        Ok(changed)
    }
}

/// Level-agnostic access to a registry, so the navigator can walk the
/// hierarchy without knowing each level's item type.
pub trait LevelRegistry {
    /// Level served by this registry.
    fn level(&self) -> Level;
    /// Number of items.
    fn len(&self) -> usize;
    /// Does the registry hold no items?
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
    /// Id of the item at `index`.
    fn id_at(&self, index: usize) -> Option<&ItemId>;
    /// Ancestor indices of the item at `index`.
    fn parents_at(&self, index: usize) -> Option<ParentHierarchy>;
    /// Flags of the item at `index`.
    fn state_at(&self, index: usize) -> Option<ItemState>;
    /// Position of the current item.
    fn current_index(&self) -> Option<usize>;
    /// Neighbouring position of the current item in `dir`.
    fn position(&self, dir: Direction) -> Option<usize>;
    /// Positions of all active items.
    fn active_indices(&self) -> Vec<usize>;
    /// Drop `active` and `current` everywhere.
    fn clear_active_and_current(&mut self);
    /// Mark one item active.
    fn set_active(&mut self, sel: Selector<'_>) -> Result<()>;
    /// Mark one item current and active.
    fn set_current(&mut self, sel: Selector<'_>) -> Result<()>;
    /// Activate the children of a parent.
    fn set_active_by_parent(
        &mut self,
        parent_level: Level,
        parent_index: usize,
        first_is_current: bool,
    ) -> usize;
    /// Recompute derived fields.
    fn rebuild_all(&mut self);
    /// Snapshot without committing.
    fn calculate_states(&self) -> LevelPatch;
}

impl<T: Entry> LevelRegistry for Registry<T> {
    fn level(&self) -> Level {
        self.level
    }

    fn len(&self) -> usize {
        self.items.len()
    }

    fn id_at(&self, index: usize) -> Option<&ItemId> {
        self.get(index).map(Entry::id)
    }

    fn parents_at(&self, index: usize) -> Option<ParentHierarchy> {
        self.get(index).map(|i| *i.parents())
    }

    fn state_at(&self, index: usize) -> Option<ItemState> {
        self.get(index).map(|i| *i.state())
    }

    fn current_index(&self) -> Option<usize> {
        Self::current_index(self)
    }

    fn position(&self, dir: Direction) -> Option<usize> {
        Self::position(self, dir)
    }

    fn active_indices(&self) -> Vec<usize> {
        self.active().into_iter().map(Entry::index).collect()
    }

    fn clear_active_and_current(&mut self) {
        Self::clear_active_and_current(self);
    }

    fn set_active(&mut self, sel: Selector<'_>) -> Result<()> {
        Self::set_active(self, sel)
    }

    fn set_current(&mut self, sel: Selector<'_>) -> Result<()> {
        Self::set_current(self, sel)
    }

    fn set_active_by_parent(
        &mut self,
        parent_level: Level,
        parent_index: usize,
        first_is_current: bool,
    ) -> usize {
        Self::set_active_by_parent(self, parent_level, parent_index, first_is_current)
    }

    fn rebuild_all(&mut self) {
        Self::rebuild_all(self);
    }

    fn calculate_states(&self) -> LevelPatch {
        Self::calculate_states(self)
    }
}
