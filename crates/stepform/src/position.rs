//! The form position as a value.
//!
//! A [`Position`] records the current index at every level. The navigator
//! projects the position a move must produce before touching any flags, then
//! checks the registries against it once the cascade has run.
use std::fmt;

use serde::Serialize;

use crate::{
    error::{Error, Result},
    form::Form,
    level::Level,
    registry::LevelRegistry,
};

/// Current index per level. `None` where a level has nothing current.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Position {
    /// Current card.
    pub card: Option<usize>,
    /// Current set.
    pub set: Option<usize>,
    /// Current group.
    pub group: Option<usize>,
    /// Current field.
    pub field: Option<usize>,
    /// Current input.
    pub input: Option<usize>,
}

impl Position {
    /// Read the position off the registries.
    pub fn of(form: &Form) -> Self {
        let mut pos = Self::default();
        for level in Level::ALL {
            pos.set(level, form.registry(level).current_index());
        }
        pos
    }

    /// The component for `level`.
    pub fn get(&self, level: Level) -> Option<usize> {
        match level {
            Level::Card => self.card,
            Level::Set => self.set,
            Level::Group => self.group,
            Level::Field => self.field,
            Level::Input => self.input,
        }
    }

    /// Replace the component for `level`.
    pub fn set(&mut self, level: Level, index: Option<usize>) {
        let slot = match level {
            Level::Card => &mut self.card,
            Level::Set => &mut self.set,
            Level::Group => &mut self.group,
            Level::Field => &mut self.field,
            Level::Input => &mut self.input,
        };
        *slot = index;
    }

    /// The position that landing on `index` at `level` produces: ancestors
    /// from the item's parent pointers, and below it the first-child chain.
    pub fn project(form: &Form, level: Level, index: usize) -> Result<Self> {
        let reg = form.registry(level);
        let parents = reg.parents_at(index).ok_or(Error::IndexOutOfRange {
            level,
            index,
            len: reg.len(),
        })?;

        let mut pos = Self::default();
        for ancestor in level.ancestors() {
            pos.set(ancestor, parents.index_of(ancestor));
        }
        pos.set(level, Some(index));

        let mut anchor = (level, index);
        for below in level.descendants() {
            if below == Level::Input {
                pos.input = pos
                    .field
                    .and_then(|f| first_child(form.registry(Level::Input), Level::Field, f));
                break;
            }
            if let Some(child) = first_child(form.registry(below), anchor.0, anchor.1) {
                pos.set(below, Some(child));
                anchor = (below, child);
            }
        }
        Ok(pos)
    }
}

/// First item in `reg` whose ancestor at `parent_level` is `parent_index`.
pub(crate) fn first_child(
    reg: &dyn LevelRegistry,
    parent_level: Level,
    parent_index: usize,
) -> Option<usize> {
    (0..reg.len()).find(|i| {
        reg.parents_at(*i)
            .and_then(|p| p.index_of(parent_level))
            == Some(parent_index)
    })
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = Level::ALL
            .iter()
            .map(|l| match self.get(*l) {
                Some(i) => format!("{l}={i}"),
                None => format!("{l}=-"),
            })
            .collect();
        write!(f, "{}", parts.join(" "))
    }
}
