use std::{borrow::Borrow, fmt, str::FromStr};

use convert_case::{Case, Casing};
use serde::{Deserialize, Serialize};

use crate::{
    error::{Error, Result},
    level::Level,
};

/// Return true if the character is valid in an item id.
pub fn valid_id_char(c: char) -> bool {
    c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_' || c == '-'
}

/// Return true if the full id is valid.
pub fn valid_id(id: &str) -> bool {
    !id.is_empty() && id.chars().all(valid_id_char)
}

/// A stable item identifier: lowercase ASCII alphanumerics, underscores and
/// hyphens.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ItemId {
    /// Stored id string.
    id: String,
}

impl ItemId {
    /// Create a new id, returning an error if the string contains invalid
    /// characters.
    pub fn new(id: &str) -> Result<Self> {
        if !valid_id(id) {
            return Err(Error::Invalid(format!("item id {id:?}")));
        }
        Ok(Self { id: id.to_string() })
    }

    /// Takes a label and munges it into a valid id by converting it to snake
    /// case and dropping every invalid character.
    pub fn convert(label: &str) -> Self {
        let raw = label.to_case(Case::Snake);
        let filtered: String = raw.chars().filter(|x| valid_id_char(*x)).collect();
        let id = if filtered.is_empty() {
            "item".to_string()
        } else {
            filtered
        };
        Self { id }
    }

    /// The id as a string slice.
    pub fn as_str(&self) -> &str {
        &self.id
    }
}

impl FromStr for ItemId {
    type Err = Error;
    fn from_str(s: &str) -> Result<Self> {
        Self::new(s)
    }
}

impl TryFrom<&str> for ItemId {
    type Error = Error;
    fn try_from(id: &str) -> Result<Self> {
        Self::new(id)
    }
}

impl TryFrom<String> for ItemId {
    type Error = Error;
    fn try_from(id: String) -> Result<Self> {
        Self::new(&id)
    }
}

impl From<ItemId> for String {
    fn from(id: ItemId) -> Self {
        id.id
    }
}

impl Borrow<str> for ItemId {
    fn borrow(&self) -> &str {
        &self.id
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.id)
    }
}

impl PartialEq<&str> for ItemId {
    fn eq(&self, other: &&str) -> bool {
        self.id == *other
    }
}

impl PartialEq<str> for ItemId {
    fn eq(&self, other: &str) -> bool {
        self.id == other
    }
}

/// Indices into each ancestor registry, fixed at discovery.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ParentHierarchy {
    /// Index of the enclosing card.
    pub card: Option<usize>,
    /// Index of the enclosing set.
    pub set: Option<usize>,
    /// Index of the enclosing group.
    pub group: Option<usize>,
    /// Index of the enclosing field. Only inputs carry one.
    pub field: Option<usize>,
}

impl ParentHierarchy {
    /// The ancestor index recorded for `level`.
    pub fn index_of(&self, level: Level) -> Option<usize> {
        match level {
            Level::Card => self.card,
            Level::Set => self.set,
            Level::Group => self.group,
            Level::Field => self.field,
            Level::Input => None,
        }
    }

    /// Extend the chain with one more ancestor.
    pub(crate) fn with(mut self, level: Level, index: usize) -> Self {
        match level {
            Level::Card => self.card = Some(index),
            Level::Set => self.set = Some(index),
            Level::Group => self.group = Some(index),
            Level::Field => self.field = Some(index),
            Level::Input => {}
        }
        self
    }
}

/// Mutable activation metadata carried by every item.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ItemState {
    /// The item's ancestor chain is activated down to this level.
    pub active: bool,
    /// The single focused item at this level.
    pub current: bool,
    /// Derived by `rebuild_all`; what a display layer shows.
    pub visible: bool,
}

/// Shared shape of everything a [`Registry`](crate::registry::Registry) holds.
pub trait Entry {
    /// Stable identifier.
    fn id(&self) -> &ItemId;
    /// Document-order position at this level.
    fn index(&self) -> usize;
    /// Write-once ancestor indices.
    fn parents(&self) -> &ParentHierarchy;
    /// Activation metadata.
    fn state(&self) -> &ItemState;
    /// Mutable activation metadata.
    fn state_mut(&mut self) -> &mut ItemState;
}

/// A card, set, group or field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Item {
    /// Stable identifier.
    id: ItemId,
    /// Document-order position at this level.
    index: usize,
    /// Write-once ancestor indices.
    parents: ParentHierarchy,
    /// Activation metadata.
    state: ItemState,
}

impl Item {
    /// Construct an inactive item.
    pub fn new(id: ItemId, index: usize, parents: ParentHierarchy) -> Self {
        Self {
            id,
            index,
            parents,
            state: ItemState::default(),
        }
    }
}

impl Entry for Item {
    fn id(&self) -> &ItemId {
        &self.id
    }
    fn index(&self) -> usize {
        self.index
    }
    fn parents(&self) -> &ParentHierarchy {
        &self.parents
    }
    fn state(&self) -> &ItemState {
        &self.state
    }
    fn state_mut(&mut self) -> &mut ItemState {
        &mut self.state
    }
}

/// A leaf control. Validity and inclusion are owned by external
/// collaborators and only read by navigation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Input {
    /// Stable identifier.
    id: ItemId,
    /// Document-order position.
    index: usize,
    /// Write-once ancestor indices, including the owning field.
    parents: ParentHierarchy,
    /// Activation metadata.
    state: ItemState,
    /// Participates in validation gating.
    included: bool,
    /// Last validation result.
    valid: bool,
}

impl Input {
    /// Construct an inactive input.
    pub fn new(
        id: ItemId,
        index: usize,
        parents: ParentHierarchy,
        included: bool,
        valid: bool,
    ) -> Self {
        Self {
            id,
            index,
            parents,
            state: ItemState::default(),
            included,
            valid,
        }
    }

    /// Does the input take part in validation gating?
    pub fn is_included(&self) -> bool {
        self.included
    }

    /// Last validation result.
    pub fn is_valid(&self) -> bool {
        self.valid
    }

    /// Record a validation result.
    pub(crate) fn set_valid(&mut self, valid: bool) {
        self.valid = valid;
    }

    /// Record a condition outcome.
    pub(crate) fn set_included(&mut self, included: bool) {
        self.included = included;
    }
}

impl Entry for Input {
    fn id(&self) -> &ItemId {
        &self.id
    }
    fn index(&self) -> usize {
        self.index
    }
    fn parents(&self) -> &ParentHierarchy {
        &self.parents
    }
    fn state(&self) -> &ItemState {
        &self.state
    }
    fn state_mut(&mut self) -> &mut ItemState {
        &mut self.state
    }
}
