//! Declarative form structure.
//!
//! A [`FormLayout`] describes the card → set → group → field → input tree
//! plus the navigation controls. It can be deserialized from TOML or JSON or
//! built in code, and [`FormLayout::discover`] flattens it into registries in
//! document order.
use std::{fs, path::Path};

use serde::{Deserialize, Serialize};

use crate::{
    buttons::{Button, ButtonKind},
    error::{Error, Result},
    form::Form,
    item::{Input, Item, ItemId, ParentHierarchy},
    level::Level,
    registry::Registry,
};

/// A navigation control in a layout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ButtonLayout {
    /// Control id.
    pub id: String,
    /// Control kind.
    pub kind: ButtonKind,
}

impl ButtonLayout {
    /// Construct a control.
    pub fn new(id: &str, kind: ButtonKind) -> Self {
        Self {
            id: id.into(),
            kind,
        }
    }
}

/// An input element.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputLayout {
    /// Input id.
    pub id: String,
    /// Takes part in validity gating.
    #[serde(default = "yes")]
    pub included: bool,
    /// Initial validity.
    #[serde(default = "yes")]
    pub valid: bool,
}

/// Serde default for flags that start out true.
fn yes() -> bool {
    true
}

impl InputLayout {
    /// Construct an included, valid input.
    pub fn new(id: &str) -> Self {
        Self {
            id: id.into(),
            included: true,
            valid: true,
        }
    }

    /// Set the initial validity.
    pub fn valid(mut self, valid: bool) -> Self {
        self.valid = valid;
        self
    }

    /// Set whether the input gates navigation.
    pub fn included(mut self, included: bool) -> Self {
        self.included = included;
        self
    }
}

/// A field and its inputs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldLayout {
    /// Field id.
    pub id: String,
    /// Inputs, document order.
    #[serde(default)]
    pub inputs: Vec<InputLayout>,
}

impl FieldLayout {
    /// Construct an empty field.
    pub fn new(id: &str) -> Self {
        Self {
            id: id.into(),
            inputs: Vec::new(),
        }
    }

    /// Append an input.
    pub fn input(mut self, input: InputLayout) -> Self {
        self.inputs.push(input);
        self
    }
}

/// A group and its fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupLayout {
    /// Group id.
    pub id: String,
    /// Fields, document order.
    #[serde(default)]
    pub fields: Vec<FieldLayout>,
}

impl GroupLayout {
    /// Construct an empty group.
    pub fn new(id: &str) -> Self {
        Self {
            id: id.into(),
            fields: Vec::new(),
        }
    }

    /// Append a field.
    pub fn field(mut self, field: FieldLayout) -> Self {
        self.fields.push(field);
        self
    }
}

/// A set, its groups and any controls placed inside it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SetLayout {
    /// Set id.
    pub id: String,
    /// Groups, document order.
    #[serde(default)]
    pub groups: Vec<GroupLayout>,
    /// Controls anchored to this set.
    #[serde(default)]
    pub buttons: Vec<ButtonLayout>,
}

impl SetLayout {
    /// Construct an empty set.
    pub fn new(id: &str) -> Self {
        Self {
            id: id.into(),
            groups: Vec::new(),
            buttons: Vec::new(),
        }
    }

    /// Append a group.
    pub fn group(mut self, group: GroupLayout) -> Self {
        self.groups.push(group);
        self
    }

    /// Append a control.
    pub fn button(mut self, button: ButtonLayout) -> Self {
        self.buttons.push(button);
        self
    }
}

/// A card, its sets and any controls placed directly inside it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardLayout {
    /// Card id.
    pub id: String,
    /// Sets, document order.
    #[serde(default)]
    pub sets: Vec<SetLayout>,
    /// Controls anchored to this card.
    #[serde(default)]
    pub buttons: Vec<ButtonLayout>,
}

impl CardLayout {
    /// Construct an empty card.
    pub fn new(id: &str) -> Self {
        Self {
            id: id.into(),
            sets: Vec::new(),
            buttons: Vec::new(),
        }
    }

    /// Append a set.
    pub fn set(mut self, set: SetLayout) -> Self {
        self.sets.push(set);
        self
    }

    /// Append a control.
    pub fn button(mut self, button: ButtonLayout) -> Self {
        self.buttons.push(button);
        self
    }
}

/// The whole form.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormLayout {
    /// Cards, document order.
    #[serde(default)]
    pub cards: Vec<CardLayout>,
    /// Controls outside every card. They are always active.
    #[serde(default)]
    pub buttons: Vec<ButtonLayout>,
}

impl FormLayout {
    /// Construct an empty layout.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a card.
    pub fn card(mut self, card: CardLayout) -> Self {
        self.cards.push(card);
        self
    }

    /// Append a form-level control.
    pub fn button(mut self, button: ButtonLayout) -> Self {
        self.buttons.push(button);
        self
    }

    /// Parse a TOML layout.
    pub fn from_toml(s: &str) -> Result<Self> {
        Ok(toml::from_str(s)?)
    }

    /// Parse a JSON layout.
    pub fn from_json(s: &str) -> Result<Self> {
        Ok(serde_json::from_str(s)?)
    }

    /// Load a layout from disk. `.json` files are read as JSON, everything
    /// else as TOML.
    pub fn from_path(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("{}: {e}", path.display())))?;
        match path.extension().and_then(|e| e.to_str()) {
            Some("json") => Self::from_json(&text),
            _ => Self::from_toml(&text),
        }
    }

    /// Flatten the layout into a [`Form`] and its controls.
    pub fn discover(&self) -> Result<(Form, Vec<Button>)> {
        let mut d = Discovery::default();
        for card in &self.cards {
            d.card(card)?;
        }
        for b in &self.buttons {
            d.button(b, None)?;
        }
        if d.buttons.is_empty() {
            return Err(Error::Discovery("no navigation controls found".into()));
        }
        tracing::debug!(
            "discovered {} cards, {} sets, {} groups, {} fields, {} inputs, {} buttons",
            d.cards.len(),
            d.sets.len(),
            d.groups.len(),
            d.fields.len(),
            d.inputs.len(),
            d.buttons.len()
        );
        let form = Form::new(
            Registry::new(Level::Card, d.cards)?,
            Registry::new(Level::Set, d.sets)?,
            Registry::new(Level::Group, d.groups)?,
            Registry::new(Level::Field, d.fields)?,
            Registry::new(Level::Input, d.inputs)?,
        )?;
        Ok((form, d.buttons))
    }
}

/// Accumulates items while walking a layout.
#[derive(Default)]
struct Discovery {
    /// Cards found so far.
    cards: Vec<Item>,
    /// Sets found so far.
    sets: Vec<Item>,
    /// Groups found so far.
    groups: Vec<Item>,
    /// Fields found so far.
    fields: Vec<Item>,
    /// Inputs found so far.
    inputs: Vec<Input>,
    /// Controls found so far.
    buttons: Vec<Button>,
}

impl Discovery {
    /// Walk one card.
    fn card(&mut self, card: &CardLayout) -> Result<()> {
        let ci = self.cards.len();
        self.cards
            .push(Item::new(ItemId::new(&card.id)?, ci, ParentHierarchy::default()));
        let at_card = ParentHierarchy::default().with(Level::Card, ci);
        for set in &card.sets {
            let si = self.sets.len();
            self.sets.push(Item::new(ItemId::new(&set.id)?, si, at_card));
            let at_set = at_card.with(Level::Set, si);
            for group in &set.groups {
                self.group(group, at_set)?;
            }
            for b in &set.buttons {
                self.button(b, Some((Level::Set, si)))?;
            }
        }
        for b in &card.buttons {
            self.button(b, Some((Level::Card, ci)))?;
        }
        Ok(())
    }

    /// Walk one group.
    fn group(&mut self, group: &GroupLayout, at_set: ParentHierarchy) -> Result<()> {
        let gi = self.groups.len();
        self.groups
            .push(Item::new(ItemId::new(&group.id)?, gi, at_set));
        let at_group = at_set.with(Level::Group, gi);
        for field in &group.fields {
            let fi = self.fields.len();
            self.fields
                .push(Item::new(ItemId::new(&field.id)?, fi, at_group));
            let at_field = at_group.with(Level::Field, fi);
            for input in &field.inputs {
                let ii = self.inputs.len();
                self.inputs.push(Input::new(
                    ItemId::new(&input.id)?,
                    ii,
                    at_field,
                    input.included,
                    input.valid,
                ));
            }
        }
        Ok(())
    }

    /// Record one control.
    fn button(&mut self, b: &ButtonLayout, anchor: Option<(Level, usize)>) -> Result<()> {
        self.buttons
            .push(Button::new(ItemId::new(&b.id)?, b.kind, anchor));
        Ok(())
    }
}
