//! Hierarchy levels, step modes and travel directions.
use std::{fmt, str::FromStr};

use convert_case::{Case, Casing};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// A level of the form hierarchy, outermost first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    /// Top-level page of the form.
    Card,
    /// Section within a card.
    Set,
    /// Cluster of related fields within a set.
    Group,
    /// A single question.
    Field,
    /// A control belonging to a field. Inputs are never a step target.
    Input,
}

impl Level {
    /// All levels, outermost first.
    pub const ALL: [Self; 5] = [Self::Card, Self::Set, Self::Group, Self::Field, Self::Input];

    /// Position of the level in [`Level::ALL`].
    pub fn depth(self) -> usize {
        match self {
            Self::Card => 0,
            Self::Set => 1,
            Self::Group => 2,
            Self::Field => 3,
            Self::Input => 4,
        }
    }

    /// The enclosing level, if any.
    pub fn parent(self) -> Option<Self> {
        self.depth().checked_sub(1).map(|d| Self::ALL[d])
    }

    /// The directly nested level, if any.
    pub fn child(self) -> Option<Self> {
        Self::ALL.get(self.depth() + 1).copied()
    }

    /// Levels strictly below this one, outermost first.
    pub fn descendants(self) -> impl Iterator<Item = Self> {
        Self::ALL.into_iter().skip(self.depth() + 1)
    }

    /// Levels strictly above this one, innermost first.
    pub fn ancestors(self) -> impl Iterator<Item = Self> {
        Self::ALL.into_iter().take(self.depth()).rev()
    }

    /// Lowercase level name.
    pub fn name(self) -> &'static str {
        match self {
            Self::Card => "card",
            Self::Set => "set",
            Self::Group => "group",
            Self::Field => "field",
            Self::Input => "input",
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Direction of travel through the form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    /// Towards the start of the form.
    Prev,
    /// Towards the end of the form.
    Next,
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Prev => "prev",
            Self::Next => "next",
        })
    }
}

/// A navigation request as carried by a `navigation-request` event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MoveRequest {
    /// Step backwards. Never gated by validity.
    Prev,
    /// Step forwards.
    Next,
    /// Step forwards at card granularity.
    Submit,
}

impl MoveRequest {
    /// The direction of travel this request implies.
    pub fn direction(self) -> Direction {
        match self {
            Self::Prev => Direction::Prev,
            Self::Next | Self::Submit => Direction::Next,
        }
    }

    /// Does this request require the active inputs to be valid?
    pub fn is_gated(self) -> bool {
        !matches!(self, Self::Prev)
    }
}

impl fmt::Display for MoveRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Prev => "prev",
            Self::Next => "next",
            Self::Submit => "submit",
        })
    }
}

/// Navigation granularity.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum StepMode {
    /// One field per step.
    Field,
    /// One group per step.
    Group,
    /// One set per step.
    Set,
    /// One card per step.
    #[default]
    Card,
}

impl StepMode {
    /// The registry level a step moves within before falling back.
    pub fn level(self) -> Level {
        match self {
            Self::Field => Level::Field,
            Self::Group => Level::Group,
            Self::Set => Level::Set,
            Self::Card => Level::Card,
        }
    }

    /// The next coarser step mode, or `None` for card mode.
    pub fn coarser(self) -> Option<Self> {
        match self {
            Self::Field => Some(Self::Group),
            Self::Group => Some(Self::Set),
            Self::Set => Some(Self::Card),
            Self::Card => None,
        }
    }
}

/// Accepts bare tags (`field`) and behaviour-style tags (`byField`,
/// `by_field`, `BY-FIELD`).
impl FromStr for StepMode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let norm = s.trim().to_case(Case::Snake);
        let tag = norm.strip_prefix("by_").unwrap_or(&norm);
        match tag {
            "field" => Ok(Self::Field),
            "group" => Ok(Self::Group),
            "set" => Ok(Self::Set),
            "card" => Ok(Self::Card),
            _ => Err(Error::UnknownStepMode(s.to_string())),
        }
    }
}

impl TryFrom<String> for StepMode {
    type Error = Error;

    fn try_from(s: String) -> Result<Self> {
        s.parse()
    }
}

impl From<StepMode> for String {
    fn from(mode: StepMode) -> Self {
        mode.level().name().to_string()
    }
}

impl fmt::Display for StepMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.level().name())
    }
}
