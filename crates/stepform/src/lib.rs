#![allow(clippy::new_without_default)]
//! Hierarchical step navigation for multi-step forms.
//!
//! A form is a tree of cards, sets, groups, fields and inputs. Each level has
//! an ordered registry of items carrying `active` and `current` flags; the
//! [`navigator::Navigator`] moves the form one step at a time, at a
//! configurable granularity, keeping exactly one current item per level and
//! gating forward motion on input validity. A [`controller::Controller`]
//! wraps one form instance with its navigation controls and an event queue.

// Core modules
pub mod buttons;
pub mod config;
pub mod controller;
/// Error and result types.
pub mod error;
pub mod event;
/// A form's registries and its committed state.
pub mod form;
/// Items, ids and parent pointers.
pub mod item;
pub mod layout;
pub mod level;
pub mod navigator;
pub mod position;
pub mod registry;
pub mod trigger;
pub mod tutils;
pub mod validation;

// Public exports
pub use buttons::{Binding, Button, ButtonKind, ButtonSync};
pub use config::Config;
pub use controller::Controller;
pub use error::{Error, Result};
pub use event::{DenyReason, Event, EventQueue};
pub use form::{Form, FormState};
pub use item::{Entry, Input, Item, ItemId};
pub use layout::FormLayout;
pub use level::{Direction, Level, MoveRequest, StepMode};
pub use navigator::{MoveOutcome, Navigator};
pub use position::Position;
pub use registry::{LevelRegistry, Registry, Selector};
pub use trigger::{Focus, KeyPress, KeyTrigger};
