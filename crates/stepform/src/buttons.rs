//! Navigation controls and their derived enablement.
//!
//! Controls are discovered once. On every navigation, validity or condition
//! change the synchronizer recomputes each control's flags from the form,
//! then a separate binding pass attaches click handling only to controls a
//! user can currently reach.
use std::{collections::HashSet, fmt};

use serde::{Deserialize, Serialize};

use crate::{
    error::{Error, Result},
    form::Form,
    item::ItemId,
    level::{Level, MoveRequest},
    validation::all_active_included_inputs_valid,
};

/// What a control asks for when clicked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ButtonKind {
    /// Step back.
    Prev,
    /// Step forward.
    Next,
    /// Submit the form.
    Submit,
}

impl ButtonKind {
    /// The navigation request this control raises.
    pub fn request(self) -> MoveRequest {
        match self {
            Self::Prev => MoveRequest::Prev,
            Self::Next => MoveRequest::Next,
            Self::Submit => MoveRequest::Submit,
        }
    }
}

/// One navigation control.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Button {
    /// Control id.
    id: ItemId,
    /// Control kind.
    kind: ButtonKind,
    /// Nearest enclosing set or card, if any.
    anchor: Option<(Level, usize)>,
    /// Mirrors the anchor's active flag.
    active: bool,
    /// Always true for now.
    visible: bool,
    /// Derived from `active`, `visible` and input validity.
    disabled: bool,
    /// Click handling is attached.
    bound: bool,
}

impl Button {
    /// A freshly discovered control. Until the first sync it is treated as
    /// active, visible and enabled, but unbound.
    pub fn new(id: ItemId, kind: ButtonKind, anchor: Option<(Level, usize)>) -> Self {
        Self {
            id,
            kind,
            anchor,
            active: true,
            visible: true,
            disabled: false,
            bound: false,
        }
    }

    /// Control id.
    pub fn id(&self) -> &ItemId {
        &self.id
    }

    /// Control kind.
    pub fn kind(&self) -> ButtonKind {
        self.kind
    }

    /// Nearest enclosing set or card.
    pub fn anchor(&self) -> Option<(Level, usize)> {
        self.anchor
    }

    /// Is the anchor active?
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Is the control shown?
    pub fn is_visible(&self) -> bool {
        self.visible
    }

    /// Is the control disabled?
    pub fn is_disabled(&self) -> bool {
        self.disabled
    }

    /// Is click handling attached?
    pub fn is_bound(&self) -> bool {
        self.bound
    }
}

/// A change to a control's click handling.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Binding {
    /// Handling attached.
    Attach(ItemId),
    /// Handling removed.
    Detach(ItemId),
}

impl fmt::Display for Binding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Attach(id) => write!(f, "attach {id}"),
            Self::Detach(id) => write!(f, "detach {id}"),
        }
    }
}

/// Result of clicking a control.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Click {
    /// The control raised a request.
    Request(MoveRequest),
    /// The control is bound but disabled; nothing happens.
    Disabled,
    /// The control has no click handling attached.
    Unbound,
}

/// Owns the form's navigation controls and keeps them in step with the
/// registries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ButtonSync {
    /// Controls in document order.
    buttons: Vec<Button>,
}

impl ButtonSync {
    /// Take ownership of the discovered controls. A form without controls
    /// cannot be navigated by pointer and is rejected.
    pub fn new(buttons: Vec<Button>) -> Result<Self> {
        if buttons.is_empty() {
            return Err(Error::Discovery("no navigation controls found".into()));
        }
        let mut seen = HashSet::new();
        for b in &buttons {
            if !seen.insert(b.id.clone()) {
                return Err(Error::Discovery(format!("duplicate button id: {}", b.id)));
            }
        }
        Ok(Self { buttons })
    }

    /// All controls, document order.
    pub fn buttons(&self) -> &[Button] {
        &self.buttons
    }

    /// The control with `id`.
    pub fn get(&self, id: &str) -> Option<&Button> {
        self.buttons.iter().find(|b| b.id == *id)
    }

    /// Recompute `active`, `visible` and `disabled` for every control.
    pub fn recompute(&mut self, form: &Form) {
        let valid = all_active_included_inputs_valid(form.inputs());
        for b in &mut self.buttons {
            b.active = match b.anchor {
                None => true,
                Some((level, index)) => form
                    .registry(level)
                    .state_at(index)
                    .is_some_and(|s| s.active),
            };
            b.visible = true;
            let reachable = b.active && b.visible;
            let enabled = match b.kind {
                ButtonKind::Prev => reachable,
                ButtonKind::Next | ButtonKind::Submit => reachable && valid,
            };
            b.disabled = !enabled;
        }
    }

    /// Attach click handling to reachable controls and detach it from the
    /// rest. Returns only the changes.
    pub fn bind(&mut self) -> Vec<Binding> {
        let mut changes = Vec::new();
        for b in &mut self.buttons {
            let want = b.active && b.visible;
            if want && !b.bound {
                b.bound = true;
                changes.push(Binding::Attach(b.id.clone()));
            } else if !want && b.bound {
                b.bound = false;
                changes.push(Binding::Detach(b.id.clone()));
            }
        }
        changes
    }

    /// Recompute then rebind.
    pub fn sync(&mut self, form: &Form) -> Vec<Binding> {
        self.recompute(form);
        let changes = self.bind();
        tracing::debug!(
            "buttons synced: {} enabled, {} binding changes",
            self.buttons.iter().filter(|b| !b.disabled).count(),
            changes.len()
        );
        changes
    }

    /// Decide what a confirmation key should ask for. An active next control
    /// wins, then an active submit control; with neither, the answer falls
    /// back to next.
    pub fn determine_next_or_submit(&self) -> MoveRequest {
        let active = |kind| self.buttons.iter().any(|b| b.kind == kind && b.active);
        if active(ButtonKind::Next) {
            MoveRequest::Next
        } else if active(ButtonKind::Submit) {
            MoveRequest::Submit
        } else {
            MoveRequest::Next
        }
    }

    /// Resolve a click on a control.
    pub fn click(&self, id: &str) -> Result<Click> {
        let b = self
            .get(id)
            .ok_or_else(|| Error::Invalid(format!("unknown button: {id}")))?;
        Ok(if !b.bound {
            Click::Unbound
        } else if b.disabled {
            Click::Disabled
        } else {
            Click::Request(b.kind.request())
        })
    }
}
