//! Events flowing into and out of a form controller.
use std::{collections::VecDeque, fmt};

use crate::{
    buttons::Binding,
    item::ItemId,
    level::{Level, MoveRequest},
    trigger::KeyPress,
};

/// Keyboard input.
pub mod key;

/// Why a navigation request was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DenyReason {
    /// An active, included input is invalid.
    Invalid,
    /// Navigation is switched off for this form.
    Disabled,
    /// The request came from a control that is not currently bound.
    Hidden,
    /// A required value is missing. Raised by host validators; the core's
    /// own gate reports [`DenyReason::Invalid`].
    Required,
}

impl fmt::Display for DenyReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Invalid => "invalid",
            Self::Disabled => "disabled",
            Self::Hidden => "hidden",
            Self::Required => "required",
        })
    }
}

/// Every event a controller consumes or emits.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// Move one step.
    NavigationRequest(MoveRequest),
    /// Submit the form; handled as a card-level next.
    SubmitRequested,
    /// An input's validity changed.
    InputChanged(ItemId),
    /// Conditional logic re-evaluated inclusion flags.
    ConditionEvaluated,
    /// A key was pressed.
    Key(KeyPress),
    /// A navigation control was clicked.
    ButtonClicked(ItemId),

    /// A move was committed; `target` is the level it resolved at.
    NavigationChanged {
        /// Level the move resolved at.
        target: Level,
    },
    /// A request was refused without touching any state.
    NavigationDenied {
        /// Why.
        reason: DenyReason,
    },
    /// The end of the card sequence was reached by a submit; the host should
    /// submit the form.
    SubmitRequest,
    /// A control's click handling was attached or detached.
    Binding(Binding),
}

impl Event {
    /// Events that a controller publishes to observers.
    pub fn is_outbound(&self) -> bool {
        matches!(
            self,
            Self::NavigationChanged { .. }
                | Self::NavigationDenied { .. }
                | Self::SubmitRequest
                | Self::Binding(_)
        )
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NavigationRequest(r) => write!(f, "navigation-request {r}"),
            Self::SubmitRequested => f.write_str("submit-requested"),
            Self::InputChanged(id) => write!(f, "input-changed {id}"),
            Self::ConditionEvaluated => f.write_str("condition-evaluated"),
            Self::Key(k) => write!(f, "key {}", k.key),
            Self::ButtonClicked(id) => write!(f, "button-clicked {id}"),
            Self::NavigationChanged { target } => write!(f, "navigation-changed {target}"),
            Self::NavigationDenied { reason } => write!(f, "navigation-denied {reason}"),
            Self::SubmitRequest => f.write_str("submit-request"),
            Self::Binding(b) => write!(f, "{b}"),
        }
    }
}

/// FIFO of events awaiting handling. Events raised while one is being
/// handled queue behind it.
#[derive(Debug, Default)]
pub struct EventQueue {
    /// Pending events, oldest first.
    pending: VecDeque<Event>,
}

impl EventQueue {
    /// Construct an empty queue.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an event.
    pub fn push(&mut self, event: Event) {
        self.pending.push_back(event);
    }

    /// Take the oldest event.
    pub fn pop(&mut self) -> Option<Event> {
        self.pending.pop_front()
    }

    /// Drop every pending event.
    pub fn clear(&mut self) {
        self.pending.clear();
    }

    /// Number of pending events.
    pub fn len(&self) -> usize {
        self.pending.len()
    }

    /// Is the queue empty?
    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Iterate over pending events without removing them.
    pub fn iter(&self) -> impl Iterator<Item = &Event> {
        self.pending.iter()
    }
}
