//! Keyboard confirmation.
//!
//! Pressing the confirm key (Enter by default) while the form or one of its
//! inputs has focus advances the form, or submits it when the only reachable
//! forward control is a submit button. Keys aimed at buttons or at anything
//! outside the form are left alone.
use crate::{
    buttons::ButtonSync,
    error::{Error, Result},
    event::{
        Event,
        key::{Key, KeyCode},
    },
    level::MoveRequest,
};

/// Where keyboard focus was when a key was pressed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Focus {
    /// The form root itself.
    Root,
    /// An input inside the form.
    Input,
    /// A button or button-like element inside the form.
    Button,
    /// Anything outside the form.
    Outside,
}

/// A key press together with its focus.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct KeyPress {
    /// The key.
    pub key: Key,
    /// Focus at the time of the press.
    pub focus: Focus,
}

impl KeyPress {
    /// Construct a key press.
    pub fn new(key: impl Into<Key>, focus: Focus) -> Self {
        Self {
            key: key.into(),
            focus,
        }
    }
}

/// Maps confirm-key presses to navigation events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyTrigger {
    /// The key that triggers.
    confirm: Key,
}

impl Default for KeyTrigger {
    fn default() -> Self {
        Self {
            confirm: KeyCode::Enter.into(),
        }
    }
}

impl KeyTrigger {
    /// Trigger on `confirm`, which must be a bare key.
    pub fn new(confirm: Key) -> Result<Self> {
        if confirm.mods.any() {
            return Err(Error::Config(format!(
                "confirm key {confirm} must not carry modifiers"
            )));
        }
        Ok(Self { confirm })
    }

    /// The confirm key.
    pub fn confirm_key(&self) -> Key {
        self.confirm
    }

    /// The event a press should raise, if any.
    pub fn handle(&self, press: &KeyPress, buttons: &ButtonSync) -> Option<Event> {
        if press.key != self.confirm {
            return None;
        }
        match press.focus {
            Focus::Button | Focus::Outside => {
                tracing::debug!("{} ignored: focus {:?}", press.key, press.focus);
                None
            }
            Focus::Root | Focus::Input => Some(match buttons.determine_next_or_submit() {
                MoveRequest::Submit => Event::SubmitRequested,
                r => Event::NavigationRequest(r),
            }),
        }
    }
}
