//! One form instance: its registries, controls, navigator and event queue.
//!
//! Every inbound event goes through [`Controller::dispatch`]. Events raised
//! while one is being handled queue behind it and run to completion in
//! arrival order, so two navigations never interleave.
use std::mem;

use crate::{
    buttons::{ButtonSync, Click},
    config::Config,
    error::Result,
    event::{DenyReason, Event, EventQueue, key::Key},
    form::Form,
    item::ItemId,
    layout::FormLayout,
    level::MoveRequest,
    navigator::{MoveOutcome, Navigator},
    position::Position,
    trigger::{Focus, KeyPress, KeyTrigger},
};

/// Drives one form.
#[derive(Debug)]
pub struct Controller {
    /// Registries.
    form: Form,
    /// Navigation controls.
    buttons: ButtonSync,
    /// Move engine.
    navigator: Navigator,
    /// Keyboard confirmation.
    trigger: KeyTrigger,
    /// Inbound work.
    queue: EventQueue,
    /// Outbound events not yet drained.
    emitted: Vec<Event>,
    /// Result of the last navigation request.
    last_move: Option<MoveOutcome>,
}

impl Controller {
    /// Take ownership of a discovered form, put it on its first card and
    /// bind its controls.
    pub fn new(mut form: Form, buttons: ButtonSync, config: &Config) -> Result<Self> {
        let navigator = Navigator::from_config(config);
        let trigger = KeyTrigger::new(config.confirm_key)?;
        let mut queue = EventQueue::new();
        let outcome = navigator.start(&mut form, &mut queue)?;
        let mut c = Self {
            form,
            buttons,
            navigator,
            trigger,
            queue,
            emitted: Vec::new(),
            last_move: Some(outcome),
        };
        c.run()?;
        Ok(c)
    }

    /// Discover a layout and start it.
    pub fn from_layout(layout: &FormLayout, config: &Config) -> Result<Self> {
        let (form, buttons) = layout.discover()?;
        Self::new(form, ButtonSync::new(buttons)?, config)
    }

    /// Queue an event and handle everything pending.
    pub fn dispatch(&mut self, event: Event) -> Result<()> {
        self.queue.push(event);
        self.run()
    }

    /// Drain the queue. A failure discards whatever was still pending.
    fn run(&mut self) -> Result<()> {
        while let Some(event) = self.queue.pop() {
            if let Err(e) = self.handle(event) {
                tracing::warn!("dropping {} queued events: {e}", self.queue.len());
                self.queue.clear();
                return Err(e);
            }
        }
        Ok(())
    }

    /// Handle one event. Follow-on work goes to the back of the queue.
    fn handle(&mut self, event: Event) -> Result<()> {
        tracing::trace!("handle {event}");
        if event.is_outbound() {
            self.emitted.push(event.clone());
        }
        match event {
            Event::NavigationRequest(request) => self.navigate(request)?,
            Event::SubmitRequested => self.navigate(MoveRequest::Submit)?,
            Event::Key(press) => {
                if let Some(next) = self.trigger.handle(&press, &self.buttons) {
                    self.queue.push(next);
                }
            }
            Event::ButtonClicked(id) => match self.buttons.click(id.as_str())? {
                Click::Request(request) => self.queue.push(Event::NavigationRequest(request)),
                Click::Disabled => tracing::debug!("{id} is disabled"),
                Click::Unbound => self.queue.push(Event::NavigationDenied {
                    reason: DenyReason::Hidden,
                }),
            },
            Event::InputChanged(_) | Event::ConditionEvaluated | Event::NavigationChanged { .. } => {
                let changes = self.buttons.sync(&self.form);
                self.emitted.extend(changes.into_iter().map(Event::Binding));
            }
            Event::NavigationDenied { .. } | Event::SubmitRequest | Event::Binding(_) => {}
        }
        Ok(())
    }

    /// Run one request through the navigator.
    fn navigate(&mut self, request: MoveRequest) -> Result<()> {
        let outcome = self
            .navigator
            .handle_move(&mut self.form, request, &mut self.queue)?;
        self.last_move = Some(outcome);
        Ok(())
    }

    /// Take the outbound events recorded so far.
    pub fn drain_emitted(&mut self) -> Vec<Event> {
        mem::take(&mut self.emitted)
    }

    /// Outbound events recorded since the last drain.
    pub fn emitted(&self) -> &[Event] {
        &self.emitted
    }

    /// Step forward.
    pub fn next(&mut self) -> Result<()> {
        self.dispatch(Event::NavigationRequest(MoveRequest::Next))
    }

    /// Step back.
    pub fn prev(&mut self) -> Result<()> {
        self.dispatch(Event::NavigationRequest(MoveRequest::Prev))
    }

    /// Submit.
    pub fn submit(&mut self) -> Result<()> {
        self.dispatch(Event::SubmitRequested)
    }

    /// Feed a key press.
    pub fn key(&mut self, key: impl Into<Key>, focus: Focus) -> Result<()> {
        self.dispatch(Event::Key(KeyPress::new(key, focus)))
    }

    /// Click a control.
    pub fn click(&mut self, id: &str) -> Result<()> {
        self.dispatch(Event::ButtonClicked(ItemId::new(id)?))
    }

    /// Record a validation result and resync the controls.
    pub fn set_input_valid(&mut self, id: &str, valid: bool) -> Result<()> {
        if self.form.set_input_valid(id, valid)? {
            self.dispatch(Event::InputChanged(ItemId::new(id)?))?;
        }
        Ok(())
    }

    /// Record a conditional-logic inclusion change and resync the controls.
    pub fn set_input_included(&mut self, id: &str, included: bool) -> Result<()> {
        if self.form.set_input_included(id, included)? {
            self.dispatch(Event::ConditionEvaluated)?;
        }
        Ok(())
    }

    /// Switch navigation on or off.
    pub fn set_navigation_enabled(&mut self, enabled: bool) {
        self.navigator.set_enabled(enabled);
    }

    /// The registries.
    pub fn form(&self) -> &Form {
        &self.form
    }

    /// The controls.
    pub fn buttons(&self) -> &ButtonSync {
        &self.buttons
    }

    /// The key that advances or submits.
    pub fn confirm_key(&self) -> Key {
        self.trigger.confirm_key()
    }

    /// The navigator.
    pub fn navigator(&self) -> &Navigator {
        &self.navigator
    }

    /// Current index at every level.
    pub fn position(&self) -> Position {
        Position::of(&self.form)
    }

    /// Result of the last navigation request.
    pub fn last_move(&self) -> Option<MoveOutcome> {
        self.last_move
    }
}
