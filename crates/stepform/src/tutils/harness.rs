//! A controller wrapper for tests.

use crate::{
    config::Config,
    controller::Controller,
    error::Result,
    event::{Event, key::Key},
    form::active_ids,
    layout::FormLayout,
    level::{Level, StepMode},
    navigator::MoveOutcome,
    position::Position,
    trigger::Focus,
};

/// Holds a [`Controller`]. Tests drive the form through it and inspect the
/// registries and emitted events. Invariants are checked after every action.
pub struct Harness {
    /// The controller under test.
    pub controller: Controller,
}

/// Builder for creating a test harness with a fluent API.
pub struct HarnessBuilder {
    /// Layout under test.
    layout: FormLayout,
    /// Settings for the controller.
    config: Config,
}

impl HarnessBuilder {
    /// Create a new harness builder for a layout.
    fn new(layout: FormLayout) -> Self {
        Self {
            layout,
            config: Config::default(),
        }
    }

    /// Set the step mode.
    pub fn step_mode(mut self, mode: StepMode) -> Self {
        self.config.step_mode = mode;
        self
    }

    /// Switch navigation off.
    pub fn disabled(mut self) -> Self {
        self.config.navigation_enabled = false;
        self
    }

    /// Build the harness. Start-up events are discarded.
    pub fn build(self) -> Result<Harness> {
        let mut controller = Controller::from_layout(&self.layout, &self.config)?;
        controller.drain_emitted();
        controller.form().check_invariants()?;
        Ok(Harness { controller })
    }
}

impl Harness {
    /// Create a harness builder for constructing a test harness with a fluent API.
    ///
    /// # Example
    /// ```
    /// # use stepform::{level::StepMode, tutils::{fixtures, harness::Harness}};
    /// # fn example() -> stepform::Result<()> {
    /// let mut h = Harness::builder(fixtures::grid(2, 1, 1, 2))
    ///     .step_mode(StepMode::Field)
    ///     .build()?;
    /// h.next()?;
    /// # Ok(())
    /// # }
    /// ```
    pub fn builder(layout: FormLayout) -> HarnessBuilder {
        HarnessBuilder::new(layout)
    }

    /// A harness with default settings.
    pub fn new(layout: FormLayout) -> Result<Self> {
        Self::builder(layout).build()
    }

    /// Run an action, then check every hierarchy invariant.
    fn act(&mut self, f: impl FnOnce(&mut Controller) -> Result<()>) -> Result<()> {
        f(&mut self.controller)?;
        self.controller.form().check_invariants()
    }

    /// Step forward.
    pub fn next(&mut self) -> Result<()> {
        self.act(Controller::next)
    }

    /// Step back.
    pub fn prev(&mut self) -> Result<()> {
        self.act(Controller::prev)
    }

    /// Submit.
    pub fn submit(&mut self) -> Result<()> {
        self.act(Controller::submit)
    }

    /// Press a key with focus on `focus`.
    pub fn key<T>(&mut self, k: T, focus: Focus) -> Result<()>
    where
        T: Into<Key>,
    {
        self.act(|c| c.key(k, focus))
    }

    /// Click a control.
    pub fn click(&mut self, id: &str) -> Result<()> {
        self.act(|c| c.click(id))
    }

    /// Record an input's validity.
    pub fn set_valid(&mut self, id: &str, valid: bool) -> Result<()> {
        self.act(|c| c.set_input_valid(id, valid))
    }

    /// Record an input's inclusion.
    pub fn set_included(&mut self, id: &str, included: bool) -> Result<()> {
        self.act(|c| c.set_input_included(id, included))
    }

    /// Take the events emitted since the last call.
    pub fn events(&mut self) -> Vec<Event> {
        self.controller.drain_emitted()
    }

    /// Take the emitted events, dropping binding changes.
    pub fn navigation_events(&mut self) -> Vec<Event> {
        self.events()
            .into_iter()
            .filter(|e| !matches!(e, Event::Binding(_)))
            .collect()
    }

    /// Current index at every level.
    pub fn position(&self) -> Position {
        self.controller.position()
    }

    /// Ids of the active items at a level.
    pub fn active(&self, level: Level) -> Vec<String> {
        active_ids(self.controller.form(), level)
    }

    /// Id of the current item at a level.
    pub fn current(&self, level: Level) -> Option<String> {
        self.controller
            .form()
            .current_id(level)
            .map(ToString::to_string)
    }

    /// Result of the last navigation request.
    pub fn last_move(&self) -> Option<MoveOutcome> {
        self.controller.last_move()
    }
}
