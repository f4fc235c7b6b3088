//! The navigation engine.
//!
//! A move is resolved at the configured step level first. When that level
//! has no neighbour in the requested direction the next coarser level is
//! tried, up to cards; a card boundary is terminal. Once a target is found
//! the flags are rewritten in a fixed order:
//!
//! 1. clear the target level and everything below it,
//! 2. mark the target current and cascade first-child activation downward,
//!    with inputs mirroring the active fields,
//! 3. re-point every ancestor level from the target's parent pointers,
//! 4. rebuild all registries and commit their patches as one state change.
//!
//! Reordering these steps breaks the one-current-per-level invariant. The
//! rewrite happens on a copy, so a move that fails leaves the form as it was.
use std::iter;

use crate::{
    config::Config,
    error::{Error, Result},
    event::{DenyReason, Event, EventQueue},
    form::Form,
    item::Entry,
    level::{Direction, Level, MoveRequest, StepMode},
    position::Position,
    registry::Selector,
    validation::{all_active_included_inputs_valid, blocking_inputs},
};

/// What a navigation request did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveOutcome {
    /// The form moved to `index` at `level`.
    Moved {
        /// Level the move resolved at.
        level: Level,
        /// Target position at that level.
        index: usize,
    },
    /// No level had anywhere to go; nothing changed.
    Terminal,
    /// The request was refused; nothing changed.
    Denied(DenyReason),
}

/// Resolves and applies navigation requests against a [`Form`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Navigator {
    /// Granularity of a step.
    step_mode: StepMode,
    /// Global navigation switch.
    enabled: bool,
}

impl Navigator {
    /// Construct a navigator.
    pub fn new(step_mode: StepMode, enabled: bool) -> Self {
        Self { step_mode, enabled }
    }

    /// Construct a navigator from configuration.
    pub fn from_config(config: &Config) -> Self {
        Self::new(config.step_mode, config.navigation_enabled)
    }

    /// Granularity of a step.
    pub fn step_mode(&self) -> StepMode {
        self.step_mode
    }

    /// Is navigation switched on?
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Switch navigation on or off.
    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    /// Put the form on its first card. The cascade makes the first field of
    /// that card current, if it has one. Not gated.
    pub fn start(&self, form: &mut Form, queue: &mut EventQueue) -> Result<MoveOutcome> {
        if form.registry(Level::Card).is_empty() {
            return Err(Error::Discovery("form has no cards".into()));
        }
        apply(form, Level::Card, 0, Direction::Next, queue)?;
        Ok(MoveOutcome::Moved {
            level: Level::Card,
            index: 0,
        })
    }

    /// Handle one navigation request.
    pub fn handle_move(
        &self,
        form: &mut Form,
        request: MoveRequest,
        queue: &mut EventQueue,
    ) -> Result<MoveOutcome> {
        if !self.enabled {
            tracing::debug!("{request} ignored: navigation disabled");
            return Ok(deny(queue, DenyReason::Disabled));
        }
        if request.is_gated() && !all_active_included_inputs_valid(form.inputs()) {
            let blocking: Vec<String> = blocking_inputs(form.inputs())
                .iter()
                .map(|i| i.id().to_string())
                .collect();
            tracing::warn!("{request} denied: invalid inputs {}", blocking.join(", "));
            return Ok(deny(queue, DenyReason::Invalid));
        }

        let dir = request.direction();
        let mode = match request {
            MoveRequest::Submit => StepMode::Card,
            MoveRequest::Prev | MoveRequest::Next => self.step_mode,
        };
        let Some((level, index)) = resolve(form, mode, dir) else {
            tracing::info!("{request}: no {dir} step at any level");
            if request == MoveRequest::Submit {
                queue.push(Event::SubmitRequest);
            }
            return Ok(MoveOutcome::Terminal);
        };
        apply(form, level, index, dir, queue)?;
        Ok(MoveOutcome::Moved { level, index })
    }
}

/// Record a denial.
fn deny(queue: &mut EventQueue, reason: DenyReason) -> MoveOutcome {
    queue.push(Event::NavigationDenied { reason });
    MoveOutcome::Denied(reason)
}

/// Find the first level, from `mode` outwards, with a neighbour in `dir`.
fn resolve(form: &Form, mode: StepMode, dir: Direction) -> Option<(Level, usize)> {
    let mut mode = Some(mode);
    while let Some(m) = mode {
        let level = m.level();
        if let Some(index) = form.registry(level).position(dir) {
            return Some((level, index));
        }
        tracing::debug!("no {dir} {level}, falling back");
        mode = m.coarser();
    }
    None
}

/// Make `index` at `level` current and commit. On error `form` is untouched.
fn apply(
    form: &mut Form,
    level: Level,
    index: usize,
    dir: Direction,
    queue: &mut EventQueue,
) -> Result<()> {
    let mut staged = stage(form, level, index, dir)?;
    let patch = staged.recompute();
    let revision = staged.commit(patch);
    tracing::info!(
        "{dir} -> {level} {} [{}] rev {revision}",
        staged.registry(level).id_at(index).map(ToString::to_string).unwrap_or_default(),
        Position::of(&staged)
    );
    *form = staged;
    queue.push(Event::NavigationChanged { target: level });
    Ok(())
}

/// Rewrite every level's flags on a copy of `form` so that `index` at `level`
/// is current.
fn stage(form: &Form, level: Level, index: usize, dir: Direction) -> Result<Form> {
    let structural = Error::Structural {
        level,
        position: index,
        direction: dir,
    };
    let Some(parents) = form.registry(level).parents_at(index) else {
        return Err(structural);
    };
    let expected = Position::project(form, level, index).map_err(|_| structural.clone())?;
    let mut form = form.clone();

    for l in iter::once(level).chain(level.descendants()) {
        form.registry_mut(l).clear_active_and_current();
    }

    form.registry_mut(level).set_current(Selector::Index(index))?;
    let mut anchor = (level, index);
    for below in level.descendants() {
        if below == Level::Input {
            activate_inputs(&mut form);
            break;
        }
        let reg = form.registry_mut(below);
        if reg.set_active_by_parent(anchor.0, anchor.1, true) > 0
            && let Some(child) = reg.current_index()
        {
            anchor = (below, child);
        }
    }

    for ancestor in level.ancestors() {
        let reg = form.registry_mut(ancestor);
        reg.clear_active_and_current();
        if let Some(p) = parents.index_of(ancestor) {
            reg.set_current(Selector::Index(p))?;
        }
    }

    let actual = Position::of(&form);
    if actual != expected {
        return Err(Error::Invariant(format!(
            "moved to {level} {index}: expected [{expected}], registries at [{actual}]"
        )));
    }
    Ok(form)
}

/// Inputs mirror the active fields; only the current field's first input is
/// current.
fn activate_inputs(form: &mut Form) {
    let fields = form.registry(Level::Field);
    let current = fields.current_index();
    let active = fields.active_indices();
    let inputs = form.registry_mut(Level::Input);
    inputs.clear_active_and_current();
    for field in active {
        inputs.set_active_by_parent(Level::Field, field, Some(field) == current);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tutils::fixtures;

    fn setup(mode: StepMode) -> Result<(Form, Navigator, EventQueue)> {
        let (mut form, _) = fixtures::grid(2, 2, 2, 2).discover()?;
        let nav = Navigator::new(mode, true);
        let mut queue = EventQueue::new();
        nav.start(&mut form, &mut queue)?;
        Ok((form, nav, queue))
    }

    #[test]
    fn start_lands_on_first_step() -> Result<()> {
        let (form, _, mut queue) = setup(StepMode::Field)?;
        assert_eq!(
            Position::of(&form),
            Position {
                card: Some(0),
                set: Some(0),
                group: Some(0),
                field: Some(0),
                input: Some(0),
            }
        );
        assert_eq!(form.fields().active().len(), 2);
        assert_eq!(form.state().revision, 1);
        assert_eq!(
            queue.pop(),
            Some(Event::NavigationChanged {
                target: Level::Card
            })
        );
        form.check_invariants()
    }

    #[test]
    fn field_moves_cross_groups() -> Result<()> {
        let (mut form, nav, mut queue) = setup(StepMode::Field)?;
        nav.handle_move(&mut form, MoveRequest::Next, &mut queue)?;
        let out = nav.handle_move(&mut form, MoveRequest::Next, &mut queue)?;
        assert_eq!(
            out,
            MoveOutcome::Moved {
                level: Level::Field,
                index: 2
            }
        );
        let pos = Position::of(&form);
        assert_eq!(pos.group, Some(1));
        assert_eq!(pos.set, Some(0));
        assert_eq!(form.groups().active().len(), 1);
        form.check_invariants()
    }

    #[test]
    fn disabled_is_a_noop() -> Result<()> {
        let (mut form, mut nav, mut queue) = setup(StepMode::Card)?;
        nav.set_enabled(false);
        let before = form.clone();
        assert_eq!(
            nav.handle_move(&mut form, MoveRequest::Prev, &mut queue)?,
            MoveOutcome::Denied(DenyReason::Disabled)
        );
        assert_eq!(form, before);
        Ok(())
    }

    #[test]
    fn structural_error_on_missing_target() -> Result<()> {
        let (mut form, _, mut queue) = setup(StepMode::Card)?;
        while queue.pop().is_some() {}
        let before = form.clone();
        assert_eq!(
            apply(&mut form, Level::Group, 99, Direction::Next, &mut queue),
            Err(Error::Structural {
                level: Level::Group,
                position: 99,
                direction: Direction::Next
            })
        );
        assert_eq!(form, before);
        assert!(queue.is_empty());
        Ok(())
    }

    #[test]
    fn submit_at_end_requests_submission() -> Result<()> {
        let (mut form, nav, mut queue) = setup(StepMode::Group)?;
        nav.handle_move(&mut form, MoveRequest::Submit, &mut queue)?;
        assert_eq!(Position::of(&form).card, Some(1));
        while queue.pop().is_some() {}
        let out = nav.handle_move(&mut form, MoveRequest::Submit, &mut queue)?;
        assert_eq!(out, MoveOutcome::Terminal);
        assert_eq!(queue.pop(), Some(Event::SubmitRequest));
        Ok(())
    }
}
