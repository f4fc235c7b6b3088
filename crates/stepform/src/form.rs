use serde::Serialize;

use crate::{
    error::{Error, Result},
    item::{Input, Item, ItemId},
    level::Level,
    registry::{LevelPatch, LevelRegistry, Registry, Selector},
};

/// The merged output of a unified recompute, one patch per level.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FormPatch {
    /// Level patches, outermost first.
    pub levels: Vec<LevelPatch>,
}

/// The published state a display layer observes. It changes only through
/// [`Form::commit`], once per navigation.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize)]
pub struct FormState {
    /// Number of commits so far.
    pub revision: u64,
    /// Level snapshots from the last commit, outermost first.
    pub levels: Vec<LevelPatch>,
}

impl FormState {
    /// The snapshot for one level.
    pub fn level(&self, level: Level) -> Option<&LevelPatch> {
        self.levels.iter().find(|p| p.level == level)
    }
}

/// The five level registries of one form instance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Form {
    /// Card registry.
    cards: Registry<Item>,
    /// Set registry.
    sets: Registry<Item>,
    /// Group registry.
    groups: Registry<Item>,
    /// Field registry.
    fields: Registry<Item>,
    /// Input registry.
    inputs: Registry<Input>,
    /// Last committed state.
    state: FormState,
}

impl Form {
    /// Assemble a form from populated registries, checking that every parent
    /// pointer addresses an existing item.
    pub fn new(
        cards: Registry<Item>,
        sets: Registry<Item>,
        groups: Registry<Item>,
        fields: Registry<Item>,
        inputs: Registry<Input>,
    ) -> Result<Self> {
        if cards.is_empty() {
            return Err(Error::Discovery("form has no cards".into()));
        }
        let form = Self {
            cards,
            sets,
            groups,
            fields,
            inputs,
            state: FormState::default(),
        };
        for level in Level::ALL {
            let reg = form.registry(level);
            if reg.level() != level {
                return Err(Error::Discovery(format!(
                    "{} registry supplied as {level}",
                    reg.level()
                )));
            }
            for index in 0..reg.len() {
                let Some(parents) = reg.parents_at(index) else {
                    continue;
                };
                for ancestor in level.ancestors() {
                    if let Some(p) = parents.index_of(ancestor)
                        && p >= form.registry(ancestor).len()
                    {
                        return Err(Error::Discovery(format!(
                            "{level} {index} points at missing {ancestor} {p}"
                        )));
                    }
                }
            }
        }
        Ok(form)
    }

    /// Card registry.
    pub fn cards(&self) -> &Registry<Item> {
        &self.cards
    }

    /// Set registry.
    pub fn sets(&self) -> &Registry<Item> {
        &self.sets
    }

    /// Group registry.
    pub fn groups(&self) -> &Registry<Item> {
        &self.groups
    }

    /// Field registry.
    pub fn fields(&self) -> &Registry<Item> {
        &self.fields
    }

    /// Input registry.
    pub fn inputs(&self) -> &Registry<Input> {
        &self.inputs
    }

    /// Level-agnostic view of one registry.
    pub fn registry(&self, level: Level) -> &dyn LevelRegistry {
        match level {
            Level::Card => &self.cards,
            Level::Set => &self.sets,
            Level::Group => &self.groups,
            Level::Field => &self.fields,
            Level::Input => &self.inputs,
        }
    }

    /// Mutable level-agnostic view of one registry.
    pub(crate) fn registry_mut(&mut self, level: Level) -> &mut dyn LevelRegistry {
        match level {
            Level::Card => &mut self.cards,
            Level::Set => &mut self.sets,
            Level::Group => &mut self.groups,
            Level::Field => &mut self.fields,
            Level::Input => &mut self.inputs,
        }
    }

    /// Record a validation result for an input. Returns true on change.
    pub fn set_input_valid<'a>(&mut self, sel: impl Into<Selector<'a>>, valid: bool) -> Result<bool> {
        self.inputs.set_valid(sel, valid)
    }

    /// Record whether an input takes part in gating. Returns true on change.
    pub fn set_input_included<'a>(
        &mut self,
        sel: impl Into<Selector<'a>>,
        included: bool,
    ) -> Result<bool> {
        self.inputs.set_included(sel, included)
    }

    /// Ids of the ancestors of an item, outermost first.
    pub fn ancestors(&self, level: Level, index: usize) -> Vec<(Level, &ItemId)> {
        let Some(parents) = self.registry(level).parents_at(index) else {
            return Vec::new();
        };
        let mut out: Vec<_> = level
            .ancestors()
            .filter_map(|a| {
                let i = parents.index_of(a)?;
                self.registry(a).id_at(i).map(|id| (a, id))
            })
            .collect();
        out.reverse();
        out
    }

    /// Id of the current item at `level`.
    pub fn current_id(&self, level: Level) -> Option<&ItemId> {
        let reg = self.registry(level);
        reg.current_index().and_then(|i| reg.id_at(i))
    }

    /// Rebuild every registry and gather their patches without committing.
    pub fn recompute(&mut self) -> FormPatch {
        let mut levels = Vec::with_capacity(Level::ALL.len());
        for level in Level::ALL {
            let reg = self.registry_mut(level);
            reg.rebuild_all();
            levels.push(reg.calculate_states());
        }
        FormPatch { levels }
    }

    /// Publish a patch as one state change. Returns the new revision.
    pub fn commit(&mut self, patch: FormPatch) -> u64 {
        self.state.revision += 1;
        self.state.levels = patch.levels;
        self.state.revision
    }

    /// Last committed state.
    pub fn state(&self) -> &FormState {
        &self.state
    }

    /// Check exclusivity, current ⇒ active, active-run contiguity and that
    /// every active item's parent is active.
    pub fn check_invariants(&self) -> Result<()> {
        for level in Level::ALL {
            let reg = self.registry(level);
            let mut currents = 0;
            for index in 0..reg.len() {
                let Some(state) = reg.state_at(index) else {
                    continue;
                };
                if state.current {
                    currents += 1;
                    if !state.active {
                        return Err(Error::Invariant(format!(
                            "{level} {index} is current but not active"
                        )));
                    }
                }
            }
            if currents > 1 {
                return Err(Error::Invariant(format!(
                    "{level} has {currents} current items"
                )));
            }

            let active = reg.active_indices();
            if active.is_empty() && currents > 0 {
                return Err(Error::Invariant(format!("{level} current without active")));
            }
            let Some(parent) = level.parent() else {
                check_contiguous(level, &active)?;
                continue;
            };
            let parent_reg = self.registry(parent);
            for index in &active {
                let p = reg.parents_at(*index).and_then(|h| h.index_of(parent));
                if let Some(p) = p
                    && !parent_reg.state_at(p).is_some_and(|s| s.active)
                {
                    return Err(Error::Invariant(format!(
                        "{level} {index} is active under inactive {parent} {p}"
                    )));
                }
            }
            // Inputs mirror every active field, so only the four hierarchy
            // levels need a single parent.
            if level == Level::Input {
                continue;
            }
            check_contiguous(level, &active)?;
            let mut owners = active
                .iter()
                .map(|i| reg.parents_at(*i).and_then(|h| h.index_of(parent)));
            if let Some(first) = owners.next()
                && owners.any(|o| o != first)
            {
                return Err(Error::Invariant(format!(
                    "active {level} items span more than one {parent}"
                )));
            }
        }
        Ok(())
    }
}

/// Active positions must form one unbroken run.
fn check_contiguous(level: Level, active: &[usize]) -> Result<()> {
    if active.windows(2).any(|w| w[1] != w[0] + 1) {
        return Err(Error::Invariant(format!(
            "active {level} items are not contiguous: {active:?}"
        )));
    }
    Ok(())
}

/// Ids of the active items at a level, document order.
pub fn active_ids(form: &Form, level: Level) -> Vec<String> {
    let reg = form.registry(level);
    reg.active_indices()
        .into_iter()
        .filter_map(|i| reg.id_at(i).map(ToString::to_string))
        .collect()
}
