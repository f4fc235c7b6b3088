//! The validity gate shared by the navigator and the button synchronizer.
use crate::{
    item::{Entry, Input},
    registry::Registry,
};

/// Inputs that currently block forward motion: active, included and invalid.
pub fn blocking_inputs(inputs: &Registry<Input>) -> Vec<&Input> {
    inputs.filter(|i| i.state().active && i.is_included() && !i.is_valid())
}

/// True when every active, included input is valid. Excluded and inactive
/// inputs never gate.
pub fn all_active_included_inputs_valid(inputs: &Registry<Input>) -> bool {
    inputs
        .iter()
        .all(|i| !(i.state().active && i.is_included()) || i.is_valid())
}
