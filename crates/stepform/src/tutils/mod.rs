//! Utilities for driving forms in tests.

/// Canned layouts.
pub mod fixtures;
/// A controller wrapper with test-oriented accessors.
pub mod harness;
