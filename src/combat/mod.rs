//! Combat behavior and its compilation into a single macro script.
//!
//! A [`CombatStrategy`] records what a task wants done against specific
//! or unspecified opponents. A [`CombatResources`] pool maps abstract
//! actions to concrete means of carrying them out. Compilation merges
//! both into one [`Macro`], grouping opponents that share identical
//! behavior so the script stays within the branch ceiling of the
//! external scripting engine.

pub mod actions;
mod macros;
mod resources;
mod strategy;

use std::fmt::Debug;
use std::hash::Hash;

pub use macros::Macro;
pub use resources::{CombatResource, CombatResources, ResourceUse};
pub use strategy::{ActionDefaults, CombatStrategy, Targets};

/// An abstract combat behavior token.
pub trait Action: Copy + Eq + Hash + Debug + 'static {}

impl<T: Copy + Eq + Hash + Debug + 'static> Action for T {}
