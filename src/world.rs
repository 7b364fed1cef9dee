//! Identity types for things in the external world.

use std::fmt;

use serde::{Deserialize, Serialize};

/// An opponent that combat behavior can be keyed on.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Monster {
    /// Numeric identity used in compiled macro guards.
    pub id: u32,
    /// Display name.
    pub name: String,
}

impl Monster {
    /// Creates a monster with the given id and name.
    pub fn new(id: u32, name: impl Into<String>) -> Self {
        Self { id, name: name.into() }
    }
}

impl fmt::Display for Monster {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

/// A place a task can act in.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Location {
    /// Display name, also the location's identity.
    pub name: String,
}

impl Location {
    /// Creates a location with the given name.
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

/// What a default-action macro is being built for.
#[derive(Debug, Clone, Copy)]
pub enum CombatTarget<'a> {
    /// A specific opponent.
    Monster(&'a Monster),
    /// Any opponent met at this location.
    Location(&'a Location),
    /// Any opponent, location unknown.
    Anywhere,
}

impl fmt::Display for CombatTarget<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Monster(monster) => monster.fmt(f),
            Self::Location(location) => location.fmt(f),
            Self::Anywhere => f.write_str("anywhere"),
        }
    }
}
