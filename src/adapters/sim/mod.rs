//! Simulated world implementing every port in memory.
//!
//! All ports of one [`SimWorld`] share a single state behind a mutex, so
//! a context built with [`WorldContext::simulated`](crate::WorldContext::simulated)
//! observes its own side effects immediately.

mod adventure;
mod inventory;
mod loadout;
mod registry;

use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use serde::{Deserialize, Serialize};

use crate::world::Monster;

/// What happens on one turn at a location.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EncounterKind {
    /// A fight against this monster.
    Monster(Monster),
    /// A named non-combat event.
    Noncombat(String),
}

/// Decision point selection an encounter's rewards depend on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChoiceGate {
    /// Decision-point id.
    pub id: u32,
    /// Option that must be registered for the rewards to apply.
    pub option: u32,
}

/// One entry in a location's encounter cycle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Encounter {
    /// Fight or non-combat.
    #[serde(flatten)]
    pub kind: EncounterKind,
    /// Items granted when the encounter resolves.
    #[serde(default)]
    pub gives: BTreeMap<String, u32>,
    /// Settings written when the encounter resolves.
    #[serde(default)]
    pub sets: BTreeMap<String, String>,
    /// Number of fight stages (fights only).
    #[serde(default = "one")]
    pub stages: u32,
    /// A decision point follows the fight.
    #[serde(default)]
    pub then_choice: bool,
    /// Rewards only apply when this selection is registered.
    #[serde(default)]
    pub choice: Option<ChoiceGate>,
}

fn one() -> u32 {
    1
}

impl Encounter {
    /// A single-stage fight.
    #[must_use]
    pub fn fight(monster: Monster) -> Self {
        Self::with_kind(EncounterKind::Monster(monster))
    }

    /// A non-combat event.
    pub fn noncombat(name: impl Into<String>) -> Self {
        Self::with_kind(EncounterKind::Noncombat(name.into()))
    }

    fn with_kind(kind: EncounterKind) -> Self {
        Self {
            kind,
            gives: BTreeMap::new(),
            sets: BTreeMap::new(),
            stages: 1,
            then_choice: false,
            choice: None,
        }
    }

    /// Grants `count` of `item` on resolution.
    #[must_use]
    pub fn gives(mut self, item: impl Into<String>, count: u32) -> Self {
        self.gives.insert(item.into(), count);
        self
    }

    /// Writes `key = value` on resolution.
    #[must_use]
    pub fn sets(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.sets.insert(key.into(), value.into());
        self
    }

    /// Makes the fight take `stages` rounds of combat.
    #[must_use]
    pub fn stages(mut self, stages: u32) -> Self {
        self.stages = stages.max(1);
        self
    }

    /// Follows the fight with a decision point.
    #[must_use]
    pub fn then_choice(mut self) -> Self {
        self.then_choice = true;
        self
    }

    /// Only rewards when option `option` is registered for decision point `id`.
    #[must_use]
    pub fn gated(mut self, id: u32, option: u32) -> Self {
        self.choice = Some(ChoiceGate { id, option });
        self
    }

    /// The encounter's display name.
    #[must_use]
    pub fn name(&self) -> &str {
        match &self.kind {
            EncounterKind::Monster(monster) => &monster.name,
            EncounterKind::Noncombat(name) => name,
        }
    }
}

#[derive(Debug, Default)]
struct SimLocation {
    encounters: Vec<Encounter>,
    cursor: usize,
    turns_spent: u32,
}

#[derive(Debug)]
struct PendingFight {
    encounter: Encounter,
    stages_left: u32,
}

#[derive(Debug, Default)]
struct SimState {
    meat: u32,
    items: HashMap<String, u32>,
    equipped: HashMap<String, u32>,
    storage: HashMap<String, u32>,
    shop: HashMap<String, u32>,
    familiars: HashSet<String>,
    active_familiar: Option<String>,
    settings: HashMap<String, String>,
    locations: HashMap<String, SimLocation>,
    choices: BTreeMap<u32, u32>,
    saved_macro: Option<String>,
    last_encounter: String,
    pending_fight: Option<PendingFight>,
    pending_choice: bool,
    journal: Vec<String>,
}

impl SimState {
    fn add_items(&mut self, item: &str, count: u32) {
        *self.items.entry(item.to_string()).or_insert(0) += count;
    }

    fn resolve(&mut self, encounter: &Encounter) {
        if let Some(gate) = encounter.choice {
            if self.choices.get(&gate.id) != Some(&gate.option) {
                self.journal.push(format!("{}: no reward", encounter.name()));
                return;
            }
        }
        for (item, count) in &encounter.gives {
            self.add_items(item, *count);
        }
        for (key, value) in &encounter.sets {
            self.settings.insert(key.clone(), value.clone());
        }
    }
}

/// An in-memory world. Cloning yields another handle to the same world.
#[derive(Debug, Clone, Default)]
pub struct SimWorld {
    state: Arc<Mutex<SimState>>,
}

impl SimWorld {
    /// An empty world.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> MutexGuard<'_, SimState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Puts `count` of `item` into inventory.
    pub fn give(&self, item: &str, count: u32) {
        self.state().add_items(item, count);
    }

    /// Puts `count` of `item` into storage, reachable by retrieval.
    pub fn store(&self, item: &str, count: u32) {
        *self.state().storage.entry(item.to_string()).or_insert(0) += count;
    }

    /// Offers `item` in the shop at `price` each.
    pub fn sell(&self, item: &str, price: u32) {
        self.state().shop.insert(item.to_string(), price);
    }

    /// Sets the money available for purchases.
    pub fn set_meat(&self, meat: u32) {
        self.state().meat = meat;
    }

    /// Makes `familiar` available to loadouts.
    pub fn add_familiar(&self, familiar: &str) {
        self.state().familiars.insert(familiar.to_string());
    }

    /// Adds a location that cycles through `encounters`.
    pub fn add_location(&self, name: &str, encounters: Vec<Encounter>) {
        self.state()
            .locations
            .insert(name.to_string(), SimLocation { encounters, ..SimLocation::default() });
    }

    /// Writes a setting directly.
    pub fn set_setting(&self, key: &str, value: &str) {
        self.state().settings.insert(key.to_string(), value.to_string());
    }

    /// Reads a setting.
    #[must_use]
    pub fn setting(&self, key: &str) -> Option<String> {
        self.state().settings.get(key).cloned()
    }

    /// Money left.
    #[must_use]
    pub fn meat(&self) -> u32 {
        self.state().meat
    }

    /// The last saved combat macro text.
    #[must_use]
    pub fn saved_macro(&self) -> Option<String> {
        self.state().saved_macro.clone()
    }

    /// The registered selection for decision point `id`.
    #[must_use]
    pub fn choice(&self, id: u32) -> Option<u32> {
        self.state().choices.get(&id).copied()
    }

    /// The companion currently active.
    #[must_use]
    pub fn active_familiar(&self) -> Option<String> {
        self.state().active_familiar.clone()
    }

    /// Every event the world recorded, in order.
    #[must_use]
    pub fn journal(&self) -> Vec<String> {
        self.state().journal.clone()
    }

    /// Appends an entry to the journal.
    pub fn note(&self, entry: impl Into<String>) {
        self.state().journal.push(entry.into());
    }
}
