//! World context bundling all port trait objects.

use std::collections::BTreeMap;

use crate::adapters::sim::SimWorld;
use crate::combat::Macro;
use crate::outfit::Outfit;
use crate::ports::{
    Adventure, ChoiceRegistry, Inventory, Loadout, MacroTarget, PortError, SettingsStore,
};
use crate::world::Location;

/// Bundles all port trait objects into a single context.
///
/// Each field provides access to one external boundary. Task predicates
/// and hooks receive this context, so they read and change the world
/// through the same ports the engine uses.
pub struct WorldContext {
    /// Item counts and item acquisition.
    pub inventory: Box<dyn Inventory>,
    /// Acting in the world and resolving encounters.
    pub adventure: Box<dyn Adventure>,
    /// Decision-point selections.
    pub choices: Box<dyn ChoiceRegistry>,
    /// Slot for the compiled combat macro.
    pub macros: Box<dyn MacroTarget>,
    /// Worn equipment and companion.
    pub loadout: Box<dyn Loadout>,
    /// Persisted preferences.
    pub settings: Box<dyn SettingsStore>,
}

impl WorldContext {
    /// Creates a context served entirely by the simulated world.
    #[must_use]
    pub fn simulated(world: &SimWorld) -> Self {
        Self {
            inventory: Box::new(world.clone()),
            adventure: Box::new(world.clone()),
            choices: Box::new(world.clone()),
            macros: Box::new(world.clone()),
            loadout: Box::new(world.clone()),
            settings: Box::new(world.clone()),
        }
    }

    /// Creates a context where every port panics when called.
    ///
    /// Useful as a base for tests that replace only the ports they use.
    #[must_use]
    pub fn unconfigured() -> Self {
        Self {
            inventory: Box::new(Unconfigured),
            adventure: Box::new(Unconfigured),
            choices: Box::new(Unconfigured),
            macros: Box::new(Unconfigured),
            loadout: Box::new(Unconfigured),
            settings: Box::new(Unconfigured),
        }
    }
}

// --- Panicking adapter for unconfigured ports ---

struct Unconfigured;

impl Inventory for Unconfigured {
    fn item_count(&self, _item: &str) -> u32 {
        panic!("Inventory port not configured in WorldContext");
    }
    fn equipped_count(&self, _item: &str) -> u32 {
        panic!("Inventory port not configured in WorldContext");
    }
    fn buy(&self, _item: &str, _quantity: u32, _max_price: u32) -> Result<u32, PortError> {
        panic!("Inventory port not configured in WorldContext");
    }
    fn retrieve(&self, _item: &str, _quantity: u32) -> Result<bool, PortError> {
        panic!("Inventory port not configured in WorldContext");
    }
}

impl Adventure for Unconfigured {
    fn adventure(&self, _location: &Location) -> Result<(), PortError> {
        panic!("Adventure port not configured in WorldContext");
    }
    fn run_combat(&self) -> Result<(), PortError> {
        panic!("Adventure port not configured in WorldContext");
    }
    fn in_multi_fight(&self) -> bool {
        panic!("Adventure port not configured in WorldContext");
    }
    fn choice_follows_fight(&self) -> bool {
        panic!("Adventure port not configured in WorldContext");
    }
    fn run_choice(&self, _selection: i32) -> Result<(), PortError> {
        panic!("Adventure port not configured in WorldContext");
    }
    fn last_encounter(&self) -> String {
        panic!("Adventure port not configured in WorldContext");
    }
    fn turns_spent(&self, _location: &Location) -> u32 {
        panic!("Adventure port not configured in WorldContext");
    }
}

impl ChoiceRegistry for Unconfigured {
    fn set_choices(&self, _choices: &BTreeMap<u32, u32>) {
        panic!("ChoiceRegistry port not configured in WorldContext");
    }
}

impl MacroTarget for Unconfigured {
    fn save(&self, _script: &Macro) -> Result<(), PortError> {
        panic!("MacroTarget port not configured in WorldContext");
    }
}

impl Loadout for Unconfigured {
    fn dress(&self, _outfit: &Outfit) -> bool {
        panic!("Loadout port not configured in WorldContext");
    }
}

impl SettingsStore for Unconfigured {
    fn get(&self, _key: &str) -> Option<String> {
        panic!("SettingsStore port not configured in WorldContext");
    }
    fn set(&self, _key: &str, _value: &str) {
        panic!("SettingsStore port not configured in WorldContext");
    }
}
