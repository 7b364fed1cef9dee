//! Adventure port for acting in the world and resolving encounters.

use super::PortError;
use crate::world::Location;

/// Spends turns and resolves whatever those turns trigger.
pub trait Adventure: Send + Sync {
    /// Acts once at `location`, possibly starting an encounter.
    ///
    /// # Errors
    ///
    /// Returns an error if the location cannot be visited.
    fn adventure(&self, location: &Location) -> Result<(), PortError>;

    /// Runs the pending fight (if any) with the saved combat macro.
    ///
    /// # Errors
    ///
    /// Returns an error if the fight cannot be resolved.
    fn run_combat(&self) -> Result<(), PortError>;

    /// Whether another stage of a multi-stage fight is pending.
    fn in_multi_fight(&self) -> bool;

    /// Whether a decision point immediately follows the last fight.
    fn choice_follows_fight(&self) -> bool;

    /// Resolves the pending decision point. `-1` picks the default/skip option.
    ///
    /// # Errors
    ///
    /// Returns an error if no decision point can be resolved.
    fn run_choice(&self, selection: i32) -> Result<(), PortError>;

    /// Name of the most recently resolved encounter.
    fn last_encounter(&self) -> String;

    /// Total turns spent at `location` so far.
    fn turns_spent(&self, location: &Location) -> u32;
}
