//! Simulated `Adventure` port.

use super::{EncounterKind, PendingFight, SimWorld};
use crate::ports::{Adventure, PortError};
use crate::world::Location;

impl Adventure for SimWorld {
    fn adventure(&self, location: &Location) -> Result<(), PortError> {
        let mut guard = self.state();
        let state = &mut *guard;
        if state.pending_fight.is_some() {
            return Err("a fight is still in progress".into());
        }
        let spot = state
            .locations
            .get_mut(&location.name)
            .ok_or_else(|| format!("unknown location {location}"))?;
        spot.turns_spent += 1;
        let Some(encounter) = spot.encounters.get(spot.cursor % spot.encounters.len().max(1)).cloned()
        else {
            state.last_encounter.clear();
            state.journal.push(format!("{location}: nothing happened"));
            return Ok(());
        };
        spot.cursor += 1;

        state.last_encounter = encounter.name().to_string();
        state.journal.push(format!("{location}: {}", encounter.name()));
        if matches!(encounter.kind, EncounterKind::Monster(_)) {
            let stages_left = encounter.stages.max(1);
            state.pending_fight = Some(PendingFight { encounter, stages_left });
        } else {
            state.resolve(&encounter);
        }
        Ok(())
    }

    fn run_combat(&self) -> Result<(), PortError> {
        let mut state = self.state();
        let Some(mut fight) = state.pending_fight.take() else {
            return Ok(());
        };
        let script = state.saved_macro.clone().unwrap_or_default();
        state.journal.push(format!("fight {} using [{script}]", fight.encounter.name()));
        fight.stages_left -= 1;
        if fight.stages_left == 0 {
            state.resolve(&fight.encounter);
            state.pending_choice = fight.encounter.then_choice;
        } else {
            state.pending_fight = Some(fight);
        }
        Ok(())
    }

    fn in_multi_fight(&self) -> bool {
        self.state().pending_fight.is_some()
    }

    fn choice_follows_fight(&self) -> bool {
        self.state().pending_choice
    }

    fn run_choice(&self, selection: i32) -> Result<(), PortError> {
        let mut state = self.state();
        if !state.pending_choice {
            return Err("no decision point is pending".into());
        }
        state.pending_choice = false;
        state.journal.push(format!("choice {selection}"));
        Ok(())
    }

    fn last_encounter(&self) -> String {
        self.state().last_encounter.clone()
    }

    fn turns_spent(&self, location: &Location) -> u32 {
        self.state().locations.get(&location.name).map_or(0, |l| l.turns_spent)
    }
}
