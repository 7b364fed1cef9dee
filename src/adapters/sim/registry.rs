//! Simulated decision-point registry, macro slot, and settings store.

use std::collections::BTreeMap;

use super::SimWorld;
use crate::combat::Macro;
use crate::ports::{ChoiceRegistry, MacroTarget, PortError, SettingsStore};

impl ChoiceRegistry for SimWorld {
    fn set_choices(&self, choices: &BTreeMap<u32, u32>) {
        self.state().choices.extend(choices);
    }
}

impl MacroTarget for SimWorld {
    fn save(&self, script: &Macro) -> Result<(), PortError> {
        self.state().saved_macro = Some(script.to_string());
        Ok(())
    }
}

impl SettingsStore for SimWorld {
    fn get(&self, key: &str) -> Option<String> {
        self.setting(key)
    }

    fn set(&self, key: &str, value: &str) {
        self.set_setting(key, value);
    }
}
