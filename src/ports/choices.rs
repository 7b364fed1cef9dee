//! Decision-point registry port.

use std::collections::BTreeMap;

/// Holds the selection to make at each numbered decision point.
pub trait ChoiceRegistry: Send + Sync {
    /// Registers `choices` (decision-point id → option) for upcoming encounters.
    fn set_choices(&self, choices: &BTreeMap<u32, u32>);
}
