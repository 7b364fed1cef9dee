//! Macro target port: where the compiled combat script goes.

use super::PortError;
use crate::combat::Macro;

/// Stores the one script the external combat engine runs automatically.
pub trait MacroTarget: Send + Sync {
    /// Saves `script` as the script for the next encounter(s).
    ///
    /// # Errors
    ///
    /// Returns an error if the script cannot be stored.
    fn save(&self, script: &Macro) -> Result<(), PortError>;
}
