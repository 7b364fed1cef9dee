//! Loadout port for committing equipment and companion choices.

use crate::outfit::Outfit;

/// Commits a loadout to the worn/active state.
pub trait Loadout: Send + Sync {
    /// Wears everything `outfit` asks for. Returns `false` if any part
    /// could not be worn; failures are reported, never raised.
    fn dress(&self, outfit: &Outfit) -> bool;
}
