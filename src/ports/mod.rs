//! Port traits defining external boundaries.
//!
//! Each trait represents a boundary between the engine and the external
//! world it drives (inventory, adventuring, decision points, the combat
//! macro slot, worn equipment, persisted settings). Implementations live
//! in `src/adapters/`.

pub mod adventure;
pub mod choices;
pub mod inventory;
pub mod loadout;
pub mod macros;
pub mod settings;

pub use adventure::Adventure;
pub use choices::ChoiceRegistry;
pub use inventory::Inventory;
pub use loadout::Loadout;
pub use macros::MacroTarget;
pub use settings::SettingsStore;

/// Error type returned by fallible world-mutation primitives.
pub type PortError = Box<dyn std::error::Error + Send + Sync>;
