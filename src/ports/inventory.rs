//! Inventory port for item counts and item acquisition.

use super::PortError;

/// Reads and changes what the player is carrying.
///
/// Counts are always current truth; the engine never caches them.
pub trait Inventory: Send + Sync {
    /// Number of `item` in inventory (not counting worn copies).
    fn item_count(&self, item: &str) -> u32;

    /// Number of `item` currently worn.
    fn equipped_count(&self, item: &str) -> u32;

    /// Buys up to `quantity` of `item`, paying at most `max_price` each.
    /// Returns how many were bought.
    ///
    /// # Errors
    ///
    /// Returns an error if the purchase cannot be attempted at all.
    fn buy(&self, item: &str, quantity: u32, max_price: u32) -> Result<u32, PortError>;

    /// Brings the on-hand count of `item` up to `quantity` by whatever
    /// generic means the world offers. Returns whether that succeeded.
    ///
    /// # Errors
    ///
    /// Returns an error if retrieval cannot be attempted at all.
    fn retrieve(&self, item: &str, quantity: u32) -> Result<bool, PortError>;
}
