//! Simulated `Inventory` port.

use super::SimWorld;
use crate::ports::{Inventory, PortError};

impl Inventory for SimWorld {
    fn item_count(&self, item: &str) -> u32 {
        self.state().items.get(item).copied().unwrap_or(0)
    }

    fn equipped_count(&self, item: &str) -> u32 {
        self.state().equipped.get(item).copied().unwrap_or(0)
    }

    fn buy(&self, item: &str, quantity: u32, max_price: u32) -> Result<u32, PortError> {
        let mut state = self.state();
        let price = *state.shop.get(item).ok_or_else(|| format!("{item} is not sold anywhere"))?;
        if price > max_price {
            state.journal.push(format!("buy {item}: price {price} above {max_price}"));
            return Ok(0);
        }
        let affordable = if price == 0 { quantity } else { quantity.min(state.meat / price) };
        state.meat -= affordable * price;
        state.add_items(item, affordable);
        state.journal.push(format!("buy {affordable} {item}"));
        Ok(affordable)
    }

    fn retrieve(&self, item: &str, quantity: u32) -> Result<bool, PortError> {
        let mut state = self.state();
        let have = state.items.get(item).copied().unwrap_or(0);
        if have >= quantity {
            return Ok(true);
        }
        let stored = state.storage.get(item).copied().unwrap_or(0);
        let pulled = stored.min(quantity - have);
        if pulled > 0 {
            state.storage.insert(item.to_string(), stored - pulled);
            state.add_items(item, pulled);
            state.journal.push(format!("retrieve {pulled} {item}"));
        }
        let have = have + pulled;
        if have < quantity {
            if let Some(&price) = state.shop.get(item) {
                let missing = quantity - have;
                let affordable = if price == 0 { missing } else { missing.min(state.meat / price) };
                state.meat -= affordable * price;
                state.add_items(item, affordable);
                state.journal.push(format!("buy {affordable} {item}"));
            }
        }
        Ok(state.items.get(item).copied().unwrap_or(0) >= quantity)
    }
}
