//! Simulated `Loadout` port.

use super::SimWorld;
use crate::outfit::Outfit;
use crate::ports::Loadout;

impl Loadout for SimWorld {
    fn dress(&self, outfit: &Outfit) -> bool {
        let mut guard = self.state();
        let state = &mut *guard;
        let worn: Vec<(String, u32)> = state.equipped.drain().collect();
        for (item, count) in worn {
            state.add_items(&item, count);
        }

        let mut complete = true;
        for item in &outfit.equips {
            match state.items.get_mut(item) {
                Some(count) if *count > 0 => {
                    *count -= 1;
                    state.equipped.insert(item.clone(), 1);
                }
                _ => complete = false,
            }
        }
        if let Some(familiar) = &outfit.familiar {
            if state.familiars.contains(familiar) {
                state.active_familiar = Some(familiar.clone());
            } else {
                complete = false;
            }
        }
        state.journal.push(format!("dress [{}]", outfit.equips.join(", ")));
        complete
    }
}
