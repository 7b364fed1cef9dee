//! Declarative world-state predicates.

use serde::Deserialize;

use crate::context::WorldContext;

/// A predicate over the world, written in scenario files.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Condition {
    /// At least `count` of `item` on hand or worn.
    Have {
        /// The item.
        item: String,
        /// Required quantity.
        #[serde(default = "one")]
        count: u32,
    },
    /// A setting holds exactly `value`.
    Setting {
        /// The setting key.
        key: String,
        /// The expected value.
        value: String,
    },
    /// Every inner condition holds.
    All(Vec<Condition>),
    /// At least one inner condition holds.
    Any(Vec<Condition>),
    /// The inner condition does not hold.
    Not(Box<Condition>),
}

fn one() -> u32 {
    1
}

impl Condition {
    /// Evaluates the condition against the current world.
    #[must_use]
    pub fn holds(&self, ctx: &WorldContext) -> bool {
        match self {
            Self::Have { item, count } => {
                ctx.inventory.item_count(item) + ctx.inventory.equipped_count(item) >= *count
            }
            Self::Setting { key, value } => ctx.settings.get(key).as_deref() == Some(value.as_str()),
            Self::All(inner) => inner.iter().all(|c| c.holds(ctx)),
            Self::Any(inner) => inner.iter().any(|c| c.holds(ctx)),
            Self::Not(inner) => !inner.holds(ctx),
        }
    }

    /// Wraps the condition into a boxed-ready predicate.
    #[must_use]
    pub fn into_predicate(self) -> impl Fn(&WorldContext) -> bool + 'static {
        move |ctx| self.holds(ctx)
    }
}
