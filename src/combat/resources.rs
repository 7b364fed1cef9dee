//! Pool of concrete means for carrying out abstract actions.

use std::fmt;

use super::{Action, Macro};
use crate::context::WorldContext;
use crate::task::{Delayed, Hook};

/// How a resource is used in combat.
#[derive(Debug, Clone)]
pub enum ResourceUse {
    /// Use an item.
    Item(String),
    /// Cast a skill.
    Skill(String),
    /// Run a literal or deferred macro.
    Macro(Delayed<Macro>),
}

/// A reusable resource fulfilling one action.
pub struct CombatResource {
    /// Setup run before the task acts (e.g. equipping a banishing tool).
    pub prepare: Option<Hook>,
    /// What to do in combat.
    pub use_: ResourceUse,
}

impl CombatResource {
    /// A resource used as an item.
    pub fn item(item: impl Into<String>) -> Self {
        Self { prepare: None, use_: ResourceUse::Item(item.into()) }
    }

    /// A resource used as a skill.
    pub fn skill(skill: impl Into<String>) -> Self {
        Self { prepare: None, use_: ResourceUse::Skill(skill.into()) }
    }

    /// A resource used as a macro.
    pub fn script(script: impl Into<Delayed<Macro>>) -> Self {
        Self { prepare: None, use_: ResourceUse::Macro(script.into()) }
    }

    /// Runs `prepare` before the task acts.
    #[must_use]
    pub fn with_prepare(
        mut self,
        prepare: impl Fn(&WorldContext) -> Result<(), String> + 'static,
    ) -> Self {
        self.prepare = Some(Box::new(prepare));
        self
    }

    /// The macro this resource contributes.
    pub fn to_macro(&self, ctx: &WorldContext) -> Macro {
        match &self.use_ {
            ResourceUse::Item(item) => Macro::new().item(item),
            ResourceUse::Skill(skill) => Macro::new().skill(skill),
            ResourceUse::Macro(script) => script.resolve(ctx),
        }
    }
}

impl fmt::Debug for CombatResource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CombatResource")
            .field("prepare", &self.prepare.as_ref().map(|_| ".."))
            .field("use_", &self.use_)
            .finish()
    }
}

/// Resources available for one task execution, keyed by action.
///
/// Providing an action twice replaces the earlier resource in place.
pub struct CombatResources<A: Action> {
    resources: Vec<(A, CombatResource)>,
}

impl<A: Action> Default for CombatResources<A> {
    fn default() -> Self {
        Self::new()
    }
}

impl<A: Action> CombatResources<A> {
    /// An empty pool.
    #[must_use]
    pub fn new() -> Self {
        Self { resources: Vec::new() }
    }

    /// Makes `resource` fulfil `action`.
    pub fn provide(&mut self, action: A, resource: CombatResource) {
        if let Some(slot) = self.resources.iter_mut().find(|(a, _)| *a == action) {
            slot.1 = resource;
        } else {
            self.resources.push((action, resource));
        }
    }

    /// Whether `action` has a resource.
    #[must_use]
    pub fn has(&self, action: A) -> bool {
        self.resources.iter().any(|(a, _)| *a == action)
    }

    /// Every resource, in the order provided.
    pub fn all(&self) -> impl Iterator<Item = &CombatResource> {
        self.resources.iter().map(|(_, r)| r)
    }

    /// The macro of the resource fulfilling `action`, if one was provided.
    pub fn macro_for(&self, action: A, ctx: &WorldContext) -> Option<Macro> {
        self.resources.iter().find(|(a, _)| *a == action).map(|(_, r)| r.to_macro(ctx))
    }
}
