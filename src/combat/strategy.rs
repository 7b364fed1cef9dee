//! Per-task combat behavior table and its compiler.

use super::{Action, CombatResources, Macro};
use crate::context::WorldContext;
use crate::task::Delayed;
use crate::world::{CombatTarget, Location, Monster};

/// Which opponents a behavior applies to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Targets {
    /// Any opponent not otherwise handled.
    Any,
    /// Only these opponents.
    Only(Vec<Monster>),
}

impl From<Monster> for Targets {
    fn from(monster: Monster) -> Self {
        Self::Only(vec![monster])
    }
}

impl From<&Monster> for Targets {
    fn from(monster: &Monster) -> Self {
        Self::Only(vec![monster.clone()])
    }
}

impl From<Vec<Monster>> for Targets {
    fn from(monsters: Vec<Monster>) -> Self {
        Self::Only(monsters)
    }
}

impl From<&[Monster]> for Targets {
    fn from(monsters: &[Monster]) -> Self {
        Self::Only(monsters.to_vec())
    }
}

/// Fallback macro for an action no resource fulfils.
pub trait ActionDefaults<A: Action> {
    /// The macro that carries out `action` against `target`.
    fn default_macro(&self, action: A, target: CombatTarget<'_>) -> Macro;
}

impl<A, F> ActionDefaults<A> for F
where
    A: Action,
    F: Fn(A, CombatTarget<'_>) -> Macro,
{
    fn default_macro(&self, action: A, target: CombatTarget<'_>) -> Macro {
        self(action, target)
    }
}

/// What a task wants done when it meets specific or unspecified opponents.
///
/// Created per task (or cloned from a shared template), adjusted during
/// customization, compiled once, then discarded. Target tables keep
/// insertion order so compiled output is deterministic.
#[derive(Debug, Clone)]
pub struct CombatStrategy<A: Action> {
    starting_macro: Option<Delayed<Macro>>,
    default_macros: Option<Vec<Delayed<Macro>>>,
    macros: Vec<(Monster, Vec<Delayed<Macro>>)>,
    default_action: Option<A>,
    actions: Vec<(Monster, A)>,
}

impl<A: Action> Default for CombatStrategy<A> {
    fn default() -> Self {
        Self::new()
    }
}

impl<A: Action> CombatStrategy<A> {
    /// An empty strategy.
    #[must_use]
    pub fn new() -> Self {
        Self {
            starting_macro: None,
            default_macros: None,
            macros: Vec::new(),
            default_action: None,
            actions: Vec::new(),
        }
    }

    /// Carries out `action` against `targets`. One action per opponent;
    /// the latest call wins.
    pub fn action(&mut self, action: A, targets: impl Into<Targets>) -> &mut Self {
        match targets.into() {
            Targets::Any => self.default_action = Some(action),
            Targets::Only(monsters) => {
                for monster in monsters {
                    if let Some(slot) = self.actions.iter_mut().find(|(m, _)| *m == monster) {
                        slot.1 = action;
                    } else {
                        self.actions.push((monster, action));
                    }
                }
            }
        }
        self
    }

    /// Runs `script` against `targets`, after anything already added.
    pub fn add_macro(
        &mut self,
        script: impl Into<Delayed<Macro>>,
        targets: impl Into<Targets>,
    ) -> &mut Self {
        self.insert_macro(script.into(), targets.into(), false)
    }

    /// Runs `script` against `targets`, before anything already added.
    pub fn prepend_macro(
        &mut self,
        script: impl Into<Delayed<Macro>>,
        targets: impl Into<Targets>,
    ) -> &mut Self {
        self.insert_macro(script.into(), targets.into(), true)
    }

    fn insert_macro(&mut self, script: Delayed<Macro>, targets: Targets, prepend: bool) -> &mut Self {
        let push = |list: &mut Vec<Delayed<Macro>>, script: Delayed<Macro>| {
            if prepend {
                list.insert(0, script);
            } else {
                list.push(script);
            }
        };
        match targets {
            Targets::Any => push(self.default_macros.get_or_insert_with(Vec::new), script),
            Targets::Only(monsters) => {
                for monster in monsters {
                    let index = match self.macros.iter().position(|(m, _)| *m == monster) {
                        Some(index) => index,
                        None => {
                            self.macros.push((monster, Vec::new()));
                            self.macros.len() - 1
                        }
                    };
                    push(&mut self.macros[index].1, script.clone());
                }
            }
        }
        self
    }

    /// Runs `script` at the very start of every fight.
    pub fn start_with(&mut self, script: impl Into<Delayed<Macro>>) -> &mut Self {
        self.starting_macro = Some(script.into());
        self
    }

    /// Whether `action` is requested anywhere in this strategy.
    #[must_use]
    pub fn can(&self, action: A) -> bool {
        self.default_action == Some(action) || self.actions.iter().any(|(_, a)| *a == action)
    }

    /// Opponents currently mapped to `action`.
    #[must_use]
    pub fn where_(&self, action: A) -> Vec<Monster> {
        self.actions.iter().filter(|(_, a)| *a == action).map(|(m, _)| m.clone()).collect()
    }

    /// The action taken against `monster`.
    #[must_use]
    pub fn current_action(&self, monster: &Monster) -> Option<A> {
        self.actions.iter().find(|(m, _)| m == monster).map(|(_, a)| *a).or(self.default_action)
    }

    /// Compiles the strategy into one macro.
    ///
    /// Order: starting macro, grouped target macros, grouped target
    /// actions, default macros, default action. An action resolves to the
    /// macro of a provided resource, otherwise to `defaults` for its
    /// target (or for `location` when handling the default action).
    pub fn compile(
        &self,
        ctx: &WorldContext,
        resources: &CombatResources<A>,
        defaults: Option<&dyn ActionDefaults<A>>,
        location: Option<&Location>,
    ) -> Macro {
        let mut result = Macro::new();

        if let Some(start) = &self.starting_macro {
            result = result.append(&start.resolve(ctx));
        }

        let target_macros = self.macros.iter().map(|(monster, scripts)| {
            let body = scripts.iter().fold(Macro::new(), |acc, s| acc.append(&s.resolve(ctx)));
            (monster, body)
        });
        result = result.append(&compress(target_macros));

        let target_actions = self.actions.iter().filter_map(|(monster, action)| {
            resolve_action(ctx, resources, defaults, *action, CombatTarget::Monster(monster))
                .map(|body| (monster, body))
        });
        result = result.append(&compress(target_actions));

        for script in self.default_macros.iter().flatten() {
            result = result.append(&script.resolve(ctx));
        }

        if let Some(action) = self.default_action {
            let target = location.map_or(CombatTarget::Anywhere, CombatTarget::Location);
            if let Some(body) = resolve_action(ctx, resources, defaults, action, target) {
                result = result.append(&body);
            }
        }

        result
    }
}

fn resolve_action<A: Action>(
    ctx: &WorldContext,
    resources: &CombatResources<A>,
    defaults: Option<&dyn ActionDefaults<A>>,
    action: A,
    target: CombatTarget<'_>,
) -> Option<Macro> {
    resources
        .macro_for(action, ctx)
        .or_else(|| defaults.map(|d| d.default_macro(action, target)))
}

/// Groups opponents by identical macro text and emits one guarded block
/// per distinct, non-empty text.
fn compress<'a>(entries: impl IntoIterator<Item = (&'a Monster, Macro)>) -> Macro {
    let mut groups: Vec<(String, Macro, Vec<&'a Monster>)> = Vec::new();
    for (monster, body) in entries {
        let text = body.to_string();
        if let Some(group) = groups.iter_mut().find(|(t, ..)| *t == text) {
            group.2.push(monster);
        } else {
            groups.push((text, body, vec![monster]));
        }
    }
    groups
        .into_iter()
        .filter(|(text, ..)| !text.is_empty())
        .fold(Macro::new(), |acc, (_, body, monsters)| {
            acc.if_(Macro::monster_guard(monsters), &body)
        })
}
