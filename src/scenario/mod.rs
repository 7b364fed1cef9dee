//! YAML scenarios: a simulated world plus declarative quests.
//!
//! A scenario file describes the starting state of a [`SimWorld`] and
//! the quests to drive through it. Task predicates are [`Condition`]s,
//! combat behavior is expressed with [`ScenarioAction`]s, and
//! [`ScenarioHooks`] supplies the situational logic the engine runs for
//! every task.

mod condition;

use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::adapters::sim::{Encounter, EncounterKind, SimWorld};
use crate::combat::{CombatResource, CombatResources, CombatStrategy, Macro, Targets};
use crate::context::WorldContext;
use crate::engine::EngineHooks;
use crate::error::EngineError;
use crate::graph::flatten;
use crate::outfit::Outfit;
use crate::task::{AcquireItem, Limit, OutfitSpec, Perform, Quest, Task};
use crate::world::{CombatTarget, Location, Monster};

pub use condition::Condition;

crate::combat_actions! {
    /// Combat behaviors a scenario task can request.
    #[derive(Deserialize)]
    #[serde(rename_all = "snake_case")]
    pub enum ScenarioAction: ScenarioActionMethods {
        Kill => kill,
        Banish => banish,
        Ignore => ignore,
    }
}

/// Macro for a scenario action no resource fulfils.
#[must_use]
pub fn default_macro(action: ScenarioAction, target: CombatTarget<'_>) -> Macro {
    match action {
        ScenarioAction::Kill => Macro::new().attack().repeat(),
        ScenarioAction::Banish => Macro::new().abort_with(&format!("No banisher for {target}")),
        ScenarioAction::Ignore => Macro::new().run_away(),
    }
}

/// Errors raised while loading or building a scenario.
#[derive(Debug, thiserror::Error)]
pub enum ScenarioError {
    /// The scenario file could not be read.
    #[error("failed to read scenario {path}: {source}")]
    Io {
        /// The file path.
        path: String,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The file is not a valid scenario.
    #[error("invalid scenario: {0}")]
    Parse(#[from] serde_yaml::Error),

    /// A combat entry names a monster no location can produce.
    #[error("Task {task} targets unknown monster {monster}")]
    UnknownMonster {
        /// The task declaring the target.
        task: String,
        /// The monster name.
        monster: String,
    },

    /// A task acts at a location the world does not have.
    #[error("Task {task} acts at unknown location {location}")]
    UnknownLocation {
        /// The task.
        task: String,
        /// The location name.
        location: String,
    },

    /// Graph construction failed.
    #[error(transparent)]
    Graph(#[from] EngineError),
}

/// Starting state of the simulated world.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct WorldSpec {
    /// Money for purchases.
    #[serde(default)]
    pub meat: u32,
    /// Items on hand.
    #[serde(default)]
    pub items: BTreeMap<String, u32>,
    /// Items reachable by retrieval.
    #[serde(default)]
    pub storage: BTreeMap<String, u32>,
    /// Shop prices.
    #[serde(default)]
    pub shop: BTreeMap<String, u32>,
    /// Companions available to loadouts.
    #[serde(default)]
    pub familiars: Vec<String>,
    /// Initial settings.
    #[serde(default)]
    pub settings: BTreeMap<String, String>,
    /// Locations and their encounter cycles.
    #[serde(default)]
    pub locations: Vec<LocationSpec>,
}

/// One location of the simulated world.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LocationSpec {
    /// Location name.
    pub name: String,
    /// Encounters, cycled in order.
    #[serde(default)]
    pub encounters: Vec<Encounter>,
}

/// A declared quest.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct QuestSpec {
    /// Quest name.
    pub name: String,
    /// Every task counts as completed once this holds.
    #[serde(default)]
    pub completed: Option<Condition>,
    /// No task is available until this holds.
    #[serde(default)]
    pub ready: Option<Condition>,
    /// Tasks in declaration order.
    pub tasks: Vec<TaskSpec>,
}

/// What a declared task does.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum PerformSpec {
    /// Act at the named location.
    At(Location),
    /// Write settings directly.
    Set {
        /// Settings to write.
        set: BTreeMap<String, String>,
    },
}

/// A declared item requirement.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AcquireSpec {
    /// The item.
    pub item: String,
    /// Quantity (default 1).
    #[serde(default)]
    pub num: Option<u32>,
    /// Buy for at most this much each.
    #[serde(default)]
    pub price: Option<u32>,
    /// A shortfall is not fatal.
    #[serde(default)]
    pub optional: bool,
}

/// A macro aimed at specific monsters, or at anything when none are named.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TargetMacro {
    /// Macro text, `;`-separated.
    pub text: String,
    /// Monster names.
    #[serde(default)]
    pub targets: Vec<String>,
}

/// Declared combat behavior.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CombatSpec {
    /// Macro run at the start of every fight.
    #[serde(default)]
    pub start: Option<String>,
    /// Target-specific and default macros.
    #[serde(default, rename = "macro")]
    pub macros: Vec<TargetMacro>,
    /// Action for any monster without its own.
    #[serde(default)]
    pub default: Option<ScenarioAction>,
    /// Monster names per action.
    #[serde(default)]
    pub actions: HashMap<ScenarioAction, Vec<String>>,
}

/// A declared task.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TaskSpec {
    /// Task name, unqualified or `quest/task`.
    pub name: String,
    /// Direct prerequisites.
    #[serde(default)]
    pub after: Option<Vec<String>>,
    /// Completion predicate.
    pub completed: Condition,
    /// Extra availability gate.
    #[serde(default)]
    pub ready: Option<Condition>,
    /// The main action.
    #[serde(rename = "do")]
    pub perform: PerformSpec,
    /// Items to bring on hand.
    #[serde(default)]
    pub acquire: Vec<AcquireSpec>,
    /// Decision-point selections.
    #[serde(default)]
    pub choices: BTreeMap<u32, u32>,
    /// Retry/turn budget.
    #[serde(default)]
    pub limit: Option<Limit>,
    /// Requested loadout.
    #[serde(default)]
    pub outfit: Option<OutfitSpec>,
    /// Combat behavior.
    #[serde(default)]
    pub combat: Option<CombatSpec>,
}

/// A whole scenario file.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Scenario {
    /// Starting world.
    #[serde(default)]
    pub world: WorldSpec,
    /// Items usable as banishers, in preference order.
    #[serde(default)]
    pub banishers: Vec<String>,
    /// Items worn for every task that does not skip defaults.
    #[serde(default)]
    pub default_equip: Vec<String>,
    /// Preferred visitation order.
    #[serde(default)]
    pub route: Vec<String>,
    /// Tasks without `after` depend on the previous task.
    #[serde(default)]
    pub implicit_after: bool,
    /// Quests in declaration order.
    pub quests: Vec<QuestSpec>,
}

impl Scenario {
    /// Parses a scenario from YAML text.
    ///
    /// # Errors
    ///
    /// Returns [`ScenarioError::Parse`] for malformed input.
    pub fn from_yaml(text: &str) -> Result<Self, ScenarioError> {
        Ok(serde_yaml::from_str(text)?)
    }

    /// Reads and parses the scenario at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`ScenarioError::Io`] if the file cannot be read and
    /// [`ScenarioError::Parse`] for malformed input.
    pub fn load(path: &Path) -> Result<Self, ScenarioError> {
        let text = fs::read_to_string(path)
            .map_err(|source| ScenarioError::Io { path: path.display().to_string(), source })?;
        Self::from_yaml(&text)
    }

    /// Builds the starting world.
    #[must_use]
    pub fn world(&self) -> SimWorld {
        let spec = &self.world;
        let world = SimWorld::new();
        world.set_meat(spec.meat);
        for (item, count) in &spec.items {
            world.give(item, *count);
        }
        for (item, count) in &spec.storage {
            world.store(item, *count);
        }
        for (item, price) in &spec.shop {
            world.sell(item, *price);
        }
        for familiar in &spec.familiars {
            world.add_familiar(familiar);
        }
        for (key, value) in &spec.settings {
            world.set_setting(key, value);
        }
        for location in &spec.locations {
            world.add_location(&location.name, location.encounters.clone());
        }
        world
    }

    /// Builds the declared quests.
    ///
    /// # Errors
    ///
    /// Returns [`ScenarioError::UnknownMonster`] or
    /// [`ScenarioError::UnknownLocation`] for references the world cannot
    /// satisfy.
    pub fn quests(&self) -> Result<Vec<Quest<ScenarioAction>>, ScenarioError> {
        self.quests
            .iter()
            .map(|spec| {
                let tasks =
                    spec.tasks.iter().map(|t| self.build_task(t)).collect::<Result<_, _>>()?;
                let mut quest = Quest::new(spec.name.clone(), tasks);
                if let Some(completed) = spec.completed.clone() {
                    quest = quest.completed(completed.into_predicate());
                }
                if let Some(ready) = spec.ready.clone() {
                    quest = quest.ready(ready.into_predicate());
                }
                Ok(quest)
            })
            .collect()
    }

    /// Builds and flattens the declared quests.
    ///
    /// # Errors
    ///
    /// Fails like [`quests`](Self::quests) and with
    /// [`ScenarioError::Graph`] when a dependency does not resolve.
    pub fn tasks(&self) -> Result<Vec<Task<ScenarioAction>>, ScenarioError> {
        Ok(flatten(self.quests()?, self.implicit_after)?)
    }

    /// Engine hooks carrying the scenario's banishers and default equipment.
    #[must_use]
    pub fn hooks(&self) -> ScenarioHooks {
        ScenarioHooks {
            banishers: self.banishers.clone(),
            default_equip: self.default_equip.clone(),
        }
    }

    fn build_task(&self, spec: &TaskSpec) -> Result<Task<ScenarioAction>, ScenarioError> {
        let perform = match &spec.perform {
            PerformSpec::At(location) => {
                if !self.world.locations.iter().any(|l| l.name == location.name) {
                    return Err(ScenarioError::UnknownLocation {
                        task: spec.name.clone(),
                        location: location.name.clone(),
                    });
                }
                Perform::At(location.clone())
            }
            PerformSpec::Set { set } => {
                let set = set.clone();
                Perform::Call(Box::new(move |ctx: &WorldContext| {
                    for (key, value) in &set {
                        ctx.settings.set(key, value);
                    }
                    Ok(())
                }))
            }
        };

        let mut task = Task::new(spec.name.clone(), spec.completed.clone().into_predicate(), perform);
        task.after.clone_from(&spec.after);
        if let Some(ready) = spec.ready.clone() {
            task = task.ready(ready.into_predicate());
        }
        for acquire in &spec.acquire {
            let mut item = AcquireItem::new(acquire.item.clone());
            item.num = acquire.num;
            item.price = acquire.price;
            item.optional = acquire.optional;
            task = task.acquire(item);
        }
        for (id, option) in &spec.choices {
            task = task.choice(*id, *option);
        }
        if let Some(limit) = spec.limit.clone() {
            task = task.limit(limit);
        }
        if let Some(outfit) = spec.outfit.clone() {
            task = task.outfit(outfit);
        }
        if let Some(combat) = &spec.combat {
            task = task.combat(self.build_combat(&spec.name, combat)?);
        }
        Ok(task)
    }

    fn build_combat(
        &self,
        task: &str,
        spec: &CombatSpec,
    ) -> Result<CombatStrategy<ScenarioAction>, ScenarioError> {
        let mut strategy = CombatStrategy::new();
        if let Some(start) = &spec.start {
            strategy.start_with(Macro::raw(start));
        }
        for entry in &spec.macros {
            strategy.add_macro(Macro::raw(&entry.text), self.targets(task, &entry.targets)?);
        }
        for action in ScenarioAction::ALL {
            if let Some(names) = spec.actions.get(action) {
                strategy.action(*action, self.targets(task, names)?);
            }
        }
        if let Some(default) = spec.default {
            strategy.action(default, Targets::Any);
        }
        Ok(strategy)
    }

    fn targets(&self, task: &str, names: &[String]) -> Result<Targets, ScenarioError> {
        if names.is_empty() {
            return Ok(Targets::Any);
        }
        names
            .iter()
            .map(|name| {
                self.monster(name).ok_or_else(|| ScenarioError::UnknownMonster {
                    task: task.to_string(),
                    monster: name.clone(),
                })
            })
            .collect::<Result<Vec<_>, _>>()
            .map(Targets::Only)
    }

    fn monster(&self, name: &str) -> Option<Monster> {
        self.world
            .locations
            .iter()
            .flat_map(|l| &l.encounters)
            .find_map(|e| match &e.kind {
                EncounterKind::Monster(monster) if monster.name == name => Some(monster.clone()),
                _ => None,
            })
    }
}

/// Situational logic for scenario runs.
///
/// Provides the first banisher on hand whenever a task wants to banish,
/// and wears the default equipment unless the task opts out.
#[derive(Debug, Clone, Default)]
pub struct ScenarioHooks {
    banishers: Vec<String>,
    default_equip: Vec<String>,
}

impl EngineHooks<ScenarioAction> for ScenarioHooks {
    fn customize(
        &self,
        ctx: &WorldContext,
        _task: &Task<ScenarioAction>,
        outfit: &mut Outfit,
        combat: &mut CombatStrategy<ScenarioAction>,
        resources: &mut CombatResources<ScenarioAction>,
    ) -> Result<(), EngineError> {
        if combat.can(ScenarioAction::Banish) {
            if let Some(banisher) = self.banishers.iter().find(|b| ctx.inventory.item_count(b) > 0)
            {
                resources.provide(ScenarioAction::Banish, CombatResource::item(banisher.clone()));
            }
        }
        if !outfit.skip_defaults {
            for item in &self.default_equip {
                if ctx.inventory.item_count(item) + ctx.inventory.equipped_count(item) > 0 {
                    outfit.equip(item);
                }
            }
        }
        Ok(())
    }
}
