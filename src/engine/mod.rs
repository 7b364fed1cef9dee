//! Task execution state machine.
//!
//! [`Engine::execute`] walks one task through a fixed sequence: acquire
//! items, build the loadout, let [`EngineHooks::customize`] adjust it,
//! dress, compile and save the combat macro, register choices, prepare
//! resources, prepare, act (repeating past wandering encounters), post,
//! then count the attempt and enforce the task's limit. The engine keeps
//! no cross-task memory besides the attempt counters.

mod properties;

use std::collections::{BTreeMap, HashMap};

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::combat::{Action, ActionDefaults, CombatResources, CombatStrategy};
use crate::context::WorldContext;
use crate::error::{EngineError, LimitKind};
use crate::outfit::Outfit;
use crate::ports::PortError;
use crate::task::{Perform, Task};

pub use properties::{PropertiesManager, ENGINE_PREFERENCES, QUIET_PREFERENCES};

/// Non-combat encounters that interrupt a location without advancing it.
/// A trailing `*` matches by prefix.
pub const WANDERING_NONCOMBATS: &[&str] = &[
    "Wooof! Wooooooof!",
    "Playing Fetch*",
    "A Pound of Cure",
    "Aunts not Ants",
    "Bath Time",
    "Beware of Aligator",
    "Delicious Sprouts",
    "Hypnotic Master",
    "Lost and Found",
    "Poetic Justice",
    "Summer Days",
    "Teacher's Pet",
];

/// Whether `encounter` is one of [`WANDERING_NONCOMBATS`].
#[must_use]
pub fn is_wandering(encounter: &str) -> bool {
    WANDERING_NONCOMBATS.iter().any(|known| match known.strip_suffix('*') {
        Some(prefix) => encounter.starts_with(prefix),
        None => encounter == *known,
    })
}

/// Situational logic injected into every execution.
pub trait EngineHooks<A: Action> {
    /// Adjusts the loadout, strategy and resources of `task` right before
    /// they are committed. Does nothing by default.
    ///
    /// # Errors
    ///
    /// Any error aborts the execution.
    fn customize(
        &self,
        _ctx: &WorldContext,
        _task: &Task<A>,
        _outfit: &mut Outfit,
        _combat: &mut CombatStrategy<A>,
        _resources: &mut CombatResources<A>,
    ) -> Result<(), EngineError> {
        Ok(())
    }
}

/// Hooks that change nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoHooks;

impl<A: Action> EngineHooks<A> for NoHooks {}

/// Engine-wide settings.
pub struct EngineOptions<A: Action> {
    /// Macro for an action no resource fulfils.
    pub combat_defaults: Option<Box<dyn ActionDefaults<A>>>,
    /// A loadout that cannot be fully worn is not fatal.
    pub allow_partial_outfits: bool,
    /// Name written to `customCombatScript`.
    pub combat_script: Option<String>,
    /// Extra preferences written after the engine's own table.
    pub default_settings: Vec<(String, String)>,
}

impl<A: Action> Default for EngineOptions<A> {
    fn default() -> Self {
        Self {
            combat_defaults: None,
            allow_partial_outfits: false,
            combat_script: None,
            default_settings: Vec::new(),
        }
    }
}

impl<A: Action> EngineOptions<A> {
    /// Falls back to `defaults` for actions without a resource.
    #[must_use]
    pub fn with_combat_defaults(mut self, defaults: impl ActionDefaults<A> + 'static) -> Self {
        self.combat_defaults = Some(Box::new(defaults));
        self
    }

    /// Tolerates loadouts that cannot be fully worn.
    #[must_use]
    pub fn allow_partial_outfits(mut self, allow: bool) -> Self {
        self.allow_partial_outfits = allow;
        self
    }

    /// Names the custom combat script.
    #[must_use]
    pub fn with_combat_script(mut self, name: impl Into<String>) -> Self {
        self.combat_script = Some(name.into());
        self
    }

    /// Writes `key = value` after the engine's own preferences.
    #[must_use]
    pub fn with_setting(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.default_settings.push((key.into(), value.into()));
        self
    }
}

/// Outcome of [`Engine::run`].
#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    /// When the loop started.
    pub started_at: DateTime<Utc>,
    /// When the loop stopped.
    pub finished_at: DateTime<Utc>,
    /// Executed task names, in order, one entry per execution.
    pub executed: Vec<String>,
    /// Tasks not completed when the loop stopped.
    pub remaining: Vec<String>,
    /// The loop stopped because the action cap was reached.
    pub capped: bool,
}

/// Executes tasks one at a time against a world.
///
/// Writes [`ENGINE_PREFERENCES`] on construction and restores every
/// touched preference when dropped.
pub struct Engine<'a, A: Action, H: EngineHooks<A> = NoHooks> {
    ctx: &'a WorldContext,
    tasks: Vec<Task<A>>,
    index: HashMap<String, usize>,
    attempts: HashMap<String, u32>,
    options: EngineOptions<A>,
    hooks: H,
    properties: PropertiesManager,
}

impl<'a, A: Action> Engine<'a, A> {
    /// Creates an engine without situational hooks.
    pub fn new(ctx: &'a WorldContext, tasks: Vec<Task<A>>, options: EngineOptions<A>) -> Self {
        Self::with_hooks(ctx, tasks, options, NoHooks)
    }
}

impl<'a, A: Action, H: EngineHooks<A>> Engine<'a, A, H> {
    /// Creates an engine that runs `hooks` during every execution.
    pub fn with_hooks(
        ctx: &'a WorldContext,
        tasks: Vec<Task<A>>,
        options: EngineOptions<A>,
        hooks: H,
    ) -> Self {
        let index = tasks.iter().enumerate().map(|(i, t)| (t.name.clone(), i)).collect();
        let properties = init_properties(ctx, &options);
        Self { ctx, tasks, index, attempts: HashMap::new(), options, hooks, properties }
    }

    /// Every task, in list order.
    #[must_use]
    pub fn tasks(&self) -> &[Task<A>] {
        &self.tasks
    }

    /// The task named `name`.
    #[must_use]
    pub fn task(&self, name: &str) -> Option<&Task<A>> {
        self.index.get(name).map(|&i| &self.tasks[i])
    }

    /// How many times `name` has been executed in this run.
    #[must_use]
    pub fn attempts(&self, name: &str) -> u32 {
        self.attempts.get(name).copied().unwrap_or(0)
    }

    /// Whether `task` may run now: every direct dependency is completed,
    /// `ready` holds (if present), and the task itself is not completed.
    ///
    /// Dependencies are checked directly, not transitively.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::UnknownDependency`] if a dependency names no
    /// task held by the engine.
    pub fn available(&self, task: &Task<A>) -> Result<bool, EngineError> {
        for dependency in task.dependencies() {
            let Some(&i) = self.index.get(dependency) else {
                return Err(EngineError::UnknownDependency {
                    dependency: dependency.clone(),
                    task: task.name.clone(),
                });
            };
            if !(self.tasks[i].completed)(self.ctx) {
                return Ok(false);
            }
        }
        if let Some(ready) = &task.ready {
            if !ready(self.ctx) {
                return Ok(false);
            }
        }
        Ok(!(task.completed)(self.ctx))
    }

    /// The first available task in list order.
    ///
    /// # Errors
    ///
    /// Propagates [`available`](Self::available) failures.
    pub fn next_task(&self) -> Result<Option<&Task<A>>, EngineError> {
        Ok(self.next_index()?.map(|i| &self.tasks[i]))
    }

    fn next_index(&self) -> Result<Option<usize>, EngineError> {
        for (i, task) in self.tasks.iter().enumerate() {
            if self.available(task)? {
                return Ok(Some(i));
            }
        }
        Ok(None)
    }

    /// Executes available tasks until none is left or `max_actions`
    /// executions have happened.
    ///
    /// # Errors
    ///
    /// Stops at the first failed execution.
    pub fn run(&mut self, max_actions: Option<usize>) -> Result<RunSummary, EngineError> {
        let started_at = Utc::now();
        let mut executed = Vec::new();
        let mut capped = false;
        while let Some(i) = self.next_index()? {
            if max_actions.is_some_and(|max| executed.len() >= max) {
                capped = true;
                break;
            }
            self.execute_at(i)?;
            executed.push(self.tasks[i].name.clone());
        }
        let remaining =
            self.tasks.iter().filter(|t| !(t.completed)(self.ctx)).map(|t| t.name.clone()).collect();
        info!(executed = executed.len(), capped, "run finished");
        Ok(RunSummary { started_at, finished_at: Utc::now(), executed, remaining, capped })
    }

    /// Executes the task named `name` once.
    ///
    /// # Errors
    ///
    /// Any failing step aborts the execution: missing items, an outfit
    /// that cannot be worn, failing hooks or world primitives, and an
    /// exhausted limit.
    pub fn execute(&mut self, name: &str) -> Result<(), EngineError> {
        let Some(&i) = self.index.get(name) else {
            return Err(EngineError::UnknownTask { task: name.to_string() });
        };
        self.execute_at(i)
    }

    fn execute_at(&mut self, i: usize) -> Result<(), EngineError> {
        let ctx = self.ctx;
        let task = &self.tasks[i];
        info!(task = %task.name, "executing");

        self.acquire(task)?;

        let (mut outfit, complete) = match &task.outfit {
            Some(spec) => Outfit::from_spec(&spec.resolve(ctx)),
            None => (Outfit::new(), true),
        };
        if !complete && !self.options.allow_partial_outfits {
            return Err(EngineError::Outfit { task: task.name.clone() });
        }

        let mut combat = task.combat.clone().unwrap_or_default();
        let mut resources = CombatResources::new();
        self.hooks.customize(ctx, task, &mut outfit, &mut combat, &mut resources)?;

        debug!(task = %task.name, equips = ?outfit.equips, "dressing");
        if !ctx.loadout.dress(&outfit) && !self.options.allow_partial_outfits {
            return Err(EngineError::Outfit { task: task.name.clone() });
        }

        let script = combat.compile(
            ctx,
            &resources,
            self.options.combat_defaults.as_deref(),
            task.perform.location(),
        );
        debug!(task = %task.name, branches = script.branch_count(), %script, "saving macro");
        ctx.macros.save(&script).map_err(port_error(task, "save macro"))?;
        if let Some(choices) = &task.choices {
            let resolved: BTreeMap<u32, u32> =
                choices.iter().map(|(id, choice)| (*id, choice.resolve(ctx))).collect();
            ctx.choices.set_choices(&resolved);
        }

        for resource in resources.all() {
            if let Some(prepare) = &resource.prepare {
                prepare(ctx).map_err(hook_error(task))?;
            }
        }
        if let Some(prepare) = &task.prepare {
            prepare(ctx).map_err(hook_error(task))?;
        }

        loop {
            act(ctx, task)?;
            if task.perform.location().is_none() {
                break;
            }
            let encounter = ctx.adventure.last_encounter();
            if !is_wandering(&encounter) {
                break;
            }
            debug!(task = %task.name, %encounter, "wandering encounter, acting again");
        }

        if let Some(post) = &task.post {
            post(ctx).map_err(hook_error(task))?;
        }

        let attempts = self.attempts.entry(task.name.clone()).or_insert(0);
        *attempts += 1;
        let attempts = *attempts;
        if !(task.completed)(ctx) {
            if let Some(limit) = check_limit(ctx, task, attempts) {
                return Err(EngineError::LimitExceeded {
                    task: task.name.clone(),
                    limit,
                    message: task.limit.as_ref().and_then(|l| l.message.clone()),
                });
            }
        }
        Ok(())
    }

    fn acquire(&self, task: &Task<A>) -> Result<(), EngineError> {
        let ctx = self.ctx;
        for entry in task.acquire.iter().flatten() {
            let needed = entry.needed();
            let have =
                || ctx.inventory.item_count(&entry.item) + ctx.inventory.equipped_count(&entry.item);
            let on_hand = have();
            if on_hand >= needed {
                continue;
            }
            if entry.useful.as_ref().is_some_and(|useful| !useful(ctx)) {
                continue;
            }

            debug!(task = %task.name, item = %entry.item, needed, on_hand, "acquiring");
            if let Some(get) = &entry.get {
                get(ctx).map_err(hook_error(task))?;
            } else if let Some(price) = entry.price {
                ctx.inventory
                    .buy(&entry.item, needed - on_hand, price)
                    .map_err(port_error(task, "buy"))?;
            } else {
                // Retrieval targets the bag; worn copies already count toward `needed`.
                let target = ctx.inventory.item_count(&entry.item) + (needed - on_hand);
                ctx.inventory.retrieve(&entry.item, target).map_err(port_error(task, "retrieve"))?;
            }

            if have() < needed {
                if entry.optional {
                    warn!(task = %task.name, item = %entry.item, needed, "optional item not acquired");
                } else {
                    return Err(EngineError::UnableToAcquire {
                        task: task.name.clone(),
                        item: entry.item.clone(),
                        needed,
                    });
                }
            }
        }
        Ok(())
    }
}

impl<A: Action, H: EngineHooks<A>> Drop for Engine<'_, A, H> {
    fn drop(&mut self) {
        debug!("restoring preferences");
        self.properties.restore(self.ctx.settings.as_ref());
    }
}

fn init_properties<A: Action>(ctx: &WorldContext, options: &EngineOptions<A>) -> PropertiesManager {
    let store = ctx.settings.as_ref();
    let mut properties = PropertiesManager::new();
    properties.set_all(store, ENGINE_PREFERENCES.iter().copied());
    properties.extend_list(store, "logPreferenceChangeFilter", QUIET_PREFERENCES);
    if let Some(script) = &options.combat_script {
        properties.set(store, "customCombatScript", script);
    }
    properties.set_all(
        store,
        options.default_settings.iter().map(|(k, v)| (k.as_str(), v.as_str())),
    );
    properties
}

/// Performs the task's main action once and resolves whatever it triggered.
fn act<A: Action>(ctx: &WorldContext, task: &Task<A>) -> Result<(), EngineError> {
    match &task.perform {
        Perform::At(location) => {
            ctx.adventure.adventure(location).map_err(port_error(task, "adventure"))?;
        }
        Perform::Call(action) => action(ctx).map_err(hook_error(task))?,
    }
    ctx.adventure.run_combat().map_err(port_error(task, "combat"))?;
    while ctx.adventure.in_multi_fight() {
        ctx.adventure.run_combat().map_err(port_error(task, "combat"))?;
    }
    if ctx.adventure.choice_follows_fight() {
        ctx.adventure.run_choice(-1).map_err(port_error(task, "choice"))?;
    }
    Ok(())
}

fn check_limit<A: Action>(ctx: &WorldContext, task: &Task<A>, attempts: u32) -> Option<LimitKind> {
    let limit = task.limit.as_ref()?;
    if let Some(tries) = limit.tries.filter(|&tries| attempts >= tries) {
        return Some(LimitKind::Tries(tries));
    }
    if let Some(soft) = limit.soft.filter(|&soft| attempts >= soft) {
        return Some(LimitKind::Soft(soft));
    }
    if let (Some(turns), Some(location)) = (limit.turns, task.perform.location()) {
        if ctx.adventure.turns_spent(location) >= turns {
            return Some(LimitKind::Turns(turns));
        }
    }
    None
}

fn hook_error<A: Action>(task: &Task<A>) -> impl FnOnce(String) -> EngineError + '_ {
    move |message| EngineError::Hook { task: task.name.clone(), message }
}

fn port_error<'a, A: Action>(
    task: &'a Task<A>,
    operation: &'static str,
) -> impl FnOnce(PortError) -> EngineError + 'a {
    move |source| EngineError::Port { task: task.name.clone(), operation, source }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;
    use std::rc::Rc;

    use super::*;
    use crate::adapters::sim::{Encounter, SimWorld};
    use crate::combat::{CombatResource, Macro, Targets};
    use crate::graph::flatten;
    use crate::task::{AcquireItem, Delayed, Limit, OutfitSpec, Quest};
    use crate::world::{CombatTarget, Location, Monster};

    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    enum Act {
        Kill,
        Banish,
    }

    fn attack_until_done(action: Act, _target: CombatTarget<'_>) -> Macro {
        match action {
            Act::Kill => Macro::new().attack().repeat(),
            Act::Banish => Macro::new().run_away(),
        }
    }

    fn forest() -> Location {
        Location::new("The Spooky Forest")
    }

    fn setting_is(key: &'static str, value: &'static str) -> impl Fn(&WorldContext) -> bool {
        move |ctx| ctx.settings.get(key).as_deref() == Some(value)
    }

    fn world_with_forest(encounters: Vec<Encounter>) -> SimWorld {
        let world = SimWorld::new();
        world.add_location("The Spooky Forest", encounters);
        world
    }

    #[test]
    fn tries_limit_fails_on_the_third_attempt() {
        let world = world_with_forest(vec![]);
        let ctx = WorldContext::simulated(&world);
        let tasks = vec![Task::<Act>::new("Q/never", |_| false, Perform::At(forest()))
            .limit(Limit::tries(3).message("Is the forest open?"))];
        let mut engine = Engine::new(&ctx, tasks, EngineOptions::default());

        engine.execute("Q/never").unwrap();
        engine.execute("Q/never").unwrap();
        let err = engine.execute("Q/never").unwrap_err();

        assert_eq!(engine.attempts("Q/never"), 3);
        match err {
            EngineError::LimitExceeded { task, limit, message } => {
                assert_eq!(task, "Q/never");
                assert_eq!(limit, LimitKind::Tries(3));
                assert_eq!(message.as_deref(), Some("Is the forest open?"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn soft_and_turn_limits() {
        let world = world_with_forest(vec![]);
        let ctx = WorldContext::simulated(&world);
        let tasks = vec![
            Task::<Act>::new("Q/soft", |_| false, Perform::Call(Box::new(|_| Ok(()))))
                .limit(Limit::soft(1)),
            Task::new("Q/turns", |_| false, Perform::At(forest())).limit(Limit::turns(2)),
        ];
        let mut engine = Engine::new(&ctx, tasks, EngineOptions::default());

        let err = engine.execute("Q/soft").unwrap_err();
        assert!(err.to_string().contains("unlucky"));

        engine.execute("Q/turns").unwrap();
        let err = engine.execute("Q/turns").unwrap_err();
        assert!(matches!(err, EngineError::LimitExceeded { limit: LimitKind::Turns(2), .. }));
    }

    #[test]
    fn turn_limit_ignores_callback_tasks() {
        let world = world_with_forest(vec![]);
        let ctx = WorldContext::simulated(&world);
        let tasks = vec![Task::<Act>::new("Q/call", |_| false, Perform::Call(Box::new(|_| Ok(()))))
            .limit(Limit::turns(1))];
        let mut engine = Engine::new(&ctx, tasks, EngineOptions::default());

        for _ in 0..3 {
            engine.execute("Q/call").unwrap();
        }
        assert_eq!(engine.attempts("Q/call"), 3);
    }

    #[test]
    fn limit_is_skipped_once_completed() {
        let world = world_with_forest(vec![Encounter::noncombat("Arboreal Respite")
            .sets("questL02Larva", "finished")]);
        let ctx = WorldContext::simulated(&world);
        let tasks = vec![Task::<Act>::new(
            "Q/larva",
            setting_is("questL02Larva", "finished"),
            Perform::At(forest()),
        )
        .limit(Limit::tries(1))];
        let mut engine = Engine::new(&ctx, tasks, EngineOptions::default());

        engine.execute("Q/larva").unwrap();
        assert_eq!(engine.attempts("Q/larva"), 1);
    }

    #[test]
    fn available_checks_dependencies_ready_and_completion() {
        let world = SimWorld::new();
        let ctx = WorldContext::simulated(&world);
        let tasks = flatten(
            vec![Quest::new(
                "Q",
                vec![
                    Task::<Act>::new("a", setting_is("a", "done"), Perform::At(forest())),
                    Task::new("b", setting_is("b", "done"), Perform::At(forest()))
                        .after(["a"])
                        .ready(setting_is("open", "yes")),
                    Task::new("c", |_| true, Perform::At(forest())),
                ],
            )],
            false,
        )
        .unwrap();
        let engine = Engine::new(&ctx, tasks, EngineOptions::default());
        let task = |name| engine.task(name).unwrap();

        assert!(engine.available(task("Q/a")).unwrap());
        assert!(!engine.available(task("Q/b")).unwrap());
        assert!(!engine.available(task("Q/c")).unwrap());

        world.set_setting("a", "done");
        assert!(!engine.available(task("Q/b")).unwrap());
        world.set_setting("open", "yes");
        assert!(engine.available(task("Q/b")).unwrap());
        assert_eq!(engine.next_task().unwrap().map(|t| t.name.as_str()), Some("Q/b"));
    }

    #[test]
    fn available_reports_unknown_dependency() {
        let world = SimWorld::new();
        let ctx = WorldContext::simulated(&world);
        let tasks = vec![Task::<Act>::new("Q/a", |_| false, Perform::At(forest())).after(["Q/zz"])];
        let engine = Engine::new(&ctx, tasks, EngineOptions::default());

        let err = engine.available(&engine.tasks()[0]).unwrap_err();
        assert!(matches!(err, EngineError::UnknownDependency { ref dependency, .. } if dependency == "Q/zz"));
    }

    #[test]
    fn acquire_buys_retrieves_and_tolerates_optional() {
        let world = world_with_forest(vec![]);
        world.set_meat(100);
        world.sell("chewing gum on a string", 30);
        world.store("spooky sapling", 1);
        let ctx = WorldContext::simulated(&world);
        let tasks = vec![Task::<Act>::new("Q/shop", |_| false, Perform::Call(Box::new(|_| Ok(()))))
            .acquire(AcquireItem::new("chewing gum on a string").num(2).price(50))
            .acquire(AcquireItem::new("spooky sapling"))
            .acquire(AcquireItem::new("Staff of Fats").optional())
            .acquire(AcquireItem::new("wand of nagamar").useful(|_| false))];
        let mut engine = Engine::new(&ctx, tasks, EngineOptions::default());

        engine.execute("Q/shop").unwrap();
        assert_eq!(ctx.inventory.item_count("chewing gum on a string"), 2);
        assert_eq!(ctx.inventory.item_count("spooky sapling"), 1);
        assert_eq!(world.meat(), 40);
    }

    #[test]
    fn worn_copies_count_toward_needed() {
        let world = world_with_forest(vec![]);
        world.set_meat(100);
        world.give("hand towel", 1);
        world.store("hand towel", 5);
        world.sell("hand towel", 10);
        let ctx = WorldContext::simulated(&world);
        let mut worn = Outfit::new();
        worn.equip("hand towel");
        assert!(ctx.loadout.dress(&worn));

        let towel = OutfitSpec { equip: vec!["hand towel".to_string()], ..OutfitSpec::default() };
        let tasks = vec![
            Task::<Act>::new("Q/one", |_| false, Perform::Call(Box::new(|_| Ok(()))))
                .acquire(AcquireItem::new("hand towel"))
                .outfit(towel.clone()),
            Task::new("Q/two", |_| false, Perform::Call(Box::new(|_| Ok(()))))
                .acquire(AcquireItem::new("hand towel").num(2))
                .outfit(towel),
        ];
        let mut engine = Engine::new(&ctx, tasks, EngineOptions::default());

        engine.execute("Q/one").unwrap();
        let journal = world.journal();
        assert!(!journal.iter().any(|e| e.starts_with("retrieve") || e.starts_with("buy")));

        engine.execute("Q/two").unwrap();
        assert_eq!(ctx.inventory.equipped_count("hand towel"), 1);
        assert_eq!(ctx.inventory.item_count("hand towel"), 1);
        assert_eq!(world.meat(), 100);
        assert!(world.journal().contains(&"retrieve 1 hand towel".to_string()));
    }

    #[test]
    fn missing_required_item_aborts() {
        let world = SimWorld::new();
        let ctx = WorldContext::simulated(&world);
        let fetched = Rc::new(Cell::new(false));
        let flag = Rc::clone(&fetched);
        let tasks = vec![Task::<Act>::new("Q/key", |_| false, Perform::At(forest())).acquire(
            AcquireItem::new("skeleton key").get(move |_| {
                flag.set(true);
                Ok(())
            }),
        )];
        let mut engine = Engine::new(&ctx, tasks, EngineOptions::default());

        let err = engine.execute("Q/key").unwrap_err();
        assert!(fetched.get());
        assert!(matches!(err, EngineError::UnableToAcquire { ref item, needed: 1, .. } if item == "skeleton key"));
        assert_eq!(engine.attempts("Q/key"), 0);
    }

    #[test]
    fn wandering_encounters_repeat_the_action() {
        let world = world_with_forest(vec![
            Encounter::noncombat("Bath Time"),
            Encounter::noncombat("Playing Fetch with Your Dog"),
            Encounter::noncombat("Arboreal Respite").sets("questL02Larva", "finished"),
        ]);
        let ctx = WorldContext::simulated(&world);
        let tasks = vec![Task::<Act>::new(
            "Q/larva",
            setting_is("questL02Larva", "finished"),
            Perform::At(forest()),
        )];
        let mut engine = Engine::new(&ctx, tasks, EngineOptions::default());

        engine.execute("Q/larva").unwrap();
        assert_eq!(ctx.adventure.turns_spent(&forest()), 3);
        assert_eq!(engine.attempts("Q/larva"), 1);
    }

    #[test]
    fn multi_stage_fight_resolves_with_saved_macro_and_choices() {
        let world = world_with_forest(vec![Encounter::fight(Monster::new(80, "ninja snowman"))
            .stages(3)
            .then_choice()
            .gated(502, 2)
            .gives("ninja rope", 1)]);
        let ctx = WorldContext::simulated(&world);
        let mut combat = CombatStrategy::new();
        combat.action(Act::Kill, Targets::Any);
        let tasks = vec![Task::new("Q/rope", |_| false, Perform::At(forest()))
            .combat(combat)
            .choice(502, 2)
            .choice(503, Delayed::<u32>::deferred(|_| 1))];
        let options = EngineOptions::default().with_combat_defaults(attack_until_done);
        let mut engine = Engine::new(&ctx, tasks, options);

        engine.execute("Q/rope").unwrap();
        assert_eq!(world.saved_macro().as_deref(), Some("attack;repeat"));
        assert_eq!(world.choice(502), Some(2));
        assert_eq!(world.choice(503), Some(1));
        assert_eq!(ctx.inventory.item_count("ninja rope"), 1);
        let journal = world.journal();
        assert_eq!(journal.iter().filter(|e| e.starts_with("fight ninja snowman")).count(), 3);
        assert!(journal.contains(&"choice -1".to_string()));
    }

    struct Banisher;

    impl EngineHooks<Act> for Banisher {
        fn customize(
            &self,
            _ctx: &WorldContext,
            _task: &Task<Act>,
            outfit: &mut Outfit,
            combat: &mut CombatStrategy<Act>,
            resources: &mut CombatResources<Act>,
        ) -> Result<(), EngineError> {
            if combat.can(Act::Banish) {
                resources.provide(
                    Act::Banish,
                    CombatResource::item("louder than bomb").with_prepare(|ctx| {
                        ctx.settings.set("banisherReady", "true");
                        Ok(())
                    }),
                );
            }
            outfit.equip("hand towel");
            Ok(())
        }
    }

    #[test]
    fn customize_provides_resources_and_equipment() {
        let world = world_with_forest(vec![Encounter::fight(Monster::new(2, "pygmy janitor"))]);
        world.give("hand towel", 1);
        let ctx = WorldContext::simulated(&world);
        let mut combat = CombatStrategy::new();
        combat.action(Act::Banish, Monster::new(2, "pygmy janitor"));
        let tasks = vec![Task::new("Q/janitor", |_| false, Perform::At(forest())).combat(combat)];
        let options = EngineOptions::default().with_combat_defaults(attack_until_done);
        let mut engine = Engine::with_hooks(&ctx, tasks, options, Banisher);

        engine.execute("Q/janitor").unwrap();
        assert_eq!(
            world.saved_macro().as_deref(),
            Some("if monsterid 2;use louder than bomb;endif")
        );
        assert_eq!(world.setting("banisherReady").as_deref(), Some("true"));
        assert_eq!(ctx.inventory.equipped_count("hand towel"), 1);
    }

    struct TwoResources;

    fn append_order(ctx: &WorldContext, entry: &str) {
        let order = ctx.settings.get("prepareOrder").unwrap_or_default();
        ctx.settings.set("prepareOrder", &format!("{order}{entry};"));
    }

    impl EngineHooks<Act> for TwoResources {
        fn customize(
            &self,
            _ctx: &WorldContext,
            _task: &Task<Act>,
            _outfit: &mut Outfit,
            _combat: &mut CombatStrategy<Act>,
            resources: &mut CombatResources<Act>,
        ) -> Result<(), EngineError> {
            resources.provide(
                Act::Kill,
                CombatResource::skill("Saucestorm").with_prepare(|ctx| {
                    append_order(ctx, "saucestorm");
                    Ok(())
                }),
            );
            resources.provide(
                Act::Banish,
                CombatResource::item("louder than bomb").with_prepare(|ctx| {
                    append_order(ctx, "bomb");
                    Ok(())
                }),
            );
            Ok(())
        }
    }

    #[test]
    fn resource_preparation_follows_insertion_order() {
        let world = world_with_forest(vec![]);
        let ctx = WorldContext::simulated(&world);
        let tasks = vec![Task::<Act>::new("Q/prep", |_| false, Perform::Call(Box::new(|_| Ok(()))))
            .prepare(|ctx| {
                append_order(ctx, "task");
                Ok(())
            })];
        let mut engine = Engine::with_hooks(&ctx, tasks, EngineOptions::default(), TwoResources);

        engine.execute("Q/prep").unwrap();
        assert_eq!(world.setting("prepareOrder").as_deref(), Some("saucestorm;bomb;task;"));
    }

    #[test]
    fn unwearable_outfit_fails_unless_partial_allowed() {
        let world = world_with_forest(vec![]);
        let ctx = WorldContext::simulated(&world);
        let outfit = OutfitSpec { equip: vec!["Jurassic Parka".to_string()], ..OutfitSpec::default() };
        let task = || {
            vec![Task::<Act>::new("Q/parka", |_| false, Perform::At(forest())).outfit(outfit.clone())]
        };

        let mut strict = Engine::new(&ctx, task(), EngineOptions::default());
        assert!(matches!(strict.execute("Q/parka"), Err(EngineError::Outfit { .. })));
        drop(strict);

        let mut lenient = Engine::new(&ctx, task(), EngineOptions::default().allow_partial_outfits(true));
        assert!(lenient.execute("Q/parka").is_ok());
    }

    #[test]
    fn failing_hook_aborts_with_its_message() {
        let world = SimWorld::new();
        let ctx = WorldContext::simulated(&world);
        let tasks = vec![Task::<Act>::new("Q/hook", |_| false, Perform::Call(Box::new(|_| Ok(()))))
            .prepare(|_| Err("no adventures left".to_string()))];
        let mut engine = Engine::new(&ctx, tasks, EngineOptions::default());

        let err = engine.execute("Q/hook").unwrap_err();
        assert_eq!(err.to_string(), "Task Q/hook failed: no adventures left");
        assert!(matches!(engine.execute("Q/missing"), Err(EngineError::UnknownTask { .. })));
    }

    #[test]
    fn preferences_are_written_and_restored() {
        let world = SimWorld::new();
        world.set_setting("currentMood", "default");
        let ctx = WorldContext::simulated(&world);
        {
            let options = EngineOptions::<Act>::default()
                .with_combat_script("questline")
                .with_setting("currentMood", "meat");
            let _engine = Engine::new(&ctx, Vec::new(), options);
            assert_eq!(world.setting("battleAction").as_deref(), Some("custom combat script"));
            assert_eq!(world.setting("customCombatScript").as_deref(), Some("questline"));
            assert_eq!(world.setting("currentMood").as_deref(), Some("meat"));
            assert!(world
                .setting("logPreferenceChangeFilter")
                .is_some_and(|f| f.contains("libram_savedMacro")));
        }
        assert_eq!(world.setting("currentMood").as_deref(), Some("default"));
        assert_eq!(world.setting("battleAction").as_deref(), Some(""));
    }

    #[test]
    fn run_executes_in_list_order_until_done() {
        let world = world_with_forest(vec![
            Encounter::noncombat("Arboreal Respite").sets("a", "done"),
            Encounter::noncombat("Consciousness of a Stream").sets("b", "done"),
        ]);
        let ctx = WorldContext::simulated(&world);
        let tasks = flatten(
            vec![Quest::new(
                "Q",
                vec![
                    Task::<Act>::new("b", setting_is("b", "done"), Perform::At(forest())).after(["a"]),
                    Task::new("a", setting_is("a", "done"), Perform::At(forest())),
                ],
            )],
            false,
        )
        .unwrap();
        let mut engine = Engine::new(&ctx, tasks, EngineOptions::default());

        let summary = engine.run(None).unwrap();
        assert_eq!(summary.executed, vec!["Q/a", "Q/b"]);
        assert!(summary.remaining.is_empty());
        assert!(!summary.capped);
        assert!(summary.finished_at >= summary.started_at);
    }

    #[test]
    fn run_stops_at_action_cap() {
        let world = world_with_forest(vec![]);
        let ctx = WorldContext::simulated(&world);
        let tasks = vec![Task::<Act>::new("Q/never", |_| false, Perform::At(forest()))];
        let mut engine = Engine::new(&ctx, tasks, EngineOptions::default());

        let summary = engine.run(Some(2)).unwrap();
        assert_eq!(summary.executed.len(), 2);
        assert_eq!(summary.remaining, vec!["Q/never"]);
        assert!(summary.capped);
    }

    #[test]
    fn run_is_not_capped_when_nothing_is_left() {
        let world = world_with_forest(vec![Encounter::noncombat("Arboreal Respite").sets("a", "done")]);
        let ctx = WorldContext::simulated(&world);
        let tasks = vec![Task::<Act>::new("Q/a", setting_is("a", "done"), Perform::At(forest()))];
        let mut engine = Engine::new(&ctx, tasks, EngineOptions::default());

        let summary = engine.run(Some(1)).unwrap();
        assert_eq!(summary.executed, vec!["Q/a"]);
        assert!(!summary.capped);
    }

    #[test]
    fn run_executes_the_selected_task_among_duplicates() {
        let world = SimWorld::new();
        let ctx = WorldContext::simulated(&world);
        let tasks = vec![
            Task::<Act>::new("Q/a", setting_is("first", "1"), Perform::Call(Box::new(|ctx| {
                ctx.settings.set("first", "1");
                Ok(())
            }))),
            Task::new("Q/a", setting_is("second", "1"), Perform::Call(Box::new(|ctx| {
                ctx.settings.set("second", "1");
                Ok(())
            }))),
        ];
        let mut engine = Engine::new(&ctx, tasks, EngineOptions::default());

        let summary = engine.run(Some(5)).unwrap();
        assert_eq!(summary.executed, vec!["Q/a", "Q/a"]);
        assert_eq!(world.setting("first").as_deref(), Some("1"));
        assert_eq!(world.setting("second").as_deref(), Some("1"));
    }
}
