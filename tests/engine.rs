//! End-to-end engine behavior through the public library API.

use questline::adapters::sim::{Encounter, SimWorld};
use questline::combat::{CombatStrategy, Macro, Targets};
use questline::engine::{Engine, EngineOptions};
use questline::error::EngineError;
use questline::graph::flatten;
use questline::route::order_by_route;
use questline::task::{Limit, Perform, Quest, Task};
use questline::world::{CombatTarget, Location, Monster};
use questline::WorldContext;

questline::combat_actions! {
    enum Act: ActMethods {
        Kill => kill,
        Flee => flee,
    }
}

fn default_macro(action: Act, _target: CombatTarget<'_>) -> Macro {
    match action {
        Act::Kill => Macro::new().attack().repeat(),
        Act::Flee => Macro::new().run_away(),
    }
}

fn done(key: &'static str) -> impl Fn(&WorldContext) -> bool {
    move |ctx| ctx.settings.get(key).is_some()
}

fn cellar() -> Location {
    Location::new("The Typical Tavern Cellar")
}

#[test]
fn routed_quests_run_to_completion() {
    let world = SimWorld::new();
    world.add_location(
        "The Typical Tavern Cellar",
        vec![
            Encounter::fight(Monster::new(11, "drunken rat")),
            Encounter::fight(Monster::new(12, "Baron von Ratsworth")).sets("ratsDone", "yes"),
        ],
    );
    let ctx = WorldContext::simulated(&world);

    assert_eq!(Act::ALL, &[Act::Kill, Act::Flee]);
    let mut rats: CombatStrategy<Act> = CombatStrategy::new();
    rats.flee(Monster::new(11, "drunken rat")).kill(Targets::Any);
    let quests = vec![
        Quest::new(
            "Tavern",
            vec![
                Task::new("start", done("tavernStarted"), Perform::Call(Box::new(|ctx| {
                    ctx.settings.set("tavernStarted", "yes");
                    Ok(())
                }))),
                Task::new("rats", done("ratsDone"), Perform::At(cellar()))
                    .combat(rats)
                    .limit(Limit::tries(3)),
            ],
        ),
        Quest::new("Misc", vec![Task::new("idle", |_| true, Perform::At(cellar()))]),
    ];
    let tasks = flatten(quests, true).unwrap();
    let tasks = order_by_route(tasks, &["Tavern/rats"], false).unwrap();

    let options = EngineOptions::default().with_combat_defaults(default_macro);
    let mut engine = Engine::new(&ctx, tasks, options);
    let summary = engine.run(Some(10)).unwrap();

    assert_eq!(summary.executed, vec!["Tavern/start", "Tavern/rats", "Tavern/rats"]);
    assert!(summary.remaining.is_empty());
    assert_eq!(
        world.saved_macro().as_deref(),
        Some("if monsterid 11;runaway;endif;attack;repeat")
    );
    assert_eq!(engine.attempts("Tavern/rats"), 2);
}

#[test]
fn limit_failure_carries_task_and_budget() {
    let world = SimWorld::new();
    world.add_location("The Typical Tavern Cellar", vec![Encounter::noncombat("Bath Time")]);
    let ctx = WorldContext::simulated(&world);
    let tasks = vec![Task::<Act>::new("Tavern/rats", |_| false, Perform::Call(Box::new(|_| Ok(()))))
        .limit(Limit::tries(1))];
    let mut engine = Engine::new(&ctx, tasks, EngineOptions::default());

    let err = engine.run(None).unwrap_err();
    assert!(matches!(err, EngineError::LimitExceeded { ref task, .. } if task == "Tavern/rats"));
    assert_eq!(err.task(), Some("Tavern/rats"));
}
