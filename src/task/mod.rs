//! Task and quest types.
//!
//! A [`Task`] is the unit of work the engine executes. Tasks are declared
//! inside [`Quest`]s and flattened into one namespaced list by
//! [`crate::graph::flatten`].

mod delayed;

use std::collections::BTreeMap;
use std::fmt;
use std::rc::Rc;

use serde::{Deserialize, Serialize};

use crate::combat::{Action, CombatStrategy};
use crate::context::WorldContext;
use crate::world::Location;

pub use delayed::Delayed;

/// A world-state predicate.
pub type Predicate = Box<dyn Fn(&WorldContext) -> bool>;

/// A predicate shared by every task of a quest.
pub type SharedPredicate = Rc<dyn Fn(&WorldContext) -> bool>;

/// A side-effecting callback. `Err` carries a human-readable reason.
pub type Hook = Box<dyn Fn(&WorldContext) -> Result<(), String>>;

/// What a task does once everything is prepared.
pub enum Perform {
    /// Act once at a location through the world's generic primitive.
    At(Location),
    /// Run a custom action.
    Call(Hook),
}

impl Perform {
    /// The targeted location, if this acts in place.
    #[must_use]
    pub fn location(&self) -> Option<&Location> {
        match self {
            Self::At(location) => Some(location),
            Self::Call(_) => None,
        }
    }
}

impl fmt::Debug for Perform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::At(location) => f.debug_tuple("At").field(location).finish(),
            Self::Call(_) => f.write_str("Call(..)"),
        }
    }
}

/// An item a task needs on hand before it acts.
pub struct AcquireItem {
    /// The item.
    pub item: String,
    /// How many are needed (default 1).
    pub num: Option<u32>,
    /// Buy from a shop, paying at most this much each.
    pub price: Option<u32>,
    /// Custom fetch routine, replacing buy/retrieve.
    pub get: Option<Hook>,
    /// Skip the entry entirely when this returns false.
    pub useful: Option<Predicate>,
    /// A shortfall after fetching is not fatal.
    pub optional: bool,
}

impl AcquireItem {
    /// Requires one `item`.
    pub fn new(item: impl Into<String>) -> Self {
        Self { item: item.into(), num: None, price: None, get: None, useful: None, optional: false }
    }

    /// Requires `num` copies.
    #[must_use]
    pub fn num(mut self, num: u32) -> Self {
        self.num = Some(num);
        self
    }

    /// Buys missing copies for at most `price` each.
    #[must_use]
    pub fn price(mut self, price: u32) -> Self {
        self.price = Some(price);
        self
    }

    /// Fetches with a custom routine.
    #[must_use]
    pub fn get(mut self, get: impl Fn(&WorldContext) -> Result<(), String> + 'static) -> Self {
        self.get = Some(Box::new(get));
        self
    }

    /// Only fetches while `useful` holds.
    #[must_use]
    pub fn useful(mut self, useful: impl Fn(&WorldContext) -> bool + 'static) -> Self {
        self.useful = Some(Box::new(useful));
        self
    }

    /// Tolerates failing to fetch.
    #[must_use]
    pub fn optional(mut self) -> Self {
        self.optional = true;
        self
    }

    /// Number of copies required.
    #[must_use]
    pub fn needed(&self) -> u32 {
        self.num.unwrap_or(1)
    }
}

/// Retry/turn budget for a task.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Limit {
    /// Fail once this many attempts have not completed the task.
    #[serde(default)]
    pub tries: Option<u32>,
    /// Fail once this many turns were spent at the task's location.
    #[serde(default)]
    pub turns: Option<u32>,
    /// Like `tries`, for tasks that can legitimately need many attempts.
    #[serde(default)]
    pub soft: Option<u32>,
    /// Extra diagnostic appended to the failure.
    #[serde(default)]
    pub message: Option<String>,
}

impl Limit {
    /// A hard attempt budget.
    #[must_use]
    pub fn tries(tries: u32) -> Self {
        Self { tries: Some(tries), ..Self::default() }
    }

    /// A soft attempt budget.
    #[must_use]
    pub fn soft(soft: u32) -> Self {
        Self { soft: Some(soft), ..Self::default() }
    }

    /// A turn budget at the task's location.
    #[must_use]
    pub fn turns(turns: u32) -> Self {
        Self { turns: Some(turns), ..Self::default() }
    }

    /// Attaches a diagnostic message.
    #[must_use]
    pub fn message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }
}

/// Loadout requested by a task.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutfitSpec {
    /// Items to wear.
    #[serde(default)]
    pub equip: Vec<String>,
    /// Companion to bring along.
    #[serde(default)]
    pub familiar: Option<String>,
    /// Preference modifier string handed to the loadout subsystem.
    #[serde(default)]
    pub modifier: Option<String>,
    /// Items never to wear for this task.
    #[serde(default)]
    pub avoid: Vec<String>,
    /// Do not add engine-default equipment.
    #[serde(default)]
    pub skip_defaults: bool,
}

/// The unit of work the engine executes.
pub struct Task<A: Action> {
    /// Unique (after namespacing) identity.
    pub name: String,
    /// Direct prerequisites. `None` means "no declared dependency".
    pub after: Option<Vec<String>>,
    /// Extra availability gate.
    pub ready: Option<Predicate>,
    /// Whether the task's goal already holds in the world.
    pub completed: Predicate,
    /// Runs right before the main action.
    pub prepare: Option<Hook>,
    /// The main action.
    pub perform: Perform,
    /// Runs right after the main action.
    pub post: Option<Hook>,
    /// Items to bring on hand first.
    pub acquire: Option<Vec<AcquireItem>>,
    /// Decision-point selections to register before acting.
    pub choices: Option<BTreeMap<u32, Delayed<u32>>>,
    /// Retry/turn budget.
    pub limit: Option<Limit>,
    /// Requested loadout.
    pub outfit: Option<Delayed<OutfitSpec>>,
    /// Combat behavior for encounters this task triggers.
    pub combat: Option<CombatStrategy<A>>,
}

impl<A: Action> Task<A> {
    /// Creates a task with the required fields; everything else is absent.
    pub fn new(
        name: impl Into<String>,
        completed: impl Fn(&WorldContext) -> bool + 'static,
        perform: Perform,
    ) -> Self {
        Self {
            name: name.into(),
            after: None,
            ready: None,
            completed: Box::new(completed),
            prepare: None,
            perform,
            post: None,
            acquire: None,
            choices: None,
            limit: None,
            outfit: None,
            combat: None,
        }
    }

    /// Declares direct prerequisites.
    #[must_use]
    pub fn after<I, S>(mut self, after: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.after = Some(after.into_iter().map(Into::into).collect());
        self
    }

    /// Gates availability on `ready`.
    #[must_use]
    pub fn ready(mut self, ready: impl Fn(&WorldContext) -> bool + 'static) -> Self {
        self.ready = Some(Box::new(ready));
        self
    }

    /// Runs `prepare` before acting.
    #[must_use]
    pub fn prepare(mut self, prepare: impl Fn(&WorldContext) -> Result<(), String> + 'static) -> Self {
        self.prepare = Some(Box::new(prepare));
        self
    }

    /// Runs `post` after acting.
    #[must_use]
    pub fn post(mut self, post: impl Fn(&WorldContext) -> Result<(), String> + 'static) -> Self {
        self.post = Some(Box::new(post));
        self
    }

    /// Requires `item` before acting.
    #[must_use]
    pub fn acquire(mut self, item: AcquireItem) -> Self {
        self.acquire.get_or_insert_with(Vec::new).push(item);
        self
    }

    /// Selects `option` at decision point `id`.
    #[must_use]
    pub fn choice(mut self, id: u32, option: impl Into<Delayed<u32>>) -> Self {
        self.choices.get_or_insert_with(BTreeMap::new).insert(id, option.into());
        self
    }

    /// Sets the retry/turn budget.
    #[must_use]
    pub fn limit(mut self, limit: Limit) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Requests a loadout.
    #[must_use]
    pub fn outfit(mut self, outfit: impl Into<Delayed<OutfitSpec>>) -> Self {
        self.outfit = Some(outfit.into());
        self
    }

    /// Attaches combat behavior.
    #[must_use]
    pub fn combat(mut self, combat: CombatStrategy<A>) -> Self {
        self.combat = Some(combat);
        self
    }

    /// Declared prerequisites, empty when none were declared.
    #[must_use]
    pub fn dependencies(&self) -> &[String] {
        self.after.as_deref().unwrap_or_default()
    }
}

impl<A: Action> fmt::Debug for Task<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Task")
            .field("name", &self.name)
            .field("after", &self.after)
            .field("perform", &self.perform)
            .field("limit", &self.limit)
            .finish_non_exhaustive()
    }
}

/// A named, ordered group of tasks. Only exists until flattening.
pub struct Quest<A: Action> {
    /// Namespace for the quest's tasks.
    pub name: String,
    /// Tasks in declaration order.
    pub tasks: Vec<Task<A>>,
    /// When true, every task of the quest counts as completed.
    pub completed: Option<SharedPredicate>,
    /// When false, no task of the quest is available.
    pub ready: Option<SharedPredicate>,
}

impl<A: Action> Quest<A> {
    /// Creates a quest from its tasks.
    pub fn new(name: impl Into<String>, tasks: Vec<Task<A>>) -> Self {
        Self { name: name.into(), tasks, completed: None, ready: None }
    }

    /// Marks every task completed once `completed` holds.
    #[must_use]
    pub fn completed(mut self, completed: impl Fn(&WorldContext) -> bool + 'static) -> Self {
        self.completed = Some(Rc::new(completed));
        self
    }

    /// Blocks every task until `ready` holds.
    #[must_use]
    pub fn ready(mut self, ready: impl Fn(&WorldContext) -> bool + 'static) -> Self {
        self.ready = Some(Rc::new(ready));
        self
    }
}
