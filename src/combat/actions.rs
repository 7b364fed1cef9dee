//! Method-per-action sugar for [`CombatStrategy`](super::CombatStrategy).
//!
//! [`combat_actions!`](crate::combat_actions) declares a closed set of
//! action tokens and derives an extension trait with one fluent method
//! per token, each forwarding to `CombatStrategy::action`:
//!
//! ```
//! use questline::combat::{CombatStrategy, Targets};
//! use questline::world::Monster;
//!
//! questline::combat_actions! {
//!     /// What our tasks know how to do in a fight.
//!     pub enum Act: ActMethods {
//!         Kill => kill,
//!         Banish => banish,
//!     }
//! }
//!
//! let mut strategy: CombatStrategy<Act> = CombatStrategy::new();
//! strategy.banish(Monster::new(7, "pygmy janitor")).kill(Targets::Any);
//! assert!(strategy.can(Act::Banish));
//! assert_eq!(Act::ALL.len(), 2);
//! ```
//!
//! Method names that would shadow the strategy's own API fail to compile.

/// Method names already taken by `CombatStrategy`, including those it
/// gets from derived and blanket trait impls.
pub const RESERVED_METHODS: &[&str] = &[
    "action",
    "add_macro",
    "prepend_macro",
    "start_with",
    "can",
    "where_",
    "current_action",
    "compile",
    "new",
    "default",
    "clone",
    "clone_from",
    "fmt",
    "to_owned",
    "clone_into",
    "into",
    "from",
    "try_into",
    "try_from",
    "borrow",
    "borrow_mut",
    "type_id",
];

/// Whether `name` is one of [`RESERVED_METHODS`].
#[must_use]
pub const fn is_reserved(name: &str) -> bool {
    let mut i = 0;
    while i < RESERVED_METHODS.len() {
        if str_eq(RESERVED_METHODS[i], name) {
            return true;
        }
        i += 1;
    }
    false
}

const fn str_eq(a: &str, b: &str) -> bool {
    let (a, b) = (a.as_bytes(), b.as_bytes());
    if a.len() != b.len() {
        return false;
    }
    let mut i = 0;
    while i < a.len() {
        if a[i] != b[i] {
            return false;
        }
        i += 1;
    }
    true
}

/// Declares an action enum plus a trait of per-action strategy methods.
///
/// See the [module docs](crate::combat::actions) for an example.
#[macro_export]
macro_rules! combat_actions {
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident : $methods:ident {
            $($variant:ident => $method:ident),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        $vis enum $name {
            $(
                #[doc = concat!("The `", stringify!($method), "` action.")]
                $variant,
            )+
        }

        impl $name {
            /// Every action, in declaration order.
            $vis const ALL: &'static [$name] = &[$($name::$variant),+];
        }

        #[doc = concat!("One strategy method per [`", stringify!($name), "`] action.")]
        $vis trait $methods {
            $(
                #[doc = concat!("Shorthand for `action(", stringify!($name), "::", stringify!($variant), ", targets)`.")]
                fn $method(&mut self, targets: impl Into<$crate::combat::Targets>) -> &mut Self;
            )+
        }

        impl $methods for $crate::combat::CombatStrategy<$name> {
            $(
                fn $method(&mut self, targets: impl Into<$crate::combat::Targets>) -> &mut Self {
                    self.action($name::$variant, targets)
                }
            )+
        }

        $(
            const _: () = assert!(!$crate::combat::actions::is_reserved(stringify!($method)));
        )+
    };
}
