//! Values that are either given up front or computed at use time.

use std::fmt;
use std::rc::Rc;

use crate::context::WorldContext;

/// A literal value or a callback producing one from the current world.
///
/// Deferred values are resolved every time they are needed and the
/// result is never stored back.
pub enum Delayed<T> {
    /// Known ahead of time.
    Value(T),
    /// Computed from the world when needed.
    Deferred(Rc<dyn Fn(&WorldContext) -> T>),
}

impl<T> Delayed<T> {
    /// Wraps a callback.
    pub fn deferred(f: impl Fn(&WorldContext) -> T + 'static) -> Self {
        Self::Deferred(Rc::new(f))
    }
}

impl<T: Clone> Delayed<T> {
    /// Produces the current value.
    pub fn resolve(&self, ctx: &WorldContext) -> T {
        match self {
            Self::Value(value) => value.clone(),
            Self::Deferred(f) => f(ctx),
        }
    }
}

impl<T: Clone> Clone for Delayed<T> {
    fn clone(&self) -> Self {
        match self {
            Self::Value(value) => Self::Value(value.clone()),
            Self::Deferred(f) => Self::Deferred(Rc::clone(f)),
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for Delayed<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Value(value) => f.debug_tuple("Value").field(value).finish(),
            Self::Deferred(_) => f.write_str("Deferred(..)"),
        }
    }
}

impl<T> From<T> for Delayed<T> {
    fn from(value: T) -> Self {
        Self::Value(value)
    }
}
