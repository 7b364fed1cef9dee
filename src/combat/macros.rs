//! Combat macro text builder.

use std::fmt;

use crate::world::Monster;

/// An ordered list of macro statements, rendered joined by `;`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Macro {
    components: Vec<String>,
}

impl Macro {
    /// An empty macro.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses `;`-separated statements, dropping empty ones.
    #[must_use]
    pub fn raw(text: &str) -> Self {
        Self {
            components: text
                .split(';')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(String::from)
                .collect(),
        }
    }

    /// Appends one statement.
    #[must_use]
    pub fn step(mut self, statement: impl Into<String>) -> Self {
        self.components.push(statement.into());
        self
    }

    /// Appends every statement of `other`.
    #[must_use]
    pub fn append(mut self, other: &Macro) -> Self {
        self.components.extend(other.components.iter().cloned());
        self
    }

    /// Appends `body` guarded by `condition`.
    #[must_use]
    pub fn if_(self, condition: impl AsRef<str>, body: &Macro) -> Self {
        self.step(format!("if {}", condition.as_ref())).append(body).step("endif")
    }

    /// Appends a plain attack.
    #[must_use]
    pub fn attack(self) -> Self {
        self.step("attack")
    }

    /// Appends a skill use.
    #[must_use]
    pub fn skill(self, skill: &str) -> Self {
        self.step(format!("skill {skill}"))
    }

    /// Appends an item use.
    #[must_use]
    pub fn item(self, item: &str) -> Self {
        self.step(format!("use {item}"))
    }

    /// Appends an attempt to flee.
    #[must_use]
    pub fn run_away(self) -> Self {
        self.step("runaway")
    }

    /// Repeats the previous statement until the fight ends.
    #[must_use]
    pub fn repeat(self) -> Self {
        self.step("repeat")
    }

    /// Aborts the fight with a message.
    #[must_use]
    pub fn abort_with(self, message: &str) -> Self {
        self.step(format!("abort \"{message}\""))
    }

    /// Whether the macro has no statements.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }

    /// Number of `if` blocks in the macro.
    #[must_use]
    pub fn branch_count(&self) -> usize {
        self.components.iter().filter(|c| c.starts_with("if ")).count()
    }

    /// Guard text matching any of `monsters`.
    #[must_use]
    pub fn monster_guard<'a>(monsters: impl IntoIterator<Item = &'a Monster>) -> String {
        monsters.into_iter().map(|m| format!("monsterid {}", m.id)).collect::<Vec<_>>().join(" || ")
    }
}

impl fmt::Display for Macro {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.components.join(";"))
    }
}
