//! Preference writes that are undone when the engine goes away.

use std::collections::BTreeSet;

use crate::ports::SettingsStore;

/// Preferences whose changes should not be logged.
pub const QUIET_PREFERENCES: &[&str] =
    &["libram_savedMacro", "maximizerMRUList", "testudinalTeachings", "_lastCombatStarted"];

/// The fixed preference table written before any task runs.
pub const ENGINE_PREFERENCES: &[(&str, &str)] = &[
    ("logPreferenceChange", "true"),
    ("battleAction", "custom combat script"),
    ("autoSatisfyWithMall", "true"),
    ("autoSatisfyWithNPCs", "true"),
    ("autoSatisfyWithCoinmasters", "true"),
    ("autoSatisfyWithStash", "false"),
    ("dontStopForCounters", "true"),
    ("maximizerFoldables", "true"),
    ("hpAutoRecovery", "-0.05"),
    ("hpAutoRecoveryTarget", "0.0"),
    ("mpAutoRecovery", "-0.05"),
    ("mpAutoRecoveryTarget", "0.0"),
    ("afterAdventureScript", ""),
    ("betweenBattleScript", ""),
    ("choiceAdventureScript", ""),
    ("familiarScript", ""),
    ("currentMood", "apathetic"),
    ("autoTuxedo", "true"),
    ("autoPinkyRing", "true"),
    ("autoGarish", "true"),
    ("allowNonMoodBurning", "false"),
    ("allowSummonBurning", "true"),
    ("libramSkillsSoftcore", "none"),
];

/// Writes preferences and remembers what they were.
///
/// The first value seen for each key is the one [`restore`](Self::restore)
/// puts back; keys that did not exist are restored to the empty string.
#[derive(Debug, Default)]
pub struct PropertiesManager {
    saved: Vec<(String, Option<String>)>,
}

impl PropertiesManager {
    /// A manager that has touched nothing yet.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Writes `key = value`, saving the previous value on first touch.
    pub fn set(&mut self, store: &dyn SettingsStore, key: &str, value: &str) {
        if !self.saved.iter().any(|(k, _)| k == key) {
            self.saved.push((key.to_string(), store.get(key)));
        }
        store.set(key, value);
    }

    /// Writes every pair in order.
    pub fn set_all<'a>(
        &mut self,
        store: &dyn SettingsStore,
        pairs: impl IntoIterator<Item = (&'a str, &'a str)>,
    ) {
        for (key, value) in pairs {
            self.set(store, key, value);
        }
    }

    /// Adds `entries` to the comma-separated list stored at `key`.
    /// The result is sorted and free of duplicates.
    pub fn extend_list(&mut self, store: &dyn SettingsStore, key: &str, entries: &[&str]) {
        let current = store.get(key).unwrap_or_default();
        let merged: BTreeSet<&str> = current
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .chain(entries.iter().copied())
            .collect();
        let value = merged.into_iter().collect::<Vec<_>>().join(",");
        self.set(store, key, &value);
    }

    /// Keys touched so far, in first-touch order.
    pub fn touched(&self) -> impl Iterator<Item = &str> {
        self.saved.iter().map(|(k, _)| k.as_str())
    }

    /// Puts every touched key back to its saved value and forgets them.
    pub fn restore(&mut self, store: &dyn SettingsStore) {
        for (key, previous) in self.saved.drain(..).rev() {
            store.set(&key, previous.as_deref().unwrap_or_default());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::sim::SimWorld;

    #[test]
    fn restore_puts_back_first_seen_values() {
        let world = SimWorld::new();
        world.set_setting("currentMood", "default");
        let mut properties = PropertiesManager::new();

        properties.set(&world, "currentMood", "apathetic");
        properties.set(&world, "currentMood", "other");
        properties.set(&world, "battleAction", "custom combat script");
        assert_eq!(world.setting("currentMood").as_deref(), Some("other"));

        properties.restore(&world);
        assert_eq!(world.setting("currentMood").as_deref(), Some("default"));
        assert_eq!(world.setting("battleAction").as_deref(), Some(""));
        assert_eq!(properties.touched().count(), 0);
    }

    #[test]
    fn extend_list_sorts_and_dedups() {
        let world = SimWorld::new();
        world.set_setting("logPreferenceChangeFilter", "zeta,maximizerMRUList");
        let mut properties = PropertiesManager::new();

        properties.extend_list(&world, "logPreferenceChangeFilter", QUIET_PREFERENCES);
        assert_eq!(
            world.setting("logPreferenceChangeFilter").as_deref(),
            Some("_lastCombatStarted,libram_savedMacro,maximizerMRUList,testudinalTeachings,zeta")
        );
    }
}
