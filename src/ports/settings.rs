//! Settings store port: flat string key/value preferences.

/// Persisted preference storage.
pub trait SettingsStore: Send + Sync {
    /// Returns the value stored under `key`, if any.
    fn get(&self, key: &str) -> Option<String>;

    /// Stores `value` under `key`.
    fn set(&self, key: &str, value: &str);
}
