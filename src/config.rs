//! Environment-driven engine configuration.

use std::env;

use crate::combat::Action;
use crate::engine::EngineOptions;

/// Environment variable holding the log filter.
pub const LOG_ENV: &str = "QUESTLINE_LOG";

/// Environment variable enabling partial outfits.
pub const PARTIAL_OUTFITS_ENV: &str = "QUESTLINE_ALLOW_PARTIAL_OUTFITS";

/// Environment variable naming the custom combat script.
pub const COMBAT_SCRIPT_ENV: &str = "QUESTLINE_CCS";

/// Log filter used when [`LOG_ENV`] is unset.
pub const DEFAULT_LOG_FILTER: &str = "info";

/// Settings read from the process environment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineConfig {
    /// A loadout that cannot be fully worn is not fatal.
    pub allow_partial_outfits: bool,
    /// Name written to `customCombatScript`.
    pub combat_script: Option<String>,
    /// `tracing` filter directive.
    pub log_filter: String,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            allow_partial_outfits: false,
            combat_script: None,
            log_filter: DEFAULT_LOG_FILTER.to_string(),
        }
    }
}

impl EngineConfig {
    /// Reads the configuration from the environment. Call after loading
    /// `.env` so its values are visible.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Reads the configuration through `lookup`.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        Self {
            allow_partial_outfits: lookup(PARTIAL_OUTFITS_ENV)
                .map_or(defaults.allow_partial_outfits, |v| parse_flag(&v)),
            combat_script: lookup(COMBAT_SCRIPT_ENV).filter(|v| !v.trim().is_empty()),
            log_filter: lookup(LOG_ENV).unwrap_or(defaults.log_filter),
        }
    }

    /// Engine options carrying this configuration.
    #[must_use]
    pub fn engine_options<A: Action>(&self) -> EngineOptions<A> {
        let options = EngineOptions::default().allow_partial_outfits(self.allow_partial_outfits);
        match &self.combat_script {
            Some(script) => options.with_combat_script(script.clone()),
            None => options,
        }
    }
}

fn parse_flag(value: &str) -> bool {
    matches!(value.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes" | "on")
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> =
            pairs.iter().map(|(k, v)| ((*k).to_string(), (*v).to_string())).collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_when_unset() {
        let config = EngineConfig::from_lookup(lookup(&[]));
        assert_eq!(config, EngineConfig::default());
        assert_eq!(config.log_filter, "info");
    }

    #[test]
    fn reads_every_variable() {
        let config = EngineConfig::from_lookup(lookup(&[
            (PARTIAL_OUTFITS_ENV, "Yes"),
            (COMBAT_SCRIPT_ENV, "questline"),
            (LOG_ENV, "questline=debug"),
        ]));
        assert!(config.allow_partial_outfits);
        assert_eq!(config.combat_script.as_deref(), Some("questline"));
        assert_eq!(config.log_filter, "questline=debug");

        let options = config.engine_options::<()>();
        assert!(options.allow_partial_outfits);
        assert_eq!(options.combat_script.as_deref(), Some("questline"));
    }

    #[test]
    fn blank_combat_script_is_ignored() {
        let config = EngineConfig::from_lookup(lookup(&[(COMBAT_SCRIPT_ENV, "  ")]));
        assert_eq!(config.combat_script, None);
    }
}
