//! Plugin configuration.
//!
//! The server gives plugins no configuration channel, so settings come from
//! the process environment:
//!
//! - `PAWN_INI_LOG`: an `EnvFilter` directive for the server log (default `info`)
//! - `PAWN_INI_MAX_OPEN`: the most INI files open at once (default 1024)

use pawn_ini_store::StoreOptions;

use crate::error::PluginError;

pub const LOG_ENV: &str = "PAWN_INI_LOG";
pub const MAX_OPEN_ENV: &str = "PAWN_INI_MAX_OPEN";
pub const DEFAULT_LOG_FILTER: &str = "info";
pub const DEFAULT_MAX_OPEN: usize = 1024;

/// Configuration for the handle registry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistryConfig {
    /// Maximum number of live handles.
    pub max_open: usize,

    /// Options every opened store is created with.
    pub store: StoreOptions,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            max_open: DEFAULT_MAX_OPEN,
            store: StoreOptions::default(),
        }
    }
}

/// Configuration read when the server loads the plugin.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PluginConfig {
    pub registry: RegistryConfig,
    pub log_filter: String,
}

impl Default for PluginConfig {
    fn default() -> Self {
        Self {
            registry: RegistryConfig::default(),
            log_filter: DEFAULT_LOG_FILTER.to_string(),
        }
    }
}

impl PluginConfig {
    /// Read the configuration from the process environment.
    pub fn from_env() -> (Self, Vec<PluginError>) {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build the configuration from any variable lookup.
    ///
    /// Settings that fail to parse keep their defaults and are returned as
    /// errors, since logging is not up yet when this runs.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> (Self, Vec<PluginError>) {
        let mut config = Self::default();
        let mut rejected = Vec::new();

        if let Some(filter) = lookup(LOG_ENV) {
            if !filter.trim().is_empty() {
                config.log_filter = filter.trim().to_string();
            }
        }

        if let Some(raw) = lookup(MAX_OPEN_ENV) {
            match raw.trim().parse::<usize>() {
                Ok(max_open) if max_open > 0 => config.registry.max_open = max_open,
                _ => rejected.push(PluginError::InvalidSetting {
                    name: MAX_OPEN_ENV,
                    value: raw,
                }),
            }
        }

        (config, rejected)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| vars.get(name).cloned()
    }

    #[test]
    fn defaults_without_environment() {
        let (config, rejected) = PluginConfig::from_lookup(lookup(&[]));
        assert_eq!(config, PluginConfig::default());
        assert_eq!(config.registry.max_open, 1024);
        assert_eq!(config.log_filter, "info");
        assert!(config.registry.store.create_missing);
        assert!(config.registry.store.flush_on_close);
        assert!(rejected.is_empty());
    }

    #[test]
    fn reads_settings() {
        let (config, rejected) = PluginConfig::from_lookup(lookup(&[
            (LOG_ENV, " debug "),
            (MAX_OPEN_ENV, "16"),
        ]));
        assert_eq!(config.log_filter, "debug");
        assert_eq!(config.registry.max_open, 16);
        assert!(rejected.is_empty());
    }

    #[test]
    fn invalid_max_open_keeps_default() {
        for bad in ["lots", "0", "-3"] {
            let (config, rejected) = PluginConfig::from_lookup(lookup(&[(MAX_OPEN_ENV, bad)]));
            assert_eq!(config.registry.max_open, DEFAULT_MAX_OPEN);
            assert_eq!(rejected.len(), 1);
            assert!(matches!(
                &rejected[0],
                PluginError::InvalidSetting { name: MAX_OPEN_ENV, value } if value == bad
            ));
        }
    }

    #[test]
    fn blank_log_filter_keeps_default() {
        let (config, _) = PluginConfig::from_lookup(lookup(&[(LOG_ENV, "   ")]));
        assert_eq!(config.log_filter, DEFAULT_LOG_FILTER);
    }
}
