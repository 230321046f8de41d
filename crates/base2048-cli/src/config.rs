//! Runtime configuration from environment variables.

use anyhow::Context;
use std::path::PathBuf;

const SAVE_DIR_VAR: &str = "BASE2048_SAVE_DIR";
const SEED_VAR: &str = "BASE2048_SEED";
const LOG_VAR: &str = "RUST_LOG";

/// CLI settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Directory holding the saved game, undo snapshot and best score
    pub save_dir: PathBuf,
    /// Fixed seed for reproducible tile spawns
    pub seed: Option<u64>,
    /// Tracing filter directive
    pub log_filter: String,
}

impl Config {
    /// Read settings from the process environment
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read settings through `lookup`, falling back to defaults
    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let save_dir = lookup(SAVE_DIR_VAR)
            .filter(|dir| !dir.trim().is_empty())
            .unwrap_or_else(|| ".base2048".into())
            .into();

        let seed = lookup(SEED_VAR)
            .map(|text| {
                text.trim()
                    .parse::<u64>()
                    .with_context(|| format!("{} must be an unsigned integer, got {:?}", SEED_VAR, text))
            })
            .transpose()?;

        let log_filter = lookup(LOG_VAR).unwrap_or_else(|| "info".into());

        Ok(Self {
            save_dir,
            seed,
            log_filter,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| vars.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = Config::from_lookup(lookup_from(&[])).unwrap();
        assert_eq!(config.save_dir, PathBuf::from(".base2048"));
        assert_eq!(config.seed, None);
        assert_eq!(config.log_filter, "info");
    }

    #[test]
    fn test_overrides() {
        let config = Config::from_lookup(lookup_from(&[
            ("BASE2048_SAVE_DIR", "/tmp/saves"),
            ("BASE2048_SEED", " 42 "),
            ("RUST_LOG", "base2048_core=debug"),
        ]))
        .unwrap();
        assert_eq!(config.save_dir, PathBuf::from("/tmp/saves"));
        assert_eq!(config.seed, Some(42));
        assert_eq!(config.log_filter, "base2048_core=debug");
    }

    #[test]
    fn test_bad_seed_is_an_error() {
        assert!(Config::from_lookup(lookup_from(&[("BASE2048_SEED", "abc")])).is_err());
    }
}
