//! Layered configuration
//!
//! Defaults, then an optional TOML file, then `SPELLDUEL_` environment
//! variables (`__` separates nested keys, e.g. `SPELLDUEL_RULES__IGNITE_STACKS`).

use std::path::{Path, PathBuf};

use figment::providers::{Env, Format, Serialized, Toml};
use figment::Figment;
use serde::{Deserialize, Serialize};

use crate::combat::Rules;

/// Environment variable prefix
pub const ENV_PREFIX: &str = "SPELLDUEL_";

/// Runtime configuration
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Duel rule constants
    pub rules: Rules,
    /// JSON fixture with spells and accounts
    pub fixture: Option<PathBuf>,
    /// Seed for reproducible dice; random when absent
    pub seed: Option<u64>,
}

impl Config {
    /// Provider chain without extracting
    pub fn figment(path: Option<&Path>) -> Figment {
        let mut figment = Figment::from(Serialized::defaults(Config::default()));
        if let Some(path) = path {
            figment = figment.merge(Toml::file(path));
        }
        figment.merge(Env::prefixed(ENV_PREFIX).split("__"))
    }

    /// Load configuration from all layers
    pub fn load(path: Option<&Path>) -> Result<Config, figment::Error> {
        Self::figment(path).extract()
    }
}
