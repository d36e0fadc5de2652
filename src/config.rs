use std::path::Path;

use crate::ai::tier::{Tier, TierConfig};
use crate::ai::zobrist::DEFAULT_ZOBRIST_SEED;
use crate::error::ConfigError;
use crate::game::{COLS, ROWS};

/// Engine configuration, loadable from TOML.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Transposition table entries kept before a full clear
    pub cache_capacity: usize,
    /// Seed for the position hashing keys
    pub zobrist_seed: u64,
    /// Seed for weak-tier blunders; OS entropy when unset
    pub seed: Option<u64>,
    pub tiers: TierTable,
}

impl Default for EngineConfig {
    fn default() -> Self {
        EngineConfig {
            cache_capacity: 1_000_000,
            zobrist_seed: DEFAULT_ZOBRIST_SEED,
            seed: None,
            tiers: TierTable::default(),
        }
    }
}

/// Per-tier search settings.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct TierTable {
    pub beginner: TierConfig,
    pub easy: TierConfig,
    pub medium: TierConfig,
    pub hard: TierConfig,
    pub expert: TierConfig,
}

impl Default for TierTable {
    fn default() -> Self {
        TierTable {
            beginner: Tier::Beginner.default_config(),
            easy: Tier::Easy.default_config(),
            medium: Tier::Medium.default_config(),
            hard: Tier::Hard.default_config(),
            expert: Tier::Expert.default_config(),
        }
    }
}

impl TierTable {
    pub fn get(&self, tier: Tier) -> &TierConfig {
        match tier {
            Tier::Beginner => &self.beginner,
            Tier::Easy => &self.easy,
            Tier::Medium => &self.medium,
            Tier::Hard => &self.hard,
            Tier::Expert => &self.expert,
        }
    }
}

impl EngineConfig {
    /// Load configuration from a TOML file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::FileRead {
            path: path.to_path_buf(),
            source: e,
        })?;
        let config: EngineConfig = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a TOML file, falling back to defaults if the file
    /// does not exist.
    pub fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
        if path.exists() {
            Self::load(path)
        } else {
            log::warn!("config file '{}' not found, using defaults", path.display());
            Ok(Self::default())
        }
    }

    /// The default configuration rendered as TOML.
    pub fn default_toml() -> String {
        // Plain data with no maps keyed by non-strings; serialization cannot fail.
        toml::to_string_pretty(&Self::default()).unwrap_or_default()
    }

    pub fn tier(&self, tier: Tier) -> &TierConfig {
        self.tiers.get(tier)
    }

    /// Validate configuration values.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.cache_capacity == 0 {
            return Err(ConfigError::Validation("cache_capacity must be > 0".into()));
        }

        for tier in Tier::ALL {
            let config = self.tiers.get(tier);
            if config.depth == 0 || config.depth > ROWS * COLS {
                return Err(ConfigError::Validation(format!(
                    "tiers.{tier}.depth must be in [1, {}]",
                    ROWS * COLS
                )));
            }
            if !(0.0..=1.0).contains(&config.blunder_rate) {
                return Err(ConfigError::Validation(format!(
                    "tiers.{tier}.blunder_rate must be in [0, 1]"
                )));
            }
        }

        Ok(())
    }
}
