use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tilewalk_grid::{GridError, TownParams};

use crate::entity::DEFAULT_SPEED;

/// Errors from loading or validating a [`GameConfig`].
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("invalid config: {0}")]
    Invalid(String),
    #[error("grid error: {0}")]
    Grid(#[from] GridError),
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewportConfig {
    pub width: f32,
    pub height: f32,
}

impl Default for ViewportConfig {
    fn default() -> Self {
        Self {
            width: 960.0,
            height: 640.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerConfig {
    pub name: String,
    /// World units per second.
    pub speed: f32,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            name: "Eddie".to_string(),
            speed: DEFAULT_SPEED,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InteractionConfig {
    /// Distance ahead of the player that `interact` samples.
    pub reach: f32,
    /// Side of the square interaction box registered around each NPC.
    pub npc_box: f32,
}

impl Default for InteractionConfig {
    fn default() -> Self {
        Self {
            reach: 32.0,
            npc_box: 64.0,
        }
    }
}

/// Fixed parameters the world is constructed from at start-up.
///
/// Every field has a default, so a YAML file only needs the keys it changes.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub world: TownParams,
    pub viewport: ViewportConfig,
    pub player: PlayerConfig,
    pub interaction: InteractionConfig,
}

impl GameConfig {
    /// Parse and validate a YAML document.
    pub fn from_yaml_str(text: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_yaml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a YAML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_yaml_str(&text)?;
        tracing::debug!(path = %path.display(), "config loaded");
        Ok(config)
    }

    pub fn to_yaml(&self) -> Result<String, ConfigError> {
        Ok(serde_yaml::to_string(self)?)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let positive = [
            ("world.width", self.world.width),
            ("world.height", self.world.height),
            ("world.tile_size", self.world.tile_size),
            ("viewport.width", self.viewport.width),
            ("viewport.height", self.viewport.height),
            ("player.speed", self.player.speed),
            ("interaction.npc_box", self.interaction.npc_box),
        ];
        for (key, value) in positive {
            if !(value.is_finite() && value > 0.0) {
                return Err(ConfigError::Invalid(format!(
                    "{key} must be positive, got {value}"
                )));
            }
        }
        if !(self.interaction.reach.is_finite() && self.interaction.reach >= 0.0) {
            return Err(ConfigError::Invalid(format!(
                "interaction.reach must be non-negative, got {}",
                self.interaction.reach
            )));
        }
        Ok(())
    }
}
