use std::{
    io,
    num::NonZeroU32,
    path::{Path, PathBuf},
};

use serde::{Deserialize, Serialize};

use crate::{domain::catalog::DAILY_CALORIES, storage::Format};

/// Settings for the planner.
///
/// All settings are optional in the configuration file; anything left out
/// takes its default.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Versions", into = "Versions")]
pub struct Config {
    /// Directory that projects and summaries are saved into.
    pub output_dir: PathBuf,

    /// The file format projects are saved in.
    pub format: Format,

    /// Calories a single duplicant eats per day.
    ///
    /// Overrides the catalog value for the session.
    daily_calories: NonZeroU32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            output_dir: default_output_dir(),
            format: Format::default(),
            daily_calories: DAILY_CALORIES,
        }
    }
}

impl Config {
    /// Loads the configuration from a TOML file at the given path.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or if the TOML content is
    /// invalid.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(ConfigError::Read)?;
        toml::from_str(&content).map_err(ConfigError::Parse)
    }

    /// Saves the configuration to a TOML file at the given path.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration cannot be serialized to TOML or if
    /// the file cannot be written.
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let content = toml::to_string_pretty(self).map_err(ConfigError::Serialize)?;
        std::fs::write(path, content).map_err(ConfigError::Write)
    }

    /// Calories a single duplicant eats per day.
    #[must_use]
    pub const fn daily_calories(&self) -> NonZeroU32 {
        self.daily_calories
    }

    /// Sets the calories a single duplicant eats per day.
    pub const fn set_daily_calories(&mut self, value: NonZeroU32) {
        self.daily_calories = value;
    }
}

/// Errors reading or writing the configuration file.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The file could not be read.
    #[error("Failed to read config file")]
    Read(#[source] io::Error),

    /// The file is not valid configuration TOML.
    #[error("Failed to parse config file")]
    Parse(#[source] toml::de::Error),

    /// The configuration could not be rendered as TOML.
    #[error("Failed to serialize config")]
    Serialize(#[source] toml::ser::Error),

    /// The file could not be written.
    #[error("Failed to write config file")]
    Write(#[source] io::Error),
}

fn default_output_dir() -> PathBuf {
    PathBuf::from(".")
}

const fn default_daily_calories() -> NonZeroU32 {
    DAILY_CALORIES
}

/// The serialized versions of the configuration.
/// This allows for future changes to the configuration format and to the domain
/// type without breaking compatibility.
#[derive(Debug, Serialize, Deserialize)]
#[serde(tag = "_version")]
enum Versions {
    #[serde(rename = "1")]
    V1 {
        #[serde(default = "default_output_dir")]
        output_dir: PathBuf,

        #[serde(default)]
        format: Format,

        /// Calories per duplicant per day.
        #[serde(default = "default_daily_calories")]
        daily_calories: NonZeroU32,
    },
}

impl From<Versions> for Config {
    fn from(versions: Versions) -> Self {
        match versions {
            Versions::V1 {
                output_dir,
                format,
                daily_calories,
            } => Self {
                output_dir,
                format,
                daily_calories,
            },
        }
    }
}

impl From<Config> for Versions {
    fn from(config: Config) -> Self {
        Self::V1 {
            output_dir: config.output_dir,
            format: config.format,
            daily_calories: config.daily_calories,
        }
    }
}
