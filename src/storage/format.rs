use std::{fmt, path::Path, str::FromStr};

use serde::{de::DeserializeOwned, Deserialize, Serialize};

use crate::storage::{ParseError, SaveError};

/// A structured text format for project files.
///
/// The format of a file is chosen by its extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Format {
    /// `.json`
    #[default]
    Json,
    /// `.yaml` or `.yml`
    Yaml,
    /// `.toml`
    Toml,
}

impl Format {
    /// Picks the format matching the extension of `path`, if any.
    #[must_use]
    pub fn from_path(path: &Path) -> Option<Self> {
        path.extension()?.to_str()?.parse().ok()
    }

    /// The extension files in this format are saved with.
    #[must_use]
    pub const fn extension(self) -> &'static str {
        match self {
            Self::Json => "json",
            Self::Yaml => "yaml",
            Self::Toml => "toml",
        }
    }

    pub(crate) fn render<T: Serialize>(self, value: &T) -> Result<String, SaveError> {
        let content = match self {
            Self::Json => {
                let mut content = serde_json::to_string_pretty(value)?;
                content.push('\n');
                content
            }
            Self::Yaml => serde_yaml::to_string(value)?,
            Self::Toml => toml::to_string_pretty(value)?,
        };
        Ok(content)
    }

    pub(crate) fn parse<T: DeserializeOwned>(self, content: &str) -> Result<T, ParseError> {
        let value = match self {
            Self::Json => serde_json::from_str(content)?,
            Self::Yaml => serde_yaml::from_str(content)?,
            Self::Toml => toml::from_str(content)?,
        };
        Ok(value)
    }
}

impl FromStr for Format {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "json" => Ok(Self::Json),
            "yaml" | "yml" => Ok(Self::Yaml),
            "toml" => Ok(Self::Toml),
            other => Err(format!("unsupported project format '{other}'")),
        }
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}
