//! Project files.
//!
//! A project is stored as a small key/value document:
//!
//! ```json
//! {
//!   "duplicants": 3,
//!   "days": 7,
//!   "food_choice": "basic_meal",
//!   "buildings": { "simple_bed": 3 }
//! }
//! ```
//!
//! The same fields are used for YAML and TOML. Documents are read leniently
//! and then validated, so that a well-formed file with bad values is reported
//! as a [`ValidationError`] rather than a [`ParseError`].

use std::{
    collections::BTreeMap,
    io,
    num::NonZeroU32,
    path::{Path, PathBuf},
};

use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::{storage::Format, Catalog, Project};

/// Writes `project` to `path`, replacing any existing file.
///
/// The format is chosen from the extension of `path`. Missing parent
/// directories are not created.
///
/// # Errors
///
/// Returns an error if the extension is not a supported format or the file
/// cannot be written.
#[instrument(skip(project), fields(path = %path.display()))]
pub fn save(project: &Project, path: &Path) -> Result<(), SaveError> {
    let format =
        Format::from_path(path).ok_or_else(|| SaveError::UnsupportedFormat(path.to_path_buf()))?;
    let content = format.render(&ProjectDocument::from(project))?;
    std::fs::write(path, content)?;

    tracing::debug!(%format, "saved project");
    Ok(())
}

/// Reads a project from `path` and checks it against `catalog`.
///
/// # Errors
///
/// - [`LoadError::Io`] if the file cannot be read
/// - [`LoadError::Parse`] if the file is not a well-formed project document
/// - [`LoadError::Validation`] if the document's values do not describe a
///   valid project
#[instrument(skip(catalog), fields(path = %path.display()))]
pub fn load(path: &Path, catalog: &Catalog) -> Result<Project, LoadError> {
    let format =
        Format::from_path(path).ok_or_else(|| ParseError::UnsupportedFormat(path.to_path_buf()))?;
    let content = String::from_utf8(std::fs::read(path)?).map_err(ParseError::from)?;
    let document: ProjectDocument = format.parse(&content)?;
    let project = document.validate(catalog)?;

    tracing::debug!(%format, "loaded project");
    Ok(project)
}

/// Errors that can occur when loading a project file.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    /// The file could not be read.
    #[error("failed to read project file: {0}")]
    Io(#[from] io::Error),

    /// The file is not a well-formed project document.
    #[error("malformed project file: {0}")]
    Parse(#[from] ParseError),

    /// The document does not describe a valid project.
    #[error("invalid project: {0}")]
    Validation(#[from] ValidationError),
}

/// A project document that could not be parsed.
#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    /// Malformed JSON.
    #[error(transparent)]
    Json(#[from] serde_json::Error),

    /// Malformed YAML.
    #[error(transparent)]
    Yaml(#[from] serde_yaml::Error),

    /// Malformed TOML.
    #[error(transparent)]
    Toml(#[from] toml::de::Error),

    /// The file is not valid UTF-8 text.
    #[error("project file is not valid UTF-8: {0}")]
    Encoding(#[from] std::string::FromUtf8Error),

    /// The file extension is not a known project format.
    #[error("unsupported file extension: {}", .0.display())]
    UnsupportedFormat(PathBuf),
}

/// A parsed project document whose values break the project rules.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ValidationError {
    /// A required field is absent.
    #[error("missing field '{0}'")]
    MissingField(&'static str),

    /// A count that must be positive is zero or negative.
    #[error("'{field}' must be greater than zero, got {value}")]
    NotPositive {
        /// The offending field.
        field: &'static str,
        /// The value found.
        value: i64,
    },

    /// A building count is negative.
    #[error("building count for '{building}' cannot be negative, got {count}")]
    NegativeCount {
        /// The building key.
        building: String,
        /// The value found.
        count: i64,
    },

    /// A value is too large.
    #[error("'{field}' is too large: {value}")]
    OutOfRange {
        /// The offending field or building key.
        field: String,
        /// The value found.
        value: i64,
    },

    /// The chosen food is not in the catalog.
    #[error("unknown food '{0}'")]
    UnknownFood(String),

    /// A building is not in the catalog.
    #[error("unknown building '{0}'")]
    UnknownBuilding(String),
}

/// Errors that can occur when saving a project file.
#[derive(Debug, thiserror::Error)]
pub enum SaveError {
    /// The file could not be written.
    #[error("failed to write project file: {0}")]
    Io(#[from] io::Error),

    /// The project could not be rendered as JSON.
    #[error("failed to serialize project: {0}")]
    Json(#[from] serde_json::Error),

    /// The project could not be rendered as YAML.
    #[error("failed to serialize project: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// The project could not be rendered as TOML.
    #[error("failed to serialize project: {0}")]
    Toml(#[from] toml::ser::Error),

    /// The file extension is not a known project format.
    #[error("unsupported file extension: {}", .0.display())]
    UnsupportedFormat(PathBuf),
}

/// The on-disk shape of a project.
///
/// Numbers are signed and every field is optional so that bad values reach
/// validation instead of failing the parse.
#[derive(Debug, Default, Serialize, Deserialize)]
struct ProjectDocument {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    duplicants: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    days: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    food_choice: Option<String>,
    #[serde(default)]
    buildings: BTreeMap<String, i64>,
}

impl From<&Project> for ProjectDocument {
    fn from(project: &Project) -> Self {
        Self {
            duplicants: Some(i64::from(project.duplicants.get())),
            days: Some(i64::from(project.days.get())),
            food_choice: Some(project.food_choice.clone()),
            buildings: project
                .buildings
                .iter()
                .map(|(key, &count)| (key.clone(), i64::from(count)))
                .collect(),
        }
    }
}

impl ProjectDocument {
    fn validate(self, catalog: &Catalog) -> Result<Project, ValidationError> {
        let duplicants = positive("duplicants", self.duplicants)?;
        let days = positive("days", self.days)?;

        let food_choice = self
            .food_choice
            .ok_or(ValidationError::MissingField("food_choice"))?;
        if catalog.food(&food_choice).is_none() {
            return Err(ValidationError::UnknownFood(food_choice));
        }

        let buildings = self
            .buildings
            .into_iter()
            .map(|(key, count)| {
                if catalog.building(&key).is_none() {
                    return Err(ValidationError::UnknownBuilding(key));
                }
                if count < 0 {
                    return Err(ValidationError::NegativeCount {
                        building: key,
                        count,
                    });
                }
                let Ok(count) = u32::try_from(count) else {
                    return Err(ValidationError::OutOfRange {
                        field: key,
                        value: count,
                    });
                };
                Ok((key, count))
            })
            .collect::<Result<BTreeMap<_, _>, _>>()?;

        Ok(Project {
            duplicants,
            days,
            food_choice,
            buildings,
        })
    }
}

fn positive(field: &'static str, value: Option<i64>) -> Result<NonZeroU32, ValidationError> {
    let value = value.ok_or(ValidationError::MissingField(field))?;
    if value <= 0 {
        return Err(ValidationError::NotPositive { field, value });
    }
    u32::try_from(value)
        .ok()
        .and_then(NonZeroU32::new)
        .ok_or_else(|| ValidationError::OutOfRange {
            field: field.to_string(),
            value,
        })
}

#[cfg(test)]
mod tests {
    use test_case::test_case;

    use super::*;

    fn nz(n: u32) -> NonZeroU32 {
        NonZeroU32::new(n).unwrap()
    }

    fn write(dir: &Path, name: &str, content: impl AsRef<[u8]>) -> PathBuf {
        let path = dir.join(name);
        std::fs::write(&path, content).unwrap();
        path
    }

    fn load_builtin(path: &Path) -> Result<Project, LoadError> {
        load(path, Catalog::builtin())
    }

    #[test_case("colony.json"; "json")]
    #[test_case("colony.yaml"; "yaml")]
    #[test_case("colony.yml"; "short yaml")]
    #[test_case("colony.toml"; "toml")]
    fn save_then_load_returns_same_project(name: &str) {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join(name);
        let project = Project::new(nz(5), nz(12), "grilled_mushroom")
            .with_building("simple_bed", 5)
            .with_building("water_pump", 0)
            .with_building("oxygen_generator", 2);

        save(&project, &path).unwrap();

        assert_eq!(load_builtin(&path).unwrap(), project);
    }

    #[test_case("colony.json"; "json")]
    #[test_case("colony.yaml"; "yaml")]
    #[test_case("colony.toml"; "toml")]
    fn project_without_buildings_round_trips(name: &str) {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join(name);
        let project = Project::new(nz(1), nz(1), "mushroom");

        save(&project, &path).unwrap();

        assert_eq!(load_builtin(&path).unwrap(), project);
    }

    #[test]
    fn save_writes_expected_json() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("demo.json");

        save(&Project::demo(), &path).unwrap();

        let value: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(
            value,
            serde_json::json!({
                "duplicants": 3,
                "days": 7,
                "food_choice": "basic_meal",
                "buildings": { "oxygen_generator": 1, "simple_bed": 3 }
            })
        );
    }

    #[test]
    fn save_overwrites_existing_file() {
        let tmp = tempfile::tempdir().unwrap();
        let path = write(tmp.path(), "colony.json", "this is not a project");

        save(&Project::demo(), &path).unwrap();

        assert_eq!(load_builtin(&path).unwrap(), Project::demo());
    }

    #[test]
    fn save_into_missing_directory_is_io_error() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("no-such-dir").join("colony.json");

        let error = save(&Project::demo(), &path).unwrap_err();

        assert!(matches!(error, SaveError::Io(_)));
    }

    #[test]
    fn save_with_unknown_extension_is_rejected() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("colony.txt");

        let error = save(&Project::demo(), &path).unwrap_err();

        assert!(matches!(error, SaveError::UnsupportedFormat(_)));
        assert!(!path.exists());
    }

    #[test]
    fn loads_hand_written_yaml() {
        let tmp = tempfile::tempdir().unwrap();
        let path = write(
            tmp.path(),
            "colony.yaml",
            "duplicants: 2\ndays: 4\nfood_choice: mushroom\nbuildings:\n  water_pump: 1\n",
        );

        let project = load_builtin(&path).unwrap();

        assert_eq!(
            project,
            Project::new(nz(2), nz(4), "mushroom").with_building("water_pump", 1)
        );
    }

    #[test]
    fn missing_buildings_means_none() {
        let tmp = tempfile::tempdir().unwrap();
        let path = write(
            tmp.path(),
            "colony.toml",
            "duplicants = 2\ndays = 4\nfood_choice = \"mushroom\"\n",
        );

        let project = load_builtin(&path).unwrap();

        assert!(project.buildings.is_empty());
    }

    #[test]
    fn missing_duplicants_is_validation_error() {
        let tmp = tempfile::tempdir().unwrap();
        let path = write(
            tmp.path(),
            "colony.json",
            r#"{"days": 3, "food_choice": "basic_meal", "buildings": {}}"#,
        );

        let error = load_builtin(&path).unwrap_err();

        assert!(matches!(
            error,
            LoadError::Validation(ValidationError::MissingField("duplicants"))
        ));
    }

    #[test_case(r#"{"duplicants": 0, "days": 3, "food_choice": "mushroom"}"#,
        ValidationError::NotPositive { field: "duplicants", value: 0 }; "zero duplicants")]
    #[test_case(r#"{"duplicants": 2, "days": -1, "food_choice": "mushroom"}"#,
        ValidationError::NotPositive { field: "days", value: -1 }; "negative days")]
    #[test_case(r#"{"duplicants": 2, "days": 3}"#,
        ValidationError::MissingField("food_choice"); "missing food")]
    #[test_case(r#"{"duplicants": 2, "food_choice": "mushroom"}"#,
        ValidationError::MissingField("days"); "missing days")]
    #[test_case(r#"{"duplicants": 2, "days": 3, "food_choice": "space_ice_cream"}"#,
        ValidationError::UnknownFood("space_ice_cream".to_string()); "unknown food")]
    #[test_case(r#"{"duplicants": 2, "days": 3, "food_choice": "mushroom", "buildings": {"rocket": 1}}"#,
        ValidationError::UnknownBuilding("rocket".to_string()); "unknown building")]
    #[test_case(r#"{"duplicants": 2, "days": 3, "food_choice": "mushroom", "buildings": {"simple_bed": -2}}"#,
        ValidationError::NegativeCount { building: "simple_bed".to_string(), count: -2 }; "negative count")]
    #[test_case(r#"{"duplicants": 5000000000, "days": 3, "food_choice": "mushroom"}"#,
        ValidationError::OutOfRange { field: "duplicants".to_string(), value: 5_000_000_000 }; "too many duplicants")]
    fn invalid_values_are_validation_errors(content: &str, expected: ValidationError) {
        let tmp = tempfile::tempdir().unwrap();
        let path = write(tmp.path(), "colony.json", content);

        match load_builtin(&path).unwrap_err() {
            LoadError::Validation(error) => assert_eq!(error, expected),
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test_case("colony.json", b"{\"duplicants\": 3,"; "truncated json")]
    #[test_case("colony.json", br#"{"duplicants": "three"}"#; "json string count")]
    #[test_case("colony.json", b"{\"duplicants\": \xff\xfe}"; "json not utf8")]
    #[test_case("colony.yaml", b"duplicants: [3\n"; "unclosed yaml")]
    #[test_case("colony.yaml", b"duplicants: \xc3\x28\n"; "yaml not utf8")]
    #[test_case("colony.toml", b"duplicants = \n"; "toml without value")]
    fn malformed_files_are_parse_errors(name: &str, content: &[u8]) {
        let tmp = tempfile::tempdir().unwrap();
        let path = write(tmp.path(), name, content);

        let error = load_builtin(&path).unwrap_err();

        assert!(matches!(error, LoadError::Parse(_)), "got {error:?}");
    }

    #[test]
    fn non_utf8_file_is_encoding_error() {
        let tmp = tempfile::tempdir().unwrap();
        let path = write(tmp.path(), "colony.toml", b"food_choice = \"\xff\"\n");

        let error = load_builtin(&path).unwrap_err();

        assert!(
            matches!(error, LoadError::Parse(ParseError::Encoding(_))),
            "got {error:?}"
        );
    }

    #[test]
    fn unknown_extension_is_parse_error() {
        let tmp = tempfile::tempdir().unwrap();
        let path = write(tmp.path(), "colony.ini", "duplicants=3");

        let error = load_builtin(&path).unwrap_err();

        assert!(matches!(
            error,
            LoadError::Parse(ParseError::UnsupportedFormat(_))
        ));
    }

    #[test]
    fn missing_file_is_io_error() {
        let tmp = tempfile::tempdir().unwrap();

        let error = load_builtin(&tmp.path().join("missing.json")).unwrap_err();

        assert!(matches!(error, LoadError::Io(_)));
    }

    #[test]
    fn validation_uses_given_catalog() {
        let tmp = tempfile::tempdir().unwrap();
        let path = write(
            tmp.path(),
            "colony.json",
            r#"{"duplicants": 1, "days": 1, "food_choice": "mushroom"}"#,
        );

        let error = load(&path, &Catalog::new(nz(1))).unwrap_err();

        assert!(matches!(
            error,
            LoadError::Validation(ValidationError::UnknownFood(_))
        ));
    }
}
