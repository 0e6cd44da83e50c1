//! Validation options and their TOML persistence.
//!
//! The intake pipeline is configured once at construction with an immutable
//! [`ValidationOptions`] value. The options mirror what used to be edit-in-
//! source constants: how validation messages are presented, whether the name
//! field wants a full name or a first name only, and how GitHub handles are
//! normalized. Options load from `.lanyard/config.toml` and are written back
//! when changed from the options window.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::app_dirs;

/// Filename used to store the app configuration.
pub const CONFIG_FILE_NAME: &str = "config.toml";

/// How a validation message is surfaced to the user.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PresentationMode {
    /// Inline message inserted directly after the offending input.
    #[default]
    Below,
    /// Inline message inserted directly before the offending input.
    Above,
    /// Synchronous blocking modal dialog.
    Alert,
    /// Non-blocking auto-dismissing notice in the notice list.
    Toast,
}

/// Which shape of name the intake form accepts.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum NameMode {
    /// Require at least a first and a last name.
    #[default]
    Full,
    /// Require a single first name with no interior space.
    First,
}

/// How leading `@` characters in the GitHub handle are treated.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum GithubMode {
    /// Strip any leading `@` and prepend exactly one.
    #[default]
    Auto,
    /// Reject input that did not already start with `@`.
    RequireAt,
}

/// Immutable configuration handed to the intake orchestrator.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidationOptions {
    /// Active presentation mode for validation messages.
    pub presentation: PresentationMode,
    /// Active name validation mode.
    #[serde(rename = "name")]
    pub name_mode: NameMode,
    /// Active GitHub handle mode.
    #[serde(rename = "github")]
    pub github_mode: GithubMode,
}

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(default)]
struct ConfigFile {
    validation: ValidationOptions,
}

/// Errors that can occur while loading or saving the configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The config directory could not be resolved or created.
    #[error("Failed to prepare config directory: {0}")]
    ConfigDir(#[from] app_dirs::AppDirError),
    /// Failed to read the config file.
    #[error("Failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    /// Failed to write the config file.
    #[error("Failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
    /// The config file contains invalid TOML.
    #[error("Invalid config at {path}: {source}")]
    ParseToml {
        path: PathBuf,
        source: toml::de::Error,
    },
    /// The options could not be serialized to TOML.
    #[error("Failed to serialize config for {path}: {source}")]
    SerializeToml {
        path: PathBuf,
        source: toml::ser::Error,
    },
}

/// Resolve the configuration file path, ensuring the parent directory exists.
pub fn config_path() -> Result<PathBuf, ConfigError> {
    Ok(app_dirs::app_root_dir()?.join(CONFIG_FILE_NAME))
}

/// Load options from disk, returning defaults if no config file exists.
pub fn load_or_default() -> Result<ValidationOptions, ConfigError> {
    load_from_path(&config_path()?)
}

/// Load options from a specific path, returning defaults if it is missing.
pub fn load_from_path(path: &Path) -> Result<ValidationOptions, ConfigError> {
    if !path.exists() {
        return Ok(ValidationOptions::default());
    }
    let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let file: ConfigFile = toml::from_str(&text).map_err(|source| ConfigError::ParseToml {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(file.validation)
}

/// Persist options to disk, overwriting any previous contents.
pub fn save(options: ValidationOptions) -> Result<(), ConfigError> {
    save_to_path(options, &config_path()?)
}

/// Save options to a specific path, creating parent directories as needed.
pub fn save_to_path(options: ValidationOptions, path: &Path) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|source| ConfigError::Write {
            path: parent.to_path_buf(),
            source,
        })?;
    }
    let text = toml::to_string_pretty(&ConfigFile {
        validation: options,
    })
    .map_err(|source| ConfigError::SerializeToml {
        path: path.to_path_buf(),
        source,
    })?;
    std::fs::write(path, text).map_err(|source| ConfigError::Write {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let options = load_from_path(&dir.path().join(CONFIG_FILE_NAME)).unwrap();
        assert_eq!(options, ValidationOptions::default());
    }

    #[test]
    fn options_round_trip_through_toml() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join(CONFIG_FILE_NAME);
        let options = ValidationOptions {
            presentation: PresentationMode::Toast,
            name_mode: NameMode::First,
            github_mode: GithubMode::RequireAt,
        };
        save_to_path(options, &path).unwrap();
        assert_eq!(load_from_path(&path).unwrap(), options);
    }

    #[test]
    fn modes_serialize_as_kebab_case() {
        let text = toml::to_string_pretty(&ConfigFile {
            validation: ValidationOptions {
                presentation: PresentationMode::Below,
                name_mode: NameMode::Full,
                github_mode: GithubMode::RequireAt,
            },
        })
        .unwrap();
        assert!(text.contains("presentation = \"below\""));
        assert!(text.contains("name = \"full\""));
        assert!(text.contains("github = \"require-at\""));
    }

    #[test]
    fn unknown_keys_are_tolerated() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);
        std::fs::write(
            &path,
            "[validation]\npresentation = \"alert\"\n\n[future]\nflag = true\n",
        )
        .unwrap();
        let options = load_from_path(&path).unwrap();
        assert_eq!(options.presentation, PresentationMode::Alert);
    }
}
