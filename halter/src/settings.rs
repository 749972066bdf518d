use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

/// Tool settings: where to read the project and where to export scripts.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Settings {
    pub project_file: PathBuf,
    pub output_dir: PathBuf,
}

/// Optional override file; missing keys fall back to the embedded defaults.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct SettingsOverride {
    project_file: Option<PathBuf>,
    output_dir: Option<PathBuf>,
}

#[derive(Debug, Error)]
pub enum SettingsLoadError {
    #[error("failed to read settings file {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
    #[error("failed to parse settings file {path}: {source}")]
    Parse {
        path: String,
        source: toml::de::Error,
    },
}

const EMBEDDED: &str = include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/defaults/settings.toml"));

/// Built-in settings.
pub fn default_settings() -> Result<Settings, SettingsLoadError> {
    toml::from_str(EMBEDDED).map_err(|source| SettingsLoadError::Parse {
        path: "embedded defaults".to_string(),
        source,
    })
}

/// Load settings, layering `path` over the built-in defaults.
///
/// Returns the settings together with a description of their source.
pub fn load_settings(path: Option<&Path>) -> Result<(Settings, String), SettingsLoadError> {
    let defaults = default_settings()?;
    let Some(path) = path else {
        return Ok((defaults, "embedded".to_string()));
    };

    let raw = fs::read_to_string(path).map_err(|source| SettingsLoadError::Io {
        path: path.display().to_string(),
        source,
    })?;
    let overrides: SettingsOverride =
        toml::from_str(&raw).map_err(|source| SettingsLoadError::Parse {
            path: path.display().to_string(),
            source,
        })?;

    let settings = Settings {
        project_file: overrides.project_file.unwrap_or(defaults.project_file),
        output_dir: overrides.output_dir.unwrap_or(defaults.output_dir),
    };
    Ok((settings, format!("file:{}", path.display())))
}
