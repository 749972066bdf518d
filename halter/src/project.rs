use std::fs;
use std::path::Path;

use thiserror::Error;

use crate::model::Project;

/// Errors returned when loading a project file.
#[derive(Debug, Error)]
pub enum ProjectLoadError {
    #[error("failed to read project file {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
    #[error("failed to parse YAML project {path}: {source}")]
    Yaml {
        path: String,
        source: serde_yaml::Error,
    },
    #[error("failed to parse TOML project {path}: {source}")]
    Toml {
        path: String,
        source: toml::de::Error,
    },
    #[error("failed to parse JSON project {path}: {source}")]
    Json {
        path: String,
        source: serde_json::Error,
    },
    #[error("unsupported project format for {path} (expected .yaml, .yml, .toml or .json)")]
    UnsupportedFormat { path: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ProjectFormat {
    Yaml,
    Toml,
    Json,
}

/// Load a project, choosing the parser from the file extension.
pub fn load_project(path: &Path) -> Result<Project, ProjectLoadError> {
    let display = path.display().to_string();
    let format = format_for(path).ok_or_else(|| ProjectLoadError::UnsupportedFormat {
        path: display.clone(),
    })?;
    let raw = fs::read_to_string(path).map_err(|source| ProjectLoadError::Io {
        path: display.clone(),
        source,
    })?;
    parse_project(&raw, format, display)
}

fn format_for(path: &Path) -> Option<ProjectFormat> {
    let ext = path.extension()?.to_str()?.to_ascii_lowercase();
    match ext.as_str() {
        "yaml" | "yml" => Some(ProjectFormat::Yaml),
        "toml" => Some(ProjectFormat::Toml),
        "json" => Some(ProjectFormat::Json),
        _ => None,
    }
}

fn parse_project(
    raw: &str,
    format: ProjectFormat,
    path: String,
) -> Result<Project, ProjectLoadError> {
    match format {
        ProjectFormat::Yaml => {
            serde_yaml::from_str(raw).map_err(|source| ProjectLoadError::Yaml { path, source })
        }
        ProjectFormat::Toml => {
            toml::from_str(raw).map_err(|source| ProjectLoadError::Toml { path, source })
        }
        ProjectFormat::Json => {
            serde_json::from_str(raw).map_err(|source| ProjectLoadError::Json { path, source })
        }
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::{load_project, ProjectLoadError};

    #[test]
    fn loads_yaml_project() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("project.yaml");
        fs::write(
            &path,
            r#"
name: Plant
description: pump station
devices:
  - name: PLC01
    area_tags: [Process]
"#,
        )
        .expect("write");

        let project = load_project(&path).expect("load");
        assert_eq!(project.name, "Plant");
        assert_eq!(project.devices.len(), 1);
        assert!(project.software.is_empty());
    }

    #[test]
    fn loads_toml_project() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("project.toml");
        fs::write(
            &path,
            r#"
name = "Plant"

[[software]]
name = "Ntp"
ports = [{ index = 123, protocol = "UDP", direction = "Both" }]
"#,
        )
        .expect("write");

        let project = load_project(&path).expect("load");
        assert_eq!(project.software[0].ports[0].index, 123);
    }

    #[test]
    fn loads_json_project() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("project.JSON");
        fs::write(&path, r#"{"name": "Plant", "networks": [{"name": "LAN1"}]}"#).expect("write");

        let project = load_project(&path).expect("load");
        assert!(project.network("LAN1").is_some());
    }

    #[test]
    fn rejects_unknown_extension() {
        let err = load_project(std::path::Path::new("project.xml")).expect_err("should fail");
        assert!(matches!(err, ProjectLoadError::UnsupportedFormat { .. }));
    }

    #[test]
    fn reports_parse_errors_with_path() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("broken.yaml");
        fs::write(&path, "devices: [").expect("write");

        let err = load_project(&path).expect_err("should fail");
        match err {
            ProjectLoadError::Yaml { path: reported, .. } => assert!(reported.ends_with("broken.yaml")),
            other => panic!("unexpected error variant: {other}"),
        }
    }

    #[test]
    fn missing_file_is_io_error() {
        let dir = tempfile::tempdir().expect("tempdir");
        let err = load_project(&dir.path().join("absent.yml")).expect_err("should fail");
        assert!(matches!(err, ProjectLoadError::Io { .. }));
    }
}
