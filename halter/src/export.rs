//! Export driver: writes one firewall script per device.
//!
//! Output layout is `<root>/<project>/<device>/<script>`. Every device is
//! handled on its own; a failure is recorded in the report and the next
//! device is still exported.

use std::path::{Path, PathBuf};

use fw_ruleset::{write_script, Backend};
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::compile::{compile_device, SoftwareCatalog};
use crate::model::{Device, Project};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ExportOutcome {
    Written {
        path: PathBuf,
        engine: Backend,
        rules: usize,
        conflicts: usize,
    },
    Skipped {
        reason: String,
    },
    Failed {
        reason: String,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeviceExport {
    pub device: String,
    #[serde(flatten)]
    pub outcome: ExportOutcome,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExportReport {
    pub project: String,
    pub output_dir: PathBuf,
    pub written: usize,
    pub skipped: usize,
    pub failed: usize,
    pub devices: Vec<DeviceExport>,
}

/// Compile and write firewall scripts for every device of `project`.
pub fn export_project(project: &Project, output_root: &Path) -> ExportReport {
    let project_dir = output_root.join(&project.name);
    let catalog = SoftwareCatalog::new(&project.software);

    let devices: Vec<DeviceExport> = project
        .devices
        .iter()
        .map(|device| DeviceExport {
            device: device.name.clone(),
            outcome: export_device(device, project, &catalog, &project_dir),
        })
        .collect();

    let written = devices
        .iter()
        .filter(|d| matches!(d.outcome, ExportOutcome::Written { .. }))
        .count();
    let skipped = devices
        .iter()
        .filter(|d| matches!(d.outcome, ExportOutcome::Skipped { .. }))
        .count();
    let failed = devices.len() - written - skipped;

    ExportReport {
        project: project.name.clone(),
        output_dir: project_dir,
        written,
        skipped,
        failed,
        devices,
    }
}

fn export_device(
    device: &Device,
    project: &Project,
    catalog: &SoftwareCatalog<'_>,
    project_dir: &Path,
) -> ExportOutcome {
    let Some(engine_id) = device.firewall_engine.as_deref() else {
        debug!(device = %device.name, "no firewall engine; skipping");
        return ExportOutcome::Skipped {
            reason: "no firewall engine configured".to_string(),
        };
    };
    let Some(engine) = Backend::from_id(engine_id) else {
        debug!(device = %device.name, engine = engine_id, "unsupported firewall engine; skipping");
        return ExportOutcome::Skipped {
            reason: format!("unsupported firewall engine '{engine_id}'"),
        };
    };

    let compiled = compile_device(device, &project.devices, catalog);
    match write_script(&compiled.config, engine, &project_dir.join(&device.name)) {
        Ok(path) => {
            info!(device = %device.name, path = %path.display(), "firewall script written");
            ExportOutcome::Written {
                path,
                engine,
                rules: compiled.config.rules.len(),
                conflicts: compiled.conflicts.len(),
            }
        }
        Err(err) => {
            warn!(device = %device.name, "export failed: {err}");
            ExportOutcome::Failed {
                reason: err.to_string(),
            }
        }
    }
}

pub fn render_export_text(report: &ExportReport) -> String {
    let mut out = Vec::new();
    out.push(format!(
        "export project={} output={}",
        report.project,
        report.output_dir.display()
    ));
    out.push(format!(
        "result written={} skipped={} failed={}",
        report.written, report.skipped, report.failed
    ));
    for entry in &report.devices {
        let line = match &entry.outcome {
            ExportOutcome::Written {
                path,
                engine,
                rules,
                conflicts,
            } => format!(
                "- {} written engine={engine} rules={rules} conflicts={conflicts} path={}",
                entry.device,
                path.display()
            ),
            ExportOutcome::Skipped { reason } => format!("- {} skipped: {reason}", entry.device),
            ExportOutcome::Failed { reason } => format!("- {} failed: {reason}", entry.device),
        };
        out.push(line);
    }
    out.join("\n")
}
