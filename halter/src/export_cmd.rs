use anyhow::{bail, Result};
use halter::export::{export_project, render_export_text};
use halter::report::colorize;
use halter::settings::Settings;

use crate::cli::{ExportArgs, OutputFormat};

pub fn run_export(args: ExportArgs, settings: &Settings) -> Result<()> {
    let (project, _) = crate::open_project(args.project.as_deref(), settings)?;
    let output = args.output.unwrap_or_else(|| settings.output_dir.clone());

    let report = export_project(&project, &output);

    match args.format {
        OutputFormat::Text => println!("{}", colorize(&render_export_text(&report))),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
    }

    if report.failed > 0 {
        bail!("export failed for {} of {} devices", report.failed, report.devices.len());
    }
    Ok(())
}
