use anyhow::{bail, Result};
use halter::check::{check_project, render_check_text};
use halter::report::colorize;
use halter::settings::Settings;

use crate::cli::{CheckArgs, OutputFormat};

pub fn run_check(args: CheckArgs, settings: &Settings) -> Result<()> {
    let (project, _) = crate::open_project(args.project.as_deref(), settings)?;
    let report = check_project(&project);

    match args.format {
        OutputFormat::Text => println!("{}", colorize(&render_check_text(&report))),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
    }

    if report.errors > 0 {
        bail!("check failed: {} errors", report.errors);
    }
    if args.strict && report.warnings > 0 {
        bail!("check failed in strict mode: {} warnings", report.warnings);
    }
    Ok(())
}
