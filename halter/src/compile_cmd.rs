use anyhow::{Context, Result};
use fw_ruleset::render_iptables;
use halter::compile::{compile_device, SoftwareCatalog};
use halter::settings::Settings;

use crate::cli::{CompileArgs, OutputFormat};

pub fn run_compile(args: CompileArgs, settings: &Settings) -> Result<()> {
    let (project, path) = crate::open_project(args.project.as_deref(), settings)?;
    let device = project.device(&args.device).with_context(|| {
        format!(
            "device '{}' not found in {}",
            args.device,
            path.display()
        )
    })?;

    let catalog = SoftwareCatalog::new(&project.software);
    let compiled = compile_device(device, &project.devices, &catalog);

    match args.format {
        OutputFormat::Text => {
            let script = render_iptables(&compiled.config)
                .with_context(|| format!("failed to render ruleset for {}", device.name))?;
            print!("{script}");
        }
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&compiled)?),
    }
    Ok(())
}
