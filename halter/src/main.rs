use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use halter::model::Project;
use halter::project::load_project;
use halter::settings::{load_settings, Settings};
use tracing::debug;

mod check_cmd;
mod cli;
mod compile_cmd;
mod export_cmd;
mod logging;

use cli::{Cli, Command};

fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init_logging(cli.verbose);

    let (settings, source) = load_settings(cli.config.as_deref())
        .with_context(|| "failed to load settings")?;
    debug!(source = %source, "settings loaded");

    match cli.command {
        Command::Compile(args) => compile_cmd::run_compile(args, &settings),
        Command::Export(args) => export_cmd::run_export(args, &settings),
        Command::Check(args) => check_cmd::run_check(args, &settings),
    }
}

/// Load the project named on the command line, or the one from settings.
fn open_project(arg: Option<&Path>, settings: &Settings) -> Result<(Project, PathBuf)> {
    let path = arg
        .map(Path::to_path_buf)
        .unwrap_or_else(|| settings.project_file.clone());
    let project = load_project(&path)
        .with_context(|| format!("failed to load project {}", path.display()))?;
    Ok((project, path))
}
