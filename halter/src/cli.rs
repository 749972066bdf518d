use std::path::PathBuf;

use clap::{Parser, ValueEnum};

#[derive(Parser, Debug)]
#[command(name = "halter")]
#[command(about = "Compile per-device firewall scripts from a network architecture project")]
pub struct Cli {
    /// Settings file (TOML). Built-in defaults are used when omitted.
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,
    /// Log debug details to stderr.
    #[arg(short, long, global = true)]
    pub verbose: bool,
    #[command(subcommand)]
    pub command: Command,
}

#[derive(clap::Subcommand, Debug)]
pub enum Command {
    /// Compile one device and print its firewall script.
    Compile(CompileArgs),
    /// Write firewall scripts for every device of a project.
    Export(ExportArgs),
    /// Check a project for dangling references and direction conflicts.
    Check(CheckArgs),
}

#[derive(Parser, Debug)]
pub struct CompileArgs {
    /// Project file (.yaml, .yml, .toml or .json).
    pub project: Option<PathBuf>,
    /// Device to compile.
    #[arg(short, long)]
    pub device: String,
    /// `text` prints the iptables script, `json` the ruleset and conflicts.
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,
}

#[derive(Parser, Debug)]
pub struct ExportArgs {
    /// Project file (.yaml, .yml, .toml or .json).
    pub project: Option<PathBuf>,
    /// Output root; scripts land in <output>/<project>/<device>/.
    #[arg(short, long)]
    pub output: Option<PathBuf>,
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,
}

#[derive(Parser, Debug)]
pub struct CheckArgs {
    /// Project file (.yaml, .yml, .toml or .json).
    pub project: Option<PathBuf>,
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,
    /// Treat warnings as failures.
    #[arg(long)]
    pub strict: bool,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}
