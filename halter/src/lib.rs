//! Firewall policy compiler for network architecture projects.
//!
//! A project describes devices, the software installed on them (with the
//! ports that software listens on or connects to), the networks they attach
//! to and the areas they belong to. From that model this crate derives one
//! iptables ruleset per device and writes it out as an executable script.
//!
//! # Modules
//!
//! - [`model`]: Project, device, software, port and network records
//! - [`project`]: Loading projects from YAML, TOML or JSON
//! - [`compile`]: Per-device compiler (inventories, peers, direction
//!   resolution, rule synthesis, baseline and tail policy)
//! - [`check`]: Consistency report over a project (names, references, conflicts)
//! - [`export`]: Writes `<output>/<project>/<device>/iptables.sh` for every device
//! - [`settings`]: TOML settings with embedded defaults
//! - [`report`]: Terminal coloring for text reports
//!
//! # Examples
//!
//! ```ignore
//! use halter::compile::{compile_device, SoftwareCatalog};
//! use halter::project::load_project;
//!
//! let project = load_project("project.yaml".as_ref())?;
//! let catalog = SoftwareCatalog::new(&project.software);
//! let plc = project.device("PLC01").expect("device");
//! let compiled = compile_device(plc, &project.devices, &catalog);
//! print!("{}", fw_ruleset::render_iptables(&compiled.config)?);
//! ```

pub mod check;
pub mod compile;
pub mod export;
pub mod model;
pub mod project;
pub mod report;
pub mod settings;
