//! Per-device firewall policy compiler.
//!
//! A device's ruleset is derived from the shared, read-only project model:
//!
//! 1. Collect the device's port inventory from its installed software.
//! 2. Find peers: other devices sharing an area tag and a port index.
//! 3. Resolve each shared index to an allowed direction, or a conflict.
//! 4. Emit accept rules per reachable peer address, batched to the multiport limit.
//! 5. Wrap the result: security baseline first, default-deny tail last, and
//!    every default chain policy set to drop.
//!
//! Rule order is significant because the firewall stops at the first match.
//! Peers are visited in project order so the same project always yields the
//! same ruleset.

pub mod direction;
pub mod inventory;
pub mod peers;
pub mod policy;
pub mod synth;


use fw_ruleset::{FirewallConfig, FirewallRule};
use serde::Serialize;
use tracing::{debug, warn};

use crate::model::{Device, Software};

pub use direction::{resolve_direction, Resolution};
pub use inventory::{port_inventory, unique_ports_by_index, SoftwareCatalog};
pub use peers::{find_peers, reachable_addresses, PeerMatch};
pub use policy::{default_deny_tail, security_baseline};
pub use synth::{chunk_ports, DirectionConflict, PortGroups};

/// Result of compiling one device.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeviceCompilation {
    pub device: String,
    pub config: FirewallConfig,
    /// Peers that contributed at least one rule, in project order.
    pub peers: Vec<String>,
    pub conflicts: Vec<DirectionConflict>,
}

impl DeviceCompilation {
    /// Number of rules derived from peers, excluding baseline and tail.
    pub fn derived_rule_count(&self) -> usize {
        self.config.rules.len() - security_baseline().len() - default_deny_tail().len()
    }
}

/// Compile the ruleset of `device` against the rest of the project.
pub fn compile_device(
    device: &Device,
    devices: &[Device],
    catalog: &SoftwareCatalog<'_>,
) -> DeviceCompilation {
    let subject_ports = port_inventory(device, catalog);

    let mut derived: Vec<FirewallRule> = Vec::new();
    let mut peers = Vec::new();
    let mut conflicts = Vec::new();

    for candidate in find_peers(device, &subject_ports, devices, catalog) {
        let addresses = reachable_addresses(device, candidate.peer);
        if addresses.is_empty() {
            debug!(
                device = %device.name,
                peer = %candidate.peer.name,
                "peer shares ports but no network; skipping"
            );
            continue;
        }

        let (groups, peer_conflicts) = PortGroups::resolve(
            &candidate.peer.name,
            &subject_ports,
            &candidate.inventory,
            &candidate.common,
        );
        for conflict in &peer_conflicts {
            warn!(
                device = %device.name,
                peer = %conflict.peer,
                port = conflict.port,
                "incompatible directions {}+{}; no rule emitted",
                conflict.subject_direction,
                conflict.peer_direction
            );
        }
        conflicts.extend(peer_conflicts);

        if groups.is_empty() {
            continue;
        }
        for address in addresses {
            derived.extend(groups.rules_for(address));
        }
        peers.push(candidate.peer.name.clone());
    }

    let mut rules = security_baseline().to_vec();
    rules.extend(derived);
    rules.extend_from_slice(default_deny_tail());

    DeviceCompilation {
        device: device.name.clone(),
        config: FirewallConfig::deny_by_default(rules),
        peers,
        conflicts,
    }
}

/// Convenience wrapper returning only the ruleset.
pub fn generate_firewall_config(
    device: &Device,
    devices: &[Device],
    software: &[Software],
) -> FirewallConfig {
    compile_device(device, devices, &SoftwareCatalog::new(software)).config
}
