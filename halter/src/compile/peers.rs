//! Peer selection: which other devices a device exchanges traffic with.

use std::collections::BTreeSet;

use crate::compile::inventory::{port_inventory, SoftwareCatalog};
use crate::model::{Device, Port};

/// A device sharing an area tag and at least one port index with the subject.
#[derive(Debug, Clone)]
pub struct PeerMatch<'a> {
    pub peer: &'a Device,
    /// Full port inventory of the peer.
    pub inventory: Vec<Port>,
    /// Port indices present on both sides, regardless of protocol.
    pub common: BTreeSet<u16>,
}

/// Candidate peers of `subject`, in `devices` order.
///
/// Only devices with a shared area tag are compared. Peers without a common
/// port index are left out.
pub fn find_peers<'a>(
    subject: &Device,
    subject_ports: &[Port],
    devices: &'a [Device],
    catalog: &SoftwareCatalog<'_>,
) -> Vec<PeerMatch<'a>> {
    let subject_indices: BTreeSet<u16> = subject_ports.iter().map(|port| port.index).collect();

    devices
        .iter()
        .filter(|other| other.name != subject.name && subject.shares_area_with(other))
        .filter_map(|other| {
            let inventory = port_inventory(other, catalog);
            let common: BTreeSet<u16> = inventory
                .iter()
                .map(|port| port.index)
                .filter(|index| subject_indices.contains(index))
                .collect();
            if common.is_empty() {
                None
            } else {
                Some(PeerMatch {
                    peer: other,
                    inventory,
                    common,
                })
            }
        })
        .collect()
}

/// Peer addresses the subject can reach directly or over a route.
///
/// Walks the subject's interfaces in order and takes, for each one, the first
/// peer interface on the same network or routing to it.
pub fn reachable_addresses<'a>(subject: &Device, peer: &'a Device) -> Vec<&'a str> {
    subject
        .interfaces
        .iter()
        .filter_map(|local| {
            peer.interfaces
                .iter()
                .find(|remote| {
                    remote.network_id == local.network_id
                        || remote.routes.contains(&local.network_id)
                })
                .map(|remote| remote.address.as_str())
        })
        .collect()
}
