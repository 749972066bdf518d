//! Port inventories: which ports a device exposes through its software.

use std::collections::btree_map::Entry;
use std::collections::BTreeMap;

use crate::model::{Device, Direction, Port, Software};

/// Software records keyed by name.
///
/// When two records share a name the later one wins.
#[derive(Debug, Clone, Default)]
pub struct SoftwareCatalog<'a> {
    by_name: BTreeMap<&'a str, &'a Software>,
}

impl<'a> SoftwareCatalog<'a> {
    pub fn new(software: &'a [Software]) -> Self {
        let by_name = software
            .iter()
            .map(|sw| (sw.name.as_str(), sw))
            .collect();
        Self { by_name }
    }

    pub fn get(&self, name: &str) -> Option<&'a Software> {
        self.by_name.get(name).copied()
    }

    pub fn len(&self) -> usize {
        self.by_name.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_name.is_empty()
    }
}

/// All ports contributed by the software installed on `device`, in install
/// order. Names missing from the catalog contribute nothing.
pub fn port_inventory(device: &Device, catalog: &SoftwareCatalog<'_>) -> Vec<Port> {
    device
        .installed_software
        .iter()
        .filter_map(|name| catalog.get(name))
        .flat_map(|sw| sw.ports.iter().cloned())
        .collect()
}

/// Collapse an inventory to one port per index.
///
/// A `Both` declaration replaces whatever was recorded at the same index
/// before it; between two one-way declarations the first one stays.
pub fn unique_ports_by_index(ports: &[Port]) -> BTreeMap<u16, Port> {
    let mut by_index: BTreeMap<u16, Port> = BTreeMap::new();
    for port in ports {
        match by_index.entry(port.index) {
            Entry::Vacant(slot) => {
                slot.insert(port.clone());
            }
            Entry::Occupied(mut slot) => {
                if port.direction == Direction::Both {
                    slot.insert(port.clone());
                }
            }
        }
    }
    by_index
}
