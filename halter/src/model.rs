//! Topology model of a project: devices, the software they run and the
//! networks they attach to.
//!
//! Records reference each other by name only. A device lists software names
//! and an interface names its network; lookups that miss are not errors.

use std::fmt::{self, Display, Formatter};

use serde::{Deserialize, Serialize};

/// Transport protocol of a software port.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Protocol {
    #[serde(rename = "TCP", alias = "tcp", alias = "Tcp")]
    Tcp,
    #[serde(rename = "UDP", alias = "udp", alias = "Udp")]
    Udp,
}

impl Protocol {
    pub fn as_str(self) -> &'static str {
        match self {
            Protocol::Tcp => "TCP",
            Protocol::Udp => "UDP",
        }
    }
}

/// Declared traffic direction of a port, seen from the device running it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    #[serde(rename = "In", alias = "Inbound", alias = "in", alias = "inbound")]
    Inbound,
    #[serde(rename = "Out", alias = "Outbound", alias = "out", alias = "outbound")]
    Outbound,
    #[serde(alias = "both")]
    Both,
}

impl Display for Direction {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Direction::Inbound => "In",
            Direction::Outbound => "Out",
            Direction::Both => "Both",
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Port {
    pub index: u16,
    pub protocol: Protocol,
    pub direction: Direction,
    #[serde(default)]
    pub description: String,
}

impl Port {
    pub fn new(index: u16, protocol: Protocol, direction: Direction) -> Self {
        Self {
            index,
            protocol,
            direction,
            description: String::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Software {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub version: String,
    #[serde(default)]
    pub ports: Vec<Port>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetworkInterface {
    pub name: String,
    /// Name of the [`Network`] this interface is attached to.
    pub network_id: String,
    #[serde(default)]
    pub address: String,
    /// Networks reachable through this interface.
    #[serde(default)]
    pub routes: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Device {
    /// NetBIOS-style host name, at most 15 characters.
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub model: String,
    #[serde(default)]
    pub role: String,
    #[serde(default)]
    pub interfaces: Vec<NetworkInterface>,
    #[serde(default, alias = "software_used")]
    pub installed_software: Vec<String>,
    /// Firewall engine the device runs, e.g. `iptables`.
    #[serde(default, alias = "firewall_id")]
    pub firewall_engine: Option<String>,
    #[serde(default, alias = "area_type")]
    pub area_tags: Vec<String>,
}

impl Device {
    /// Whether both devices carry at least one common area tag.
    pub fn shares_area_with(&self, other: &Device) -> bool {
        self.area_tags.iter().any(|tag| other.area_tags.contains(tag))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vlan {
    pub id: u16,
    #[serde(default)]
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Network {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub vlan: Option<Vlan>,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub gateway: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Area {
    pub name: String,
    #[serde(default)]
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub networks: Vec<Network>,
    #[serde(default)]
    pub devices: Vec<Device>,
    #[serde(default)]
    pub software: Vec<Software>,
    #[serde(default)]
    pub areas: Vec<Area>,
}

impl Project {
    pub fn device(&self, name: &str) -> Option<&Device> {
        self.devices.iter().find(|device| device.name == name)
    }

    pub fn network(&self, name: &str) -> Option<&Network> {
        self.networks.iter().find(|network| network.name == name)
    }
}
