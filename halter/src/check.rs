//! Project consistency checks.
//!
//! The compiler assumes a well-formed project and silently ignores dangling
//! references. This module reports those problems up front so they can be
//! fixed before export.

use std::collections::BTreeSet;
use std::net::IpAddr;

use fw_ruleset::Backend;
use serde::Serialize;

use crate::compile::{compile_device, SoftwareCatalog};
use crate::model::Project;

/// Longest NetBIOS host name.
pub const MAX_DEVICE_NAME_LEN: usize = 15;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum CheckSeverity {
    Error,
    Warning,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CheckIssue {
    pub severity: CheckSeverity,
    pub code: String,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CheckReport {
    pub project: String,
    pub devices: usize,
    pub errors: usize,
    pub warnings: usize,
    pub issues: Vec<CheckIssue>,
}

pub fn check_project(project: &Project) -> CheckReport {
    let mut issues = Vec::new();
    issues.extend(device_name_issues(project));
    issues.extend(port_issues(project));
    issues.extend(vlan_issues(project));
    issues.extend(software_reference_issues(project));
    issues.extend(network_reference_issues(project));
    issues.extend(address_issues(project));
    issues.extend(engine_issues(project));
    issues.extend(direction_issues(project));

    let errors = issues
        .iter()
        .filter(|i| i.severity == CheckSeverity::Error)
        .count();
    let warnings = issues
        .iter()
        .filter(|i| i.severity == CheckSeverity::Warning)
        .count();

    CheckReport {
        project: project.name.clone(),
        devices: project.devices.len(),
        errors,
        warnings,
        issues,
    }
}

pub fn render_check_text(report: &CheckReport) -> String {
    let mut out = Vec::new();
    out.push(format!(
        "check project={} devices={}",
        report.project, report.devices
    ));
    out.push(format!(
        "result errors={} warnings={}",
        report.errors, report.warnings
    ));
    out.push("issues".to_string());
    if report.issues.is_empty() {
        out.push("- none".to_string());
        return out.join("\n");
    }
    for issue in &report.issues {
        let sev = match issue.severity {
            CheckSeverity::Error => "error",
            CheckSeverity::Warning => "warning",
        };
        out.push(format!("- [{sev}] {}: {}", issue.code, issue.message));
    }
    out.join("\n")
}

fn device_name_issues(project: &Project) -> Vec<CheckIssue> {
    let mut out = Vec::new();
    let mut seen = BTreeSet::new();
    for device in &project.devices {
        if device.name.chars().count() > MAX_DEVICE_NAME_LEN {
            out.push(err(
                "device_name_too_long",
                &format!(
                    "device '{}' exceeds {MAX_DEVICE_NAME_LEN} characters",
                    device.name
                ),
            ));
        }
        if !seen.insert(device.name.as_str()) {
            out.push(err(
                "duplicate_device_name",
                &format!("device name '{}' is used more than once", device.name),
            ));
        }
    }
    out
}

fn port_issues(project: &Project) -> Vec<CheckIssue> {
    let mut out = Vec::new();
    for sw in &project.software {
        for port in sw.ports.iter().filter(|port| port.index == 0) {
            out.push(err(
                "port_out_of_range",
                &format!(
                    "software '{}' declares {} port {} outside 1-65535",
                    sw.name,
                    port.protocol.as_str(),
                    port.index
                ),
            ));
        }
    }
    out
}

fn vlan_issues(project: &Project) -> Vec<CheckIssue> {
    project
        .networks
        .iter()
        .filter_map(|network| {
            let vlan = network.vlan.as_ref()?;
            if (1..=4094).contains(&vlan.id) {
                return None;
            }
            Some(err(
                "invalid_vlan_id",
                &format!(
                    "network '{}' uses VLAN id {} outside 1-4094",
                    network.name, vlan.id
                ),
            ))
        })
        .collect()
}

fn software_reference_issues(project: &Project) -> Vec<CheckIssue> {
    let catalog = SoftwareCatalog::new(&project.software);
    let mut out = Vec::new();
    for device in &project.devices {
        for name in &device.installed_software {
            if catalog.get(name).is_none() {
                out.push(warn(
                    "missing_software_reference",
                    &format!("device '{}' references unknown software '{name}'", device.name),
                ));
            }
        }
    }
    out
}

fn network_reference_issues(project: &Project) -> Vec<CheckIssue> {
    let mut out = Vec::new();
    for device in &project.devices {
        for iface in &device.interfaces {
            if project.network(&iface.network_id).is_none() {
                out.push(warn(
                    "missing_network_reference",
                    &format!(
                        "interface '{}' on '{}' is attached to unknown network '{}'",
                        iface.name, device.name, iface.network_id
                    ),
                ));
            }
            for route in &iface.routes {
                if project.network(route).is_none() {
                    out.push(warn(
                        "missing_network_reference",
                        &format!(
                            "interface '{}' on '{}' routes to unknown network '{route}'",
                            iface.name, device.name
                        ),
                    ));
                }
            }
        }
    }
    out
}

fn address_issues(project: &Project) -> Vec<CheckIssue> {
    let mut out = Vec::new();
    for device in &project.devices {
        for iface in &device.interfaces {
            if !is_address(&iface.address) {
                out.push(warn(
                    "invalid_interface_address",
                    &format!(
                        "interface '{}' on '{}' has address '{}' that is not an IP or IP/prefix",
                        iface.name, device.name, iface.address
                    ),
                ));
            }
        }
    }
    out
}

fn engine_issues(project: &Project) -> Vec<CheckIssue> {
    project
        .devices
        .iter()
        .filter_map(|device| {
            let id = device.firewall_engine.as_deref()?;
            if Backend::from_id(id).is_some() {
                return None;
            }
            Some(warn(
                "unknown_firewall_engine",
                &format!(
                    "device '{}' uses firewall engine '{id}' which has no renderer; it will not be exported",
                    device.name
                ),
            ))
        })
        .collect()
}

fn direction_issues(project: &Project) -> Vec<CheckIssue> {
    let catalog = SoftwareCatalog::new(&project.software);
    let mut seen = BTreeSet::new();
    let mut out = Vec::new();
    for device in &project.devices {
        for conflict in compile_device(device, &project.devices, &catalog).conflicts {
            // Both sides of a pair may record the same conflict.
            let pair = if device.name <= conflict.peer {
                (device.name.clone(), conflict.peer.clone())
            } else {
                (conflict.peer.clone(), device.name.clone())
            };
            if !seen.insert((pair, conflict.port)) {
                continue;
            }
            out.push(warn(
                "direction_conflict",
                &format!(
                    "'{}' and '{}' both declare port {} as {}",
                    device.name, conflict.peer, conflict.port, conflict.subject_direction
                ),
            ));
        }
    }
    out
}

fn is_address(value: &str) -> bool {
    let (addr, prefix) = match value.split_once('/') {
        Some((addr, prefix)) => (addr, Some(prefix)),
        None => (value, None),
    };
    let Ok(ip) = addr.parse::<IpAddr>() else {
        return false;
    };
    match prefix {
        None => true,
        Some(prefix) => {
            let max = if ip.is_ipv4() { 32 } else { 128 };
            prefix.parse::<u8>().is_ok_and(|bits| bits <= max)
        }
    }
}

fn err(code: &str, message: &str) -> CheckIssue {
    CheckIssue {
        severity: CheckSeverity::Error,
        code: code.to_string(),
        message: message.to_string(),
    }
}

fn warn(code: &str, message: &str) -> CheckIssue {
    CheckIssue {
        severity: CheckSeverity::Warning,
        code: code.to_string(),
        message: message.to_string(),
    }
}
