use crate::render::RenderError;
use crate::rule::{join_ports, Chain, FirewallConfig, FirewallRule, RuleProtocol, MULTIPORT_LIMIT};

const PREAMBLE: &[&str] = &[
    "#!/bin/bash",
    "# Refuse to run without administrative privileges",
    "if [[ $EUID -ne 0 ]]; then",
    "    echo 'This script must be run as root'",
    "    exit 1",
    "fi",
    "",
    "iptables -F",
    "iptables -F -t nat",
    "iptables -F -t mangle",
    "iptables -X",
    "iptables -t nat -X",
    "iptables -t mangle -X",
    "",
];

const POSTAMBLE: &[&str] = &[
    "",
    "# Restore the saved ruleset whenever an interface comes up",
    "mkdir -p /etc/network/if-pre-up.d",
    "echo '#!/bin/sh' | tee /etc/network/if-pre-up.d/iptables",
    "echo 'iptables-restore < /etc/iptables.rules' | tee -a /etc/network/if-pre-up.d/iptables",
    "echo 'exit 0' | tee -a /etc/network/if-pre-up.d/iptables",
    "chmod +x /etc/network/if-pre-up.d/iptables",
    "",
    "# Save the active ruleset",
    "/sbin/iptables-save > /etc/iptables.rules",
];

/// Render a complete iptables bash script for `config`.
///
/// Layout: privilege check and flush, three default policies, one `-A`
/// statement per rule in order, then the persistence block.
pub fn render_iptables(config: &FirewallConfig) -> Result<String, RenderError> {
    let mut lines: Vec<String> = PREAMBLE.iter().map(|line| (*line).to_string()).collect();

    for chain in [Chain::Input, Chain::Output, Chain::Forward] {
        lines.push(format!(
            "iptables -P {} {}",
            chain.as_str(),
            config.default_policy(chain).as_str()
        ));
    }
    lines.push(String::new());

    for (position, rule) in config.rules.iter().enumerate() {
        let line = render_rule(rule).map_err(|reason| RenderError::InvalidRule {
            position,
            rule: rule.to_string(),
            reason,
        })?;
        lines.push(line);
    }

    lines.extend(POSTAMBLE.iter().map(|line| (*line).to_string()));

    let mut out = lines.join("\n");
    out.push('\n');
    Ok(out)
}

/// Render one `iptables -A` statement.
///
/// Returns the reason as a plain string when the rule cannot be expressed.
pub fn render_rule(rule: &FirewallRule) -> Result<String, String> {
    check_rule(rule)?;

    let mut parts: Vec<String> = vec!["iptables".into(), "-A".into(), rule.chain.as_str().into()];

    if let Some(protocol) = rule.protocol {
        parts.push("-p".into());
        parts.push(protocol.as_str().into());
    }
    if let Some(flags) = rule.tcp_flags {
        parts.push(flags.as_str().into());
    }
    if !rule.states.is_empty() {
        let states = rule
            .states
            .iter()
            .map(|state| state.as_str())
            .collect::<Vec<_>>()
            .join(",");
        parts.push("-m state --state".into());
        parts.push(states);
    }
    if let Some(icmp_type) = rule.icmp_type {
        parts.push("--icmp-type".into());
        parts.push(icmp_type.as_str().into());
    }
    if let Some(name) = &rule.interface_in {
        parts.push("-i".into());
        parts.push(name.clone());
    }
    if let Some(name) = &rule.interface_out {
        parts.push("-o".into());
        parts.push(name.clone());
    }
    push_ports(&mut parts, &rule.source_ports, "--sport", "--sports");
    push_ports(&mut parts, &rule.destination_ports, "--dport", "--dports");
    if let Some(source) = &rule.source {
        parts.push("-s".into());
        parts.push(source.clone());
    }
    if let Some(destination) = &rule.destination {
        parts.push("-d".into());
        parts.push(destination.clone());
    }

    parts.push("-j".into());
    parts.push(rule.action.as_str().into());
    Ok(parts.join(" "))
}

fn push_ports(parts: &mut Vec<String>, ports: &[u16], single: &str, multi: &str) {
    match ports.len() {
        0 => {}
        1 => {
            parts.push(single.into());
            parts.push(ports[0].to_string());
        }
        _ => {
            parts.push(format!("-m multiport {multi}"));
            parts.push(join_ports(ports));
        }
    }
}

fn check_rule(rule: &FirewallRule) -> Result<(), String> {
    let has_ports = !rule.source_ports.is_empty() || !rule.destination_ports.is_empty();
    if has_ports {
        match rule.protocol {
            None => return Err("port match without a protocol".to_string()),
            Some(protocol) if !protocol.has_ports() => {
                return Err(format!(
                    "port match is not valid for protocol {}",
                    protocol.as_str()
                ))
            }
            Some(_) => {}
        }
    }
    for (label, ports) in [
        ("source", &rule.source_ports),
        ("destination", &rule.destination_ports),
    ] {
        if ports.len() > MULTIPORT_LIMIT {
            return Err(format!(
                "{} {label} ports exceed the multiport limit of {MULTIPORT_LIMIT}",
                ports.len()
            ));
        }
    }
    for (flag, value) in [
        ("-s", &rule.source),
        ("-d", &rule.destination),
        ("-i", &rule.interface_in),
        ("-o", &rule.interface_out),
    ] {
        if let Some(value) = value {
            if value.trim().is_empty() || value.contains(char::is_whitespace) {
                return Err(format!("{flag} needs a single non-empty argument, got '{value}'"));
            }
        }
    }
    if rule.tcp_flags.is_some() && rule.protocol != Some(RuleProtocol::Tcp) {
        return Err("tcp flags require protocol tcp".to_string());
    }
    if rule.icmp_type.is_some() && rule.protocol != Some(RuleProtocol::Icmp) {
        return Err("icmp type requires protocol icmp".to_string());
    }
    Ok(())
}
