use fw_ruleset::{
    render_iptables, render_json, Chain, FirewallConfig, FirewallRule, RenderError, RuleAction,
    RuleProtocol,
};
use pretty_assertions::assert_eq;

fn sample_config() -> FirewallConfig {
    FirewallConfig::deny_by_default(vec![
        FirewallRule::accept(Chain::Input).interface_in("lo"),
        FirewallRule::accept(Chain::Input)
            .protocol(RuleProtocol::Tcp)
            .destination_ports(vec![502, 2404])
            .source("10.0.0.2"),
        FirewallRule::drop(Chain::Input)
            .protocol(RuleProtocol::Tcp)
            .destination_ports(vec![22]),
    ])
}

#[test]
fn script_has_policies_then_rules_in_order() {
    let script = render_iptables(&sample_config()).expect("render");
    let lines: Vec<&str> = script.lines().collect();

    assert_eq!(lines[0], "#!/bin/bash");
    let body: Vec<&str> = lines
        .iter()
        .copied()
        .filter(|line| line.starts_with("iptables -P") || line.starts_with("iptables -A"))
        .collect();
    assert_eq!(
        body,
        vec![
            "iptables -P INPUT DROP",
            "iptables -P OUTPUT DROP",
            "iptables -P FORWARD DROP",
            "iptables -A INPUT -i lo -j ACCEPT",
            "iptables -A INPUT -p tcp -m multiport --dports 502,2404 -s 10.0.0.2 -j ACCEPT",
            "iptables -A INPUT -p tcp --dport 22 -j DROP",
        ]
    );
}

#[test]
fn script_flushes_before_policies_and_saves_at_end() {
    let script = render_iptables(&sample_config()).expect("render");
    let flush = script.find("iptables -F\n").expect("flush");
    let policy = script.find("iptables -P INPUT").expect("policy");
    let save = script.find("/sbin/iptables-save").expect("save");

    assert!(script.contains("$EUID -ne 0"));
    assert!(flush < policy);
    assert!(policy < save);
    assert!(script.ends_with("/sbin/iptables-save > /etc/iptables.rules\n"));
}

#[test]
fn custom_default_policies_are_rendered() {
    let mut config = sample_config();
    config.default_policy_forward = RuleAction::Reject;
    let script = render_iptables(&config).expect("render");
    assert!(script.contains("iptables -P FORWARD REJECT\n"));
}

#[test]
fn rendering_is_deterministic() {
    let config = sample_config();
    let first = render_iptables(&config).expect("render");
    let second = render_iptables(&config.clone()).expect("render");
    assert_eq!(first, second);
}

#[test]
fn malformed_rule_reports_its_position() {
    let mut config = sample_config();
    config
        .rules
        .push(FirewallRule::accept(Chain::Output).source_ports(vec![53]));

    match render_iptables(&config) {
        Err(RenderError::InvalidRule { position, .. }) => assert_eq!(position, 3),
        other => panic!("unexpected result: {other:?}"),
    }
}

#[test]
fn json_output_lists_rules() {
    let json = render_json(&sample_config()).expect("render");
    let value: serde_json::Value = serde_json::from_str(&json).expect("parse");
    assert_eq!(value["default_policy_input"], "DROP");
    assert_eq!(value["rules"].as_array().map(Vec::len), Some(3));
    assert_eq!(value["rules"][1]["destination_ports"][1], 2404);
}
