//! Ordered firewall ruleset values and renderers for concrete firewall engines.

pub mod backend;
pub mod render;
pub mod rule;
pub mod writer;

pub use backend::Backend;
pub use render::{render_iptables, render_json, render_rule, RenderError};
pub use rule::{
    join_ports, Chain, ConnState, FirewallConfig, FirewallRule, IcmpType, RuleAction,
    RuleProtocol, TcpFlags, MULTIPORT_LIMIT,
};
pub use writer::{write_script, WriteError};
