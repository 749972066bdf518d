use std::fmt::{self, Display, Formatter};

use serde::Serialize;

/// Largest number of ports a single multiport match may reference.
pub const MULTIPORT_LIMIT: usize = 15;

/// Packet evaluation point a rule is appended to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Chain {
    Input,
    Output,
    Forward,
}

impl Chain {
    pub fn as_str(self) -> &'static str {
        match self {
            Chain::Input => "INPUT",
            Chain::Output => "OUTPUT",
            Chain::Forward => "FORWARD",
        }
    }
}

/// Verdict for matching packets, also used for default chain policies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum RuleAction {
    Accept,
    Drop,
    Reject,
}

impl RuleAction {
    pub fn as_str(self) -> &'static str {
        match self {
            RuleAction::Accept => "ACCEPT",
            RuleAction::Drop => "DROP",
            RuleAction::Reject => "REJECT",
        }
    }
}

/// Protocol match of a rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RuleProtocol {
    Tcp,
    Udp,
    Icmp,
    All,
}

impl RuleProtocol {
    pub fn as_str(self) -> &'static str {
        match self {
            RuleProtocol::Tcp => "tcp",
            RuleProtocol::Udp => "udp",
            RuleProtocol::Icmp => "icmp",
            RuleProtocol::All => "all",
        }
    }

    /// Whether `--sport`/`--dport` matches are meaningful for this protocol.
    pub fn has_ports(self) -> bool {
        matches!(self, RuleProtocol::Tcp | RuleProtocol::Udp)
    }
}

/// Connection tracking state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ConnState {
    New,
    Established,
    Related,
    Invalid,
}

impl ConnState {
    pub fn as_str(self) -> &'static str {
        match self {
            ConnState::New => "NEW",
            ConnState::Established => "ESTABLISHED",
            ConnState::Related => "RELATED",
            ConnState::Invalid => "INVALID",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum IcmpType {
    EchoReply,
    EchoRequest,
    DestinationUnreachable,
    TimeExceeded,
}

impl IcmpType {
    pub fn as_str(self) -> &'static str {
        match self {
            IcmpType::EchoReply => "echo-reply",
            IcmpType::EchoRequest => "echo-request",
            IcmpType::DestinationUnreachable => "destination-unreachable",
            IcmpType::TimeExceeded => "time-exceeded",
        }
    }
}

/// TCP flag matches used by the scan-protection rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TcpFlags {
    /// No flag set at all (null scan).
    None,
    /// Anything that is not a bare SYN.
    NotSyn,
}

impl TcpFlags {
    pub fn as_str(self) -> &'static str {
        match self {
            TcpFlags::None => "--tcp-flags ALL NONE",
            TcpFlags::NotSyn => "! --syn",
        }
    }
}

/// A single firewall rule.
///
/// Rules are plain values. Their meaning depends on their position inside a
/// [`FirewallConfig`], since evaluation stops at the first match.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct FirewallRule {
    pub chain: Chain,
    pub action: RuleAction,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub protocol: Option<RuleProtocol>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub destination: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub source_ports: Vec<u16>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub destination_ports: Vec<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub interface_in: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub interface_out: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub states: Vec<ConnState>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icmp_type: Option<IcmpType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tcp_flags: Option<TcpFlags>,
}

impl FirewallRule {
    /// Create a rule that matches everything on `chain` and applies `action`.
    pub fn new(chain: Chain, action: RuleAction) -> Self {
        Self {
            chain,
            action,
            protocol: None,
            source: None,
            destination: None,
            source_ports: Vec::new(),
            destination_ports: Vec::new(),
            interface_in: None,
            interface_out: None,
            states: Vec::new(),
            icmp_type: None,
            tcp_flags: None,
        }
    }

    pub fn accept(chain: Chain) -> Self {
        Self::new(chain, RuleAction::Accept)
    }

    pub fn drop(chain: Chain) -> Self {
        Self::new(chain, RuleAction::Drop)
    }

    pub fn protocol(mut self, protocol: RuleProtocol) -> Self {
        self.protocol = Some(protocol);
        self
    }

    pub fn source(mut self, address: impl Into<String>) -> Self {
        self.source = Some(address.into());
        self
    }

    pub fn destination(mut self, address: impl Into<String>) -> Self {
        self.destination = Some(address.into());
        self
    }

    pub fn source_ports(mut self, ports: impl Into<Vec<u16>>) -> Self {
        self.source_ports = ports.into();
        self
    }

    pub fn destination_ports(mut self, ports: impl Into<Vec<u16>>) -> Self {
        self.destination_ports = ports.into();
        self
    }

    pub fn interface_in(mut self, name: impl Into<String>) -> Self {
        self.interface_in = Some(name.into());
        self
    }

    pub fn interface_out(mut self, name: impl Into<String>) -> Self {
        self.interface_out = Some(name.into());
        self
    }

    pub fn states(mut self, states: impl Into<Vec<ConnState>>) -> Self {
        self.states = states.into();
        self
    }

    pub fn icmp_type(mut self, icmp_type: IcmpType) -> Self {
        self.icmp_type = Some(icmp_type);
        self
    }

    pub fn tcp_flags(mut self, flags: TcpFlags) -> Self {
        self.tcp_flags = Some(flags);
        self
    }

    /// Whether this rule references `port` as a source or destination port.
    pub fn references_port(&self, port: u16) -> bool {
        self.source_ports.contains(&port) || self.destination_ports.contains(&port)
    }
}

impl Display for FirewallRule {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.chain.as_str())?;
        if let Some(protocol) = self.protocol {
            write!(f, " {}", protocol.as_str())?;
        }
        if let Some(source) = &self.source {
            write!(f, " from {source}")?;
        }
        if let Some(destination) = &self.destination {
            write!(f, " to {destination}")?;
        }
        if !self.source_ports.is_empty() {
            write!(f, " sport {}", join_ports(&self.source_ports))?;
        }
        if !self.destination_ports.is_empty() {
            write!(f, " dport {}", join_ports(&self.destination_ports))?;
        }
        write!(f, " -> {}", self.action.as_str())
    }
}

/// Join ports the way multiport matches expect them.
pub fn join_ports(ports: &[u16]) -> String {
    ports
        .iter()
        .map(u16::to_string)
        .collect::<Vec<_>>()
        .join(",")
}

/// Complete ruleset for one host: ordered rules plus default chain policies.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FirewallConfig {
    pub rules: Vec<FirewallRule>,
    pub default_policy_input: RuleAction,
    pub default_policy_output: RuleAction,
    pub default_policy_forward: RuleAction,
}

impl FirewallConfig {
    /// Ruleset whose three default policies all drop.
    pub fn deny_by_default(rules: Vec<FirewallRule>) -> Self {
        Self {
            rules,
            default_policy_input: RuleAction::Drop,
            default_policy_output: RuleAction::Drop,
            default_policy_forward: RuleAction::Drop,
        }
    }

    /// Default policy for `chain`.
    pub fn default_policy(&self, chain: Chain) -> RuleAction {
        match chain {
            Chain::Input => self.default_policy_input,
            Chain::Output => self.default_policy_output,
            Chain::Forward => self.default_policy_forward,
        }
    }
}
