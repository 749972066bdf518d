//! Fixed rules that wrap every derived ruleset.

use std::sync::LazyLock;

use fw_ruleset::{Chain, ConnState, FirewallRule, IcmpType, RuleProtocol, TcpFlags};

static SECURITY_BASELINE: LazyLock<Vec<FirewallRule>> = LazyLock::new(|| {
    vec![
        // loopback
        FirewallRule::accept(Chain::Input).interface_in("lo"),
        FirewallRule::accept(Chain::Output).interface_out("lo"),
        // icmp
        FirewallRule::accept(Chain::Input)
            .protocol(RuleProtocol::Icmp)
            .icmp_type(IcmpType::EchoReply),
        FirewallRule::drop(Chain::Input)
            .protocol(RuleProtocol::Icmp)
            .icmp_type(IcmpType::DestinationUnreachable),
        FirewallRule::drop(Chain::Input)
            .protocol(RuleProtocol::Icmp)
            .icmp_type(IcmpType::TimeExceeded),
        FirewallRule::accept(Chain::Input)
            .protocol(RuleProtocol::Icmp)
            .icmp_type(IcmpType::EchoRequest),
        FirewallRule::accept(Chain::Output).protocol(RuleProtocol::Icmp),
        // tracked connections
        FirewallRule::accept(Chain::Input)
            .protocol(RuleProtocol::All)
            .states(vec![ConnState::Established, ConnState::Related]),
        FirewallRule::accept(Chain::Output)
            .protocol(RuleProtocol::All)
            .states(vec![ConnState::Established, ConnState::Related]),
        FirewallRule::accept(Chain::Forward)
            .protocol(RuleProtocol::All)
            .states(vec![ConnState::Established, ConnState::Related]),
        // malformed and scan traffic
        FirewallRule::drop(Chain::Input).states(vec![ConnState::Invalid]),
        FirewallRule::drop(Chain::Forward).states(vec![ConnState::Invalid]),
        FirewallRule::drop(Chain::Input)
            .protocol(RuleProtocol::Tcp)
            .tcp_flags(TcpFlags::None),
        FirewallRule::drop(Chain::Input)
            .protocol(RuleProtocol::Tcp)
            .tcp_flags(TcpFlags::NotSyn)
            .states(vec![ConnState::New]),
        FirewallRule::drop(Chain::Output)
            .protocol(RuleProtocol::Tcp)
            .tcp_flags(TcpFlags::NotSyn)
            .states(vec![ConnState::New]),
    ]
});

static DEFAULT_DENY_TAIL: LazyLock<Vec<FirewallRule>> = LazyLock::new(|| {
    vec![FirewallRule::drop(Chain::Input)
        .protocol(RuleProtocol::Tcp)
        .destination_ports(vec![22])]
});

/// Rules placed before anything derived from the topology.
pub fn security_baseline() -> &'static [FirewallRule] {
    &SECURITY_BASELINE
}

/// Rules placed after every derived rule.
pub fn default_deny_tail() -> &'static [FirewallRule] {
    &DEFAULT_DENY_TAIL
}

#[cfg(test)]
mod tests {
    use fw_ruleset::{render_rule, Chain, RuleAction, RuleProtocol};

    use super::{default_deny_tail, security_baseline};

    #[test]
    fn baseline_starts_with_loopback_and_renders() {
        let baseline = security_baseline();
        assert_eq!(baseline.len(), 15);
        assert_eq!(baseline[0].interface_in.as_deref(), Some("lo"));
        assert_eq!(baseline[1].interface_out.as_deref(), Some("lo"));
        for rule in baseline {
            render_rule(rule).expect("baseline rule should render");
        }
    }

    #[test]
    fn baseline_is_built_once() {
        assert!(std::ptr::eq(security_baseline(), security_baseline()));
    }

    #[test]
    fn tail_drops_inbound_ssh() {
        let tail = default_deny_tail();
        assert_eq!(tail.len(), 1);
        assert_eq!(tail[0].chain, Chain::Input);
        assert_eq!(tail[0].action, RuleAction::Drop);
        assert_eq!(tail[0].protocol, Some(RuleProtocol::Tcp));
        assert_eq!(tail[0].destination_ports, vec![22]);
        assert!(tail[0].source.is_none());
    }
}
