//! Rule synthesis from resolved peer ports.

use std::collections::BTreeSet;

use fw_ruleset::{Chain, FirewallRule, RuleProtocol, MULTIPORT_LIMIT};
use serde::Serialize;

use crate::compile::direction::{resolve_direction, Resolution};
use crate::compile::inventory::unique_ports_by_index;
use crate::model::{Direction, Port, Protocol};

/// A shared port index at which both devices declare the same one-way direction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DirectionConflict {
    pub peer: String,
    pub port: u16,
    pub subject_direction: Direction,
    pub peer_direction: Direction,
}

/// Port indices allowed towards one peer, split by direction and protocol.
///
/// Each list is kept sorted and free of duplicates.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PortGroups {
    pub inbound_tcp: BTreeSet<u16>,
    pub inbound_udp: BTreeSet<u16>,
    pub outbound_tcp: BTreeSet<u16>,
    pub outbound_udp: BTreeSet<u16>,
}

impl PortGroups {
    /// Resolve every common index between the two inventories.
    ///
    /// The protocol is taken from the subject's own declaration. Incompatible
    /// indices are returned as conflicts and contribute no ports.
    pub fn resolve(
        peer_name: &str,
        subject_ports: &[Port],
        peer_ports: &[Port],
        common: &BTreeSet<u16>,
    ) -> (Self, Vec<DirectionConflict>) {
        let subject_by_index = unique_ports_by_index(subject_ports);
        let peer_by_index = unique_ports_by_index(peer_ports);

        let mut groups = Self::default();
        let mut conflicts = Vec::new();
        for index in common {
            let (Some(local), Some(remote)) =
                (subject_by_index.get(index), peer_by_index.get(index))
            else {
                continue;
            };

            match resolve_direction(local.direction, remote.direction) {
                Resolution::Incompatible => conflicts.push(DirectionConflict {
                    peer: peer_name.to_string(),
                    port: *index,
                    subject_direction: local.direction,
                    peer_direction: remote.direction,
                }),
                resolution => groups.add(*index, local.protocol, resolution),
            }
        }
        (groups, conflicts)
    }

    fn add(&mut self, index: u16, protocol: Protocol, resolution: Resolution) {
        if resolution.allows_inbound() {
            match protocol {
                Protocol::Tcp => self.inbound_tcp.insert(index),
                Protocol::Udp => self.inbound_udp.insert(index),
            };
        }
        if resolution.allows_outbound() {
            match protocol {
                Protocol::Tcp => self.outbound_tcp.insert(index),
                Protocol::Udp => self.outbound_udp.insert(index),
            };
        }
    }

    pub fn is_empty(&self) -> bool {
        self.inbound_tcp.is_empty()
            && self.inbound_udp.is_empty()
            && self.outbound_tcp.is_empty()
            && self.outbound_udp.is_empty()
    }

    /// Accept rules towards `address`: inbound TCP, inbound UDP, outbound TCP,
    /// outbound UDP, each split into multiport-sized chunks.
    pub fn rules_for(&self, address: &str) -> Vec<FirewallRule> {
        let groups = [
            (Chain::Input, RuleProtocol::Tcp, &self.inbound_tcp),
            (Chain::Input, RuleProtocol::Udp, &self.inbound_udp),
            (Chain::Output, RuleProtocol::Tcp, &self.outbound_tcp),
            (Chain::Output, RuleProtocol::Udp, &self.outbound_udp),
        ];

        let mut rules = Vec::new();
        for (chain, protocol, ports) in groups {
            let ports: Vec<u16> = ports.iter().copied().collect();
            for chunk in chunk_ports(&ports) {
                let rule = FirewallRule::accept(chain).protocol(protocol);
                rules.push(match chain {
                    Chain::Input => rule.destination_ports(chunk).source(address),
                    _ => rule.source_ports(chunk).destination(address),
                });
            }
        }
        rules
    }
}

/// Split `ports` into consecutive chunks no larger than the multiport limit.
pub fn chunk_ports(ports: &[u16]) -> Vec<Vec<u16>> {
    ports
        .chunks(MULTIPORT_LIMIT)
        .map(<[u16]>::to_vec)
        .collect()
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use fw_ruleset::{Chain, RuleProtocol, MULTIPORT_LIMIT};

    use super::{chunk_ports, PortGroups};
    use crate::model::{Direction, Port, Protocol};

    fn common(indices: &[u16]) -> BTreeSet<u16> {
        indices.iter().copied().collect()
    }

    #[test]
    fn chunks_respect_the_multiport_limit() {
        let ports: Vec<u16> = (1000..1031).collect();
        let chunks = chunk_ports(&ports);
        assert_eq!(chunks.len(), 3);
        assert!(chunks.iter().all(|c| c.len() <= MULTIPORT_LIMIT));
        assert_eq!(chunks.concat(), ports);
        assert!(chunk_ports(&[]).is_empty());
        assert_eq!(chunk_ports(&(1..=15).collect::<Vec<u16>>()).len(), 1);
    }

    #[test]
    fn both_populates_inbound_and_outbound() {
        let subject = vec![Port::new(123, Protocol::Udp, Direction::Both)];
        let peer = vec![Port::new(123, Protocol::Udp, Direction::Both)];
        let (groups, conflicts) = PortGroups::resolve("NTP01", &subject, &peer, &common(&[123]));

        assert!(conflicts.is_empty());
        assert!(groups.inbound_udp.contains(&123));
        assert!(groups.outbound_udp.contains(&123));
        assert!(groups.inbound_tcp.is_empty());
    }

    #[test]
    fn incompatible_index_is_reported_not_grouped() {
        let subject = vec![
            Port::new(22, Protocol::Tcp, Direction::Inbound),
            Port::new(502, Protocol::Tcp, Direction::Inbound),
        ];
        let peer = vec![
            Port::new(22, Protocol::Tcp, Direction::Inbound),
            Port::new(502, Protocol::Tcp, Direction::Outbound),
        ];
        let (groups, conflicts) = PortGroups::resolve("HMI01", &subject, &peer, &common(&[22, 502]));

        assert_eq!(conflicts.len(), 1);
        assert_eq!(conflicts[0].port, 22);
        assert_eq!(conflicts[0].peer, "HMI01");
        assert_eq!(groups.inbound_tcp.iter().copied().collect::<Vec<_>>(), vec![502]);
        assert!(groups.outbound_tcp.is_empty());
    }

    #[test]
    fn subject_protocol_decides_the_group() {
        let subject = vec![Port::new(502, Protocol::Udp, Direction::Outbound)];
        let peer = vec![Port::new(502, Protocol::Tcp, Direction::Inbound)];
        let (groups, _) = PortGroups::resolve("PLC01", &subject, &peer, &common(&[502]));
        assert!(groups.outbound_udp.contains(&502));
        assert!(groups.outbound_tcp.is_empty());
    }

    #[test]
    fn rules_follow_group_order_and_address_placement() {
        let subject = vec![
            Port::new(161, Protocol::Udp, Direction::Outbound),
            Port::new(502, Protocol::Tcp, Direction::Both),
        ];
        let peer = vec![
            Port::new(161, Protocol::Udp, Direction::Inbound),
            Port::new(502, Protocol::Tcp, Direction::Both),
        ];
        let (groups, _) = PortGroups::resolve("RTU01", &subject, &peer, &common(&[161, 502]));
        let rules = groups.rules_for("10.0.0.7");

        let shape: Vec<(Chain, Option<RuleProtocol>)> =
            rules.iter().map(|r| (r.chain, r.protocol)).collect();
        assert_eq!(
            shape,
            vec![
                (Chain::Input, Some(RuleProtocol::Tcp)),
                (Chain::Output, Some(RuleProtocol::Tcp)),
                (Chain::Output, Some(RuleProtocol::Udp)),
            ]
        );
        assert_eq!(rules[0].source.as_deref(), Some("10.0.0.7"));
        assert_eq!(rules[0].destination_ports, vec![502]);
        assert_eq!(rules[1].destination.as_deref(), Some("10.0.0.7"));
        assert_eq!(rules[1].source_ports, vec![502]);
        assert_eq!(rules[2].source_ports, vec![161]);
    }

    #[test]
    fn large_groups_are_batched_without_duplicates() {
        let subject: Vec<Port> = (2000..2040)
            .map(|i| Port::new(i, Protocol::Tcp, Direction::Inbound))
            .collect();
        let peer: Vec<Port> = (2000..2040)
            .map(|i| Port::new(i, Protocol::Tcp, Direction::Outbound))
            .collect();
        let all: BTreeSet<u16> = (2000..2040).collect();
        let (groups, _) = PortGroups::resolve("SRV01", &subject, &peer, &all);
        let rules = groups.rules_for("10.0.0.3");

        assert_eq!(rules.len(), 3);
        let mut covered: Vec<u16> = rules
            .iter()
            .flat_map(|r| r.destination_ports.iter().copied())
            .collect();
        covered.sort_unstable();
        assert_eq!(covered, all.into_iter().collect::<Vec<_>>());
        assert_eq!(groups.inbound_tcp.len(), 40);
    }
}
