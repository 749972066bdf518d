use serde::Serialize;

use crate::model::Direction;

/// Traffic allowed at one port between two devices, relative to the subject.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Resolution {
    Inbound,
    Outbound,
    Both,
    /// Both sides only listen, or both sides only talk.
    Incompatible,
}

impl Resolution {
    pub fn allows_inbound(self) -> bool {
        matches!(self, Resolution::Inbound | Resolution::Both)
    }

    pub fn allows_outbound(self) -> bool {
        matches!(self, Resolution::Outbound | Resolution::Both)
    }
}

/// Resolve the subject's declared direction against its peer's.
pub fn resolve_direction(subject: Direction, peer: Direction) -> Resolution {
    use Direction::{Both, Inbound, Outbound};

    match (subject, peer) {
        (Inbound, Inbound) | (Outbound, Outbound) => Resolution::Incompatible,
        (Inbound, Outbound) | (Inbound, Both) => Resolution::Inbound,
        (Outbound, Inbound) | (Outbound, Both) => Resolution::Outbound,
        (Both, Inbound) => Resolution::Outbound,
        (Both, Outbound) => Resolution::Inbound,
        (Both, Both) => Resolution::Both,
    }
}

#[cfg(test)]
mod tests {
    use super::{resolve_direction, Resolution};
    use crate::model::Direction::{Both, Inbound, Outbound};

    #[test]
    fn full_matrix() {
        let cases = [
            (Inbound, Inbound, Resolution::Incompatible),
            (Inbound, Outbound, Resolution::Inbound),
            (Inbound, Both, Resolution::Inbound),
            (Outbound, Inbound, Resolution::Outbound),
            (Outbound, Outbound, Resolution::Incompatible),
            (Outbound, Both, Resolution::Outbound),
            (Both, Inbound, Resolution::Outbound),
            (Both, Outbound, Resolution::Inbound),
            (Both, Both, Resolution::Both),
        ];
        for (subject, peer, expected) in cases {
            assert_eq!(
                resolve_direction(subject, peer),
                expected,
                "subject={subject} peer={peer}"
            );
        }
    }

    #[test]
    fn compatible_pairs_mirror_each_other() {
        for subject in [Inbound, Outbound, Both] {
            for peer in [Inbound, Outbound, Both] {
                let forward = resolve_direction(subject, peer);
                let back = resolve_direction(peer, subject);
                assert_eq!(forward.allows_inbound(), back.allows_outbound());
                assert_eq!(forward.allows_outbound(), back.allows_inbound());
            }
        }
    }
}
