use std::fmt::{self, Display, Formatter};

use serde::Serialize;

use crate::render::{render_iptables, RenderError};
use crate::rule::FirewallConfig;

/// Firewall engines a ruleset can be rendered for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
    Iptables,
}

impl Backend {
    /// Resolve a per-device engine identifier. Unknown identifiers yield `None`.
    pub fn from_id(id: &str) -> Option<Self> {
        match id.trim().to_ascii_lowercase().as_str() {
            "iptables" => Some(Backend::Iptables),
            _ => None,
        }
    }

    pub fn id(self) -> &'static str {
        match self {
            Backend::Iptables => "iptables",
        }
    }

    /// File name of the rendered artifact.
    pub fn script_file_name(self) -> &'static str {
        match self {
            Backend::Iptables => "iptables.sh",
        }
    }

    pub fn render(self, config: &FirewallConfig) -> Result<String, RenderError> {
        match self {
            Backend::Iptables => render_iptables(config),
        }
    }
}

impl Display for Backend {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}
