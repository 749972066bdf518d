//! Ruleset renderers.

pub mod iptables;
pub mod json;

use thiserror::Error;

pub use iptables::{render_iptables, render_rule};
pub use json::render_json;

/// Errors that can occur while rendering a [`crate::FirewallConfig`].
#[derive(Debug, Error)]
pub enum RenderError {
    /// A rule carries a combination of matches the target cannot express.
    #[error("rule {position} ({rule}) cannot be rendered: {reason}")]
    InvalidRule {
        position: usize,
        rule: String,
        reason: String,
    },
    /// Failed to serialize the ruleset as JSON.
    #[error("failed to serialize ruleset: {0}")]
    Json(#[from] serde_json::Error),
}
