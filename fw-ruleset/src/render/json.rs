use crate::render::RenderError;
use crate::rule::FirewallConfig;

/// Render a ruleset as pretty-printed JSON.
pub fn render_json(config: &FirewallConfig) -> Result<String, RenderError> {
    Ok(serde_json::to_string_pretty(config)?)
}
