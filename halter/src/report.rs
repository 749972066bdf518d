use colored::Colorize;

/// Color report lines by their status marker for terminal output.
pub fn colorize(text: &str) -> String {
    text.lines()
        .map(|line| {
            if line.starts_with("- [error]") || line.contains(" failed:") {
                line.red().to_string()
            } else if line.starts_with("- [warning]") {
                line.yellow().to_string()
            } else if line.contains(" written ") {
                line.green().to_string()
            } else if line.contains(" skipped:") {
                line.dimmed().to_string()
            } else if line.starts_with("result ") {
                line.cyan().to_string()
            } else {
                line.to_string()
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::colorize;

    #[test]
    fn keeps_line_text_and_count() {
        colored::control::set_override(false);
        let text = "check project=P devices=1\nresult errors=1 warnings=0\n- [error] x: y";
        assert_eq!(colorize(text), text);
        colored::control::unset_override();
    }
}
