//! Number formatting shared by the prompt and the email bodies.

/// Format a 0.0-1.0 rate as a percentage, e.g. `0.4567` -> `"45.67%"`.
pub fn rate_as_percent(rate: f64) -> String {
    format!("{:.2}%", rate * 100.0)
}

/// Format a value already expressed in percent, e.g. `12.5` -> `"12.50%"`.
pub fn percent(value: f64) -> String {
    format!("{:.2}%", value)
}

/// Format seconds with two decimals, e.g. `"42.10 seconds"`.
pub fn seconds(value: f64) -> String {
    format!("{:.2} seconds", value)
}

/// Format a plain ratio with two decimals.
pub fn decimal(value: f64) -> String {
    format!("{:.2}", value)
}

/// Escape text for inclusion in HTML element content or attribute values.
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
