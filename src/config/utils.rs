use super::ALL_LOCALES;

/// Parse a TCP port number
pub fn parse_port(s: &str) -> Result<u16, String> {
    s.trim()
        .parse::<u16>()
        .map_err(|e| format!("Invalid port number '{s}': {e}"))
}

/// Treat blank values as unset
pub fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

/// Interpret a locale filter setting
///
/// An empty value or `all` (case insensitive) disables filtering.
pub fn locale_filter(value: &str) -> Option<&str> {
    let value = value.trim();
    if value.is_empty() || value.eq_ignore_ascii_case(ALL_LOCALES) {
        None
    } else {
        Some(value)
    }
}
