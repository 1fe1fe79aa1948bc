//! Field value normalization

/// Normalize a raw value token for typed checks.
///
/// Returns `None` when the token is not a plain value (it contains `{`,
/// `}`, `\`, `*`, `?`, or after unquoting a comma or a space) or when
/// nothing is left after unquoting. Such values are exempt from number,
/// enum and Range checks.
pub fn normalize_value(raw: &str) -> Option<&str> {
    let mut s = raw.trim();

    if s.contains(['{', '}', '\\', '*', '?']) {
        return None;
    }

    s = strip_quotes(s, '"');
    s = strip_quotes(s, '\'');

    if s.is_empty() || s.contains([',', ' ']) {
        return None;
    }
    Some(s)
}

/// Remove one matching pair of `quote` around `s`
fn strip_quotes(s: &str, quote: char) -> &str {
    if s.starts_with(quote) && s.ends_with(quote) {
        // A lone quote character unquotes to nothing
        s.get(1..s.len() - 1).unwrap_or("")
    } else {
        s
    }
}
