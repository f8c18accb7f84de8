use std::borrow::Cow;

/// Collapses runs of whitespace (including line breaks) into single spaces
pub fn normalize_whitespace(s: &str) -> Cow<str> {
    let already_normal = !s.starts_with(' ')
        && !s.ends_with(' ')
        && !s.contains("  ")
        && !s.chars().any(|c| c.is_whitespace() && c != ' ');
    if already_normal {
        Cow::Borrowed(s)
    } else {
        Cow::Owned(s.split_whitespace().collect::<Vec<_>>().join(" "))
    }
}

/// Shortens `s` to at most `max_chars` characters for use in log lines
pub fn truncate_for_log(s: &str, max_chars: usize) -> Cow<str> {
    match s.char_indices().nth(max_chars) {
        Some((idx, _)) => Cow::Owned(format!("{}…", &s[..idx])),
        None => Cow::Borrowed(s),
    }
}
