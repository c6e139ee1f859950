//! Conventional-commit header checks.

use std::sync::OnceLock;

use regex_lite::Regex;

/// Header length most tools display without truncation. Longer headers are
/// still valid; see [`header_too_long`].
pub const MAX_HEADER_LENGTH: usize = 72;

fn header_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^[a-z]+(?:\([^()\s][^()]*\))?!?: \S.*$").expect("header pattern is valid")
    })
}

fn first_line(message: &str) -> &str {
    message.lines().next().unwrap_or("")
}

/// Check the first line of `message` against the conventional-commit header
/// format. Returns human-readable issues; an empty list means the header is valid.
///
/// Any lowercase type is accepted and length is not checked here.
pub fn check_header(message: &str) -> Vec<String> {
    let header = first_line(message);
    if header_regex().is_match(header) {
        return Vec::new();
    }

    let issue = match header.split_once(": ") {
        None => "Missing ': ' separator between type/scope and description".to_string(),
        Some((prefix, _)) => {
            let commit_type = prefix.split(['(', '!']).next().unwrap_or(prefix);
            if commit_type.is_empty() || !commit_type.chars().all(|c| c.is_ascii_lowercase()) {
                format!("Commit type '{commit_type}' must be lowercase letters only")
            } else if prefix.contains('(') && !prefix.contains(')') {
                "Unclosed scope parenthesis".to_string()
            } else if prefix.contains(')') && !prefix.contains('(') {
                "Unopened scope parenthesis".to_string()
            } else if prefix.contains("()") {
                "Empty scope parenthesis".to_string()
            } else {
                "Header format should be: <type>(<scope>): <description>".to_string()
            }
        }
    };
    vec![issue]
}

/// Whether the header is longer than [`MAX_HEADER_LENGTH`] characters.
pub fn header_too_long(message: &str) -> bool {
    first_line(message).chars().count() > MAX_HEADER_LENGTH
}
