//! Free-text input sanitization
//!
//! Registration strips a fixed denylist of characters from every free-text
//! field before anything is previewed or persisted. Records inserted through
//! other means (a direct `put`, for example) are not re-sanitized.

/// Characters removed from free-text input
const DENYLIST: [char; 5] = ['<', '>', '"', '\'', '/'];

/// Strip the denylist characters from the input
///
/// Idempotent: sanitizing an already-sanitized string returns it unchanged.
pub fn sanitize(input: &str) -> String {
    input.chars().filter(|c| !DENYLIST.contains(c)).collect()
}

/// Check whether a string is free of the denylist characters
pub fn is_sanitized(input: &str) -> bool {
    !input.chars().any(|c| DENYLIST.contains(&c))
}
