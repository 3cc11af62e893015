//! String helpers: filename sanitization and character-safe truncation.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::config::{FALLBACK_NAME, MAX_NAME_CHARS};

static DISALLOWED: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^\w\s-]").unwrap());
static WHITESPACE_RUN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());

/// Convert an article title into a filesystem- and key-safe base name.
///
/// Removes everything that is not a word character, whitespace or hyphen,
/// trims, collapses whitespace runs into `_`, and keeps the first
/// [`MAX_NAME_CHARS`] characters. Falls back to `"article"` when nothing
/// usable is left.
///
/// Word characters follow the `regex` crate's Unicode `\w`: letters,
/// combining marks, decimal digits and connector punctuation.
///
/// # Arguments
///
/// * `title` - The article title, as extracted
///
/// # Returns
///
/// A non-empty name made of word characters, `_` and `-`.
///
/// # Examples
///
/// ```ignore
/// assert_eq!(sanitize_filename("Hello   World!!"), "Hello_World");
/// assert_eq!(sanitize_filename("!!!"), "article");
/// ```
pub fn sanitize_filename(title: &str) -> String {
    let stripped = DISALLOWED.replace_all(title, "");
    let joined = WHITESPACE_RUN.replace_all(stripped.trim(), "_");
    let name = truncate_chars(&joined, MAX_NAME_CHARS);
    if name.is_empty() {
        FALLBACK_NAME.to_string()
    } else {
        name.to_string()
    }
}

/// Return the first `max` characters of `s` without splitting a character.
///
/// Counts Unicode scalar values, not bytes, so multi-byte text is cut on a
/// character boundary.
///
/// # Arguments
///
/// * `s` - The string to cut
/// * `max` - Maximum number of characters to keep
///
/// # Returns
///
/// A prefix of `s` borrowed from the input; `s` itself when it is already
/// short enough.
///
/// # Examples
///
/// ```ignore
/// assert_eq!(truncate_chars("hello", 3), "hel");
/// assert_eq!(truncate_chars("ééé", 2), "éé");
/// ```
pub fn truncate_chars(s: &str, max: usize) -> &str {
    match s.char_indices().nth(max) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}

/// Truncate a string for logging purposes.
///
/// # Arguments
///
/// * `s` - The string to potentially truncate
/// * `max` - Maximum number of characters to keep
///
/// # Returns
///
/// The original string if it has at most `max` characters, otherwise its
/// first `max` characters followed by `"…(+N bytes)"`.
pub fn truncate_for_log(s: &str, max: usize) -> String {
    let head = truncate_chars(s, max);
    if head.len() == s.len() {
        s.to_string()
    } else {
        format!("{}…(+{} bytes)", head, s.len() - head.len())
    }
}
