//! Raw tweet cleanup applied before tokenization.

use regex::Regex;
use std::sync::OnceLock;

/// Tokens at or below this length are dropped.
pub const MIN_TOKEN_LEN_EXCLUSIVE: usize = 3;

fn mention_regex() -> &'static Regex {
    static MENTION: OnceLock<Regex> = OnceLock::new();
    MENTION.get_or_init(|| Regex::new(r"@\w*").expect("mention regex must compile"))
}

/// Clean raw text into space-separated lowercase tokens.
///
/// Mentions (`@` plus word characters) are removed, anything other than an ASCII
/// letter or `#` becomes a space, and tokens of three characters or fewer are dropped.
pub fn normalize(text: &str) -> String {
    let without_mentions = mention_regex().replace_all(text, "");
    let letters: String = without_mentions
        .chars()
        .map(|ch| {
            if ch.is_ascii_alphabetic() || ch == '#' {
                ch.to_ascii_lowercase()
            } else {
                ' '
            }
        })
        .collect();
    letters
        .split_whitespace()
        .filter(|token| token.len() > MIN_TOKEN_LEN_EXCLUSIVE)
        .collect::<Vec<_>>()
        .join(" ")
}
