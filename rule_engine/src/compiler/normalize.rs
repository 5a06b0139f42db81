//! Text normalization shared by the rules and lexicon parsers.

/// Keyword separating rule definitions.
pub const RULE_SEPARATOR: &str = "$RULE";

/// Lines whose first non-space character is this are ignored.
pub const COMMENT_MARKER: char = '%';

/// Non-blank, non-comment lines, uppercased and trimmed, with their
/// one-based line numbers.
pub fn content_lines(text: &str) -> impl Iterator<Item = (usize, String)> + '_ {
    text.lines()
        .enumerate()
        .map(|(index, line)| (index + 1, line.trim()))
        .filter(|(_, line)| !line.is_empty() && !line.starts_with(COMMENT_MARKER))
        .map(|(number, line)| (number, line.to_uppercase()))
}

/// Uppercase, strip comments and emphasis, rewrite legacy operators and
/// collapse whitespace into single spaces.
pub fn normalize(text: &str) -> String {
    let joined = content_lines(text)
        .map(|(_, line)| line)
        .collect::<Vec<_>>()
        .join(" ")
        .replace('*', "")
        .replace('≠', "!=")
        .replace('←', "<-");

    joined.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Split normalized text into raw rule definitions, skipping blank chunks.
pub fn split_rules(normalized: &str) -> impl Iterator<Item = &str> {
    normalized
        .split(RULE_SEPARATOR)
        .map(str::trim)
        .filter(|definition| !definition.is_empty())
}
