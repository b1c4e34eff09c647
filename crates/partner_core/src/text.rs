use std::collections::BTreeSet;

const SEPARATORS: &[char] = &[',', '，', '。', '.', '!', '！', '?', '？', '、'];

/// Lower-cased, trimmed value; `None` when absent or blank.
pub fn normalized(value: Option<&str>) -> Option<String> {
    let value = value?.trim();
    if value.is_empty() {
        return None;
    }
    Some(value.to_lowercase())
}

/// Splits on whitespace and common punctuation of either width, keeping
/// tokens longer than one character.
pub fn tokens(text: &str) -> BTreeSet<&str> {
    text.split(|c: char| c.is_whitespace() || SEPARATORS.contains(&c))
        .filter(|token| token.chars().count() > 1)
        .collect()
}

/// Number of distinct tokens present in both values.
pub fn shared_token_count(a: &str, b: &str) -> usize {
    let left = tokens(a);
    tokens(b).iter().filter(|token| left.contains(*token)).count()
}
