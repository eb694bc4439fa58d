//! Sentence segmentation for policy page text.
//!
//! Splits after `.`, `?`, or `!` when the next non-space character is an
//! uppercase letter or an opening parenthesis — plan documents start
//! numbered provisions with `(a)`, `(1)` and so on. No lookbehind, so this
//! is a manual scan rather than a regex.

/// Split page text into sentences. Whole text comes back as one sentence
/// when no boundary is found.
pub fn split_sentences(text: &str) -> Vec<&str> {
    let chars: Vec<(usize, char)> = text.char_indices().collect();
    let mut sentences = Vec::new();
    let mut start = 0;

    for (pos, &(i, c)) in chars.iter().enumerate() {
        if c != '.' && c != '?' && c != '!' {
            continue;
        }
        // Peek past whitespace for a capital letter or '('
        let mut next = pos + 1;
        while next < chars.len() && chars[next].1.is_whitespace() {
            next += 1;
        }
        if next >= chars.len() {
            continue;
        }
        let follower = chars[next].1;
        if follower.is_uppercase() || follower == '(' {
            let end = i + c.len_utf8();
            let sentence = text[start..end].trim();
            if !sentence.is_empty() {
                sentences.push(sentence);
            }
            start = end;
        }
    }

    let tail = text[start..].trim();
    if !tail.is_empty() {
        sentences.push(tail);
    }
    sentences
}

/// Truncate to at most `max` characters on a char boundary.
pub fn truncate_chars(text: &str, max: usize) -> &str {
    match text.char_indices().nth(max) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}
