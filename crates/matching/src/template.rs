//! Template generalization.
//!
//! Collapses a family of near-identical titles (or rule texts) into one
//! template where the words that vary across the family are replaced by a
//! single [`BLANK_MARKER`]:
//!
//! ```text
//! Will Trump win Ohio in 2028?
//! Will Trump win Texas in 2028?     ->  Will Trump win [blank] in 2028?
//! ```

use market_link_core::BLANK_MARKER;

/// Generalizes a group of strings into a single wildcard template.
///
/// Empty and whitespace-only inputs are ignored. A single remaining input, or
/// a group whose inputs are all identical, is returned unchanged. Prefix and
/// suffix lengths are computed independently and both reconstructed from the
/// first remaining input, so short inputs may share words between the two.
#[must_use]
pub fn generalize<S: AsRef<str>>(strings: &[S]) -> String {
    let non_empty: Vec<&str> = strings
        .iter()
        .map(AsRef::as_ref)
        .filter(|s| !s.trim().is_empty())
        .collect();

    let Some(first) = non_empty.first() else {
        return String::new();
    };
    if non_empty.iter().all(|s| s == first) {
        return (*first).to_string();
    }

    let word_lists: Vec<Vec<&str>> = non_empty.iter().map(|s| s.split_whitespace().collect()).collect();
    let prefix_len = common_prefix_len(&word_lists);
    let suffix_len = common_suffix_len(&word_lists);

    let anchor = &word_lists[0];
    let mut parts: Vec<&str> = Vec::with_capacity(prefix_len + suffix_len + 1);
    parts.extend_from_slice(&anchor[..prefix_len]);
    parts.push(BLANK_MARKER);
    parts.extend_from_slice(&anchor[anchor.len() - suffix_len..]);

    parts.join(" ")
}

/// Generalizes `strings`, falling back to the first string verbatim when the
/// template keeps fewer than `min_content` characters outside the marker.
///
/// `None` disables the fallback.
#[must_use]
pub fn generalize_with_fallback<S: AsRef<str>>(strings: &[S], min_content: Option<usize>) -> String {
    let template = generalize(strings);
    match (min_content, strings.first()) {
        (Some(min), Some(first)) if content_len(&template) < min => first.as_ref().to_string(),
        _ => template,
    }
}

/// Number of characters in `template` once the marker is removed and trimmed.
#[must_use]
pub fn content_len(template: &str) -> usize {
    template.replace(BLANK_MARKER, "").trim().chars().count()
}

fn common_prefix_len(word_lists: &[Vec<&str>]) -> usize {
    let min_len = word_lists.iter().map(Vec::len).min().unwrap_or(0);
    (0..min_len)
        .find(|&i| word_lists.iter().any(|words| words[i] != word_lists[0][i]))
        .unwrap_or(min_len)
}

fn common_suffix_len(word_lists: &[Vec<&str>]) -> usize {
    let min_len = word_lists.iter().map(Vec::len).min().unwrap_or(0);
    fn from_end<'a>(words: &[&'a str], i: usize) -> &'a str {
        words[words.len() - 1 - i]
    }
    (0..min_len)
        .find(|&i| {
            let anchor = from_end(&word_lists[0], i);
            word_lists.iter().any(|words| from_end(words, i) != anchor)
        })
        .unwrap_or(min_len)
}
