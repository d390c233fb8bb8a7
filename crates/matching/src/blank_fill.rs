//! Recovers the text a contract title supplies in place of its event
//! template's [`BLANK_MARKER`].

use market_link_core::{SuffixMismatchPolicy, BLANK_MARKER};

/// Extracts the blank fill of `title` against `template`.
///
/// Returns `None` when the template has no marker, the title does not start
/// with the template prefix, the suffix is missing under
/// [`SuffixMismatchPolicy::Reject`], or the fill is empty.
///
/// Under [`SuffixMismatchPolicy::KeepRemainder`] a missing suffix keeps the
/// whole remainder after the prefix. This tolerates punctuation drift but
/// also lets trailing boilerplate into the fill.
#[must_use]
pub fn extract_blank(template: &str, title: &str, policy: SuffixMismatchPolicy) -> Option<String> {
    let (prefix, suffix) = template.split_once(BLANK_MARKER)?;

    let rest = title.strip_prefix(prefix)?;

    let suffix = suffix.trim();
    let rest_trimmed = rest.trim_end();
    let blank = if suffix.is_empty() {
        rest
    } else if let Some(fill) = rest_trimmed.strip_suffix(suffix) {
        fill
    } else {
        match policy {
            SuffixMismatchPolicy::KeepRemainder => rest,
            SuffixMismatchPolicy::Reject => return None,
        }
    };

    let blank = blank.trim();
    (!blank.is_empty()).then(|| blank.to_string())
}
