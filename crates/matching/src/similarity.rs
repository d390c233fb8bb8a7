//! Lexical string similarity on the 0-100 scale.

/// A symmetric string similarity returning a score in `[0, 100]`.
pub trait TextSimilarity: Send + Sync {
    /// Scores `a` against `b`; 100 means identical.
    fn similarity(&self, a: &str, b: &str) -> f64;
}

/// Token-sort ratio: whitespace tokens are sorted and rejoined, then
/// compared with the Indel ratio `1 - indel / (len_a + len_b)`, so word
/// order does not matter and an inserted initial costs little.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokenSortRatio;

impl TokenSortRatio {
    fn sorted_tokens(text: &str) -> String {
        let mut tokens: Vec<&str> = text.split_whitespace().collect();
        tokens.sort_unstable();
        tokens.join(" ")
    }
}

impl TextSimilarity for TokenSortRatio {
    fn similarity(&self, a: &str, b: &str) -> f64 {
        let sorted_a = Self::sorted_tokens(a);
        let sorted_b = Self::sorted_tokens(b);
        if sorted_a.is_empty() || sorted_b.is_empty() {
            return 0.0;
        }
        rapidfuzz::fuzz::ratio(sorted_a.chars(), sorted_b.chars()) * 100.0
    }
}
