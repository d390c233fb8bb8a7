//! Blocking-key extraction: candidate person names and years.
//!
//! Person extraction is a capitalization heuristic, not named-entity
//! recognition. It yields a coarse bag of lowercase "candidate surname"
//! tokens that is only ever used to decide which event pairs are worth
//! scoring.

use crate::error::Result;
use market_link_core::AggregationConfig;
use regex::Regex;
use std::collections::{BTreeSet, HashSet};

const US_STATE_WORDS: &[&str] = &[
    "alabama", "alaska", "arizona", "arkansas", "california", "colorado", "connecticut",
    "delaware", "florida", "georgia", "hawaii", "idaho", "illinois", "indiana", "iowa", "kansas",
    "kentucky", "louisiana", "maine", "maryland", "massachusetts", "michigan", "minnesota",
    "mississippi", "missouri", "montana", "nebraska", "nevada", "new", "hampshire", "jersey",
    "mexico", "york", "north", "south", "carolina", "dakota", "ohio", "oklahoma", "oregon",
    "pennsylvania", "rhode", "island", "tennessee", "texas", "utah", "vermont", "virginia",
    "washington", "west", "wisconsin", "wyoming",
];

const COUNTRY_WORDS: &[&str] = &[
    "iran", "iraq", "china", "russia", "ukraine", "israel", "gaza", "lebanon", "syria",
    "afghanistan", "pakistan", "india", "japan", "korea", "taiwan", "canada", "cuba",
    "venezuela", "greenland", "germany", "france", "britain", "england", "europe", "africa",
    "brazil", "colombia", "panama", "el", "salvador", "honduras", "guatemala", "haiti",
    "dominican",
];

const GOVERNMENT_WORDS: &[&str] = &[
    "senate", "house", "congress", "president", "governor", "senator", "representative",
    "speaker", "majority", "minority", "leader", "whip", "cabinet", "secretary",
    "administration", "department", "justice", "defense", "state", "treasury", "interior",
    "commerce", "energy", "education", "homeland", "security", "attorney", "general", "court",
    "supreme", "federal", "district", "circuit", "judge", "chief", "associate", "solicitor",
    "marshal", "fbi", "cia", "nsa", "doj", "dhs", "epa", "fda", "sec", "ftc", "fcc", "usda",
    "director", "chair", "chairman", "chairwoman", "commissioner", "inspector", "counsel",
    "special", "advisor", "aide", "ambassador", "envoy", "diplomat",
];

const POLITICAL_WORDS: &[&str] = &[
    "republican", "democratic", "democrat", "democrats", "gop", "party", "primary", "election",
    "vote", "ballot", "caucus", "nomination", "nominee", "candidate", "campaign", "poll",
    "impeachment", "impeach", "resign", "resignation", "bill", "act", "law", "resolution",
    "budget", "tariff", "tariffs", "executive", "order", "veto", "pardon", "commute",
    "inauguration", "oath", "swearing",
];

const COMMON_WORDS: &[&str] = &[
    "will", "the", "be", "is", "are", "was", "were", "has", "have", "had", "do", "does", "did",
    "can", "could", "would", "should", "shall", "may", "might", "must", "not", "no", "yes",
    "and", "or", "but", "if", "then", "than", "that", "this", "for", "from", "with", "without",
    "before", "after", "during", "about", "above", "below", "between", "through", "into", "on",
    "in", "at", "to", "of", "by", "as", "an", "a", "any", "all", "each", "every", "some",
    "more", "most", "many", "what", "how", "who", "when", "where", "which", "why", "his", "her",
    "its", "their", "our", "my", "your", "he", "she", "it", "they", "we", "you", "us", "me",
    "win", "lose", "pass", "fail", "approve", "confirm", "reject", "over", "under", "per", "up",
    "down", "out", "national", "annual", "first", "second", "third", "next", "last", "united",
    "states", "america", "american", "usa", "mr", "mrs", "ms", "dr", "jr", "sr", "st",
];

const CALENDAR_WORDS: &[&str] = &[
    "jan", "feb", "mar", "apr", "jun", "jul", "aug", "sep", "oct", "nov", "dec", "january",
    "february", "march", "april", "june", "july", "august", "september", "october", "november",
    "december", "monday", "tuesday", "wednesday", "thursday", "friday", "saturday", "sunday",
];

/// Extracts candidate person-name tokens from case-preserving titles.
#[derive(Debug, Clone)]
pub struct PersonExtractor {
    stop_words: HashSet<String>,
    min_token_len: usize,
}

impl PersonExtractor {
    /// Creates an extractor with the built-in stop-list.
    #[must_use]
    pub fn new(min_token_len: usize) -> Self {
        let stop_words = US_STATE_WORDS
            .iter()
            .chain(COUNTRY_WORDS)
            .chain(GOVERNMENT_WORDS)
            .chain(POLITICAL_WORDS)
            .chain(COMMON_WORDS)
            .chain(CALENDAR_WORDS)
            .map(|word| (*word).to_string())
            .collect();
        Self {
            stop_words,
            min_token_len,
        }
    }

    /// Creates an extractor from aggregation settings, including extra stop words.
    #[must_use]
    pub fn from_config(config: &AggregationConfig) -> Self {
        Self::new(config.person_min_token_len).with_stop_words(&config.extra_stop_words)
    }

    /// Adds words (case-insensitive) that are never treated as names.
    #[must_use]
    pub fn with_stop_words<S: AsRef<str>>(mut self, words: &[S]) -> Self {
        self.stop_words
            .extend(words.iter().map(|w| w.as_ref().to_lowercase()));
        self
    }

    /// Returns true if the lowercase word is on the stop-list.
    #[must_use]
    pub fn is_stop_word(&self, lowercase: &str) -> bool {
        self.stop_words.contains(lowercase)
    }

    /// Extracts lowercase candidate names from one title.
    ///
    /// A token qualifies when, after trimming non-letters from both ends, it
    /// is long enough, starts uppercase and is not a stop word. The first
    /// token additionally needs a capitalized, non-stop-word successor, since
    /// sentence-initial capitals carry no signal on their own.
    #[must_use]
    pub fn extract(&self, title: &str) -> BTreeSet<String> {
        let words: Vec<&str> = title.split_whitespace().map(trim_non_letters).collect();
        let mut persons = BTreeSet::new();

        for (idx, word) in words.iter().enumerate() {
            if word.chars().count() < self.min_token_len || !starts_uppercase(word) {
                continue;
            }
            let lower = word.to_lowercase();
            if self.is_stop_word(&lower) {
                continue;
            }
            if idx == 0 && !words.get(1).is_some_and(|next| self.is_capitalized_name(next)) {
                continue;
            }
            persons.insert(lower);
        }

        persons
    }

    /// Unions [`Self::extract`] over every title.
    #[must_use]
    pub fn extract_all<S: AsRef<str>>(&self, titles: &[S]) -> BTreeSet<String> {
        titles
            .iter()
            .flat_map(|title| self.extract(title.as_ref()))
            .collect()
    }

    fn is_capitalized_name(&self, word: &str) -> bool {
        starts_uppercase(word) && !self.is_stop_word(&word.to_lowercase())
    }
}

impl Default for PersonExtractor {
    fn default() -> Self {
        Self::new(3)
    }
}

/// Extracts four-digit years within a configured range.
#[derive(Debug, Clone)]
pub struct YearExtractor {
    pattern: Regex,
    min: i32,
    max: i32,
}

impl YearExtractor {
    /// Creates an extractor accepting years in `min..=max`.
    ///
    /// # Errors
    ///
    /// Returns [`crate::LinkError::InvalidPattern`] if the year pattern fails to compile.
    pub fn new(min: i32, max: i32) -> Result<Self> {
        Ok(Self {
            pattern: Regex::new(r"\b\d{4}\b")?,
            min,
            max,
        })
    }

    /// Creates an extractor from aggregation settings.
    ///
    /// # Errors
    ///
    /// Returns [`crate::LinkError::InvalidPattern`] if the year pattern fails to compile.
    pub fn from_config(config: &AggregationConfig) -> Result<Self> {
        Self::new(config.year_min, config.year_max)
    }

    /// Returns every in-range year mentioned in `text`.
    #[must_use]
    pub fn extract(&self, text: &str) -> BTreeSet<i32> {
        self.pattern
            .find_iter(text)
            .filter_map(|m| m.as_str().parse::<i32>().ok())
            .filter(|year| (self.min..=self.max).contains(year))
            .collect()
    }
}

fn trim_non_letters(word: &str) -> &str {
    word.trim_matches(|c: char| !c.is_alphabetic())
}

fn starts_uppercase(word: &str) -> bool {
    word.chars().next().is_some_and(char::is_uppercase)
}

#[cfg(test)]
mod tests {
    use super::*;

    // ==================== Person Extraction Tests ====================

    #[test]
    fn test_extract_surname_mid_sentence() {
        let extractor = PersonExtractor::default();
        let persons = extractor.extract("Will Trump win Ohio in 2028?");
        assert_eq!(persons, BTreeSet::from(["trump".to_string()]));
    }

    #[test]
    fn test_first_token_needs_capitalized_successor() {
        let extractor = PersonExtractor::default();
        assert_eq!(
            extractor.extract("Trump wins Ohio 2028 election"),
            BTreeSet::new()
        );
        assert_eq!(
            extractor.extract("Kamala Harris wins"),
            BTreeSet::from(["harris".to_string(), "kamala".to_string()])
        );
    }

    #[test]
    fn test_first_token_successor_must_not_be_stop_word() {
        let extractor = PersonExtractor::default();
        assert_eq!(extractor.extract("Vance Senate run"), BTreeSet::new());
    }

    #[test]
    fn test_punctuation_trimmed() {
        let extractor = PersonExtractor::default();
        let persons = extractor.extract("Will (Newsom) run? Or \"Shapiro\"...");
        assert_eq!(
            persons,
            BTreeSet::from(["newsom".to_string(), "shapiro".to_string()])
        );
    }

    #[test]
    fn test_inner_apostrophe_kept() {
        let extractor = PersonExtractor::default();
        let persons = extractor.extract("Will O'Rourke run in 2026?");
        assert_eq!(persons, BTreeSet::from(["o'rourke".to_string()]));
    }

    #[test]
    fn test_stop_words_and_short_tokens_skipped() {
        let extractor = PersonExtractor::default();
        let persons = extractor.extract("Will the Senate pass the GOP Budget by June?");
        assert!(persons.is_empty());
        assert!(extractor.extract("Will AI ban pass?").is_empty());
    }

    #[test]
    fn test_lowercase_tokens_ignored() {
        let extractor = PersonExtractor::default();
        assert!(extractor.extract("will trump win ohio").is_empty());
    }

    #[test]
    fn test_extra_stop_words() {
        let extractor = PersonExtractor::default().with_stop_words(&["Bitcoin"]);
        assert!(extractor.extract("Will Bitcoin hit 100k?").is_empty());
    }

    #[test]
    fn test_min_token_len_configurable() {
        let extractor = PersonExtractor::new(5);
        assert!(extractor.extract("Will Cruz run?").is_empty());
        assert_eq!(
            extractor.extract("Will Cornyn run?"),
            BTreeSet::from(["cornyn".to_string()])
        );
    }

    #[test]
    fn test_extract_all_unions() {
        let extractor = PersonExtractor::default();
        let persons = extractor.extract_all(&[
            "Will Trump win Ohio in 2028?",
            "Will Vance win Ohio in 2028?",
        ]);
        assert_eq!(
            persons,
            BTreeSet::from(["trump".to_string(), "vance".to_string()])
        );
    }

    // ==================== Year Extraction Tests ====================

    #[test]
    fn test_years_in_range() {
        let extractor = YearExtractor::new(2020, 2039).unwrap();
        let years = extractor.extract("before december 31, 2025 or in 2026; not 1999 or 2040");
        assert_eq!(years, BTreeSet::from([2025, 2026]));
    }

    #[test]
    fn test_years_need_word_boundaries() {
        let extractor = YearExtractor::new(2020, 2039).unwrap();
        assert!(extractor.extract("ticker KX20280 and 120250").is_empty());
        assert_eq!(extractor.extract("(2028)"), BTreeSet::from([2028]));
    }

    #[test]
    fn test_no_years() {
        let extractor = YearExtractor::new(2020, 2039).unwrap();
        assert!(extractor.extract("will trump resign?").is_empty());
    }
}
