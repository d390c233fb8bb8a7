//! Text normalization applied before scoring.
//!
//! The two platforms write the same facts differently ("GOP" vs
//! "Republican", "Jan 20" vs "January 20", ISO timestamps vs prose dates).
//! [`TextNormalizer`] maps both onto one lowercase vocabulary through ordered
//! regex substitution tables.

use crate::error::Result;
use regex::{Captures, Regex};

/// A pluggable text normalization step.
pub trait TextNormalize: Send + Sync {
    /// Returns the normalized form of `text`.
    fn normalize(&self, text: &str) -> String;
}

/// Leaves text untouched.
#[derive(Debug, Clone, Copy, Default)]
pub struct PassThrough;

impl TextNormalize for PassThrough {
    fn normalize(&self, text: &str) -> String {
        text.to_string()
    }
}

const COUNTRY_ABBREVIATIONS: &[(&str, &str)] = &[
    (r"\bu\.s\.a\.", "united states"),
    (r"\bu\.s\.", "united states"),
    (r"\busa\b", "united states"),
];

// "may" is deliberately absent: it is both a month and a modal verb.
const MONTH_ABBREVIATIONS: &[(&str, &str)] = &[
    (r"\bjan\b", "january"),
    (r"\bfeb\b", "february"),
    (r"\bmar\b", "march"),
    (r"\bapr\b", "april"),
    (r"\bjun\b", "june"),
    (r"\bjul\b", "july"),
    (r"\baug\b", "august"),
    (r"\bsep\b", "september"),
    (r"\bsept\b", "september"),
    (r"\boct\b", "october"),
    (r"\bnov\b", "november"),
    (r"\bdec\b", "december"),
];

const PARTY_ABBREVIATIONS: &[(&str, &str)] = &[
    (r"\bgop\b", "republican"),
    (r"\bdems\b", "democrats"),
    (r"\bdem\b", "democrat"),
    (r"\brep\b", "representative"),
    (r"\(d\)", "(democrat)"),
    (r"\(r\)", "(republican)"),
    (r"\(i\)", "(independent)"),
];

const OFFICE_ABBREVIATIONS: &[(&str, &str)] = &[
    (r"\bd\.c\.", "dc"),
    (r"\bh\.r\.", "hr"),
    (r"\bj\.d\.", "jd"),
    (r"\bgov\b", "governor"),
    (r"\bsen\b", "senator"),
    (r"\bpres\b", "president"),
    (r"\bsecy\b", "secretary"),
    (r"\bsec\b", "secretary"),
    (r"\badmin\b", "administration"),
];

const MONTH_NAMES: [&str; 12] = [
    "january",
    "february",
    "march",
    "april",
    "may",
    "june",
    "july",
    "august",
    "september",
    "october",
    "november",
    "december",
];

/// Regex-table normalizer for market titles and rules.
///
/// Steps, in order:
/// 1. Uppercase `US` becomes `united states` (before lowercasing, so the
///    pronoun "us" survives).
/// 2. Lowercase.
/// 3. Country, month, party and office abbreviation tables.
/// 4. ISO dates and timestamps become `month day, year`.
/// 5. Ordinal suffixes on day numbers are dropped.
/// 6. Whitespace runs collapse to one space.
#[derive(Debug, Clone)]
pub struct TextNormalizer {
    us_upper: Regex,
    substitutions: Vec<(Regex, &'static str)>,
    iso_date: Regex,
    ordinal: Regex,
    whitespace: Regex,
}

impl TextNormalizer {
    /// Compiles the standard substitution tables.
    ///
    /// # Errors
    ///
    /// Returns [`crate::LinkError::InvalidPattern`] if a table entry fails to compile.
    pub fn standard() -> Result<Self> {
        let substitutions = COUNTRY_ABBREVIATIONS
            .iter()
            .chain(MONTH_ABBREVIATIONS)
            .chain(PARTY_ABBREVIATIONS)
            .chain(OFFICE_ABBREVIATIONS)
            .map(|&(pattern, replacement)| -> Result<(Regex, &'static str)> {
                Ok((Regex::new(pattern)?, replacement))
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            us_upper: Regex::new(r"\bUS\b")?,
            substitutions,
            iso_date: Regex::new(r"\b(\d{4})-(\d{2})-(\d{2})(?:t[\d:.]+z?)?\b")?,
            ordinal: Regex::new(r"\b(\d{1,2})(?:st|nd|rd|th)\b")?,
            whitespace: Regex::new(r"\s+")?,
        })
    }

    fn rewrite_dates(&self, text: &str) -> String {
        let text = self.iso_date.replace_all(text, |caps: &Captures<'_>| {
            let month = caps[2].parse::<usize>().ok();
            let day = caps[3].parse::<u32>().ok();
            match (month.and_then(|m| MONTH_NAMES.get(m.wrapping_sub(1))), day) {
                (Some(name), Some(day)) => format!("{name} {day}, {}", &caps[1]),
                _ => caps[0].to_string(),
            }
        });
        self.ordinal.replace_all(&text, "$1").into_owned()
    }
}

impl TextNormalize for TextNormalizer {
    fn normalize(&self, text: &str) -> String {
        if text.trim().is_empty() {
            return String::new();
        }

        let mut out = self.us_upper.replace_all(text, "united states").to_lowercase();
        for (pattern, replacement) in &self.substitutions {
            out = pattern.replace_all(&out, *replacement).into_owned();
        }
        let out = self.rewrite_dates(&out);

        self.whitespace.replace_all(&out, " ").trim().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn normalizer() -> TextNormalizer {
        TextNormalizer::standard().expect("standard tables compile")
    }

    #[test]
    fn test_us_uppercase_only() {
        let n = normalizer();
        assert_eq!(n.normalize("Will US strike Iran?"), "will united states strike iran?");
        assert_eq!(n.normalize("Join us"), "join us");
    }

    #[test]
    fn test_dotted_country_abbreviations() {
        let n = normalizer();
        assert_eq!(n.normalize("U.S.A. GDP"), "united states gdp");
        assert_eq!(n.normalize("the U.S. Senate"), "the united states senate");
    }

    #[test]
    fn test_month_abbreviations() {
        let n = normalizer();
        assert_eq!(n.normalize("by Jan 20"), "by january 20");
        assert_eq!(n.normalize("Sept 1"), "september 1");
        assert_eq!(n.normalize("may resign"), "may resign");
    }

    #[test]
    fn test_party_and_office_abbreviations() {
        let n = normalizer();
        assert_eq!(n.normalize("GOP Sen wins"), "republican senator wins");
        assert_eq!(n.normalize("Ossoff (D) vs Collins (R)"), "ossoff (democrat) vs collins (republican)");
        assert_eq!(n.normalize("Sec of State"), "secretary of state");
    }

    #[test]
    fn test_iso_dates_rewritten() {
        let n = normalizer();
        assert_eq!(n.normalize("before 2026-02-01"), "before february 1, 2026");
        assert_eq!(
            n.normalize("closes 2025-12-31T23:59:00.000Z"),
            "closes december 31, 2025"
        );
    }

    #[test]
    fn test_invalid_iso_month_left_alone() {
        let n = normalizer();
        assert_eq!(n.normalize("code 2025-13-01"), "code 2025-13-01");
    }

    #[test]
    fn test_ordinals_stripped() {
        let n = normalizer();
        assert_eq!(n.normalize("on September 25th"), "on september 25");
        assert_eq!(n.normalize("the 1st round"), "the 1 round");
    }

    #[test]
    fn test_whitespace_collapsed_and_empty() {
        let n = normalizer();
        assert_eq!(n.normalize("  a \n\t b  "), "a b");
        assert_eq!(n.normalize("   "), "");
    }

    #[test]
    fn test_marker_survives() {
        let n = normalizer();
        assert_eq!(n.normalize("Will Trump win [blank] in 2028?"), "will trump win [blank] in 2028?");
    }

    #[test]
    fn test_pass_through() {
        assert_eq!(PassThrough.normalize("Keep ME"), "Keep ME");
    }
}
