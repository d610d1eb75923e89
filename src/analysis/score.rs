//! Similarity score extraction
//!
//! Pulls a 0-100 percentage out of free-form report text. Patterns are tried
//! in priority order; for each one only its first match counts, and a value
//! above 100 is treated as no match.
//!
//! The final pattern accepts any bare percentage, so an unrelated figure in
//! the report can be picked up when no labeled score is present.

use regex::Regex;
use std::sync::OnceLock;

/// Highest score the extractor will return
pub const MAX_SCORE: u8 = 100;

struct ScorePattern {
    label: &'static str,
    regex: Regex,
}

const PATTERN_SOURCES: [(&str, &str); 7] = [
    ("similarity score", r"(?i)similarity\s*score[:\s-]*([0-9]+)\s*%"),
    ("similarity", r"(?i)similarity[:\s-]*([0-9]+)\s*%"),
    ("percent similarity", r"(?i)([0-9]+)\s*%\s*similarity"),
    ("score", r"(?i)(?-u:\b)score[:\s-]*([0-9]+)\s*%"),
    ("overall", r"(?i)overall[:\s-]*([0-9]+)\s*%"),
    ("match", r"(?i)match[:\s-]*([0-9]+)\s*%"),
    ("bare percentage", r"([0-9]+)\s*%"),
];

fn patterns() -> &'static [ScorePattern] {
    static PATTERNS: OnceLock<Vec<ScorePattern>> = OnceLock::new();
    PATTERNS.get_or_init(|| {
        PATTERN_SOURCES
            .iter()
            .map(|&(label, source)| ScorePattern {
                label,
                regex: Regex::new(source).expect("score patterns are valid"),
            })
            .collect()
    })
}

/// Extract the similarity score from a report.
///
/// `None` means no usable percentage was found, which is different from a
/// score of zero.
pub fn extract_similarity_score(text: &str) -> Option<u8> {
    for pattern in patterns() {
        let Some(captures) = pattern.regex.captures(text) else {
            continue;
        };
        let Some(digits) = captures.get(1) else {
            continue;
        };

        match digits.as_str().parse::<u32>() {
            Ok(value) if value <= u32::from(MAX_SCORE) => {
                tracing::debug!("Found similarity score {}% via '{}'", value, pattern.label);
                return u8::try_from(value).ok();
            }
            _ => {
                tracing::debug!(
                    "Pattern '{}' matched out-of-range value {}",
                    pattern.label,
                    digits.as_str()
                );
            }
        }
    }

    tracing::debug!("No similarity score found in report");
    None
}
