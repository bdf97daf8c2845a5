use std::borrow::Cow;

use once_cell::sync::Lazy;
use regex::{Captures, Regex};

use crate::config::NormalizerConfig;
use crate::numbers::digits_to_words;

/// A standalone run of digits. `\b` keeps digits inside tokens like "B12" or "3rd" intact.
static NUMBER_PATTERN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\b[0-9]+\b").unwrap());

/// A hyphen that breaks a word across a line.
static LINE_HYPHEN_PATTERN: Lazy<Regex> = Lazy::new(|| Regex::new(r"-\s*\n").unwrap());

/// Rewrites raw document text into something a TTS engine can read aloud.
///
/// Steps run in a fixed order: numbers are spelled out, abbreviations are
/// expanded, and words hyphenated across a line break are rejoined.
#[derive(Debug, Clone, Default)]
pub struct TextNormalizer {
    config: NormalizerConfig,
}

impl TextNormalizer {
    pub fn new(config: NormalizerConfig) -> Self {
        Self { config }
    }

    pub fn normalize(&self, text: &str) -> String {
        let text = expand_numbers(text);
        let text = self.expand_abbreviations(text);
        LINE_HYPHEN_PATTERN.replace_all(&text, "").into_owned()
    }

    fn expand_abbreviations<'a>(&self, text: Cow<'a, str>) -> Cow<'a, str> {
        self.config
            .abbreviations
            .iter()
            .fold(text, |text, (abbr, full)| {
                if abbr.is_empty() || !text.contains(abbr.as_str()) {
                    text
                } else {
                    Cow::Owned(text.replace(abbr.as_str(), full))
                }
            })
    }
}

fn expand_numbers(text: &str) -> Cow<'_, str> {
    NUMBER_PATTERN.replace_all(text, |caps: &Captures| digits_to_words(&caps[0]))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn normalize(text: &str) -> String {
        TextNormalizer::default().normalize(text)
    }

    #[test]
    fn plain_text_is_unchanged() {
        let text = "Nothing here needs rewriting, does it? No.";
        assert_eq!(normalize(text), text);
        assert_eq!(normalize(&normalize(text)), text);
    }

    #[test]
    fn expands_standalone_numbers() {
        let out = normalize("I have 42 apples");
        assert_eq!(out, "I have forty-two apples");
        assert!(!out.contains("42"));
    }

    #[test]
    fn leaves_digits_inside_tokens() {
        assert_eq!(normalize("Take the B12 bus on the 3rd"), "Take the B12 bus on the 3rd");
    }

    #[test]
    fn numbers_next_to_punctuation_are_expanded() {
        assert_eq!(normalize("Chapter 7."), "Chapter seven.");
        assert_eq!(normalize("(12)"), "(twelve)");
    }

    #[test]
    fn expands_abbreviations_case_sensitively() {
        assert_eq!(normalize("Dr. Who met Mr. Jones"), "Doctor Who met Mister Jones");
        assert_eq!(normalize("dr. who"), "dr. who");
        assert_eq!(normalize("apples, pears, etc."), "apples, pears, etcetera");
    }

    #[test]
    fn abbreviation_table_is_configurable() {
        let normalizer = TextNormalizer::new(NormalizerConfig {
            abbreviations: vec![("St.".to_string(), "Saint".to_string())],
        });
        assert_eq!(normalizer.normalize("St. Paul and Dr. No"), "Saint Paul and Dr. No");
    }

    #[test]
    fn abbreviations_apply_in_table_order() {
        let normalizer = TextNormalizer::new(NormalizerConfig {
            abbreviations: vec![
                ("Prof.".to_string(), "Professor Dr.".to_string()),
                ("Dr.".to_string(), "Doctor".to_string()),
            ],
        });
        assert_eq!(normalizer.normalize("Prof. X"), "Professor Doctor X");
    }

    #[test]
    fn rejoins_hyphenated_line_breaks() {
        assert_eq!(normalize("extra-\nordinary"), "extraordinary");
        assert_eq!(normalize("extra-  \nordinary"), "extraordinary");
        assert_eq!(normalize("well-known"), "well-known");
    }
}
