//! Splits paragraphs into speakable fragments.
//!
//! A paragraph is normalized, cut into sentences wherever `.`, `?` or `!` is
//! followed by whitespace, and every sentence is cut again at its commas.
//! Each resulting piece becomes a [`Fragment`] carrying the boundary flags the
//! pause policy needs.

use serde::Serialize;

use crate::normalizer::TextNormalizer;

const SENTENCE_TERMINATORS: &[char] = &['.', '?', '!'];

/// The smallest unit of text sent to the speech engine in one call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Fragment {
    /// Speakable text: never empty, no trailing terminators, no commas.
    pub text: String,
    /// Last comma piece of its sentence.
    pub end_sentence: bool,
    /// Last fragment of its paragraph. Implies `end_sentence`.
    pub end_paragraph: bool,
}

#[derive(Debug, Clone, Default)]
pub struct Fragmenter {
    normalizer: TextNormalizer,
}

impl Fragmenter {
    pub fn new(normalizer: TextNormalizer) -> Self {
        Self { normalizer }
    }

    /// Fragment a whole document, preserving paragraph, sentence, and comma order.
    pub fn fragment<S: AsRef<str>>(&self, paragraphs: &[S]) -> Vec<Fragment> {
        let mut fragments = Vec::new();
        for paragraph in paragraphs {
            self.fragment_paragraph(paragraph.as_ref(), &mut fragments);
        }
        fragments
    }

    fn fragment_paragraph(&self, paragraph: &str, out: &mut Vec<Fragment>) {
        let normalized = self.normalizer.normalize(paragraph);

        let sentences: Vec<Vec<&str>> = split_sentences(&normalized)
            .into_iter()
            .map(sentence_pieces)
            .filter(|pieces| !pieces.is_empty())
            .collect();

        let last_sentence = sentences.len().saturating_sub(1);
        for (si, pieces) in sentences.iter().enumerate() {
            let last_piece = pieces.len() - 1;
            for (pi, piece) in pieces.iter().enumerate() {
                let end_sentence = pi == last_piece;
                out.push(Fragment {
                    text: (*piece).to_string(),
                    end_sentence,
                    end_paragraph: end_sentence && si == last_sentence,
                });
            }
        }
    }
}

/// Split after every terminator that is immediately followed by whitespace.
///
/// The terminator stays with the preceding sentence; the whole whitespace run
/// is dropped.
pub fn split_sentences(text: &str) -> Vec<&str> {
    let mut sentences = Vec::new();
    let mut start = 0;
    let mut prev: Option<char> = None;
    let mut chars = text.char_indices().peekable();

    while let Some((idx, ch)) = chars.next() {
        if ch.is_whitespace() && prev.is_some_and(|p| SENTENCE_TERMINATORS.contains(&p)) {
            sentences.push(&text[start..idx]);
            let mut end = idx + ch.len_utf8();
            while let Some(&(next_idx, next)) = chars.peek() {
                if !next.is_whitespace() {
                    break;
                }
                end = next_idx + next.len_utf8();
                chars.next();
            }
            start = end;
            prev = None;
            continue;
        }
        prev = Some(ch);
    }

    sentences.push(&text[start..]);
    sentences
}

/// Trimmed, non-empty comma pieces of one sentence with its terminators stripped.
fn sentence_pieces(sentence: &str) -> Vec<&str> {
    let sentence = sentence.trim();
    if sentence.is_empty() {
        return Vec::new();
    }
    sentence
        .trim_end_matches(SENTENCE_TERMINATORS)
        .split(',')
        .map(str::trim)
        .filter(|piece| !piece.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fragment(paragraphs: &[&str]) -> Vec<Fragment> {
        Fragmenter::default().fragment(paragraphs)
    }

    fn frag(text: &str, end_sentence: bool, end_paragraph: bool) -> Fragment {
        Fragment {
            text: text.to_string(),
            end_sentence,
            end_paragraph,
        }
    }

    #[test]
    fn splits_sentences_after_terminator_and_whitespace() {
        assert_eq!(
            split_sentences("One. Two?  Three!\nFour"),
            vec!["One.", "Two?", "Three!", "Four"]
        );
    }

    #[test]
    fn does_not_split_inside_tokens() {
        assert_eq!(split_sentences("Version 2.0 is out."), vec!["Version 2.0 is out."]);
        assert_eq!(split_sentences("Wait...what"), vec!["Wait...what"]);
    }

    #[test]
    fn trailing_whitespace_leaves_empty_last_sentence() {
        assert_eq!(split_sentences("End. "), vec!["End.", ""]);
    }

    #[test]
    fn doctor_smith_scenario() {
        assert_eq!(
            fragment(&["Dr. Smith had 3 cats, and he loved them."]),
            vec![
                frag("Doctor Smith had three cats", false, false),
                frag("and he loved them", true, true),
            ]
        );
    }

    #[test]
    fn single_sentence_paragraphs_each_end_a_paragraph() {
        assert_eq!(
            fragment(&["The sun rose.", "The birds sang."]),
            vec![frag("The sun rose", true, true), frag("The birds sang", true, true)]
        );
    }

    #[test]
    fn multi_sentence_paragraph_marks_only_last_fragment() {
        assert_eq!(
            fragment(&["Hello there. How are you, friend? Fine!"]),
            vec![
                frag("Hello there", true, false),
                frag("How are you", false, false),
                frag("friend", true, false),
                frag("Fine", true, true),
            ]
        );
    }

    #[test]
    fn empty_pieces_and_sentences_are_dropped() {
        assert_eq!(
            fragment(&["First, , second,. ?! Last,"]),
            vec![
                frag("First", false, false),
                frag("second", true, false),
                frag("Last", true, true),
            ]
        );
    }

    #[test]
    fn paragraph_end_survives_trailing_punctuation_sentence() {
        let fragments = fragment(&["Done. ...  "]);
        assert_eq!(fragments, vec![frag("Done", true, true)]);
    }

    #[test]
    fn blank_paragraphs_yield_nothing() {
        assert!(fragment(&["", "   ", "\n\n", "...", ", ,"]).is_empty());
    }

    #[test]
    fn boundary_flags_are_consistent() {
        let paragraphs = [
            "A long day, a short night. Then morning, then noon, then evening!",
            "   ",
            "Why? Because.",
            "No commas here",
        ];
        let fragments = fragment(&paragraphs);

        assert!(fragments.iter().all(|f| !f.end_paragraph || f.end_sentence));
        assert!(fragments.iter().all(|f| !f.text.is_empty() && !f.text.contains(',')));
        // One paragraph end per non-blank paragraph, and the document ends on one.
        assert_eq!(fragments.iter().filter(|f| f.end_paragraph).count(), 3);
        assert!(fragments.last().unwrap().end_paragraph);
    }

    #[test]
    fn fragments_preserve_token_order() {
        let normalizer = TextNormalizer::default();
        let paragraphs = ["Mr. Brown owns 12 boats, 3 cars, and a bike. He is rich.", "Yes, very."];
        let fragments = Fragmenter::new(normalizer.clone()).fragment(&paragraphs);

        let spoken: Vec<String> = fragments
            .iter()
            .flat_map(|f| f.text.split_whitespace())
            .map(str::to_string)
            .collect();
        let source: Vec<String> = paragraphs
            .iter()
            .flat_map(|p| {
                normalizer
                    .normalize(p)
                    .split_whitespace()
                    .map(|w| w.trim_matches(|c| c == ',' || c == '.').to_string())
                    .collect::<Vec<_>>()
            })
            .filter(|w| !w.is_empty())
            .collect();
        assert_eq!(spoken, source);
    }
}
