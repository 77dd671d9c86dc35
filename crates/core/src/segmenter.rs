//! Segmenter: splits long text into a numbered thread of bounded chunks.
//!
//! Splitting prefers paragraph boundaries (`\n\n`), falls back to sentence
//! boundaries (`. `, `! `, `? `, `。`) for oversized paragraphs, and hard-splits
//! by character count only when a single sentence exceeds the budget.
//!
//! Room for the trailing `\n\n{i}/{total}` marker is reserved before any
//! splitting happens. The reserve starts at [`DEFAULT_RESERVE_WIDTH`] and grows
//! when the resulting thread is long enough to need a wider marker.

use tracing::debug;

use crate::error::SegmentError;

/// Maximum characters per post on the default platform.
pub const DEFAULT_MAX_UNIT_LENGTH: usize = 280;

/// Characters reserved for the position marker on the first pass.
pub const DEFAULT_RESERVE_WIDTH: usize = 6;

const PARAGRAPH_SEPARATOR: &str = "\n\n";
const PARAGRAPH_JOIN_COST: usize = 2;
const SENTENCE_JOIN_COST: usize = 1;

/// Length of `s` in characters (Unicode scalar values), the unit every limit is measured in.
pub fn char_len(s: &str) -> usize {
    s.chars().count()
}

/// Segment `text` into chunks of at most `max_unit_length` characters.
///
/// Shorthand for `Segmenter::new(max_unit_length).segment(text)`.
pub fn segment(text: &str, max_unit_length: usize) -> Result<Vec<String>, SegmentError> {
    Segmenter::new(max_unit_length).segment(text)
}

/// Stateless thread segmenter configured with a unit limit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Segmenter {
    max_unit_length: usize,
}

impl Default for Segmenter {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_UNIT_LENGTH)
    }
}

impl Segmenter {
    pub fn new(max_unit_length: usize) -> Self {
        Self { max_unit_length }
    }

    pub fn max_unit_length(&self) -> usize {
        self.max_unit_length
    }

    /// Fail unless the limit leaves room for text after the marker reserve.
    pub fn validate(&self) -> Result<(), SegmentError> {
        if self.max_unit_length <= DEFAULT_RESERVE_WIDTH {
            return Err(SegmentError::InvalidLimit {
                limit: self.max_unit_length,
                reserve: DEFAULT_RESERVE_WIDTH,
            });
        }
        Ok(())
    }

    /// Split `text` into an ordered thread.
    ///
    /// Text that already fits in one unit is returned verbatim as a single
    /// chunk. Otherwise every chunk, marker included, fits within the limit,
    /// and every chunk of a multi-chunk result ends with `\n\n{i}/{total}`.
    pub fn segment(&self, text: &str) -> Result<Vec<String>, SegmentError> {
        self.validate()?;
        let limit = self.max_unit_length;

        if text.trim().is_empty() {
            return Err(SegmentError::EmptyInput);
        }

        if char_len(text) <= limit {
            return Ok(vec![text.to_string()]);
        }

        let mut reserve = DEFAULT_RESERVE_WIDTH;
        let mut total = 0;
        while reserve < limit {
            let bodies = split_bodies(text, limit - reserve);
            total = bodies.len();

            let needed = marker_width(total);
            if total <= 1 || needed <= reserve {
                debug!(chunks = total, reserve, limit, "Segmented text");
                return Ok(number(bodies));
            }

            debug!(chunks = total, reserve, needed, "Marker exceeds reserve, re-segmenting");
            reserve = needed;
        }

        Err(SegmentError::LimitTooSmall { limit, total })
    }
}

/// Width of the widest marker in a thread of `total` chunks: `\n\n{total}/{total}`.
fn marker_width(total: usize) -> usize {
    let digits = total.max(1).ilog10() as usize + 1;
    PARAGRAPH_SEPARATOR.len() + digits * 2 + 1
}

fn number(bodies: Vec<String>) -> Vec<String> {
    let total = bodies.len();
    if total <= 1 {
        return bodies;
    }

    bodies
        .into_iter()
        .enumerate()
        .map(|(i, body)| format!("{body}{PARAGRAPH_SEPARATOR}{}/{total}", i + 1))
        .collect()
}

/// Split into unnumbered chunk bodies of at most `budget` characters each.
fn split_bodies(text: &str, budget: usize) -> Vec<String> {
    let mut acc = Accumulator::new(budget);

    for paragraph in text.split(PARAGRAPH_SEPARATOR) {
        let paragraph = paragraph.trim();
        if !paragraph.is_empty() {
            acc.push_paragraph(paragraph);
        }
    }

    acc.finish()
}

/// Split a paragraph after each `. `, `! `, `? ` (space included) and after each `。`.
fn sentences(paragraph: &str) -> Vec<&str> {
    let mut out = Vec::new();
    let mut start = 0;
    let mut chars = paragraph.char_indices().peekable();

    while let Some((i, c)) = chars.next() {
        let end = match c {
            '。' => Some(i + c.len_utf8()),
            '.' | '!' | '?' => match chars.peek() {
                Some(&(j, ' ')) => {
                    chars.next();
                    Some(j + 1)
                }
                _ => None,
            },
            _ => None,
        };

        if let Some(end) = end {
            out.push(&paragraph[start..end]);
            start = end;
        }
    }

    if start < paragraph.len() {
        out.push(&paragraph[start..]);
    }
    out
}

/// Greedy accumulator shared by the paragraph and sentence passes.
struct Accumulator {
    budget: usize,
    chunks: Vec<String>,
    current: String,
    current_len: usize,
}

impl Accumulator {
    fn new(budget: usize) -> Self {
        Self {
            budget,
            chunks: Vec::new(),
            current: String::new(),
            current_len: 0,
        }
    }

    fn push_paragraph(&mut self, paragraph: &str) {
        let len = char_len(paragraph);
        if len > self.budget {
            self.flush();
            for sentence in sentences(paragraph) {
                let sentence = sentence.trim();
                if !sentence.is_empty() {
                    self.push_sentence(sentence);
                }
            }
            return;
        }

        self.append(paragraph, len, PARAGRAPH_SEPARATOR, PARAGRAPH_JOIN_COST);
    }

    fn push_sentence(&mut self, sentence: &str) {
        let len = char_len(sentence);
        if len > self.budget {
            self.flush();
            self.hard_split(sentence, len);
            return;
        }

        self.append(sentence, len, " ", SENTENCE_JOIN_COST);
    }

    /// Append `piece`, flushing first if the join would overflow the budget.
    fn append(&mut self, piece: &str, len: usize, separator: &str, join_cost: usize) {
        if !self.current.is_empty() && self.current_len + len + join_cost > self.budget {
            self.flush();
        }

        if self.current.is_empty() {
            self.current.push_str(piece);
            self.current_len = len;
        } else {
            self.current.push_str(separator);
            self.current.push_str(piece);
            self.current_len += join_cost + len;
        }
    }

    /// Cut `sentence` every `budget` characters; the remainder stays open.
    fn hard_split(&mut self, sentence: &str, mut len: usize) {
        let mut rest = sentence;
        while len > self.budget {
            let cut = rest
                .char_indices()
                .nth(self.budget)
                .map_or(rest.len(), |(i, _)| i);
            let (head, tail) = rest.split_at(cut);
            self.emit(head);
            rest = tail;
            len -= self.budget;
        }

        let rest = rest.trim();
        self.current = rest.to_string();
        self.current_len = char_len(rest);
    }

    fn emit(&mut self, chunk: &str) {
        let chunk = chunk.trim();
        if !chunk.is_empty() {
            self.chunks.push(chunk.to_string());
        }
    }

    fn flush(&mut self) {
        let current = std::mem::take(&mut self.current);
        self.current_len = 0;
        self.emit(&current);
    }

    fn finish(mut self) -> Vec<String> {
        self.flush();
        self.chunks
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Strip the `\n\n{i}/{total}` marker, asserting it is the expected one.
    fn body(chunk: &str, i: usize, total: usize) -> &str {
        let marker = format!("\n\n{i}/{total}");
        chunk
            .strip_suffix(marker.as_str())
            .unwrap_or_else(|| panic!("chunk {i} missing marker {marker:?}: {chunk:?}"))
    }

    fn without_whitespace(s: &str) -> String {
        s.chars().filter(|c| !c.is_whitespace()).collect()
    }

    fn assert_thread_invariants(text: &str, chunks: &[String], limit: usize) {
        let total = chunks.len();
        assert!(total > 1, "expected a multi-chunk thread");

        let mut rebuilt = String::new();
        for (i, chunk) in chunks.iter().enumerate() {
            assert!(
                char_len(chunk) <= limit,
                "chunk {} has {} chars (limit {limit})",
                i + 1,
                char_len(chunk)
            );
            let b = body(chunk, i + 1, total);
            assert!(!b.trim().is_empty(), "chunk {} is empty", i + 1);
            rebuilt.push_str(b);
        }

        assert_eq!(without_whitespace(&rebuilt), without_whitespace(text));
    }

    #[test]
    fn short_text_is_returned_verbatim() {
        assert_eq!(segment("short tweet", 280).unwrap(), vec!["short tweet"]);
    }

    #[test]
    fn fast_path_does_not_trim() {
        let text = "  padded  \n\n";
        assert_eq!(segment(text, 280).unwrap(), vec![text.to_string()]);
    }

    #[test]
    fn exactly_at_limit_is_single_chunk() {
        let text = "x".repeat(280);
        assert_eq!(segment(&text, 280).unwrap(), vec![text]);
    }

    #[test]
    fn hard_split_without_boundaries() {
        let text = "a".repeat(400);
        let chunks = segment(&text, 280).unwrap();

        assert_eq!(chunks.len(), 2);
        assert_eq!(chunks[0], format!("{}\n\n1/2", "a".repeat(274)));
        assert_eq!(chunks[1], format!("{}\n\n2/2", "a".repeat(126)));
    }

    #[test]
    fn two_short_paragraphs_fit_in_one_post() {
        let text = format!("{}\n\n{}", "p".repeat(100), "q".repeat(100));
        let chunks = segment(&text, 280).unwrap();
        assert_eq!(chunks, vec![text]);
    }

    #[test]
    fn paragraphs_are_packed_greedily() {
        let text = format!(
            "{}\n\n{}\n\n{}",
            "a".repeat(100),
            "b".repeat(100),
            "c".repeat(100)
        );
        let chunks = segment(&text, 280).unwrap();

        assert_eq!(chunks.len(), 2);
        assert_eq!(
            body(&chunks[0], 1, 2),
            format!("{}\n\n{}", "a".repeat(100), "b".repeat(100))
        );
        assert_eq!(body(&chunks[1], 2, 2), "c".repeat(100));
    }

    #[test]
    fn paragraph_join_cost_is_two() {
        // 136 + 2 + 136 = 274 fits exactly; one more char does not.
        let fits = format!("{}\n\n{}\n\n{}", "a".repeat(136), "b".repeat(136), "c".repeat(10));
        let chunks = segment(&fits, 280).unwrap();
        assert_eq!(chunks.len(), 2);
        assert_eq!(char_len(body(&chunks[0], 1, 2)), 274);

        let overflows = format!("{}\n\n{}\n\n{}", "a".repeat(137), "b".repeat(136), "c".repeat(10));
        let chunks = segment(&overflows, 280).unwrap();
        assert_eq!(chunks.len(), 2);
        assert_eq!(body(&chunks[0], 1, 2), "a".repeat(137));
    }

    #[test]
    fn oversized_paragraph_splits_at_sentences() {
        let sentence = format!("{}. ", "a".repeat(98));
        let text = sentence.repeat(3);
        assert_eq!(char_len(&text), 300);

        let chunks = segment(&text, 280).unwrap();
        assert_eq!(chunks.len(), 2);

        let first = format!("{0}. {0}.", "a".repeat(98));
        assert_eq!(body(&chunks[0], 1, 2), first);
        assert_eq!(body(&chunks[1], 2, 2), format!("{}.", "a".repeat(98)));
        assert_thread_invariants(&text, &chunks, 280);
    }

    #[test]
    fn sentence_join_cost_is_one() {
        // 137 + 1 + 136 = 274 fills the budget exactly; a cost of 2 would not fit.
        let first = format!("{}.", "x".repeat(136));
        let second = format!("{}.", "y".repeat(135));
        let text = format!("{first} {second} {}.", "z".repeat(100));
        let chunks = segment(&text, 280).unwrap();

        assert_eq!(chunks.len(), 2);
        let joined = body(&chunks[0], 1, 2);
        assert_eq!(joined, format!("{first} {second}"));
        assert_eq!(char_len(joined), 274);
    }

    #[test]
    fn plain_terminators_need_a_trailing_space() {
        let text = format!("{}.{}", "a".repeat(200), "b".repeat(200));
        let chunks = segment(&text, 280).unwrap();

        // No boundary: falls through to a hard split at 274 characters.
        assert_eq!(chunks.len(), 2);
        assert_eq!(char_len(body(&chunks[0], 1, 2)), 274);
    }

    #[test]
    fn full_width_period_is_a_boundary_without_space() {
        let sentence = format!("{}。", "字".repeat(99));
        let text = sentence.repeat(4);
        let chunks = segment(&text, 280).unwrap();

        assert_eq!(chunks.len(), 2);
        assert_eq!(body(&chunks[0], 1, 2), format!("{sentence} {sentence}"));
        assert_eq!(body(&chunks[1], 2, 2), format!("{sentence} {sentence}"));
    }

    #[test]
    fn lengths_are_counted_in_characters() {
        let text = "é".repeat(400);
        let chunks = segment(&text, 280).unwrap();

        assert_eq!(chunks.len(), 2);
        assert_eq!(char_len(body(&chunks[0], 1, 2)), 274);
        assert_thread_invariants(&text, &chunks, 280);
    }

    #[test]
    fn oversized_paragraph_after_short_one_still_respects_limit() {
        let long = format!("{} ", "word".repeat(20)).repeat(10);
        let text = format!("Intro line.\n\n{long}");
        let chunks = segment(&text, 280).unwrap();

        assert_eq!(body(&chunks[0], 1, chunks.len()), "Intro line.");
        assert_thread_invariants(&text, &chunks, 280);
    }

    #[test]
    fn oversized_sentence_after_short_one_is_hard_split() {
        let text = format!("Short one. {}", "z".repeat(600));
        let chunks = segment(&text, 280).unwrap();

        assert_eq!(body(&chunks[0], 1, chunks.len()), "Short one.");
        assert_thread_invariants(&text, &chunks, 280);
    }

    #[test]
    fn hard_split_remainder_joins_next_sentence() {
        let text = format!("{}. tail", "a".repeat(300));
        let chunks = segment(&text, 280).unwrap();

        assert_eq!(chunks.len(), 2);
        assert_eq!(body(&chunks[0], 1, 2), "a".repeat(274));
        assert_eq!(body(&chunks[1], 2, 2), format!("{}. tail", "a".repeat(26)));
    }

    #[test]
    fn blank_paragraphs_are_dropped() {
        let text = format!("{}\n\n   \n\n\n\n{}", "a".repeat(200), "b".repeat(200));
        let chunks = segment(&text, 280).unwrap();

        assert_eq!(chunks.len(), 2);
        assert_eq!(body(&chunks[0], 1, 2), "a".repeat(200));
        assert_eq!(body(&chunks[1], 2, 2), "b".repeat(200));
    }

    #[test]
    fn pipe_characters_are_preserved() {
        let text = format!("{} | {}", "a".repeat(150), "b".repeat(150));
        let chunks = segment(&text, 280).unwrap();
        assert!(chunks.iter().any(|c| c.contains('|')));
        assert_thread_invariants(&text, &chunks, 280);
    }

    #[test]
    fn reserve_grows_for_double_digit_threads() {
        let text = "a".repeat(3000);
        let chunks = segment(&text, 280).unwrap();

        assert_eq!(chunks.len(), 11);
        assert_eq!(char_len(body(&chunks[0], 1, 11)), 273);
        assert_thread_invariants(&text, &chunks, 280);
    }

    #[test]
    fn sentence_heavy_long_text_stays_within_limit() {
        let text = (0..80)
            .map(|i| format!("Sentence number {i} says something mildly interesting."))
            .collect::<Vec<_>>()
            .join(" ");
        let chunks = segment(&text, 280).unwrap();
        assert!(chunks.len() >= 10);
        assert_thread_invariants(&text, &chunks, 280);
    }

    #[test]
    fn custom_limit() {
        let text = "one two three four five six seven eight nine ten";
        let chunks = segment(text, 20).unwrap();
        assert_thread_invariants(text, &chunks, 20);
    }

    #[test]
    fn whitespace_only_is_empty_input() {
        assert_eq!(segment("", 280), Err(SegmentError::EmptyInput));
        assert_eq!(segment(" \n\n \t\n", 280), Err(SegmentError::EmptyInput));
    }

    #[test]
    fn limit_must_exceed_reserve() {
        assert_eq!(
            segment("hello", 6),
            Err(SegmentError::InvalidLimit { limit: 6, reserve: 6 })
        );
        assert!(segment("hello", 7).is_ok());
    }

    #[test]
    fn validate_checks_limit_without_text() {
        assert_eq!(
            Segmenter::new(3).validate(),
            Err(SegmentError::InvalidLimit { limit: 3, reserve: 6 })
        );
        assert!(Segmenter::new(7).validate().is_ok());
        assert!(Segmenter::default().validate().is_ok());
    }

    #[test]
    fn tiny_limit_that_cannot_fit_markers_fails() {
        let text = "a".repeat(500);
        assert!(matches!(
            segment(&text, 8),
            Err(SegmentError::LimitTooSmall { limit: 8, .. })
        ));
    }

    #[test]
    fn trailing_whitespace_only_overflow_yields_single_trimmed_chunk() {
        let text = format!("hello{}", " ".repeat(300));
        assert_eq!(segment(&text, 280).unwrap(), vec!["hello".to_string()]);
    }

    #[test]
    fn sentence_scanner_keeps_terminators() {
        assert_eq!(
            sentences("One. Two! Three? Four。Five"),
            vec!["One. ", "Two! ", "Three? ", "Four。", "Five"]
        );
        assert_eq!(sentences("v1.2 is out"), vec!["v1.2 is out"]);
    }

    #[test]
    fn marker_width_by_thread_size() {
        assert_eq!(marker_width(2), 5);
        assert_eq!(marker_width(9), 5);
        assert_eq!(marker_width(10), 7);
        assert_eq!(marker_width(99), 7);
        assert_eq!(marker_width(100), 9);
    }

    #[test]
    fn default_segmenter_uses_platform_limit() {
        assert_eq!(Segmenter::default().max_unit_length(), DEFAULT_MAX_UNIT_LENGTH);
    }
}
