//! Punctuation-aware text segmentation.
//!
//! # Algorithm
//!
//! 1. Split on sentence-terminal marks ([`TERMINAL_MARKS`]); each mark stays
//!    attached to the text before it.
//! 2. Greedily pack consecutive sentences into a segment while the running
//!    character count stays within `max_chars`, flushing when the next
//!    sentence would overflow.
//! 3. A single sentence longer than the budget is re-split on secondary
//!    marks ([`SECONDARY_MARKS`]) with the same greedy packing.
//! 4. A fragment that is *still* too long after secondary splitting is
//!    hard-chunked into pieces of exactly `max_chars` characters.
//!
//! All lengths are Unicode scalar counts — a budget of 80 means 80 Chinese
//! characters, not 80 bytes.

// ---------------------------------------------------------------------------
// Punctuation sets
// ---------------------------------------------------------------------------

/// Sentence-terminal marks. A run of text ending in one of these is treated
/// as an atomic unit for packing.
pub const TERMINAL_MARKS: &[char] = &['。', '！', '？', '；', '.', '!', '?', ';'];

/// Secondary (clause-level) marks used to break up a single oversized
/// sentence.
pub const SECONDARY_MARKS: &[char] = &['，', '、', ','];

// ---------------------------------------------------------------------------
// split_text
// ---------------------------------------------------------------------------

/// Split `text` into ordered segments of at most `max_chars` characters.
///
/// - Empty or whitespace-only input returns an empty list.
/// - Input of `max_chars` characters or fewer returns a single segment equal
///   to the trimmed input.
/// - Every returned segment is non-empty and, except for hard-chunked
///   fragments, ends at a punctuation or input boundary.
pub fn split_text(text: &str, max_chars: usize) -> Vec<String> {
    let text = text.trim();
    if text.is_empty() {
        return Vec::new();
    }
    if char_len(text) <= max_chars {
        return vec![text.to_string()];
    }

    let mut segments: Vec<String> = Vec::new();
    let mut current = String::new();
    let mut current_len = 0usize;

    for sentence in split_keeping_marks(text, TERMINAL_MARKS) {
        let sentence = sentence.trim();
        if sentence.is_empty() {
            continue;
        }
        let sentence_len = char_len(sentence);

        if sentence_len > max_chars {
            // Flush whatever was accumulated, then break the long sentence
            // down on clause-level punctuation.
            flush(&mut segments, &mut current, &mut current_len);
            split_long_sentence(sentence, max_chars, &mut segments);
        } else if current_len + sentence_len > max_chars {
            flush(&mut segments, &mut current, &mut current_len);
            current.push_str(sentence);
            current_len = sentence_len;
        } else {
            current.push_str(sentence);
            current_len += sentence_len;
        }
    }

    flush(&mut segments, &mut current, &mut current_len);
    segments.retain(|s| !s.is_empty());
    segments
}

/// Secondary pass for a single sentence that exceeds the budget: split on
/// clause marks, keep clauses whole where possible, hard-chunk the rest.
fn split_long_sentence(sentence: &str, max_chars: usize, out: &mut Vec<String>) {
    for part in split_keeping_marks(sentence, SECONDARY_MARKS) {
        let part = part.trim();
        if part.is_empty() {
            continue;
        }
        if char_len(part) > max_chars {
            hard_chunk(part, max_chars, out);
        } else {
            out.push(part.to_string());
        }
    }
}

/// Force-cut `text` into pieces of exactly `max_chars` characters (the final
/// piece may be shorter).
fn hard_chunk(text: &str, max_chars: usize, out: &mut Vec<String>) {
    let chars: Vec<char> = text.chars().collect();
    for chunk in chars.chunks(max_chars) {
        out.push(chunk.iter().collect());
    }
}

/// Split `text` at every occurrence of a mark in `marks`, keeping each mark
/// attached to the end of the piece before it. A trailing run with no mark
/// becomes the final piece.
fn split_keeping_marks<'a>(text: &'a str, marks: &[char]) -> Vec<&'a str> {
    let mut pieces = Vec::new();
    let mut start = 0;
    for (idx, ch) in text.char_indices() {
        if marks.contains(&ch) {
            let end = idx + ch.len_utf8();
            pieces.push(&text[start..end]);
            start = end;
        }
    }
    if start < text.len() {
        pieces.push(&text[start..]);
    }
    pieces
}

fn flush(segments: &mut Vec<String>, current: &mut String, current_len: &mut usize) {
    if !current.is_empty() {
        segments.push(current.trim().to_string());
        current.clear();
        *current_len = 0;
    }
}

fn char_len(s: &str) -> usize {
    s.chars().count()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_input_yields_empty_list() {
        assert!(split_text("", 80).is_empty());
        assert!(split_text("   \n\t  ", 80).is_empty());
    }

    #[test]
    fn short_input_yields_single_trimmed_segment() {
        let segments = split_text("  你好世界。  ", 80);
        assert_eq!(segments, vec!["你好世界。".to_string()]);
    }

    #[test]
    fn input_exactly_at_budget_is_not_split() {
        let text = "一".repeat(10);
        let segments = split_text(&text, 10);
        assert_eq!(segments.len(), 1);
        assert_eq!(segments[0], text);
    }

    #[test]
    fn sentences_are_packed_greedily() {
        // Each sentence is 5 chars; budget 10 fits exactly two per segment.
        let segments = split_text("一二三四。五六七八。九十甲乙。", 10);
        assert_eq!(segments, vec!["一二三四。五六七八。", "九十甲乙。"]);
    }

    #[test]
    fn overflow_sentence_starts_new_segment() {
        let segments = split_text("一二三四。五六七八九。", 6);
        assert_eq!(segments, vec!["一二三四。", "五六七八九。"]);
    }

    #[test]
    fn terminal_punctuation_stays_attached() {
        let segments = split_text("第一句！第二句？第三句；", 4);
        assert_eq!(segments, vec!["第一句！", "第二句？", "第三句；"]);
    }

    #[test]
    fn long_sentence_splits_on_secondary_marks() {
        // One 12-char sentence with clause marks, budget 6.
        let segments = split_text("甲乙丙丁戊，己庚辛壬癸。", 6);
        assert_eq!(segments, vec!["甲乙丙丁戊，", "己庚辛壬癸。"]);
    }

    #[test]
    fn oversized_fragment_is_hard_chunked_at_budget() {
        // 11 chars with no punctuation at all, budget 4: 4 + 4 + 3.
        let segments = split_text("一二三四五六七八九十甲", 4);
        assert_eq!(segments.len(), 3);
        assert_eq!(segments[0].chars().count(), 4);
        assert_eq!(segments[1].chars().count(), 4);
        assert_eq!(segments[2].chars().count(), 3);
    }

    #[test]
    fn every_segment_respects_budget() {
        let text = "今天天气很好，我们一起去公园散步吧。明天可能会下雨！记得带伞、穿外套，不要感冒了。好吗？";
        for budget in [4usize, 8, 12, 20, 40] {
            for seg in split_text(text, budget) {
                assert!(
                    seg.chars().count() <= budget,
                    "segment {seg:?} exceeds budget {budget}"
                );
            }
        }
    }

    #[test]
    fn concatenation_reproduces_input_content() {
        let text = "今天天气很好。我们去公园！然后吃饭？最后回家；再见。";
        let joined: String = split_text(text, 8).concat();
        assert_eq!(joined, text);
    }

    #[test]
    fn ascii_punctuation_is_honoured() {
        let segments = split_text("Hello there! How are you? Fine.", 14);
        assert_eq!(segments, vec!["Hello there!", "How are you?", "Fine."]);
    }

    #[test]
    fn segments_are_never_empty() {
        // Consecutive punctuation must not produce empty segments.
        let segments = split_text("。。！你好。！！", 2);
        assert!(!segments.is_empty());
        assert!(segments.iter().all(|s| !s.is_empty()));
    }

    #[test]
    fn budget_one_degenerates_to_single_chars() {
        let segments = split_text("你好吗", 1);
        assert_eq!(segments, vec!["你", "好", "吗"]);
    }
}
