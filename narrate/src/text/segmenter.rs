//! Splitting document text into token-budget-sized chunks.

use super::TextChunk;
use super::tokens::count_tokens;

/// Sentence-final markers. The marker stays with the sentence it ends, so
/// split points fall immediately after each of these characters.
const SENTENCE_MARKERS: &[char] = &['。', '．', '！', '？', '.', '!', '?', '\n'];

/// Split text into sentence units at sentence-final markers.
fn split_sentences(text: &str) -> Vec<&str> {
    let mut sentences = Vec::new();
    let mut start = 0;

    for (i, c) in text.char_indices() {
        if SENTENCE_MARKERS.contains(&c) {
            let end = i + c.len_utf8();
            sentences.push(&text[start..end]);
            start = end;
        }
    }

    if start < text.len() {
        sentences.push(&text[start..]);
    }

    sentences
}

/// Split text into ordered chunks whose token count stays within
/// `token_budget`, preferring sentence boundaries.
///
/// Sentences are accumulated greedily: before appending the next sentence,
/// the tentative concatenation is measured, and on overflow the current
/// buffer is flushed (trimmed) and a new buffer starts with the overflowing
/// sentence. Sentences are never split further, so a single sentence whose
/// own token count exceeds the budget becomes a chunk by itself.
pub fn segment(text: &str, token_budget: usize) -> Vec<TextChunk> {
    let mut chunks: Vec<String> = Vec::new();
    let mut current = String::new();

    for sentence in split_sentences(text) {
        if sentence.trim().is_empty() {
            continue;
        }

        let tentative = format!("{current}{sentence}");
        if count_tokens(&tentative) > token_budget {
            if !current.trim().is_empty() {
                chunks.push(current.trim().to_string());
            }
            current = sentence.to_string();
        } else {
            current = tentative;
        }
    }

    if !current.trim().is_empty() {
        chunks.push(current.trim().to_string());
    }

    chunks
        .into_iter()
        .enumerate()
        .map(|(index, text)| TextChunk::new(index, text))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    /// Strip all whitespace, for comparing chunk coverage against the source.
    fn strip_whitespace(s: &str) -> String {
        s.chars().filter(|c| !c.is_whitespace()).collect()
    }

    #[test]
    fn test_split_sentences_keeps_marker_with_sentence() {
        let sentences = split_sentences("Hello. World.");
        assert_eq!(sentences, vec!["Hello.", " World."]);
    }

    #[test]
    fn test_split_sentences_japanese_markers() {
        let sentences = split_sentences("こんにちは。元気ですか？はい！");
        assert_eq!(sentences, vec!["こんにちは。", "元気ですか？", "はい！"]);
    }

    #[test]
    fn test_split_sentences_newlines() {
        let sentences = split_sentences("first line\nsecond line");
        assert_eq!(sentences, vec!["first line\n", "second line"]);
    }

    #[test]
    fn test_split_sentences_trailing_text_without_marker() {
        let sentences = split_sentences("Complete sentence. Trailing fragment");
        assert_eq!(sentences, vec!["Complete sentence.", " Trailing fragment"]);
    }

    #[test]
    fn test_short_text_yields_one_chunk() {
        let chunks = segment("Hello. World.", 1600);
        assert_eq!(chunks.len(), 1);
        assert_eq!(chunks[0].text, "Hello. World.");
        assert_eq!(chunks[0].index, 0);
    }

    #[test]
    fn test_empty_text_yields_no_chunks() {
        assert!(segment("", 1600).is_empty());
    }

    #[test]
    fn test_whitespace_only_text_yields_no_chunks() {
        assert!(segment("   \n\n   ", 1600).is_empty());
    }

    #[test]
    fn test_splits_at_sentence_boundary_on_overflow() {
        let first = "The first sentence has a number of words in it.";
        let second = " The second sentence also has words.";
        let text = format!("{first}{second}");

        // Budget fits the first sentence exactly, so appending the second
        // must overflow and open a new chunk.
        let budget = count_tokens(first);
        let chunks = segment(&text, budget);

        assert_eq!(chunks.len(), 2);
        assert_eq!(chunks[0].text, first);
        assert_eq!(chunks[1].text, second.trim());
    }

    #[test]
    fn test_budget_respected_for_multi_sentence_chunks() {
        let text = "One two three. Four five six. Seven eight nine. Ten eleven twelve.";
        let budget = 10;
        for chunk in segment(text, budget) {
            // Every sentence here is well under the budget, so no chunk
            // may exceed it.
            assert!(
                chunk.token_count() <= budget,
                "chunk over budget: {:?}",
                chunk.text
            );
        }
    }

    #[test]
    fn test_oversized_sentence_passes_through_unsplit() {
        let oversized = "an unbroken run of words that goes on and on without any sentence final punctuation at all until the very end.";
        let chunks = segment(oversized, 3);

        assert_eq!(chunks.len(), 1);
        assert_eq!(chunks[0].text, oversized);
        assert!(chunks[0].token_count() > 3);
    }

    #[test]
    fn test_oversized_sentence_between_normal_sentences() {
        let before = "Short one.";
        let oversized = " a very long sentence with far too many words to ever fit inside the configured token budget for a single chunk.";
        let after = " Short two.";
        let text = format!("{before}{oversized}{after}");

        let budget = count_tokens(before) + 1;
        let chunks = segment(&text, budget);

        assert_eq!(chunks.len(), 3);
        assert_eq!(chunks[0].text, before);
        assert_eq!(chunks[1].text, oversized.trim());
        assert_eq!(chunks[2].text, after.trim());
    }

    #[test]
    fn test_ordering_is_stable() {
        let text = "Alpha one. Bravo two. Charlie three. Delta four. Echo five.";
        let chunks = segment(text, 8);
        assert!(chunks.len() > 1);
        for (i, chunk) in chunks.iter().enumerate() {
            assert_eq!(chunk.index, i);
        }
        let positions: Vec<usize> = ["Alpha", "Bravo", "Charlie", "Delta", "Echo"]
            .iter()
            .map(|word| {
                chunks
                    .iter()
                    .position(|c| c.text.contains(word))
                    .expect("word should appear in some chunk")
            })
            .collect();
        let mut sorted = positions.clone();
        sorted.sort_unstable();
        assert_eq!(positions, sorted);
    }

    #[test]
    fn test_coverage_of_japanese_text() {
        let text = "今日は良い天気です。散歩に行きましょう！公園で会いませんか？";
        let chunks = segment(text, 10);
        let merged: String = chunks.iter().map(|c| c.text.as_str()).collect();
        assert_eq!(strip_whitespace(&merged), strip_whitespace(text));
    }

    proptest! {
        #[test]
        fn coverage_preserved_for_any_budget(
            sentences in prop::collection::vec("[a-z]{1,12}( [a-z]{1,12}){0,6}", 1..16),
            budget in 1usize..200,
        ) {
            let text: String = sentences
                .iter()
                .map(|s| format!("{s}. "))
                .collect();
            let chunks = segment(&text, budget);
            let merged: String = chunks.iter().map(|c| c.text.as_str()).collect();
            prop_assert_eq!(strip_whitespace(&merged), strip_whitespace(&text));
        }
    }
}
