//! Text processing module: token counting and budget-aware segmentation.

pub mod segmenter;
pub mod tokens;

pub use segmenter::segment;

/// A chunk of document text ready for one synthesis call.
#[derive(Debug, Clone)]
pub struct TextChunk {
    /// Position in the document, 0-based (filenames use 1-based numbering)
    pub index: usize,
    /// The text content
    pub text: String,
}

impl TextChunk {
    /// Create a new text chunk.
    pub fn new(index: usize, text: String) -> Self {
        Self { index, text }
    }

    /// Token cost of this chunk, under the same scheme the segmenter plans with.
    pub fn token_count(&self) -> usize {
        tokens::count_tokens(&self.text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_chunk_creation() {
        let chunk = TextChunk::new(1, "Hello world".to_string());
        assert_eq!(chunk.index, 1);
        assert_eq!(chunk.text, "Hello world");
    }

    #[test]
    fn test_token_count_matches_counter() {
        let chunk = TextChunk::new(0, "Hello world".to_string());
        assert_eq!(chunk.token_count(), tokens::count_tokens("Hello world"));
    }
}
