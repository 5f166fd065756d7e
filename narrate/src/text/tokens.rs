//! Token counting using the cl100k_base BPE.
//!
//! Segmentation planning and per-part diagnostics must use the same
//! tokenization scheme; a mismatched counter could produce chunks that
//! overflow the synthesis service's real limit.

use std::sync::OnceLock;
use tiktoken_rs::CoreBPE;

/// Global encoder instance (lazy initialization).
static ENCODER: OnceLock<CoreBPE> = OnceLock::new();

/// Get or initialize the BPE encoder.
fn encoder() -> &'static CoreBPE {
    ENCODER.get_or_init(|| {
        tiktoken_rs::cl100k_base().expect("cl100k_base encoder should initialize")
    })
}

/// Count tokens in text. Deterministic, no side effects.
pub fn count_tokens(text: &str) -> usize {
    encoder().encode_ordinary(text).len()
}
