use async_trait::async_trait;

use crate::error::Result;

/// Request to send to a speech-synthesis provider
#[derive(Debug, Clone)]
pub struct SpeechRequest {
    /// Text to synthesize
    pub input: String,
    /// Named voice to synthesize with
    pub voice: String,
    /// Style instructions controlling tone and pacing
    pub instructions: Option<String>,
    /// Desired audio container format (e.g. "mp3")
    pub response_format: String,
}

/// Response from a speech-synthesis provider
#[derive(Debug, Clone)]
pub struct SpeechResponse {
    /// Raw audio bytes in the requested format
    pub audio: Vec<u8>,
    pub model: String,
}

/// Trait for speech-synthesis providers
#[async_trait]
pub trait SpeechProvider: Send + Sync {
    /// Synthesize one text into audio bytes
    async fn synthesize(&self, request: SpeechRequest) -> Result<SpeechResponse>;

    /// Get the provider name for display
    fn name(&self) -> &'static str;

    /// Check if the provider is available (API key set, etc.)
    fn is_available(&self) -> Result<()>;
}
