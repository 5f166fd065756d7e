//! Chunk synthesis with bounded retry and linear backoff.

use crate::config::NarrateConfig;
use anyhow::Result;
use async_trait::async_trait;
use std::time::Duration;
use tts_client::{SpeechProvider, SpeechRequest};

/// Sleep capability, injectable so tests can observe attempt counts and
/// backoff values without waiting on the wall clock.
#[async_trait]
pub trait Delay: Send + Sync {
    async fn wait(&self, duration: Duration);
}

/// Tokio-backed delay used outside tests.
pub struct TokioDelay;

#[async_trait]
impl Delay for TokioDelay {
    async fn wait(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}

/// Turns one text chunk into audio bytes, retrying transient failures.
pub struct Synthesizer {
    provider: Box<dyn SpeechProvider>,
    delay: Box<dyn Delay>,
    voice: String,
    instructions: String,
    response_format: String,
    max_retries: u32,
    retry_delay: Duration,
}

impl Synthesizer {
    pub fn new(provider: Box<dyn SpeechProvider>, config: &NarrateConfig) -> Self {
        Self {
            provider,
            delay: Box::new(TokioDelay),
            voice: config.voice.clone(),
            instructions: config.instructions.clone(),
            response_format: config.response_format.clone(),
            max_retries: config.max_retries.max(1),
            retry_delay: config.retry_delay(),
        }
    }

    /// Replace the sleep implementation.
    pub fn with_delay(mut self, delay: Box<dyn Delay>) -> Self {
        self.delay = delay;
        self
    }

    /// Synthesize one chunk, making up to `max_retries` attempts. Between
    /// attempts the wait grows linearly: `retry_delay × attempt_number`,
    /// numbering attempts from 1. The last error is propagated, never
    /// swallowed.
    pub async fn synthesize_with_retry(&self, text: &str) -> Result<Vec<u8>> {
        let mut last_error = None;

        for attempt in 1..=self.max_retries {
            let request = SpeechRequest {
                input: text.to_string(),
                voice: self.voice.clone(),
                instructions: Some(self.instructions.clone()),
                response_format: self.response_format.clone(),
            };

            match self.provider.synthesize(request).await {
                Ok(response) => return Ok(response.audio),
                Err(e) => {
                    if attempt < self.max_retries {
                        let wait = self.retry_delay * attempt;
                        eprintln!(
                            "API call failed (attempt {}/{}): {}",
                            attempt, self.max_retries, e
                        );
                        eprintln!("Retrying in {} seconds...", wait.as_secs());
                        self.delay.wait(wait).await;
                    } else {
                        eprintln!("API call failed {} times", self.max_retries);
                    }
                    last_error = Some(e);
                }
            }
        }

        Err(last_error
            .map(anyhow::Error::from)
            .unwrap_or_else(|| anyhow::anyhow!("All retry attempts failed")))
    }
}
