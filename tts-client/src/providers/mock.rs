//! Mock speech provider for testing
//!
//! Provides a configurable mock provider that can simulate various behaviors
//! like failures, retries, and successful synthesis.

use async_trait::async_trait;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::error::{Result, TtsError};
use crate::provider::{SpeechProvider, SpeechRequest, SpeechResponse};

/// A mock provider for testing retry and cleanup behavior
pub struct MockProvider {
    /// Number of times to fail before succeeding (0 = always succeed)
    fail_count: AtomicUsize,
    /// Current call count
    call_count: AtomicUsize,
    /// Error to return on failure (None = always succeed)
    fail_with: Mutex<Option<TtsError>>,
    /// Audio bytes to return on success
    audio: Vec<u8>,
    /// When set, successful responses echo the request input as audio
    echo_input: bool,
    /// Inputs seen, in call order
    inputs: Mutex<Vec<String>>,
    /// Provider name for display
    name: &'static str,
}

impl MockProvider {
    /// Create a provider that fails `n` times with the given error, then succeeds
    pub fn fails_then_succeeds(n: usize, error: TtsError, audio: &[u8]) -> Self {
        Self {
            fail_count: AtomicUsize::new(n),
            call_count: AtomicUsize::new(0),
            fail_with: Mutex::new(Some(error)),
            audio: audio.to_vec(),
            echo_input: false,
            inputs: Mutex::new(Vec::new()),
            name: "mock",
        }
    }

    /// Create a provider that always fails with the given error
    pub fn always_fails(error: TtsError) -> Self {
        Self {
            fail_count: AtomicUsize::new(usize::MAX),
            call_count: AtomicUsize::new(0),
            fail_with: Mutex::new(Some(error)),
            audio: Vec::new(),
            echo_input: false,
            inputs: Mutex::new(Vec::new()),
            name: "mock",
        }
    }

    /// Create a provider that always succeeds with the given audio
    pub fn always_succeeds(audio: &[u8]) -> Self {
        Self {
            fail_count: AtomicUsize::new(0),
            call_count: AtomicUsize::new(0),
            fail_with: Mutex::new(None),
            audio: audio.to_vec(),
            echo_input: false,
            inputs: Mutex::new(Vec::new()),
            name: "mock",
        }
    }

    /// Create a provider whose "audio" is the request input's UTF-8 bytes,
    /// so tests can assert on ordering in merged output
    pub fn echoes_input() -> Self {
        Self {
            fail_count: AtomicUsize::new(0),
            call_count: AtomicUsize::new(0),
            fail_with: Mutex::new(None),
            audio: Vec::new(),
            echo_input: true,
            inputs: Mutex::new(Vec::new()),
            name: "mock",
        }
    }

    /// Get the number of times synthesize() was called
    pub fn call_count(&self) -> usize {
        self.call_count.load(Ordering::SeqCst)
    }

    /// Get the inputs seen so far, in call order
    pub fn inputs(&self) -> Vec<String> {
        self.inputs.lock().unwrap().clone()
    }

    /// Set a custom provider name
    pub fn with_name(mut self, name: &'static str) -> Self {
        self.name = name;
        self
    }
}

#[async_trait]
impl SpeechProvider for MockProvider {
    async fn synthesize(&self, request: SpeechRequest) -> Result<SpeechResponse> {
        let call_num = self.call_count.fetch_add(1, Ordering::SeqCst);
        self.inputs.lock().unwrap().push(request.input.clone());

        let fail_count = self.fail_count.load(Ordering::SeqCst);
        if call_num < fail_count {
            // Should fail on this call
            let error = self.fail_with.lock().unwrap();
            if let Some(err) = error.as_ref() {
                return Err(clone_error(err));
            }
        }

        let audio = if self.echo_input {
            request.input.into_bytes()
        } else {
            self.audio.clone()
        };

        Ok(SpeechResponse {
            audio,
            model: "mock-model".to_string(),
        })
    }

    fn name(&self) -> &'static str {
        self.name
    }

    fn is_available(&self) -> Result<()> {
        Ok(())
    }
}

/// Clone a TtsError (needed because TtsError doesn't implement Clone)
fn clone_error(err: &TtsError) -> TtsError {
    match err {
        TtsError::MissingApiKey { provider, env_var } => TtsError::MissingApiKey {
            provider: provider.clone(),
            env_var: env_var.clone(),
        },
        TtsError::RateLimited { retry_after } => TtsError::RateLimited {
            retry_after: *retry_after,
        },
        TtsError::ServerOverloaded { message } => TtsError::ServerOverloaded {
            message: message.clone(),
        },
        TtsError::ApiError {
            message,
            status_code,
        } => TtsError::ApiError {
            message: message.clone(),
            status_code: *status_code,
        },
        TtsError::ConfigError(s) => TtsError::ConfigError(s.clone()),
        // Io errors can't be cloned; substitute a generic error
        TtsError::Io(_) => TtsError::ConfigError("IO error (mock)".to_string()),
    }
}
