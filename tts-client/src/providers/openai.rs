//! OpenAI speech API provider
//!
//! Calls the `/v1/audio/speech` endpoint, which returns raw audio bytes
//! in the requested format rather than a JSON body.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::error::{Result, TtsError};
use crate::provider::{SpeechProvider, SpeechRequest, SpeechResponse};

/// Environment variable consulted by [`OpenAiSpeechProvider::from_env`].
pub const API_KEY_ENV_VAR: &str = "OPENAI_API_KEY";

/// Provider for the OpenAI speech API
pub struct OpenAiSpeechProvider {
    model: String,
    base_url: String,
    api_key: String,
    client: Client,
}

impl OpenAiSpeechProvider {
    /// Create a new provider against a custom base URL
    pub fn new(model: &str, base_url: &str, api_key: String) -> Result<Self> {
        let client = Client::new();

        Ok(Self {
            model: model.to_string(),
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
            client,
        })
    }

    /// Create a provider against the public OpenAI endpoint
    pub fn openai(model: &str, api_key: String) -> Result<Self> {
        Self::new(model, "https://api.openai.com/v1", api_key)
    }

    /// Create a provider with the API key taken from the environment
    pub fn from_env(model: &str) -> Result<Self> {
        let api_key = std::env::var(API_KEY_ENV_VAR).map_err(|_| TtsError::MissingApiKey {
            provider: "OpenAI".to_string(),
            env_var: API_KEY_ENV_VAR.to_string(),
        })?;
        Self::openai(model, api_key)
    }
}

// OpenAI API request/response types

#[derive(Debug, Serialize)]
struct SpeechApiRequest {
    model: String,
    input: String,
    voice: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    instructions: Option<String>,
    response_format: String,
}

#[derive(Debug, Deserialize)]
struct ErrorResponse {
    error: ApiError,
}

#[derive(Debug, Deserialize)]
struct ApiError {
    message: String,
}

#[async_trait]
impl SpeechProvider for OpenAiSpeechProvider {
    async fn synthesize(&self, request: SpeechRequest) -> Result<SpeechResponse> {
        let api_request = SpeechApiRequest {
            model: self.model.clone(),
            input: request.input,
            voice: request.voice,
            instructions: request.instructions,
            response_format: request.response_format,
        };

        let url = format!("{}/audio/speech", self.base_url);

        let response = self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .json(&api_request)
            .send()
            .await
            .map_err(|e| TtsError::ApiError {
                message: format!("Request failed: {}", e),
                status_code: None,
            })?;

        let status = response.status();
        if !status.is_success() {
            let retry_after = response
                .headers()
                .get("retry-after")
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.parse().ok());

            let error_text = response.text().await.unwrap_or_default();
            let message =
                if let Ok(error_response) = serde_json::from_str::<ErrorResponse>(&error_text) {
                    error_response.error.message
                } else {
                    error_text
                };

            // 429 and 503 are mapped separately for retry logic
            if status.as_u16() == 429 {
                return Err(TtsError::RateLimited { retry_after });
            }
            if status.as_u16() == 503 {
                return Err(TtsError::ServerOverloaded { message });
            }

            return Err(TtsError::ApiError {
                message,
                status_code: Some(status.as_u16()),
            });
        }

        let audio = response
            .bytes()
            .await
            .map_err(|e| TtsError::ApiError {
                message: format!("Failed to read audio response: {}", e),
                status_code: None,
            })?
            .to_vec();

        Ok(SpeechResponse {
            audio,
            model: self.model.clone(),
        })
    }

    fn name(&self) -> &'static str {
        "OpenAI"
    }

    fn is_available(&self) -> Result<()> {
        // API key was provided in constructor
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_trailing_slash_trimmed() {
        let provider =
            OpenAiSpeechProvider::new("gpt-4o-mini-tts", "https://example.com/v1/", "sk".into())
                .unwrap();
        assert_eq!(provider.base_url, "https://example.com/v1");
    }

    #[test]
    fn test_request_serialization_omits_empty_instructions() {
        let request = SpeechApiRequest {
            model: "gpt-4o-mini-tts".to_string(),
            input: "Hello.".to_string(),
            voice: "alloy".to_string(),
            instructions: None,
            response_format: "mp3".to_string(),
        };
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["model"], "gpt-4o-mini-tts");
        assert_eq!(json["input"], "Hello.");
        assert_eq!(json["voice"], "alloy");
        assert_eq!(json["response_format"], "mp3");
        assert!(json.get("instructions").is_none());
    }

    #[test]
    fn test_request_serialization_includes_instructions() {
        let request = SpeechApiRequest {
            model: "gpt-4o-mini-tts".to_string(),
            input: "Hello.".to_string(),
            voice: "alloy".to_string(),
            instructions: Some("Speak slowly.".to_string()),
            response_format: "mp3".to_string(),
        };
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["instructions"], "Speak slowly.");
    }

    #[test]
    fn test_error_response_parsing() {
        let body = r#"{"error": {"message": "Invalid voice", "type": "invalid_request_error"}}"#;
        let parsed: ErrorResponse = serde_json::from_str(body).unwrap();
        assert_eq!(parsed.error.message, "Invalid voice");
    }
}
