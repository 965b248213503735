//! ElevenLabs text-to-speech provider
//!
//! Calls `POST {base}/v1/text-to-speech/{voice_id}` and returns the MP3
//! body. Text is shortened with [`TextBudget`] first to bound credit use.

use async_trait::async_trait;
use serde::Serialize;
use voice_relay_config::VoiceConfig;
use voice_relay_core::{AudioBuffer, AudioEncoding, ProviderError, SpeechProvider};

use super::budget::TextBudget;
use crate::PipelineError;

/// ElevenLabs provider configuration
#[derive(Debug, Clone)]
pub struct ElevenLabsConfig {
    pub api_key: String,
    /// API base URL, without a trailing slash
    pub base_url: String,
    pub model_id: String,
    pub stability: f32,
    pub similarity_boost: f32,
    pub budget: TextBudget,
}

impl ElevenLabsConfig {
    /// Build from settings, or `None` when no API key is configured
    pub fn from_settings(voice: &VoiceConfig) -> Option<Self> {
        let api_key = voice.api_key()?;
        Some(Self {
            api_key: api_key.to_string(),
            base_url: voice.api_base_url.trim_end_matches('/').to_string(),
            model_id: voice.model_id.clone(),
            stability: voice.stability,
            similarity_boost: voice.similarity_boost,
            budget: TextBudget::from(&voice.truncation),
        })
    }
}

#[derive(Debug, Serialize)]
struct SynthesisRequest<'a> {
    text: &'a str,
    model_id: &'a str,
    voice_settings: VoiceSettings,
}

#[derive(Debug, Serialize)]
struct VoiceSettings {
    stability: f32,
    similarity_boost: f32,
}

/// ElevenLabs REST client
pub struct ElevenLabsProvider {
    config: ElevenLabsConfig,
    client: reqwest::Client,
}

impl ElevenLabsProvider {
    /// Create a new provider
    pub fn new(config: ElevenLabsConfig) -> Result<Self, PipelineError> {
        if !config.base_url.starts_with("http://") && !config.base_url.starts_with("https://") {
            return Err(PipelineError::Config(format!(
                "ElevenLabs base URL must be http(s): {}",
                config.base_url
            )));
        }

        let client = reqwest::Client::builder()
            .build()
            .map_err(|e| PipelineError::Client(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { config, client })
    }

    fn endpoint(&self, voice_id: &str) -> String {
        format!("{}/v1/text-to-speech/{}", self.config.base_url, voice_id)
    }
}

#[async_trait]
impl SpeechProvider for ElevenLabsProvider {
    async fn synthesize(&self, text: &str, voice_id: &str) -> Result<AudioBuffer, ProviderError> {
        if self.config.api_key.is_empty() {
            return Err(ProviderError::NotConfigured);
        }

        let shortened = self.config.budget.shorten(text);
        tracing::info!(
            model = %self.config.model_id,
            voice_id,
            original_chars = text.chars().count(),
            sent_chars = shortened.chars().count(),
            "Requesting speech from ElevenLabs"
        );

        let body = SynthesisRequest {
            text: &shortened,
            model_id: &self.config.model_id,
            voice_settings: VoiceSettings {
                stability: self.config.stability,
                similarity_boost: self.config.similarity_boost,
            },
        };

        let response = self
            .client
            .post(self.endpoint(voice_id))
            .header("Accept", AudioEncoding::Mp3.mime_type())
            .header("xi-api-key", &self.config.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| ProviderError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ProviderError::Api {
                status: status.as_u16(),
                body,
            });
        }

        let audio = response
            .bytes()
            .await
            .map_err(|e| ProviderError::Transport(format!("Failed to read audio: {}", e)))?;

        tracing::debug!(bytes = audio.len(), "Received speech audio");
        Ok(AudioBuffer::mp3(audio.to_vec()))
    }

    fn name(&self) -> &str {
        "elevenlabs"
    }

    fn model(&self) -> &str {
        &self.config.model_id
    }
}
