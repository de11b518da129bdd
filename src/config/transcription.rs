// ABOUTME: Transcription provider configuration with key and endpoint fallback rules
// ABOUTME: Resolves video-import and AI settings into one explicit transcription config
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Larder Project

//! Transcription configuration.
//!
//! Video-import settings and general AI settings are loaded independently
//! (and concurrently by callers), then resolved into a single
//! [`TranscriptionConfig`] that is passed explicitly into the transcription
//! client. Resolution fails fast when video import is disabled, the provider
//! is disabled, or no API key can be found.

use crate::errors::{AppError, AppResult};
use serde::{Deserialize, Serialize};
use std::env;

/// Default OpenAI-compatible transcription endpoint
pub const DEFAULT_TRANSCRIPTION_ENDPOINT: &str = "https://api.openai.com/v1/audio/transcriptions";

/// Default transcription model
pub const DEFAULT_TRANSCRIPTION_MODEL: &str = "whisper-1";

/// Supported transcription providers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum TranscriptionProvider {
    #[serde(rename = "openai")]
    OpenAi,
    /// Any OpenAI-compatible API (custom endpoint)
    #[serde(rename = "generic-openai")]
    GenericOpenAi,
    #[default]
    #[serde(rename = "disabled")]
    Disabled,
}

impl TranscriptionProvider {
    /// Parse from a configuration value, defaulting to `disabled`
    #[must_use]
    pub fn from_str_or_default(s: &str) -> Self {
        match s {
            "openai" => Self::OpenAi,
            "generic-openai" => Self::GenericOpenAi,
            _ => Self::Disabled,
        }
    }
}

/// Video-import settings, including the transcription provider selection
#[derive(Debug, Clone, Default)]
pub struct VideoConfig {
    /// Whether video-to-recipe import is enabled at all
    pub enabled: bool,
    pub provider: TranscriptionProvider,
    /// Transcription-specific API key, preferred over the general AI key
    pub api_key: Option<String>,
    /// Custom endpoint, honored only for the `generic-openai` provider
    pub endpoint: Option<String>,
    /// Model override, `whisper-1` when unset
    pub model: Option<String>,
}

impl VideoConfig {
    /// Load from environment variables, reading a key file when
    /// `TRANSCRIPTION_API_KEY_FILE` is set
    pub async fn load() -> Self {
        let api_key = read_secret("TRANSCRIPTION_API_KEY", "TRANSCRIPTION_API_KEY_FILE").await;

        Self {
            enabled: env::var("VIDEO_IMPORT_ENABLED")
                .map(|v| v == "true" || v == "1")
                .unwrap_or(false),
            provider: TranscriptionProvider::from_str_or_default(
                &env::var("TRANSCRIPTION_PROVIDER").unwrap_or_default(),
            ),
            api_key,
            endpoint: env::var("TRANSCRIPTION_ENDPOINT").ok(),
            model: env::var("TRANSCRIPTION_MODEL").ok(),
        }
    }
}

/// General AI settings used as a fallback for transcription credentials
#[derive(Debug, Clone, Default)]
pub struct AiConfig {
    pub api_key: Option<String>,
    pub endpoint: Option<String>,
}

impl AiConfig {
    /// Load from environment variables, reading a key file when
    /// `AI_API_KEY_FILE` is set
    pub async fn load() -> Self {
        Self {
            api_key: read_secret("AI_API_KEY", "AI_API_KEY_FILE").await,
            endpoint: env::var("AI_ENDPOINT").ok(),
        }
    }
}

async fn read_secret(var: &str, file_var: &str) -> Option<String> {
    if let Ok(value) = env::var(var) {
        if !value.is_empty() {
            return Some(value);
        }
    }
    if let Ok(path) = env::var(file_var) {
        if let Ok(contents) = tokio::fs::read_to_string(&path).await {
            let trimmed = contents.trim();
            if !trimmed.is_empty() {
                return Some(trimmed.to_owned());
            }
        }
    }
    None
}

/// Fully resolved transcription settings, ready to hand to the client
#[derive(Debug, Clone)]
pub struct TranscriptionConfig {
    pub api_key: String,
    pub endpoint: String,
    pub model: String,
}

impl TranscriptionConfig {
    /// Resolve video-import and AI settings into a usable configuration.
    ///
    /// # Errors
    /// Fails when video import is disabled, the provider is `disabled`,
    /// or neither a transcription key nor a general AI key is configured.
    pub fn resolve(video: &VideoConfig, ai: &AiConfig) -> AppResult<Self> {
        if !video.enabled {
            return Err(AppError::config(
                "Video parsing is not enabled. Enable it in admin settings.",
            ));
        }

        if video.provider == TranscriptionProvider::Disabled {
            return Err(AppError::config(
                "Transcription is disabled. Configure a transcription provider in admin settings.",
            ));
        }

        // Prefer the transcription-specific key, fall back to the general AI key
        let api_key = video
            .api_key
            .clone()
            .or_else(|| ai.api_key.clone())
            .ok_or_else(|| {
                AppError::config("No API key configured for transcription. Set it in admin settings.")
            })?;

        // Custom endpoints apply only to the generic provider
        let endpoint = match video.provider {
            TranscriptionProvider::GenericOpenAi => video
                .endpoint
                .clone()
                .or_else(|| ai.endpoint.clone())
                .unwrap_or_else(|| DEFAULT_TRANSCRIPTION_ENDPOINT.to_owned()),
            _ => DEFAULT_TRANSCRIPTION_ENDPOINT.to_owned(),
        };

        let model = video
            .model
            .clone()
            .unwrap_or_else(|| DEFAULT_TRANSCRIPTION_MODEL.to_owned());

        Ok(Self {
            api_key,
            endpoint,
            model,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::ErrorCode;

    fn enabled_video() -> VideoConfig {
        VideoConfig {
            enabled: true,
            provider: TranscriptionProvider::OpenAi,
            api_key: Some("sk-test".into()),
            endpoint: None,
            model: None,
        }
    }

    #[test]
    fn test_resolve_fails_when_disabled() {
        let video = VideoConfig::default();
        let err = TranscriptionConfig::resolve(&video, &AiConfig::default()).unwrap_err();
        assert_eq!(err.code, ErrorCode::ConfigError);
        assert!(err.message.contains("not enabled"));
    }

    #[test]
    fn test_resolve_fails_when_provider_disabled() {
        let video = VideoConfig {
            enabled: true,
            ..VideoConfig::default()
        };
        let err = TranscriptionConfig::resolve(&video, &AiConfig::default()).unwrap_err();
        assert!(err.message.contains("Transcription is disabled"));
    }

    #[test]
    fn test_resolve_fails_without_api_key() {
        let video = VideoConfig {
            api_key: None,
            ..enabled_video()
        };
        let err = TranscriptionConfig::resolve(&video, &AiConfig::default()).unwrap_err();
        assert!(err.message.contains("No API key configured"));
    }

    #[test]
    fn test_api_key_falls_back_to_ai_config() {
        let video = VideoConfig {
            api_key: None,
            ..enabled_video()
        };
        let ai = AiConfig {
            api_key: Some("sk-general".into()),
            endpoint: None,
        };
        let config = TranscriptionConfig::resolve(&video, &ai).unwrap();
        assert_eq!(config.api_key, "sk-general");
    }

    #[test]
    fn test_custom_endpoint_only_for_generic_provider() {
        let mut video = enabled_video();
        video.endpoint = Some("https://local.test/v1/audio/transcriptions".into());

        // openai provider ignores the override
        let config = TranscriptionConfig::resolve(&video, &AiConfig::default()).unwrap();
        assert_eq!(config.endpoint, DEFAULT_TRANSCRIPTION_ENDPOINT);

        // generic-openai honors it
        video.provider = TranscriptionProvider::GenericOpenAi;
        let config = TranscriptionConfig::resolve(&video, &AiConfig::default()).unwrap();
        assert_eq!(config.endpoint, "https://local.test/v1/audio/transcriptions");
    }

    #[test]
    fn test_generic_endpoint_falls_back_to_ai_config() {
        let mut video = enabled_video();
        video.provider = TranscriptionProvider::GenericOpenAi;
        let ai = AiConfig {
            api_key: None,
            endpoint: Some("https://fallback.test/v1".into()),
        };
        let config = TranscriptionConfig::resolve(&video, &ai).unwrap();
        assert_eq!(config.endpoint, "https://fallback.test/v1");
    }

    #[test]
    fn test_model_defaults_to_whisper() {
        let config =
            TranscriptionConfig::resolve(&enabled_video(), &AiConfig::default()).unwrap();
        assert_eq!(config.model, "whisper-1");
    }
}
