// ABOUTME: Audio transcription client for OpenAI-compatible speech-to-text APIs
// ABOUTME: Uploads audio via multipart, normalizes response shapes, translates vendor errors
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Larder Project

//! # Audio Transcription Client
//!
//! Thin client for OpenAI-compatible `audio/transcriptions` endpoints,
//! used by the video-to-recipe import pipeline. Configuration is resolved
//! by the caller (see [`crate::config::transcription`]) and passed in
//! explicitly so this function stays pure with respect to global state.
//!
//! The response shape varies across compatible servers: a plain string,
//! an object with a `text` field, or an object with a `segments` array.
//! All three normalize to a single transcript string.

use crate::config::transcription::TranscriptionConfig;
use crate::errors::{AppError, AppResult, ErrorCode};
use serde_json::Value;
use std::path::Path;

/// Transcribe an audio file, returning the normalized transcript.
///
/// Forces English transcription; Whisper translates other languages.
///
/// # Errors
/// - `ResourceNotFound` when the audio file does not exist
/// - `ExternalRateLimited` on vendor 429
/// - `ExternalAuthFailed` on vendor 401/403
/// - `ExternalServiceError` for other vendor failures
/// - `InvalidInput` when the response carries no usable text
pub async fn transcribe_audio(
    client: &reqwest::Client,
    config: &TranscriptionConfig,
    audio_path: &Path,
) -> AppResult<String> {
    let audio_bytes = tokio::fs::read(audio_path).await.map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            AppError::not_found("Audio file not found")
        } else {
            AppError::internal(format!("Failed to read audio file: {e}"))
        }
    })?;

    let file_name = audio_path
        .file_name()
        .map_or_else(|| "audio".to_owned(), |n| n.to_string_lossy().into_owned());

    let file_part = reqwest::multipart::Part::bytes(audio_bytes)
        .file_name(file_name)
        .mime_str("application/octet-stream")
        .map_err(|e| AppError::internal(format!("Failed to build upload part: {e}")))?;

    let form = reqwest::multipart::Form::new()
        .part("file", file_part)
        .text("model", config.model.clone())
        .text("language", "en")
        .text("response_format", "json");

    let response = client
        .post(&config.endpoint)
        .header(
            http::header::AUTHORIZATION,
            format!("Bearer {}", config.api_key),
        )
        .multipart(form)
        .send()
        .await
        .map_err(|e| {
            AppError::new(
                ErrorCode::ExternalServiceError,
                format!("Failed to transcribe audio: {e}"),
            )
        })?;

    let status = response.status();
    let body = response
        .text()
        .await
        .unwrap_or_else(|_| "Unknown error".to_owned());

    if !status.is_success() {
        tracing::error!(status = %status, "Transcription request failed");
        return Err(translate_vendor_error(status.as_u16(), &body));
    }

    tracing::debug!(bytes = body.len(), "Transcription response received");

    let transcript = match serde_json::from_str::<Value>(&body) {
        Ok(value) => normalize_transcript(&value)?,
        // Some local transcribers return plain text
        Err(_) => body.trim().to_owned(),
    };

    if transcript.is_empty() {
        return Err(AppError::invalid_input("Transcription returned empty text"));
    }

    Ok(transcript)
}

/// Map a vendor error status to a domain-specific error
fn translate_vendor_error(status: u16, body: &str) -> AppError {
    match status {
        429 => AppError::new(
            ErrorCode::ExternalRateLimited,
            "Rate limit exceeded on transcription service. Please try again later.",
        ),
        401 | 403 => AppError::new(
            ErrorCode::ExternalAuthFailed,
            "Invalid API key for transcription service. Check your API key in admin settings.",
        ),
        _ => AppError::new(
            ErrorCode::ExternalServiceError,
            format!("Failed to transcribe audio: {body}"),
        ),
    }
}

/// Normalize the vendor response into a transcript string.
///
/// Accepts a bare JSON string, `{"text": ...}`, or
/// `{"segments": [{"text": ...}, ...]}` whose segment texts are trimmed
/// and joined with single spaces.
fn normalize_transcript(value: &Value) -> AppResult<String> {
    match value {
        Value::String(text) => Ok(text.trim().to_owned()),
        Value::Object(fields) => {
            if let Some(text) = fields.get("text").and_then(Value::as_str) {
                return Ok(text.trim().to_owned());
            }

            if let Some(segments) = fields.get("segments").and_then(Value::as_array) {
                let joined = segments
                    .iter()
                    .filter_map(|s| s.get("text").and_then(Value::as_str))
                    .map(str::trim)
                    .filter(|t| !t.is_empty())
                    .collect::<Vec<_>>()
                    .join(" ");
                return Ok(joined);
            }

            Err(AppError::invalid_input(
                "Transcription response missing text content",
            ))
        }
        _ => Err(AppError::invalid_input(
            "Invalid transcription response format",
        )),
    }
}
