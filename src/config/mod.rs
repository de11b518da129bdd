// ABOUTME: Configuration module organization for Larder
// ABOUTME: Splits deployment environment settings from transcription provider settings
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Larder Project

/// Environment-variable based server configuration
pub mod environment;
/// Transcription provider configuration and resolution
pub mod transcription;
