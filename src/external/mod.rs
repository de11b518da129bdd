// ABOUTME: Clients for external third-party services
// ABOUTME: Currently the OpenAI-compatible audio transcription API
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Larder Project

/// OpenAI-compatible audio transcription client
pub mod transcription;
