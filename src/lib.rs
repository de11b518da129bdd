// ABOUTME: Main library entry point for the Larder recipe management server
// ABOUTME: Provides the REST API, household permissions, and transcription client
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Larder Project

#![deny(unsafe_code)]

//! # Larder
//!
//! A recipe-management web service: authenticated REST endpoints for
//! listing and retrieving recipes, household-scoped access control, a
//! dashboard fragment for creating/importing recipes, and an AI-backed
//! audio transcription helper for the video-to-recipe import pipeline.
//!
//! ## Architecture
//!
//! - **Models**: Domain structures for recipes, users, and households
//! - **Database**: SQLite persistence behind repository traits
//! - **Auth**: API key and session cookie authentication
//! - **Permissions**: Ownership-policy based access evaluation
//! - **Routes**: Axum HTTP wiring delegating to service layers
//! - **External**: OpenAI-compatible transcription client
//!
//! ## Example
//!
//! ```rust,no_run
//! use larder::config::environment::ServerConfig;
//!
//! # fn main() -> anyhow::Result<()> {
//! let config = ServerConfig::from_env()?;
//! println!("Larder configured for port {}", config.http_port);
//! # Ok(())
//! # }
//! ```

/// Request authentication: API keys and session cookies
pub mod auth;
/// Environment and transcription configuration
pub mod config;
/// SQLite database layer and repository traits
pub mod database;
/// Unified error handling
pub mod errors;
/// External service clients
pub mod external;
/// Structured logging setup
pub mod logging;
/// Domain data structures
pub mod models;
/// Resource-level permission evaluation
pub mod permissions;
/// Recipe retrieval service
pub mod recipe_routes;
/// Shared server resource container
pub mod resources;
/// HTTP route definitions
pub mod routes;
