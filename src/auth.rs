// ABOUTME: Request authentication via API keys and session cookies
// ABOUTME: Defines the Authenticator seam plus API key generation, hashing, and validation
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Larder Project

//! # Authentication
//!
//! Requests authenticate with either an `x-api-key` header (mobile apps,
//! shortcuts, programmatic access) or a session cookie. The endpoint only
//! sees the [`Authenticator`] trait, so tests substitute fakes.

use crate::database::Database;
use crate::errors::{AppError, AppResult};
use crate::models::ApiKeyData;
use async_trait::async_trait;
use http::HeaderMap;
use rand::distributions::Alphanumeric;
use rand::{thread_rng, Rng};
use sha2::{Digest, Sha256};
use std::sync::Arc;
use uuid::Uuid;

/// Header carrying API key credentials
pub const API_KEY_HEADER: &str = "x-api-key";

/// Session cookie name
pub const SESSION_COOKIE: &str = "larder_session";

/// Prefix for issued API keys
const KEY_PREFIX: &str = "lk_live_";

/// Length of the random portion of an API key
const KEY_RANDOM_LEN: usize = 32;

/// Authenticated caller identity
#[derive(Debug, Clone, Copy)]
pub struct AuthResult {
    pub user_id: Uuid,
    pub is_server_admin: bool,
}

/// Session/credential authentication seam
#[async_trait]
pub trait Authenticator: Send + Sync {
    /// Resolve request headers to an authenticated user.
    ///
    /// # Errors
    /// Returns a 401-mapped error when no credential resolves to a user
    async fn authenticate(&self, headers: &HeaderMap) -> AppResult<AuthResult>;
}

/// API key generation and validation
#[derive(Debug, Clone, Copy, Default)]
pub struct ApiKeyManager;

impl ApiKeyManager {
    /// Create a new API key manager
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Generate a new API key. The full key is returned exactly once;
    /// only its hash is stored.
    #[must_use]
    pub fn generate_api_key(&self) -> ApiKeyData {
        let random: String = thread_rng()
            .sample_iter(&Alphanumeric)
            .take(KEY_RANDOM_LEN)
            .map(char::from)
            .collect();

        let full_key = format!("{KEY_PREFIX}{random}");

        // First 12 characters identify the key in settings UIs
        let key_prefix = full_key[..12].to_owned();
        let key_hash = Self::hash_key(&full_key);

        ApiKeyData {
            full_key,
            key_prefix,
            key_hash,
        }
    }

    /// Validate an API key's format before any lookup
    ///
    /// # Errors
    /// Returns an error when the key has the wrong prefix or length
    pub fn validate_key_format(&self, api_key: &str) -> AppResult<()> {
        if !api_key.starts_with(KEY_PREFIX) {
            return Err(AppError::auth_invalid("Invalid API key format"));
        }
        if api_key.len() != KEY_PREFIX.len() + KEY_RANDOM_LEN {
            return Err(AppError::auth_invalid("Invalid API key length"));
        }
        Ok(())
    }

    /// SHA-256 hash of the full key, hex-encoded
    #[must_use]
    pub fn hash_key(api_key: &str) -> String {
        let mut hasher = Sha256::new();
        hasher.update(api_key.as_bytes());
        format!("{:x}", hasher.finalize())
    }
}

/// Database-backed authenticator: `x-api-key` header first, session cookie second
pub struct DbAuthenticator {
    database: Arc<Database>,
    key_manager: ApiKeyManager,
}

impl DbAuthenticator {
    /// Create an authenticator over the given database
    #[must_use]
    pub fn new(database: Arc<Database>) -> Self {
        Self {
            database,
            key_manager: ApiKeyManager::new(),
        }
    }

    async fn authenticate_api_key(&self, api_key: &str) -> AppResult<AuthResult> {
        // The reason stays in the logs; clients always see "Unauthorized"
        if let Err(e) = self.key_manager.validate_key_format(api_key) {
            tracing::debug!(error = %e, "Rejected malformed API key");
            return Err(AppError::auth_required());
        }

        let hash = ApiKeyManager::hash_key(api_key);
        let user = self
            .database
            .get_user_by_api_key_hash(&hash)
            .await?
            .ok_or_else(AppError::auth_required)?;

        Ok(AuthResult {
            user_id: user.id,
            is_server_admin: user.is_server_admin,
        })
    }

    async fn authenticate_session(&self, token: &str) -> AppResult<AuthResult> {
        let user = self
            .database
            .get_session_user(token)
            .await?
            .ok_or_else(AppError::auth_required)?;

        Ok(AuthResult {
            user_id: user.id,
            is_server_admin: user.is_server_admin,
        })
    }
}

#[async_trait]
impl Authenticator for DbAuthenticator {
    async fn authenticate(&self, headers: &HeaderMap) -> AppResult<AuthResult> {
        if let Some(api_key) = headers.get(API_KEY_HEADER).and_then(|v| v.to_str().ok()) {
            return self.authenticate_api_key(api_key).await;
        }

        if let Some(token) = session_cookie_value(headers) {
            return self.authenticate_session(&token).await;
        }

        Err(AppError::auth_required())
    }
}

/// Extract the session token from the `Cookie` header, if present
fn session_cookie_value(headers: &HeaderMap) -> Option<String> {
    let cookies = headers.get(http::header::COOKIE)?.to_str().ok()?;

    cookies.split(';').find_map(|pair| {
        let (name, value) = pair.trim().split_once('=')?;
        (name == SESSION_COOKIE).then(|| value.to_owned())
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generated_key_format_is_valid() {
        let manager = ApiKeyManager::new();
        let data = manager.generate_api_key();

        assert!(data.full_key.starts_with("lk_live_"));
        assert_eq!(data.key_prefix.len(), 12);
        assert!(manager.validate_key_format(&data.full_key).is_ok());
        assert_eq!(data.key_hash, ApiKeyManager::hash_key(&data.full_key));
    }

    #[test]
    fn test_invalid_key_formats_rejected() {
        let manager = ApiKeyManager::new();
        assert!(manager.validate_key_format("sk_live_wrongprefix").is_err());
        assert!(manager.validate_key_format("lk_live_short").is_err());
        assert!(manager.validate_key_format("").is_err());
    }

    #[test]
    fn test_hash_is_deterministic() {
        assert_eq!(
            ApiKeyManager::hash_key("lk_live_abc"),
            ApiKeyManager::hash_key("lk_live_abc")
        );
        assert_ne!(
            ApiKeyManager::hash_key("lk_live_abc"),
            ApiKeyManager::hash_key("lk_live_abd")
        );
    }

    #[test]
    fn test_session_cookie_extraction() {
        let mut headers = HeaderMap::new();
        headers.insert(
            http::header::COOKIE,
            "theme=dark; larder_session=tok123; other=1".parse().unwrap(),
        );
        assert_eq!(session_cookie_value(&headers).as_deref(), Some("tok123"));

        let mut no_session = HeaderMap::new();
        no_session.insert(http::header::COOKIE, "theme=dark".parse().unwrap());
        assert_eq!(session_cookie_value(&no_session), None);

        assert_eq!(session_cookie_value(&HeaderMap::new()), None);
    }
}
