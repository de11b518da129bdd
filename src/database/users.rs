// ABOUTME: User, household, API key, and session queries over SQLite
// ABOUTME: Implements the HouseholdResolver trait and credential lookups for auth
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Larder Project

use super::{parse_uuid, timestamp_from_millis, Database, HouseholdResolver};
use crate::errors::AppResult;
use crate::models::{ApiKey, ApiKeyData, Household, User};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::Row;
use uuid::Uuid;

fn user_from_row(row: &sqlx::sqlite::SqliteRow) -> AppResult<User> {
    let id: String = row.try_get("id")?;
    Ok(User {
        id: parse_uuid(&id)?,
        email: row.try_get("email")?,
        is_server_admin: row.try_get::<i64, _>("is_server_admin")? != 0,
        created_at: timestamp_from_millis(row.try_get("created_at")?)?,
    })
}

impl Database {
    /// Create a user account
    ///
    /// # Errors
    /// Returns an error when the email already exists or the insert fails
    pub async fn create_user(&self, email: &str, is_server_admin: bool) -> AppResult<User> {
        let user = User {
            id: Uuid::new_v4(),
            email: email.to_owned(),
            is_server_admin,
            created_at: Utc::now(),
        };

        sqlx::query(
            "INSERT INTO users (id, email, is_server_admin, created_at) VALUES (?, ?, ?, ?)",
        )
        .bind(user.id.to_string())
        .bind(&user.email)
        .bind(i64::from(user.is_server_admin))
        .bind(user.created_at.timestamp_millis())
        .execute(self.pool())
        .await?;

        Ok(user)
    }

    /// Create a household and enroll the given members
    ///
    /// # Errors
    /// Returns an error when any insert fails
    pub async fn create_household(&self, name: &str, member_ids: &[Uuid]) -> AppResult<Household> {
        let id = Uuid::new_v4();

        sqlx::query("INSERT INTO households (id, name, created_at) VALUES (?, ?, ?)")
            .bind(id.to_string())
            .bind(name)
            .bind(Utc::now().timestamp_millis())
            .execute(self.pool())
            .await?;

        for member in member_ids {
            sqlx::query("INSERT INTO household_members (household_id, user_id) VALUES (?, ?)")
                .bind(id.to_string())
                .bind(member.to_string())
                .execute(self.pool())
                .await?;
        }

        Ok(Household {
            id,
            name: name.to_owned(),
            user_ids: member_ids.to_vec(),
        })
    }

    /// Store a generated API key record (hash only)
    ///
    /// # Errors
    /// Returns an error when the insert fails
    pub async fn create_api_key(
        &self,
        user_id: Uuid,
        name: &str,
        data: &ApiKeyData,
    ) -> AppResult<ApiKey> {
        let key = ApiKey {
            id: Uuid::new_v4().to_string(),
            user_id,
            name: name.to_owned(),
            key_prefix: data.key_prefix.clone(),
            key_hash: data.key_hash.clone(),
            is_active: true,
            created_at: Utc::now(),
            last_used_at: None,
        };

        sqlx::query(
            "INSERT INTO api_keys (id, user_id, name, key_prefix, key_hash, is_active, created_at)
             VALUES (?, ?, ?, ?, ?, 1, ?)",
        )
        .bind(&key.id)
        .bind(key.user_id.to_string())
        .bind(&key.name)
        .bind(&key.key_prefix)
        .bind(&key.key_hash)
        .bind(key.created_at.timestamp_millis())
        .execute(self.pool())
        .await?;

        Ok(key)
    }

    /// Look up the owner of an active API key by its hash, updating the
    /// key's last-used timestamp on a hit
    ///
    /// # Errors
    /// Returns an error when the query fails
    pub async fn get_user_by_api_key_hash(&self, key_hash: &str) -> AppResult<Option<User>> {
        let row = sqlx::query(
            "SELECT u.id, u.email, u.is_server_admin, u.created_at, k.id AS key_id
             FROM api_keys k
             JOIN users u ON u.id = k.user_id
             WHERE k.key_hash = ? AND k.is_active = 1",
        )
        .bind(key_hash)
        .fetch_optional(self.pool())
        .await?;

        let Some(row) = row else {
            return Ok(None);
        };

        let key_id: String = row.try_get("key_id")?;
        sqlx::query("UPDATE api_keys SET last_used_at = ? WHERE id = ?")
            .bind(Utc::now().timestamp_millis())
            .bind(&key_id)
            .execute(self.pool())
            .await?;

        user_from_row(&row).map(Some)
    }

    /// Record a session token
    ///
    /// # Errors
    /// Returns an error when the insert fails
    pub async fn create_session(
        &self,
        user_id: Uuid,
        token: &str,
        expires_at: DateTime<Utc>,
    ) -> AppResult<()> {
        sqlx::query(
            "INSERT INTO sessions (token, user_id, created_at, expires_at) VALUES (?, ?, ?, ?)",
        )
        .bind(token)
        .bind(user_id.to_string())
        .bind(Utc::now().timestamp_millis())
        .bind(expires_at.timestamp_millis())
        .execute(self.pool())
        .await?;

        Ok(())
    }

    /// Resolve an unexpired session token to its user
    ///
    /// # Errors
    /// Returns an error when the query fails
    pub async fn get_session_user(&self, token: &str) -> AppResult<Option<User>> {
        let row = sqlx::query(
            "SELECT u.id, u.email, u.is_server_admin, u.created_at
             FROM sessions s
             JOIN users u ON u.id = s.user_id
             WHERE s.token = ? AND s.expires_at > ?",
        )
        .bind(token)
        .bind(Utc::now().timestamp_millis())
        .fetch_optional(self.pool())
        .await?;

        row.as_ref().map(user_from_row).transpose()
    }
}

#[async_trait]
impl HouseholdResolver for Database {
    async fn household_for_user(&self, user_id: Uuid) -> AppResult<Option<Household>> {
        let row = sqlx::query(
            "SELECT h.id, h.name FROM households h
             JOIN household_members m ON m.household_id = h.id
             WHERE m.user_id = ?",
        )
        .bind(user_id.to_string())
        .fetch_optional(self.pool())
        .await?;

        let Some(row) = row else {
            return Ok(None);
        };

        let household_id: String = row.try_get("id")?;
        let member_rows =
            sqlx::query("SELECT user_id FROM household_members WHERE household_id = ?")
                .bind(&household_id)
                .fetch_all(self.pool())
                .await?;

        let mut user_ids = Vec::with_capacity(member_rows.len());
        for member in member_rows {
            let member_id: String = member.try_get("user_id")?;
            user_ids.push(parse_uuid(&member_id)?);
        }

        Ok(Some(Household {
            id: parse_uuid(&household_id)?,
            name: row.try_get("name")?,
            user_ids,
        }))
    }
}
