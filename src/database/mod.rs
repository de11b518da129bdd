// ABOUTME: SQLite database layer with schema migration and repository seams
// ABOUTME: Defines the RecipeRepository and HouseholdResolver traits consumed by routes
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Larder Project

//! # Database Layer
//!
//! SQLite-backed persistence via `sqlx`. The retrieval endpoint talks to
//! storage only through the [`RecipeRepository`] and [`HouseholdResolver`]
//! traits so it can be tested with substituted fakes.

mod recipes;
mod users;

use crate::errors::{AppError, AppResult};
use crate::models::{
    FilterMode, Household, Recipe, RecipeListContext, RecipeListPage, SortOrder,
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::sqlite::SqlitePoolOptions;
use sqlx::SqlitePool;
use uuid::Uuid;

/// Filtered, paginated, sorted recipe queries and single-recipe fetches
#[async_trait]
pub trait RecipeRepository: Send + Sync {
    /// List recipes visible to the context, with search/tag filters,
    /// sort order, and offset pagination. Returns one page plus the total
    /// count of the filtered set.
    #[allow(clippy::too_many_arguments)]
    async fn list_recipes(
        &self,
        ctx: &RecipeListContext,
        limit: i64,
        cursor: i64,
        search: Option<&str>,
        tags: Option<&[String]>,
        filter_mode: FilterMode,
        sort_mode: SortOrder,
    ) -> AppResult<RecipeListPage>;

    /// Fetch a full recipe (ingredients, steps, tags) by id
    async fn get_recipe_full(&self, id: &str) -> AppResult<Option<Recipe>>;
}

/// Maps a user identity to their household and its member set
#[async_trait]
pub trait HouseholdResolver: Send + Sync {
    /// Resolve the household for a user, `None` when the user is not a member
    async fn household_for_user(&self, user_id: Uuid) -> AppResult<Option<Household>>;
}

/// SQLite database handle
#[derive(Clone)]
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    /// Open a connection pool and apply the schema
    ///
    /// # Errors
    /// Returns an error when the database cannot be opened or migrated
    pub async fn new(database_url: &str) -> AppResult<Self> {
        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect(database_url)
            .await?;

        let db = Self { pool };
        db.migrate().await?;
        Ok(db)
    }

    /// Access the underlying pool
    #[must_use]
    pub const fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Lightweight connectivity check used by the health endpoint
    ///
    /// # Errors
    /// Returns an error when the database does not answer
    pub async fn ping(&self) -> AppResult<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    async fn migrate(&self) -> AppResult<()> {
        let statements = [
            "CREATE TABLE IF NOT EXISTS users (
                id TEXT PRIMARY KEY,
                email TEXT NOT NULL UNIQUE,
                is_server_admin INTEGER NOT NULL DEFAULT 0,
                created_at INTEGER NOT NULL
            )",
            "CREATE TABLE IF NOT EXISTS households (
                id TEXT PRIMARY KEY,
                name TEXT NOT NULL,
                created_at INTEGER NOT NULL
            )",
            "CREATE TABLE IF NOT EXISTS household_members (
                household_id TEXT NOT NULL REFERENCES households(id),
                user_id TEXT NOT NULL REFERENCES users(id),
                PRIMARY KEY (household_id, user_id)
            )",
            "CREATE TABLE IF NOT EXISTS api_keys (
                id TEXT PRIMARY KEY,
                user_id TEXT NOT NULL REFERENCES users(id),
                name TEXT NOT NULL,
                key_prefix TEXT NOT NULL,
                key_hash TEXT NOT NULL UNIQUE,
                is_active INTEGER NOT NULL DEFAULT 1,
                created_at INTEGER NOT NULL,
                last_used_at INTEGER
            )",
            "CREATE TABLE IF NOT EXISTS sessions (
                token TEXT PRIMARY KEY,
                user_id TEXT NOT NULL REFERENCES users(id),
                created_at INTEGER NOT NULL,
                expires_at INTEGER NOT NULL
            )",
            "CREATE TABLE IF NOT EXISTS recipes (
                id TEXT PRIMARY KEY,
                name TEXT NOT NULL,
                user_id TEXT REFERENCES users(id),
                description TEXT,
                servings INTEGER,
                created_at INTEGER NOT NULL,
                updated_at INTEGER NOT NULL
            )",
            "CREATE INDEX IF NOT EXISTS idx_recipes_user_id ON recipes(user_id)",
            "CREATE INDEX IF NOT EXISTS idx_recipes_created_at ON recipes(created_at)",
            "CREATE TABLE IF NOT EXISTS recipe_ingredients (
                recipe_id TEXT NOT NULL REFERENCES recipes(id),
                position INTEGER NOT NULL,
                name TEXT NOT NULL,
                quantity TEXT,
                PRIMARY KEY (recipe_id, position)
            )",
            "CREATE TABLE IF NOT EXISTS recipe_steps (
                recipe_id TEXT NOT NULL REFERENCES recipes(id),
                position INTEGER NOT NULL,
                instruction TEXT NOT NULL,
                PRIMARY KEY (recipe_id, position)
            )",
            "CREATE TABLE IF NOT EXISTS tags (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                name TEXT NOT NULL UNIQUE
            )",
            "CREATE TABLE IF NOT EXISTS recipe_tags (
                recipe_id TEXT NOT NULL REFERENCES recipes(id),
                tag_id INTEGER NOT NULL REFERENCES tags(id),
                PRIMARY KEY (recipe_id, tag_id)
            )",
        ];

        for statement in statements {
            sqlx::query(statement).execute(&self.pool).await?;
        }

        Ok(())
    }
}

/// Parse a stored TEXT uuid, surfacing corruption as a database error
pub(crate) fn parse_uuid(value: &str) -> AppResult<Uuid> {
    Uuid::parse_str(value)
        .map_err(|e| AppError::database(format!("invalid uuid in database: {e}")))
}

/// Convert a stored millisecond timestamp back to a `DateTime`
pub(crate) fn timestamp_from_millis(ms: i64) -> AppResult<DateTime<Utc>> {
    DateTime::from_timestamp_millis(ms)
        .ok_or_else(|| AppError::database(format!("invalid timestamp in database: {ms}")))
}
