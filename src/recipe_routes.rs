// ABOUTME: Recipe retrieval service orchestrating auth context, permissions, and queries
// ABOUTME: Handles single-recipe fetch+authorize and paginated list with nextCursor math
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Larder Project

//! Recipe retrieval service.
//!
//! One pass per request: resolve household context, then either fetch and
//! authorize a single recipe or run a paginated list query. No retries,
//! no loops.

use crate::auth::AuthResult;
use crate::database::{HouseholdResolver, RecipeRepository};
use crate::errors::{AppError, AppResult};
use crate::models::{FilterMode, Recipe, RecipeListContext, RecipeSummary, SortOrder};
use crate::permissions::{OwnershipPolicy, ResourceAction};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Default page size when `limit` is absent or unparseable
pub const DEFAULT_LIMIT: i64 = 50;

/// Hard cap on page size
pub const MAX_LIMIT: i64 = 100;

/// Normalized list-query parameters
#[derive(Debug, Clone)]
pub struct RecipeListParams {
    pub limit: i64,
    pub cursor: i64,
    pub search: Option<String>,
    pub tags: Option<Vec<String>>,
    pub filter_mode: FilterMode,
    pub sort_mode: SortOrder,
}

/// Paginated list response: `{recipes, total, nextCursor}`
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecipeListResponse {
    pub recipes: Vec<RecipeSummary>,
    pub total: i64,
    pub next_cursor: Option<i64>,
}

/// Clamp a raw limit to `1..=MAX_LIMIT`, defaulting when absent
#[must_use]
pub fn effective_limit(raw: Option<i64>) -> i64 {
    raw.unwrap_or(DEFAULT_LIMIT).clamp(1, MAX_LIMIT)
}

/// Normalize a raw cursor: non-negative offset, zero when absent
#[must_use]
pub fn effective_cursor(raw: Option<i64>) -> i64 {
    raw.unwrap_or(0).max(0)
}

/// Split a comma-separated tag parameter, trimming entries and dropping
/// empties and duplicates. Returns `None` when the parameter is absent or
/// contains nothing usable.
#[must_use]
pub fn parse_tags(raw: Option<&str>) -> Option<Vec<String>> {
    let mut tags: Vec<String> = Vec::new();
    for tag in raw?.split(',').map(str::trim).filter(|t| !t.is_empty()) {
        if !tags.iter().any(|existing| existing == tag) {
            tags.push(tag.to_owned());
        }
    }

    (!tags.is_empty()).then_some(tags)
}

/// `cursor + limit` when more rows remain, else `None`
#[must_use]
pub const fn next_cursor(cursor: i64, limit: i64, total: i64) -> Option<i64> {
    if cursor + limit < total {
        Some(cursor + limit)
    } else {
        None
    }
}

/// Route handlers for recipe retrieval
#[derive(Clone)]
pub struct RecipeRoutes {
    recipes: Arc<dyn RecipeRepository>,
    households: Arc<dyn HouseholdResolver>,
}

impl RecipeRoutes {
    /// Creates a new recipe routes instance over the repository seams
    #[must_use]
    pub fn new(recipes: Arc<dyn RecipeRepository>, households: Arc<dyn HouseholdResolver>) -> Self {
        Self {
            recipes,
            households,
        }
    }

    async fn household_member_ids(&self, auth: &AuthResult) -> AppResult<Option<Vec<uuid::Uuid>>> {
        Ok(self
            .households
            .household_for_user(auth.user_id)
            .await?
            .map(|h| h.user_ids))
    }

    /// Fetch a single recipe by id, enforcing the view permission for
    /// owned recipes. Orphaned recipes are disclosable to any
    /// authenticated caller.
    ///
    /// # Errors
    /// `ResourceNotFound` when the id is unknown, `PermissionDenied` when
    /// the evaluator denies access, or a database error
    pub async fn get_recipe(&self, auth: &AuthResult, id: &str) -> AppResult<Recipe> {
        tracing::debug!(user_id = %auth.user_id, recipe_id = %id, "Getting recipe by ID");

        let recipe = self
            .recipes
            .get_recipe_full(id)
            .await?
            .ok_or_else(|| AppError::not_found("Recipe not found"))?;

        let policy = OwnershipPolicy::of(recipe.user_id);
        if matches!(policy, OwnershipPolicy::Owned(_)) {
            let household_user_ids = self.household_member_ids(auth).await?;
            if !policy.allows(
                ResourceAction::View,
                auth.user_id,
                household_user_ids.as_deref(),
                auth.is_server_admin,
            ) {
                tracing::warn!(user_id = %auth.user_id, recipe_id = %id, "Access denied to recipe");
                return Err(AppError::permission_denied("Access denied"));
            }
        }

        Ok(recipe)
    }

    /// List recipes visible to the caller with pagination metadata
    ///
    /// # Errors
    /// Returns a database error when the query fails
    pub async fn list_recipes(
        &self,
        auth: &AuthResult,
        params: &RecipeListParams,
    ) -> AppResult<RecipeListResponse> {
        tracing::debug!(
            user_id = %auth.user_id,
            limit = params.limit,
            cursor = params.cursor,
            search = ?params.search,
            tags = ?params.tags,
            "Listing recipes"
        );

        let ctx = RecipeListContext {
            user_id: auth.user_id,
            household_user_ids: self.household_member_ids(auth).await?,
            is_server_admin: auth.is_server_admin,
        };

        let page = self
            .recipes
            .list_recipes(
                &ctx,
                params.limit,
                params.cursor,
                params.search.as_deref(),
                params.tags.as_deref(),
                params.filter_mode,
                params.sort_mode,
            )
            .await?;

        tracing::debug!(count = page.recipes.len(), total = page.total, "Listed recipes");

        Ok(RecipeListResponse {
            next_cursor: next_cursor(params.cursor, params.limit, page.total),
            recipes: page.recipes,
            total: page.total,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_effective_limit_defaults_and_clamps() {
        assert_eq!(effective_limit(None), 50);
        assert_eq!(effective_limit(Some(25)), 25);
        assert_eq!(effective_limit(Some(100)), 100);
        assert_eq!(effective_limit(Some(101)), 100);
        assert_eq!(effective_limit(Some(5000)), 100);
        assert_eq!(effective_limit(Some(0)), 1);
        assert_eq!(effective_limit(Some(-7)), 1);
    }

    #[test]
    fn test_effective_cursor_floors_at_zero() {
        assert_eq!(effective_cursor(None), 0);
        assert_eq!(effective_cursor(Some(50)), 50);
        assert_eq!(effective_cursor(Some(-1)), 0);
    }

    #[test]
    fn test_parse_tags_splits_and_trims() {
        assert_eq!(
            parse_tags(Some("dinner,easy")),
            Some(vec!["dinner".to_owned(), "easy".to_owned()])
        );
        assert_eq!(
            parse_tags(Some(" dinner , easy ,")),
            Some(vec!["dinner".to_owned(), "easy".to_owned()])
        );
        assert_eq!(parse_tags(Some(",,")), None);
        assert_eq!(parse_tags(Some("")), None);
        assert_eq!(parse_tags(None), None);
    }

    #[test]
    fn test_parse_tags_drops_duplicates() {
        assert_eq!(
            parse_tags(Some("dinner,dinner,easy")),
            Some(vec!["dinner".to_owned(), "easy".to_owned()])
        );
        assert_eq!(
            parse_tags(Some("dinner, dinner ")),
            Some(vec!["dinner".to_owned()])
        );
    }

    #[test]
    fn test_next_cursor_math() {
        assert_eq!(next_cursor(0, 50, 100), Some(50));
        assert_eq!(next_cursor(50, 50, 100), None);
        assert_eq!(next_cursor(0, 50, 50), None);
        assert_eq!(next_cursor(0, 50, 51), Some(50));
        assert_eq!(next_cursor(0, 50, 0), None);
    }
}
