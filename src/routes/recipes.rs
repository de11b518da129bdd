// ABOUTME: REST route handlers for recipe retrieval via GET /api/recipes
// ABOUTME: Parses query parameters leniently and dispatches to the recipe service
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Larder Project

//! Recipe REST API routes.
//!
//! `GET /api/recipes` supports both cookie auth and API key auth and is
//! designed for mobile apps, shortcuts, and other programmatic access.
//!
//! Query parameters:
//! - `id`: get a specific recipe by ID
//! - `limit`: page size (default 50, clamped to 1..=100)
//! - `cursor`: pagination offset (default 0)
//! - `search`: filter by recipe name
//! - `tags`: comma-separated tag names
//! - `filterMode`: `OR` | `AND` (default `OR`)
//! - `sortMode`: `dateDesc` | `dateAsc` | `titleAsc` | `titleDesc`

use crate::errors::AppError;
use crate::models::{FilterMode, SortOrder};
use crate::recipe_routes::{
    effective_cursor, effective_limit, parse_tags, RecipeListParams,
    RecipeRoutes as RecipeService,
};
use crate::resources::ServerResources;
use axum::{
    extract::{Query, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::Deserialize;
use std::sync::Arc;

/// Raw query parameters for `GET /api/recipes`.
///
/// Numeric fields arrive as strings and are parsed leniently: unparseable
/// values fall back to defaults instead of rejecting the request, matching
/// `parseInt`-style coercion in API clients already in the wild.
#[derive(Debug, Default, Deserialize)]
pub struct RecipesQuery {
    pub id: Option<String>,
    pub limit: Option<String>,
    pub cursor: Option<String>,
    pub search: Option<String>,
    pub tags: Option<String>,
    #[serde(rename = "filterMode")]
    pub filter_mode: Option<String>,
    #[serde(rename = "sortMode")]
    pub sort_mode: Option<String>,
}

impl RecipesQuery {
    /// Normalize raw parameters into validated list params
    #[must_use]
    pub fn list_params(&self) -> RecipeListParams {
        RecipeListParams {
            limit: effective_limit(self.limit.as_deref().and_then(|v| v.parse().ok())),
            cursor: effective_cursor(self.cursor.as_deref().and_then(|v| v.parse().ok())),
            search: self.search.clone().filter(|s| !s.is_empty()),
            tags: parse_tags(self.tags.as_deref()),
            filter_mode: FilterMode::from_query(self.filter_mode.as_deref()),
            sort_mode: SortOrder::from_query(self.sort_mode.as_deref()),
        }
    }
}

/// Recipe API routes
pub struct RecipeApiRoutes;

impl RecipeApiRoutes {
    /// Create all recipe API routes
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route("/api/recipes", get(Self::handle_get_recipes))
            .with_state(resources)
    }

    /// Handle `GET /api/recipes`: single recipe when `id` is present,
    /// paginated list otherwise
    async fn handle_get_recipes(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Query(query): Query<RecipesQuery>,
    ) -> Result<Response, AppError> {
        let auth = resources.authenticator.authenticate(&headers).await?;

        tracing::debug!(user_id = %auth.user_id, "Recipe API request received");

        let service =
            RecipeService::new(resources.recipes.clone(), resources.households.clone());

        if let Some(id) = query.id.as_deref() {
            let recipe = service.get_recipe(&auth, id).await?;
            return Ok((StatusCode::OK, Json(recipe)).into_response());
        }

        let response = service.list_recipes(&auth, &query.list_params()).await?;
        Ok((StatusCode::OK, Json(response)).into_response())
    }
}
