// ABOUTME: Domain data structures for recipes, users, households, and API keys
// ABOUTME: Defines wire-format serialization (camelCase) shared by routes and repositories
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Larder Project

//! Core domain model shared across routes, repositories, and services.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Tag filter combination mode: any tag matches (`OR`) or all must match (`AND`)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum FilterMode {
    #[default]
    #[serde(rename = "OR")]
    Or,
    #[serde(rename = "AND")]
    And,
}

impl FilterMode {
    /// Parse from a query-string value, defaulting to `OR` for anything unrecognized
    #[must_use]
    pub fn from_query(value: Option<&str>) -> Self {
        match value {
            Some("AND") => Self::And,
            _ => Self::Or,
        }
    }
}

/// Recipe list sort order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum SortOrder {
    #[default]
    #[serde(rename = "dateDesc")]
    DateDesc,
    #[serde(rename = "dateAsc")]
    DateAsc,
    #[serde(rename = "titleAsc")]
    TitleAsc,
    #[serde(rename = "titleDesc")]
    TitleDesc,
}

impl SortOrder {
    /// Parse from a query-string value, defaulting to `dateDesc` for anything unrecognized
    #[must_use]
    pub fn from_query(value: Option<&str>) -> Self {
        match value {
            Some("dateAsc") => Self::DateAsc,
            Some("titleAsc") => Self::TitleAsc,
            Some("titleDesc") => Self::TitleDesc,
            _ => Self::DateDesc,
        }
    }
}

/// A single recipe ingredient line
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecipeIngredient {
    /// Ingredient name (e.g. "olive oil")
    pub name: String,
    /// Free-form quantity (e.g. "2 tbsp")
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quantity: Option<String>,
    /// Display order within the recipe
    pub position: i64,
}

/// A single preparation step
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecipeStep {
    /// Display order within the recipe
    pub position: i64,
    /// Step instruction text
    pub instruction: String,
}

/// Full recipe with ingredients, steps, and tags
///
/// A `None` owner marks an orphaned/shared recipe that is visible to any
/// authenticated caller without a permission check.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Recipe {
    pub id: String,
    pub name: String,
    /// Owning user, `None` for orphaned recipes
    pub user_id: Option<Uuid>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub servings: Option<i64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub ingredients: Vec<RecipeIngredient>,
    pub steps: Vec<RecipeStep>,
    pub tags: Vec<String>,
}

/// Recipe list row (no nested ingredient/step collections)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecipeSummary {
    pub id: String,
    pub name: String,
    pub user_id: Option<Uuid>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
    pub tags: Vec<String>,
}

/// One page of a recipe list query plus the total count of the filtered set
#[derive(Debug, Clone)]
pub struct RecipeListPage {
    pub recipes: Vec<RecipeSummary>,
    pub total: i64,
}

/// Request-scoped context for list queries: who is asking, and with whose visibility
#[derive(Debug, Clone)]
pub struct RecipeListContext {
    /// Acting user
    pub user_id: Uuid,
    /// Member ids of the acting user's household, `None` when not in a household
    pub household_user_ids: Option<Vec<Uuid>>,
    /// Server admins see every recipe
    pub is_server_admin: bool,
}

/// Registered user account
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: Uuid,
    pub email: String,
    pub is_server_admin: bool,
    pub created_at: DateTime<Utc>,
}

/// A household groups user accounts that share recipe visibility
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Household {
    pub id: Uuid,
    pub name: String,
    /// Member user ids
    pub user_ids: Vec<Uuid>,
}

/// Stored API key record (hash only, never the full key)
#[derive(Debug, Clone)]
pub struct ApiKey {
    pub id: String,
    pub user_id: Uuid,
    pub name: String,
    /// First characters of the full key, for identification in settings UIs
    pub key_prefix: String,
    /// SHA-256 hash of the full key
    pub key_hash: String,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub last_used_at: Option<DateTime<Utc>>,
}

/// Result of generating a new API key; the full key is shown exactly once
#[derive(Debug, Clone)]
pub struct ApiKeyData {
    pub full_key: String,
    pub key_prefix: String,
    pub key_hash: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filter_mode_from_query() {
        assert_eq!(FilterMode::from_query(Some("AND")), FilterMode::And);
        assert_eq!(FilterMode::from_query(Some("OR")), FilterMode::Or);
        assert_eq!(FilterMode::from_query(Some("bogus")), FilterMode::Or);
        assert_eq!(FilterMode::from_query(None), FilterMode::Or);
    }

    #[test]
    fn test_sort_order_from_query() {
        assert_eq!(SortOrder::from_query(Some("dateAsc")), SortOrder::DateAsc);
        assert_eq!(SortOrder::from_query(Some("titleAsc")), SortOrder::TitleAsc);
        assert_eq!(
            SortOrder::from_query(Some("titleDesc")),
            SortOrder::TitleDesc
        );
        assert_eq!(SortOrder::from_query(Some("bogus")), SortOrder::DateDesc);
        assert_eq!(SortOrder::from_query(None), SortOrder::DateDesc);
    }

    #[test]
    fn test_recipe_serializes_camel_case() {
        let recipe = Recipe {
            id: "r1".into(),
            name: "Test".into(),
            user_id: None,
            description: None,
            servings: Some(4),
            created_at: Utc::now(),
            updated_at: Utc::now(),
            ingredients: Vec::new(),
            steps: Vec::new(),
            tags: Vec::new(),
        };
        let json = serde_json::to_value(&recipe).unwrap();
        assert!(json.get("userId").is_some());
        assert!(json.get("createdAt").is_some());
        assert!(json.get("user_id").is_none());
    }
}
