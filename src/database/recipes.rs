// ABOUTME: Recipe repository implementation over SQLite
// ABOUTME: Handles visibility scoping, search, tag filters, sorting, and pagination
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Larder Project

use super::{parse_uuid, timestamp_from_millis, Database, RecipeRepository};
use crate::errors::AppResult;
use crate::models::{
    FilterMode, Recipe, RecipeIngredient, RecipeListContext, RecipeListPage, RecipeStep,
    RecipeSummary, SortOrder,
};
use async_trait::async_trait;
use sqlx::Row;
use uuid::Uuid;

impl SortOrder {
    /// SQL ORDER BY clause for this sort order
    const fn order_by_sql(self) -> &'static str {
        match self {
            Self::DateDesc => "r.created_at DESC",
            Self::DateAsc => "r.created_at ASC",
            Self::TitleAsc => "r.name COLLATE NOCASE ASC",
            Self::TitleDesc => "r.name COLLATE NOCASE DESC",
        }
    }
}

impl Database {
    /// Insert a full recipe with its ingredients, steps, and tags.
    /// Used by the import pipeline and seed tooling.
    ///
    /// # Errors
    /// Returns an error when any insert fails
    pub async fn insert_recipe(&self, recipe: &Recipe) -> AppResult<()> {
        sqlx::query(
            "INSERT INTO recipes (id, name, user_id, description, servings, created_at, updated_at)
             VALUES (?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(&recipe.id)
        .bind(&recipe.name)
        .bind(recipe.user_id.map(|u| u.to_string()))
        .bind(&recipe.description)
        .bind(recipe.servings)
        .bind(recipe.created_at.timestamp_millis())
        .bind(recipe.updated_at.timestamp_millis())
        .execute(self.pool())
        .await?;

        for ingredient in &recipe.ingredients {
            sqlx::query(
                "INSERT INTO recipe_ingredients (recipe_id, position, name, quantity)
                 VALUES (?, ?, ?, ?)",
            )
            .bind(&recipe.id)
            .bind(ingredient.position)
            .bind(&ingredient.name)
            .bind(&ingredient.quantity)
            .execute(self.pool())
            .await?;
        }

        for step in &recipe.steps {
            sqlx::query(
                "INSERT INTO recipe_steps (recipe_id, position, instruction) VALUES (?, ?, ?)",
            )
            .bind(&recipe.id)
            .bind(step.position)
            .bind(&step.instruction)
            .execute(self.pool())
            .await?;
        }

        for tag in &recipe.tags {
            sqlx::query("INSERT OR IGNORE INTO tags (name) VALUES (?)")
                .bind(tag)
                .execute(self.pool())
                .await?;
            sqlx::query(
                "INSERT OR IGNORE INTO recipe_tags (recipe_id, tag_id)
                 SELECT ?, id FROM tags WHERE name = ?",
            )
            .bind(&recipe.id)
            .bind(tag)
            .execute(self.pool())
            .await?;
        }

        Ok(())
    }

    async fn tags_for_recipe(&self, recipe_id: &str) -> AppResult<Vec<String>> {
        let rows = sqlx::query(
            "SELECT t.name FROM tags t
             JOIN recipe_tags rt ON rt.tag_id = t.id
             WHERE rt.recipe_id = ?
             ORDER BY t.name",
        )
        .bind(recipe_id)
        .fetch_all(self.pool())
        .await?;

        let mut tags = Vec::with_capacity(rows.len());
        for row in rows {
            tags.push(row.try_get::<String, _>("name")?);
        }
        Ok(tags)
    }
}

/// Escape LIKE metacharacters so user input matches literally
fn escape_like(input: &str) -> String {
    input
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_")
}

/// Assemble WHERE clauses and string binds shared by the row and count queries
fn build_filters(
    ctx: &RecipeListContext,
    search: Option<&str>,
    tags: Option<&[String]>,
    filter_mode: FilterMode,
) -> (String, Vec<String>) {
    let mut clauses: Vec<String> = Vec::new();
    let mut binds: Vec<String> = Vec::new();

    // Visibility: own recipes, household recipes, and orphaned recipes.
    // Server admins see everything.
    if !ctx.is_server_admin {
        let visible: Vec<Uuid> = ctx
            .household_user_ids
            .clone()
            .unwrap_or_else(|| vec![ctx.user_id]);
        let placeholders = vec!["?"; visible.len()].join(", ");
        clauses.push(format!(
            "(r.user_id IS NULL OR r.user_id IN ({placeholders}))"
        ));
        binds.extend(visible.iter().map(ToString::to_string));
    }

    if let Some(search) = search {
        clauses.push("r.name LIKE ? ESCAPE '\\'".to_owned());
        binds.push(format!("%{}%", escape_like(search)));
    }

    if let Some(tags) = tags {
        if !tags.is_empty() {
            let placeholders = vec!["?"; tags.len()].join(", ");
            let subquery = match filter_mode {
                FilterMode::Or => format!(
                    "r.id IN (SELECT rt.recipe_id FROM recipe_tags rt
                      JOIN tags t ON t.id = rt.tag_id
                      WHERE t.name IN ({placeholders}))"
                ),
                FilterMode::And => {
                    // Distinct count, so duplicate tag parameters cannot
                    // demand more matches than names exist
                    let distinct = tags
                        .iter()
                        .collect::<std::collections::HashSet<_>>()
                        .len();
                    format!(
                        "r.id IN (SELECT rt.recipe_id FROM recipe_tags rt
                          JOIN tags t ON t.id = rt.tag_id
                          WHERE t.name IN ({placeholders})
                          GROUP BY rt.recipe_id
                          HAVING COUNT(DISTINCT t.name) = {distinct})"
                    )
                }
            };
            clauses.push(subquery);
            binds.extend(tags.iter().cloned());
        }
    }

    let where_sql = if clauses.is_empty() {
        String::new()
    } else {
        format!("WHERE {}", clauses.join(" AND "))
    };

    (where_sql, binds)
}

#[async_trait]
impl RecipeRepository for Database {
    async fn list_recipes(
        &self,
        ctx: &RecipeListContext,
        limit: i64,
        cursor: i64,
        search: Option<&str>,
        tags: Option<&[String]>,
        filter_mode: FilterMode,
        sort_mode: SortOrder,
    ) -> AppResult<RecipeListPage> {
        let (where_sql, binds) = build_filters(ctx, search, tags, filter_mode);

        let count_sql = format!("SELECT COUNT(*) FROM recipes r {where_sql}");
        let mut count_query = sqlx::query_scalar::<_, i64>(&count_sql);
        for bind in &binds {
            count_query = count_query.bind(bind);
        }
        let total = count_query.fetch_one(self.pool()).await?;

        let rows_sql = format!(
            "SELECT r.id, r.name, r.user_id, r.description, r.created_at
             FROM recipes r {where_sql}
             ORDER BY {}
             LIMIT ? OFFSET ?",
            sort_mode.order_by_sql()
        );
        let mut rows_query = sqlx::query(&rows_sql);
        for bind in &binds {
            rows_query = rows_query.bind(bind);
        }
        let rows = rows_query
            .bind(limit)
            .bind(cursor)
            .fetch_all(self.pool())
            .await?;

        let mut recipes = Vec::with_capacity(rows.len());
        for row in rows {
            let id: String = row.try_get("id")?;
            let user_id: Option<String> = row.try_get("user_id")?;
            let tags = self.tags_for_recipe(&id).await?;

            recipes.push(RecipeSummary {
                id,
                name: row.try_get("name")?,
                user_id: user_id.as_deref().map(parse_uuid).transpose()?,
                description: row.try_get("description")?,
                created_at: timestamp_from_millis(row.try_get("created_at")?)?,
                tags,
            });
        }

        Ok(RecipeListPage { recipes, total })
    }

    async fn get_recipe_full(&self, id: &str) -> AppResult<Option<Recipe>> {
        let Some(row) = sqlx::query(
            "SELECT id, name, user_id, description, servings, created_at, updated_at
             FROM recipes WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(self.pool())
        .await?
        else {
            return Ok(None);
        };

        let ingredient_rows = sqlx::query(
            "SELECT position, name, quantity FROM recipe_ingredients
             WHERE recipe_id = ? ORDER BY position",
        )
        .bind(id)
        .fetch_all(self.pool())
        .await?;

        let mut ingredients = Vec::with_capacity(ingredient_rows.len());
        for ingredient in ingredient_rows {
            ingredients.push(RecipeIngredient {
                name: ingredient.try_get("name")?,
                quantity: ingredient.try_get("quantity")?,
                position: ingredient.try_get("position")?,
            });
        }

        let step_rows = sqlx::query(
            "SELECT position, instruction FROM recipe_steps
             WHERE recipe_id = ? ORDER BY position",
        )
        .bind(id)
        .fetch_all(self.pool())
        .await?;

        let mut steps = Vec::with_capacity(step_rows.len());
        for step in step_rows {
            steps.push(RecipeStep {
                position: step.try_get("position")?,
                instruction: step.try_get("instruction")?,
            });
        }

        let tags = self.tags_for_recipe(id).await?;
        let user_id: Option<String> = row.try_get("user_id")?;

        Ok(Some(Recipe {
            id: row.try_get("id")?,
            name: row.try_get("name")?,
            user_id: user_id.as_deref().map(parse_uuid).transpose()?,
            description: row.try_get("description")?,
            servings: row.try_get("servings")?,
            created_at: timestamp_from_millis(row.try_get("created_at")?)?,
            updated_at: timestamp_from_millis(row.try_get("updated_at")?)?,
            ingredients,
            steps,
            tags,
        }))
    }
}
