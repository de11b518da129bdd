// ABOUTME: Service and router tests using fake repositories with call counters
// ABOUTME: Proves auth failures short-circuit queries and permission paths consult the right seams
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Larder Project

use async_trait::async_trait;
use axum::body::Body;
use chrono::Utc;
use http::{HeaderMap, Request, StatusCode};
use larder::auth::{AuthResult, Authenticator};
use larder::config::environment::{Environment, ServerConfig};
use larder::database::{Database, HouseholdResolver, RecipeRepository};
use larder::errors::{AppError, AppResult};
use larder::models::{
    FilterMode, Household, Recipe, RecipeListContext, RecipeListPage, SortOrder,
};
use larder::recipe_routes::{RecipeListParams, RecipeRoutes};
use larder::resources::ServerResources;
use larder::routes;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tempfile::TempDir;
use tower::ServiceExt;
use uuid::Uuid;

#[derive(Debug, Clone)]
struct CapturedListCall {
    household_user_ids: Option<Vec<Uuid>>,
    limit: i64,
    cursor: i64,
    search: Option<String>,
    tags: Option<Vec<String>>,
    filter_mode: FilterMode,
    sort_mode: SortOrder,
}

#[derive(Default)]
struct FakeRecipeRepo {
    recipe: Option<Recipe>,
    total: i64,
    list_calls: AtomicUsize,
    get_calls: AtomicUsize,
    last_list: Mutex<Option<CapturedListCall>>,
}

#[async_trait]
impl RecipeRepository for FakeRecipeRepo {
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
        self.list_calls.fetch_add(1, Ordering::SeqCst);
        *self.last_list.lock().unwrap() = Some(CapturedListCall {
            household_user_ids: ctx.household_user_ids.clone(),
            limit,
            cursor,
            search: search.map(ToOwned::to_owned),
            tags: tags.map(<[String]>::to_vec),
            filter_mode,
            sort_mode,
        });
        Ok(RecipeListPage {
            recipes: Vec::new(),
            total: self.total,
        })
    }

    async fn get_recipe_full(&self, _id: &str) -> AppResult<Option<Recipe>> {
        self.get_calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.recipe.clone())
    }
}

#[derive(Default)]
struct FakeHouseholds {
    household: Option<Household>,
    calls: AtomicUsize,
}

#[async_trait]
impl HouseholdResolver for FakeHouseholds {
    async fn household_for_user(&self, _user_id: Uuid) -> AppResult<Option<Household>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.household.clone())
    }
}

struct DenyAllAuthenticator;

#[async_trait]
impl Authenticator for DenyAllAuthenticator {
    async fn authenticate(&self, _headers: &HeaderMap) -> AppResult<AuthResult> {
        Err(AppError::auth_required())
    }
}

fn auth(user_id: Uuid) -> AuthResult {
    AuthResult {
        user_id,
        is_server_admin: false,
    }
}

fn owned_recipe(id: &str, owner: Uuid) -> Recipe {
    Recipe {
        id: id.to_owned(),
        name: "Fake Recipe".to_owned(),
        user_id: Some(owner),
        description: None,
        servings: None,
        created_at: Utc::now(),
        updated_at: Utc::now(),
        ingredients: Vec::new(),
        steps: Vec::new(),
        tags: Vec::new(),
    }
}

fn default_params() -> RecipeListParams {
    RecipeListParams {
        limit: 50,
        cursor: 0,
        search: None,
        tags: None,
        filter_mode: FilterMode::Or,
        sort_mode: SortOrder::DateDesc,
    }
}

#[tokio::test]
async fn test_unowned_recipe_skips_household_lookup() {
    let repo = Arc::new(FakeRecipeRepo {
        recipe: Some(Recipe {
            user_id: None,
            ..owned_recipe("r1", Uuid::new_v4())
        }),
        ..FakeRecipeRepo::default()
    });
    let households = Arc::new(FakeHouseholds::default());
    let service = RecipeRoutes::new(repo.clone(), households.clone());

    let recipe = service
        .get_recipe(&auth(Uuid::new_v4()), "r1")
        .await
        .unwrap();

    assert_eq!(recipe.id, "r1");
    assert_eq!(repo.get_calls.load(Ordering::SeqCst), 1);
    assert_eq!(households.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_owned_recipe_consults_household_and_denies_stranger() {
    let owner = Uuid::new_v4();
    let repo = Arc::new(FakeRecipeRepo {
        recipe: Some(owned_recipe("r1", owner)),
        ..FakeRecipeRepo::default()
    });
    let households = Arc::new(FakeHouseholds::default());
    let service = RecipeRoutes::new(repo, households.clone());

    let err = service
        .get_recipe(&auth(Uuid::new_v4()), "r1")
        .await
        .unwrap_err();

    assert_eq!(err.message, "Access denied");
    assert_eq!(households.calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_owned_recipe_allows_household_member() {
    let owner = Uuid::new_v4();
    let member = Uuid::new_v4();
    let repo = Arc::new(FakeRecipeRepo {
        recipe: Some(owned_recipe("r1", owner)),
        ..FakeRecipeRepo::default()
    });
    let households = Arc::new(FakeHouseholds {
        household: Some(Household {
            id: Uuid::new_v4(),
            name: "Shared".to_owned(),
            user_ids: vec![owner, member],
        }),
        ..FakeHouseholds::default()
    });
    let service = RecipeRoutes::new(repo, households);

    let recipe = service.get_recipe(&auth(member), "r1").await.unwrap();
    assert_eq!(recipe.id, "r1");
}

#[tokio::test]
async fn test_missing_recipe_is_not_found_without_permission_check() {
    let repo = Arc::new(FakeRecipeRepo::default());
    let households = Arc::new(FakeHouseholds::default());
    let service = RecipeRoutes::new(repo, households.clone());

    let err = service
        .get_recipe(&auth(Uuid::new_v4()), "missing")
        .await
        .unwrap_err();

    assert_eq!(err.message, "Recipe not found");
    assert_eq!(households.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_list_passes_household_context_and_params_through() {
    let me = Uuid::new_v4();
    let roommate = Uuid::new_v4();
    let repo = Arc::new(FakeRecipeRepo {
        total: 120,
        ..FakeRecipeRepo::default()
    });
    let households = Arc::new(FakeHouseholds {
        household: Some(Household {
            id: Uuid::new_v4(),
            name: "Shared".to_owned(),
            user_ids: vec![me, roommate],
        }),
        ..FakeHouseholds::default()
    });
    let service = RecipeRoutes::new(repo.clone(), households);

    let params = RecipeListParams {
        limit: 20,
        cursor: 40,
        search: Some("curry".to_owned()),
        tags: Some(vec!["dinner".to_owned(), "easy".to_owned()]),
        filter_mode: FilterMode::And,
        sort_mode: SortOrder::TitleAsc,
    };
    let response = service.list_recipes(&auth(me), &params).await.unwrap();

    assert_eq!(response.total, 120);
    assert_eq!(response.next_cursor, Some(60));

    let captured = repo.last_list.lock().unwrap().clone().unwrap();
    assert_eq!(captured.household_user_ids, Some(vec![me, roommate]));
    assert_eq!(captured.limit, 20);
    assert_eq!(captured.cursor, 40);
    assert_eq!(captured.search.as_deref(), Some("curry"));
    assert_eq!(
        captured.tags,
        Some(vec!["dinner".to_owned(), "easy".to_owned()])
    );
    assert_eq!(captured.filter_mode, FilterMode::And);
    assert_eq!(captured.sort_mode, SortOrder::TitleAsc);
}

#[tokio::test]
async fn test_list_next_cursor_none_on_final_page() {
    let repo = Arc::new(FakeRecipeRepo {
        total: 30,
        ..FakeRecipeRepo::default()
    });
    let service = RecipeRoutes::new(repo, Arc::new(FakeHouseholds::default()));

    let response = service
        .list_recipes(&auth(Uuid::new_v4()), &default_params())
        .await
        .unwrap();

    assert_eq!(response.next_cursor, None);
}

#[tokio::test]
async fn test_failed_auth_never_reaches_the_repository() {
    let tmp = TempDir::new().unwrap();
    let database_url = format!(
        "sqlite://{}?mode=rwc",
        tmp.path().join("test.db").display()
    );
    let database = Database::new(&database_url).await.unwrap();

    let repo = Arc::new(FakeRecipeRepo::default());
    let resources = Arc::new(ServerResources {
        database: Arc::new(database),
        authenticator: Arc::new(DenyAllAuthenticator),
        recipes: repo.clone(),
        households: Arc::new(FakeHouseholds::default()),
        config: Arc::new(ServerConfig {
            http_port: 0,
            database_url,
            environment: Environment::Testing,
        }),
    });
    let app = routes::router(resources);

    let request = Request::builder()
        .uri("/api/recipes?id=r1")
        .header("x-api-key", "lk_live_whatever")
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(repo.get_calls.load(Ordering::SeqCst), 0);
    assert_eq!(repo.list_calls.load(Ordering::SeqCst), 0);
}
