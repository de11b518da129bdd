// ABOUTME: Seeds a development database with demo users, a household, and recipes
// ABOUTME: Prints a working API key for exercising GET /api/recipes locally
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Larder Project

use anyhow::Result;
use chrono::{Duration, Utc};
use clap::Parser;
use larder::auth::ApiKeyManager;
use larder::config::environment::DEFAULT_DATABASE_URL;
use larder::database::Database;
use larder::logging::LoggingConfig;
use larder::models::{Recipe, RecipeIngredient, RecipeStep};
use uuid::Uuid;

#[derive(Parser)]
#[command(name = "seed-demo-data", about = "Seed demo users and recipes")]
struct Args {
    /// Database URL to seed
    #[arg(long, default_value = DEFAULT_DATABASE_URL)]
    database_url: String,
}

fn demo_recipe(
    id: &str,
    name: &str,
    user_id: Option<Uuid>,
    tags: &[&str],
    days_ago: i64,
) -> Recipe {
    let created = Utc::now() - Duration::days(days_ago);
    Recipe {
        id: id.to_owned(),
        name: name.to_owned(),
        user_id,
        description: Some(format!("Demo recipe: {name}")),
        servings: Some(4),
        created_at: created,
        updated_at: created,
        ingredients: vec![
            RecipeIngredient {
                name: "olive oil".into(),
                quantity: Some("2 tbsp".into()),
                position: 0,
            },
            RecipeIngredient {
                name: "salt".into(),
                quantity: Some("to taste".into()),
                position: 1,
            },
        ],
        steps: vec![
            RecipeStep {
                position: 0,
                instruction: "Prepare the ingredients.".into(),
            },
            RecipeStep {
                position: 1,
                instruction: "Cook and serve.".into(),
            },
        ],
        tags: tags.iter().map(|&t| t.to_owned()).collect(),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    LoggingConfig::from_env().init()?;

    let database = Database::new(&args.database_url)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to open database: {e}"))?;

    let alice = database.create_user("alice@example.com", false).await?;
    let bob = database.create_user("bob@example.com", false).await?;
    let admin = database.create_user("admin@example.com", true).await?;

    database
        .create_household("Demo Household", &[alice.id, bob.id])
        .await?;

    let recipes = [
        demo_recipe("r-pasta", "Weeknight Pasta", Some(alice.id), &["dinner", "easy"], 1),
        demo_recipe("r-curry", "Chickpea Curry", Some(alice.id), &["dinner", "vegan"], 3),
        demo_recipe("r-toast", "Avocado Toast", Some(bob.id), &["breakfast", "easy"], 2),
        demo_recipe("r-bread", "Shared Sourdough", None, &["baking"], 7),
    ];
    for recipe in &recipes {
        database.insert_recipe(recipe).await?;
    }

    let key_manager = ApiKeyManager::new();
    let key_data = key_manager.generate_api_key();
    database
        .create_api_key(alice.id, "Demo key", &key_data)
        .await?;

    let session_token = Uuid::new_v4().to_string();
    database
        .create_session(alice.id, &session_token, Utc::now() + Duration::days(30))
        .await?;

    tracing::info!(
        users = 3,
        recipes = recipes.len(),
        "Seeded demo data into {}",
        args.database_url
    );

    println!("Seeded demo data.");
    println!("  alice@example.com (household member, owns 2 recipes)");
    println!("  bob@example.com   (household member, owns 1 recipe)");
    println!("  admin@example.com (server admin, id {})", admin.id);
    println!();
    println!("API key for alice (shown once): {}", key_data.full_key);
    println!("Session cookie:  larder_session={session_token}");
    println!();
    println!("Try: curl -H 'x-api-key: {}' 'http://localhost:8081/api/recipes?limit=10'", key_data.full_key);

    Ok(())
}
