// ABOUTME: Dashboard UI fragment routes for the recipe creation control
// ABOUTME: Serves the Add Recipe dropdown with Import and Create actions
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Larder Project

//! Dashboard creation control.
//!
//! Server-rendered fragment with two responsive variants: a full
//! "Add Recipe" button on desktop and an icon-only button on mobile.
//! Each exposes an Import action (opens the import modal) and a Create
//! action (navigates to the creation route). Presentation only.

use axum::{response::Html, routing::get, Router};

/// Creation route targeted by the Create action
const CREATE_RECIPE_PATH: &str = "/recipes/new";

/// Dashboard fragment routes
pub struct DashboardRoutes;

impl DashboardRoutes {
    /// Create all dashboard routes
    pub fn routes() -> Router {
        Router::new().route(
            "/dashboard/create-control",
            get(Self::handle_create_control),
        )
    }

    async fn handle_create_control() -> Html<String> {
        Html(render_create_control())
    }
}

/// Render the create-recipe control fragment
#[must_use]
pub fn render_create_control() -> String {
    format!(
        r#"<div class="create-recipe-control">
  <!-- Desktop -->
  <div class="dropdown hidden md:block" data-placement="bottom-end">
    <button class="btn btn-primary rounded-full font-medium" data-dropdown-trigger>
      <span class="icon icon-plus"></span> Add Recipe
    </button>
    <ul class="dropdown-menu" role="menu" aria-label="Add recipe options">
      <li role="menuitem">
        <button data-action="open-import-modal">
          <span class="icon icon-import"></span> Import
        </button>
      </li>
      <li role="menuitem">
        <a href="{path}">
          <span class="icon icon-plus"></span> Create
        </a>
      </li>
    </ul>
  </div>
  <!-- Mobile - icon only -->
  <div class="dropdown md:hidden" data-placement="bottom-end">
    <button class="btn btn-primary btn-icon rounded-full" data-dropdown-trigger aria-label="Add recipe">
      <span class="icon icon-plus"></span>
    </button>
    <ul class="dropdown-menu" role="menu" aria-label="Add recipe options">
      <li role="menuitem">
        <button data-action="open-import-modal">
          <span class="icon icon-import"></span> Import
        </button>
      </li>
      <li role="menuitem">
        <a href="{path}">
          <span class="icon icon-plus"></span> Create
        </a>
      </li>
    </ul>
  </div>
</div>
"#,
        path = CREATE_RECIPE_PATH
    )
}
