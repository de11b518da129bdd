// ABOUTME: Route module organization for Larder HTTP endpoints
// ABOUTME: Provides route definitions by domain with thin handlers delegating to services
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Larder Project

//! Route modules for the Larder server.
//!
//! Each domain module contains only route definitions and thin handler
//! functions that delegate to service layers.

/// Dashboard UI fragment routes
pub mod dashboard;
/// Health check routes
pub mod health;
/// Recipe REST API routes
pub mod recipes;

use crate::resources::ServerResources;
use axum::Router;
use std::sync::Arc;
use tower_http::trace::TraceLayer;

/// Build the full application router
#[must_use]
pub fn router(resources: Arc<ServerResources>) -> Router {
    Router::new()
        .merge(recipes::RecipeApiRoutes::routes(resources.clone()))
        .merge(dashboard::DashboardRoutes::routes())
        .merge(health::HealthRoutes::routes(resources))
        .layer(TraceLayer::new_for_http())
}
