// ABOUTME: Health check route for operational monitoring
// ABOUTME: Reports service identity and database connectivity
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Larder Project

use crate::resources::ServerResources;
use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use chrono::Utc;
use serde::Serialize;
use std::sync::Arc;

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub service: &'static str,
    pub version: &'static str,
    pub timestamp: i64,
}

/// Health check routes
pub struct HealthRoutes;

impl HealthRoutes {
    /// Create all health routes
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route("/health", get(Self::handle_health))
            .with_state(resources)
    }

    async fn handle_health(State(resources): State<Arc<ServerResources>>) -> Response {
        let (status, code) = match resources.database.ping().await {
            Ok(()) => ("healthy", StatusCode::OK),
            Err(e) => {
                tracing::error!(error = %e, "Health check database ping failed");
                ("unhealthy", StatusCode::SERVICE_UNAVAILABLE)
            }
        };

        let body = HealthResponse {
            status,
            service: "larder-server",
            version: env!("CARGO_PKG_VERSION"),
            timestamp: Utc::now().timestamp(),
        };

        (code, Json(body)).into_response()
    }
}
