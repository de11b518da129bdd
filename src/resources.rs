// ABOUTME: Centralized resource container for dependency injection
// ABOUTME: Holds shared database, authenticator, and repository handles behind Arcs
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Larder Project

//! Centralized resource container for dependency injection.
//!
//! Repository and authenticator fields are trait objects so tests can
//! assemble resources around fakes.

use crate::auth::{Authenticator, DbAuthenticator};
use crate::config::environment::ServerConfig;
use crate::database::{Database, HouseholdResolver, RecipeRepository};
use std::sync::Arc;

/// Shared server resources, cloned cheaply into handlers
#[derive(Clone)]
pub struct ServerResources {
    pub database: Arc<Database>,
    pub authenticator: Arc<dyn Authenticator>,
    pub recipes: Arc<dyn RecipeRepository>,
    pub households: Arc<dyn HouseholdResolver>,
    pub config: Arc<ServerConfig>,
}

impl ServerResources {
    /// Assemble production resources over one database handle
    #[must_use]
    pub fn new(database: Database, config: Arc<ServerConfig>) -> Self {
        let database = Arc::new(database);

        Self {
            authenticator: Arc::new(DbAuthenticator::new(database.clone())),
            recipes: database.clone(),
            households: database.clone(),
            database,
            config,
        }
    }
}
