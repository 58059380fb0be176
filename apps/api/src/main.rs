//! Steward API composition root.

#![forbid(unsafe_code)]

mod api_config;
mod api_router;
mod dto;
mod error;
mod handlers;
mod seed;
mod state;

use std::sync::Arc;

use steward_application::{NavigationService, RoleService};
use steward_core::{AppError, AppResult};
use steward_domain::ResourceCatalog;
use steward_infrastructure::InMemoryRoleRepository;
use tracing::info;

use crate::api_config::{ApiConfig, init_tracing};
use crate::state::AppState;

#[tokio::main]
async fn main() -> AppResult<()> {
    dotenvy::dotenv().ok();
    init_tracing();

    let config = ApiConfig::load()?;
    let app_state = build_app_state()?;

    if config.seed_default_roles {
        seed::seed_default_roles(&app_state.role_service).await?;
    }

    let app = api_router::build_router(app_state, &config.frontend_url)?;
    let address = config.socket_address()?;
    let listener = tokio::net::TcpListener::bind(address)
        .await
        .map_err(|error| AppError::Internal(format!("failed to bind listener: {error}")))?;

    info!(%address, "steward-api listening");

    axum::serve(listener, app)
        .await
        .map_err(|error| AppError::Internal(format!("api server error: {error}")))
}

fn build_app_state() -> AppResult<AppState> {
    let catalog = Arc::new(ResourceCatalog::standard().clone());
    let role_repository = Arc::new(InMemoryRoleRepository::new());

    Ok(AppState {
        role_service: RoleService::new(catalog.clone(), role_repository),
        navigation_service: NavigationService::dashboard(catalog)?,
    })
}
