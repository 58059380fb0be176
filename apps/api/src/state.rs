use steward_application::{NavigationService, RoleService};

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub role_service: RoleService,
    pub navigation_service: NavigationService,
}
