use axum::Json;
use axum::extract::State;
use steward_core::ApiEnvelope;
use steward_domain::NavItem;

use crate::dto::NavigationRequest;
use crate::state::AppState;

pub async fn navigation_handler(
    State(state): State<AppState>,
    Json(payload): Json<NavigationRequest>,
) -> Json<ApiEnvelope<Vec<NavItem>>> {
    let items = state
        .navigation_service
        .navigation_for(payload.source.as_ref());

    Json(ApiEnvelope::ok(items))
}
