use axum::Json;
use axum::extract::State;
use steward_core::ApiEnvelope;

use crate::dto::CatalogResponse;
use crate::state::AppState;

pub async fn catalog_handler(State(state): State<AppState>) -> Json<ApiEnvelope<CatalogResponse>> {
    let catalog = state.role_service.catalog();
    Json(ApiEnvelope::ok(CatalogResponse::from(catalog.as_ref())))
}
