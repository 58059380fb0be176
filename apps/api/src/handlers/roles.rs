use std::str::FromStr;

use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use steward_core::{ApiEnvelope, RoleId};
use steward_domain::RoleListQuery;

use crate::dto::{RoleListParams, RolePageResponse, RoleResponse, SaveRoleRequest};
use crate::error::ApiResult;
use crate::state::AppState;

pub async fn list_roles_handler(
    State(state): State<AppState>,
    Query(params): Query<RoleListParams>,
) -> ApiResult<Json<ApiEnvelope<RolePageResponse>>> {
    let query = RoleListQuery::try_from(params)?;
    let page = state.role_service.list_roles(query).await?;

    Ok(Json(ApiEnvelope::ok(RolePageResponse::from(page))))
}

pub async fn get_role_handler(
    State(state): State<AppState>,
    Path(role_id): Path<String>,
) -> ApiResult<Json<ApiEnvelope<RoleResponse>>> {
    let role_id = RoleId::from_str(role_id.as_str())?;
    let role = state.role_service.find_role(role_id).await?;

    Ok(Json(ApiEnvelope::ok(RoleResponse::from(role))))
}

pub async fn create_role_handler(
    State(state): State<AppState>,
    Json(payload): Json<SaveRoleRequest>,
) -> ApiResult<(StatusCode, Json<ApiEnvelope<RoleResponse>>)> {
    let role = state.role_service.create_role(payload.into()).await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiEnvelope::ok(RoleResponse::from(role))),
    ))
}

pub async fn update_role_handler(
    State(state): State<AppState>,
    Path(role_id): Path<String>,
    Json(payload): Json<SaveRoleRequest>,
) -> ApiResult<Json<ApiEnvelope<RoleResponse>>> {
    let role_id = RoleId::from_str(role_id.as_str())?;
    let role = state
        .role_service
        .update_role(role_id, payload.into())
        .await?;

    Ok(Json(ApiEnvelope::ok(RoleResponse::from(role))))
}

pub async fn delete_role_handler(
    State(state): State<AppState>,
    Path(role_id): Path<String>,
) -> ApiResult<Json<ApiEnvelope<()>>> {
    let role_id = RoleId::from_str(role_id.as_str())?;
    state.role_service.delete_role(role_id).await?;

    Ok(Json(ApiEnvelope::empty("role deleted")))
}
