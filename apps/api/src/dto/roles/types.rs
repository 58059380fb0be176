use serde::{Deserialize, Serialize};
use steward_domain::PermissionMap;

/// Query string of the role listing endpoint.
#[derive(Debug, Default, Deserialize)]
pub struct RoleListParams {
    pub search: Option<String>,
    pub sort_by: Option<String>,
    pub sort_order: Option<String>,
    pub page: Option<u32>,
    pub limit: Option<u32>,
}

/// Incoming payload for role creation and full replacement.
#[derive(Debug, Deserialize)]
pub struct SaveRoleRequest {
    pub name: String,
    #[serde(default)]
    pub permissions: PermissionMap,
}

/// API representation of a role.
#[derive(Debug, Serialize)]
pub struct RoleResponse {
    pub id: String,
    pub name: String,
    pub permissions: PermissionMap,
    pub created_at: String,
    pub updated_at: String,
}

/// API representation of one page of roles.
#[derive(Debug, Serialize)]
pub struct RolePageResponse {
    pub roles: Vec<RoleResponse>,
    pub total: u64,
    pub page: u32,
    pub limit: u32,
    pub total_pages: u64,
}
