use steward_core::AppError;
use steward_domain::{Role, RoleInput, RoleListQuery, RolePage};

use super::types::{RoleListParams, RolePageResponse, RoleResponse, SaveRoleRequest};

impl TryFrom<RoleListParams> for RoleListQuery {
    type Error = AppError;

    fn try_from(params: RoleListParams) -> Result<Self, Self::Error> {
        RoleListQuery::from_params(
            params.search.as_deref(),
            params.sort_by.as_deref(),
            params.sort_order.as_deref(),
            params.page,
            params.limit,
        )
    }
}

impl From<SaveRoleRequest> for RoleInput {
    fn from(request: SaveRoleRequest) -> Self {
        Self {
            name: request.name,
            permissions: request.permissions,
        }
    }
}

impl From<Role> for RoleResponse {
    fn from(role: Role) -> Self {
        Self {
            id: role.id().to_string(),
            name: role.name().to_owned(),
            permissions: role.permissions().clone(),
            created_at: role.created_at().to_rfc3339(),
            updated_at: role.updated_at().to_rfc3339(),
        }
    }
}

impl From<RolePage> for RolePageResponse {
    fn from(page: RolePage) -> Self {
        let total_pages = page.total_pages();
        Self {
            roles: page.roles.into_iter().map(RoleResponse::from).collect(),
            total: page.total,
            page: page.page,
            limit: page.limit,
            total_pages,
        }
    }
}
