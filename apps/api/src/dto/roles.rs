mod conversions;
mod types;

pub use types::{RoleListParams, RolePageResponse, RoleResponse, SaveRoleRequest};
