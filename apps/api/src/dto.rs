mod catalog;
mod navigation;
mod roles;

pub use catalog::{CatalogResponse, ResourceResponse};
pub use navigation::NavigationRequest;
pub use roles::{RoleListParams, RolePageResponse, RoleResponse, SaveRoleRequest};
