//! Domain entities and invariants.

#![forbid(unsafe_code)]

mod access;
mod catalog;
mod navigation;
mod permissions;
mod role;

pub use access::{
    EffectivePermissions, PermissionSource, has_all_permissions, has_any_permission,
    has_catalog_permission, has_permission,
};
pub use catalog::{Resource, ResourceCatalog};
pub use navigation::{NavItem, dashboard_navigation, filter_navigation, filter_with};
pub use permissions::{PermissionMap, PermissionRequirement};
pub use role::{
    MAX_ROLE_PAGE_LIMIT, ROLE_COPY_SUFFIX, Role, RoleInput, RoleListQuery, RolePage,
    RoleSortField, SortDirection, ValidatedRoleInput, copy_name,
};
