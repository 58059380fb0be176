use async_trait::async_trait;

use steward_core::{AppResult, RoleId};
use steward_domain::{Role, RoleListQuery, RolePage, ValidatedRoleInput};

/// Persistence port for role definitions.
///
/// Writes only accept [`ValidatedRoleInput`], so every stored role satisfies
/// the catalog invariants.
#[async_trait]
pub trait RoleRepository: Send + Sync {
    /// Lists roles matching the query, with the total match count.
    async fn list_roles(&self, query: &RoleListQuery) -> AppResult<RolePage>;

    /// Finds a role by identifier.
    async fn find_role(&self, role_id: RoleId) -> AppResult<Option<Role>>;

    /// Persists a new role and assigns its identifier.
    async fn create_role(&self, input: ValidatedRoleInput) -> AppResult<Role>;

    /// Fully replaces name and permissions of an existing role.
    async fn update_role(&self, role_id: RoleId, input: ValidatedRoleInput) -> AppResult<Role>;

    /// Deletes a role. Missing roles yield `AppError::NotFound`.
    async fn delete_role(&self, role_id: RoleId) -> AppResult<()>;
}
