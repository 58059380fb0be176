use std::sync::Arc;

use steward_core::{AppError, AppResult, RoleId};
use steward_domain::{ResourceCatalog, Role, RoleInput, RoleListQuery, RolePage};
use tracing::{info, warn};

use crate::role_editor::{DraftMode, SubmitTicket};
use crate::role_ports::RoleRepository;

/// Application service for role administration.
#[derive(Clone)]
pub struct RoleService {
    catalog: Arc<ResourceCatalog>,
    repository: Arc<dyn RoleRepository>,
}

impl RoleService {
    /// Creates a new service from required dependencies.
    #[must_use]
    pub fn new(catalog: Arc<ResourceCatalog>, repository: Arc<dyn RoleRepository>) -> Self {
        Self {
            catalog,
            repository,
        }
    }

    /// Returns the catalog used to validate grants.
    #[must_use]
    pub fn catalog(&self) -> &Arc<ResourceCatalog> {
        &self.catalog
    }

    /// Lists roles with search, sorting and pagination.
    pub async fn list_roles(&self, query: RoleListQuery) -> AppResult<RolePage> {
        query.validate()?;
        self.repository.list_roles(&query).await
    }

    /// Returns one role or `NotFound`.
    pub async fn find_role(&self, role_id: RoleId) -> AppResult<Role> {
        self.repository
            .find_role(role_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("role '{role_id}' does not exist")))
    }

    /// Validates and persists a new role.
    pub async fn create_role(&self, input: RoleInput) -> AppResult<Role> {
        let input = input.validate(&self.catalog)?;
        let role = self.repository.create_role(input).await?;

        info!(role_id = %role.id(), role_name = %role.name(), "role created");
        Ok(role)
    }

    /// Validates and fully replaces an existing role.
    pub async fn update_role(&self, role_id: RoleId, input: RoleInput) -> AppResult<Role> {
        let input = input.validate(&self.catalog)?;
        let role = self
            .repository
            .update_role(role_id, input)
            .await
            .inspect_err(|error| {
                if matches!(error, AppError::NotFound(_)) {
                    warn!(role_id = %role_id, "update targeted a missing role");
                }
            })?;

        info!(role_id = %role.id(), role_name = %role.name(), "role updated");
        Ok(role)
    }

    /// Deletes a role. Deleting twice reports `NotFound` the second time.
    pub async fn delete_role(&self, role_id: RoleId) -> AppResult<()> {
        self.repository.delete_role(role_id).await?;

        info!(role_id = %role_id, "role deleted");
        Ok(())
    }

    /// Persists an editor submission through create or update.
    pub async fn submit(&self, ticket: SubmitTicket) -> AppResult<Role> {
        let SubmitTicket { mode, input } = ticket;
        match mode {
            DraftMode::Create => self.create_role(input).await,
            DraftMode::Edit(role_id) => self.update_role(role_id, input).await,
        }
    }
}
