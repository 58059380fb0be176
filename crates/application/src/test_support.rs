use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::Mutex;

use steward_core::{AppError, AppResult, RoleId};
use steward_domain::{
    PermissionMap, Resource, ResourceCatalog, Role, RoleListQuery, RolePage, ValidatedRoleInput,
};

use crate::{RoleRepository, RoleService};

#[derive(Default)]
pub(crate) struct FakeRoleRepository {
    pub(crate) roles: Mutex<Vec<Role>>,
    pub(crate) next_error: Mutex<Option<AppError>>,
    pub(crate) writes: Mutex<u32>,
}

impl FakeRoleRepository {
    async fn take_error(&self) -> AppResult<()> {
        match self.next_error.lock().await.take() {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl RoleRepository for FakeRoleRepository {
    async fn list_roles(&self, query: &RoleListQuery) -> AppResult<RolePage> {
        self.take_error().await?;
        Ok(query.apply(self.roles.lock().await.clone()))
    }

    async fn find_role(&self, role_id: RoleId) -> AppResult<Option<Role>> {
        Ok(self
            .roles
            .lock()
            .await
            .iter()
            .find(|role| role.id() == role_id)
            .cloned())
    }

    async fn create_role(&self, input: ValidatedRoleInput) -> AppResult<Role> {
        self.take_error().await?;
        *self.writes.lock().await += 1;
        let role = Role::create(RoleId::new(), input, Utc::now());
        self.roles.lock().await.push(role.clone());
        Ok(role)
    }

    async fn update_role(&self, role_id: RoleId, input: ValidatedRoleInput) -> AppResult<Role> {
        self.take_error().await?;
        let mut roles = self.roles.lock().await;
        let Some(position) = roles.iter().position(|role| role.id() == role_id) else {
            return Err(AppError::NotFound(format!("role '{role_id}' does not exist")));
        };
        *self.writes.lock().await += 1;
        let updated = roles.remove(position).replaced(input, Utc::now());
        roles.insert(position, updated.clone());
        Ok(updated)
    }

    async fn delete_role(&self, role_id: RoleId) -> AppResult<()> {
        self.take_error().await?;
        let mut roles = self.roles.lock().await;
        let before = roles.len();
        roles.retain(|role| role.id() != role_id);
        if roles.len() == before {
            return Err(AppError::NotFound(format!("role '{role_id}' does not exist")));
        }
        *self.writes.lock().await += 1;
        Ok(())
    }
}

/// Catalog with a donations resource limited to two actions and a blog.
pub(crate) fn small_catalog() -> Arc<ResourceCatalog> {
    let resources = vec![
        Resource::new(
            "donations",
            "Donations",
            "Donation records.",
            "Financial",
            ["view", "manage_campaigns"],
        ),
        Resource::new(
            "blog",
            "Blog",
            "Blog posts.",
            "Content",
            ["view", "create", "publish"],
        ),
    ]
    .into_iter()
    .collect::<AppResult<Vec<_>>>()
    .and_then(ResourceCatalog::new);

    assert!(resources.is_ok());
    Arc::new(resources.unwrap_or_else(|_| unreachable!()))
}

pub(crate) fn service_with_repository() -> (RoleService, Arc<FakeRoleRepository>) {
    let repository = Arc::new(FakeRoleRepository::default());
    let service = RoleService::new(small_catalog(), repository.clone());
    (service, repository)
}

pub(crate) fn grants(pairs: &[(&str, &str)]) -> PermissionMap {
    PermissionMap::from_grants(pairs.iter().copied())
}
