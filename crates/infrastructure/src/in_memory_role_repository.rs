use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use steward_application::RoleRepository;
use steward_core::{AppError, AppResult, RoleId};
use steward_domain::{Role, RoleListQuery, RolePage, ValidatedRoleInput};
use tokio::sync::RwLock;

/// In-memory role repository used by the reference API and tests.
#[derive(Debug, Default)]
pub struct InMemoryRoleRepository {
    roles: RwLock<HashMap<RoleId, Role>>,
}

impl InMemoryRoleRepository {
    /// Creates an empty in-memory repository.
    #[must_use]
    pub fn new() -> Self {
        Self {
            roles: RwLock::new(HashMap::new()),
        }
    }
}

fn ensure_unique_name(
    roles: &HashMap<RoleId, Role>,
    name: &str,
    except: Option<RoleId>,
) -> AppResult<()> {
    let taken = roles.values().any(|role| {
        Some(role.id()) != except && role.name().to_lowercase() == name.to_lowercase()
    });

    if taken {
        return Err(AppError::Conflict(format!("role '{name}' already exists")));
    }

    Ok(())
}

#[async_trait]
impl RoleRepository for InMemoryRoleRepository {
    async fn list_roles(&self, query: &RoleListQuery) -> AppResult<RolePage> {
        let roles = self.roles.read().await;
        Ok(query.apply(roles.values().cloned()))
    }

    async fn find_role(&self, role_id: RoleId) -> AppResult<Option<Role>> {
        Ok(self.roles.read().await.get(&role_id).cloned())
    }

    async fn create_role(&self, input: ValidatedRoleInput) -> AppResult<Role> {
        let mut roles = self.roles.write().await;
        ensure_unique_name(&roles, input.name(), None)?;

        let role = Role::create(RoleId::new(), input, Utc::now());
        roles.insert(role.id(), role.clone());
        Ok(role)
    }

    async fn update_role(&self, role_id: RoleId, input: ValidatedRoleInput) -> AppResult<Role> {
        let mut roles = self.roles.write().await;
        let Some(existing) = roles.get(&role_id).cloned() else {
            return Err(AppError::NotFound(format!(
                "role '{role_id}' does not exist"
            )));
        };
        ensure_unique_name(&roles, input.name(), Some(role_id))?;

        let updated = existing.replaced(input, Utc::now());
        roles.insert(role_id, updated.clone());
        Ok(updated)
    }

    async fn delete_role(&self, role_id: RoleId) -> AppResult<()> {
        self.roles
            .write()
            .await
            .remove(&role_id)
            .map(|_| ())
            .ok_or_else(|| AppError::NotFound(format!("role '{role_id}' does not exist")))
    }
}
