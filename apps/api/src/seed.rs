use steward_application::RoleService;
use steward_core::AppResult;
use steward_domain::{PermissionMap, RoleInput, RoleListQuery};
use tracing::info;

/// Roles created on first start when the store is empty.
pub async fn seed_default_roles(role_service: &RoleService) -> AppResult<()> {
    let existing = role_service.list_roles(RoleListQuery::default()).await?;
    if existing.total > 0 {
        info!(existing_roles = existing.total, "skipping default role seed");
        return Ok(());
    }

    for input in default_roles(role_service) {
        let role = role_service.create_role(input).await?;
        info!(role_id = %role.id(), role_name = %role.name(), "seeded default role");
    }

    Ok(())
}

fn default_roles(role_service: &RoleService) -> Vec<RoleInput> {
    let mut administrator = PermissionMap::new();
    for resource in role_service.catalog().resources() {
        administrator.set_actions(resource.name(), resource.actions().iter().cloned());
    }

    let editor = PermissionMap::from_grants([
        ("dashboard", "view"),
        ("blog", "view"),
        ("blog", "create"),
        ("blog", "update"),
        ("blog", "publish"),
        ("gallery", "view"),
        ("gallery", "upload"),
        ("gallery", "update"),
        ("events", "view"),
        ("events", "create"),
        ("events", "update"),
    ]);

    let finance = PermissionMap::from_grants([
        ("dashboard", "view"),
        ("dashboard", "read_reports"),
        ("donations", "view"),
        ("donations", "create"),
        ("donations", "read_reports"),
        ("donations", "manage_campaigns"),
        ("members", "view"),
        ("members", "export"),
    ]);

    vec![
        RoleInput {
            name: "Administrator".to_owned(),
            permissions: administrator,
        },
        RoleInput {
            name: "Editor".to_owned(),
            permissions: editor,
        },
        RoleInput {
            name: "Finance".to_owned(),
            permissions: finance,
        },
    ]
}
