use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::catalog::ResourceCatalog;
use crate::permissions::{PermissionMap, PermissionRequirement};
use crate::role::Role;

/// Grants supplied by the session layer for the current user.
///
/// `None` in evaluator signatures stands for "not loaded yet" and always
/// denies.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum PermissionSource {
    /// Inline resource/action map attached to the session.
    Grants(PermissionMap),
    /// Roles assigned to the user. Deleted roles are simply absent.
    Roles(Vec<Role>),
}

/// Normalized grants evaluated by every access check.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EffectivePermissions {
    grants: PermissionMap,
    role_names: BTreeSet<String>,
}

impl EffectivePermissions {
    /// Normalizes a permission source. An absent source yields no grants.
    #[must_use]
    pub fn from_source(source: Option<&PermissionSource>) -> Self {
        match source {
            None => Self::default(),
            Some(PermissionSource::Grants(grants)) => {
                let mut normalized = PermissionMap::new();
                normalized.merge(grants);
                Self {
                    grants: normalized,
                    role_names: BTreeSet::new(),
                }
            }
            Some(PermissionSource::Roles(roles)) => {
                let mut grants = PermissionMap::new();
                let mut role_names = BTreeSet::new();
                for role in roles {
                    grants.merge(role.permissions());
                    role_names.insert(role.name().trim().to_lowercase());
                }
                Self { grants, role_names }
            }
        }
    }

    /// Returns whether the action is explicitly granted on the resource.
    #[must_use]
    pub fn is_granted(&self, resource: &str, action: &str) -> bool {
        self.grants.is_granted(resource, action)
    }

    /// Returns whether the requirement is satisfied.
    #[must_use]
    pub fn satisfies(&self, requirement: &PermissionRequirement) -> bool {
        self.is_granted(requirement.resource.as_str(), requirement.action.as_str())
    }

    /// Returns whether one of the user's roles carries the given name.
    #[must_use]
    pub fn has_role_named(&self, name: &str) -> bool {
        self.role_names.contains(name.trim().to_lowercase().as_str())
    }

    /// Returns the merged grants.
    #[must_use]
    pub fn grants(&self) -> &PermissionMap {
        &self.grants
    }

    /// Drops grants the catalog no longer defines.
    #[must_use]
    pub fn restricted_to(&self, catalog: &ResourceCatalog) -> Self {
        Self {
            grants: self.grants.restricted_to(catalog),
            role_names: self.role_names.clone(),
        }
    }
}

/// Decides whether the source grants `action` on `resource`.
///
/// There are no wildcards and no implied actions.
#[must_use]
pub fn has_permission(source: Option<&PermissionSource>, resource: &str, action: &str) -> bool {
    EffectivePermissions::from_source(source).is_granted(resource, action)
}

/// Returns whether at least one requirement is granted.
#[must_use]
pub fn has_any_permission(
    source: Option<&PermissionSource>,
    requirements: &[PermissionRequirement],
) -> bool {
    let effective = EffectivePermissions::from_source(source);
    requirements
        .iter()
        .any(|requirement| effective.satisfies(requirement))
}

/// Returns whether every requirement is granted. An empty list is never satisfied.
#[must_use]
pub fn has_all_permissions(
    source: Option<&PermissionSource>,
    requirements: &[PermissionRequirement],
) -> bool {
    let effective = EffectivePermissions::from_source(source);
    !requirements.is_empty()
        && requirements
            .iter()
            .all(|requirement| effective.satisfies(requirement))
}

/// Like [`has_permission`] but ignores grants the catalog does not define.
#[must_use]
pub fn has_catalog_permission(
    catalog: &ResourceCatalog,
    source: Option<&PermissionSource>,
    resource: &str,
    action: &str,
) -> bool {
    catalog
        .get_resource(resource)
        .is_some_and(|definition| definition.supports(action))
        && has_permission(source, resource, action)
}
