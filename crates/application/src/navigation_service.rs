use std::sync::Arc;

use steward_core::{AppError, AppResult};
use steward_domain::{
    EffectivePermissions, NavItem, PermissionSource, ResourceCatalog, dashboard_navigation,
    filter_with, has_catalog_permission,
};
use tracing::debug;

/// Serves the sidebar tree filtered for a caller's permissions.
#[derive(Clone)]
pub struct NavigationService {
    catalog: Arc<ResourceCatalog>,
    tree: Arc<Vec<NavItem>>,
}

impl NavigationService {
    /// Creates a service over a tree whose gates must all name catalog pairs.
    pub fn new(catalog: Arc<ResourceCatalog>, tree: Vec<NavItem>) -> AppResult<Self> {
        for requirement in tree.iter().flat_map(NavItem::requirements) {
            catalog
                .validate_grant(&requirement.resource, &requirement.action)
                .map_err(|error| {
                    AppError::Validation(format!(
                        "navigation gate '{requirement}' is not in the catalog: {}",
                        error.detail()
                    ))
                })?;
        }

        Ok(Self {
            catalog,
            tree: Arc::new(tree),
        })
    }

    /// Creates the service for the standard dashboard sidebar.
    pub fn dashboard(catalog: Arc<ResourceCatalog>) -> AppResult<Self> {
        Self::new(catalog, dashboard_navigation())
    }

    /// Returns the catalog gates are checked against.
    #[must_use]
    pub fn catalog(&self) -> &Arc<ResourceCatalog> {
        &self.catalog
    }

    /// Returns the unfiltered tree.
    #[must_use]
    pub fn tree(&self) -> &[NavItem] {
        self.tree.as_slice()
    }

    /// Returns the entries visible to the source. Stale grants are ignored.
    #[must_use]
    pub fn navigation_for(&self, source: Option<&PermissionSource>) -> Vec<NavItem> {
        let effective = EffectivePermissions::from_source(source).restricted_to(&self.catalog);
        let visible = filter_with(&self.tree, &effective);

        debug!(
            visible_entries = visible.len(),
            total_entries = self.tree.len(),
            "navigation filtered"
        );
        visible
    }

    /// Returns whether the source may perform `action` on `resource`.
    #[must_use]
    pub fn can(&self, source: Option<&PermissionSource>, resource: &str, action: &str) -> bool {
        has_catalog_permission(&self.catalog, source, resource, action)
    }
}
