use std::collections::{HashMap, HashSet};
use std::sync::LazyLock;

use serde::Serialize;
use steward_core::{AppError, AppResult, NonEmptyString};

use crate::permissions::PermissionMap;

/// Protected area of the dashboard together with the actions it supports.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Resource {
    name: String,
    title: String,
    description: String,
    category: String,
    actions: Vec<String>,
}

impl Resource {
    /// Creates a validated resource definition.
    pub fn new<A, S>(
        name: impl Into<String>,
        title: impl Into<String>,
        description: impl Into<String>,
        category: impl Into<String>,
        actions: A,
    ) -> AppResult<Self>
    where
        A: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let name = trimmed(name)?;
        let actions: Vec<String> = actions
            .into_iter()
            .map(|action| action.into().trim().to_owned())
            .collect();
        if actions.is_empty() {
            return Err(AppError::Validation(format!(
                "resource '{name}' must declare at least one action"
            )));
        }

        let mut seen = HashSet::with_capacity(actions.len());
        for action in &actions {
            if action.is_empty() {
                return Err(AppError::Validation(format!(
                    "resource '{name}' declares an empty action"
                )));
            }
            if !seen.insert(action.as_str()) {
                return Err(AppError::Validation(format!(
                    "resource '{name}' declares action '{action}' twice"
                )));
            }
        }

        Ok(Self {
            name,
            title: trimmed(title)?,
            description: description.into().trim().to_owned(),
            category: trimmed(category)?,
            actions,
        })
    }

    /// Returns the stable resource name.
    #[must_use]
    pub fn name(&self) -> &str {
        self.name.as_str()
    }

    /// Returns the display title.
    #[must_use]
    pub fn title(&self) -> &str {
        self.title.as_str()
    }

    /// Returns the display description.
    #[must_use]
    pub fn description(&self) -> &str {
        self.description.as_str()
    }

    /// Returns the category used to group resources into tabs.
    #[must_use]
    pub fn category(&self) -> &str {
        self.category.as_str()
    }

    /// Returns the valid actions in declaration order.
    #[must_use]
    pub fn actions(&self) -> &[String] {
        self.actions.as_slice()
    }

    /// Returns whether the action is valid for this resource.
    #[must_use]
    pub fn supports(&self, action: &str) -> bool {
        self.actions.iter().any(|candidate| candidate == action)
    }
}

/// Catalog keys and labels are matched exactly, so surrounding whitespace is
/// dropped before they are stored.
fn trimmed(value: impl Into<String>) -> AppResult<String> {
    NonEmptyString::new(value.into().trim()).map(String::from)
}

/// Registry of every protected resource known to the application.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceCatalog {
    resources: Vec<Resource>,
    index: HashMap<String, usize>,
}

impl ResourceCatalog {
    /// Creates a catalog, rejecting duplicate resource names.
    pub fn new(resources: Vec<Resource>) -> AppResult<Self> {
        let mut index = HashMap::with_capacity(resources.len());
        for (position, resource) in resources.iter().enumerate() {
            if index.insert(resource.name().to_owned(), position).is_some() {
                return Err(AppError::Validation(format!(
                    "resource '{}' is declared twice in the catalog",
                    resource.name()
                )));
            }
        }

        Ok(Self { resources, index })
    }

    /// Returns the catalog compiled into the dashboard.
    #[must_use]
    pub fn standard() -> &'static Self {
        &STANDARD_CATALOG
    }

    /// Returns every resource in declaration order.
    #[must_use]
    pub fn resources(&self) -> &[Resource] {
        self.resources.as_slice()
    }

    /// Looks up a resource by name.
    #[must_use]
    pub fn get_resource(&self, name: &str) -> Option<&Resource> {
        self.index
            .get(name)
            .and_then(|position| self.resources.get(*position))
    }

    /// Returns resources in one category. Unknown categories yield an empty list.
    #[must_use]
    pub fn resources_by_category(&self, category: &str) -> Vec<&Resource> {
        self.resources
            .iter()
            .filter(|resource| resource.category() == category)
            .collect()
    }

    /// Returns distinct categories in first-seen order.
    #[must_use]
    pub fn list_categories(&self) -> Vec<&str> {
        let mut categories: Vec<&str> = Vec::new();
        for resource in &self.resources {
            if !categories.contains(&resource.category()) {
                categories.push(resource.category());
            }
        }
        categories
    }

    /// Ensures the resource exists and supports the action.
    pub fn validate_grant(&self, resource: &str, action: &str) -> AppResult<()> {
        let Some(definition) = self.get_resource(resource) else {
            return Err(AppError::Validation(format!(
                "unknown resource '{resource}'"
            )));
        };

        if !definition.supports(action) {
            return Err(AppError::Validation(format!(
                "action '{action}' is not valid for resource '{resource}'"
            )));
        }

        Ok(())
    }

    /// Ensures every grant in the map references a catalog resource/action pair.
    pub fn validate_permissions(&self, permissions: &PermissionMap) -> AppResult<()> {
        for (resource, actions) in permissions.iter() {
            for action in actions {
                self.validate_grant(resource, action)?;
            }
        }
        Ok(())
    }
}

static STANDARD_CATALOG: LazyLock<ResourceCatalog> = LazyLock::new(|| {
    let resources = vec![
        standard_resource(
            "dashboard",
            "Dashboard",
            "Overview charts and key figures.",
            "Overview",
            &["view", "read_reports"],
        ),
        standard_resource(
            "members",
            "Members",
            "Member directory and membership records.",
            "People",
            &["view", "create", "update", "delete", "export", "manage_roles"],
        ),
        standard_resource(
            "roles",
            "Roles",
            "Role definitions and their permission grants.",
            "People",
            &["view", "create", "update", "delete"],
        ),
        standard_resource(
            "donations",
            "Donations",
            "Donation records, receipts and fundraising campaigns.",
            "Financial",
            &["view", "create", "refund", "read_reports", "manage_campaigns"],
        ),
        standard_resource(
            "blog",
            "Blog",
            "Blog posts and drafts.",
            "Content",
            &["view", "create", "update", "delete", "publish"],
        ),
        standard_resource(
            "gallery",
            "Gallery",
            "Photo albums and media uploads.",
            "Content",
            &["view", "upload", "update", "delete"],
        ),
        standard_resource(
            "events",
            "Events",
            "Public events and registrations.",
            "Engagement",
            &["view", "create", "update", "delete", "publish"],
        ),
        standard_resource(
            "meetings",
            "Meetings",
            "Online meetings and schedules.",
            "Engagement",
            &["view", "create", "join", "manage"],
        ),
        standard_resource(
            "notifications",
            "Notifications",
            "Announcements sent to members.",
            "Engagement",
            &["view", "send"],
        ),
        standard_resource(
            "settings",
            "Settings",
            "Organization profile and site configuration.",
            "System",
            &["view", "update"],
        ),
    ];

    let index = resources
        .iter()
        .enumerate()
        .map(|(position, resource)| (resource.name().to_owned(), position))
        .collect();

    ResourceCatalog { resources, index }
});

// Literal catalog entries are checked by the `standard_catalog_is_valid` test.
fn standard_resource(
    name: &str,
    title: &str,
    description: &str,
    category: &str,
    actions: &[&str],
) -> Resource {
    Resource {
        name: name.to_owned(),
        title: title.to_owned(),
        description: description.to_owned(),
        category: category.to_owned(),
        actions: actions.iter().map(|action| (*action).to_owned()).collect(),
    }
}

#[cfg(test)]
mod tests {
    use crate::PermissionMap;

    use super::{Resource, ResourceCatalog};

    #[test]
    fn standard_catalog_is_valid() {
        let standard = ResourceCatalog::standard();
        let mut rebuilt = Vec::new();
        for resource in standard.resources() {
            let checked = Resource::new(
                resource.name(),
                resource.title(),
                resource.description(),
                resource.category(),
                resource.actions().to_vec(),
            );
            assert!(checked.is_ok(), "invalid resource {}", resource.name());
            rebuilt.push(checked.unwrap_or_else(|_| unreachable!()));
        }

        assert!(ResourceCatalog::new(rebuilt).is_ok());
    }

    #[test]
    fn resource_rejects_duplicate_actions() {
        let resource = Resource::new("blog", "Blog", "", "Content", ["view", "view"]);
        assert!(resource.is_err());
    }

    #[test]
    fn resource_requires_actions() {
        let resource = Resource::new("blog", "Blog", "", "Content", Vec::<String>::new());
        assert!(resource.is_err());
    }

    #[test]
    fn resource_fields_are_trimmed() {
        let resource = Resource::new(" blog ", " Blog ", " Posts ", " Content ", [" view "]);
        assert!(resource.is_ok());
        let resource = resource.unwrap_or_else(|_| unreachable!());

        assert_eq!(resource.name(), "blog");
        assert_eq!(resource.title(), "Blog");
        assert_eq!(resource.description(), "Posts");
        assert_eq!(resource.category(), "Content");
        assert_eq!(resource.actions(), ["view".to_owned()]);

        let catalog = ResourceCatalog::new(vec![resource]).unwrap_or_else(|_| unreachable!());
        assert!(catalog.validate_grant("blog", "view").is_ok());
        assert_eq!(catalog.list_categories(), vec!["Content"]);
        assert_eq!(catalog.resources_by_category("Content").len(), 1);
    }

    #[test]
    fn whitespace_only_fields_are_rejected() {
        assert!(Resource::new("  ", "Blog", "", "Content", ["view"]).is_err());
        assert!(Resource::new("blog", "Blog", "", "\t", ["view"]).is_err());
        assert!(Resource::new("blog", "Blog", "", "Content", ["view", " "]).is_err());
        assert!(Resource::new("blog", "Blog", "", "Content", ["view", " view"]).is_err());
    }

    #[test]
    fn catalog_rejects_duplicate_names() {
        let first = Resource::new("blog", "Blog", "", "Content", ["view"]);
        let second = Resource::new("blog", "Posts", "", "Content", ["create"]);
        let catalog = ResourceCatalog::new(vec![
            first.unwrap_or_else(|_| unreachable!()),
            second.unwrap_or_else(|_| unreachable!()),
        ]);
        assert!(catalog.is_err());
    }

    #[test]
    fn unknown_category_yields_empty_list() {
        let catalog = ResourceCatalog::standard();
        assert!(catalog.resources_by_category("Nope").is_empty());
        assert_eq!(catalog.resources_by_category("Content").len(), 2);
    }

    #[test]
    fn categories_are_distinct_in_declaration_order() {
        let catalog = ResourceCatalog::standard();
        assert_eq!(
            catalog.list_categories(),
            vec!["Overview", "People", "Financial", "Content", "Engagement", "System"]
        );
    }

    #[test]
    fn validate_permissions_reports_unknown_pairs() {
        let catalog = ResourceCatalog::standard();

        let mut permissions = PermissionMap::new();
        permissions.grant("donations", "view");
        assert!(catalog.validate_permissions(&permissions).is_ok());

        permissions.grant("donations", "launder");
        assert!(catalog.validate_permissions(&permissions).is_err());

        let mut stale = PermissionMap::new();
        stale.grant("vault", "view");
        assert!(catalog.validate_permissions(&stale).is_err());
    }
}
