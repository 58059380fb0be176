use serde::{Deserialize, Serialize};

use crate::access::{EffectivePermissions, PermissionSource};
use crate::permissions::PermissionRequirement;

/// Entry of the dashboard sidebar.
///
/// A node is gated by `permission` when present. The legacy `roles` gate is
/// only consulted when a node declares no `permission`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NavItem {
    /// Display title.
    pub title: String,
    /// Link target, absent for pure section headers.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub href: Option<String>,
    /// Optional icon name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    /// Fine-grained gate.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub permission: Option<PermissionRequirement>,
    /// Legacy gate listing role names allowed to see the entry.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub roles: Vec<String>,
    /// Nested entries.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<NavItem>,
}

impl NavItem {
    /// Creates a link gated by one resource/action pair.
    #[must_use]
    pub fn link(
        title: impl Into<String>,
        href: impl Into<String>,
        resource: impl Into<String>,
        action: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            href: Some(href.into()),
            icon: None,
            permission: Some(PermissionRequirement::new(resource, action)),
            roles: Vec::new(),
            children: Vec::new(),
        }
    }

    /// Creates a section that is visible only through its children.
    #[must_use]
    pub fn section(title: impl Into<String>, children: Vec<NavItem>) -> Self {
        Self {
            title: title.into(),
            href: None,
            icon: None,
            permission: None,
            roles: Vec::new(),
            children,
        }
    }

    /// Sets the icon name.
    #[must_use]
    pub fn with_icon(mut self, icon: impl Into<String>) -> Self {
        self.icon = Some(icon.into());
        self
    }

    /// Sets nested entries.
    #[must_use]
    pub fn with_children(mut self, children: Vec<NavItem>) -> Self {
        self.children = children;
        self
    }

    /// Sets the legacy role-name gate.
    #[must_use]
    pub fn with_roles<I, S>(mut self, roles: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.roles = roles.into_iter().map(Into::into).collect();
        self
    }

    fn direct_gate_passes(&self, effective: &EffectivePermissions) -> bool {
        match &self.permission {
            Some(requirement) => effective.satisfies(requirement),
            None => self
                .roles
                .iter()
                .any(|role_name| effective.has_role_named(role_name)),
        }
    }

    /// Iterates every fine-grained gate in the subtree.
    pub fn requirements(&self) -> Box<dyn Iterator<Item = &PermissionRequirement> + '_> {
        Box::new(
            self.permission
                .iter()
                .chain(self.children.iter().flat_map(NavItem::requirements)),
        )
    }
}

/// Prunes the tree to the entries the source may access.
///
/// Children are filtered first. A node survives when its own gate passes or
/// when at least one child survives. Sibling order is preserved.
#[must_use]
pub fn filter_navigation(tree: &[NavItem], source: Option<&PermissionSource>) -> Vec<NavItem> {
    filter_with(tree, &EffectivePermissions::from_source(source))
}

/// Same as [`filter_navigation`] over already normalized permissions.
#[must_use]
pub fn filter_with(tree: &[NavItem], effective: &EffectivePermissions) -> Vec<NavItem> {
    tree.iter()
        .filter_map(|item| {
            let children = filter_with(&item.children, effective);
            (item.direct_gate_passes(effective) || !children.is_empty()).then(|| NavItem {
                children,
                ..item.clone()
            })
        })
        .collect()
}

/// Returns the sidebar of the administrative dashboard.
#[must_use]
pub fn dashboard_navigation() -> Vec<NavItem> {
    vec![
        NavItem::link("Dashboard", "/dashboard", "dashboard", "view").with_icon("layout-dashboard"),
        NavItem::section(
            "People",
            vec![
                NavItem::link("Members", "/dashboard/members", "members", "view"),
                NavItem::link("Add member", "/dashboard/members/new", "members", "create"),
                NavItem::link("Roles", "/dashboard/roles", "roles", "view"),
            ],
        )
        .with_icon("users"),
        NavItem::link("Donations", "/dashboard/donations", "donations", "view")
            .with_icon("hand-heart")
            .with_children(vec![
                NavItem::link(
                    "Campaigns",
                    "/dashboard/donations/campaigns",
                    "donations",
                    "manage_campaigns",
                ),
                NavItem::link(
                    "Reports",
                    "/dashboard/donations/reports",
                    "donations",
                    "read_reports",
                ),
            ]),
        NavItem::link("Blog", "/dashboard/blog", "blog", "view")
            .with_icon("newspaper")
            .with_children(vec![NavItem::link(
                "Create",
                "/dashboard/blog/new",
                "blog",
                "create",
            )]),
        NavItem::link("Gallery", "/dashboard/gallery", "gallery", "view").with_icon("images"),
        NavItem::section(
            "Engagement",
            vec![
                NavItem::link("Events", "/dashboard/events", "events", "view"),
                NavItem::link("Meetings", "/dashboard/meetings", "meetings", "view"),
                NavItem::link(
                    "Notifications",
                    "/dashboard/notifications",
                    "notifications",
                    "view",
                ),
            ],
        )
        .with_icon("calendar"),
        NavItem::link("Settings", "/dashboard/settings", "settings", "view").with_icon("settings"),
    ]
}
