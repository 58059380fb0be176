use std::cmp::Ordering;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use steward_core::{AppError, AppResult, NonEmptyString, RoleId};

use crate::catalog::ResourceCatalog;
use crate::permissions::PermissionMap;

/// Suffix appended to the name of a cloned role.
pub const ROLE_COPY_SUFFIX: &str = " (Copy)";

/// Largest page size accepted by role listings.
pub const MAX_ROLE_PAGE_LIMIT: u32 = 100;

/// Named bundle of resource/action grants.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Role {
    id: RoleId,
    name: String,
    permissions: PermissionMap,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl Role {
    /// Creates a role from validated input.
    #[must_use]
    pub fn create(id: RoleId, input: ValidatedRoleInput, now: DateTime<Utc>) -> Self {
        Self {
            id,
            name: input.name.into(),
            permissions: input.permissions,
            created_at: now,
            updated_at: now,
        }
    }

    /// Returns the role with name and permissions fully replaced.
    #[must_use]
    pub fn replaced(self, input: ValidatedRoleInput, now: DateTime<Utc>) -> Self {
        Self {
            id: self.id,
            name: input.name.into(),
            permissions: input.permissions,
            created_at: self.created_at,
            updated_at: now,
        }
    }

    /// Returns the role identifier.
    #[must_use]
    pub fn id(&self) -> RoleId {
        self.id
    }

    /// Returns the role name.
    #[must_use]
    pub fn name(&self) -> &str {
        self.name.as_str()
    }

    /// Returns the granted permissions.
    #[must_use]
    pub fn permissions(&self) -> &PermissionMap {
        &self.permissions
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns the last update timestamp.
    #[must_use]
    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }
}

/// Returns the default name given to a clone of `name`.
#[must_use]
pub fn copy_name(name: &str) -> String {
    format!("{}{ROLE_COPY_SUFFIX}", name.trim())
}

/// Unvalidated role payload submitted for create and update.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleInput {
    /// Role name.
    pub name: String,
    /// Complete desired permission map.
    #[serde(default)]
    pub permissions: PermissionMap,
}

impl RoleInput {
    /// Validates the payload against the catalog.
    ///
    /// Empty action sets are pruned first, so `{donations: []}` is accepted and
    /// stored without a `donations` key.
    pub fn validate(self, catalog: &ResourceCatalog) -> AppResult<ValidatedRoleInput> {
        let name = NonEmptyString::new(self.name.trim())
            .map_err(|_| AppError::Validation("role name must not be empty".to_owned()))?;

        let mut permissions = self.permissions;
        permissions.prune_empty();
        catalog.validate_permissions(&permissions)?;

        Ok(ValidatedRoleInput { name, permissions })
    }
}

/// Role payload that satisfies the catalog invariants.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedRoleInput {
    name: NonEmptyString,
    permissions: PermissionMap,
}

impl ValidatedRoleInput {
    /// Returns the trimmed role name.
    #[must_use]
    pub fn name(&self) -> &str {
        self.name.as_str()
    }

    /// Returns the pruned permission map.
    #[must_use]
    pub fn permissions(&self) -> &PermissionMap {
        &self.permissions
    }

    /// Converts back into a transport payload.
    #[must_use]
    pub fn into_input(self) -> RoleInput {
        RoleInput {
            name: self.name.into(),
            permissions: self.permissions,
        }
    }
}

/// Field used to order role listings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoleSortField {
    /// Role name, case-insensitive.
    #[default]
    Name,
    /// Creation timestamp.
    CreatedAt,
    /// Last update timestamp.
    UpdatedAt,
}

impl RoleSortField {
    /// Returns stable transport value.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::CreatedAt => "created_at",
            Self::UpdatedAt => "updated_at",
        }
    }
}

impl FromStr for RoleSortField {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "name" => Ok(Self::Name),
            "created_at" | "createdAt" => Ok(Self::CreatedAt),
            "updated_at" | "updatedAt" => Ok(Self::UpdatedAt),
            _ => Err(AppError::Validation(format!(
                "unknown role sort field '{value}'"
            ))),
        }
    }
}

/// Sort direction for role listings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortDirection {
    /// Ascending order.
    #[default]
    Asc,
    /// Descending order.
    Desc,
}

impl SortDirection {
    /// Returns stable transport value.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Asc => "asc",
            Self::Desc => "desc",
        }
    }
}

impl FromStr for SortDirection {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.to_ascii_lowercase().as_str() {
            "asc" => Ok(Self::Asc),
            "desc" => Ok(Self::Desc),
            _ => Err(AppError::Validation(format!(
                "unknown sort direction '{value}'"
            ))),
        }
    }
}

/// Search, sort and pagination parameters for role listings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleListQuery {
    /// Case-insensitive substring matched against role names.
    pub search: Option<String>,
    /// Sort field.
    pub sort_by: RoleSortField,
    /// Sort direction.
    pub sort_order: SortDirection,
    /// One-based page number.
    pub page: u32,
    /// Page size.
    pub limit: u32,
}

impl Default for RoleListQuery {
    fn default() -> Self {
        Self {
            search: None,
            sort_by: RoleSortField::Name,
            sort_order: SortDirection::Asc,
            page: 1,
            limit: 10,
        }
    }
}

impl RoleListQuery {
    /// Builds a query from raw transport parameters.
    pub fn from_params(
        search: Option<&str>,
        sort_by: Option<&str>,
        sort_order: Option<&str>,
        page: Option<u32>,
        limit: Option<u32>,
    ) -> AppResult<Self> {
        let defaults = Self::default();
        let query = Self {
            search: search
                .map(str::trim)
                .filter(|value| !value.is_empty())
                .map(ToOwned::to_owned),
            sort_by: sort_by
                .map(RoleSortField::from_str)
                .transpose()?
                .unwrap_or(defaults.sort_by),
            sort_order: sort_order
                .map(SortDirection::from_str)
                .transpose()?
                .unwrap_or(defaults.sort_order),
            page: page.unwrap_or(defaults.page),
            limit: limit.unwrap_or(defaults.limit),
        };
        query.validate()?;
        Ok(query)
    }

    /// Checks pagination bounds.
    pub fn validate(&self) -> AppResult<()> {
        if self.page == 0 {
            return Err(AppError::Validation(
                "page must be greater than or equal to 1".to_owned(),
            ));
        }

        if self.limit == 0 || self.limit > MAX_ROLE_PAGE_LIMIT {
            return Err(AppError::Validation(format!(
                "limit must be between 1 and {MAX_ROLE_PAGE_LIMIT}"
            )));
        }

        Ok(())
    }

    /// Returns the number of matching rows skipped before this page.
    #[must_use]
    pub fn offset(&self) -> usize {
        let page_index = self.page.saturating_sub(1) as usize;
        page_index.saturating_mul(self.limit as usize)
    }

    /// Returns whether the role matches the search term.
    #[must_use]
    pub fn matches(&self, role: &Role) -> bool {
        self.search.as_deref().is_none_or(|search| {
            role.name()
                .to_lowercase()
                .contains(search.to_lowercase().as_str())
        })
    }

    /// Orders two roles according to the sort field and direction.
    #[must_use]
    pub fn compare(&self, left: &Role, right: &Role) -> Ordering {
        let ordering = match self.sort_by {
            RoleSortField::Name => left.name().to_lowercase().cmp(&right.name().to_lowercase()),
            RoleSortField::CreatedAt => left.created_at().cmp(&right.created_at()),
            RoleSortField::UpdatedAt => left.updated_at().cmp(&right.updated_at()),
        }
        .then_with(|| left.id().cmp(&right.id()));

        match self.sort_order {
            SortDirection::Asc => ordering,
            SortDirection::Desc => ordering.reverse(),
        }
    }

    /// Filters, sorts and paginates an in-memory role collection.
    #[must_use]
    pub fn apply(&self, roles: impl IntoIterator<Item = Role>) -> RolePage {
        let mut matching: Vec<Role> = roles.into_iter().filter(|role| self.matches(role)).collect();
        matching.sort_by(|left, right| self.compare(left, right));

        let total = matching.len() as u64;
        let roles = matching
            .into_iter()
            .skip(self.offset())
            .take(self.limit as usize)
            .collect();

        RolePage {
            roles,
            total,
            page: self.page,
            limit: self.limit,
        }
    }
}

/// One page of a role listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RolePage {
    /// Roles on this page.
    pub roles: Vec<Role>,
    /// Number of roles matching the search before pagination.
    pub total: u64,
    /// One-based page number.
    pub page: u32,
    /// Page size.
    pub limit: u32,
}

impl RolePage {
    /// Returns the number of pages needed for all matches.
    #[must_use]
    pub fn total_pages(&self) -> u64 {
        if self.limit == 0 {
            return 0;
        }
        self.total.div_ceil(u64::from(self.limit))
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, TimeZone, Utc};
    use steward_core::{AppError, RoleId};

    use crate::{PermissionMap, ResourceCatalog};

    use super::{Role, RoleInput, RoleListQuery, RoleSortField, SortDirection, copy_name};

    fn role(name: &str, minutes: i64) -> Role {
        let input = RoleInput {
            name: name.to_owned(),
            permissions: PermissionMap::new(),
        }
        .validate(ResourceCatalog::standard());
        assert!(input.is_ok());

        let created = Utc
            .with_ymd_and_hms(2026, 1, 1, 0, 0, 0)
            .single()
            .unwrap_or_else(|| unreachable!())
            + Duration::minutes(minutes);
        Role::create(RoleId::new(), input.unwrap_or_else(|_| unreachable!()), created)
    }

    #[test]
    fn validate_rejects_blank_name() {
        let result = RoleInput {
            name: "   ".to_owned(),
            permissions: PermissionMap::new(),
        }
        .validate(ResourceCatalog::standard());

        assert!(matches!(result, Err(AppError::Validation(message)) if message.contains("name")));
    }

    #[test]
    fn validate_prunes_empty_entries_before_checking_catalog() {
        let raw: Result<PermissionMap, _> = serde_json::from_value(serde_json::json!({
            "donations": [],
            "blog": ["view"]
        }));
        assert!(raw.is_ok());

        let validated = RoleInput {
            name: " Finance ".to_owned(),
            permissions: raw.unwrap_or_default(),
        }
        .validate(ResourceCatalog::standard());

        assert!(validated.is_ok());
        let validated = validated.unwrap_or_else(|_| unreachable!());
        assert_eq!(validated.name(), "Finance");
        assert!(!validated.permissions().contains_resource("donations"));
        assert!(validated.permissions().is_granted("blog", "view"));
    }

    #[test]
    fn validate_rejects_unknown_action() {
        let result = RoleInput {
            name: "Finance".to_owned(),
            permissions: PermissionMap::from_grants([("donations", "embezzle")]),
        }
        .validate(ResourceCatalog::standard());

        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[test]
    fn copy_name_appends_suffix() {
        assert_eq!(copy_name("Finance"), "Finance (Copy)");
    }

    #[test]
    fn unknown_sort_field_is_a_validation_error() {
        let result = RoleListQuery::from_params(None, Some("permissions"), None, None, None);
        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[test]
    fn from_params_accepts_camel_case_timestamp() {
        let query = RoleListQuery::from_params(None, Some("updatedAt"), Some("DESC"), None, None);
        assert!(query.is_ok());
        let query = query.unwrap_or_default();
        assert_eq!(query.sort_by, RoleSortField::UpdatedAt);
        assert_eq!(query.sort_order, SortDirection::Desc);
    }

    #[test]
    fn zero_page_is_rejected() {
        let result = RoleListQuery::from_params(None, None, None, Some(0), None);
        assert!(result.is_err());
    }

    #[test]
    fn apply_searches_case_insensitively_and_counts_before_paging() {
        let roles = vec![
            role("Finance", 0),
            role("Finance Lead", 1),
            role("Editor", 2),
            role("finance intern", 3),
        ];
        let query = RoleListQuery {
            search: Some("FINANCE".to_owned()),
            limit: 2,
            ..RoleListQuery::default()
        };

        let page = query.apply(roles);
        assert_eq!(page.total, 3);
        assert_eq!(page.total_pages(), 2);
        let names: Vec<&str> = page.roles.iter().map(Role::name).collect();
        assert_eq!(names, vec!["Finance", "Finance Lead"]);
    }

    #[test]
    fn apply_sorts_by_timestamp_descending() {
        let roles = vec![role("A", 0), role("B", 10), role("C", 5)];
        let query = RoleListQuery {
            sort_by: RoleSortField::CreatedAt,
            sort_order: SortDirection::Desc,
            ..RoleListQuery::default()
        };

        let page = query.apply(roles);
        let names: Vec<&str> = page.roles.iter().map(Role::name).collect();
        assert_eq!(names, vec!["B", "C", "A"]);
    }
}
