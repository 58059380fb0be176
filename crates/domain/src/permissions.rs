use std::collections::{BTreeMap, BTreeSet};
use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};

use crate::catalog::ResourceCatalog;

/// Grants keyed by resource name, each holding the set of granted actions.
///
/// Entries with an empty action set are tolerated while a draft is being
/// edited but are dropped by [`PermissionMap::prune_empty`] before a role is
/// persisted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PermissionMap(BTreeMap<String, BTreeSet<String>>);

impl PermissionMap {
    /// Creates an empty permission map.
    #[must_use]
    pub fn new() -> Self {
        Self(BTreeMap::new())
    }

    /// Builds a map from `(resource, action)` pairs.
    pub fn from_grants<I, R, A>(grants: I) -> Self
    where
        I: IntoIterator<Item = (R, A)>,
        R: Into<String>,
        A: Into<String>,
    {
        let mut map = Self::new();
        for (resource, action) in grants {
            map.grant(resource, action);
        }
        map
    }

    /// Grants an action. Returns `true` when the grant was newly added.
    pub fn grant(&mut self, resource: impl Into<String>, action: impl Into<String>) -> bool {
        self.0
            .entry(resource.into())
            .or_default()
            .insert(action.into())
    }

    /// Revokes an action, dropping the resource entry once it is empty.
    pub fn revoke(&mut self, resource: &str, action: &str) -> bool {
        let Some(actions) = self.0.get_mut(resource) else {
            return false;
        };

        let removed = actions.remove(action);
        if actions.is_empty() {
            self.0.remove(resource);
        }
        removed
    }

    /// Flips membership of one action. Returns whether it is granted afterwards.
    pub fn toggle(&mut self, resource: &str, action: &str) -> bool {
        if self.is_granted(resource, action) {
            self.revoke(resource, action);
            false
        } else {
            self.grant(resource, action);
            true
        }
    }

    /// Grants every action in `all_actions`, or clears the resource when all
    /// of them are already granted. Returns whether they are granted afterwards.
    pub fn toggle_all<S>(&mut self, resource: &str, all_actions: &[S]) -> bool
    where
        S: AsRef<str>,
    {
        let all_granted = all_actions
            .iter()
            .all(|action| self.is_granted(resource, action.as_ref()));
        if all_granted {
            self.clear_resource(resource);
            false
        } else {
            self.set_actions(resource, all_actions.iter().map(|action| action.as_ref()));
            true
        }
    }

    /// Returns whether the action is granted on the resource.
    #[must_use]
    pub fn is_granted(&self, resource: &str, action: &str) -> bool {
        self.0
            .get(resource)
            .is_some_and(|actions| actions.contains(action))
    }

    /// Returns the granted actions for a resource.
    #[must_use]
    pub fn actions(&self, resource: &str) -> Option<&BTreeSet<String>> {
        self.0.get(resource)
    }

    /// Replaces the action set of a resource. An empty set removes the entry.
    pub fn set_actions<I, S>(&mut self, resource: impl Into<String>, actions: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let resource = resource.into();
        let actions: BTreeSet<String> = actions.into_iter().map(Into::into).collect();
        if actions.is_empty() {
            self.0.remove(&resource);
        } else {
            self.0.insert(resource, actions);
        }
    }

    /// Removes every grant for a resource.
    pub fn clear_resource(&mut self, resource: &str) {
        self.0.remove(resource);
    }

    /// Iterates resources and their action sets in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &BTreeSet<String>)> {
        self.0
            .iter()
            .map(|(resource, actions)| (resource.as_str(), actions))
    }

    /// Iterates every `(resource, action)` grant.
    pub fn grants(&self) -> impl Iterator<Item = PermissionRequirement> + '_ {
        self.0.iter().flat_map(|(resource, actions)| {
            actions
                .iter()
                .map(move |action| PermissionRequirement::new(resource.as_str(), action.as_str()))
        })
    }

    /// Returns whether a resource key is present, even with no actions.
    #[must_use]
    pub fn contains_resource(&self, resource: &str) -> bool {
        self.0.contains_key(resource)
    }

    /// Returns whether the map holds no resource entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Drops resource entries whose action set is empty and returns their names.
    pub fn prune_empty(&mut self) -> Vec<String> {
        let empty: Vec<String> = self
            .0
            .iter()
            .filter(|(_, actions)| actions.is_empty())
            .map(|(resource, _)| resource.clone())
            .collect();
        for resource in &empty {
            self.0.remove(resource);
        }
        empty
    }

    /// Adds every grant of `other` to this map.
    pub fn merge(&mut self, other: &Self) {
        for (resource, actions) in &other.0 {
            if actions.is_empty() {
                continue;
            }
            self.0
                .entry(resource.clone())
                .or_default()
                .extend(actions.iter().cloned());
        }
    }

    /// Returns a copy without grants the catalog does not define.
    #[must_use]
    pub fn restricted_to(&self, catalog: &ResourceCatalog) -> Self {
        let mut restricted = Self::new();
        for (resource, actions) in &self.0 {
            let Some(definition) = catalog.get_resource(resource) else {
                continue;
            };
            let valid: BTreeSet<String> = actions
                .iter()
                .filter(|action| definition.supports(action))
                .cloned()
                .collect();
            if !valid.is_empty() {
                restricted.0.insert(resource.clone(), valid);
            }
        }
        restricted
    }
}

/// A single `(resource, action)` requirement.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PermissionRequirement {
    /// Resource name.
    pub resource: String,
    /// Action on the resource.
    pub action: String,
}

impl PermissionRequirement {
    /// Creates a requirement.
    #[must_use]
    pub fn new(resource: impl Into<String>, action: impl Into<String>) -> Self {
        Self {
            resource: resource.into(),
            action: action.into(),
        }
    }
}

impl Display for PermissionRequirement {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        write!(formatter, "{}:{}", self.resource, self.action)
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;
    use serde_json::json;

    use crate::ResourceCatalog;

    use super::PermissionMap;

    #[test]
    fn revoking_last_action_removes_resource_entry() {
        let mut permissions = PermissionMap::from_grants([("blog", "view")]);
        assert!(permissions.revoke("blog", "view"));
        assert!(!permissions.contains_resource("blog"));
    }

    #[test]
    fn prune_drops_only_empty_entries() {
        let parsed: Result<PermissionMap, _> = serde_json::from_value(json!({
            "donations": [],
            "blog": ["view"]
        }));
        assert!(parsed.is_ok());
        let mut permissions = parsed.unwrap_or_default();

        assert_eq!(permissions.prune_empty(), vec!["donations".to_owned()]);
        assert!(!permissions.contains_resource("donations"));
        assert!(permissions.is_granted("blog", "view"));
    }

    #[test]
    fn restricted_to_ignores_stale_grants() {
        let permissions = PermissionMap::from_grants([
            ("blog", "view"),
            ("blog", "teleport"),
            ("vault", "open"),
        ]);

        let restricted = permissions.restricted_to(ResourceCatalog::standard());
        assert_eq!(restricted, PermissionMap::from_grants([("blog", "view")]));
    }

    #[test]
    fn serializes_as_plain_object_of_arrays() {
        let permissions = PermissionMap::from_grants([("events", "view"), ("events", "create")]);
        let value = serde_json::to_value(&permissions).unwrap_or_default();
        assert_eq!(value, json!({ "events": ["create", "view"] }));
    }

    fn identifier() -> impl Strategy<Value = String> {
        "[a-z]{1,5}"
    }

    fn grant_pairs() -> impl Strategy<Value = Vec<(String, String)>> {
        proptest::collection::vec((identifier(), identifier()), 0..16)
    }

    proptest! {
        #[test]
        fn toggling_twice_restores_the_map(
            pairs in grant_pairs(),
            resource in identifier(),
            action in identifier(),
        ) {
            let original = PermissionMap::from_grants(pairs);
            let mut toggled = original.clone();

            let granted = toggled.toggle(&resource, &action);
            prop_assert_eq!(granted, !original.is_granted(&resource, &action));
            toggled.toggle(&resource, &action);

            prop_assert_eq!(toggled, original);
        }

        #[test]
        fn toggle_all_is_binary_and_leaves_no_empty_entry(
            pairs in grant_pairs(),
            resource in identifier(),
            all_actions in proptest::collection::btree_set(identifier(), 1..6),
            granted_share in 0_usize..6,
        ) {
            let all_actions: Vec<String> = all_actions.into_iter().collect();
            let granted_share = granted_share % all_actions.len();

            let mut permissions = PermissionMap::from_grants(
                pairs.into_iter().filter(|(other, _)| other != &resource),
            );
            for action in all_actions.iter().take(granted_share) {
                permissions.grant(resource.as_str(), action.as_str());
            }
            let untouched = permissions.clone();

            prop_assert!(permissions.toggle_all(&resource, all_actions.as_slice()));
            let expected: std::collections::BTreeSet<String> =
                all_actions.iter().cloned().collect();
            prop_assert_eq!(permissions.actions(&resource), Some(&expected));

            prop_assert!(!permissions.toggle_all(&resource, all_actions.as_slice()));
            prop_assert!(!permissions.contains_resource(&resource));
            let serialized =
                serde_json::to_value(&permissions).unwrap_or_else(|_| unreachable!());
            prop_assert!(
                serialized
                    .as_object()
                    .is_some_and(|object| !object.contains_key(resource.as_str()))
            );

            for (other, actions) in untouched.iter().filter(|(other, _)| *other != resource) {
                prop_assert_eq!(permissions.actions(other), Some(actions));
            }
        }
    }
}
