use serde::Deserialize;
use steward_domain::PermissionSource;

/// Incoming payload for navigation filtering. A missing source sees nothing.
#[derive(Debug, Default, Deserialize)]
pub struct NavigationRequest {
    #[serde(default)]
    pub source: Option<PermissionSource>,
}
