use serde::Serialize;
use steward_domain::{Resource, ResourceCatalog};

/// API representation of one protected resource.
#[derive(Debug, Serialize)]
pub struct ResourceResponse {
    pub name: String,
    pub title: String,
    pub description: String,
    pub category: String,
    pub actions: Vec<String>,
}

/// API representation of the resource catalog.
#[derive(Debug, Serialize)]
pub struct CatalogResponse {
    pub categories: Vec<String>,
    pub resources: Vec<ResourceResponse>,
}

impl From<&Resource> for ResourceResponse {
    fn from(resource: &Resource) -> Self {
        Self {
            name: resource.name().to_owned(),
            title: resource.title().to_owned(),
            description: resource.description().to_owned(),
            category: resource.category().to_owned(),
            actions: resource.actions().to_vec(),
        }
    }
}

impl From<&ResourceCatalog> for CatalogResponse {
    fn from(catalog: &ResourceCatalog) -> Self {
        Self {
            categories: catalog
                .list_categories()
                .into_iter()
                .map(ToOwned::to_owned)
                .collect(),
            resources: catalog
                .resources()
                .iter()
                .map(ResourceResponse::from)
                .collect(),
        }
    }
}
