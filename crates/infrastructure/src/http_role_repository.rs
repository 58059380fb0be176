use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, StatusCode, Url};
use serde::de::DeserializeOwned;
use steward_application::RoleRepository;
use steward_core::{ApiEnvelope, AppError, AppResult, RoleId};
use steward_domain::{Role, RoleListQuery, RolePage, ValidatedRoleInput};
use tracing::{debug, warn};

/// Role repository backed by the persistence HTTP API.
#[derive(Debug, Clone)]
pub struct HttpRoleRepository {
    http_client: Client,
    base_url: Url,
}

impl HttpRoleRepository {
    /// Creates a repository from an existing client and the API base URL.
    pub fn new(http_client: Client, base_url: &str) -> AppResult<Self> {
        let mut base_url = Url::parse(base_url).map_err(|error| {
            AppError::Validation(format!("invalid role API base url '{base_url}': {error}"))
        })?;
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }

        Ok(Self {
            http_client,
            base_url,
        })
    }

    /// Creates a repository with its own client and request timeout.
    pub fn connect(base_url: &str, timeout: Duration) -> AppResult<Self> {
        let http_client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|error| AppError::Internal(format!("failed to build http client: {error}")))?;

        Self::new(http_client, base_url)
    }

    fn endpoint(&self, path: &str) -> AppResult<Url> {
        self.base_url
            .join(path)
            .map_err(|error| AppError::Internal(format!("invalid role API path '{path}': {error}")))
    }

    fn role_url(&self, role_id: RoleId) -> AppResult<Url> {
        self.endpoint(&format!("api/roles/{role_id}"))
    }

    fn list_url(&self, query: &RoleListQuery) -> AppResult<Url> {
        let mut url = self.endpoint("api/roles")?;
        {
            let mut pairs = url.query_pairs_mut();
            if let Some(search) = query.search.as_deref() {
                pairs.append_pair("search", search);
            }
            pairs
                .append_pair("sort_by", query.sort_by.as_str())
                .append_pair("sort_order", query.sort_order.as_str())
                .append_pair("page", &query.page.to_string())
                .append_pair("limit", &query.limit.to_string());
        }
        Ok(url)
    }

    async fn send<T>(&self, request: RequestBuilder) -> AppResult<(u16, ApiEnvelope<T>)>
    where
        T: DeserializeOwned,
    {
        let response = request.send().await.map_err(|error| {
            warn!(error = %error, "role API request failed");
            AppError::Network(format!("failed to reach role API: {error}"))
        })?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|error| AppError::Network(format!("failed to read role API response: {error}")))?;

        debug!(status = status.as_u16(), "role API responded");
        decode_envelope(status, &body).map(|envelope| (status.as_u16(), envelope))
    }
}

/// Parses an envelope body, falling back to the status when it is not one.
fn decode_envelope<T>(status: StatusCode, body: &str) -> AppResult<ApiEnvelope<T>>
where
    T: DeserializeOwned,
{
    match serde_json::from_str::<ApiEnvelope<T>>(body) {
        Ok(envelope) => Ok(envelope),
        Err(error) if status.is_success() => Err(AppError::Internal(format!(
            "role API returned an unreadable body: {error}"
        ))),
        Err(_) => {
            let detail = if body.trim().is_empty() {
                format!("role API responded with status {status}")
            } else {
                body.trim().to_owned()
            };
            Err(AppError::from_status(status.as_u16(), detail))
        }
    }
}

#[async_trait]
impl RoleRepository for HttpRoleRepository {
    async fn list_roles(&self, query: &RoleListQuery) -> AppResult<RolePage> {
        let url = self.list_url(query)?;
        let (status, envelope) = self.send(self.http_client.get(url)).await?;
        envelope.into_result(status)
    }

    async fn find_role(&self, role_id: RoleId) -> AppResult<Option<Role>> {
        let url = self.role_url(role_id)?;
        match self.send::<Role>(self.http_client.get(url)).await {
            Ok((status, _)) if status == StatusCode::NOT_FOUND.as_u16() => Ok(None),
            Ok((status, envelope)) => envelope.into_optional(status),
            Err(AppError::NotFound(_)) => Ok(None),
            Err(error) => Err(error),
        }
    }

    async fn create_role(&self, input: ValidatedRoleInput) -> AppResult<Role> {
        let url = self.endpoint("api/roles")?;
        let request = self.http_client.post(url).json(&input.into_input());
        let (status, envelope) = self.send(request).await?;
        envelope.into_result(status)
    }

    async fn update_role(&self, role_id: RoleId, input: ValidatedRoleInput) -> AppResult<Role> {
        let url = self.role_url(role_id)?;
        let request = self.http_client.put(url).json(&input.into_input());
        let (status, envelope) = self.send(request).await?;
        envelope.into_result(status)
    }

    async fn delete_role(&self, role_id: RoleId) -> AppResult<()> {
        let url = self.role_url(role_id)?;
        let (status, envelope) = self
            .send::<serde_json::Value>(self.http_client.delete(url))
            .await?;
        envelope.into_optional(status).map(|_| ())
    }
}

#[cfg(test)]
mod tests;
