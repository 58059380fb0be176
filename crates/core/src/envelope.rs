use serde::{Deserialize, Serialize};

use crate::{AppError, AppResult};

/// Response body returned by every persistence API endpoint.
///
/// `message` and `errors` are surfaced to users as-is, so clients keep them
/// intact when converting a failed envelope back into an [`AppError`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(bound(deserialize = "T: Deserialize<'de>"))]
pub struct ApiEnvelope<T> {
    /// Whether the request succeeded.
    pub success: bool,
    /// Payload for successful requests.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    /// Human-readable outcome message.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// Individual validation failures, if any.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<String>,
}

impl<T> ApiEnvelope<T> {
    /// Creates a successful envelope carrying data.
    #[must_use]
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            message: None,
            errors: Vec::new(),
        }
    }

    /// Creates a successful envelope without data.
    #[must_use]
    pub fn empty(message: impl Into<String>) -> Self {
        Self {
            success: true,
            data: None,
            message: Some(message.into()),
            errors: Vec::new(),
        }
    }

    /// Creates a failed envelope from an application error.
    #[must_use]
    pub fn failure(error: &AppError) -> Self {
        let errors = match error {
            AppError::Validation(detail) => vec![detail.clone()],
            _ => Vec::new(),
        };

        Self {
            success: false,
            data: None,
            message: Some(error.detail().to_owned()),
            errors,
        }
    }

    /// Returns the optional payload or the error reported by the backend.
    pub fn into_optional(self, status: u16) -> AppResult<Option<T>> {
        if self.success {
            return Ok(self.data);
        }

        Err(AppError::from_status(status, self.failure_detail()))
    }

    /// Returns the payload or the error reported by the backend.
    pub fn into_result(self, status: u16) -> AppResult<T> {
        self.into_optional(status)?.ok_or_else(|| {
            AppError::Internal("response envelope reported success without data".to_owned())
        })
    }

    fn failure_detail(&self) -> String {
        let message = self
            .message
            .as_deref()
            .map(str::trim)
            .filter(|value| !value.is_empty());
        let extra_errors: Vec<&str> = self
            .errors
            .iter()
            .map(String::as_str)
            .filter(|error| Some(*error) != message)
            .collect();

        match (message, extra_errors.is_empty()) {
            (Some(message), true) => message.to_owned(),
            (Some(message), false) => format!("{message}: {}", extra_errors.join("; ")),
            (None, false) => extra_errors.join("; "),
            (None, true) => "request failed without a message".to_owned(),
        }
    }
}
