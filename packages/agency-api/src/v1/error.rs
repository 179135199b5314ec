use std::fmt;

use derive_more::Error;
use http::StatusCode;
use serde::{Deserialize, Serialize};

/// A non-success response from the backend.
///
/// The HTTP client wraps this in a [`color_eyre::Report`]; callers that need
/// to react to specific failures (an expired session, a validation error)
/// can recover it with `report.downcast_ref::<ApiError>()`.
#[derive(Clone, Eq, PartialEq, Debug, Error)]
#[non_exhaustive]
pub struct ApiError {
    /// The HTTP status code of the response.
    pub status: StatusCode,

    /// The human-readable message extracted from the response body.
    pub message: String,

    /// Per-field validation messages, when the backend reported any.
    pub fields: Vec<FieldError>,
}

impl ApiError {
    /// Build the error from a response status and its raw body.
    pub fn from_response(status: StatusCode, body: &str) -> Self {
        let (message, fields) = super::envelope::error_details(status, body);
        Self {
            status,
            message,
            fields,
        }
    }

    /// The session token was missing, invalid or expired.
    pub fn is_unauthorized(&self) -> bool {
        self.status == StatusCode::UNAUTHORIZED
    }

    /// The session is valid but not allowed to perform the operation.
    pub fn is_forbidden(&self) -> bool {
        self.status == StatusCode::FORBIDDEN
    }

    pub fn is_not_found(&self) -> bool {
        self.status == StatusCode::NOT_FOUND
    }

    /// The backend rejected the submitted record.
    pub fn is_validation(&self) -> bool {
        self.status == StatusCode::UNPROCESSABLE_ENTITY || !self.fields.is_empty()
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.message, self.status)?;
        for field in &self.fields {
            write!(f, "\n  - {field}")?;
        }
        Ok(())
    }
}

/// A validation message attached to a single field.
#[derive(Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug, Serialize, Deserialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}
