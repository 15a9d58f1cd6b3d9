//! Error types for the source catalog.

use thiserror::Error;
use url::Url;

/// Result type alias for catalog operations.
pub type Result<T> = std::result::Result<T, CatalogError>;

/// Failures raised while decoding or mutating catalog entities.
///
/// Unresolved news→app references and duplicate bundle identifiers are *not*
/// errors: they are dropped at decode time (and logged at `warn`).
#[derive(Error, Debug)]
pub enum CatalogError {
    /// The URL has no host, so no stable identifier can be derived from it.
    /// Raised both when decoding a payload and when relocating a source.
    #[error("source URL `{url}` has no host")]
    MalformedSourceUrl { url: Url },

    #[error("missing required field `{field}`")]
    MissingRequiredField { field: &'static str },

    #[error("malformed field `{field}`: {reason}")]
    MalformedField { field: &'static str, reason: String },

    /// The payload is not valid JSON, or a non-core field has the wrong shape.
    #[error("payload error: {0}")]
    Payload(#[from] serde_json::Error),
}

impl CatalogError {
    /// Which payload field the error points at, if any. Lets callers surface
    /// a precise diagnostic without matching on variants.
    pub fn field(&self) -> Option<&str> {
        match self {
            CatalogError::MalformedSourceUrl { .. } => Some("sourceURL"),
            CatalogError::MissingRequiredField { field } => Some(field),
            CatalogError::MalformedField { field, .. } => Some(field),
            CatalogError::Payload(_) => None,
        }
    }
}
