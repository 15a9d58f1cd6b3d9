// src/catalog/user_info.rs
use serde::{Deserialize, Serialize};
use std::fmt;

/// Typed key for the opaque `userInfo` metadata a source payload may carry.
///
/// Construction never fails; unrecognized keys are kept as-is under the
/// wrapper so third-party sources can pass arbitrary metadata through.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SourceUserInfoKey(String);

impl SourceUserInfoKey {
    /// Key under which a source may carry a Patreon access token.
    pub const PATREON_ACCESS_TOKEN: &'static str = "patreonAccessToken";

    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SourceUserInfoKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for SourceUserInfoKey {
    fn from(key: &str) -> Self {
        Self::new(key)
    }
}
