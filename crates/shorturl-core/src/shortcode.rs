use serde::{Deserialize, Serialize};
use std::fmt::Display;

/// The token addressing a mapping and forming its public short link.
///
/// Short codes are not validated on the client. Whatever the operator types
/// is sent to the backend, which decides whether it is acceptable.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ShortCode(String);

impl ShortCode {
    pub fn new(code: impl Into<String>) -> Self {
        Self(code.into())
    }

    /// Returns the short code as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The short link path, relative to the service host.
    pub fn path(&self) -> String {
        format!("/{}", self.0)
    }

    /// Generates the full short link based on the provided host or base URL.
    pub fn to_url(&self, base_url: &str) -> String {
        format!("{}/{}", base_url.trim_end_matches('/'), self.0)
    }

    /// The code percent-encoded for use as a single URL path segment.
    pub fn to_path_segment(&self) -> String {
        urlencoding::encode(&self.0).into_owned()
    }
}

impl Display for ShortCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ShortCode {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for ShortCode {
    fn from(value: String) -> Self {
        Self(value)
    }
}
