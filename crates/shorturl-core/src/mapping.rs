use crate::shortcode::ShortCode;
use serde::{Deserialize, Serialize};

/// A short code and the destination it redirects to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Mapping {
    /// The code addressing this mapping.
    pub short_code: ShortCode,
    /// The destination URL. Arbitrary operator text, not validated here.
    #[serde(rename = "url")]
    pub long_url: String,
}

impl Mapping {
    pub fn new(short_code: impl Into<ShortCode>, long_url: impl Into<String>) -> Self {
        Self {
            short_code: short_code.into(),
            long_url: long_url.into(),
        }
    }
}

/// Summarised access statistics for one short code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessLog {
    pub code: ShortCode,
    /// `None` once the mapping has been deleted.
    pub url: Option<String>,
    pub last_access: Option<String>,
    pub access_count: u16,
}
