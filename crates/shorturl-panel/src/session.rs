use crate::error::SessionError;
use reqwest::Url;
use shorturl_core::ApiVariant;
use typed_builder::TypedBuilder;

/// Query parameter the admin page reads its API key from.
pub const API_KEY_QUERY_PARAM: &str = "apikey";

/// Everything a panel session needs, fixed for the session's lifetime.
///
/// The API key is read once, when the session is built, and never refreshed.
///
/// # Example
///
/// ```rust
/// use shorturl_core::ApiVariant;
/// use shorturl_panel::SessionConfig;
///
/// let session = SessionConfig::builder()
///     .variant(ApiVariant::V1)
///     .api_key("secret".to_string())
///     .host("short.example")
///     .build();
/// assert_eq!(session.api_key(), Some("secret"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, TypedBuilder)]
pub struct SessionConfig {
    /// Backend contract to speak.
    #[builder(default = ApiVariant::V1)]
    pub variant: ApiVariant,

    /// Key sent as `x-api-key` by keyed variants.
    #[builder(default, setter(into))]
    pub api_key: Option<String>,

    /// Host short links are displayed against, e.g. `short.example:8080`.
    #[builder(default = "localhost".to_string(), setter(into))]
    pub host: String,
}

impl SessionConfig {
    /// Builds a session from the URL the admin page was loaded from.
    ///
    /// The host is taken from the URL's authority and the key from its
    /// `apikey` query parameter, if present.
    pub fn from_page_url(page_url: &str, variant: ApiVariant) -> Result<Self, SessionError> {
        let url = Url::parse(page_url)
            .map_err(|e| SessionError::InvalidPageUrl(format!("'{page_url}': {e}")))?;
        let api_key = url
            .query_pairs()
            .find(|(name, _)| name == API_KEY_QUERY_PARAM)
            .map(|(_, value)| value.into_owned());

        Ok(Self {
            variant,
            api_key,
            host: host_of(&url).ok_or_else(|| SessionError::MissingHost(page_url.to_string()))?,
        })
    }

    /// The configured key, treating an empty key as absent.
    pub fn api_key(&self) -> Option<&str> {
        self.api_key.as_deref().filter(|key| !key.is_empty())
    }

    /// Whether the session can talk to its backend at all.
    ///
    /// Keyed variants need a non-empty key; the legacy variant needs none.
    pub fn has_credentials(&self) -> bool {
        !self.variant.requires_api_key() || self.api_key().is_some()
    }
}

/// Host and optional port of `url`, the way a browser reports `location.host`.
pub fn host_of(url: &Url) -> Option<String> {
    let host = url.host_str()?;
    Some(match url.port() {
        Some(port) => format!("{host}:{port}"),
        None => host.to_string(),
    })
}
