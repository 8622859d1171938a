use clap::{Parser, Subcommand, ValueEnum};
use reqwest::Url;
use shorturl_core::ApiVariant;
use shorturl_panel::session::host_of;
use shorturl_panel::{SessionConfig, SessionError};
use std::fmt::{Display, Formatter};

pub const ORIGIN_ENV: &str = "SHORTURL_ADMIN_ORIGIN";
pub const VARIANT_ENV: &str = "SHORTURL_ADMIN_VARIANT";
pub const BASE_URL_ENV: &str = "SHORTURL_ADMIN_BASE_URL";
pub const API_KEY_ENV: &str = "SHORTURL_ADMIN_API_KEY";
pub const PAGE_URL_ENV: &str = "SHORTURL_ADMIN_PAGE_URL";
pub const HOST_ENV: &str = "SHORTURL_ADMIN_HOST";

pub const DEFAULT_ORIGIN: &str = "http://127.0.0.1:8081/";

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum VariantArg {
    /// Unauthenticated `/api` backend.
    #[value(name = "api")]
    Api,
    /// Keyed `/v1` backend.
    #[value(name = "v1")]
    V1,
    /// Keyed backend under `--base-url`.
    #[value(name = "configurable")]
    Configurable,
}

impl Display for VariantArg {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            VariantArg::Api => write!(f, "api"),
            VariantArg::V1 => write!(f, "v1"),
            VariantArg::Configurable => write!(f, "configurable"),
        }
    }
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Print the current mappings.
    List,
    /// Create a mapping, then print the refreshed mappings.
    Add { long_url: String, short_code: String },
    /// Delete a mapping, then print the refreshed mappings.
    Delete { short_code: String },
    /// Print the mapping table as HTML rows.
    Html,
    /// Print the per-code access summary.
    Logs,
}

#[derive(Debug, Parser)]
#[command(name = "shorturl-admin", about = "Manage short URL mappings")]
pub struct CLI {
    /// Address the backend (and the admin page) is served from.
    #[arg(long, env = ORIGIN_ENV, default_value = DEFAULT_ORIGIN)]
    pub origin: String,

    #[arg(long, env = VARIANT_ENV, value_enum, default_value_t = VariantArg::V1)]
    pub variant: VariantArg,

    /// `query_url` of a configurable backend.
    #[arg(long, env = BASE_URL_ENV, required_if_eq("variant", "configurable"))]
    pub base_url: Option<String>,

    #[arg(long, env = API_KEY_ENV, hide_env_values = true)]
    pub api_key: Option<String>,

    /// Admin page URL carrying the key in its `apikey` query parameter.
    #[arg(long, env = PAGE_URL_ENV)]
    pub page_url: Option<String>,

    /// Host short links are shown against. Defaults to the origin's host.
    #[arg(long, env = HOST_ENV)]
    pub host: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

impl CLI {
    pub fn api_variant(&self) -> Result<ApiVariant, SessionError> {
        Ok(match self.variant {
            VariantArg::Api => ApiVariant::Legacy,
            VariantArg::V1 => ApiVariant::V1,
            VariantArg::Configurable => {
                let base = self.base_url.clone().ok_or(SessionError::MissingBaseUrl)?;
                ApiVariant::configurable(base)
            }
        })
    }

    /// Builds the session: page URL first, explicit flags override it.
    pub fn session(&self) -> Result<SessionConfig, SessionError> {
        let variant = self.api_variant()?;
        let mut session = match self.page_url {
            Some(ref page_url) => SessionConfig::from_page_url(page_url, variant)?,
            None => {
                let origin = Url::parse(&self.origin)
                    .map_err(|e| SessionError::InvalidPageUrl(format!("'{}': {e}", self.origin)))?;
                SessionConfig::builder()
                    .variant(variant)
                    .host(host_of(&origin).unwrap_or_default())
                    .build()
            }
        };

        if let Some(ref api_key) = self.api_key {
            session.api_key = Some(api_key.clone());
        }
        if let Some(ref host) = self.host {
            session.host = host.clone();
        }
        Ok(session)
    }
}
