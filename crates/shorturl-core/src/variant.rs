use crate::codec::{CreateBody, ListFormat, Payload};
use crate::mapping::Mapping;
use crate::shortcode::ShortCode;
use std::fmt::Display;

const LEGACY_BASE: &str = "/api";
const V1_BASE: &str = "/v1";

/// The backend path and authentication convention the panel talks to.
///
/// | Variant | List | Create | Delete | Probe |
/// |---|---|---|---|---|
/// | `Configurable` | `GET {base}/urls` | `POST {base}/url/{code}` | `DELETE {base}/url/{code}` | `GET {base}` is 200 |
/// | `Legacy` | `GET /api/all` | `POST /api/new` | `DELETE /api/{code}` | none |
/// | `V1` | `GET /v1/urls` | `POST /v1/url/{code}` | `DELETE /v1/url/{code}` | `GET /v1` body is `ok` |
///
/// Returned targets are either absolute URLs (a `Configurable` base may be
/// one) or origin-relative paths; clients resolve them against the origin.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiVariant {
    /// Keyed API under an operator supplied `query_url`.
    Configurable { base: String },
    /// Unauthenticated `/api` backend with a plaintext list format.
    Legacy,
    /// Keyed `/v1` backend.
    V1,
}

/// How a probe response is judged when authenticating a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProbeRule {
    /// The probe must answer HTTP 200.
    StatusOk,
    /// The probe body must be exactly `ok`.
    BodyOk,
}

impl ProbeRule {
    pub fn accepts(&self, status: u16, body: &str) -> bool {
        match self {
            ProbeRule::StatusOk => status == 200,
            ProbeRule::BodyOk => body == "ok",
        }
    }
}

impl ApiVariant {
    pub fn configurable(base: impl Into<String>) -> Self {
        Self::Configurable { base: base.into() }
    }

    fn base(&self) -> &str {
        match self {
            ApiVariant::Configurable { base } => base.trim_end_matches('/'),
            ApiVariant::Legacy => LEGACY_BASE,
            ApiVariant::V1 => V1_BASE,
        }
    }

    /// Whether every request must carry an `x-api-key` header.
    pub fn requires_api_key(&self) -> bool {
        !matches!(self, ApiVariant::Legacy)
    }

    /// The authentication probe target, if the variant has one.
    pub fn probe_path(&self) -> Option<String> {
        match self {
            ApiVariant::Legacy => None,
            ApiVariant::Configurable { .. } | ApiVariant::V1 => Some(self.base().to_string()),
        }
    }

    pub fn probe_rule(&self) -> Option<ProbeRule> {
        match self {
            ApiVariant::Configurable { .. } => Some(ProbeRule::StatusOk),
            ApiVariant::Legacy => None,
            ApiVariant::V1 => Some(ProbeRule::BodyOk),
        }
    }

    pub fn list_path(&self) -> String {
        match self {
            ApiVariant::Legacy => format!("{LEGACY_BASE}/all"),
            _ => format!("{}/urls", self.base()),
        }
    }

    pub fn list_format(&self) -> ListFormat {
        match self {
            ApiVariant::Legacy => ListFormat::DelimitedText,
            _ => ListFormat::Json,
        }
    }

    pub fn create_path(&self, code: &ShortCode) -> String {
        match self {
            ApiVariant::Legacy => format!("{LEGACY_BASE}/new"),
            _ => format!("{}/url/{}", self.base(), code.to_path_segment()),
        }
    }

    /// The request body creating `mapping`.
    pub fn create_payload(&self, mapping: &Mapping) -> Payload {
        match self {
            ApiVariant::Legacy => Payload::Text(format!(
                "{};{}",
                mapping.long_url, mapping.short_code
            )),
            _ => Payload::Json(CreateBody {
                url: mapping.long_url.clone(),
            }),
        }
    }

    pub fn delete_path(&self, code: &ShortCode) -> String {
        match self {
            ApiVariant::Legacy => format!("{LEGACY_BASE}/{}", code.to_path_segment()),
            _ => format!("{}/url/{}", self.base(), code.to_path_segment()),
        }
    }

    /// The access log summary target. The legacy backend has none.
    pub fn logs_path(&self) -> Option<String> {
        match self {
            ApiVariant::Legacy => None,
            _ => Some(format!("{}/logs", self.base())),
        }
    }
}

impl Display for ApiVariant {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ApiVariant::Configurable { base } => write!(f, "configurable({base})"),
            ApiVariant::Legacy => write!(f, "api"),
            ApiVariant::V1 => write!(f, "v1"),
        }
    }
}
