use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use reqwest::{Client, Method, RequestBuilder, Url};
use shorturl_core::{
    AccessLog, AdminApi, ApiVariant, CoreError, Mapping, Payload, Result, ShortCode,
};
use tracing::{debug, trace, warn};

/// Header carrying the session's API key.
pub const API_KEY_HEADER: &str = "x-api-key";

/// HTTP implementation of [`AdminApi`] for every [`ApiVariant`].
///
/// Endpoint targets produced by the variant are resolved against `origin`,
/// the address the admin page was served from. Keyed variants attach the
/// `x-api-key` header to every request.
#[derive(Debug, Clone)]
pub struct HttpAdminClient {
    http: Client,
    origin: Url,
    variant: ApiVariant,
    api_key: Option<String>,
}

impl HttpAdminClient {
    /// Creates a client for the backend reachable at `origin`.
    pub fn new(origin: &str, variant: ApiVariant, api_key: Option<String>) -> Result<Self> {
        let origin = Url::parse(origin)
            .map_err(|e| CoreError::InvalidUrl(format!("origin '{origin}': {e}")))?;
        Ok(Self {
            http: Client::new(),
            origin,
            variant,
            api_key,
        })
    }

    /// Replaces the underlying reqwest client, e.g. to set timeouts or TLS options.
    pub fn with_http_client(mut self, http: Client) -> Self {
        self.http = http;
        self
    }

    pub fn variant(&self) -> &ApiVariant {
        &self.variant
    }

    fn resolve(&self, target: &str) -> Result<Url> {
        self.origin
            .join(target)
            .map_err(|e| CoreError::InvalidUrl(format!("target '{target}': {e}")))
    }

    fn request(&self, method: Method, target: &str) -> Result<RequestBuilder> {
        let url = self.resolve(target)?;
        trace!(%method, %url, "building request");

        let mut request = self.http.request(method, url);
        if self.variant.requires_api_key() {
            if let Some(ref api_key) = self.api_key {
                request = request.header(API_KEY_HEADER, api_key);
            }
        }
        Ok(request)
    }

    /// Sends the request and returns the status and body, whatever the status.
    async fn send(&self, request: RequestBuilder) -> Result<(u16, String)> {
        let response = request.send().await.map_err(map_reqwest_error)?;
        let status = response.status().as_u16();
        let body = response.text().await.map_err(map_reqwest_error)?;
        debug!(status, body_len = body.len(), "received response");
        Ok((status, body))
    }

    /// Sends the request and fails with [`CoreError::Rejected`] on a non-2xx status.
    async fn send_checked(&self, request: RequestBuilder) -> Result<String> {
        let (status, body) = self.send(request).await?;
        if !(200..300).contains(&status) {
            warn!(status, body = %body, "backend rejected request");
            return Err(CoreError::Rejected { status, body });
        }
        Ok(body)
    }
}

fn map_reqwest_error(err: reqwest::Error) -> CoreError {
    let message = err.to_string();
    if err.is_decode() {
        CoreError::Decode(message)
    } else {
        CoreError::Transport(message)
    }
}

#[async_trait]
impl AdminApi for HttpAdminClient {
    async fn authorize(&self) -> Result<bool> {
        let (Some(target), Some(rule)) = (self.variant.probe_path(), self.variant.probe_rule())
        else {
            return Ok(true);
        };

        let (status, body) = self.send(self.request(Method::GET, &target)?).await?;
        let accepted = rule.accepts(status, &body);
        debug!(status, accepted, "authentication probe finished");
        Ok(accepted)
    }

    async fn list(&self) -> Result<Vec<Mapping>> {
        let target = self.variant.list_path();
        let body = self
            .send_checked(self.request(Method::GET, &target)?)
            .await?;
        let mappings = self.variant.list_format().decode(&body)?;
        debug!(count = mappings.len(), "fetched mappings");
        Ok(mappings)
    }

    async fn create(&self, mapping: &Mapping) -> Result<()> {
        let target = self.variant.create_path(&mapping.short_code);
        let request = self.request(Method::POST, &target)?;
        let request = match self.variant.create_payload(mapping) {
            Payload::Json(body) => request.json(&body),
            Payload::Text(body) => request.header(CONTENT_TYPE, "text/plain").body(body),
        };

        self.send_checked(request).await?;
        debug!(code = %mapping.short_code, "created mapping");
        Ok(())
    }

    async fn delete(&self, code: &ShortCode) -> Result<()> {
        let target = self.variant.delete_path(code);
        self.send_checked(self.request(Method::DELETE, &target)?)
            .await?;
        debug!(code = %code, "deleted mapping");
        Ok(())
    }

    async fn access_logs(&self) -> Result<Vec<AccessLog>> {
        let target = self.variant.logs_path().ok_or_else(|| {
            CoreError::Unsupported(format!("access logs on the {} backend", self.variant))
        })?;
        let body = self
            .send_checked(self.request(Method::GET, &target)?)
            .await?;
        Ok(serde_json::from_str(&body)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client(variant: ApiVariant, key: Option<&str>) -> HttpAdminClient {
        HttpAdminClient::new("http://127.0.0.1:8081/", variant, key.map(str::to_string))
            .unwrap()
    }

    #[test]
    fn rejects_unparseable_origin() {
        let err = HttpAdminClient::new("not a url", ApiVariant::V1, None).unwrap_err();
        assert!(matches!(err, CoreError::InvalidUrl(_)));
    }

    #[test]
    fn relative_targets_resolve_against_origin() {
        let c = client(ApiVariant::V1, None);
        let url = c.resolve(&ApiVariant::V1.list_path()).unwrap();
        assert_eq!(url.as_str(), "http://127.0.0.1:8081/v1/urls");
    }

    #[test]
    fn absolute_targets_replace_origin() {
        let variant = ApiVariant::configurable("http://other.example:9000/admin");
        let c = client(variant.clone(), Some("k"));
        let url = c.resolve(&variant.list_path()).unwrap();
        assert_eq!(url.as_str(), "http://other.example:9000/admin/urls");
    }

    #[test]
    fn keyed_variants_attach_api_key() {
        let c = client(ApiVariant::V1, Some("secret"));
        let request = c.request(Method::GET, "/v1/urls").unwrap().build().unwrap();
        assert_eq!(request.headers()[API_KEY_HEADER], "secret");
    }

    #[test]
    fn legacy_variant_sends_no_key() {
        let c = client(ApiVariant::Legacy, Some("secret"));
        let request = c.request(Method::GET, "/api/all").unwrap().build().unwrap();
        assert!(request.headers().get(API_KEY_HEADER).is_none());
    }

    #[tokio::test]
    async fn legacy_variant_authorizes_without_probe() {
        // nothing listens on this origin, so any request would fail
        let c = HttpAdminClient::new("http://127.0.0.1:9/", ApiVariant::Legacy, None).unwrap();
        assert!(c.authorize().await.unwrap());
    }

    #[tokio::test]
    async fn legacy_variant_has_no_access_logs() {
        let c = HttpAdminClient::new("http://127.0.0.1:9/", ApiVariant::Legacy, None).unwrap();
        let err = c.access_logs().await.unwrap_err();
        assert!(matches!(err, CoreError::Unsupported(_)));
    }
}
