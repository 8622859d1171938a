use crate::error::Result;
use crate::mapping::{AccessLog, Mapping};
use crate::shortcode::ShortCode;
use async_trait::async_trait;

/// The backend operations the admin panel relies on.
///
/// Implementations translate these calls into the wire contract of one
/// [`ApiVariant`](crate::ApiVariant). A non-2xx answer to a mutating call
/// must surface as [`CoreError::Rejected`](crate::CoreError::Rejected) rather
/// than being reported as success.
#[async_trait]
pub trait AdminApi: Send + Sync + 'static {
    /// Runs the authentication probe.
    ///
    /// Returns `Ok(false)` if the backend answered but did not accept the
    /// session, and `Ok(true)` for variants without a probe.
    async fn authorize(&self) -> Result<bool>;

    /// Fetches every mapping in the order the backend returns them.
    async fn list(&self) -> Result<Vec<Mapping>>;

    /// Creates a mapping.
    async fn create(&self, mapping: &Mapping) -> Result<()>;

    /// Deletes the mapping for `code`.
    async fn delete(&self, code: &ShortCode) -> Result<()>;

    /// Fetches the per-code access summary.
    async fn access_logs(&self) -> Result<Vec<AccessLog>>;
}
