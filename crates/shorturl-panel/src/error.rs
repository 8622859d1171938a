use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    #[error("invalid page url: {0}")]
    InvalidPageUrl(String),
    #[error("page url has no host: {0}")]
    MissingHost(String),
    #[error("the configurable variant needs a base url")]
    MissingBaseUrl,
}
