use crate::error::{Result, TestInfraError};
use crate::routes;
use axum::http::HeaderMap;
use parking_lot::Mutex;
use shorturl_core::{AccessLog, ApiVariant, Mapping};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::task::JoinHandle;
use tracing::debug;
use typed_builder::TypedBuilder;

/// Configuration for a [`FakeBackend`].
///
/// # Example
///
/// ```rust
/// use shorturl_core::ApiVariant;
/// use shorturl_test_infra::BackendConfig;
///
/// // keyed /v1 backend accepting "test-key"
/// let config = BackendConfig::builder().build();
///
/// // configurable backend mounted under /admin
/// let config = BackendConfig::builder()
///     .variant(ApiVariant::configurable("/admin"))
///     .api_key("secret".to_string())
///     .build();
/// ```
#[derive(Debug, Clone, TypedBuilder)]
pub struct BackendConfig {
    /// Contract to serve. A `Configurable` base must be an absolute path.
    #[builder(default = ApiVariant::V1)]
    pub variant: ApiVariant,

    /// Key accepted in `x-api-key`. Ignored by the legacy contract.
    #[builder(default = "test-key".to_string())]
    pub api_key: String,

    /// Initial mappings, in server order.
    #[builder(default)]
    pub mappings: Vec<Mapping>,
}

/// One request as the backend saw it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedRequest {
    pub method: String,
    pub path: String,
    pub api_key: Option<String>,
    pub body: String,
}

#[derive(Debug, Default)]
pub(crate) struct Store {
    pub(crate) mappings: Vec<Mapping>,
    pub(crate) logs: Vec<AccessLog>,
}

#[derive(Debug, Clone)]
pub(crate) struct BackendState {
    pub(crate) variant: ApiVariant,
    pub(crate) api_key: String,
    pub(crate) store: Arc<Mutex<Store>>,
    pub(crate) journal: Arc<Mutex<Vec<RecordedRequest>>>,
}

impl BackendState {
    pub(crate) fn record(&self, method: &str, path: &str, headers: &HeaderMap, body: &str) {
        let api_key = headers
            .get("x-api-key")
            .and_then(|value| value.to_str().ok())
            .map(str::to_string);
        debug!(method, path, "fake backend received request");
        self.journal.lock().push(RecordedRequest {
            method: method.to_string(),
            path: path.to_string(),
            api_key,
            body: body.to_string(),
        });
    }

    pub(crate) fn is_authorized(&self, headers: &HeaderMap) -> bool {
        if !self.variant.requires_api_key() {
            return true;
        }
        headers
            .get("x-api-key")
            .is_some_and(|value| value.as_bytes() == self.api_key.as_bytes())
    }
}

/// A disposable HTTP backend speaking one admin API contract.
///
/// Behaves like the production service: `201 Added.` on create, `409` on a
/// duplicate code, `200 Removed.` on delete, `400 Item does not exists.` for
/// unknown codes, and `401 UNAUTHORIZED` when the key does not match.
/// The server stops when the fixture is dropped.
pub struct FakeBackend {
    addr: SocketAddr,
    state: BackendState,
    server: JoinHandle<()>,
}

impl FakeBackend {
    /// Starts the backend on an ephemeral local port.
    pub async fn start(config: BackendConfig) -> Result<Self> {
        if let ApiVariant::Configurable { ref base } = config.variant {
            if !base.starts_with('/') || base.len() < 2 {
                return Err(TestInfraError::Config(format!(
                    "configurable base must be a non-root absolute path, got '{base}'"
                )));
            }
        }

        let logs = config
            .mappings
            .iter()
            .map(|m| AccessLog {
                code: m.short_code.clone(),
                url: Some(m.long_url.clone()),
                last_access: None,
                access_count: 0,
            })
            .collect();

        let state = BackendState {
            variant: config.variant,
            api_key: config.api_key,
            store: Arc::new(Mutex::new(Store {
                mappings: config.mappings,
                logs,
            })),
            journal: Arc::new(Mutex::new(Vec::new())),
        };

        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;
        let app = routes::router(state.clone());
        let server = tokio::spawn(async move {
            if let Err(err) = axum::serve(listener, app).await {
                tracing::error!(error = %err, "fake backend stopped");
            }
        });

        Ok(Self {
            addr,
            state,
            server,
        })
    }

    /// The origin the admin page would have been served from.
    pub fn origin(&self) -> String {
        format!("http://{}/", self.addr)
    }

    /// The variant a client should use to reach this backend.
    ///
    /// A configurable base is returned as an absolute URL, the way an
    /// operator would supply `query_url`.
    pub fn client_variant(&self) -> ApiVariant {
        match self.state.variant {
            ApiVariant::Configurable { ref base } => {
                ApiVariant::configurable(format!("http://{}{}", self.addr, base))
            }
            ref other => other.clone(),
        }
    }

    pub fn api_key(&self) -> &str {
        &self.state.api_key
    }

    /// Current server-side mappings.
    pub fn mappings(&self) -> Vec<Mapping> {
        self.state.store.lock().mappings.clone()
    }

    /// Every request received so far, in arrival order.
    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.state.journal.lock().clone()
    }

    /// Requests received with the given method.
    pub fn requests_with_method(&self, method: &str) -> Vec<RecordedRequest> {
        self.requests()
            .into_iter()
            .filter(|r| r.method == method)
            .collect()
    }
}

impl Drop for FakeBackend {
    fn drop(&mut self) {
        self.server.abort();
    }
}
