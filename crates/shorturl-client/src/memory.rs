use async_trait::async_trait;
use parking_lot::Mutex;
use shorturl_core::{AccessLog, AdminApi, CoreError, Mapping, Result, ShortCode};
use std::sync::atomic::{AtomicUsize, Ordering};

#[derive(Debug, Default)]
struct State {
    mappings: Vec<Mapping>,
    logs: Vec<AccessLog>,
}

/// In-process backend honouring the same contract as the HTTP service.
///
/// Mappings keep insertion order, duplicate codes are refused with `409`,
/// deleting an unknown code answers `400`, and when a key is expected every
/// call from a session presenting a different key answers `401`.
#[derive(Debug, Default)]
pub struct InMemoryAdminApi {
    state: Mutex<State>,
    expected_key: Option<String>,
    presented_key: Option<String>,
    calls: AtomicUsize,
}

impl InMemoryAdminApi {
    /// Creates an empty backend without authentication.
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds the backend with `mappings`, in order.
    pub fn with_mappings(self, mappings: impl IntoIterator<Item = Mapping>) -> Self {
        {
            let mut state = self.state.lock();
            for mapping in mappings {
                state.logs.push(new_log(&mapping));
                state.mappings.push(mapping);
            }
        }
        self
    }

    /// Requires callers to hold `key`.
    pub fn expecting_key(mut self, key: impl Into<String>) -> Self {
        self.expected_key = Some(key.into());
        self
    }

    /// Sets the key this session presents on every call.
    pub fn presenting_key(mut self, key: impl Into<String>) -> Self {
        self.presented_key = Some(key.into());
        self
    }

    /// Returns the current mappings.
    pub fn mappings(&self) -> Vec<Mapping> {
        self.state.lock().mappings.clone()
    }

    /// Number of calls received, probes included.
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn is_authorized(&self) -> bool {
        match self.expected_key {
            Some(ref expected) => self.presented_key.as_ref() == Some(expected),
            None => true,
        }
    }

    fn check(&self) -> Result<()> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.is_authorized() {
            Ok(())
        } else {
            Err(CoreError::Rejected {
                status: 401,
                body: "UNAUTHORIZED".to_string(),
            })
        }
    }
}

fn new_log(mapping: &Mapping) -> AccessLog {
    AccessLog {
        code: mapping.short_code.clone(),
        url: Some(mapping.long_url.clone()),
        last_access: None,
        access_count: 0,
    }
}

#[async_trait]
impl AdminApi for InMemoryAdminApi {
    async fn authorize(&self) -> Result<bool> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.is_authorized())
    }

    async fn list(&self) -> Result<Vec<Mapping>> {
        self.check()?;
        Ok(self.mappings())
    }

    async fn create(&self, mapping: &Mapping) -> Result<()> {
        self.check()?;
        let mut state = self.state.lock();
        if state
            .mappings
            .iter()
            .any(|m| m.short_code == mapping.short_code)
        {
            return Err(CoreError::Rejected {
                status: 409,
                body: "Failed. UNIQUE constraint failed: short_urls.short_code".to_string(),
            });
        }

        state.logs.retain(|log| log.code != mapping.short_code);
        state.logs.push(new_log(mapping));
        state.mappings.push(mapping.clone());
        Ok(())
    }

    async fn delete(&self, code: &ShortCode) -> Result<()> {
        self.check()?;
        let mut state = self.state.lock();
        let Some(index) = state.mappings.iter().position(|m| &m.short_code == code) else {
            return Err(CoreError::Rejected {
                status: 400,
                body: "Item does not exists.".to_string(),
            });
        };

        state.mappings.remove(index);
        if let Some(log) = state.logs.iter_mut().find(|log| &log.code == code) {
            log.url = None;
        }
        Ok(())
    }

    async fn access_logs(&self) -> Result<Vec<AccessLog>> {
        self.check()?;
        Ok(self.state.lock().logs.clone())
    }
}
