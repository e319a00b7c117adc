//! Abstract service client and the per-process client cache.
//!
//! The pipeline never speaks a wire protocol itself; it consumes a
//! [`ServiceClient`] capability. Credentials, endpoints, retries, and
//! serialization all belong to the client implementation.

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use dashmap::DashMap;

use opkit_model::Payload;

/// Failure reported by a service client.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// The endpoint host name could not be resolved.
    #[error("failed to resolve host {host}")]
    NameResolution {
        /// The host that failed to resolve.
        host: String,
    },

    /// Any other connectivity failure.
    #[error("transport failure: {0}")]
    Transport(String),

    /// The call completed and the service reported a failure.
    #[error("{code}: {message}")]
    Service {
        /// Service error code.
        code: String,
        /// Service error message.
        message: String,
    },
}

/// An abstract remote-operation client.
///
/// One `call` performs one remote operation; the pipeline never retries.
#[async_trait]
pub trait ServiceClient: Send + Sync {
    /// Invoke `operation` with the given request payload.
    async fn call(&self, operation: &str, request: &Payload) -> Result<Payload, ClientError>;
}

/// Cache key: one client per (service, endpoint) pair.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ClientKey {
    /// Service identifier.
    pub service: String,
    /// Endpoint description the client was built against.
    pub endpoint: String,
}

impl ClientKey {
    /// Create a cache key.
    #[must_use]
    pub fn new(service: impl Into<String>, endpoint: impl Into<String>) -> Self {
        Self {
            service: service.into(),
            endpoint: endpoint.into(),
        }
    }
}

/// Thread-safe cache of service clients, created once and reused for the
/// lifetime of the process. Handles are read-only; invocations never mutate
/// a cached client.
#[derive(Default)]
pub struct ClientCache {
    inner: DashMap<ClientKey, Arc<dyn ServiceClient>>,
}

impl ClientCache {
    /// Create an empty cache.
    #[must_use]
    pub fn new() -> Self {
        Self {
            inner: DashMap::new(),
        }
    }

    /// Get the cached client for `key`, building it on first use.
    #[must_use]
    pub fn get_or_create(
        &self,
        key: ClientKey,
        build: impl FnOnce() -> Arc<dyn ServiceClient>,
    ) -> Arc<dyn ServiceClient> {
        self.inner.entry(key).or_insert_with(build).clone()
    }

    /// Number of cached clients.
    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    /// Whether the cache is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    /// Drop all cached clients.
    pub fn reset(&self) {
        self.inner.clear();
    }
}

impl fmt::Debug for ClientCache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientCache")
            .field("len", &self.inner.len())
            .finish()
    }
}
