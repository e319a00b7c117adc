//! Operation invocation.
//!
//! The invoker performs exactly one remote call per page. Retry policy,
//! credentials, and serialization belong to the client; the invoker's job
//! is cancellation plumbing and turning client failures into pipeline
//! errors, with name-resolution failures enriched by the endpoint
//! configuration they were resolved against.

use std::fmt;
use std::future::Future;
use std::sync::Arc;

use anyhow::Context;
use tracing::debug;

use opkit_model::Payload;

use crate::cancel::CancelToken;
use crate::client::{ClientError, ServiceClient};
use crate::config::ClientConfig;
use crate::error::{PipelineError, PipelineResult};

/// Invokes remote operations through an abstract service client.
pub struct Invoker {
    client: Arc<dyn ServiceClient>,
    config: ClientConfig,
}

impl fmt::Debug for Invoker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Invoker")
            .field("config", &self.config)
            .finish()
    }
}

impl Invoker {
    /// Create an invoker over a client handle.
    #[must_use]
    pub fn new(client: Arc<dyn ServiceClient>, config: ClientConfig) -> Self {
        Self { client, config }
    }

    /// The configuration the invoker was built with.
    #[must_use]
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Invoke `operation` once, racing the in-flight call against the
    /// cancellation token. Cancelling drops the network future.
    pub async fn invoke(
        &self,
        operation: &str,
        request: &Payload,
        cancel: &CancelToken,
    ) -> PipelineResult<Payload> {
        let mut cancel = cancel.clone();
        debug!(operation, members = request.len(), "invoking operation");
        tokio::select! {
            () = cancel.cancelled() => Err(PipelineError::Cancelled),
            result = self.client.call(operation, request) => {
                result.map_err(|e| self.wrap_client_error(e))
            }
        }
    }

    /// Blocking facade over [`Invoker::invoke`] for synchronous callers:
    /// the calling thread parks at the invocation boundary until the
    /// asynchronous call completes or is cancelled. Must not be called
    /// from a current-thread runtime worker; see [`block_on`].
    pub fn invoke_blocking(
        &self,
        operation: &str,
        request: &Payload,
        cancel: &CancelToken,
    ) -> PipelineResult<Payload> {
        block_on(self.invoke(operation, request, cancel))?
    }

    fn wrap_client_error(&self, error: ClientError) -> PipelineError {
        match error {
            ClientError::NameResolution { host } => PipelineError::Transport {
                endpoint: self.config.endpoint_description(),
                message: format!(
                    "failed to resolve host {host}; check the endpoint configuration ({})",
                    self.config.endpoint_description()
                ),
            },
            ClientError::Transport(message) => PipelineError::Transport {
                endpoint: self.config.endpoint_description(),
                message,
            },
            ClientError::Service { code, message } => PipelineError::Service { code, message },
        }
    }
}

/// Drive a pipeline future to completion from a synchronous context.
///
/// Reuses the ambient multi-thread runtime when called from one of its
/// threads, otherwise spins up a single-threaded runtime for the duration
/// of the call. Fails on a current-thread runtime worker, where parking
/// the only thread would deadlock the runtime.
pub fn block_on<F>(future: F) -> PipelineResult<F::Output>
where
    F: Future,
{
    if let Ok(handle) = tokio::runtime::Handle::try_current() {
        if handle.runtime_flavor() != tokio::runtime::RuntimeFlavor::MultiThread {
            return Err(anyhow::anyhow!(
                "blocking invocation inside a current-thread runtime would deadlock; \
                 use the async entry point instead"
            )
            .into());
        }
        Ok(tokio::task::block_in_place(|| handle.block_on(future)))
    } else {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .context("failed to build blocking invocation runtime")?;
        Ok(runtime.block_on(future))
    }
}
