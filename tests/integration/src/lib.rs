//! End-to-end pipeline tests for opkit.
//!
//! These tests run the whole pipeline (context build, request mapping,
//! invocation, pagination, projection) against an in-process scripted
//! client; no network or running service is required.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, Once};

use async_trait::async_trait;
use serde_json::json;

use opkit_core::{ClientError, ServiceClient};
use opkit_model::Payload;

mod test_invocation;
mod test_pagination;
mod test_validation;

static INIT: Once = Once::new();

/// Initialize tracing (once).
pub fn init_tracing() {
    INIT.call_once(|| {
        tracing_subscriber::fmt()
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
            )
            .with_test_writer()
            .init();
    });
}

/// Client that replays scripted results in order and records every request
/// it receives.
pub struct ScriptedClient {
    script: Vec<Result<Payload, ClientError>>,
    calls: AtomicUsize,
    requests: Mutex<Vec<(String, Payload)>>,
}

impl std::fmt::Debug for ScriptedClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScriptedClient")
            .field("script_len", &self.script.len())
            .field("calls", &self.calls())
            .finish()
    }
}

impl ScriptedClient {
    /// Create a client that replays `script` one entry per call.
    #[must_use]
    pub fn new(script: Vec<Result<Payload, ClientError>>) -> Self {
        Self {
            script,
            calls: AtomicUsize::new(0),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Number of calls received so far.
    #[must_use]
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// The `(operation, request)` pairs received so far.
    #[must_use]
    pub fn requests(&self) -> Vec<(String, Payload)> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl ServiceClient for ScriptedClient {
    async fn call(&self, operation: &str, request: &Payload) -> Result<Payload, ClientError> {
        let index = self.calls.fetch_add(1, Ordering::SeqCst);
        self.requests
            .lock()
            .unwrap()
            .push((operation.to_owned(), request.clone()));
        match self.script.get(index) {
            Some(Ok(payload)) => Ok(payload.clone()),
            Some(Err(error)) => Err(clone_client_error(error)),
            None => Err(ClientError::Transport("script exhausted".to_owned())),
        }
    }
}

fn clone_client_error(error: &ClientError) -> ClientError {
    match error {
        ClientError::NameResolution { host } => ClientError::NameResolution { host: host.clone() },
        ClientError::Transport(message) => ClientError::Transport(message.clone()),
        ClientError::Service { code, message } => ClientError::Service {
            code: code.clone(),
            message: message.clone(),
        },
    }
}

/// Build a `ListZonalShifts` response page.
#[must_use]
pub fn shift_page(ids: &[&str], next_token: &str) -> Payload {
    let items: Vec<serde_json::Value> = ids
        .iter()
        .map(|id| json!({"ZonalShiftId": id, "Status": "ACTIVE"}))
        .collect();
    let mut payload = Payload::new();
    payload.insert("Items", json!(items));
    if !next_token.is_empty() {
        payload.insert("NextToken", json!(next_token));
    }
    payload
}
