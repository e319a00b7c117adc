//! opkit - reference command surface for the operation-binding pipeline.
//!
//! Each built-in command is a verb-noun binding over one remote operation;
//! flags are resolved against the operation's parameter surface.
//!
//! # Usage
//!
//! ```text
//! opkit <Verb-Noun> [--Param value ...] [engine flags]
//! ```
//!
//! Engine flags: `--Select <expr>`, `--PassThru`, `--Force`,
//! `--NoAutoPage`, `--First <n>`. The literal value `null` binds an
//! explicit null.
//!
//! # Environment Variables
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `OPKIT_ENDPOINT_URL` | *(unset)* | Endpoint recorded in diagnostics |
//! | `AWS_REGION` | `us-east-1` | Region recorded in diagnostics |
//! | `LOG_LEVEL` | `info` | Log level filter |
//! | `RUST_LOG` | *(unset)* | Fine-grained tracing filter (overrides `LOG_LEVEL`) |

mod args;
mod demo;
mod host;

use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use opkit_core::{
    CancelHandle, ClientCache, ClientConfig, ClientKey, ErrorRecord, Invoker, PipelineError,
    execute,
};
use opkit_model::builtin_catalog;

use crate::demo::DemoBackend;
use crate::host::{StdinGate, StdoutHost};

/// Initialize the tracing subscriber.
///
/// Uses `RUST_LOG` if set, otherwise falls back to the `LOG_LEVEL` config value.
fn init_tracing(log_level: &str) -> Result<()> {
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else {
        EnvFilter::try_new(log_level)
            .with_context(|| format!("invalid log level filter: {log_level}"))?
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    Ok(())
}

fn print_usage() {
    eprintln!("usage: opkit <Verb-Noun> [--Param value ...]");
    eprintln!();
    eprintln!("commands:");
    for schema in builtin_catalog().iter() {
        eprintln!(
            "  {:24} {} {} ({})",
            schema.command,
            schema.service,
            schema.operation,
            if schema.mutating { "mutating" } else { "read-only" }
        );
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let config = ClientConfig::from_env();
    init_tracing(&config.log_level)?;

    let argv: Vec<String> = std::env::args().skip(1).collect();
    let Some(command) = argv.first() else {
        print_usage();
        std::process::exit(2);
    };
    if command == "--help" || command == "-h" {
        print_usage();
        return Ok(());
    }

    let catalog = builtin_catalog();
    let schema = match catalog.by_command(command) {
        Ok(schema) => schema,
        Err(e) => {
            eprintln!("{e}");
            print_usage();
            std::process::exit(2);
        }
    };

    if config.endpoint_url.is_some() {
        // The reference binary ships only the in-process backend; real
        // transports are supplied by embedding applications.
        warn!(
            endpoint = %config.endpoint_description(),
            "endpoint override is recorded in diagnostics only; using the demo backend"
        );
    }

    let cache = ClientCache::new();
    let key = ClientKey::new(schema.service, config.endpoint_description());
    let client = cache.get_or_create(key, || Arc::new(DemoBackend::new()));
    let invoker = Invoker::new(client, config);

    let invocation = match args::parse_invocation(schema, &argv[1..]) {
        Ok(invocation) => invocation,
        Err(e) => {
            eprintln!("{e}");
            std::process::exit(2);
        }
    };

    let (cancel_handle, cancel_token) = CancelHandle::new();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("interrupt received, cancelling invocation");
            cancel_handle.cancel();
        }
    });

    let mut host = StdoutHost::new(invocation.first);
    let result = execute(
        schema,
        invocation.bound,
        &invocation.options,
        &invoker,
        &StdinGate,
        &mut host,
        &cancel_token,
    )
    .await;

    match result {
        Ok(()) => Ok(()),
        Err(PipelineError::Cancelled) => {
            info!(operation = schema.operation, "invocation cancelled");
            std::process::exit(130);
        }
        Err(error) => {
            let record = ErrorRecord::from_error(schema.operation, &error);
            if let Ok(text) = serde_json::to_string(&record) {
                eprintln!("{text}");
            }
            std::process::exit(1);
        }
    }
}
