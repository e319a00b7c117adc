//! Execution pipeline for opkit.
//!
//! One invocation flows through five stages, each driven by the operation
//! schema from `opkit-model`:
//!
//! 1. [`ContextBuilder`] snapshots bound parameters into an immutable
//!    [`ExecutionContext`] and compiles the selection plan.
//! 2. [`build_request`] maps the context into a request [`Payload`],
//!    omitting unset members and empty composites.
//! 3. [`Invoker`] performs exactly one remote call per page, racing it
//!    against the invocation's cancellation token.
//! 4. The pagination loop in [`Pipeline`] re-invokes while the service
//!    returns a continuation token.
//! 5. The selection plan projects each response into records emitted to a
//!    [`PipelineHost`].
//!
//! [`Payload`]: opkit_model::Payload

mod cancel;
mod client;
mod config;
mod confirm;
mod context;
mod error;
mod invoke;
mod pipeline;
mod project;
mod request;

pub use cancel::{CancelHandle, CancelToken};
pub use client::{ClientCache, ClientError, ClientKey, ServiceClient};
pub use config::ClientConfig;
pub use confirm::{AutoConfirm, ConfirmGate, DenyAll};
pub use context::{
    BoundParams, ContextBuilder, ExecutionContext, InvocationOptions, SelectionPlan,
};
pub use error::{PipelineError, PipelineResult};
pub use invoke::{Invoker, block_on};
pub use pipeline::{Pipeline, execute};
pub use project::{CollectingHost, EmitSignal, ErrorRecord, PipelineHost, PipelineRecord};
pub use request::build_request;
