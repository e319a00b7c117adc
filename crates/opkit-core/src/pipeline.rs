//! The end-to-end pipeline: confirmation gate, request mapping, the
//! pagination loop, and result projection.
//!
//! The pagination loop walks START → FETCHING → EMITTING and returns to
//! FETCHING while the response carries a continuation token; a fetch
//! failure is terminal. Pages are fetched strictly sequentially, and the
//! loop re-issues the same request with only the input-token member
//! substituted.

use serde_json::Value;
use tracing::{debug, info};

use opkit_model::OperationSchema;

use crate::cancel::CancelToken;
use crate::confirm::ConfirmGate;
use crate::context::{BoundParams, ContextBuilder, ExecutionContext, InvocationOptions};
use crate::error::{PipelineError, PipelineResult};
use crate::invoke::Invoker;
use crate::project::{EmitSignal, ErrorRecord, PipelineHost, PipelineRecord};
use crate::request::build_request;

/// One operation binding ready to run.
pub struct Pipeline<'a> {
    schema: &'a OperationSchema,
    invoker: &'a Invoker,
    gate: &'a dyn ConfirmGate,
}

impl std::fmt::Debug for Pipeline<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Pipeline")
            .field("operation", &self.schema.operation)
            .finish()
    }
}

impl<'a> Pipeline<'a> {
    /// Create a pipeline for one schema.
    #[must_use]
    pub fn new(schema: &'a OperationSchema, invoker: &'a Invoker, gate: &'a dyn ConfirmGate) -> Self {
        Self {
            schema,
            invoker,
            gate,
        }
    }

    /// Run the invocation against the given context, emitting records to
    /// `host`.
    ///
    /// Failures after at least one record has been emitted are captured as
    /// [`ErrorRecord`]s on the stream; earlier failures (and cancellation)
    /// are returned directly.
    pub async fn run(
        &self,
        context: &ExecutionContext,
        host: &mut dyn PipelineHost,
        cancel: &CancelToken,
    ) -> PipelineResult<()> {
        let invocation = context.invocation_id();
        if self.schema.mutating && !context.force() {
            let target = self.confirmation_target(context);
            if !self.gate.should_process(self.schema.command, &target) {
                info!(
                    operation = self.schema.operation,
                    %invocation,
                    target = %target,
                    "declined by confirmation gate"
                );
                return Ok(());
            }
        }

        debug!(operation = self.schema.operation, %invocation, "starting invocation");
        let mut request = build_request(self.schema, context);
        let mut emitted = false;
        let mut pages = 0u32;

        loop {
            // FETCHING
            let response = match self
                .invoker
                .invoke(self.schema.operation, &request, cancel)
                .await
            {
                Ok(response) => response,
                Err(PipelineError::Cancelled) => return Err(PipelineError::Cancelled),
                Err(error) if emitted => {
                    host.emit(PipelineRecord::Error(ErrorRecord::from_error(
                        self.schema.operation,
                        &error,
                    )));
                    return Ok(());
                }
                Err(error) => return Err(error),
            };
            pages += 1;

            // EMITTING
            let output = context.selection().apply(&response, context);
            if host.emit(PipelineRecord::Output(output)) == EmitSignal::Stop {
                debug!(
                    operation = self.schema.operation,
                    %invocation,
                    pages,
                    "consumer stopped iteration"
                );
                return Ok(());
            }
            emitted = true;

            let Some(pagination) = &self.schema.pagination else {
                return Ok(());
            };
            let token = response.get_str(pagination.output_token).unwrap_or("");
            if token.is_empty() {
                debug!(
                    operation = self.schema.operation,
                    %invocation,
                    pages,
                    "pagination complete"
                );
                return Ok(());
            }
            if !context.auto_paginate() {
                // Manual paging: the caller threads the token by hand.
                return Ok(());
            }
            request.insert(pagination.input_token, Value::String(token.to_owned()));
        }
    }

    /// Target string shown by the confirmation gate: the first
    /// pipeline-bindable parameter's value when present, otherwise the
    /// operation name.
    fn confirmation_target(&self, context: &ExecutionContext) -> String {
        self.schema
            .echo_param()
            .and_then(|p| context.value(p.name))
            .map(value_to_display)
            .unwrap_or_else(|| self.schema.operation.to_owned())
    }
}

fn value_to_display(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Convenience entry point: build the context, then run the pipeline.
pub async fn execute(
    schema: &OperationSchema,
    bound: BoundParams,
    options: &InvocationOptions,
    invoker: &Invoker,
    gate: &dyn ConfirmGate,
    host: &mut dyn PipelineHost,
    cancel: &CancelToken,
) -> PipelineResult<()> {
    let context = ContextBuilder::new(schema).build(bound, options)?;
    Pipeline::new(schema, invoker, gate).run(&context, host, cancel).await
}
