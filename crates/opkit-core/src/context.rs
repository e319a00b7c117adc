//! Context building: from bound parameters to an immutable execution
//! context.
//!
//! The builder applies defaults, runs the pre/post extension hooks, checks
//! required parameters, and compiles the selection plan. After `build`
//! returns, the context is read-only for the rest of the invocation and is
//! discarded when the call completes.

use std::collections::BTreeMap;

use serde_json::Value;
use tracing::warn;
use uuid::Uuid;

use opkit_model::{OperationSchema, ParamKind, Payload, SelectExpr};

use crate::error::{PipelineError, PipelineResult};

/// Bound parameter values, keyed by canonical descriptor name.
///
/// Absence means the parameter was never bound; `Value::Null` means the
/// caller explicitly cleared it. The two are never conflated.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BoundParams {
    values: BTreeMap<String, Value>,
}

impl BoundParams {
    /// Create an empty binding set.
    #[must_use]
    pub fn new() -> Self {
        Self {
            values: BTreeMap::new(),
        }
    }

    /// Bind `value` to the parameter matching `name` (or an alias),
    /// validating it against the descriptor's kind.
    pub fn bind(
        &mut self,
        schema: &OperationSchema,
        name: &str,
        value: Value,
    ) -> PipelineResult<()> {
        let descriptor = schema
            .find_param(name)
            .ok_or_else(|| PipelineError::Validation(format!("unknown parameter: {name}")))?;
        descriptor.validate(&value)?;
        self.values.insert(descriptor.name.to_owned(), value);
        Ok(())
    }

    /// Insert a value without descriptor validation. Extension hooks use
    /// this to set derived fields the surface does not declare.
    pub fn insert_raw(&mut self, name: impl Into<String>, value: Value) {
        self.values.insert(name.into(), value);
    }

    /// Look up a bound value.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.values.get(name)
    }

    /// Whether the parameter was bound (possibly to null).
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    /// Remove a binding.
    pub fn remove(&mut self, name: &str) -> Option<Value> {
        self.values.remove(name)
    }

    /// Iterate over `(name, value)` bindings in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.values.iter()
    }
}

/// Engine-level options supplied alongside the parameter bindings.
#[derive(Debug, Clone)]
pub struct InvocationOptions {
    /// Select expression override.
    pub select: Option<String>,
    /// Legacy pass-through flag: echo the input identifier back instead of
    /// projecting the response. Mutually exclusive with `select`.
    pub pass_thru: bool,
    /// Skip the confirmation gate for mutating operations.
    pub force: bool,
    /// Automatically iterate paginated operations to completion.
    pub auto_paginate: bool,
}

impl Default for InvocationOptions {
    fn default() -> Self {
        Self {
            select: None,
            pass_thru: false,
            force: false,
            auto_paginate: true,
        }
    }
}

/// A selection plan compiled against a concrete operation schema.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectionPlan {
    /// Extract the member at the given path, page by page.
    Path(Vec<String>),
    /// Pass each response through whole.
    Entire,
    /// Echo the named input parameter.
    InputEcho(String),
}

impl SelectionPlan {
    /// Apply the plan to one response payload.
    #[must_use]
    pub fn apply(&self, response: &Payload, context: &ExecutionContext) -> Value {
        match self {
            Self::Entire => response.clone().into_value(),
            Self::InputEcho(param) => context.value(param).cloned().unwrap_or(Value::Null),
            Self::Path(segments) => {
                let mut current = match segments.first().and_then(|head| response.get(head)) {
                    Some(v) => v,
                    None => return Value::Null,
                };
                for segment in &segments[1..] {
                    match current.get(segment) {
                        Some(v) => current = v,
                        None => return Value::Null,
                    }
                }
                current.clone()
            }
        }
    }
}

/// Immutable per-invocation snapshot consumed by the request mapper and the
/// projector.
#[derive(Debug, Clone)]
pub struct ExecutionContext {
    invocation_id: Uuid,
    values: BoundParams,
    selection: SelectionPlan,
    force: bool,
    auto_paginate: bool,
}

impl ExecutionContext {
    /// Unique id of this invocation, for diagnostics.
    #[must_use]
    pub fn invocation_id(&self) -> Uuid {
        self.invocation_id
    }

    /// Look up a context value.
    #[must_use]
    pub fn value(&self, name: &str) -> Option<&Value> {
        self.values.get(name)
    }

    /// The compiled selection plan.
    #[must_use]
    pub fn selection(&self) -> &SelectionPlan {
        &self.selection
    }

    /// Whether the confirmation gate is bypassed.
    #[must_use]
    pub fn force(&self) -> bool {
        self.force
    }

    /// Whether paginated operations iterate to completion automatically.
    #[must_use]
    pub fn auto_paginate(&self) -> bool {
        self.auto_paginate
    }

    /// Iterate over the context values in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.values.iter()
    }
}

/// Extension hook mutating the bound-parameter set.
pub type ParamHook = Box<dyn Fn(&mut BoundParams) + Send + Sync>;

/// Builds an [`ExecutionContext`] from bound parameters.
pub struct ContextBuilder<'a> {
    schema: &'a OperationSchema,
    pre_copy: Option<ParamHook>,
    post_copy: Option<ParamHook>,
}

impl std::fmt::Debug for ContextBuilder<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ContextBuilder")
            .field("operation", &self.schema.operation)
            .field("pre_copy", &self.pre_copy.is_some())
            .field("post_copy", &self.post_copy.is_some())
            .finish()
    }
}

impl<'a> ContextBuilder<'a> {
    /// Create a builder for the given schema.
    #[must_use]
    pub fn new(schema: &'a OperationSchema) -> Self {
        Self {
            schema,
            pre_copy: None,
            post_copy: None,
        }
    }

    /// Hook run before any field is copied; may override raw inputs.
    #[must_use]
    pub fn with_pre_copy_hook(mut self, hook: ParamHook) -> Self {
        self.pre_copy = Some(hook);
        self
    }

    /// Hook run after all fields are copied; may add derived fields.
    #[must_use]
    pub fn with_post_copy_hook(mut self, hook: ParamHook) -> Self {
        self.post_copy = Some(hook);
        self
    }

    /// Build the execution context.
    pub fn build(
        &self,
        mut bound: BoundParams,
        options: &InvocationOptions,
    ) -> PipelineResult<ExecutionContext> {
        if let Some(hook) = &self.pre_copy {
            hook(&mut bound);
        }

        let mut snapshot = BoundParams::new();
        for descriptor in &self.schema.params {
            match bound.get(descriptor.name) {
                Some(value) => {
                    let value = apply_leaf_defaults(&descriptor.kind, value.clone());
                    snapshot.insert_raw(descriptor.name, value);
                }
                None => {
                    if let Some(default) = &descriptor.default {
                        snapshot.insert_raw(descriptor.name, default.clone());
                    }
                }
            }
        }
        // Hook-injected names outside the declared surface survive the copy.
        for (name, value) in bound.iter() {
            if self.schema.find_param(name).is_none() && !snapshot.contains(name) {
                snapshot.insert_raw(name.clone(), value.clone());
            }
        }

        if let Some(hook) = &self.post_copy {
            hook(&mut snapshot);
        }

        // Option conflicts fail before the required-parameter sweep so the
        // caller sees the usage mistake first.
        let selection = self.compile_selection(options)?;

        for descriptor in self.schema.required_params() {
            match snapshot.get(descriptor.name) {
                None => {
                    return Err(PipelineError::Validation(format!(
                        "required parameter {} is not bound",
                        descriptor.name
                    )));
                }
                Some(Value::Null) => {
                    // Observed original behavior: an explicit null binding
                    // warns and proceeds; the service rejects it later.
                    warn!(
                        operation = self.schema.operation,
                        parameter = descriptor.name,
                        "required parameter is explicitly null"
                    );
                }
                Some(_) => {}
            }
        }

        Ok(ExecutionContext {
            invocation_id: Uuid::new_v4(),
            values: snapshot,
            selection,
            force: options.force,
            auto_paginate: options.auto_paginate,
        })
    }

    fn compile_selection(&self, options: &InvocationOptions) -> PipelineResult<SelectionPlan> {
        if options.pass_thru && options.select.is_some() {
            return Err(PipelineError::Validation(
                "PassThru and Select cannot both be supplied".to_owned(),
            ));
        }

        if options.pass_thru {
            let param = self.schema.echo_param().ok_or_else(|| {
                PipelineError::Validation(format!(
                    "operation {} has no pipeline-bindable parameter to pass through",
                    self.schema.operation
                ))
            })?;
            return Ok(SelectionPlan::InputEcho(param.name.to_owned()));
        }

        let raw = options
            .select
            .as_deref()
            .unwrap_or(self.schema.default_select);
        match SelectExpr::parse(raw)? {
            SelectExpr::Entire => Ok(SelectionPlan::Entire),
            SelectExpr::InputEcho(param) => {
                let descriptor = self.schema.find_param(&param).ok_or_else(|| {
                    PipelineError::Validation(format!(
                        "select expression ^{param} does not name a parameter of {}",
                        self.schema.operation
                    ))
                })?;
                Ok(SelectionPlan::InputEcho(descriptor.name.to_owned()))
            }
            SelectExpr::Path(segments) => {
                // Resolve the head against the response shape now so a bad
                // expression fails before any network call.
                let head = segments.first().map(String::as_str).unwrap_or_default();
                if !self.schema.is_output_field(head) {
                    return Err(PipelineError::Validation(format!(
                        "select expression {raw} does not resolve against the {} response",
                        self.schema.operation
                    )));
                }
                Ok(SelectionPlan::Path(segments))
            }
        }
    }
}

/// Fill unset leaves of a bound composite with their declared defaults.
///
/// Defaults ride along only when the caller actually set a leaf; a
/// composite whose every leaf is null stays untouched so the request
/// mapper can omit it entirely.
fn apply_leaf_defaults(kind: &ParamKind, value: Value) -> Value {
    let ParamKind::Object(fields) = kind else {
        return value;
    };
    let Value::Object(mut members) = value else {
        return value;
    };
    if members.values().all(Value::is_null) {
        return Value::Object(members);
    }
    for field in fields {
        if let Some(default) = &field.default {
            if !members.contains_key(field.name) {
                members.insert(field.name.to_owned(), default.clone());
            }
        }
    }
    Value::Object(members)
}
