//! Operation schemas and the catalog that indexes them.
//!
//! A schema is the table entry that drives the whole pipeline for one API
//! operation: its parameter surface, output member names, default select
//! expression, and pagination token wiring. One engine plus this table
//! replaces a handwritten binding type per operation.

use crate::descriptor::ParamDescriptor;
use crate::error::ModelError;

/// Continuation-token wiring for a paginated list operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaginationSpec {
    /// Request member the next-page token is written into.
    pub input_token: &'static str,
    /// Response member the returned token is read from.
    pub output_token: &'static str,
    /// Request member carrying the page-size hint, if the operation has one.
    pub page_size_param: Option<&'static str>,
}

/// Static description of one API operation binding.
#[derive(Debug, Clone)]
pub struct OperationSchema {
    /// Remote operation name (e.g. `ListZonalShifts`).
    pub operation: &'static str,
    /// Service identifier (e.g. `arc-zonal-shift`).
    pub service: &'static str,
    /// Verb-noun command name exposed on the command surface.
    pub command: &'static str,
    /// Whether the operation mutates remote state (drives the confirmation
    /// gate).
    pub mutating: bool,
    /// The parameter surface.
    pub params: Vec<ParamDescriptor>,
    /// Response member names a select expression may resolve against.
    pub output_fields: Vec<&'static str>,
    /// Select expression applied when the caller supplies none.
    pub default_select: &'static str,
    /// Continuation-token wiring, present only for list operations.
    pub pagination: Option<PaginationSpec>,
}

impl OperationSchema {
    /// Create a non-mutating schema with defaults: no parameters, no
    /// pagination, select `*`.
    #[must_use]
    pub fn new(operation: &'static str, service: &'static str, command: &'static str) -> Self {
        Self {
            operation,
            service,
            command,
            mutating: false,
            params: Vec::new(),
            output_fields: Vec::new(),
            default_select: "*",
            pagination: None,
        }
    }

    /// Mark the operation as mutating.
    #[must_use]
    pub fn mutating(mut self) -> Self {
        self.mutating = true;
        self
    }

    /// Append a parameter descriptor.
    #[must_use]
    pub fn param(mut self, descriptor: ParamDescriptor) -> Self {
        self.params.push(descriptor);
        self
    }

    /// Declare the response members selectable by name.
    #[must_use]
    pub fn output(mut self, fields: &[&'static str]) -> Self {
        self.output_fields = fields.to_vec();
        self
    }

    /// Set the default select expression.
    #[must_use]
    pub fn select(mut self, expr: &'static str) -> Self {
        self.default_select = expr;
        self
    }

    /// Wire up pagination tokens.
    #[must_use]
    pub fn paginated(
        mut self,
        input_token: &'static str,
        output_token: &'static str,
        page_size_param: Option<&'static str>,
    ) -> Self {
        self.pagination = Some(PaginationSpec {
            input_token,
            output_token,
            page_size_param,
        });
        self
    }

    /// Find a parameter descriptor by name or alias (case-insensitive).
    #[must_use]
    pub fn find_param(&self, name: &str) -> Option<&ParamDescriptor> {
        self.params.iter().find(|p| p.matches(name))
    }

    /// Iterate over the required parameter descriptors.
    pub fn required_params(&self) -> impl Iterator<Item = &ParamDescriptor> {
        self.params.iter().filter(|p| p.required)
    }

    /// Whether `name` is one of the declared output members.
    #[must_use]
    pub fn is_output_field(&self, name: &str) -> bool {
        self.output_fields.iter().any(|f| *f == name)
    }

    /// The parameter a legacy pass-through echo resolves to: the first
    /// pipeline-bindable parameter of the surface.
    #[must_use]
    pub fn echo_param(&self) -> Option<&ParamDescriptor> {
        self.params.iter().find(|p| p.pipeline_bound)
    }
}

/// An indexed collection of operation schemas.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    schemas: Vec<OperationSchema>,
}

impl Catalog {
    /// Create a catalog from a list of schemas.
    #[must_use]
    pub fn new(schemas: Vec<OperationSchema>) -> Self {
        Self { schemas }
    }

    /// Look up a schema by its verb-noun command name (case-insensitive).
    pub fn by_command(&self, command: &str) -> Result<&OperationSchema, ModelError> {
        self.schemas
            .iter()
            .find(|s| s.command.eq_ignore_ascii_case(command))
            .ok_or_else(|| ModelError::UnknownOperation(command.to_owned()))
    }

    /// Look up a schema by its remote operation name.
    pub fn by_operation(&self, operation: &str) -> Result<&OperationSchema, ModelError> {
        self.schemas
            .iter()
            .find(|s| s.operation == operation)
            .ok_or_else(|| ModelError::UnknownOperation(operation.to_owned()))
    }

    /// Iterate over all schemas.
    pub fn iter(&self) -> impl Iterator<Item = &OperationSchema> {
        self.schemas.iter()
    }

    /// Number of schemas.
    #[must_use]
    pub fn len(&self) -> usize {
        self.schemas.len()
    }

    /// Whether the catalog is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.schemas.is_empty()
    }
}
