//! Operation metadata and wire-shape types for opkit.
//!
//! This crate holds the declarative side of the pipeline: parameter
//! descriptors, operation schemas, the built-in operation catalog, the
//! generic [`Payload`] document used for requests and responses, and the
//! select-expression grammar. The execution side lives in `opkit-core`.

mod catalog;
mod descriptor;
mod error;
mod payload;
mod schema;
mod select;

pub use catalog::builtin_catalog;
pub use descriptor::{ParamDescriptor, ParamKind};
pub use error::ModelError;
pub use payload::Payload;
pub use schema::{Catalog, OperationSchema, PaginationSpec};
pub use select::SelectExpr;
