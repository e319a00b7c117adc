//! Request mapping: from an execution context to a request payload.
//!
//! Mapping is driven entirely by the descriptor table. Unset and
//! explicitly-null members are omitted rather than sent as defaults, and a
//! composite member is included only when at least one of its leaves is
//! set; an empty sub-object could otherwise read as "clear all settings"
//! on the service side.

use serde_json::{Map, Value};

use opkit_model::{OperationSchema, ParamDescriptor, ParamKind, Payload};

use crate::context::ExecutionContext;

/// Build the request payload for one invocation.
///
/// Deterministic and idempotent: the same context always produces a
/// structurally identical payload.
#[must_use]
pub fn build_request(schema: &OperationSchema, context: &ExecutionContext) -> Payload {
    let mut request = Payload::new();
    for descriptor in &schema.params {
        let Some(value) = context.value(descriptor.name) else {
            continue;
        };
        if value.is_null() {
            continue;
        }
        match &descriptor.kind {
            ParamKind::Object(fields) => {
                if let Some(composite) = map_composite(fields, value) {
                    request.insert(descriptor.name, Value::Object(composite));
                }
            }
            _ => request.insert(descriptor.name, value.clone()),
        }
    }
    request
}

/// Map a composite value leaf-by-leaf, returning `None` when no leaf is set.
fn map_composite(fields: &[ParamDescriptor], value: &Value) -> Option<Map<String, Value>> {
    let members = value.as_object()?;
    let mut mapped = Map::new();
    let mut any_set = false;
    for field in fields {
        let leaf = members
            .iter()
            .find(|(name, _)| field.matches(name))
            .map(|(_, v)| v);
        let Some(leaf) = leaf else { continue };
        if leaf.is_null() {
            continue;
        }
        mapped.insert(field.name.to_owned(), leaf.clone());
        any_set = true;
    }
    any_set.then_some(mapped)
}
