//! Parameter descriptors: the static parameter surface of an operation.
//!
//! Descriptors are declared once per operation in the catalog and never
//! mutated afterwards. Binding-time validation (type shape, enum
//! membership, nested-field names) lives here so that the execution
//! pipeline can assume every bound value already has the declared shape.

use serde_json::Value;

use crate::error::ModelError;

/// Semantic type of a parameter or nested field.
#[derive(Debug, Clone, PartialEq)]
pub enum ParamKind {
    /// Free-form string.
    String,
    /// Integer (bound as a JSON number with no fractional part).
    Integer,
    /// Boolean switch.
    Boolean,
    /// String constant validated against a fixed value set.
    Enum(Vec<&'static str>),
    /// Homogeneous list of an element kind.
    List(Box<ParamKind>),
    /// Composite object built from leaf descriptors.
    Object(Vec<ParamDescriptor>),
}

impl ParamKind {
    /// Short kind name used in diagnostics.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Integer => "integer",
            Self::Boolean => "boolean",
            Self::Enum(_) => "enum",
            Self::List(_) => "list",
            Self::Object(_) => "object",
        }
    }

    /// Validate that `value` has this kind's shape.
    ///
    /// `Value::Null` is always accepted: an explicitly cleared parameter is
    /// a legal binding (the request mapper later omits it), distinct from a
    /// parameter that was never bound at all.
    pub fn validate(&self, param: &str, value: &Value) -> Result<(), ModelError> {
        if value.is_null() {
            return Ok(());
        }
        match self {
            Self::String => expect(param, "string", value.is_string(), value),
            Self::Integer => expect(param, "integer", value.as_i64().is_some(), value),
            Self::Boolean => expect(param, "boolean", value.is_boolean(), value),
            Self::Enum(allowed) => {
                let Some(text) = value.as_str() else {
                    return expect(param, "enum", false, value);
                };
                if allowed.contains(&text) {
                    Ok(())
                } else {
                    Err(ModelError::EnumOutOfRange {
                        param: param.to_owned(),
                        value: text.to_owned(),
                        allowed: allowed.clone(),
                    })
                }
            }
            Self::List(element) => {
                let Some(items) = value.as_array() else {
                    return expect(param, "list", false, value);
                };
                for item in items {
                    element.validate(param, item)?;
                }
                Ok(())
            }
            Self::Object(fields) => {
                let Some(members) = value.as_object() else {
                    return expect(param, "object", false, value);
                };
                for (name, member) in members {
                    let Some(field) = fields.iter().find(|f| f.matches(name)) else {
                        return Err(ModelError::UnknownParameter(format!("{param}.{name}")));
                    };
                    field
                        .kind
                        .validate(&format!("{param}.{}", field.name), member)?;
                }
                Ok(())
            }
        }
    }
}

fn expect(param: &str, expected: &'static str, ok: bool, value: &Value) -> Result<(), ModelError> {
    if ok {
        Ok(())
    } else {
        Err(ModelError::TypeMismatch {
            param: param.to_owned(),
            expected,
            got: json_type_name(value),
        })
    }
}

/// JSON type name of a value, for diagnostics.
#[must_use]
fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Static description of one named parameter.
#[derive(Debug, Clone, PartialEq)]
pub struct ParamDescriptor {
    /// Wire member name (`PascalCase`, matches the request shape).
    pub name: &'static str,
    /// Semantic type.
    pub kind: ParamKind,
    /// Whether the operation requires this parameter to be bound.
    pub required: bool,
    /// Default value applied when the parameter is unbound.
    pub default: Option<Value>,
    /// Whether the parameter may be bound from pipeline input.
    pub pipeline_bound: bool,
    /// Alternative names accepted at bind time.
    pub aliases: Vec<&'static str>,
}

impl ParamDescriptor {
    /// Create an optional parameter with no default and no aliases.
    #[must_use]
    pub fn new(name: &'static str, kind: ParamKind) -> Self {
        Self {
            name,
            kind,
            required: false,
            default: None,
            pipeline_bound: false,
            aliases: Vec::new(),
        }
    }

    /// Mark the parameter required.
    #[must_use]
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// Set the default value applied when the parameter is unbound.
    #[must_use]
    pub fn with_default(mut self, value: Value) -> Self {
        self.default = Some(value);
        self
    }

    /// Allow binding this parameter from pipeline input.
    #[must_use]
    pub fn pipeline_bound(mut self) -> Self {
        self.pipeline_bound = true;
        self
    }

    /// Add an accepted alias.
    #[must_use]
    pub fn alias(mut self, alias: &'static str) -> Self {
        self.aliases.push(alias);
        self
    }

    /// Whether `name` matches this descriptor's name or one of its aliases
    /// (case-insensitive, matching command-shell conventions).
    #[must_use]
    pub fn matches(&self, name: &str) -> bool {
        self.name.eq_ignore_ascii_case(name)
            || self.aliases.iter().any(|a| a.eq_ignore_ascii_case(name))
    }

    /// Validate a value bound to this parameter.
    pub fn validate(&self, value: &Value) -> Result<(), ModelError> {
        self.kind.validate(self.name, value)
    }
}
