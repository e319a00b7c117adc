//! Data-driven flag binding against an operation schema.
//!
//! There is no static argument parser here: the parameter surface of the
//! selected command *is* the parser. Every `--Name` flag is resolved
//! against the schema's descriptors (names and aliases, case-insensitive)
//! and its value is parsed according to the declared kind before being
//! bound. The literal `null` binds an explicit null, which is distinct
//! from leaving the flag off entirely.

use serde_json::{Map, Value};

use opkit_core::{BoundParams, InvocationOptions, PipelineError, PipelineResult};
use opkit_model::{OperationSchema, ParamDescriptor, ParamKind};

/// A fully parsed command invocation.
#[derive(Debug)]
pub struct Invocation {
    /// Parameter bindings.
    pub bound: BoundParams,
    /// Engine-level options.
    pub options: InvocationOptions,
    /// Host-side early-stop limit (`--First`).
    pub first: Option<usize>,
}

/// Parse the flags following the command name.
pub fn parse_invocation(schema: &OperationSchema, args: &[String]) -> PipelineResult<Invocation> {
    let mut bound = BoundParams::new();
    let mut options = InvocationOptions::default();
    let mut first = None;

    let mut iter = args.iter().peekable();
    while let Some(arg) = iter.next() {
        let Some(name) = arg.strip_prefix("--") else {
            return Err(PipelineError::Validation(format!(
                "expected a --Flag, got {arg:?}"
            )));
        };

        // Engine flags take precedence over parameter names.
        if name.eq_ignore_ascii_case("select") {
            options.select = Some(take_value(name, &mut iter)?.to_owned());
            continue;
        }
        if name.eq_ignore_ascii_case("passthru") {
            options.pass_thru = true;
            continue;
        }
        if name.eq_ignore_ascii_case("force") {
            options.force = true;
            continue;
        }
        if name.eq_ignore_ascii_case("noautopage") {
            options.auto_paginate = false;
            continue;
        }
        if name.eq_ignore_ascii_case("first") {
            let raw = take_value(name, &mut iter)?;
            let n = raw.parse::<usize>().map_err(|_| {
                PipelineError::Validation(format!("--First expects a count, got {raw:?}"))
            })?;
            first = Some(n);
            continue;
        }

        let descriptor = schema.find_param(name).ok_or_else(|| {
            PipelineError::Validation(format!(
                "unknown parameter --{name} for {}",
                schema.command
            ))
        })?;
        let value = parse_param_value(descriptor, &mut iter)?;
        bound.bind(schema, name, value)?;
    }

    Ok(Invocation {
        bound,
        options,
        first,
    })
}

fn take_value<'a>(
    name: &str,
    iter: &mut std::iter::Peekable<std::slice::Iter<'a, String>>,
) -> PipelineResult<&'a str> {
    match iter.next() {
        Some(value) if !value.starts_with("--") => Ok(value),
        _ => Err(PipelineError::Validation(format!(
            "--{name} expects a value"
        ))),
    }
}

fn parse_param_value(
    descriptor: &ParamDescriptor,
    iter: &mut std::iter::Peekable<std::slice::Iter<'_, String>>,
) -> PipelineResult<Value> {
    // A bare boolean flag means true.
    if descriptor.kind == ParamKind::Boolean {
        let explicit = iter
            .peek()
            .filter(|next| matches!(next.as_str(), "true" | "false" | "null"));
        return Ok(match explicit {
            Some(_) => scalar_from_text(iter.next().map(String::as_str).unwrap_or_default()),
            None => Value::Bool(true),
        });
    }

    let raw = take_value(descriptor.name, iter)?;
    if raw == "null" {
        return Ok(Value::Null);
    }
    Ok(match &descriptor.kind {
        ParamKind::Integer => {
            let n = raw.parse::<i64>().map_err(|_| {
                PipelineError::Validation(format!(
                    "--{} expects an integer, got {raw:?}",
                    descriptor.name
                ))
            })?;
            Value::from(n)
        }
        ParamKind::List(_) => Value::Array(raw.split(',').map(scalar_from_text).collect()),
        ParamKind::Object(_) => parse_object_literal(descriptor.name, raw)?,
        // Strings, enums, and booleans-with-values are plain scalars;
        // descriptor validation in `bind` enforces membership.
        _ => scalar_from_text(raw),
    })
}

/// Parse a `Key=Value,Key2=Value2` composite literal.
fn parse_object_literal(param: &str, raw: &str) -> PipelineResult<Value> {
    let mut members = Map::new();
    for pair in raw.split(',') {
        let Some((key, value)) = pair.split_once('=') else {
            return Err(PipelineError::Validation(format!(
                "--{param} expects Key=Value pairs, got {pair:?}"
            )));
        };
        members.insert(key.trim().to_owned(), scalar_from_text(value.trim()));
    }
    Ok(Value::Object(members))
}

/// Interpret a scalar literal: null, booleans, and numbers are typed,
/// everything else is a string.
fn scalar_from_text(raw: &str) -> Value {
    match raw {
        "null" => Value::Null,
        "true" => Value::Bool(true),
        "false" => Value::Bool(false),
        _ => raw
            .parse::<i64>()
            .map(Value::from)
            .unwrap_or_else(|_| Value::String(raw.to_owned())),
    }
}
