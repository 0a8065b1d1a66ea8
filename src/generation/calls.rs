//! Example SDK calls rendered from literal input values

use serde_json::{Map, Value};

use crate::generation::args::trailing_elision;
use crate::generation::mapper::{Usage, ValueCoercion};
use crate::generation::{Backend, BackendExt, GenerationSession, Result};
use crate::ir::{EnumValue, Location, Method, Parameter, Type, TypeId};

/// Renders a call of `method` passing the values in `inputs`.
///
/// Named-argument backends pass required values in order and present
/// optional values by name. Backends that bundle parameters pass one request
/// literal. Everything else passes positional values with trailing elision.
pub fn make_the_call<B: Backend + ?Sized>(
    backend: &B,
    session: &mut GenerationSession<'_>,
    method: &Method,
    inputs: &Map<String, Value>,
) -> Result<String> {
    let name = backend.reserve(&method.name);
    let args = if backend.capabilities().named_arguments {
        let mut args = Vec::new();
        for param in method.required_params() {
            let ty = slot_type(session, param)?;
            args.push(match input_for(inputs, param) {
                Some(value) => arg_value(backend, session, ty, value)?,
                None => backend.syntax().null_str.to_string(),
            });
        }
        for param in method.optional_params() {
            if let Some(value) = input_for(inputs, param) {
                let ty = slot_type(session, param)?;
                let rendered = arg_value(backend, session, ty, value)?;
                args.push(backend.arg_set(&backend.reserve(&param.name), &rendered));
            }
        }
        args
    } else if backend.use_request(method) {
        let request = session.request_type_of(method)?;
        vec![assign_type(backend, session, request, inputs)?]
    } else {
        let mut slots = Vec::new();
        for param in method.all_params() {
            let ty = slot_type(session, param)?;
            let rendered = match input_for(inputs, param) {
                Some(value) => Some(arg_value(backend, session, ty, value)?),
                None => None,
            };
            slots.push(rendered);
        }
        trailing_elision(&slots, backend.syntax().null_str)
    };
    Ok(backend.call_expression(&name, &args))
}

/// Inputs are keyed by wire name; the identifier is accepted too
fn input_for<'v>(inputs: &'v Map<String, Value>, param: &Parameter) -> Option<&'v Value> {
    inputs
        .get(param.wire_name())
        .or_else(|| inputs.get(&param.name))
}

/// Bodies are passed as their writeable variant
fn slot_type(session: &mut GenerationSession<'_>, param: &Parameter) -> Result<TypeId> {
    if param.location == Location::Body {
        Ok(session.writeable_of(param.ty)?.unwrap_or(param.ty))
    } else {
        Ok(param.ty)
    }
}

/// Literal for a composite built from the matching entries of `inputs`
pub fn assign_type<B: Backend + ?Sized>(
    backend: &B,
    session: &mut GenerationSession<'_>,
    id: TypeId,
    inputs: &Map<String, Value>,
) -> Result<String> {
    let mapped = backend.map_type(session, id, Usage::Method)?;
    let composite = match session.ty(id)? {
        Type::Composite(c) => c.clone(),
        _ => return arg_value(backend, session, id, &Value::Object(inputs.clone())),
    };
    let mut assigns = Vec::new();
    for prop in composite.properties.values() {
        if let Some(value) = inputs.get(prop.wire_name()) {
            let rendered = arg_value(backend, session, prop.ty, value)?;
            assigns.push(backend.arg_set(&backend.property_key(prop), &rendered));
        }
    }
    Ok(format!(
        "{}{}{}",
        backend.type_open(&mapped.name),
        assigns.join(backend.syntax().arg_delimiter),
        backend.type_close()
    ))
}

/// Literal for one value of type `id`
pub fn arg_value<B: Backend + ?Sized>(
    backend: &B,
    session: &mut GenerationSession<'_>,
    id: TypeId,
    value: &Value,
) -> Result<String> {
    if value.is_null() {
        return Ok(backend.syntax().null_str.to_string());
    }
    let mapped = backend.map_type(session, id, Usage::Method)?;
    let node = session.ty(id)?.clone();

    match (&node, value) {
        (Type::Composite(_), Value::Object(fields)) => assign_type(backend, session, id, fields),
        (Type::Array(e) | Type::DelimArray(e), Value::Array(items)) => {
            let mut rendered = Vec::with_capacity(items.len());
            for item in items {
                rendered.push(arg_value(backend, session, *e, item)?);
            }
            let list = backend.array_literal(&rendered);
            Ok(match mapped.coercion {
                Some(ValueCoercion::Wrapped { open, close }) => format!("{open}{list}{close}"),
                _ => list,
            })
        }
        (Type::Hash(e), Value::Object(fields)) => {
            let mut entries = Vec::with_capacity(fields.len());
            for (key, item) in fields {
                entries.push((key.clone(), arg_value(backend, session, *e, item)?));
            }
            Ok(backend.hash_literal(&entries))
        }
        _ => Ok(scalar(backend, &mapped.coercion, value)),
    }
}

fn scalar<B: Backend + ?Sized>(
    backend: &B,
    coercion: &Option<ValueCoercion>,
    value: &Value,
) -> String {
    match (coercion, value) {
        (Some(ValueCoercion::EnumMember(type_name)), Value::String(s)) => {
            backend.enum_member(type_name, &EnumValue::Str(s.clone()))
        }
        (Some(ValueCoercion::EnumMember(type_name)), Value::Number(n)) if n.is_i64() => {
            backend.enum_member(type_name, &EnumValue::Int(n.as_i64().unwrap_or_default()))
        }
        (Some(ValueCoercion::Quoted), Value::String(s)) => backend.quote(s),
        (Some(ValueCoercion::Quoted), other) => backend.quote(&other.to_string()),
        (_, Value::String(s)) => backend.quote(s),
        (_, Value::Bool(b)) => backend.bool_literal(*b),
        (_, Value::Null) => backend.syntax().null_str.to_string(),
        (_, Value::Array(items)) => {
            let items: Vec<String> = items.iter().map(|v| scalar(backend, &None, v)).collect();
            backend.array_literal(&items)
        }
        (_, Value::Object(fields)) => {
            let entries: Vec<(String, String)> = fields
                .iter()
                .map(|(k, v)| (k.clone(), scalar(backend, &None, v)))
                .collect();
            backend.hash_literal(&entries)
        }
        (_, other) => other.to_string(),
    }
}
