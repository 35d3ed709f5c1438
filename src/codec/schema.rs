//! Purpose: Typed accessors and embedded-JSON helpers for schema-driven transforms.
//! Exports: Field-path builders, `take`, `into_*` coercions, `parse_embedded`, `encode_compact`.
//! Role: Every shape check in the codec goes through here so errors carry a field path.
//! Invariants: Missing keys and wrong JSON types are `ErrorKind::Schema`.
//! Invariants: Unparseable embedded strings are `ErrorKind::Parse`.
//! Invariants: Key removal preserves the order of the remaining keys.

use serde_json::{Map, Value};

use crate::core::error::{Error, ErrorKind};
use crate::json::parse;

pub(crate) fn field_path(parent: &str, key: &str) -> String {
    if parent.is_empty() {
        key.to_string()
    } else {
        format!("{parent}.{key}")
    }
}

pub(crate) fn index_path(parent: &str, index: usize) -> String {
    format!("{parent}[{index}]")
}

fn describe(field: &str) -> &str {
    if field.is_empty() { "document root" } else { field }
}

fn schema_error(field: &str, message: String) -> Error {
    let err = Error::new(ErrorKind::Schema).with_message(message);
    if field.is_empty() {
        err
    } else {
        err.with_field(field)
    }
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

fn type_error(field: &str, expected: &str, found: &Value) -> Error {
    schema_error(
        field,
        format!(
            "expected {expected} at {}, found {}",
            describe(field),
            type_name(found)
        ),
    )
}

/// Removes `key` from `map`, keeping sibling order intact.
pub(crate) fn take(map: &mut Map<String, Value>, key: &str, parent: &str) -> Result<Value, Error> {
    map.shift_remove(key).ok_or_else(|| {
        schema_error(
            &field_path(parent, key),
            format!("missing key `{key}` in {}", describe(parent)),
        )
    })
}

pub(crate) fn into_object(value: Value, field: &str) -> Result<Map<String, Value>, Error> {
    match value {
        Value::Object(map) => Ok(map),
        other => Err(type_error(field, "object", &other)),
    }
}

pub(crate) fn into_array(value: Value, field: &str) -> Result<Vec<Value>, Error> {
    match value {
        Value::Array(items) => Ok(items),
        other => Err(type_error(field, "array", &other)),
    }
}

pub(crate) fn into_string(value: Value, field: &str) -> Result<String, Error> {
    match value {
        Value::String(text) => Ok(text),
        other => Err(type_error(field, "string", &other)),
    }
}

pub(crate) fn ensure_len(
    field: &str,
    actual: usize,
    expected: usize,
    against: &str,
) -> Result<(), Error> {
    if actual == expected {
        return Ok(());
    }
    Err(schema_error(
        field,
        format!("{field} has {actual} entries but {against} has {expected}"),
    ))
}

/// Parses a whole JSON document (outer wire file or canonical file).
pub(crate) fn parse_document(bytes: &[u8], context: &str) -> Result<Value, Error> {
    parse::from_slice(bytes).map_err(|err| {
        Error::new(ErrorKind::Parse)
            .with_message(format!("invalid json in {context}"))
            .with_hint(parse::hint_for_error(&err, context))
            .with_source(err)
    })
}

/// Parses a JSON document that was stored as a string value at `field`.
pub(crate) fn parse_embedded(value: Value, field: &str) -> Result<Value, Error> {
    let text = into_string(value, field)?;
    parse::from_str(&text).map_err(|err| {
        Error::new(ErrorKind::Parse)
            .with_message(format!("invalid embedded json at {field}"))
            .with_field(field)
            .with_hint(parse::hint_for_error(&err, field))
            .with_source(err)
    })
}

/// Parses every string of the array at `field`.
pub(crate) fn parse_embedded_list(value: Value, field: &str) -> Result<Vec<Value>, Error> {
    into_array(value, field)?
        .into_iter()
        .enumerate()
        .map(|(index, item)| parse_embedded(item, &index_path(field, index)))
        .collect()
}

/// Parses every string of the array at `field` as `{"<wrapper>": value}` and unwraps it.
pub(crate) fn unwrap_embedded_list(
    value: Value,
    field: &str,
    wrapper: &str,
) -> Result<Vec<Value>, Error> {
    parse_embedded_list(value, field)?
        .into_iter()
        .enumerate()
        .map(|(index, item)| {
            let item_path = index_path(field, index);
            let mut object = into_object(item, &item_path)?;
            take(&mut object, wrapper, &item_path)
        })
        .collect()
}

/// Compact (`,`/`:` separators, no whitespace) encoding used for every embedded string.
pub(crate) fn encode_compact(value: &Value) -> Result<String, Error> {
    serde_json::to_string(value).map_err(|err| {
        Error::new(ErrorKind::Internal)
            .with_message("failed to encode json")
            .with_source(err)
    })
}

pub(crate) fn embed(value: &Value) -> Result<Value, Error> {
    encode_compact(value).map(Value::String)
}

/// Compact-encodes every element of the array at `field` into a string.
pub(crate) fn embed_list(value: Value, field: &str) -> Result<Vec<Value>, Error> {
    into_array(value, field)?.iter().map(embed).collect()
}

/// Wraps every element of the array at `field` as `{"<wrapper>": value}` and embeds it.
pub(crate) fn wrap_embed_list(
    value: Value,
    field: &str,
    wrapper: &str,
) -> Result<Vec<Value>, Error> {
    into_array(value, field)?
        .into_iter()
        .map(|item| {
            let mut object = Map::new();
            object.insert(wrapper.to_string(), item);
            embed(&Value::Object(object))
        })
        .collect()
}
