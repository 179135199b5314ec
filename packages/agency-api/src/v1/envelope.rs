//! Response envelope detection.
//!
//! The backend wraps its payloads differently depending on the endpoint and
//! on whether pagination is enabled. Observed shapes for a collection:
//!
//! - a bare array: `[{...}, {...}]`
//! - a `data` envelope: `{"data": [...]}`
//! - a paginator inside the envelope: `{"data": {"data": [...], "current_page": 1}}`
//! - other list keys: `{"items": [...]}`, `{"results": [...]}`, `{"records": [...]}`
//! - an object with a single array-valued field: `{"clients": [...], "count": 3}`
//! - `null` for an empty collection
//!
//! A single record is either a bare object or the same object under `data`.

use derive_more::{Display, Error};
use http::StatusCode;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::trace;

use super::FieldError;

/// Keys under which collections have been seen, in lookup order.
const LIST_KEYS: [&str; 3] = ["items", "results", "records"];

/// Longest raw body quoted verbatim in an error message.
const MAX_RAW_MESSAGE: usize = 200;

/// The response did not have a recognizable shape.
#[derive(Clone, Eq, PartialEq, Debug, Display, Error)]
pub enum ShapeError {
    /// Expected a collection, got something else.
    #[display("expected a collection, got {_0}")]
    NotACollection(#[error(not(source))] &'static str),

    /// Expected a single record, got something else.
    #[display("expected a record, got {_0}")]
    NotARecord(#[error(not(source))] &'static str),

    /// An element of the collection did not decode.
    #[display("element {index} is malformed: {message}")]
    Element { index: usize, message: String },

    /// The record did not decode.
    #[display("record is malformed: {_0}")]
    Record(#[error(not(source))] String),
}

/// Extract the array of records from a collection response.
pub fn collection(value: Value) -> Result<Vec<Value>, ShapeError> {
    match value {
        Value::Array(items) => Ok(items),
        Value::Null => Ok(Vec::new()),
        Value::Object(mut object) => {
            if let Some(data) = object.remove("data") {
                trace!("unwrapping `data` envelope");
                return collection(data);
            }
            for key in LIST_KEYS {
                if let Some(Value::Array(items)) = object.remove(key) {
                    trace!(%key, "unwrapping list key");
                    return Ok(items);
                }
            }
            let mut arrays = object
                .into_iter()
                .filter(|(_, value)| value.is_array())
                .collect::<Vec<_>>();
            match arrays.pop() {
                Some((key, Value::Array(items))) if arrays.is_empty() => {
                    trace!(%key, "unwrapping sole array field");
                    Ok(items)
                }
                _ => Err(ShapeError::NotACollection("an object")),
            }
        }
        other => Err(ShapeError::NotACollection(kind(&other))),
    }
}

/// Extract the record from a single-record response.
pub fn record(value: Value) -> Result<Value, ShapeError> {
    match value {
        Value::Object(mut object) => match object.remove("data") {
            Some(data @ Value::Object(_)) => {
                trace!("unwrapping `data` envelope");
                Ok(data)
            }
            Some(data) => {
                object.insert(String::from("data"), data);
                Ok(Value::Object(object))
            }
            None => Ok(Value::Object(object)),
        },
        other => Err(ShapeError::NotARecord(kind(&other))),
    }
}

/// Decode every element of a collection response.
///
/// A single malformed element fails the whole decode; the error names its
/// index so the offending record can be found.
pub fn decode_collection<T: DeserializeOwned>(value: Value) -> Result<Vec<T>, ShapeError> {
    collection(value)?
        .into_iter()
        .enumerate()
        .map(|(index, item)| {
            serde_json::from_value(item).map_err(|err| ShapeError::Element {
                index,
                message: err.to_string(),
            })
        })
        .collect()
}

/// Decode a single-record response.
pub fn decode_record<T: DeserializeOwned>(value: Value) -> Result<T, ShapeError> {
    let value = record(value)?;
    serde_json::from_value(value).map_err(|err| ShapeError::Record(err.to_string()))
}

/// Decode a single-record response that may legitimately carry no record,
/// such as a `201 Created` with an empty body or a bare `{"message": ...}`.
///
/// A record is present when the unwrapped object carries an `id`; a present
/// record that does not decode is an error.
pub fn decode_optional_record<T: DeserializeOwned>(
    value: Value,
) -> Result<Option<T>, ShapeError> {
    let value = match record(value) {
        Ok(value) if value.get("id").is_some_and(|id| !id.is_null()) => value,
        Ok(_) | Err(_) => {
            trace!("response carries no record");
            return Ok(None);
        }
    };
    serde_json::from_value(value)
        .map(Some)
        .map_err(|err| ShapeError::Record(err.to_string()))
}

/// Extract a human-readable message and per-field errors from an error body.
///
/// Recognized bodies:
/// - `{"message": "..."}`
/// - `{"error": "..."}` or `{"error": {"message": "..."}}`
/// - `{"errors": {"field": ["msg", ...]}}`, optionally alongside `message`
///
/// Anything else falls back to the raw body (truncated), then to the
/// status's reason phrase.
pub fn error_details(status: StatusCode, body: &str) -> (String, Vec<FieldError>) {
    let fallback = || {
        let raw = body.trim();
        if raw.is_empty() {
            return status
                .canonical_reason()
                .unwrap_or("unexpected response")
                .to_string();
        }
        match raw.char_indices().nth(MAX_RAW_MESSAGE) {
            Some((cut, _)) => format!("{}…", &raw[..cut]),
            None => raw.to_string(),
        }
    };

    let Ok(Value::Object(object)) = serde_json::from_str::<Value>(body) else {
        return (fallback(), Vec::new());
    };

    let fields = match object.get("errors") {
        Some(Value::Object(errors)) => errors
            .iter()
            .flat_map(|(field, messages)| {
                let messages: Vec<String> = match messages {
                    Value::Array(messages) => messages.iter().filter_map(as_text).collect(),
                    other => as_text(other).into_iter().collect(),
                };
                messages.into_iter().map(|message| FieldError {
                    field: field.clone(),
                    message,
                })
            })
            .collect(),
        _ => Vec::new(),
    };

    let message = object
        .get("message")
        .and_then(as_text)
        .or_else(|| match object.get("error") {
            Some(Value::Object(error)) => error.get("message").and_then(as_text),
            Some(other) => as_text(other),
            None => None,
        })
        .or_else(|| fields.first().map(|field| field.message.clone()))
        .unwrap_or_else(fallback);

    (message, fields)
}

fn as_text(value: &Value) -> Option<String> {
    match value {
        Value::String(text) if !text.trim().is_empty() => Some(text.trim().to_string()),
        _ => None,
    }
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
