use crate::domain::model::{RawResponse, Record};
use crate::utils::error::{EtlError, Result};
use serde_json::Value;

/// Turns a raw response into records.
///
/// Only status 200 counts as success; any other status is returned as
/// [`EtlError::HttpError`] without looking at the body. A 200 body must be a
/// JSON array whose elements are all objects.
pub fn interpret(response: RawResponse) -> Result<Vec<Record>> {
    if response.status != 200 {
        return Err(EtlError::HttpError {
            status: response.status,
            body: response.body,
        });
    }

    let json: Value =
        serde_json::from_str(&response.body).map_err(|e| EtlError::MalformedResponse {
            message: format!("body is not valid JSON: {}", e),
        })?;

    let items = match json {
        Value::Array(items) => items,
        other => {
            return Err(EtlError::MalformedResponse {
                message: format!("expected a JSON array, got {}", kind(&other)),
            })
        }
    };

    items
        .into_iter()
        .enumerate()
        .map(|(index, item)| match item {
            Value::Object(data) => Ok(Record { data }),
            other => Err(EtlError::MalformedResponse {
                message: format!("element {} is {}, expected an object", index, kind(&other)),
            }),
        })
        .collect()
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
