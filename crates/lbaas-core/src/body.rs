//! Request body construction.
//!
//! Create and update calls send their options wrapped under a single
//! envelope key, e.g. `{"loadbalancer": {...}}`. Option structs describe
//! their required fields with `validator` and their omitted fields with
//! `#[serde(skip_serializing_if = "Option::is_none")]`.

use crate::{Error, Result};
use serde::Serialize;
use serde_json::{Map, Value};
use validator::Validate;

/// Validate `opts` and serialize it as `{ envelope: { ... } }`.
///
/// # Errors
///
/// Returns [`Error::ValidationError`] when a required field is missing and
/// [`Error::EncodingError`] when `opts` does not serialize to a JSON object.
pub fn build_request_body<T>(opts: &T, envelope: &str) -> Result<Value>
where
    T: Serialize + Validate,
{
    opts.validate()?;

    let fields = match serde_json::to_value(opts) {
        Ok(Value::Object(fields)) => fields,
        Ok(other) => {
            return Err(Error::EncodingError(format!(
                "`{envelope}` options must serialize to an object, got {other}"
            )))
        }
        Err(err) => {
            return Err(Error::EncodingError(format!(
                "Failed to serialize `{envelope}` options: {err}"
            )))
        }
    };

    let mut body = Map::with_capacity(1);
    body.insert(envelope.to_string(), Value::Object(fields));
    Ok(Value::Object(body))
}
