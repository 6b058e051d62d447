//! Typed result envelope for single-resource calls.
//!
//! An [`ApiResult`] is produced once a call completes and holds either the
//! accepted [`Response`] or the [`Error`] that ended the call, never both.
//! Decoding into the payload type is deferred until [`ApiResult::extract`].

use crate::client::Response;
use crate::{Error, Result};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::fmt;
use std::marker::PhantomData;

/// Types that can be decoded from a response body.
pub trait ResponsePayload: Sized {
    /// Decode from a parsed body; `None` means the body was empty.
    fn from_body(body: Option<Value>) -> Result<Self>;
}

impl ResponsePayload for () {
    fn from_body(_body: Option<Value>) -> Result<Self> {
        Ok(())
    }
}

/// Decode the value stored under `key` in a response body.
///
/// # Errors
///
/// Returns [`Error::DecodeError`] when the body is empty, lacks `key`, or
/// the value does not match `T`.
pub fn extract_into<T>(body: Option<Value>, key: &str) -> Result<T>
where
    T: DeserializeOwned,
{
    let Some(Value::Object(mut fields)) = body else {
        return Err(Error::DecodeError(format!(
            "Expected a JSON object with key `{key}`"
        )));
    };
    let value = fields
        .remove(key)
        .ok_or_else(|| Error::DecodeError(format!("Response is missing key `{key}`")))?;
    serde_json::from_value(value)
        .map_err(|err| Error::DecodeError(format!("Failed to decode `{key}`: {err}")))
}

/// Outcome of a completed call.
pub struct ApiResult<T> {
    outcome: Result<Response>,
    _payload: PhantomData<fn() -> T>,
}

impl<T> ApiResult<T> {
    /// Wrap the outcome of a transport call.
    #[must_use]
    pub fn from_outcome(outcome: Result<Response>) -> Self {
        Self {
            outcome,
            _payload: PhantomData,
        }
    }

    /// Result of a call that failed before reaching the transport.
    #[must_use]
    pub fn from_error(err: Error) -> Self {
        Self::from_outcome(Err(err))
    }

    /// The error, if the call failed.
    #[must_use]
    pub fn err(&self) -> Option<&Error> {
        self.outcome.as_ref().err()
    }

    /// Whether the call succeeded.
    #[must_use]
    pub fn is_ok(&self) -> bool {
        self.outcome.is_ok()
    }

    /// The accepted response, if the call succeeded.
    #[must_use]
    pub fn response(&self) -> Option<&Response> {
        self.outcome.as_ref().ok()
    }

    /// The parsed body, if the call succeeded and returned one.
    #[must_use]
    pub fn body(&self) -> Option<&Value> {
        self.response().and_then(|response| response.body.as_ref())
    }

    /// Discard the payload and keep only the error.
    pub fn extract_err(self) -> Result<()> {
        self.outcome.map(|_| ())
    }

    /// Unwrap into the raw transport outcome.
    pub fn into_response(self) -> Result<Response> {
        self.outcome
    }
}

impl<T: ResponsePayload> ApiResult<T> {
    /// Decode the payload, or return the error that ended the call.
    pub fn extract(self) -> Result<T> {
        T::from_body(self.outcome?.body)
    }
}

impl<T> fmt::Debug for ApiResult<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiResult")
            .field("outcome", &self.outcome)
            .finish()
    }
}
