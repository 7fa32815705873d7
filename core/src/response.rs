//! The per-call request description and its normalized outcome.

use serde_json::Value;

use crate::error::ApiError;
use crate::http::HttpMethod;

/// Path used when a request names none: the people count endpoint.
pub const DEFAULT_PATH: &str = "people/count";

/// One call to the API: method, path relative to the base endpoint and an
/// optional pre-serialized JSON body sent verbatim.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestSpec {
    pub method: HttpMethod,
    pub path: String,
    pub body: Option<String>,
}

impl Default for RequestSpec {
    fn default() -> Self {
        Self::get(DEFAULT_PATH)
    }
}

impl RequestSpec {
    pub fn new(method: HttpMethod, path: impl Into<String>, body: Option<String>) -> Self {
        Self {
            method,
            path: path.into(),
            body,
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(HttpMethod::Get, path, None)
    }

    pub fn post(path: impl Into<String>, body: impl Into<String>) -> Self {
        Self::new(HttpMethod::Post, path, Some(body.into()))
    }

    pub fn put(path: impl Into<String>, body: impl Into<String>) -> Self {
        Self::new(HttpMethod::Put, path, Some(body.into()))
    }

    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(HttpMethod::Delete, path, None)
    }
}

/// Normalized outcome of one request.
///
/// Every failure class ends up in `Failure`; callers match on the variant
/// instead of handling a separate error channel.
#[derive(Debug, Clone, PartialEq)]
pub enum ResponseResult {
    /// Decoded JSON body of a 2xx response. An empty body decodes to `Null`.
    Success(Value),
    Failure(ApiError),
}

impl ResponseResult {
    pub fn payload(&self) -> Option<&Value> {
        match self {
            ResponseResult::Success(value) => Some(value),
            ResponseResult::Failure(_) => None,
        }
    }

    /// Top-level field of a successful payload.
    pub fn field(&self, key: &str) -> Option<&Value> {
        self.payload().and_then(|value| value.get(key))
    }

    /// Human-readable error for this outcome.
    ///
    /// For a `Failure` this is the error's message. A `Success` payload can
    /// still report an error in-band through an `error` or `message` string,
    /// which is returned as well.
    pub fn error_message(&self) -> Option<String> {
        match self {
            ResponseResult::Failure(err) => Some(err.to_string()),
            ResponseResult::Success(value) => ["error", "message"]
                .iter()
                .find_map(|key| value.get(*key))
                .map(|v| match v {
                    Value::String(s) => s.clone(),
                    other => other.to_string(),
                }),
        }
    }

    /// `true` when the outcome carries no error, in-band or otherwise.
    pub fn is_ok_without_error(&self) -> bool {
        match self {
            ResponseResult::Failure(_) => false,
            ResponseResult::Success(value) => value.get("error").is_none(),
        }
    }
}

impl From<Result<Value, ApiError>> for ResponseResult {
    fn from(result: Result<Value, ApiError>) -> Self {
        match result {
            Ok(value) => ResponseResult::Success(value),
            Err(err) => ResponseResult::Failure(err),
        }
    }
}
