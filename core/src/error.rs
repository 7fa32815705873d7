//! Error types for the people API client and the exercise runner.
//!
//! # Design
//! `ApiError` keeps the failure classes apart (transport, status, decode)
//! even though callers see all of them through the same
//! `ResponseResult::Failure` shape. Its `Display` text is the
//! human-readable message surfaced to users. `ExerciseError` is the only
//! error that ends an exercise run.

use thiserror::Error;

/// Failure of a single request, carried inside `ResponseResult::Failure`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    /// No response was obtained: DNS, connect, TLS or timeout failure.
    #[error("transport error: {0}")]
    Transport(String),

    /// The server answered with a non-2xx status.
    #[error("HTTP {status}: {body}")]
    Status { status: u16, body: String },

    /// The response body was not valid JSON.
    #[error("invalid JSON response: {0}")]
    Decode(String),

    /// A request payload could not be serialized to JSON.
    #[error("serialization failed: {0}")]
    Serialization(String),
}

impl ApiError {
    /// HTTP status code, when the server produced a response.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Reason an exercise run stopped before completing.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExerciseError {
    /// A response lacked a field the next step depends on.
    #[error("{}", render_missing_field(.context, .server_error.as_deref()))]
    MissingField {
        context: &'static str,
        server_error: Option<String>,
    },
}

fn render_missing_field(context: &str, server_error: Option<&str>) -> String {
    match server_error {
        Some(detail) => format!("{context}\n\n{detail}\nExercise aborted"),
        None => context.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_error_keeps_server_text() {
        let err = ApiError::Status {
            status: 401,
            body: r#"{"code":"unauthorized"}"#.to_string(),
        };
        assert_eq!(err.to_string(), r#"HTTP 401: {"code":"unauthorized"}"#);
        assert_eq!(err.status(), Some(401));
        assert_eq!(ApiError::Decode("eof".into()).status(), None);
    }

    #[test]
    fn missing_field_without_server_error_is_just_context() {
        let err = ExerciseError::MissingField {
            context: "Seems we failed to create a new person.",
            server_error: None,
        };
        assert_eq!(err.to_string(), "Seems we failed to create a new person.");
    }

    #[test]
    fn missing_field_appends_server_error() {
        let err = ExerciseError::MissingField {
            context: "Oops, failed basic connection to NationBuilder.",
            server_error: Some("unauthorized".to_string()),
        };
        assert_eq!(
            err.to_string(),
            "Oops, failed basic connection to NationBuilder.\n\nunauthorized\nExercise aborted"
        );
    }
}
