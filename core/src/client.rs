//! Authenticated request wrapper for the people API.
//!
//! # Design
//! `NationClient` holds an immutable `ClientConfig` and a `Transport`. A call
//! is split the same way for every endpoint: `build_request` produces an
//! `HttpRequest`, the transport executes it and `parse_response` turns the
//! `HttpResponse` into a `ResponseResult`. Both halves are pure, so they can
//! be tested without a network. `request` never returns an error channel;
//! every failure becomes `ResponseResult::Failure`.

use std::cell::RefCell;
use std::fmt;

use serde::Serialize;
use serde_json::Value;

use crate::config::ClientConfig;
use crate::error::ApiError;
use crate::http::{HttpRequest, HttpResponse, Transport, UreqTransport};
use crate::response::{RequestSpec, ResponseResult};
use crate::types::{NewPerson, PersonEnvelope, PersonUpdate};

/// Blocking client for one nation.
#[derive(Debug)]
pub struct NationClient<T = UreqTransport> {
    config: ClientConfig,
    base_url: String,
    transport: T,
    last_response: RefCell<Option<ResponseResult>>,
}

impl NationClient<UreqTransport> {
    pub fn new(config: ClientConfig) -> Self {
        let transport = UreqTransport::new(config.timeout);
        Self::with_transport(config, transport)
    }
}

impl<T: Transport> NationClient<T> {
    pub fn with_transport(config: ClientConfig, transport: T) -> Self {
        let base_url = config.base_url();
        Self {
            config,
            base_url,
            transport,
            last_response: RefCell::new(None),
        }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// The outcome of the most recent `request`, kept for diagnostics only.
    pub fn last_response(&self) -> Option<ResponseResult> {
        self.last_response.borrow().clone()
    }

    /// Describe `spec` as an authenticated `HttpRequest`.
    pub fn build_request(&self, spec: &RequestSpec) -> HttpRequest {
        let path = spec.path.trim_matches('/');
        HttpRequest {
            method: spec.method,
            url: format!("{}{path}", self.base_url),
            headers: vec![
                ("Accept".to_string(), "application/json".to_string()),
                ("Content-Type".to_string(), "application/json".to_string()),
            ],
            query: vec![
                ("access_token".to_string(), self.config.access_token.clone()),
                ("fire_webhooks".to_string(), "false".to_string()),
            ],
            body: spec.body.clone(),
        }
    }

    /// Interpret a response: 2xx with JSON (or nothing) is a success,
    /// anything else is a failure.
    pub fn parse_response(&self, response: HttpResponse) -> ResponseResult {
        if !response.is_success() {
            return ResponseResult::Failure(ApiError::Status {
                status: response.status,
                body: response.body,
            });
        }
        if response.body.trim().is_empty() {
            return ResponseResult::Success(Value::Null);
        }
        serde_json::from_str::<Value>(&response.body)
            .map_err(|e| ApiError::Decode(e.to_string()))
            .into()
    }

    /// Perform one call and return its normalized outcome.
    pub fn request(&self, spec: RequestSpec) -> ResponseResult {
        let request = self.build_request(&spec);
        tracing::debug!(method = %request.method, url = %request.url, "sending request");

        let result = match self.transport.execute(&request) {
            Ok(response) => {
                tracing::debug!(status = response.status, "received response");
                self.parse_response(response)
            }
            Err(err) => ResponseResult::Failure(err),
        };
        if let ResponseResult::Failure(err) = &result {
            tracing::debug!(error = %err, status = ?err.status(), "request failed");
        }

        *self.last_response.borrow_mut() = Some(result.clone());
        result
    }

    /// `GET people/count`.
    pub fn people_count(&self) -> ResponseResult {
        self.request(RequestSpec::default())
    }

    /// `POST people` with `{"person": new_person}`.
    pub fn create_person(&self, new_person: &NewPerson) -> ResponseResult {
        match envelope(new_person) {
            Ok(body) => self.request(RequestSpec::post("people", body)),
            Err(err) => ResponseResult::Failure(err),
        }
    }

    /// `PUT people/{id}` with `{"person": update}`.
    pub fn update_person(&self, id: impl fmt::Display, update: &PersonUpdate) -> ResponseResult {
        match envelope(update) {
            Ok(body) => self.request(RequestSpec::put(format!("people/{id}"), body)),
            Err(err) => ResponseResult::Failure(err),
        }
    }

    /// `DELETE people/{id}`.
    pub fn delete_person(&self, id: impl fmt::Display) -> ResponseResult {
        self.request(RequestSpec::delete(format!("people/{id}")))
    }
}

fn envelope<P: Serialize>(person: &P) -> Result<String, ApiError> {
    serde_json::to_string(&PersonEnvelope { person })
        .map_err(|e| ApiError::Serialization(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::HttpMethod;
    use serde_json::json;

    /// Answers every request with the same canned outcome.
    struct Canned(Result<HttpResponse, ApiError>);

    impl Transport for Canned {
        fn execute(&self, _request: &HttpRequest) -> Result<HttpResponse, ApiError> {
            self.0.clone()
        }
    }

    fn ok(status: u16, body: &str) -> Canned {
        Canned(Ok(HttpResponse {
            status,
            body: body.to_string(),
        }))
    }

    fn client_with(transport: Canned) -> NationClient<Canned> {
        NationClient::with_transport(ClientConfig::new("acme", "T"), transport)
    }

    fn client() -> NationClient<Canned> {
        client_with(ok(200, "{}"))
    }

    #[test]
    fn build_request_for_default_spec() {
        let req = client().build_request(&RequestSpec::default());
        assert_eq!(req.method, HttpMethod::Get);
        assert_eq!(req.url, "https://acme.nationbuilder.com/api/v1/people/count");
        assert_eq!(req.query_param("access_token"), Some("T"));
        assert_eq!(req.query_param("fire_webhooks"), Some("false"));
        assert!(req.body.is_none());
        assert!(req
            .headers
            .contains(&("Accept".to_string(), "application/json".to_string())));
        assert!(req
            .headers
            .contains(&("Content-Type".to_string(), "application/json".to_string())));
    }

    #[test]
    fn build_request_joins_slashes() {
        let c = client();
        for path in ["people/count", "/people/count", "people/count/", "/people/count/"] {
            let req = c.build_request(&RequestSpec::get(path));
            assert_eq!(req.url, "https://acme.nationbuilder.com/api/v1/people/count", "{path}");
        }
    }

    #[test]
    fn build_request_forwards_body_verbatim() {
        let raw = r#"{"person":{"first_name":"Test"}}"#;
        let req = client().build_request(&RequestSpec::post("people", raw));
        assert_eq!(req.method, HttpMethod::Post);
        assert_eq!(req.body.as_deref(), Some(raw));
    }

    #[test]
    fn parse_success_payload() {
        let c = client();
        let response = HttpResponse {
            status: 200,
            body: r#"{"people_count":10}"#.to_string(),
        };
        assert_eq!(c.parse_response(response), ResponseResult::Success(json!({"people_count": 10})));
    }

    #[test]
    fn parse_empty_no_content() {
        let c = client();
        let response = HttpResponse {
            status: 204,
            body: String::new(),
        };
        assert_eq!(c.parse_response(response), ResponseResult::Success(Value::Null));
    }

    #[test]
    fn parse_error_status() {
        let c = client();
        let response = HttpResponse {
            status: 500,
            body: "internal error".to_string(),
        };
        let result = c.parse_response(response);
        assert!(matches!(
            result,
            ResponseResult::Failure(ApiError::Status { status: 500, ref body }) if body == "internal error"
        ));
    }

    #[test]
    fn parse_bad_json() {
        let c = client();
        let response = HttpResponse {
            status: 200,
            body: "not json".to_string(),
        };
        assert!(matches!(c.parse_response(response), ResponseResult::Failure(ApiError::Decode(_))));
    }

    #[test]
    fn request_folds_transport_error() {
        let c = client_with(Canned(Err(ApiError::Transport("connection refused".into()))));
        let result = c.people_count();
        assert_eq!(result, ResponseResult::Failure(ApiError::Transport("connection refused".into())));
        assert_eq!(c.last_response(), Some(result));
    }

    #[test]
    fn request_folds_unauthorized_status() {
        let c = client_with(ok(401, r#"{"code":"unauthorized"}"#));
        let result = c.people_count();
        assert_eq!(result.error_message().as_deref(), Some(r#"HTTP 401: {"code":"unauthorized"}"#));
    }

    #[test]
    fn last_response_tracks_latest_call() {
        let c = client_with(ok(200, r#"{"people_count":3}"#));
        assert!(c.last_response().is_none());
        c.people_count();
        assert_eq!(c.last_response(), Some(ResponseResult::Success(json!({"people_count": 3}))));
    }
}
