//! Blocking client core for the NationBuilder people API.
//!
//! # Overview
//! `NationClient` wraps every call in the same contract: build an
//! authenticated request (token and `fire_webhooks=false` as query
//! parameters, JSON headers), execute it through a `Transport`, and fold the
//! outcome into a `ResponseResult`. `Exercise` drives the client through a
//! fixed count/create/update/count/delete/count sequence.
//!
//! # Design
//! - Request building and response parsing are pure; I/O lives behind the
//!   `Transport` trait, with `UreqTransport` as the default.
//! - Failures are data. `request` always returns a `ResponseResult`; only the
//!   exercise produces an `Err`, and only for a missing response field.
//! - DTOs are defined independently from the mock-server crate; integration
//!   tests catch schema drift.

pub mod client;
pub mod config;
pub mod error;
pub mod exercise;
pub mod http;
pub mod response;
pub mod types;

pub use client::NationClient;
pub use config::ClientConfig;
pub use error::{ApiError, ExerciseError};
pub use exercise::{derive_email, sanitize_email, Exercise, ExerciseReport, Reporter, StdoutReporter};
pub use http::{HttpMethod, HttpRequest, HttpResponse, Transport, UreqTransport};
pub use response::{RequestSpec, ResponseResult};
pub use types::{NewPerson, PersonEnvelope, PersonUpdate};
