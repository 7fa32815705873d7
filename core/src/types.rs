//! People API DTOs.
//!
//! # Design
//! Only outgoing payloads are typed. Person records coming back from the
//! server stay `serde_json::Value`s; the client never validates them.

use serde::{Deserialize, Serialize};

/// Payload for creating a person.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct NewPerson {
    pub first_name: String,
    pub last_name: String,
}

/// Payload for updating a person. Omitted fields stay unchanged on the server.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct PersonUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

/// The `{"person": ...}` wrapper the API expects around person payloads.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PersonEnvelope<T> {
    pub person: T,
}
