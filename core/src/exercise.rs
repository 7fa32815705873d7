//! The create/read/update/delete exercise run against a nation.
//!
//! # Design
//! The runner issues six requests strictly in order: count, create, update,
//! count, delete, count. Only the count, create and update steps have
//! response shapes the rest of the run depends on; when one of them is
//! missing the run stops with `ExerciseError::MissingField`. The later
//! counts and the delete are informational and never abort. Status lines go
//! to a `Reporter` so the caller decides where they end up.

use chrono::Utc;
use serde_json::Value;

use crate::client::NationClient;
use crate::error::ExerciseError;
use crate::http::Transport;
use crate::response::ResponseResult;
use crate::types::{NewPerson, PersonUpdate};

/// Domain of the synthetic email address given to the test person.
pub const EMAIL_DOMAIN: &str = "example.com";

const CONNECT_FAILED: &str = "Oops, failed basic connection to NationBuilder.";
const CREATE_FAILED: &str = "Seems we failed to create a new person.";
const UPDATE_FAILED: &str = "Something went wrong updating this person.";

/// Sink for the exercise's status lines.
pub trait Reporter {
    fn report(&mut self, message: &str);
}

/// Prints each status line on standard output.
#[derive(Debug, Default, Clone, Copy)]
pub struct StdoutReporter;

impl Reporter for StdoutReporter {
    fn report(&mut self, message: &str) {
        println!("{message}");
    }
}

impl Reporter for Vec<String> {
    fn report(&mut self, message: &str) {
        self.push(message.to_string());
    }
}

/// What a completed run observed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExerciseReport {
    pub initial_count: u64,
    /// Id of the created person as it appears in request paths.
    pub person_id: String,
    pub email: String,
    pub count_after_create: Option<u64>,
    pub deleted: bool,
    pub final_count: Option<u64>,
}

/// One exercise run over a client.
pub struct Exercise<'a, T, R> {
    client: &'a NationClient<T>,
    reporter: R,
    timestamp: Option<i64>,
}

impl<'a, T: Transport, R: Reporter> Exercise<'a, T, R> {
    pub fn new(client: &'a NationClient<T>, reporter: R) -> Self {
        Self {
            client,
            reporter,
            timestamp: None,
        }
    }

    /// Fix the unix time used in the test person's last name.
    pub fn with_timestamp(mut self, timestamp: i64) -> Self {
        self.timestamp = Some(timestamp);
        self
    }

    pub fn into_reporter(self) -> R {
        self.reporter
    }

    /// Run all six steps.
    pub fn run(&mut self) -> Result<ExerciseReport, ExerciseError> {
        let slug = self.client.config().account_slug.clone();
        self.reporter
            .report(&format!("Connecting to NationBuilder with slug '{slug}'"));

        let response = self.client.people_count();
        let initial_count = people_count(&response).ok_or_else(|| abort(&response, CONNECT_FAILED))?;
        self.reporter.report(&format!("People count: {initial_count}"));

        let timestamp = self.timestamp.unwrap_or_else(|| Utc::now().timestamp());
        let new_person = NewPerson {
            first_name: "Test".to_string(),
            last_name: format!("Person {timestamp}"),
        };
        let response = self.client.create_person(&new_person);
        let created = created_person(&response).ok_or_else(|| abort(&response, CREATE_FAILED))?;
        self.reporter.report(&format!("New person id: {}", created.id));
        self.reporter.report(&format!(
            "New person name: '{} {}'",
            created.first_name, created.last_name
        ));

        let email = derive_email(&created.first_name, &created.last_name);
        let update = PersonUpdate {
            email: Some(email.clone()),
            ..Default::default()
        };
        let response = self.client.update_person(&created.id, &update);
        let updated = response
            .field("person")
            .ok_or_else(|| abort(&response, UPDATE_FAILED))?;
        let stored_email = string_field(updated, "email").ok_or_else(|| abort(&response, UPDATE_FAILED))?;
        self.reporter.report(&format!(
            "The email address we added to '{} {}': {stored_email}",
            string_field(updated, "first_name").unwrap_or(created.first_name.as_str()),
            string_field(updated, "last_name").unwrap_or(created.last_name.as_str()),
        ));

        let response = self.client.people_count();
        let count_after_create = people_count(&response);
        match count_after_create {
            Some(count) => self.reporter.report(&format!("People count: {count}")),
            None => warn_unavailable("count after create", &response),
        }

        let response = self.client.delete_person(&created.id);
        let deleted = response.is_ok_without_error();
        if deleted {
            self.reporter
                .report(&format!("Person with id {} deleted.", created.id));
        } else {
            warn_unavailable("delete", &response);
        }

        let response = self.client.people_count();
        let final_count = people_count(&response);
        match final_count {
            Some(count) => self.reporter.report(&format!("People count in Nation: {count}")),
            None => warn_unavailable("final count", &response),
        }

        self.reporter.report("End of exercise.");

        Ok(ExerciseReport {
            initial_count,
            person_id: created.id,
            email,
            count_after_create,
            deleted,
            final_count,
        })
    }
}

/// `lower(first).lower(last)@EMAIL_DOMAIN`, stripped to valid email characters.
pub fn derive_email(first_name: &str, last_name: &str) -> String {
    sanitize_email(&format!(
        "{}.{}@{EMAIL_DOMAIN}",
        first_name.to_lowercase(),
        last_name.to_lowercase()
    ))
}

/// Remove every character that may not appear in an email address.
///
/// Kept: ASCII letters and digits plus ``!#$%&'*+-=?^_`{|}~@.[]``.
/// Everything else, including whitespace and non-ASCII, is dropped.
pub fn sanitize_email(raw: &str) -> String {
    raw.chars().filter(|c| is_email_char(*c)).collect()
}

fn is_email_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || "!#$%&'*+-=?^_`{|}~@.[]".contains(c)
}

/// The fields of a freshly created person the later steps depend on.
struct CreatedPerson {
    id: String,
    first_name: String,
    last_name: String,
}

/// `people_count` as a whole number. Integers, integral floats and numeric
/// strings are all accepted.
fn people_count(response: &ResponseResult) -> Option<u64> {
    match response.field("people_count")? {
        Value::Number(n) => n.as_u64().or_else(|| {
            n.as_f64()
                .filter(|f| f.is_finite() && *f >= 0.0 && f.fract() == 0.0)
                .map(|f| f as u64)
        }),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn created_person(response: &ResponseResult) -> Option<CreatedPerson> {
    let person = response.field("person")?;
    Some(CreatedPerson {
        id: id_segment(person.get("id")?)?,
        first_name: string_field(person, "first_name")?.to_string(),
        last_name: string_field(person, "last_name")?.to_string(),
    })
}

/// Render an id, numeric or textual, as a path segment.
fn id_segment(id: &Value) -> Option<String> {
    match id {
        Value::Number(n) => Some(n.to_string()),
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        _ => None,
    }
}

fn string_field<'v>(object: &'v Value, key: &str) -> Option<&'v str> {
    object.get(key).and_then(Value::as_str)
}

fn abort(response: &ResponseResult, context: &'static str) -> ExerciseError {
    ExerciseError::MissingField {
        context,
        server_error: response.error_message(),
    }
}

fn warn_unavailable(step: &str, response: &ResponseResult) {
    let error = response.error_message().unwrap_or_else(|| "unexpected response".to_string());
    tracing::warn!(step, %error, "informational step did not succeed");
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn email_from_synthetic_person() {
        assert_eq!(
            derive_email("Test", "Person 1700000000"),
            "test.person1700000000@example.com"
        );
    }

    #[test]
    fn sanitize_keeps_permitted_symbols() {
        assert_eq!(sanitize_email("a.b+tag@[127.0.0.1]"), "a.b+tag@[127.0.0.1]");
        assert_eq!(sanitize_email("o'neil{x}|y~@ex.com"), "o'neil{x}|y~@ex.com");
    }

    #[test]
    fn sanitize_strips_illegal_characters() {
        assert_eq!(sanitize_email("jo hn(x)<y>,\"z\";:\\@ex.com"), "johnxyz@ex.com");
        assert_eq!(sanitize_email("zoë.ñ@ex.com"), "zo.@ex.com");
        assert_eq!(sanitize_email("tab\there@ex.com"), "tabhere@ex.com");
    }

    #[test]
    fn count_accepts_integral_forms() {
        for value in [json!(10), json!(10.0), json!("10"), json!(" 10 ")] {
            let response = ResponseResult::Success(json!({ "people_count": value }));
            assert_eq!(people_count(&response), Some(10), "{value}");
        }
    }

    #[test]
    fn count_rejects_non_counts() {
        for value in [json!(-1), json!(2.5), json!("ten"), json!(null), json!([1])] {
            let response = ResponseResult::Success(json!({ "people_count": value }));
            assert_eq!(people_count(&response), None, "{value}");
        }
        assert_eq!(people_count(&ResponseResult::Success(json!({}))), None);
    }

    #[test]
    fn created_person_accepts_textual_id() {
        let response = ResponseResult::Success(json!({
            "person": {"id": "7", "first_name": "Test", "last_name": "Person 1"}
        }));
        let created = created_person(&response).unwrap();
        assert_eq!(created.id, "7");
        assert_eq!(created.last_name, "Person 1");
    }

    #[test]
    fn created_person_needs_id_and_names() {
        for person in [
            json!({"first_name": "Test", "last_name": "Person 1"}),
            json!({"id": null, "first_name": "Test", "last_name": "Person 1"}),
            json!({"id": 7, "last_name": "Person 1"}),
            json!({"id": 7, "first_name": "Test"}),
        ] {
            let response = ResponseResult::Success(json!({ "person": person }));
            assert!(created_person(&response).is_none(), "{person}");
        }
    }

    #[test]
    fn vec_reporter_collects_lines() {
        let mut lines: Vec<String> = Vec::new();
        lines.report("one");
        lines.report("two");
        assert_eq!(lines, vec!["one", "two"]);
    }
}
