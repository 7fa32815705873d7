//! In-memory stand-in for the NationBuilder people API.
//!
//! Serves `/api/v1/people/count`, `/api/v1/people` and `/api/v1/people/{id}`
//! with the status codes and error bodies the real service uses. Every request
//! must carry the configured token as the `access_token` query parameter.

use std::{collections::BTreeMap, sync::Arc};

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use tokio::{net::TcpListener, sync::RwLock};

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Person {
    pub id: u64,
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

#[derive(Debug, Default)]
pub struct Store {
    people: BTreeMap<u64, Person>,
    next_id: u64,
}

#[derive(Clone)]
pub struct AppState {
    store: Arc<RwLock<Store>>,
    token: Arc<str>,
}

#[derive(Debug, Deserialize)]
pub struct AuthQuery {
    pub access_token: Option<String>,
}

pub fn app(token: &str) -> Router {
    let state = AppState {
        store: Arc::new(RwLock::new(Store::default())),
        token: Arc::from(token),
    };
    let api = Router::new()
        .route("/people/count", get(count_people))
        .route("/people", post(create_person))
        .route("/people/{id}", get(show_person).put(update_person).delete(delete_person))
        .with_state(state);
    Router::new().nest("/api/v1", api)
}

pub async fn run(listener: TcpListener, token: &str) -> Result<(), std::io::Error> {
    axum::serve(listener, app(token)).await
}

fn error(status: StatusCode, code: &str, message: &str) -> Response {
    (status, Json(json!({ "code": code, "message": message }))).into_response()
}

fn authorize(state: &AppState, query: &AuthQuery) -> Result<(), Response> {
    match query.access_token.as_deref() {
        Some(token) if token == &*state.token => Ok(()),
        _ => {
            tracing::info!("rejecting request without a valid access token");
            Err(error(
                StatusCode::UNAUTHORIZED,
                "unauthorized",
                "You are not authorized to access this content. Your access token may be missing.",
            ))
        }
    }
}

fn not_found() -> Response {
    error(StatusCode::NOT_FOUND, "not_found", "Record not found")
}

/// Pull the `person` object out of a request body.
fn person_fields(body: Value) -> Result<Map<String, Value>, Response> {
    match body {
        Value::Object(mut map) => match map.remove("person") {
            Some(Value::Object(fields)) => Ok(fields),
            _ => Err(missing_person()),
        },
        _ => Err(missing_person()),
    }
}

fn missing_person() -> Response {
    error(
        StatusCode::BAD_REQUEST,
        "missing_parameters",
        "Missing required parameters: person",
    )
}

async fn count_people(State(state): State<AppState>, Query(query): Query<AuthQuery>) -> Response {
    if let Err(rejection) = authorize(&state, &query) {
        return rejection;
    }
    let count = state.store.read().await.people.len();
    Json(json!({ "people_count": count })).into_response()
}

async fn create_person(
    State(state): State<AppState>,
    Query(query): Query<AuthQuery>,
    Json(body): Json<Value>,
) -> Response {
    if let Err(rejection) = authorize(&state, &query) {
        return rejection;
    }
    let mut fields = match person_fields(body) {
        Ok(fields) => fields,
        Err(rejection) => return rejection,
    };
    fields.remove("id");

    let mut store = state.store.write().await;
    store.next_id += 1;
    let person = Person {
        id: store.next_id,
        fields,
    };
    store.people.insert(person.id, person.clone());
    tracing::debug!(id = person.id, "created person");
    (StatusCode::CREATED, Json(json!({ "person": person }))).into_response()
}

async fn show_person(
    State(state): State<AppState>,
    Path(id): Path<u64>,
    Query(query): Query<AuthQuery>,
) -> Response {
    if let Err(rejection) = authorize(&state, &query) {
        return rejection;
    }
    let store = state.store.read().await;
    match store.people.get(&id) {
        Some(person) => Json(json!({ "person": person })).into_response(),
        None => not_found(),
    }
}

async fn update_person(
    State(state): State<AppState>,
    Path(id): Path<u64>,
    Query(query): Query<AuthQuery>,
    Json(body): Json<Value>,
) -> Response {
    if let Err(rejection) = authorize(&state, &query) {
        return rejection;
    }
    let fields = match person_fields(body) {
        Ok(fields) => fields,
        Err(rejection) => return rejection,
    };

    let mut store = state.store.write().await;
    let Some(person) = store.people.get_mut(&id) else {
        return not_found();
    };
    for (key, value) in fields {
        if key != "id" {
            person.fields.insert(key, value);
        }
    }
    Json(json!({ "person": person })).into_response()
}

async fn delete_person(
    State(state): State<AppState>,
    Path(id): Path<u64>,
    Query(query): Query<AuthQuery>,
) -> Response {
    if let Err(rejection) = authorize(&state, &query) {
        return rejection;
    }
    match state.store.write().await.people.remove(&id) {
        Some(_) => StatusCode::NO_CONTENT.into_response(),
        None => not_found(),
    }
}
