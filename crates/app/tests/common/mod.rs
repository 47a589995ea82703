//! In-process stand-in for the users and posts endpoints.

use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

use axum::Router;
use axum::extract::{Path as UrlPath, Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::Json;
use parking_lot::Mutex;
use serde_json::{Value, json};

pub const TOKEN: &str = "e2e-token";

/// One resource collection, e.g. `/public/v2/users`.
#[derive(Clone)]
pub struct Collection {
    records: Arc<Mutex<BTreeMap<u64, Value>>>,
    next_id: Arc<AtomicU64>,
    unique: Option<&'static str>,
    ignore_filters: Arc<AtomicBool>,
}

impl Collection {
    fn seeded(records: Vec<Value>, unique: Option<&'static str>) -> Self {
        let records: BTreeMap<u64, Value> = records
            .into_iter()
            .enumerate()
            .map(|(i, mut record)| {
                let id = i as u64 + 1;
                record["id"] = json!(id);
                (id, record)
            })
            .collect();
        let next_id = records.len() as u64 + 1;
        Self {
            records: Arc::new(Mutex::new(records)),
            next_id: Arc::new(AtomicU64::new(next_id)),
            unique,
            ignore_filters: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn len(&self) -> usize {
        self.records.lock().len()
    }

    /// Stores `record` as-is under a fresh id, bypassing validation.
    pub fn insert_raw(&self, mut record: Value) -> u64 {
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        record["id"] = json!(id);
        self.records.lock().insert(id, record);
        id
    }

    /// Makes list requests return every record whatever the query says.
    pub fn ignore_filters(&self) {
        self.ignore_filters.store(true, Ordering::SeqCst);
    }

    fn router(self, base: &str) -> Router {
        Router::new()
            .route(base, get(list).post(create))
            .route(&format!("{base}/{{id}}"), get(fetch).put(update).delete(remove))
            .with_state(self)
    }
}

/// Handle on a running mock server.
pub struct MockApi {
    pub base_url: String,
    pub users: Collection,
    pub posts: Collection,
}

pub async fn start() -> MockApi {
    let users = Collection::seeded(
        vec![
            json!({"name": "Ada Seed", "email": "ada@seed.test", "gender": "female", "status": "active"}),
            json!({"name": "Bob Seed", "email": "bob@seed.test", "gender": "male", "status": "inactive"}),
        ],
        Some("email"),
    );
    let posts = Collection::seeded(
        vec![
            json!({"user_id": 1, "title": "First", "body": "Seeded post"}),
            json!({"user_id": 2, "title": "Second", "body": "Another seeded post"}),
        ],
        None,
    );

    let router = users
        .clone()
        .router("/public/v2/users")
        .merge(posts.clone().router("/public/v2/posts"));

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });

    MockApi {
        base_url: format!("http://{addr}"),
        users,
        posts,
    }
}

/// Writes `config-<env>.properties` into `dir`.
pub fn write_config(dir: &Path, env: &str, base_url: &str, token: &str) -> PathBuf {
    let path = dir.join(format!("config-{env}.properties"));
    let contents = format!("base.url={base_url}\nauth.token={token}\ntimeout=2000\n");
    std::fs::write(&path, contents).unwrap();
    path
}

fn authorized(headers: &HeaderMap) -> bool {
    headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v == format!("Bearer {TOKEN}"))
}

fn unauthorized() -> Response {
    (
        StatusCode::UNAUTHORIZED,
        Json(json!({"message": "Authentication failed"})),
    )
        .into_response()
}

fn not_found() -> Response {
    (
        StatusCode::NOT_FOUND,
        Json(json!({"message": "Resource not found"})),
    )
        .into_response()
}

fn matches(record: &Value, key: &str, wanted: &str) -> bool {
    match record.get(key).and_then(Value::as_str) {
        Some(value) if key == "name" || key == "title" => value.contains(wanted),
        Some(value) => value == wanted,
        None => false,
    }
}

async fn list(
    State(collection): State<Collection>,
    headers: HeaderMap,
    Query(filters): Query<HashMap<String, String>>,
) -> Response {
    if !authorized(&headers) {
        return unauthorized();
    }
    let filtered = !collection.ignore_filters.load(Ordering::SeqCst);
    let records: Vec<Value> = collection
        .records
        .lock()
        .values()
        .filter(|record| !filtered || filters.iter().all(|(k, v)| matches(record, k, v)))
        .cloned()
        .collect();
    Json(Value::Array(records)).into_response()
}

async fn create(
    State(collection): State<Collection>,
    headers: HeaderMap,
    Json(mut record): Json<Value>,
) -> Response {
    if !authorized(&headers) {
        return unauthorized();
    }
    let mut records = collection.records.lock();
    if let Some(field) = collection.unique {
        if records.values().any(|r| r.get(field) == record.get(field)) {
            return (
                StatusCode::UNPROCESSABLE_ENTITY,
                Json(json!([{"field": field, "message": "has already been taken"}])),
            )
                .into_response();
        }
    }
    let id = collection.next_id.fetch_add(1, Ordering::SeqCst);
    record["id"] = json!(id);
    records.insert(id, record.clone());
    (StatusCode::CREATED, Json(record)).into_response()
}

async fn fetch(
    State(collection): State<Collection>,
    headers: HeaderMap,
    UrlPath(id): UrlPath<u64>,
) -> Response {
    if !authorized(&headers) {
        return unauthorized();
    }
    match collection.records.lock().get(&id) {
        Some(record) => Json(record.clone()).into_response(),
        None => not_found(),
    }
}

async fn update(
    State(collection): State<Collection>,
    headers: HeaderMap,
    UrlPath(id): UrlPath<u64>,
    Json(changes): Json<Value>,
) -> Response {
    if !authorized(&headers) {
        return unauthorized();
    }
    let mut records = collection.records.lock();
    let Some(record) = records.get_mut(&id) else {
        return not_found();
    };
    if let (Some(target), Some(changes)) = (record.as_object_mut(), changes.as_object()) {
        for (key, value) in changes {
            if key != "id" {
                target.insert(key.clone(), value.clone());
            }
        }
    }
    Json(record.clone()).into_response()
}

async fn remove(
    State(collection): State<Collection>,
    headers: HeaderMap,
    UrlPath(id): UrlPath<u64>,
) -> Response {
    if !authorized(&headers) {
        return unauthorized();
    }
    match collection.records.lock().remove(&id) {
        Some(_) => StatusCode::NO_CONTENT.into_response(),
        None => not_found(),
    }
}
