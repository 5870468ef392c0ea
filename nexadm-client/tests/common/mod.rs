//! Shared test harness: an in-process mock of the Nexus administrative API.

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use serde_json::{json, Value};
use tokio::net::TcpListener;

use nexadm_client::{ClientConfig, HttpClient, RetryPolicy};

/// `admin:admin123`
const EXPECTED_AUTH: &str = "Basic YWRtaW46YWRtaW4xMjM=";

#[derive(Default)]
pub struct MockState {
    pub rules: Vec<Value>,
    pub users: Vec<Value>,
    /// File blob stores: name -> config (the instance read has no name).
    pub blobstores: HashMap<String, Value>,
    /// Capabilities, each carrying a server-assigned `id`.
    pub capabilities: Vec<Value>,
    /// Every write issued against the server, as `METHOD /path`.
    pub writes: Vec<String>,
    /// When set, PUT and DELETE answer 404 as if the target vanished.
    pub vanish_on_write: bool,
    /// When set, every request answers 403.
    pub forbidden: bool,
}

pub struct MockNexus {
    pub addr: SocketAddr,
    pub state: Arc<Mutex<MockState>>,
    shutdown_tx: tokio::sync::oneshot::Sender<()>,
}

type Shared = Arc<Mutex<MockState>>;

impl MockNexus {
    pub async fn spawn() -> Self {
        let state: Shared = Arc::new(Mutex::new(MockState::default()));

        let router = Router::new()
            .route(
                "/service/rest/v1/routing-rules",
                get(list_rules).post(create_rule),
            )
            .route(
                "/service/rest/v1/routing-rules/:name",
                axum::routing::put(update_rule).delete(delete_rule),
            )
            .route(
                "/service/rest/v1/security/users",
                get(list_users).post(create_user),
            )
            .route(
                "/service/rest/v1/security/users/:id",
                axum::routing::put(update_user),
            )
            .route(
                "/service/rest/v1/blobstores/file",
                axum::routing::post(create_blobstore),
            )
            .route(
                "/service/rest/v1/blobstores/file/:name",
                get(read_blobstore).put(update_blobstore),
            )
            .route("/service/rest/v1/capabilities", get(list_capabilities))
            .route(
                "/service/rest/v1/capabilities/:id",
                axum::routing::put(update_capability),
            )
            // Blob store deletes are untyped; there is no typed DELETE route.
            .route(
                "/service/rest/v1/blobstores/:name",
                axum::routing::delete(delete_blobstore),
            )
            .route(
                "/service/rest/v1/script/:name/run",
                axum::routing::post(run_script),
            )
            .with_state(state.clone());

        let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
        let addr = listener.local_addr().expect("local addr");

        let (shutdown_tx, shutdown_rx) = tokio::sync::oneshot::channel::<()>();
        tokio::spawn(async move {
            axum::serve(listener, router)
                .with_graceful_shutdown(async {
                    let _ = shutdown_rx.await;
                })
                .await
                .expect("serve");
        });

        Self {
            addr,
            state,
            shutdown_tx,
        }
    }

    /// Engine client pointed at this server with the expected credentials.
    pub fn client(&self) -> HttpClient {
        self.client_as("admin", "admin123")
    }

    pub fn client_as(&self, username: &str, password: &str) -> HttpClient {
        let config = ClientConfig::new(format!("http://{}", self.addr), username, password)
            .with_retry(RetryPolicy::none());
        HttpClient::new(config).expect("client")
    }

    pub fn seed_rule(&self, rule: Value) {
        self.state.lock().unwrap().rules.push(rule);
    }

    pub fn seed_user(&self, user: Value) {
        self.state.lock().unwrap().users.push(user);
    }

    pub fn seed_capability(&self, capability: Value) {
        self.state.lock().unwrap().capabilities.push(capability);
    }

    pub fn seed_blobstore(&self, name: &str, config: Value) {
        self.state
            .lock()
            .unwrap()
            .blobstores
            .insert(name.to_string(), config);
    }

    pub fn writes(&self) -> Vec<String> {
        self.state.lock().unwrap().writes.clone()
    }

    pub fn rules(&self) -> Vec<Value> {
        self.state.lock().unwrap().rules.clone()
    }

    pub fn shutdown(self) {
        let _ = self.shutdown_tx.send(());
    }
}

fn guard(state: &Shared, headers: &HeaderMap) -> Option<Response> {
    let authorized = headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .map(|v| v == EXPECTED_AUTH)
        .unwrap_or(false);
    if !authorized {
        return Some(
            (
                StatusCode::UNAUTHORIZED,
                Json(json!({"message": "authentication required"})),
            )
                .into_response(),
        );
    }
    if state.lock().unwrap().forbidden {
        return Some(
            (
                StatusCode::FORBIDDEN,
                Json(json!({"message": "insufficient permissions"})),
            )
                .into_response(),
        );
    }
    None
}

async fn list_rules(State(state): State<Shared>, headers: HeaderMap) -> Response {
    if let Some(denied) = guard(&state, &headers) {
        return denied;
    }
    let rules = state.lock().unwrap().rules.clone();
    Json(Value::Array(rules)).into_response()
}

async fn create_rule(
    State(state): State<Shared>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    if let Some(denied) = guard(&state, &headers) {
        return denied;
    }
    let mut state = state.lock().unwrap();
    state
        .writes
        .push("POST /service/rest/v1/routing-rules".to_string());
    if body["mode"] == json!("INVALID") {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({"message": "mode must be ALLOW or BLOCK"})),
        )
            .into_response();
    }
    let name = body["name"].as_str().unwrap_or_default().to_string();
    if state.rules.iter().any(|r| r["name"] == name.as_str()) {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({"message": "rule already exists"})),
        )
            .into_response();
    }
    state.rules.push(body);
    StatusCode::NO_CONTENT.into_response()
}

async fn update_rule(
    State(state): State<Shared>,
    Path(name): Path<String>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    if let Some(denied) = guard(&state, &headers) {
        return denied;
    }
    let mut state = state.lock().unwrap();
    state
        .writes
        .push(format!("PUT /service/rest/v1/routing-rules/{name}"));
    if state.vanish_on_write {
        return StatusCode::NOT_FOUND.into_response();
    }
    let Some(slot) = state.rules.iter_mut().find(|r| r["name"] == name.as_str()) else {
        return StatusCode::NOT_FOUND.into_response();
    };
    *slot = body;
    StatusCode::NO_CONTENT.into_response()
}

async fn delete_rule(
    State(state): State<Shared>,
    Path(name): Path<String>,
    headers: HeaderMap,
) -> Response {
    if let Some(denied) = guard(&state, &headers) {
        return denied;
    }
    let mut state = state.lock().unwrap();
    state
        .writes
        .push(format!("DELETE /service/rest/v1/routing-rules/{name}"));
    if state.vanish_on_write {
        return StatusCode::NOT_FOUND.into_response();
    }
    let before = state.rules.len();
    state.rules.retain(|r| r["name"] != name.as_str());
    if state.rules.len() == before {
        return StatusCode::NOT_FOUND.into_response();
    }
    StatusCode::NO_CONTENT.into_response()
}

async fn list_users(State(state): State<Shared>, headers: HeaderMap) -> Response {
    if let Some(denied) = guard(&state, &headers) {
        return denied;
    }
    let users = state.lock().unwrap().users.clone();
    Json(Value::Array(users)).into_response()
}

async fn create_user(
    State(state): State<Shared>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    if let Some(denied) = guard(&state, &headers) {
        return denied;
    }
    let mut state = state.lock().unwrap();
    state
        .writes
        .push("POST /service/rest/v1/security/users".to_string());
    // The remote never stores or echoes the password.
    let mut stored = body.clone();
    if let Some(map) = stored.as_object_mut() {
        map.remove("password");
    }
    state.users.push(stored.clone());
    (StatusCode::OK, Json(stored)).into_response()
}

async fn update_user(
    State(state): State<Shared>,
    Path(id): Path<String>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    if let Some(denied) = guard(&state, &headers) {
        return denied;
    }
    let mut state = state.lock().unwrap();
    state
        .writes
        .push(format!("PUT /service/rest/v1/security/users/{id}"));
    let Some(slot) = state
        .users
        .iter_mut()
        .find(|u| u["userId"] == id.as_str())
    else {
        return StatusCode::NOT_FOUND.into_response();
    };
    let mut stored = body;
    if let Some(map) = stored.as_object_mut() {
        map.remove("password");
    }
    *slot = stored;
    StatusCode::NO_CONTENT.into_response()
}

async fn read_blobstore(
    State(state): State<Shared>,
    Path(name): Path<String>,
    headers: HeaderMap,
) -> Response {
    if let Some(denied) = guard(&state, &headers) {
        return denied;
    }
    let state = state.lock().unwrap();
    match state.blobstores.get(&name) {
        Some(config) => Json(config.clone()).into_response(),
        None => StatusCode::NOT_FOUND.into_response(),
    }
}

async fn create_blobstore(
    State(state): State<Shared>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    if let Some(denied) = guard(&state, &headers) {
        return denied;
    }
    let mut state = state.lock().unwrap();
    state
        .writes
        .push("POST /service/rest/v1/blobstores/file".to_string());
    let Some(name) = body["name"].as_str().map(str::to_string) else {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({"message": "name is required"})),
        )
            .into_response();
    };
    // The instance read never reports the name.
    let mut config = body;
    if let Some(map) = config.as_object_mut() {
        map.remove("name");
    }
    state.blobstores.insert(name, config);
    StatusCode::NO_CONTENT.into_response()
}

async fn list_capabilities(State(state): State<Shared>, headers: HeaderMap) -> Response {
    if let Some(denied) = guard(&state, &headers) {
        return denied;
    }
    let capabilities = state.lock().unwrap().capabilities.clone();
    Json(Value::Array(capabilities)).into_response()
}

async fn update_capability(
    State(state): State<Shared>,
    Path(id): Path<String>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    if let Some(denied) = guard(&state, &headers) {
        return denied;
    }
    let mut state = state.lock().unwrap();
    state
        .writes
        .push(format!("PUT /service/rest/v1/capabilities/{id}"));
    let Some(slot) = state
        .capabilities
        .iter_mut()
        .find(|c| c["id"] == id.as_str())
    else {
        return StatusCode::NOT_FOUND.into_response();
    };
    let mut stored = body;
    stored["id"] = Value::String(id);
    *slot = stored;
    StatusCode::NO_CONTENT.into_response()
}

async fn delete_blobstore(
    State(state): State<Shared>,
    Path(name): Path<String>,
    headers: HeaderMap,
) -> Response {
    if let Some(denied) = guard(&state, &headers) {
        return denied;
    }
    let mut state = state.lock().unwrap();
    state
        .writes
        .push(format!("DELETE /service/rest/v1/blobstores/{name}"));
    if state.blobstores.remove(&name).is_none() {
        return StatusCode::NOT_FOUND.into_response();
    }
    StatusCode::NO_CONTENT.into_response()
}

async fn run_script(
    State(state): State<Shared>,
    Path(name): Path<String>,
    headers: HeaderMap,
    body: String,
) -> Response {
    if let Some(denied) = guard(&state, &headers) {
        return denied;
    }
    state
        .lock()
        .unwrap()
        .writes
        .push(format!("POST /service/rest/v1/script/{name}/run"));
    let content_type = headers
        .get("content-type")
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string();
    Json(json!({
        "name": name,
        "result": body,
        "receivedContentType": content_type
    }))
    .into_response()
}

async fn update_blobstore(
    State(state): State<Shared>,
    Path(name): Path<String>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    if let Some(denied) = guard(&state, &headers) {
        return denied;
    }
    let mut state = state.lock().unwrap();
    state
        .writes
        .push(format!("PUT /service/rest/v1/blobstores/file/{name}"));
    if body.get("name").is_some() {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({"message": "name cannot be changed"})),
        )
            .into_response();
    }
    let Some(slot) = state.blobstores.get_mut(&name) else {
        return StatusCode::NOT_FOUND.into_response();
    };
    *slot = body;
    StatusCode::NO_CONTENT.into_response()
}
