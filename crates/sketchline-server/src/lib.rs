//! Sketchline shape store.
//!
//! An in-memory HTTP backend for the Sketchline client. It is a development
//! store: passwords are kept in plaintext and nothing survives a restart.
//!
//! ## Endpoints
//!
//! ```text
//! POST /api/Shape                 {"type": "Line", "points": [x0, y0, x1, y1], "userId": "..."}
//! GET  /api/Shape/user/{id}       -> [{"type": "Line", "points": [...]}, ...]
//! GET  /api/User/login?username=..&password=..  -> {"id": "..."}
//! GET  /health
//! ```

use axum::{
    Json, Router,
    extract::{Path, Query, State, rejection::JsonRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use dashmap::DashMap;
use serde::Deserialize;
use sketchline_core::sync::{LoginResponse, ShapeRecord, StoredShape};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};
use uuid::Uuid;

/// Default listen port, on all interfaces.
pub const DEFAULT_PORT: u16 = 7053;

/// Environment variable overriding the listen address.
pub const ADDR_ENV: &str = "SKETCHLINE_ADDR";

/// Listen address from the environment, or the default.
pub fn listen_addr() -> SocketAddr {
    parse_listen_addr(std::env::var(ADDR_ENV).ok().as_deref())
}

fn parse_listen_addr(value: Option<&str>) -> SocketAddr {
    let fallback = SocketAddr::from(([0, 0, 0, 0], DEFAULT_PORT));
    match value {
        Some(value) => value.trim().parse().unwrap_or_else(|e| {
            warn!("Ignoring invalid {}={:?}: {}", ADDR_ENV, value, e);
            fallback
        }),
        None => fallback,
    }
}

/// A registered user.
struct Account {
    id: String,
    password: String,
}

/// Shared application state
#[derive(Default)]
pub struct AppState {
    /// Accounts keyed by username.
    accounts: DashMap<String, Account>,
    /// Saved shapes keyed by owner id, in save order.
    shapes: DashMap<String, Vec<StoredShape>>,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up or register `username`; `None` on a password mismatch.
    fn login(&self, username: &str, password: &str) -> Option<String> {
        let account = self
            .accounts
            .entry(username.to_string())
            .or_insert_with(|| {
                let id = Uuid::new_v4().to_string();
                info!("Registered user {} as {}", username, id);
                Account {
                    id,
                    password: password.to_string(),
                }
            });
        (account.password == password).then(|| account.id.clone())
    }

    fn save(&self, record: ShapeRecord) {
        let owner = record.user_id.clone();
        self.shapes.entry(owner).or_default().push(record.into());
    }

    fn shapes_for(&self, owner_id: &str) -> Vec<StoredShape> {
        self.shapes
            .get(owner_id)
            .map(|shapes| shapes.value().clone())
            .unwrap_or_default()
    }
}

/// Request failures returned to clients.
#[derive(Debug)]
pub enum ApiError {
    BadRequest(String),
    Unauthorized,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::BadRequest(message) => (StatusCode::BAD_REQUEST, message),
            ApiError::Unauthorized => (StatusCode::UNAUTHORIZED, "Invalid credentials".to_string()),
        };
        (status, Json(serde_json::json!({ "error": message }))).into_response()
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

/// Build the application router.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/Shape", post(create_shape))
        .route("/api/Shape/user/{id}", get(shapes_for_user))
        .route("/api/User/login", get(login))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Health check
async fn health() -> &'static str {
    "ok"
}

/// Check a save request before storing it.
fn validate(record: &ShapeRecord) -> Result<(), ApiError> {
    if record.kind.trim().is_empty() {
        return Err(ApiError::BadRequest("Missing shape type".to_string()));
    }
    if record.user_id.trim().is_empty() {
        return Err(ApiError::BadRequest("Missing userId".to_string()));
    }
    if record.points.len() % 2 != 0 {
        return Err(ApiError::BadRequest(format!(
            "Expected coordinate pairs, got {} values",
            record.points.len()
        )));
    }
    Ok(())
}

/// Store one shape.
async fn create_shape(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<ShapeRecord>, JsonRejection>,
) -> Result<StatusCode, ApiError> {
    let Json(record) = payload.map_err(|rejection| {
        warn!("Rejected shape body: {}", rejection.body_text());
        ApiError::from(rejection)
    })?;
    if let Err(e) = validate(&record) {
        warn!("Rejected shape from {:?}: {:?}", record.user_id, e);
        return Err(e);
    }
    info!(
        "Saved {} with {} points for {}",
        record.kind,
        record.points.len() / 2,
        record.user_id
    );
    state.save(record);
    Ok(StatusCode::CREATED)
}

/// List an owner's shapes in save order.
async fn shapes_for_user(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Json<Vec<StoredShape>> {
    Json(state.shapes_for(&id))
}

#[derive(Debug, Deserialize)]
struct LoginForm {
    #[serde(alias = "email")]
    username: Option<String>,
    password: Option<String>,
}

/// Resolve credentials to an owner id, registering new usernames.
async fn login(
    State(state): State<Arc<AppState>>,
    Query(form): Query<LoginForm>,
) -> Result<Json<LoginResponse>, ApiError> {
    let (Some(username), Some(password)) = (form.username, form.password) else {
        return Err(ApiError::BadRequest("Missing username or password".to_string()));
    };
    if username.trim().is_empty() {
        return Err(ApiError::BadRequest("Missing username or password".to_string()));
    }
    match state.login(&username, &password) {
        Some(id) => Ok(Json(LoginResponse { id })),
        None => {
            warn!("Failed login for {}", username);
            Err(ApiError::Unauthorized)
        }
    }
}
