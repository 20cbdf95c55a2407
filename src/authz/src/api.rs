//! HTTP API over the privilege engine
//!
//! ## Endpoints
//!
//! - `POST /v1/grant` - Grant one or more privilege names
//! - `POST /v1/revoke` - Revoke granted privileges by id
//! - `POST /v1/check` - Wildcard-aware privilege check
//! - `POST /v1/has` - Name-based check with OR semantics
//! - `POST /v1/privileges` - Register a privilege
//! - `POST /v1/privileges/exists` - Exact-match lookup
//! - `POST /v1/privileges/pluck` - Unique field values
//! - `POST /v1/roles` - Register a role
//! - `POST /v1/roles/assign` - Assign roles to a user
//! - `POST /v1/roles/is` - Role membership check
//! - `GET /health` - Health check

use crate::engine::PrivilegeEngine;
use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::{get, post},
    Router,
};
use privileges_core::error::PrivilegeError;
use privileges_core::types::{
    FieldValue, OneOrMany, PrivilegeProperty, RawPrivilege, Selector,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Instant;
use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::{DefaultOnResponse, TraceLayer},
};
use tracing::{debug, error, Level};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub engine: PrivilegeEngine,
    pub start_time: Instant,
}

impl AppState {
    pub fn new(engine: PrivilegeEngine) -> Self {
        Self {
            engine,
            start_time: Instant::now(),
        }
    }
}

/// Error response body
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
}

/// Application error type
#[derive(Debug)]
pub struct AppError(PrivilegeError);

impl From<PrivilegeError> for AppError {
    fn from(err: PrivilegeError) -> Self {
        AppError(err)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error) = match &self.0 {
            err if err.is_client_error() => (StatusCode::BAD_REQUEST, "bad_request"),
            PrivilegeError::NotFound(_) => (StatusCode::NOT_FOUND, "not_found"),
            PrivilegeError::AlreadyExists(_) => (StatusCode::CONFLICT, "already_exists"),
            _ => (StatusCode::INTERNAL_SERVER_ERROR, "internal_error"),
        };

        if status.is_server_error() {
            error!(error = %self.0, "Request failed");
        }

        let body = Json(ErrorResponse {
            error: error.to_string(),
            message: self.0.to_string(),
        });

        (status, body).into_response()
    }
}

type ApiResult<T> = std::result::Result<Json<T>, AppError>;

#[derive(Debug, Deserialize)]
pub struct GrantRequest {
    pub user_id: String,
    pub name: OneOrMany<String>,
    pub component: Option<String>,
    pub group: Option<String>,
    pub role: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct IdsResponse {
    pub ids: OneOrMany<String>,
}

#[derive(Debug, Deserialize)]
pub struct RevokeRequest {
    pub user_id: String,
    pub privilege_id: OneOrMany<String>,
}

/// `privilege` is an object or an array of objects
#[derive(Debug, Deserialize)]
pub struct CheckRequest {
    #[serde(default)]
    pub user_id: Option<String>,
    pub privilege: Value,
}

#[derive(Debug, Deserialize)]
pub struct HasRequest {
    #[serde(default)]
    pub user_id: Option<String>,
    pub name: OneOrMany<String>,
    pub component: Option<String>,
    pub group: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct AllowedResponse {
    pub allowed: bool,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct IdResponse {
    pub id: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ExistsResponse {
    pub exists: bool,
}

#[derive(Debug, Deserialize)]
pub struct PluckRequest {
    pub property: PrivilegeProperty,
    #[serde(default)]
    pub filter: Value,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct PluckResponse {
    pub values: Vec<FieldValue>,
}

#[derive(Debug, Deserialize)]
pub struct RegisterRoleRequest {
    pub name: String,
    pub group: Option<String>,
    pub privileges: Option<OneOrMany<RawPrivilege>>,
}

#[derive(Debug, Deserialize)]
pub struct AssignRoleRequest {
    pub user_id: String,
    pub role: OneOrMany<String>,
    pub group: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct IsRequest {
    pub user_id: String,
    pub role: String,
    pub group: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct IsResponse {
    pub is: bool,
}

/// Health check response
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub uptime_seconds: u64,
    pub version: String,
}

/// POST /v1/grant
async fn grant(State(state): State<AppState>, Json(req): Json<GrantRequest>) -> ApiResult<IdsResponse> {
    let ids = state
        .engine
        .grant(
            &req.user_id,
            req.name,
            req.component.as_deref(),
            req.group.as_deref(),
            req.role.as_deref(),
        )
        .await?;

    Ok(Json(IdsResponse { ids }))
}

/// POST /v1/revoke
async fn revoke(
    State(state): State<AppState>,
    Json(req): Json<RevokeRequest>,
) -> Result<StatusCode, AppError> {
    state.engine.revoke(&req.user_id, req.privilege_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// POST /v1/check
async fn check(State(state): State<AppState>, Json(req): Json<CheckRequest>) -> ApiResult<AllowedResponse> {
    let user_id = req.user_id.unwrap_or_default();

    let allowed = state.engine.has_privilege_value(&user_id, &req.privilege).await?;
    debug!(user_id = %user_id, allowed, "Check request");

    Ok(Json(AllowedResponse { allowed }))
}

/// POST /v1/has
async fn has(State(state): State<AppState>, Json(req): Json<HasRequest>) -> ApiResult<AllowedResponse> {
    let user_id = req.user_id.unwrap_or_default();
    let allowed = state
        .engine
        .has(&user_id, req.name, req.component.as_deref(), req.group.as_deref())
        .await?;

    Ok(Json(AllowedResponse { allowed }))
}

/// POST /v1/privileges
async fn register_privilege(State(state): State<AppState>, Json(body): Json<Value>) -> ApiResult<IdResponse> {
    let raw = RawPrivilege::from_value(&body)?;
    let id = state.engine.register(&raw).await?;
    Ok(Json(IdResponse { id }))
}

/// POST /v1/privileges/exists
async fn exists(State(state): State<AppState>, Json(body): Json<Value>) -> ApiResult<ExistsResponse> {
    let exists = state.engine.exists_value(&body).await?;
    Ok(Json(ExistsResponse { exists }))
}

/// POST /v1/privileges/pluck
async fn pluck(State(state): State<AppState>, Json(req): Json<PluckRequest>) -> ApiResult<PluckResponse> {
    let filter = match &req.filter {
        Value::Null => Selector::new(),
        value => Selector::from_value(value)?,
    };

    let values = state.engine.pluck(req.property, &filter).await?;
    Ok(Json(PluckResponse { values }))
}

/// POST /v1/roles
async fn register_role(
    State(state): State<AppState>,
    Json(req): Json<RegisterRoleRequest>,
) -> ApiResult<IdsResponse> {
    let ids = state
        .engine
        .register_role(&req.name, req.group.as_deref(), req.privileges)
        .await?;

    Ok(Json(IdsResponse { ids }))
}

/// POST /v1/roles/assign
async fn assign_role(
    State(state): State<AppState>,
    Json(req): Json<AssignRoleRequest>,
) -> ApiResult<IdsResponse> {
    let ids = state
        .engine
        .assign_role(&req.user_id, req.role, req.group.as_deref())
        .await?;

    Ok(Json(IdsResponse { ids }))
}

/// POST /v1/roles/is
async fn is_role(State(state): State<AppState>, Json(req): Json<IsRequest>) -> ApiResult<IsResponse> {
    let is = state
        .engine
        .is(&req.user_id, &req.role, req.group.as_deref())
        .await?;

    Ok(Json(IsResponse { is }))
}

/// GET /health
async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        uptime_seconds: state.start_time.elapsed().as_secs(),
        version: crate::VERSION.to_string(),
    })
}

/// Create the HTTP router with all endpoints
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let trace = TraceLayer::new_for_http()
        .on_response(DefaultOnResponse::new().level(Level::INFO));

    Router::new()
        .route("/v1/grant", post(grant))
        .route("/v1/revoke", post(revoke))
        .route("/v1/check", post(check))
        .route("/v1/has", post(has))
        .route("/v1/privileges", post(register_privilege))
        .route("/v1/privileges/exists", post(exists))
        .route("/v1/privileges/pluck", post(pluck))
        .route("/v1/roles", post(register_role))
        .route("/v1/roles/assign", post(assign_role))
        .route("/v1/roles/is", post(is_role))
        .route("/health", get(health_check))
        .layer(
            ServiceBuilder::new()
                .layer(trace)
                .layer(cors)
        )
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_status_mapping() {
        let status = |err: PrivilegeError| AppError::from(err).into_response().status();

        assert_eq!(status(PrivilegeError::validation("x")), StatusCode::BAD_REQUEST);
        assert_eq!(status(PrivilegeError::invalid_selector("x")), StatusCode::BAD_REQUEST);
        assert_eq!(status(PrivilegeError::not_found("x")), StatusCode::NOT_FOUND);
        assert_eq!(status(PrivilegeError::storage("x")), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
