//! Authentication API Endpoints
//! Mission: Provide register, login and current-identity endpoints

use crate::auth::{
    models::{Claims, CredentialsRequest, LoginResponse, MeResponse, MessageResponse},
    service::AuthService,
};
use crate::error::ServiceError;
use axum::{
    extract::{rejection::JsonRejection, State},
    Extension, Json,
};
use std::sync::Arc;
use tracing::info;

/// Shared auth state
#[derive(Clone)]
pub struct AuthState {
    pub auth_service: Arc<AuthService>,
}

impl AuthState {
    pub fn new(auth_service: Arc<AuthService>) -> Self {
        Self { auth_service }
    }
}

/// Register endpoint - POST /api/v1/register
pub async fn register(
    State(state): State<AuthState>,
    payload: Result<Json<CredentialsRequest>, JsonRejection>,
) -> Result<Json<MessageResponse>, ServiceError> {
    let Json(payload) = payload?;
    info!("📝 Registration attempt: {}", payload.username);

    state
        .auth_service
        .register(&payload.username, &payload.password)?;

    Ok(Json(MessageResponse {
        message: "User registered successfully".to_string(),
    }))
}

/// Login endpoint - POST /api/v1/login
pub async fn login(
    State(state): State<AuthState>,
    payload: Result<Json<CredentialsRequest>, JsonRejection>,
) -> Result<Json<LoginResponse>, ServiceError> {
    let Json(payload) = payload?;
    info!("🔐 Login attempt: {}", payload.username);

    let token = state
        .auth_service
        .login(&payload.username, &payload.password)?;

    Ok(Json(LoginResponse {
        message: "Login successful".to_string(),
        token,
    }))
}

/// Get current user info - GET /api/v1/me
/// Built from the validated token; no database lookup needed
pub async fn get_current_user(Extension(claims): Extension<Claims>) -> Json<MeResponse> {
    Json(MeResponse::from(&claims))
}
