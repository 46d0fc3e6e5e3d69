use axum::{
    extract::State,
    routing::{get, post},
    Json, Router,
};
use railbook_core::{AuthResponse, Credentials, RegisterRequest, User};
use serde_json::{json, Value};

use crate::{error::AppError, state::AppState};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/auth/register", post(register))
        .route("/auth/login", post(login))
        .route("/auth/logout", post(logout))
        .route("/auth/me", get(me))
}

async fn register(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> Result<Json<AuthResponse>, AppError> {
    if req.email.trim().is_empty() || req.password.expose().is_empty() {
        return Err(AppError::ValidationError("Email and password are required".to_string()));
    }
    Ok(Json(state.auth.register(&req).await?))
}

async fn login(
    State(state): State<AppState>,
    Json(credentials): Json<Credentials>,
) -> Result<Json<AuthResponse>, AppError> {
    Ok(Json(state.auth.login(&credentials).await?))
}

async fn logout(State(state): State<AppState>) -> Json<Value> {
    state.session.sign_out();
    tracing::info!("signed out");
    Json(json!({ "message": "Logged out" }))
}

async fn me(State(state): State<AppState>) -> Result<Json<Value>, AppError> {
    if !state.session.is_authenticated() {
        return Err(AppError::AuthenticationError("Not signed in".to_string()));
    }
    let user: User = state.auth.me().await?;
    Ok(Json(json!({ "user": user })))
}
