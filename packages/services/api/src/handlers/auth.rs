//! 회원가입/로그인 핸들러
//!
//! 두 경로 모두 JWT 면제 대상입니다 (API Key는 요구됨).
//! 로그인 성공 시 기본 TTL의 Access Token이 발급됩니다.

use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};

use mealtrack_core::auth::UserId;

use crate::crypto;
use crate::error::{ApiError, Result};
use crate::state::AppState;

/// 회원가입 요청 본문
#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    #[serde(default)]
    pub username: String,

    #[serde(default)]
    pub email: String,

    #[serde(default)]
    pub password: String,
}

/// 회원가입 응답 본문
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterResponse {
    pub message: String,
    pub user_id: String,
}

/// 회원가입 핸들러
pub async fn register(
    State(state): State<Arc<AppState>>,
    Json(req): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<RegisterResponse>)> {
    validate_registration(&req)?;

    if state.db.user_exists(&req.username, &req.email).await? {
        return Err(ApiError::Conflict {
            message: "Username or email already exists".to_string(),
        });
    }

    let password_hash = crypto::hash_password(&req.password);
    let user = state
        .db
        .insert_user(&req.username, &req.email, &password_hash)
        .await?;

    tracing::info!(user_id = %user.id, "user registered");

    Ok((
        StatusCode::CREATED,
        Json(RegisterResponse {
            message: "User registered successfully".to_string(),
            user_id: user.id,
        }),
    ))
}

/// 로그인 요청 본문
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub email: String,

    #[serde(default)]
    pub password: String,
}

/// 로그인 응답 본문
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub message: String,
    pub token: String,
    pub user_id: String,
}

/// 로그인 핸들러
pub async fn login(
    State(state): State<Arc<AppState>>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<LoginResponse>> {
    validate_login(&req)?;

    let user = state
        .db
        .find_user_by_email(&req.email)
        .await?
        .ok_or_else(invalid_credentials)?;

    if !crypto::verify_password(&req.password, &user.password_hash) {
        return Err(invalid_credentials());
    }

    let token = state.pipeline.codec().issue(&UserId::new(user.id.as_str()))?;

    Ok(Json(LoginResponse {
        message: "Login successful".to_string(),
        token,
        user_id: user.id,
    }))
}

fn validate_registration(req: &RegisterRequest) -> Result<()> {
    if req.username.trim().is_empty() {
        return Err(bad_request("Username is required"));
    }
    if req.email.trim().is_empty() {
        return Err(bad_request("Email is required"));
    }
    if req.password.trim().is_empty() {
        return Err(bad_request("Password is required"));
    }
    Ok(())
}

fn validate_login(req: &LoginRequest) -> Result<()> {
    if req.email.trim().is_empty() {
        return Err(bad_request("Email is required"));
    }
    if req.password.trim().is_empty() {
        return Err(bad_request("Password is required"));
    }
    Ok(())
}

fn bad_request(message: &str) -> ApiError {
    ApiError::BadRequest {
        message: message.to_string(),
    }
}

fn invalid_credentials() -> ApiError {
    ApiError::Unauthorized {
        message: "Invalid email or password".to_string(),
    }
}
