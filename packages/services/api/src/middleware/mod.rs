//! API 미들웨어
//!
//! 요청 ID 부여와 인증 파이프라인 평가를 담당합니다.
//! 파이프라인 결과(익명 | 사용자)는 요청 extension으로 다음 레이어에
//! 명시적으로 전달됩니다. 전역 보안 컨텍스트는 없습니다.

use std::sync::Arc;

use axum::async_trait;
use axum::extract::{FromRequestParts, Request, State};
use axum::http::request::Parts;
use axum::http::{HeaderMap, HeaderValue};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use uuid::Uuid;

use mealtrack_core::auth::{AuthOutcome, UserId};

use crate::error::ApiError;
use crate::state::AppState;

#[derive(Clone, Debug)]
pub struct RequestId(#[allow(dead_code)] pub String);

tokio::task_local! {
    static REQUEST_ID: String;
}

pub fn current_request_id() -> Option<String> {
    REQUEST_ID.try_with(|id| id.clone()).ok()
}

pub async fn request_id(mut req: Request, next: Next) -> Response {
    let id = Uuid::new_v4().to_string();
    req.extensions_mut().insert(RequestId(id.clone()));
    let mut resp = REQUEST_ID.scope(id.clone(), async move { next.run(req).await }).await;
    if let Ok(value) = HeaderValue::from_str(&id) {
        resp.headers_mut().insert("x-request-id", value);
    }
    resp
}

/// 인증 미들웨어
///
/// 모든 요청을 파이프라인으로 평가하고, 거부 시 즉시 401로 종결합니다.
/// `disable_auth` 모드에서는 파이프라인을 건너뛰고 `X-User-ID` 헤더를
/// 그대로 신뢰합니다 (로컬 개발 전용).
pub async fn authenticate(
    State(state): State<Arc<AppState>>,
    mut req: Request,
    next: Next,
) -> Response {
    let outcome = if state.config.disable_auth {
        match header_str(req.headers(), "x-user-id").filter(|v| !v.is_empty()) {
            Some(user_id) => AuthOutcome::User(UserId::new(user_id)),
            None => AuthOutcome::Anonymous,
        }
    } else {
        let result = state.pipeline.evaluate(
            req.uri().path(),
            header_str(req.headers(), "x-api-key"),
            header_str(req.headers(), "authorization"),
        );
        match result {
            Ok(outcome) => outcome,
            Err(e) => return ApiError::Core(e).into_response(),
        }
    };

    req.extensions_mut().insert(outcome);
    next.run(req).await
}

fn header_str<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers.get(name).and_then(|v| v.to_str().ok())
}

/// 인증된 사용자 추출기
///
/// 파이프라인이 확정한 사용자 ID를 핸들러 인자로 꺼냅니다.
/// 익명 결과(면제 경로)에서 사용하면 401입니다.
pub struct CurrentUser(pub UserId);

#[async_trait]
impl<S> FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthOutcome>()
            .and_then(|outcome| outcome.user_id())
            .cloned()
            .map(CurrentUser)
            .ok_or_else(|| ApiError::Unauthorized {
                message: "Authentication is required".to_string(),
            })
    }
}
