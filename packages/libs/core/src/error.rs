//! 공통 에러 타입
//!
//! Mealtrack 전체에서 사용되는 에러 타입을 정의합니다.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// Mealtrack 공통 에러
#[derive(Debug, Error)]
pub enum Error {
    // ─────────────────────────────────────────────────────────────────────────────
    // Auth Errors
    // ─────────────────────────────────────────────────────────────────────────────
    #[error("Invalid API Key")]
    InvalidApiKey,

    #[error("JWT token is missing")]
    TokenMissing,

    #[error("Invalid JWT token")]
    TokenInvalid,

    #[error("JWT token processing failed")]
    TokenProcessing,

    // ─────────────────────────────────────────────────────────────────────────────
    // Authorization Errors
    // ─────────────────────────────────────────────────────────────────────────────
    #[error("Access denied")]
    AccessDenied,
}

impl Error {
    /// HTTP 상태 코드로 변환
    pub fn status_code(&self) -> u16 {
        match self {
            // 401 Unauthorized
            Error::InvalidApiKey
            | Error::TokenMissing
            | Error::TokenInvalid
            | Error::TokenProcessing => 401,

            // 403 Forbidden
            Error::AccessDenied => 403,
        }
    }

    /// 에러 코드 (클라이언트용)
    pub fn code(&self) -> &'static str {
        match self {
            Error::InvalidApiKey => "INVALID_API_KEY",
            Error::TokenMissing => "TOKEN_MISSING",
            Error::TokenInvalid => "TOKEN_INVALID",
            Error::TokenProcessing => "TOKEN_PROCESSING_FAILED",
            Error::AccessDenied => "ACCESS_DENIED",
        }
    }
}
