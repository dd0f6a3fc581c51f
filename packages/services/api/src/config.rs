//! API 서비스 설정

use anyhow::Context;
use std::env;

/// API 서비스 설정
#[derive(Debug, Clone)]
pub struct Config {
    /// 서버 포트
    pub port: u16,

    /// SQLite 데이터베이스 URL
    pub database_url: String,

    /// 공용 API Key (`X-API-Key` 헤더와 비교)
    pub api_key: String,

    /// JWT 서명 키 (HS256)
    pub jwt_secret: String,

    /// 토큰 기본 TTL (초)
    pub jwt_ttl_seconds: i64,

    /// 인증 비활성화 (개발용)
    pub disable_auth: bool,
}

impl Config {
    /// 환경변수에서 설정 로드
    pub fn from_env() -> anyhow::Result<Self> {
        Ok(Self {
            port: env::var("MEALTRACK_PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()?,

            database_url: env::var("MEALTRACK_DATABASE_URL")
                .unwrap_or_else(|_| "sqlite://data/mealtrack.db".to_string()),

            api_key: env::var("MEALTRACK_API_KEY")
                .context("MEALTRACK_API_KEY must be set")?,

            jwt_secret: env::var("MEALTRACK_JWT_SECRET")
                .unwrap_or_else(|_| "secretsecretsecretsecret".to_string()),

            jwt_ttl_seconds: env::var("MEALTRACK_JWT_TTL_SECS")
                .unwrap_or_else(|_| "86400".to_string())
                .parse()
                .unwrap_or(86400),

            disable_auth: env::var("MEALTRACK_DISABLE_AUTH")
                .unwrap_or_else(|_| "false".to_string())
                .parse()
                .unwrap_or(false),
        })
    }
}
