//! API 앱 상태

use mealtrack_core::auth::{
    AuthenticationPipeline, IdentityGate, PathExemptions, SecretGate, TokenCodec,
};

use crate::config::Config;
use crate::db::MealDb;

/// 앱 상태
///
/// 모든 핸들러에서 공유하는 상태입니다. 설정과 파이프라인은 시작 이후
/// 읽기 전용입니다.
pub struct AppState {
    /// 설정
    pub config: Config,

    /// 데이터베이스
    pub db: MealDb,

    /// 인증 파이프라인
    pub pipeline: AuthenticationPipeline,
}

impl AppState {
    /// 새 상태 생성
    pub async fn new(config: &Config) -> anyhow::Result<Self> {
        let db = MealDb::new(&config.database_url).await?;
        Ok(Self {
            pipeline: build_pipeline(config),
            config: config.clone(),
            db,
        })
    }

    #[cfg(test)]
    pub async fn in_memory(config: Config) -> anyhow::Result<Self> {
        let db = MealDb::in_memory().await?;
        Ok(Self {
            pipeline: build_pipeline(&config),
            config,
            db,
        })
    }
}

/// 설정으로 인증 파이프라인 구성
fn build_pipeline(config: &Config) -> AuthenticationPipeline {
    AuthenticationPipeline::new(
        PathExemptions::defaults(),
        SecretGate::new(config.api_key.clone()),
        IdentityGate::new(TokenCodec::new(&config.jwt_secret, config.jwt_ttl_seconds)),
    )
}
