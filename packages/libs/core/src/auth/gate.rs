//! 인증 게이트 및 파이프라인
//!
//! 요청당 한 번 평가되는 순서형 파이프라인입니다:
//!
//! ```text
//! 경로 면제 조회 → API Key 게이트 → JWT 게이트 → 결과 (익명 | 사용자)
//! ```
//!
//! 첫 실패에서 즉시 중단하며, 모든 거부는 해당 요청에 대해 종결입니다.
//! 게이트 자체는 요청 간 공유 가변 상태가 없어 동시 평가가 안전합니다.

use crate::error::{Error, Result};

use super::claims::UserId;
use super::exempt::{GateCheck, PathExemptions};
use super::token::TokenCodec;

/// Bearer 스킴 접두사
const BEARER_PREFIX: &str = "Bearer ";

/// API Key 게이트
///
/// 요청의 `X-API-Key` 헤더 값을 설정된 공용 시크릿과 비교합니다.
/// 헤더 누락, 빈 값, 불일치 모두 거부됩니다 (fail-closed).
pub struct SecretGate {
    api_key: String,
}

impl SecretGate {
    /// 새 게이트 생성
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
        }
    }

    /// 제시된 헤더 값 검사
    pub fn check(&self, presented: Option<&str>) -> Result<()> {
        match presented {
            Some(value) if !value.is_empty() && value == self.api_key => Ok(()),
            _ => Err(Error::InvalidApiKey),
        }
    }
}

/// JWT 게이트
///
/// `Authorization: Bearer <token>` 헤더에서 토큰을 추출해 검증하고,
/// 성공 시 subject를 인증된 사용자 ID로 확정합니다.
///
/// 검증 실패의 세부 원인(파싱/서명/만료)은 로그로만 남기고 호출자에게는
/// 동일한 거부로 응답합니다.
pub struct IdentityGate {
    codec: TokenCodec,
}

impl IdentityGate {
    /// 새 게이트 생성
    pub fn new(codec: TokenCodec) -> Self {
        Self { codec }
    }

    /// Authorization 헤더 값 검사
    pub fn check(&self, authorization: Option<&str>) -> Result<UserId> {
        let header = authorization.ok_or(Error::TokenMissing)?;
        let token = header.strip_prefix(BEARER_PREFIX).ok_or(Error::TokenMissing)?;

        match self.codec.verify(token) {
            Ok(claims) => Ok(claims.subject()),
            Err(cause) => {
                tracing::debug!(%cause, "token verification failed");
                Err(Error::TokenInvalid)
            }
        }
    }

    /// 내부 codec 참조 (토큰 발급용)
    pub fn codec(&self) -> &TokenCodec {
        &self.codec
    }
}

/// 파이프라인 평가 결과
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthOutcome {
    /// 면제 경로 (식별된 사용자 없음)
    Anonymous,

    /// 게이트를 모두 통과한 사용자
    User(UserId),
}

impl AuthOutcome {
    /// 식별된 사용자 ID (익명이면 None)
    pub fn user_id(&self) -> Option<&UserId> {
        match self {
            AuthOutcome::Anonymous => None,
            AuthOutcome::User(id) => Some(id),
        }
    }
}

/// 인증 파이프라인
///
/// 면제 정책과 두 게이트를 하나의 순서형 평가로 구성합니다.
/// API Key 검사가 먼저입니다 (값 비교가 서명 검증보다 저렴).
pub struct AuthenticationPipeline {
    exemptions: PathExemptions,
    secret: SecretGate,
    identity: IdentityGate,
}

impl AuthenticationPipeline {
    /// 새 파이프라인 생성
    pub fn new(exemptions: PathExemptions, secret: SecretGate, identity: IdentityGate) -> Self {
        Self {
            exemptions,
            secret,
            identity,
        }
    }

    /// 요청 한 건 평가
    ///
    /// `api_key`와 `authorization`은 각각 `X-API-Key`, `Authorization` 헤더의
    /// 원문 값입니다 (없으면 None).
    pub fn evaluate(
        &self,
        path: &str,
        api_key: Option<&str>,
        authorization: Option<&str>,
    ) -> Result<AuthOutcome> {
        if !self.exemptions.is_exempt(path, GateCheck::Secret) {
            self.secret.check(api_key)?;
        }

        if self.exemptions.is_exempt(path, GateCheck::Token) {
            return Ok(AuthOutcome::Anonymous);
        }

        let user = self.identity.check(authorization)?;
        Ok(AuthOutcome::User(user))
    }

    /// 토큰 발급용 codec 참조
    pub fn codec(&self) -> &TokenCodec {
        self.identity.codec()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const API_KEY: &str = "test-api-key";

    fn test_pipeline() -> AuthenticationPipeline {
        AuthenticationPipeline::new(
            PathExemptions::defaults(),
            SecretGate::new(API_KEY),
            IdentityGate::new(TokenCodec::new("secretsecretsecretsecret", 3600)),
        )
    }

    fn bearer(pipeline: &AuthenticationPipeline, user: &str) -> String {
        let token = pipeline.codec().issue(&UserId::new(user)).unwrap();
        format!("Bearer {}", token)
    }

    #[test]
    fn test_secret_gate_matrix() {
        let gate = SecretGate::new(API_KEY);

        assert!(gate.check(Some(API_KEY)).is_ok());
        assert!(matches!(gate.check(None), Err(Error::InvalidApiKey)));
        assert!(matches!(gate.check(Some("")), Err(Error::InvalidApiKey)));
        assert!(matches!(
            gate.check(Some("wrong-key")),
            Err(Error::InvalidApiKey)
        ));
    }

    #[test]
    fn test_identity_gate_missing_header() {
        let gate = IdentityGate::new(TokenCodec::new("secretsecretsecretsecret", 3600));

        assert!(matches!(gate.check(None), Err(Error::TokenMissing)));
        // Bearer 스킴이 아니면 토큰 누락과 동일하게 취급
        assert!(matches!(
            gate.check(Some("Basic abc")),
            Err(Error::TokenMissing)
        ));
    }

    #[test]
    fn test_identity_gate_rejects_uniformly() {
        let codec = TokenCodec::new("secretsecretsecretsecret", 3600);
        let expired = codec
            .issue_with_ttl(&UserId::new("user_123"), -3600)
            .unwrap();
        let gate = IdentityGate::new(codec);

        // 만료든 변조든 외부에서는 같은 거부
        assert!(matches!(
            gate.check(Some(&format!("Bearer {}", expired))),
            Err(Error::TokenInvalid)
        ));
        assert!(matches!(
            gate.check(Some("Bearer not.a.token")),
            Err(Error::TokenInvalid)
        ));
    }

    #[test]
    fn test_exempt_route_is_anonymous() {
        let pipeline = test_pipeline();

        let outcome = pipeline.evaluate("/health", None, None).unwrap();
        assert_eq!(outcome, AuthOutcome::Anonymous);
    }

    #[test]
    fn test_login_requires_api_key_but_not_token() {
        let pipeline = test_pipeline();

        let outcome = pipeline
            .evaluate("/api/auth/login", Some(API_KEY), None)
            .unwrap();
        assert_eq!(outcome, AuthOutcome::Anonymous);

        assert!(matches!(
            pipeline.evaluate("/api/auth/login", None, None),
            Err(Error::InvalidApiKey)
        ));
    }

    #[test]
    fn test_protected_route_happy_path() {
        let pipeline = test_pipeline();
        let authorization = bearer(&pipeline, "user_123");

        let outcome = pipeline
            .evaluate("/api/food", Some(API_KEY), Some(&authorization))
            .unwrap();
        assert_eq!(outcome.user_id().unwrap().as_str(), "user_123");
    }

    #[test]
    fn test_secret_checked_before_token() {
        let pipeline = test_pipeline();
        let authorization = bearer(&pipeline, "user_123");

        // 유효한 토큰이 있어도 API Key가 틀리면 먼저 거부된다
        assert!(matches!(
            pipeline.evaluate("/api/food", Some("wrong"), Some(&authorization)),
            Err(Error::InvalidApiKey)
        ));
    }

    #[test]
    fn test_protected_route_without_token() {
        let pipeline = test_pipeline();

        assert!(matches!(
            pipeline.evaluate("/api/food", Some(API_KEY), None),
            Err(Error::TokenMissing)
        ));
    }
}
