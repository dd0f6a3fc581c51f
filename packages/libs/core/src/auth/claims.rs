//! 토큰 Claims
//!
//! Access Token의 페이로드 구조입니다.

use chrono::Utc;
use serde::{Deserialize, Serialize};

/// 사용자 ID
///
/// 로그인한 사용자의 식별자로, 토큰의 subject와 식단 레코드의 소유자 필드에
/// 동일하게 사용됩니다.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UserId(pub String);

impl UserId {
    /// 새 ID 생성
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// 내부 값 참조
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for UserId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Access Token Claims (JWT HS256 페이로드)
///
/// 서버에 저장되지 않는 stateless 토큰입니다. 유효성은 서명과 만료 시각만으로
/// 판정됩니다 (폐기 목록 없음).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenClaims {
    /// Subject (사용자 ID)
    pub sub: String,

    /// 발급 시각 (epoch 초)
    pub iat: i64,

    /// 만료 시각 (epoch 초)
    pub exp: i64,
}

impl TokenClaims {
    /// 새 claims 생성
    ///
    /// `ttl_seconds`가 음수면 이미 만료된 토큰이 됩니다 (만료 동작 테스트용).
    pub fn new(sub: &UserId, ttl_seconds: i64) -> Self {
        let now = Utc::now().timestamp();
        Self {
            sub: sub.0.clone(),
            iat: now,
            exp: now + ttl_seconds,
        }
    }

    /// Subject를 사용자 ID로 반환
    pub fn subject(&self) -> UserId {
        UserId::new(self.sub.clone())
    }

    /// 만료 여부 확인
    pub fn is_expired(&self) -> bool {
        Utc::now().timestamp() > self.exp
    }

    /// 남은 TTL (초)
    pub fn remaining_ttl(&self) -> i64 {
        (self.exp - Utc::now().timestamp()).max(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_claims_not_expired() {
        let claims = TokenClaims::new(&UserId::new("user_123"), 3600);

        assert_eq!(claims.sub, "user_123");
        assert!(!claims.is_expired());
        assert!(claims.remaining_ttl() > 0);
        assert_eq!(claims.exp - claims.iat, 3600);
    }

    #[test]
    fn test_claims_negative_ttl_is_expired() {
        let claims = TokenClaims::new(&UserId::new("user_123"), -3600);

        assert!(claims.is_expired());
        assert_eq!(claims.remaining_ttl(), 0);
    }

    #[test]
    fn test_subject_roundtrip() {
        let user = UserId::new("user_abc");
        let claims = TokenClaims::new(&user, 60);

        assert_eq!(claims.subject(), user);
    }
}
