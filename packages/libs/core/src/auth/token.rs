//! 토큰 발급 및 검증
//!
//! 로그인 시 발급되는 Access Token은 HS256으로 서명된 JWT입니다.
//! 검증은 (1) 파싱 → (2) 서명 확인 → (3) 만료 확인 순서로 진행되며,
//! 실패 원인은 [`TokenError`]로 구분됩니다. 이 구분은 내부 진단(로그)용이며
//! 호출자에게는 동일한 401로 노출됩니다.

use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};

use crate::error::{Error, Result};

use super::claims::{TokenClaims, UserId};

/// 토큰 검증 실패 원인 (내부 진단용)
#[derive(Debug, thiserror::Error)]
pub enum TokenError {
    /// 토큰 구조 파싱 실패
    #[error("malformed token")]
    Malformed,

    /// 서명 불일치 (변조 또는 다른 키로 서명됨)
    #[error("bad signature")]
    BadSignature,

    /// 만료 시각 경과
    #[error("token expired")]
    Expired,
}

/// 토큰 발급/검증기
///
/// 서명 키와 기본 TTL은 프로세스 시작 시 한 번 설정되고 이후 불변입니다.
/// 내부 상태가 없으므로 동시 요청 간에 안전하게 공유됩니다.
pub struct TokenCodec {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    default_ttl_seconds: i64,
}

impl TokenCodec {
    /// 새 codec 생성
    pub fn new(secret: &str, default_ttl_seconds: i64) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            default_ttl_seconds,
        }
    }

    /// 기본 TTL로 토큰 발급
    pub fn issue(&self, subject: &UserId) -> Result<String> {
        self.issue_with_ttl(subject, self.default_ttl_seconds)
    }

    /// TTL을 지정하여 토큰 발급
    ///
    /// 음수 TTL을 주면 이미 만료된 토큰이 발급됩니다.
    pub fn issue_with_ttl(&self, subject: &UserId, ttl_seconds: i64) -> Result<String> {
        let claims = TokenClaims::new(subject, ttl_seconds);
        jsonwebtoken::encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|_| Error::TokenProcessing)
    }

    /// 토큰 검증 및 claims 추출
    ///
    /// 검증에 성공한 claims의 `subject()`만이 신뢰할 수 있는 사용자 ID입니다.
    pub fn verify(&self, token: &str) -> std::result::Result<TokenClaims, TokenError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;

        match jsonwebtoken::decode::<TokenClaims>(token, &self.decoding_key, &validation) {
            Ok(data) => Ok(data.claims),
            Err(e) => Err(match e.kind() {
                ErrorKind::ExpiredSignature => TokenError::Expired,
                ErrorKind::InvalidSignature => TokenError::BadSignature,
                _ => TokenError::Malformed,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_codec() -> TokenCodec {
        TokenCodec::new("secretsecretsecretsecret", 3600)
    }

    #[test]
    fn test_issue_and_verify_roundtrip() {
        let codec = test_codec();
        let token = codec.issue(&UserId::new("user_123")).unwrap();

        let claims = codec.verify(&token).expect("fresh token should verify");
        assert_eq!(claims.subject().as_str(), "user_123");
        assert!(!claims.is_expired());
    }

    #[test]
    fn test_expired_token_rejected() {
        let codec = test_codec();
        let token = codec
            .issue_with_ttl(&UserId::new("user_123"), -3600)
            .unwrap();

        let err = codec.verify(&token).expect_err("expired token");
        assert!(matches!(err, TokenError::Expired));
    }

    #[test]
    fn test_tampered_payload_is_bad_signature() {
        let codec = test_codec();
        let token = codec.issue(&UserId::new("user_123")).unwrap();

        // 페이로드 섹션의 문자 하나를 바꾼다
        let mut parts: Vec<String> = token.split('.').map(|s| s.to_string()).collect();
        assert_eq!(parts.len(), 3);
        let flipped = if parts[1].starts_with('A') { "B" } else { "A" };
        parts[1].replace_range(0..1, flipped);
        let tampered = parts.join(".");

        let err = codec.verify(&tampered).expect_err("tampered token");
        assert!(matches!(
            err,
            TokenError::BadSignature | TokenError::Malformed
        ));
    }

    #[test]
    fn test_wrong_key_is_bad_signature() {
        let codec = test_codec();
        let other = TokenCodec::new("anothersecretanothersecret", 3600);
        let token = other.issue(&UserId::new("user_123")).unwrap();

        let err = codec.verify(&token).expect_err("foreign token");
        assert!(matches!(err, TokenError::BadSignature));
    }

    #[test]
    fn test_garbage_is_malformed() {
        let codec = test_codec();

        let err = codec.verify("not.a.token").expect_err("garbage");
        assert!(matches!(err, TokenError::Malformed));

        let err = codec.verify("").expect_err("empty");
        assert!(matches!(err, TokenError::Malformed));
    }
}
