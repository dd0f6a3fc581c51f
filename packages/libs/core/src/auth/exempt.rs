//! 경로 면제 정책
//!
//! 일부 경로는 게이트 검사를 건너뜁니다 (로그인/회원가입, 문서, 헬스체크).
//! 면제는 게이트 종류별로 독립적입니다: 한 경로가 JWT 검사만 면제되고
//! API Key 검사는 그대로 받을 수 있습니다.

/// 게이트 종류
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateCheck {
    /// API Key 검사 (`X-API-Key`)
    Secret,

    /// JWT 검사 (`Authorization: Bearer ...`)
    Token,
}

/// 면제 규칙
///
/// `prefix`로 시작하는 경로에 대해 지정된 게이트 검사를 건너뜁니다.
/// 매칭은 경로 세그먼트 경계를 고려하지 않는 단순 접두사 비교입니다:
/// `/api/auth/login` 규칙은 `/api/auth/loginX`도 매칭합니다.
#[derive(Debug, Clone)]
pub struct ExemptRule {
    prefix: String,
    secret: bool,
    token: bool,
}

impl ExemptRule {
    /// API Key와 JWT 검사를 모두 면제
    pub fn both(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            secret: true,
            token: true,
        }
    }

    /// JWT 검사만 면제 (API Key는 그대로 요구)
    pub fn token_only(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            secret: false,
            token: true,
        }
    }

    fn covers(&self, check: GateCheck) -> bool {
        match check {
            GateCheck::Secret => self.secret,
            GateCheck::Token => self.token,
        }
    }
}

/// 경로 면제 정책
///
/// 프로세스 시작 시 한 번 구성되고 이후 읽기 전용입니다.
#[derive(Debug, Clone)]
pub struct PathExemptions {
    rules: Vec<ExemptRule>,
}

impl PathExemptions {
    /// 규칙 목록으로 정책 생성
    pub fn new(rules: Vec<ExemptRule>) -> Self {
        Self { rules }
    }

    /// 기본 정책
    ///
    /// - 로그인/회원가입: JWT만 면제
    /// - API 문서, 헬스체크: 모두 면제
    pub fn defaults() -> Self {
        Self::new(vec![
            ExemptRule::token_only("/api/auth/login"),
            ExemptRule::token_only("/api/auth/register"),
            ExemptRule::both("/swagger-ui/"),
            ExemptRule::both("/v3/api-docs/"),
            ExemptRule::both("/health"),
        ])
    }

    /// 해당 경로가 지정된 게이트 검사에서 면제되는지 확인
    pub fn is_exempt(&self, path: &str, check: GateCheck) -> bool {
        self.rules
            .iter()
            .any(|rule| path.starts_with(&rule.prefix) && rule.covers(check))
    }
}
