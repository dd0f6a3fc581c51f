//! 리소스 소유권 검사
//!
//! 식단 레코드의 `user_id`는 생성 시 작성자의 인증된 ID로 한 번 기록되고
//! 이후 변경되지 않습니다. 조회/수정/삭제는 이 필드와 요청자의 ID가
//! 일치할 때만 허용됩니다.
//!
//! 존재하지 않는 리소스는 소유권 검사 이전에 404로 처리해야 합니다.
//! 404는 소유자 정보를 드러내지 않습니다.

use crate::error::{Error, Result};

use super::claims::UserId;

/// 요청자가 리소스 소유자인지 검사
///
/// 순수 동등 비교입니다. 생성 시에는 호출하지 않습니다 (작성자가 곧 소유자).
pub fn authorize_owner(identity: &UserId, owner: &UserId) -> Result<()> {
    if identity == owner {
        Ok(())
    } else {
        Err(Error::AccessDenied)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_owner_allowed() {
        let owner = UserId::new("user_123");

        assert!(authorize_owner(&owner, &owner).is_ok());
    }

    #[test]
    fn test_other_user_denied() {
        let owner = UserId::new("user_123");
        let other = UserId::new("user_456");

        let err = authorize_owner(&other, &owner).expect_err("not the owner");
        assert!(matches!(err, Error::AccessDenied));
        assert_eq!(err.status_code(), 403);
    }
}
