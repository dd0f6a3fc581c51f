//! 레코드 ID 생성
//!
//! 사용자/식단 레코드의 PK는 ULID입니다 (시간순 정렬 가능한 26자 문자열).

/// 새 레코드 ID 생성
pub fn new_id() -> String {
    ulid::Ulid::new().to_string()
}
