//! 전송 계층 DTO
//!
//! HTTP 요청 본문/쿼리와 응답 본문, 그리고 목록 응답이 공유하는 페이지네이션 타입입니다.
//! 캐시에 저장되는 값도 이 응답 DTO를 JSON으로 직렬화한 것입니다.

pub mod addresses;
pub mod doctors;
pub mod pagination;
pub mod tokens;
pub mod users;

pub use addresses::*;
pub use doctors::*;
pub use pagination::*;
pub use tokens::*;
pub use users::*;
