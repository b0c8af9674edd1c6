//! # HTTP Request Handlers Module
//!
//! HTTP 요청을 처리하는 핸들러 함수들을 정의하는 모듈입니다.
//! ActixWeb 라우트 매크로(`#[get]`, `#[post]` ...)로 선언하며
//! 의존성은 `web::Data<AppState>`로 주입받습니다.
//!
//! ## 아키텍처 위치
//!
//! ```text
//! HTTP Layer Architecture
//! ┌─────────────────────────────────────────────┐
//!   Client (Browser, Mobile App, API Client)
//! └─────────────────────┬───────────────────────┘
//!                       │ HTTP Request/Response
//! ┌─────────────────────▼───────────────────────┐
//!   AuthMiddleware - 토큰 검증, 역할 확인
//! ├─────────────────────────────────────────────┤
//!   Handlers (이 모듈) - 검증, 캐시, 무효화          ← Web Layer
//! ├─────────────────────────────────────────────┤
//!   Services - 비즈니스 로직                        ← Service Layer
//! ├─────────────────────────────────────────────┤
//!   Repositories - 데이터 접근                     ← Repository Layer
//! └─────────────────────────────────────────────┘
//! ```
//!
//! ## 핸들러 규칙
//!
//! 1. **입력 검증**: `validator`로 서비스 호출 전에 검증 (실패 시 400)
//! 2. **읽기 캐싱**: 단건은 `<resource>_<id>`, 목록은 요청 URI 전체를 키로 cache-aside
//! 3. **쓰기 후 무효화**: 성공한 쓰기 뒤 `*address*` / `*doctor*` / `*user*` 패턴 삭제
//! 4. **에러 전파**: `?`로 `AppError`를 반환하면 상태 코드와 JSON 본문으로 변환
//!
//! ```rust,ignore
//! #[post("", wrap = "AuthMiddleware::required()")]
//! pub async fn create_address(
//!     state: web::Data<AppState>,
//!     user: AuthenticatedUser,
//!     payload: web::Json<AddressRequest>,
//! ) -> Result<HttpResponse, AppError> {
//!     payload.validate()?;
//!     let address = state.addresses.create_address(payload.into_inner(), user.user_id).await?;
//!     state.cache.remove_pattern(ResourceKind::Address.pattern()).await;
//!     Ok(HttpResponse::Ok().json(address))
//! }
//! ```
//!
//! ## 모듈 구성
//!
//! - **`address`**: `/api/v1/address` 주소 CRUD
//! - **`doctor`**: `/api/v1/doctor` 의사 프로필 CRUD
//! - **`auth`**: `/auth` OAuth 로그인, 내 정보, 토큰 갱신, 인증 코드
//! - **`users`**: `/auth-admin`, `/auth-doctor`, `/auth-patient` 역할별 계정

pub mod address;
pub mod auth;
pub mod doctor;
pub mod users;

use uuid::Uuid;

use crate::core::errors::AppError;

/// 경로 파라미터를 UUID로 파싱합니다 (실패 시 400)
pub(crate) fn parse_id(raw: &str) -> Result<Uuid, AppError> {
    Uuid::parse_str(raw.trim())
        .map_err(|_| AppError::ValidationError(format!("올바르지 않은 ID 형식입니다: {}", raw)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_id() {
        let id = Uuid::new_v4();
        assert_eq!(parse_id(&id.to_string()).unwrap(), id);
        assert!(matches!(parse_id("42"), Err(AppError::ValidationError(_))));
    }
}
