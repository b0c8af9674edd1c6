//! 사용자 관리 서비스 모듈
//!
//! 사용자 생명주기와 관련된 비즈니스 로직을 담당합니다.
//!
//! # Features
//!
//! - 역할별 회원가입과 로그인
//! - bcrypt 비밀번호 해싱 및 검증
//! - 이메일/전화번호 인증 코드 확인과 재발송
//! - OAuth 프로필 기반 계정 연결 및 생성
//!
//! # Examples
//!
//! ```rust,ignore
//! use crate::services::users::UserService;
//!
//! let auth = user_service.register(request, UserRole::Client).await?;
//! ```

pub mod user_service;

pub use user_service::UserService;
