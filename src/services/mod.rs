//! 비즈니스 로직을 담당하는 서비스 계층 모듈
//!
//! 각 서비스는 저장소 trait 객체와 협력 서비스를 생성자로 주입받으며,
//! `main`에서 한 번 만들어져 [`AppState`](crate::core::state::AppState)에 `Arc`로 보관됩니다.
//!
//! # Features
//!
//! - 사용자 생명주기 관리 (가입, 로그인, 인증 코드, 수정, 삭제)
//! - 주소와 의사 프로필 CRUD
//! - JWT 토큰 발급/검증, OAuth 2.0 소셜 로그인 (Google, Facebook)
//! - 이메일/SMS 알림 (SendGrid, Twilio)
//!
//! # Examples
//!
//! ```rust,ignore
//! let tokens = Arc::new(TokenService::new(&config.jwt));
//! let users = UserService::new(user_repo, tokens.clone(), notifier, bcrypt_cost);
//! ```

pub mod addresses;
pub mod auth;
pub mod doctors;
pub mod notification;
pub mod users;

pub use addresses::AddressService;
pub use doctors::DoctorService;
pub use users::UserService;
