//! # Core Module
//!
//! 전송 계층(HTTP, gRPC)이 공유하는 핵심 타입을 제공합니다.
//!
//! ## 모듈 구성
//!
//! ### [`errors`] - 통합 에러 처리
//! - **AppError**: 애플리케이션 전역 에러 타입
//! - **HTTP 통합**: Actix-Web `ResponseError` 구현
//! - **gRPC 통합**: `tonic::Status` 변환
//!
//! ### [`state`] - 공유 애플리케이션 상태
//! - **AppState**: `main`에서 한 번 조립되는 서비스 묶음
//! - 전역 싱글톤 대신 생성자 주입으로 전달됩니다
//!
//! ## 조립 순서
//!
//! ```text
//! AppConfig::from_env()
//!      │
//!      ├── Database::connect_with_retry ──► Postgres 저장소
//!      ├── RedisCache / MemoryCache ──────► CacheAside
//!      ├── TokenService, Notifier, OAuthClient
//!      ▼
//! AppState ──► actix-web App (web::Data)
//!          └─► tonic 서비스 (Clone)
//! ```

pub mod errors;
pub mod state;

pub use errors::*;
pub use state::AppState;
