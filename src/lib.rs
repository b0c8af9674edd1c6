//! 클리닉 백엔드
//!
//! 사용자, 주소, 의사 세 리소스를 REST(actix-web)와 gRPC(tonic)로 함께 제공하는
//! 서비스입니다. 데이터는 Postgres에 저장하고, 읽기는 Redis cache-aside 계층을 거칩니다.
//!
//! # Features
//!
//! - **역할별 계정**: admin / doctor / client 로그인과 가입, 본인 정보 수정
//! - **JWT 인증**: 액세스/리프레시 토큰, 종류가 다른 토큰은 거부
//! - **OAuth 2.0**: Google, Facebook 소셜 로그인 (서명된 state)
//! - **인증 코드**: SendGrid 이메일, Twilio SMS
//! - **Cache-aside**: 단건/목록 캐시와 쓰기 후 패턴 무효화
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────┐   ┌──────────────────────┐
//! │  HTTP Routes (actix) │   │  gRPC (tonic)        │ ← 전송 계층
//! │  + AuthMiddleware    │   │  + GrpcAuthLayer     │
//! └──────────┬───────────┘   └──────────┬───────────┘
//!            │      cache-aside         │
//!            ▼                          ▼
//! ┌─────────────────────────────────────────────────┐
//! │    Services (User / Address / Doctor / Auth)    │ ← 비즈니스 로직
//! └─────────────────────────────────────────────────┘
//!          │
//!          ▼
//! ┌─────────────────┐
//! │  Repositories   │ ← 데이터 액세스 (sqlx)
//! └─────────────────┘
//!          │
//!          ▼
//! ┌─────────────────┐
//! │ Postgres + Redis│ ← 저장소
//! └─────────────────┘
//! ```
//!
//! # Examples
//!
//! ```rust,ignore
//! use clinic_backend::core::AppState;
//! use clinic_backend::routes::configure_all_routes;
//!
//! let state = AppState::new(config, database.pool().clone(), cache, notifier);
//! let app = App::new()
//!     .app_data(web::Data::new(state.clone()))
//!     .configure(configure_all_routes);
//! ```

pub mod caching;
pub mod config;
pub mod core;
pub mod db;
pub mod domain;
pub mod grpc;
pub mod handlers;
pub mod middlewares;
pub mod repositories;
pub mod routes;
pub mod services;
