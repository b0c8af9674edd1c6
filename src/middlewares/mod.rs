//! 미들웨어 모듈
//!
//! 요청 처리 파이프라인에서 사용되는 인증 미들웨어들을 제공합니다.
//!
//! # 제공 미들웨어
//!
//! ### 1. HTTP 인증 미들웨어 ([`AuthMiddleware`])
//! - Bearer 토큰 추출 및 종류(access/refresh) 검증
//! - 사용자 정보를 request extension에 저장
//! - 선택적 역할 요구 (불일치 시 403)
//!
//! ### 2. gRPC 인증 레이어 ([`GrpcAuthLayer`])
//! - 허용 목록(정확히 일치)에 있는 메서드는 토큰 없이 통과
//! - 그 외에는 액세스 토큰 검증, 실패 시 `UNAUTHENTICATED`
//!
//! # 사용 방법
//!
//! ```rust,ignore
//! #[post("", wrap = "AuthMiddleware::required()")]
//! pub async fn create_address(/* ... */) -> Result<HttpResponse, AppError> { /* ... */ }
//!
//! #[get("/users", wrap = "AuthMiddleware::required_with_role(UserRole::Admin)")]
//! pub async fn admin_list_users(/* ... */) -> Result<HttpResponse, AppError> { /* ... */ }
//!
//! Server::builder()
//!     .layer(GrpcAuthLayer::new(tokens, config.grpc_public_methods.clone()))
//!     .add_service(UserServiceServer::new(user_grpc))
//! ```

mod auth_inner;
pub mod auth_middleware;
pub mod grpc_auth;

pub use auth_middleware::AuthMiddleware;
pub use grpc_auth::GrpcAuthLayer;
