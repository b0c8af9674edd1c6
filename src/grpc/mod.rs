//! # gRPC Transport
//!
//! `proto/`의 `user`, `address`, `doctor` 패키지를 tonic으로 노출합니다.
//! 모든 서비스는 [`GrpcAuthLayer`] 하나를 공유하며, 허용 목록에 없는
//! 메서드는 액세스 토큰이 있어야 핸들러까지 도달합니다.
//!
//! 읽기는 HTTP와 같은 cache-aside 계층을 쓰되, 목록 키는
//! [`ResourceKind::grpc_list_key`](crate::caching::keys::ResourceKind::grpc_list_key) 규칙을 따릅니다.

pub mod address;
pub mod doctor;
pub mod user;

use std::net::SocketAddr;

use log::info;
use tonic::{Request, Status};
use uuid::Uuid;

use crate::core::state::AppState;
use crate::domain::dto::pagination::Pagination;
use crate::domain::models::auth::AuthenticatedUser;
use crate::middlewares::GrpcAuthLayer;

pub use address::AddressGrpcService;
pub use doctor::DoctorGrpcService;
pub use user::UserGrpcService;

/// tonic-build가 생성한 메시지와 서비스 트레이트
pub mod pb {
    pub mod user {
        tonic::include_proto!("user");
    }

    pub mod address {
        tonic::include_proto!("address");
    }

    pub mod doctor {
        tonic::include_proto!("doctor");
    }
}

/// gRPC 서버를 실행합니다 (종료될 때까지 반환하지 않음)
pub async fn serve(state: AppState, addr: SocketAddr) -> Result<(), tonic::transport::Error> {
    let auth = GrpcAuthLayer::new(state.tokens.clone(), state.config.grpc_public_methods.clone());

    info!("🚀 gRPC 서버 시작: {}", addr);
    tonic::transport::Server::builder()
        .layer(auth)
        .add_service(pb::user::user_service_server::UserServiceServer::new(
            UserGrpcService::new(state.clone()),
        ))
        .add_service(pb::address::address_service_server::AddressServiceServer::new(
            AddressGrpcService::new(state.clone()),
        ))
        .add_service(pb::doctor::doctor_service_server::DoctorServiceServer::new(
            DoctorGrpcService::new(state),
        ))
        .serve(addr)
        .await
}

/// 인증 레이어가 넣어 둔 사용자 정보
pub(crate) fn authenticated<T>(request: &Request<T>) -> Result<AuthenticatedUser, Status> {
    request
        .extensions()
        .get::<AuthenticatedUser>()
        .cloned()
        .ok_or_else(|| Status::unauthenticated("인증되지 않은 요청입니다"))
}

pub(crate) fn parse_uuid(raw: &str, field: &str) -> Result<Uuid, Status> {
    Uuid::parse_str(raw.trim())
        .map_err(|_| Status::invalid_argument(format!("{} 값이 올바른 UUID가 아닙니다", field)))
}

/// 빈 문자열은 "지정하지 않음"
pub(crate) fn parse_optional_uuid(raw: &str, field: &str) -> Result<Option<Uuid>, Status> {
    if raw.trim().is_empty() {
        Ok(None)
    } else {
        parse_uuid(raw, field).map(Some)
    }
}

/// proto3 기본값(0 이하)은 "지정하지 않음"
pub(crate) fn positive(value: i64) -> Option<i64> {
    (value > 0).then_some(value)
}

/// 캐시 키 렌더링용 (지정하지 않은 값은 빈 문자열)
pub(crate) fn key_part(value: i64) -> String {
    positive(value).map(|v| v.to_string()).unwrap_or_default()
}

pub(crate) fn non_empty(value: String) -> Option<String> {
    if value.trim().is_empty() {
        None
    } else {
        Some(value)
    }
}

macro_rules! impl_pagination_from {
    ($($target:path),+ $(,)?) => {
        $(
            impl From<Pagination> for $target {
                fn from(p: Pagination) -> Self {
                    Self {
                        current_page: p.current_page,
                        limit: p.limit,
                        skip: p.skip,
                        total: p.total,
                        total_page: p.total_page,
                    }
                }
            }
        )+
    };
}

impl_pagination_from!(
    pb::user::Pagination,
    pb::address::Pagination,
    pb::doctor::Pagination,
);
