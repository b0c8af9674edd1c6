//! # Repository Layer
//!
//! 리소스별 영속성 계약(trait)과 Postgres 구현입니다.
//! 서비스는 trait 객체(`Arc<dyn AddressRepository>` 등)만 알고 있으며,
//! 테스트에서는 같은 trait의 메모리 구현으로 교체합니다.
//!
//! ## 공통 규칙
//!
//! - 모든 호출은 [`with_timeout`]으로 `DATABASE_TIMEOUT`(5초) 안에 끝나야 합니다.
//! - sqlx 에러는 [`map_sqlx_error`]로 `AppError`에 매핑됩니다.
//! - 캐시는 이 계층이 아니라 핸들러의 cache-aside 경로가 담당합니다.

pub mod addresses;
pub mod doctors;
pub mod users;

#[cfg(test)]
pub mod memory;

pub use addresses::address_repo::*;
pub use doctors::doctor_repo::*;
pub use users::user_repo::*;

use std::future::Future;

use crate::config::DATABASE_TIMEOUT;
use crate::core::errors::AppError;

/// 저장소 호출에 타임아웃을 적용합니다
///
/// 시간 초과는 `DatabaseError`로 변환되어 호출자에게는 일반 500으로 보입니다.
pub async fn with_timeout<T, F>(operation: &str, future: F) -> Result<T, AppError>
where
    F: Future<Output = Result<T, AppError>>,
{
    match tokio::time::timeout(DATABASE_TIMEOUT, future).await {
        Ok(result) => result,
        Err(_) => Err(AppError::DatabaseError(format!(
            "{} timed out after {}s",
            operation,
            DATABASE_TIMEOUT.as_secs()
        ))),
    }
}

pub fn map_sqlx_error(err: sqlx::Error) -> AppError {
    match err {
        sqlx::Error::RowNotFound => AppError::NotFound("리소스를 찾을 수 없습니다".to_string()),
        sqlx::Error::Database(db) if db.message().contains("duplicate key") => {
            AppError::ConflictError(format!(
                "이미 존재하는 리소스입니다 ({})",
                db.constraint().unwrap_or("unknown")
            ))
        }
        sqlx::Error::Database(db) if db.message().contains("invalid input syntax") => {
            AppError::ValidationError(db.message().to_string())
        }
        sqlx::Error::PoolTimedOut => {
            AppError::DatabaseError("connection pool timed out".to_string())
        }
        other => AppError::DatabaseError(other.to_string()),
    }
}
