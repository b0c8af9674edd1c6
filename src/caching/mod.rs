//! 캐싱 계층 모듈
//!
//! 레코드 저장소(Postgres) 앞단에 위치하는 cache-aside 계층입니다.
//!
//! # 구성
//!
//! - [`Cache`] - 백엔드 추상화 (문자열 값, TTL, glob 패턴 삭제)
//! - [`redis::RedisCache`] - Redis 구현 (`SET EX`, `SCAN MATCH` + `DEL`)
//! - [`memory::MemoryCache`] - 프로세스 내부 구현 (Redis 미설정 시, 테스트)
//! - [`CacheAside`] - 핸들러가 사용하는 타입 안전 래퍼. 실패를 삼키고 로그만 남깁니다
//! - [`keys`] - 키 파생 규칙과 무효화 패턴
//!
//! # 실패 정책
//!
//! - 읽기 실패(연결 오류, 역직렬화 오류)는 캐시 미스로 취급합니다.
//! - 쓰기/무효화 실패는 로그로 남기고 요청을 실패시키지 않습니다.
//!
//! # 사용 예제
//!
//! ```rust,ignore
//! let cache = CacheAside::new(Arc::new(MemoryCache::new()));
//!
//! if let Some(address) = cache.get::<AddressResponse>(&key).await {
//!     return Ok(HttpResponse::Ok().json(address));
//! }
//! let address = service.get_address_by_id(id).await?;
//! cache.set_with_expiration(&key, &address, ADDRESS_CACHING_TIME).await;
//! ```

pub mod keys;
pub mod memory;
pub mod redis;

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use log::{debug, warn};
use serde::{Serialize, de::DeserializeOwned};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CacheError {
    #[error("cache backend error: {0}")]
    Backend(String),

    #[error("cache serialization error: {0}")]
    Serialization(String),
}

impl From<::redis::RedisError> for CacheError {
    fn from(e: ::redis::RedisError) -> Self {
        CacheError::Backend(e.to_string())
    }
}

/// 캐시 백엔드 계약
///
/// 만료 처리는 백엔드가 담당합니다. 이 계층은 get/set/invalidate만 호출합니다.
#[async_trait]
pub trait Cache: Send + Sync {
    /// 키가 없거나 만료되었으면 `Ok(None)`
    async fn get(&self, key: &str) -> Result<Option<String>, CacheError>;

    async fn set_with_expiration(
        &self,
        key: &str,
        value: String,
        ttl: Duration,
    ) -> Result<(), CacheError>;

    /// glob 패턴(`*`, `?`)과 일치하는 모든 키를 삭제합니다
    async fn remove_pattern(&self, pattern: &str) -> Result<(), CacheError>;
}

/// JSON 직렬화와 실패 정책을 적용하는 cache-aside 래퍼
#[derive(Clone)]
pub struct CacheAside {
    backend: Arc<dyn Cache>,
}

impl CacheAside {
    pub fn new(backend: Arc<dyn Cache>) -> Self {
        Self { backend }
    }

    pub async fn get<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        match self.backend.get(key).await {
            Ok(Some(json)) => match serde_json::from_str::<T>(&json) {
                Ok(value) => {
                    debug!("캐시 적중: {}", key);
                    Some(value)
                }
                Err(e) => {
                    warn!("⚠️ 캐시 역직렬화 실패, 미스로 처리: key={}, error={}", key, e);
                    None
                }
            },
            Ok(None) => {
                debug!("캐시 미스: {}", key);
                None
            }
            Err(e) => {
                warn!("⚠️ 캐시 조회 실패, 미스로 처리: key={}, error={}", key, e);
                None
            }
        }
    }

    pub async fn set_with_expiration<T: Serialize>(&self, key: &str, value: &T, ttl: Duration) {
        let json = match serde_json::to_string(value) {
            Ok(json) => json,
            Err(e) => {
                warn!("⚠️ 캐시 직렬화 실패: key={}, error={}", key, e);
                return;
            }
        };

        if let Err(e) = self.backend.set_with_expiration(key, json, ttl).await {
            warn!("⚠️ 캐시 저장 실패: key={}, error={}", key, e);
        }
    }

    pub async fn remove_pattern(&self, pattern: &str) {
        match self.backend.remove_pattern(pattern).await {
            Ok(()) => debug!("캐시 무효화 완료: {}", pattern),
            Err(e) => warn!("⚠️ 캐시 무효화 실패: pattern={}, error={}", pattern, e),
        }
    }
}

/// Redis 스타일 glob 매칭 (`*`, `?`, 문자 그대로 비교)
pub fn glob_match(pattern: &str, key: &str) -> bool {
    let p: Vec<char> = pattern.chars().collect();
    let k: Vec<char> = key.chars().collect();

    let (mut pi, mut ki) = (0usize, 0usize);
    let mut star: Option<usize> = None;
    let mut star_ki = 0usize;

    while ki < k.len() {
        if pi < p.len() && (p[pi] == '?' || p[pi] == k[ki]) {
            pi += 1;
            ki += 1;
        } else if pi < p.len() && p[pi] == '*' {
            star = Some(pi);
            star_ki = ki;
            pi += 1;
        } else if let Some(s) = star {
            pi = s + 1;
            star_ki += 1;
            ki = star_ki;
        } else {
            return false;
        }
    }

    while pi < p.len() && p[pi] == '*' {
        pi += 1;
    }
    pi == p.len()
}
