//! # Redis 캐시 백엔드
//!
//! `ConnectionManager`를 사용해 단일 멀티플렉싱 연결을 공유하며,
//! 연결이 끊어지면 다음 명령에서 자동으로 재연결합니다.
//!
//! ## 명령 매핑
//!
//! | 연산 | Redis 명령 |
//! |------|------------|
//! | `get` | `GET key` |
//! | `set_with_expiration` | `SET key value EX ttl` |
//! | `remove_pattern` | `SCAN cursor MATCH pattern COUNT 100` 반복 후 `DEL` |
//!
//! `KEYS`는 서버를 블로킹하므로 사용하지 않습니다.

use std::time::Duration;

use async_trait::async_trait;
use log::info;
use redis::AsyncCommands;
use redis::aio::ConnectionManager;

use super::{Cache, CacheError};
use crate::config::RedisSettings;

const SCAN_BATCH_SIZE: usize = 100;

#[derive(Clone)]
pub struct RedisCache {
    conn: ConnectionManager,
}

impl RedisCache {
    /// Redis에 연결하고 `PING`으로 가용성을 확인합니다
    ///
    /// # Errors
    ///
    /// * 잘못된 URL, 네트워크 오류, 인증 실패
    pub async fn connect(settings: &RedisSettings) -> Result<Self, CacheError> {
        let client = redis::Client::open(settings.connection_url())?;
        let mut conn = ConnectionManager::new(client).await?;

        redis::cmd("PING").query_async::<()>(&mut conn).await?;
        info!("✅ Redis 연결 성공");

        Ok(Self { conn })
    }
}

#[async_trait]
impl Cache for RedisCache {
    async fn get(&self, key: &str) -> Result<Option<String>, CacheError> {
        let mut conn = self.conn.clone();
        let value: Option<String> = conn.get(key).await?;
        Ok(value)
    }

    async fn set_with_expiration(
        &self,
        key: &str,
        value: String,
        ttl: Duration,
    ) -> Result<(), CacheError> {
        let mut conn = self.conn.clone();
        // EX 0은 Redis가 거부하므로 최소 1초
        let seconds = ttl.as_secs().max(1);
        conn.set_ex::<_, _, ()>(key, value, seconds).await?;
        Ok(())
    }

    async fn remove_pattern(&self, pattern: &str) -> Result<(), CacheError> {
        let mut conn = self.conn.clone();
        let mut cursor: u64 = 0;
        let mut removed = 0usize;

        loop {
            let (next, keys): (u64, Vec<String>) = redis::cmd("SCAN")
                .arg(cursor)
                .arg("MATCH")
                .arg(pattern)
                .arg("COUNT")
                .arg(SCAN_BATCH_SIZE)
                .query_async(&mut conn)
                .await?;

            if !keys.is_empty() {
                removed += keys.len();
                conn.del::<_, ()>(keys).await?;
            }

            if next == 0 {
                break;
            }
            cursor = next;
        }

        log::debug!("Redis 패턴 삭제: pattern={}, removed={}", pattern, removed);
        Ok(())
    }
}
