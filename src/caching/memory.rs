//! 프로세스 내부 메모리 캐시
//!
//! `REDIS_URI`가 비어 있는 개발 환경과 테스트에서 사용합니다.
//! 만료된 항목은 조회, 패턴 삭제 시점과 주기적인 저장 시점 정리(`SWEEP_INTERVAL`)로 제거됩니다.

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use async_trait::async_trait;

use super::{Cache, CacheError, glob_match};

/// 저장 시 만료 항목 전체 정리 주기
pub const SWEEP_INTERVAL: Duration = Duration::from_secs(30);

struct Entries {
    map: HashMap<String, (String, Instant)>,
    last_sweep: Instant,
}

pub struct MemoryCache {
    entries: Mutex<Entries>,
    sweep_interval: Duration,
}

impl Default for MemoryCache {
    fn default() -> Self {
        Self::with_sweep_interval(SWEEP_INTERVAL)
    }
}

impl MemoryCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_sweep_interval(sweep_interval: Duration) -> Self {
        Self {
            entries: Mutex::new(Entries {
                map: HashMap::new(),
                last_sweep: Instant::now(),
            }),
            sweep_interval,
        }
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, Entries>, CacheError> {
        self.entries
            .lock()
            .map_err(|e| CacheError::Backend(format!("memory cache poisoned: {}", e)))
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        let now = Instant::now();
        self.entries
            .lock()
            .map(|e| e.map.values().filter(|(_, exp)| *exp > now).count())
            .unwrap_or(0)
    }

    /// 만료 여부와 관계없이 실제로 보관 중인 항목 수
    #[cfg(test)]
    pub fn stored_len(&self) -> usize {
        self.entries.lock().map(|e| e.map.len()).unwrap_or(0)
    }
}

#[async_trait]
impl Cache for MemoryCache {
    async fn get(&self, key: &str) -> Result<Option<String>, CacheError> {
        let mut entries = self.lock()?;
        match entries.map.get(key) {
            Some((value, expires_at)) if *expires_at > Instant::now() => Ok(Some(value.clone())),
            Some(_) => {
                entries.map.remove(key);
                Ok(None)
            }
            None => Ok(None),
        }
    }

    async fn set_with_expiration(
        &self,
        key: &str,
        value: String,
        ttl: Duration,
    ) -> Result<(), CacheError> {
        let now = Instant::now();
        let mut entries = self.lock()?;
        if now.duration_since(entries.last_sweep) >= self.sweep_interval {
            entries.map.retain(|_, (_, expires_at)| *expires_at > now);
            entries.last_sweep = now;
        }
        entries.map.insert(key.to_string(), (value, now + ttl));
        Ok(())
    }

    async fn remove_pattern(&self, pattern: &str) -> Result<(), CacheError> {
        let now = Instant::now();
        let mut entries = self.lock()?;
        entries.map.retain(|key, (_, expires_at)| *expires_at > now && !glob_match(pattern, key));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_set_then_get() {
        let cache = MemoryCache::new();
        cache
            .set_with_expiration("user_1", "{}".to_string(), Duration::from_secs(60))
            .await
            .unwrap();

        assert_eq!(cache.get("user_1").await.unwrap(), Some("{}".to_string()));
        assert_eq!(cache.get("user_2").await.unwrap(), None);
        assert_eq!(cache.len(), 1);
    }

    #[tokio::test]
    async fn test_set_sweeps_expired_entries() {
        let cache = MemoryCache::with_sweep_interval(Duration::ZERO);
        for page in 0..50 {
            cache
                .set_with_expiration(
                    &format!("/api/v1/address?page={}", page),
                    "[]".to_string(),
                    Duration::from_millis(200),
                )
                .await
                .unwrap();
        }
        assert_eq!(cache.stored_len(), 50);

        tokio::time::sleep(Duration::from_millis(300)).await;

        // 읽기만 있던 키들은 다음 저장에서 정리됨
        cache
            .set_with_expiration("address_1", "{}".to_string(), Duration::from_secs(60))
            .await
            .unwrap();
        assert_eq!(cache.stored_len(), 1);
        assert!(cache.get("address_1").await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_sweep_waits_for_interval() {
        let cache = MemoryCache::with_sweep_interval(Duration::from_secs(3600));
        cache
            .set_with_expiration("doctor_1", "{}".to_string(), Duration::from_millis(10))
            .await
            .unwrap();
        tokio::time::sleep(Duration::from_millis(30)).await;
        cache
            .set_with_expiration("doctor_2", "{}".to_string(), Duration::from_secs(60))
            .await
            .unwrap();

        assert_eq!(cache.stored_len(), 2);
        assert_eq!(cache.len(), 1);
    }

    #[tokio::test]
    async fn test_remove_pattern_only_touches_matches() {
        let cache = MemoryCache::new();
        for key in ["doctor_1", "/api/v1/doctor?page=1", "doctors_list", "address_1"] {
            cache
                .set_with_expiration(key, "1".to_string(), Duration::from_secs(60))
                .await
                .unwrap();
        }

        cache.remove_pattern("*doctor*").await.unwrap();

        assert_eq!(cache.len(), 1);
        assert!(cache.get("address_1").await.unwrap().is_some());
    }
}
