//! 데이터 및 서버 설정 관리 모듈
//!
//! 데이터베이스, 캐시, 서버, 환경 및 보안 관련 설정 타입과
//! 운영 상수(타임아웃, 캐시 TTL, 재시도 정책)를 정의합니다.

use std::time::Duration;

/// 저장소 호출 하나에 허용되는 최대 시간
pub const DATABASE_TIMEOUT: Duration = Duration::from_secs(5);

/// 시작 시 데이터베이스 연결 재시도 횟수
pub const DATABASE_CONNECT_ATTEMPTS: u32 = 10;

/// 재시도 사이 대기 시간
pub const DATABASE_CONNECT_DELAY: Duration = Duration::from_secs(5);

pub const ADDRESS_CACHING_TIME: Duration = Duration::from_secs(60);
pub const DOCTOR_CACHING_TIME: Duration = Duration::from_secs(60);
pub const USERS_CACHING_TIME: Duration = Duration::from_secs(60);

/// gRPC 필터 없는 목록 캐시는 더 오래 유지합니다
pub const GRPC_LIST_CACHING_TIME: Duration = Duration::from_secs(60 * 60);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    Development,
    Test,
    Staging,
    Production,
}

impl Environment {
    pub fn from_str(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "development" | "dev" => Environment::Development,
            "test" | "testing" => Environment::Test,
            "staging" | "stage" => Environment::Staging,
            _ => Environment::Production,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Environment::Development => "development",
            Environment::Test => "test",
            Environment::Staging => "staging",
            Environment::Production => "production",
        }
    }

    pub fn is_production(&self) -> bool {
        matches!(self, Environment::Production)
    }
}

pub struct PasswordConfig;

impl PasswordConfig {
    /// 환경별 bcrypt cost
    ///
    /// 개발/테스트 환경은 빠른 반복을 위해 최소값을 사용합니다.
    pub fn bcrypt_cost_for_env(env: &Environment) -> u32 {
        match env {
            Environment::Development => 4,
            Environment::Test => 4,
            Environment::Staging => 10,
            Environment::Production => 12,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ServerSettings {
    pub host: String,
    pub http_port: u16,
    pub grpc_port: u16,
    pub workers: usize,
}

impl ServerSettings {
    pub fn http_bind_address(&self) -> String {
        format!("{}:{}", self.host, self.http_port)
    }

    pub fn grpc_bind_address(&self) -> String {
        format!("{}:{}", self.host, self.grpc_port)
    }
}

#[derive(Debug, Clone)]
pub struct DatabaseSettings {
    pub uri: String,
    pub max_connections: u32,
}

/// Redis 연결 설정
///
/// `uri`가 비어 있으면 프로세스 내부 메모리 캐시로 대체됩니다.
#[derive(Debug, Clone, Default)]
pub struct RedisSettings {
    pub uri: String,
    pub password: Option<String>,
    pub db: i64,
}

impl RedisSettings {
    pub fn is_configured(&self) -> bool {
        !self.uri.trim().is_empty()
    }

    /// `redis://` URL을 조립합니다
    ///
    /// `REDIS_URI`는 `host:port` 형태와 완전한 URL 형태를 모두 허용합니다.
    pub fn connection_url(&self) -> String {
        let uri = self.uri.trim();
        if uri.starts_with("redis://") || uri.starts_with("rediss://") {
            return uri.to_string();
        }

        match &self.password {
            Some(password) if !password.is_empty() => format!(
                "redis://:{}@{}/{}",
                urlencoding::encode(password),
                uri,
                self.db
            ),
            _ => format!("redis://{}/{}", uri, self.db),
        }
    }
}

#[derive(Debug, Clone)]
pub struct RateLimitSettings {
    pub per_second: u64,
    pub burst_size: u32,
}
