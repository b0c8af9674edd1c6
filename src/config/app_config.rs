//! 애플리케이션 전역 설정
//!
//! 프로세스 시작 시 환경 변수에서 한 번 읽어 불변 구조체로 만든 뒤
//! 필요한 컴포넌트에 참조 또는 복제본으로 전달합니다.

use std::env;
use std::str::FromStr;

use log::warn;
use thiserror::Error;

use super::auth_config::{DEFAULT_GRPC_PUBLIC_METHODS, JwtSettings, OAuthClientSettings};
use super::data_config::{
    DatabaseSettings, Environment, RateLimitSettings, RedisSettings, ServerSettings,
};

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("필수 환경 변수가 설정되지 않았습니다: {0}")]
    Missing(&'static str),

    #[error("환경 변수 {key} 값이 올바르지 않습니다: {value}")]
    Invalid { key: &'static str, value: String },
}

/// 이메일/SMS 발송 자격 증명
///
/// 값이 비어 있으면 알림 서비스는 실제 발송 대신 로그만 남깁니다.
#[derive(Debug, Clone, Default)]
pub struct NotificationSettings {
    pub sendgrid_api_key: String,
    pub sendgrid_from_email: String,
    pub sendgrid_from_name: String,
    pub twilio_account_sid: String,
    pub twilio_auth_token: String,
    pub twilio_phone_number: String,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: Environment,
    pub server: ServerSettings,
    pub database: DatabaseSettings,
    pub redis: RedisSettings,
    pub jwt: JwtSettings,
    pub google: OAuthClientSettings,
    pub facebook: OAuthClientSettings,
    pub oauth_state_secret: String,
    pub notification: NotificationSettings,
    pub grpc_public_methods: Vec<String>,
    pub rate_limit: RateLimitSettings,
    pub cors_allowed_origins: Vec<String>,
}

impl AppConfig {
    /// 환경 변수에서 설정을 읽습니다
    ///
    /// # Errors
    ///
    /// * `ConfigError::Missing` - `AUTH_SECRET` 또는 `DATABASE_URI`가 없는 경우
    /// * `ConfigError::Invalid` - 포트 등 숫자 값 파싱 실패
    pub fn from_env() -> Result<Self, ConfigError> {
        let environment = Environment::from_str(&env_string("ENVIRONMENT", "development"));

        let auth_secret = required("AUTH_SECRET")?;
        let oauth_state_secret = env::var("OAUTH_STATE_SECRET")
            .ok()
            .filter(|v| !v.is_empty())
            .unwrap_or_else(|| auth_secret.clone());

        let server = ServerSettings {
            host: env_string("HTTP_HOST", "0.0.0.0"),
            http_port: parse_strict("HTTP_PORT", 8080)?,
            grpc_port: parse_strict("GRPC_PORT", 9090)?,
            workers: parse_or("HTTP_WORKERS", 4),
        };

        let database = DatabaseSettings {
            uri: required("DATABASE_URI")?,
            max_connections: parse_or("DATABASE_MAX_CONNECTIONS", 10),
        };

        let redis = RedisSettings {
            uri: env_string("REDIS_URI", ""),
            password: env::var("REDIS_PASSWORD").ok().filter(|v| !v.is_empty()),
            db: parse_or("REDIS_DB", 0),
        };

        let jwt = JwtSettings {
            secret: auth_secret,
            expiration_hours: parse_or("JWT_EXPIRATION_HOURS", 1),
            refresh_expiration_days: parse_or("JWT_REFRESH_EXPIRATION_DAYS", 7),
        };

        let google = OAuthClientSettings::google(
            env_string("GOOGLE_CLIENT_ID", ""),
            env_string("GOOGLE_CLIENT_SECRET", ""),
            env_string("GOOGLE_REDIRECT_URL", ""),
        );
        let facebook = OAuthClientSettings::facebook(
            env_string("FACEBOOK_CLIENT_ID", ""),
            env_string("FACEBOOK_CLIENT_SECRET", ""),
            env_string("FACEBOOK_REDIRECT_URL", ""),
        );

        let notification = NotificationSettings {
            sendgrid_api_key: env_string("SENDGRID_API_KEY", ""),
            sendgrid_from_email: env_string("SENDGRID_FROM_EMAIL", "no-reply@clinic.local"),
            sendgrid_from_name: env_string("SENDGRID_FROM_NAME", "Clinic"),
            twilio_account_sid: env_string("TWILIO_ACCOUNT_SID", ""),
            twilio_auth_token: env_string("TWILIO_AUTH_TOKEN", ""),
            twilio_phone_number: env_string("TWILIO_PHONE_NUMBER", ""),
        };

        let grpc_public_methods = match env::var("GRPC_PUBLIC_METHODS") {
            Ok(raw) if !raw.trim().is_empty() => split_list(&raw),
            _ => DEFAULT_GRPC_PUBLIC_METHODS
                .iter()
                .map(|m| m.to_string())
                .collect(),
        };

        let rate_limit = RateLimitSettings {
            per_second: parse_or("RATE_LIMIT_PER_SECOND", 100),
            burst_size: parse_or("RATE_LIMIT_BURST_SIZE", 200),
        };

        let cors_allowed_origins = split_list(&env_string(
            "CORS_ALLOWED_ORIGINS",
            "http://localhost:3000,http://127.0.0.1:3000",
        ));

        Ok(Self {
            environment,
            server,
            database,
            redis,
            jwt,
            google,
            facebook,
            oauth_state_secret,
            notification,
            grpc_public_methods,
            rate_limit,
            cors_allowed_origins,
        })
    }

    /// 테스트용 설정
    #[cfg(test)]
    pub fn for_tests() -> Self {
        Self {
            environment: Environment::Test,
            server: ServerSettings {
                host: "127.0.0.1".to_string(),
                http_port: 8080,
                grpc_port: 9090,
                workers: 1,
            },
            database: DatabaseSettings {
                uri: "postgres://localhost/clinic_test".to_string(),
                max_connections: 1,
            },
            redis: RedisSettings::default(),
            jwt: JwtSettings {
                secret: "test-secret".to_string(),
                expiration_hours: 1,
                refresh_expiration_days: 7,
            },
            google: OAuthClientSettings::google(
                "google-client".to_string(),
                "google-secret".to_string(),
                "http://localhost:8080/auth/google/callback".to_string(),
            ),
            facebook: OAuthClientSettings::facebook(
                "facebook-client".to_string(),
                "facebook-secret".to_string(),
                "http://localhost:8080/auth/facebook/callback".to_string(),
            ),
            oauth_state_secret: "state-secret".to_string(),
            notification: NotificationSettings::default(),
            grpc_public_methods: DEFAULT_GRPC_PUBLIC_METHODS
                .iter()
                .map(|m| m.to_string())
                .collect(),
            rate_limit: RateLimitSettings {
                per_second: 100,
                burst_size: 200,
            },
            cors_allowed_origins: vec!["http://localhost:3000".to_string()],
        }
    }
}

fn required(key: &'static str) -> Result<String, ConfigError> {
    match env::var(key) {
        Ok(value) if !value.trim().is_empty() => Ok(value),
        _ => Err(ConfigError::Missing(key)),
    }
}

fn env_string(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

/// 파싱 실패 시 경고를 남기고 기본값을 사용합니다
fn parse_or<T: FromStr + std::fmt::Display + Copy>(key: &str, default: T) -> T {
    match env::var(key) {
        Ok(raw) => raw.trim().parse::<T>().unwrap_or_else(|_| {
            warn!("{} 파싱 실패: '{}'. 기본값 {} 사용", key, raw, default);
            default
        }),
        Err(_) => default,
    }
}

/// 파싱 실패를 설정 오류로 취급합니다 (포트처럼 잘못되면 안 되는 값)
fn parse_strict<T: FromStr>(key: &'static str, default: T) -> Result<T, ConfigError> {
    match env::var(key) {
        Ok(raw) => raw.trim().parse::<T>().map_err(|_| ConfigError::Invalid {
            key,
            value: raw,
        }),
        Err(_) => Ok(default),
    }
}

fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_list_trims_and_skips_empty() {
        let items = split_list(" /a.A/B , ,/c.C/D,");
        assert_eq!(items, vec!["/a.A/B".to_string(), "/c.C/D".to_string()]);
    }

    #[test]
    fn test_test_config_has_default_public_methods() {
        let config = AppConfig::for_tests();
        assert!(config
            .grpc_public_methods
            .contains(&"/user.UserService/Login".to_string()));
        assert!(config
            .grpc_public_methods
            .contains(&"/user.UserService/Register".to_string()));
        assert_eq!(config.server.http_bind_address(), "127.0.0.1:8080");
    }

    #[test]
    fn test_config_error_messages() {
        let missing = ConfigError::Missing("AUTH_SECRET");
        assert!(missing.to_string().contains("AUTH_SECRET"));

        let invalid = ConfigError::Invalid {
            key: "HTTP_PORT",
            value: "abc".to_string(),
        };
        assert!(invalid.to_string().contains("abc"));
    }
}
