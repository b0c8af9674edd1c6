//! # JWT Token Service
//!
//! HS256 서명의 액세스/리프레시 토큰을 발급하고 검증합니다.
//!
//! ## 토큰 수명
//!
//! ```text
//! Issued ──► Valid ──(exp 경과)──► Expired
//! ```
//!
//! 폐기(revocation) 상태는 없습니다. 토큰은 만료될 때까지 유효합니다.
//!
//! ## 클레임
//!
//! | 필드 | 설명 |
//! |------|------|
//! | `sub` | 사용자 ID |
//! | `email` | 사용자 이메일 |
//! | `role` | `admin` / `doctor` / `client` |
//! | `kind` | `access` / `refresh` |
//! | `iat`, `exp` | 발급/만료 시각 (Unix 초) |
//!
//! 검증은 leeway 0으로 수행하며, [`TokenService::verify_kind`]는 토큰 종류까지 확인합니다.

use chrono::{Duration, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use thiserror::Error;

use crate::config::JwtSettings;
use crate::core::errors::AppError;
use crate::domain::entities::User;
use crate::domain::models::token::{TokenClaims, TokenKind, TokenPair};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TokenError {
    #[error("유효하지 않은 토큰 서명입니다")]
    InvalidSignature,

    #[error("토큰이 만료되었습니다")]
    Expired,

    #[error("유효하지 않은 토큰입니다")]
    Malformed,

    #[error("이 요청에 사용할 수 없는 토큰 종류입니다")]
    WrongKind,
}

impl From<TokenError> for AppError {
    fn from(error: TokenError) -> Self {
        AppError::AuthenticationError(error.to_string())
    }
}

pub struct TokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    access_ttl: Duration,
    refresh_ttl: Duration,
}

impl TokenService {
    pub fn new(settings: &JwtSettings) -> Self {
        Self::with_ttls(
            &settings.secret,
            Duration::hours(settings.expiration_hours),
            Duration::days(settings.refresh_expiration_days),
        )
    }

    pub fn with_ttls(secret: &str, access_ttl: Duration, refresh_ttl: Duration) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;

        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
            access_ttl,
            refresh_ttl,
        }
    }

    /// 액세스 토큰 유효 시간(초)
    pub fn access_token_ttl_seconds(&self) -> i64 {
        self.access_ttl.num_seconds()
    }

    pub fn generate_access_token(&self, user: &User) -> Result<String, AppError> {
        self.generate(user, TokenKind::Access, self.access_ttl)
    }

    pub fn generate_refresh_token(&self, user: &User) -> Result<String, AppError> {
        self.generate(user, TokenKind::Refresh, self.refresh_ttl)
    }

    pub fn generate_token_pair(&self, user: &User) -> Result<TokenPair, AppError> {
        Ok(TokenPair {
            access_token: self.generate_access_token(user)?,
            refresh_token: self.generate_refresh_token(user)?,
            expires_in: self.access_token_ttl_seconds(),
            token_type: "Bearer".to_string(),
        })
    }

    fn generate(&self, user: &User, kind: TokenKind, ttl: Duration) -> Result<String, AppError> {
        let now = Utc::now();
        let claims = TokenClaims {
            sub: user.id.to_string(),
            email: user.email.clone(),
            role: user.role,
            kind,
            iat: now.timestamp(),
            exp: (now + ttl).timestamp(),
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key).map_err(|e| {
            AppError::InternalError(format!("{} 토큰 생성 실패: {}", kind.as_str(), e))
        })
    }

    pub fn verify(&self, token: &str) -> Result<TokenClaims, TokenError> {
        decode::<TokenClaims>(token, &self.decoding_key, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                ErrorKind::InvalidSignature => TokenError::InvalidSignature,
                ErrorKind::ExpiredSignature => TokenError::Expired,
                _ => TokenError::Malformed,
            })
    }

    pub fn verify_kind(&self, token: &str, kind: TokenKind) -> Result<TokenClaims, TokenError> {
        let claims = self.verify(token)?;
        if claims.kind != kind {
            return Err(TokenError::WrongKind);
        }
        Ok(claims)
    }

    /// `Bearer <token>` 헤더 값에서 토큰을 꺼냅니다
    pub fn extract_bearer_token(auth_header: &str) -> Result<&str, AppError> {
        auth_header
            .strip_prefix("Bearer ")
            .or_else(|| auth_header.strip_prefix("bearer "))
            .map(str::trim)
            .filter(|token| !token.is_empty())
            .ok_or_else(|| {
                AppError::AuthenticationError("유효하지 않은 인증 헤더 형식입니다".to_string())
            })
    }
}
