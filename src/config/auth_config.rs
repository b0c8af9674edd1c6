//! # Authentication Configuration Module
//!
//! JWT 서명, OAuth 프로바이더 자격 증명, gRPC 인증 예외 목록 등
//! 인증 관련 설정 타입을 정의합니다.
//!
//! 모든 값은 시작 시 [`AppConfig::from_env`](super::AppConfig::from_env)에서
//! 한 번만 읽혀 각 컴포넌트 생성자로 전달됩니다.
//!
//! ## 환경 변수
//!
//! ```bash
//! export AUTH_SECRET="your-super-secret-jwt-key"
//! export JWT_EXPIRATION_HOURS="1"
//! export JWT_REFRESH_EXPIRATION_DAYS="7"
//!
//! export GOOGLE_CLIENT_ID="..."
//! export GOOGLE_CLIENT_SECRET="..."
//! export GOOGLE_REDIRECT_URL="http://localhost:8080/auth/google/callback"
//!
//! export FACEBOOK_CLIENT_ID="..."
//! export FACEBOOK_CLIENT_SECRET="..."
//! export FACEBOOK_REDIRECT_URL="http://localhost:8080/auth/facebook/callback"
//!
//! export GRPC_PUBLIC_METHODS="/user.UserService/Login,/user.UserService/Register"
//! ```

use serde::{Deserialize, Serialize};

/// 토큰 없이 호출 가능한 gRPC 메서드 기본 목록
pub const DEFAULT_GRPC_PUBLIC_METHODS: &[&str] = &[
    "/user.UserService/Login",
    "/user.UserService/Register",
    "/user.UserService/RefreshToken",
];

#[derive(Debug, Clone)]
pub struct JwtSettings {
    pub secret: String,
    pub expiration_hours: i64,
    pub refresh_expiration_days: i64,
}

/// OAuth 2.0 클라이언트 설정
///
/// 엔드포인트 URL은 프로바이더별 기본값을 가지며 테스트에서 교체할 수 있습니다.
#[derive(Debug, Clone)]
pub struct OAuthClientSettings {
    pub client_id: String,
    pub client_secret: String,
    pub redirect_url: String,
    pub auth_uri: String,
    pub token_uri: String,
    pub userinfo_uri: String,
    pub scopes: Vec<String>,
}

impl OAuthClientSettings {
    pub fn google(client_id: String, client_secret: String, redirect_url: String) -> Self {
        Self {
            client_id,
            client_secret,
            redirect_url,
            auth_uri: "https://accounts.google.com/o/oauth2/auth".to_string(),
            token_uri: "https://oauth2.googleapis.com/token".to_string(),
            userinfo_uri: "https://www.googleapis.com/oauth2/v2/userinfo".to_string(),
            scopes: vec![
                "https://www.googleapis.com/auth/userinfo.email".to_string(),
                "https://www.googleapis.com/auth/userinfo.profile".to_string(),
            ],
        }
    }

    pub fn facebook(client_id: String, client_secret: String, redirect_url: String) -> Self {
        Self {
            client_id,
            client_secret,
            redirect_url,
            auth_uri: "https://www.facebook.com/v18.0/dialog/oauth".to_string(),
            token_uri: "https://graph.facebook.com/v18.0/oauth/access_token".to_string(),
            userinfo_uri: "https://graph.facebook.com/me".to_string(),
            scopes: vec!["email".to_string()],
        }
    }

    pub fn is_configured(&self) -> bool {
        !self.client_id.is_empty() && !self.client_secret.is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AuthProvider {
    Google,
    Facebook,
}

impl AuthProvider {
    pub fn as_str(&self) -> &'static str {
        match self {
            AuthProvider::Google => "google",
            AuthProvider::Facebook => "facebook",
        }
    }
}
