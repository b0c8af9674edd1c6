use serde::{Deserialize, Serialize};

use crate::domain::entities::UserRole;

/// 토큰 종류
///
/// 액세스 토큰이 필요한 곳에 리프레시 토큰을 쓸 수 없고 그 반대도 마찬가지입니다.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenKind {
    Access,
    Refresh,
}

impl TokenKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TokenKind::Access => "access",
            TokenKind::Refresh => "refresh",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenClaims {
    /// 사용자 ID (UUID 문자열)
    pub sub: String,
    pub email: String,
    pub role: UserRole,
    pub kind: TokenKind,
    pub iat: i64,
    pub exp: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
    /// 액세스 토큰 유효 시간(초)
    pub expires_in: i64,
    pub token_type: String,
}
