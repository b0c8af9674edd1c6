use serde::Deserialize;

use super::profile::OAuthProfile;
use crate::config::AuthProvider;

/// Graph API 토큰 교환 응답
#[derive(Debug, Deserialize)]
pub struct FacebookTokenResponse {
    pub access_token: String,
    pub token_type: Option<String>,
    pub expires_in: Option<i64>,
}

/// `GET /me?fields=id,name,email` 응답
///
/// 이메일 권한을 거부한 사용자는 `email`이 없습니다.
#[derive(Debug, Deserialize)]
pub struct FacebookUserInfo {
    pub id: String,
    #[serde(default)]
    pub name: String,
    pub email: Option<String>,
}

impl From<FacebookUserInfo> for OAuthProfile {
    fn from(info: FacebookUserInfo) -> Self {
        Self {
            provider: AuthProvider::Facebook,
            provider_user_id: info.id,
            email: info.email.unwrap_or_default(),
            name: info.name,
        }
    }
}
