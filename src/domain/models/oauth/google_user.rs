use serde::Deserialize;

use super::profile::OAuthProfile;
use crate::config::AuthProvider;

/// Google 토큰 교환 응답
#[derive(Debug, Deserialize)]
pub struct GoogleTokenResponse {
    pub access_token: String,
    pub expires_in: Option<i64>,
    pub token_type: Option<String>,
    pub id_token: Option<String>,
}

/// `oauth2/v2/userinfo` 응답
#[derive(Debug, Deserialize)]
pub struct GoogleUserInfo {
    pub id: String,
    pub email: String,
    #[serde(default)]
    pub name: String,
    pub picture: Option<String>,
    #[serde(default)]
    pub verified_email: bool,
}

impl From<GoogleUserInfo> for OAuthProfile {
    fn from(info: GoogleUserInfo) -> Self {
        Self {
            provider: AuthProvider::Google,
            provider_user_id: info.id,
            email: info.email,
            name: info.name,
        }
    }
}
