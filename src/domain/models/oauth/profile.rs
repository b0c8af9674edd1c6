use crate::config::AuthProvider;

/// 프로바이더와 무관한 OAuth 사용자 프로필
#[derive(Debug, Clone, PartialEq)]
pub struct OAuthProfile {
    pub provider: AuthProvider,
    pub provider_user_id: String,
    pub email: String,
    pub name: String,
}
