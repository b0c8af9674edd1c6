use serde::Serialize;

/// OAuth 로그인 URL 응답
///
/// 클라이언트는 `auth_url`로 이동하고, 콜백에서 `state`를 그대로 돌려받습니다.
#[derive(Debug, Clone, Serialize)]
pub struct OAuthLoginUrlResponse {
    pub auth_url: String,
    pub state: String,
}
