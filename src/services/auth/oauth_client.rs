use async_trait::async_trait;

use crate::config::AuthProvider;
use crate::core::errors::AppError;
use crate::domain::dto::users::OAuthLoginUrlResponse;
use crate::domain::models::oauth::OAuthProfile;

/// OAuth 프로바이더 연동 계약
///
/// 로그인 URL 생성, state 검증, 인가 코드 교환 후 프로필 조회까지만 담당합니다.
/// 사용자 조회/생성은 `UserService::find_or_create_oauth_user`가 합니다.
#[async_trait]
pub trait OAuthClient: Send + Sync {
    fn provider(&self) -> AuthProvider;

    fn login_url(&self) -> Result<OAuthLoginUrlResponse, AppError>;

    fn verify_state(&self, state: &str) -> Result<(), AppError>;

    async fn fetch_profile(&self, code: &str) -> Result<OAuthProfile, AppError>;
}

/// `key=value&...` 쿼리 문자열 (값은 URL 인코딩)
pub(crate) fn build_query(params: &[(&str, &str)]) -> String {
    params
        .iter()
        .map(|(k, v)| format!("{}={}", k, urlencoding::encode(v)))
        .collect::<Vec<_>>()
        .join("&")
}

/// 비성공 응답을 `ExternalServiceError`로 바꿉니다
pub(crate) async fn ensure_success(
    response: reqwest::Response,
    context: &str,
) -> Result<reqwest::Response, AppError> {
    if response.status().is_success() {
        return Ok(response);
    }

    let status = response.status();
    let body = response.text().await.unwrap_or_default();
    Err(AppError::ExternalServiceError(format!(
        "{} 실패 ({}): {}",
        context, status, body
    )))
}
