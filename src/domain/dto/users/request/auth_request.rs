use serde::Deserialize;
use validator::Validate;

use crate::domain::entities::UserRole;

/// 비밀번호 로그인 요청
///
/// 역할은 라우트(`/auth-admin`, `/auth-doctor`, `/auth-patient`)가 정하므로
/// 본문의 `role` 값은 무시됩니다.
#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(email(message = "유효한 이메일 주소를 입력해주세요"))]
    pub email: String,

    #[validate(length(min = 1, message = "비밀번호를 입력해주세요"))]
    pub password: String,

    #[serde(default)]
    pub role: Option<UserRole>,
}

/// OAuth 콜백 쿼리
///
/// `state`가 없거나 검증에 실패하면 401입니다.
#[derive(Debug, Deserialize)]
pub struct OAuthCallbackQuery {
    pub code: Option<String>,
    pub state: Option<String>,
    pub error: Option<String>,
    pub error_description: Option<String>,
}
