use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct VerifyEmailRequest {
    #[validate(email(message = "유효한 이메일 주소를 입력해주세요"))]
    pub email: String,

    #[validate(length(min = 4, max = 4, message = "인증 코드는 4자리입니다"))]
    pub verify_code_email: String,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct VerifyPhoneNumberRequest {
    #[validate(length(min = 1, message = "전화번호를 입력해주세요"))]
    pub phone_number: String,

    #[validate(length(min = 4, max = 4, message = "인증 코드는 4자리입니다"))]
    pub verify_code_phone_number: String,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct ResendVerifyEmailRequest {
    #[validate(email(message = "유효한 이메일 주소를 입력해주세요"))]
    pub email: String,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct ResendVerifyPhoneNumberRequest {
    #[validate(length(min = 1, message = "전화번호를 입력해주세요"))]
    pub phone_number: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListUsersQuery {
    pub name: Option<String>,
    pub page: Option<i64>,
    pub limit: Option<i64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DeleteUserRequest {
    pub id: Uuid,
}
