use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

use crate::domain::entities::UserRole;

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(email(message = "유효한 이메일 주소를 입력해주세요"))]
    pub email: String,

    #[validate(length(min = 8, max = 72, message = "비밀번호는 8-72자 사이여야 합니다"))]
    #[validate(custom(function = "validate_password_strength"))]
    pub password: String,

    #[serde(default)]
    #[validate(length(max = 50, message = "이름은 50자 이하여야 합니다"))]
    pub name: String,

    #[serde(default)]
    #[validate(custom(function = "validate_phone_number"))]
    pub phone_number: String,

    /// 라우트가 역할을 정하는 경우 무시됩니다
    #[serde(default)]
    pub role: Option<UserRole>,
}

/// 본인 계정 수정 요청
///
/// 현재 비밀번호가 일치해야 새 비밀번호로 바뀝니다.
/// 전화번호를 바꾸면 전화번호 인증이 초기화되고 새 코드가 발송됩니다.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct UpdateUserRequest {
    #[validate(length(min = 1, message = "현재 비밀번호를 입력해주세요"))]
    pub password: String,

    #[validate(length(min = 8, max = 72, message = "비밀번호는 8-72자 사이여야 합니다"))]
    #[validate(custom(function = "validate_password_strength"))]
    pub new_password: String,

    #[validate(length(max = 50, message = "이름은 50자 이하여야 합니다"))]
    pub name: Option<String>,

    #[validate(custom(function = "validate_phone_number"))]
    pub phone_number: Option<String>,
}

fn validate_password_strength(password: &str) -> Result<(), ValidationError> {
    let has_letter = password.chars().any(|c| c.is_alphabetic());
    let has_digit = password.chars().any(|c| c.is_ascii_digit());

    if !(has_letter && has_digit) {
        return Err(ValidationError::new("weak_password")
            .with_message("비밀번호는 문자와 숫자를 모두 포함해야 합니다".into()));
    }

    Ok(())
}

fn validate_phone_number(phone: &str) -> Result<(), ValidationError> {
    if phone.is_empty() {
        return Ok(());
    }

    let digits = phone.strip_prefix('+').unwrap_or(phone);
    if digits.len() < 7 || digits.len() > 15 || !digits.chars().all(|c| c.is_ascii_digit()) {
        return Err(ValidationError::new("invalid_phone_number")
            .with_message("전화번호 형식이 올바르지 않습니다".into()));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn register(password: &str, phone: &str) -> RegisterRequest {
        RegisterRequest {
            email: "kim@example.com".to_string(),
            password: password.to_string(),
            name: "Kim".to_string(),
            phone_number: phone.to_string(),
            role: None,
        }
    }

    #[test]
    fn test_register_validation() {
        assert!(register("Password123", "+821012345678").validate().is_ok());
        assert!(register("Password123", "").validate().is_ok());
        assert!(register("short1", "").validate().is_err());
        assert!(register("onlyletters", "").validate().is_err());
        assert!(register("Password123", "010-1234").validate().is_err());
    }

    #[test]
    fn test_invalid_email_is_rejected() {
        let mut request = register("Password123", "");
        request.email = "not-an-email".to_string();
        assert!(request.validate().is_err());
    }
}
