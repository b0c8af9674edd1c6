use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::dto::pagination::Pagination;
use crate::domain::entities::{User, UserRole};
use crate::domain::models::token::TokenPair;

/// 외부에 노출되는 사용자 정보 (비밀번호 해시, 인증 코드 제외)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserResponse {
    pub id: String,
    pub email: String,
    pub name: String,
    pub phone_number: String,
    pub role: UserRole,
    pub approve_email: bool,
    pub approve_phone_number: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        let User {
            id,
            email,
            name,
            phone_number,
            role,
            approve_email,
            approve_phone_number,
            created_at,
            updated_at,
            ..
        } = user;

        Self {
            id: id.to_string(),
            email,
            name,
            phone_number,
            role,
            approve_email,
            approve_phone_number,
            created_at,
            updated_at,
        }
    }
}

/// 로그인/회원가입/OAuth 콜백 응답
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthResponse {
    pub user: UserResponse,
    pub access_token: String,
    pub refresh_token: String,
    pub token_type: String,
    pub expires_in: i64,
}

impl AuthResponse {
    pub fn new(user: User, tokens: TokenPair) -> Self {
        Self {
            user: UserResponse::from(user),
            access_token: tokens.access_token,
            refresh_token: tokens.refresh_token,
            token_type: tokens.token_type,
            expires_in: tokens.expires_in,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ListUsersResponse {
    pub users: Vec<UserResponse>,
    pub pagination: Pagination,
}
