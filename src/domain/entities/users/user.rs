//! 사용자 엔티티
//!
//! 로컬(이메일/비밀번호) 계정과 OAuth 계정을 하나의 타입으로 표현합니다.
//! OAuth 전용 계정은 `password_hash`가 없어 비밀번호 로그인을 할 수 없습니다.

use chrono::{DateTime, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::config::AuthProvider;

/// 사용자 역할
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    Admin,
    Doctor,
    #[default]
    Client,
}

impl UserRole {
    pub fn from_str(s: &str) -> Result<Self, String> {
        match s.trim().to_lowercase().as_str() {
            "admin" => Ok(UserRole::Admin),
            "doctor" => Ok(UserRole::Doctor),
            "client" | "patient" => Ok(UserRole::Client),
            _ => Err(format!("Unsupported user role: {}", s)),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::Admin => "admin",
            UserRole::Doctor => "doctor",
            UserRole::Client => "client",
        }
    }
}

impl std::fmt::Display for UserRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    /// 소문자로 정규화된 이메일 (unique)
    pub email: String,
    /// bcrypt 해시 (OAuth 전용 계정은 None)
    #[serde(skip_serializing)]
    pub password_hash: Option<String>,
    pub role: UserRole,
    pub name: String,
    pub phone_number: String,
    #[serde(skip_serializing)]
    pub verify_code_email: i32,
    #[serde(skip_serializing)]
    pub verify_code_phone_number: i32,
    pub approve_email: bool,
    pub approve_phone_number: bool,
    pub google_id: Option<String>,
    pub facebook_id: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

impl User {
    /// 새 로컬 사용자 생성 (이메일/패스워드)
    ///
    /// 이메일과 전화번호 인증 코드를 새로 발급하며 두 항목 모두 미인증 상태로 시작합니다.
    pub fn new_local(
        email: String,
        password_hash: String,
        role: UserRole,
        name: String,
        phone_number: String,
    ) -> Self {
        let now = Utc::now();

        Self {
            id: Uuid::new_v4(),
            email: email.trim().to_lowercase(),
            password_hash: Some(password_hash),
            role,
            name,
            phone_number,
            verify_code_email: generate_verify_code(),
            verify_code_phone_number: generate_verify_code(),
            approve_email: false,
            approve_phone_number: false,
            google_id: None,
            facebook_id: None,
            created_at: now,
            updated_at: now,
            deleted_at: None,
        }
    }

    /// 새 OAuth 사용자 생성
    ///
    /// 프로바이더가 이메일을 확인했으므로 `approve_email = true`로 시작하고
    /// 역할은 항상 `client`입니다.
    pub fn new_oauth(
        email: String,
        name: String,
        provider: AuthProvider,
        provider_user_id: String,
    ) -> Self {
        let now = Utc::now();
        let (google_id, facebook_id) = match provider {
            AuthProvider::Google => (Some(provider_user_id), None),
            AuthProvider::Facebook => (None, Some(provider_user_id)),
        };

        Self {
            id: Uuid::new_v4(),
            email: email.trim().to_lowercase(),
            password_hash: None,
            role: UserRole::Client,
            name,
            phone_number: String::new(),
            verify_code_email: generate_verify_code(),
            verify_code_phone_number: generate_verify_code(),
            approve_email: true,
            approve_phone_number: false,
            google_id,
            facebook_id,
            created_at: now,
            updated_at: now,
            deleted_at: None,
        }
    }

    /// 비밀번호 인증이 가능한 사용자인지 확인
    pub fn can_authenticate_with_password(&self) -> bool {
        self.password_hash.is_some()
    }

    pub fn is_deleted(&self) -> bool {
        self.deleted_at.is_some()
    }

    /// 프로바이더 ID를 기존 계정에 연결합니다
    pub fn link_provider(&mut self, provider: AuthProvider, provider_user_id: String) {
        match provider {
            AuthProvider::Google => self.google_id = Some(provider_user_id),
            AuthProvider::Facebook => self.facebook_id = Some(provider_user_id),
        }
        self.approve_email = true;
        self.touch();
    }

    pub fn regenerate_email_code(&mut self) {
        self.verify_code_email = generate_verify_code();
        self.approve_email = false;
        self.touch();
    }

    pub fn regenerate_phone_code(&mut self) {
        self.verify_code_phone_number = generate_verify_code();
        self.approve_phone_number = false;
        self.touch();
    }

    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

/// 4자리 인증 코드 (1000..=9999)
pub fn generate_verify_code() -> i32 {
    rand::thread_rng().gen_range(1000..=9999)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_parsing() {
        assert_eq!(UserRole::from_str("ADMIN").unwrap(), UserRole::Admin);
        assert_eq!(UserRole::from_str("patient").unwrap(), UserRole::Client);
        assert!(UserRole::from_str("nurse").is_err());
        assert_eq!(UserRole::default(), UserRole::Client);
        assert_eq!(serde_json::to_string(&UserRole::Doctor).unwrap(), "\"doctor\"");
    }

    #[test]
    fn test_new_local_user() {
        let user = User::new_local(
            " Kim@Example.COM ".to_string(),
            "hash".to_string(),
            UserRole::Doctor,
            "Kim".to_string(),
            "+821012345678".to_string(),
        );

        assert_eq!(user.email, "kim@example.com");
        assert!(user.can_authenticate_with_password());
        assert!(!user.approve_email);
        assert!((1000..=9999).contains(&user.verify_code_email));
        assert!((1000..=9999).contains(&user.verify_code_phone_number));
    }

    #[test]
    fn test_new_oauth_user_has_no_password() {
        let user = User::new_oauth(
            "lee@example.com".to_string(),
            "Lee".to_string(),
            AuthProvider::Facebook,
            "fb-1".to_string(),
        );

        assert!(!user.can_authenticate_with_password());
        assert!(user.approve_email);
        assert_eq!(user.role, UserRole::Client);
        assert_eq!(user.facebook_id.as_deref(), Some("fb-1"));
        assert!(user.google_id.is_none());
    }

    #[test]
    fn test_secrets_are_not_serialized() {
        let user = User::new_local(
            "a@b.com".to_string(),
            "secret-hash".to_string(),
            UserRole::Client,
            String::new(),
            String::new(),
        );
        let json = serde_json::to_string(&user).unwrap();
        assert!(!json.contains("secret-hash"));
        assert!(!json.contains("verify_code_email"));
    }
}
