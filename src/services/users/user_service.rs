//! # 사용자 관리 서비스 구현
//!
//! 사용자 계정의 전체 생명주기를 관리하는 핵심 비즈니스 로직입니다.
//!
//! ## 서비스 아키텍처
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                         UserService                             │
//! ├─────────────────────────────────────────────────────────────────┤
//! │  ┌─────────────────┐  ┌─────────────────┐  ┌─────────────────┐  │
//! │  │   Registration  │  │  Authentication │  │  Verification   │  │
//! │  │ • Duplicate Chk │  │ • Role Check    │  │ • Email Code    │  │
//! │  │ • Password Hash │  │ • Password Ver  │  │ • Phone Code    │  │
//! │  │ • Notify Code   │  │ • Token Pair    │  │ • Resend        │  │
//! │  └─────────────────┘  └─────────────────┘  └─────────────────┘  │
//! │  ┌─────────────────┐  ┌─────────────────┐                       │
//! │  │ Profile Mgmt    │  │   OAuth Link    │                       │
//! │  │ • Update        │  │ • Find by sub   │                       │
//! │  │ • Soft Delete   │  │ • Link by email │                       │
//! │  │ • Admin List    │  │ • Create client │                       │
//! │  └─────────────────┘  └─────────────────┘                       │
//! └─────────────────────────────────────────────────────────────────┘
//!            │                      │                    │
//!            ▼                      ▼                    ▼
//!     UserRepository          TokenService            Notifier
//! ```
//!
//! ## 보안 설계 원칙
//!
//! - **bcrypt 해싱**: 환경별 cost (개발/테스트 4, 스테이징 10, 운영 12)
//! - **에러 메시지 통합**: 존재하지 않는 이메일, 역할 불일치, OAuth 전용 계정,
//!   틀린 비밀번호는 모두 같은 인증 오류를 반환합니다
//! - **민감 정보 제거**: 응답 DTO에는 비밀번호 해시와 인증 코드가 없습니다

use std::sync::Arc;

use bcrypt::hash;
use log::{debug, info, warn};
use uuid::Uuid;

use crate::core::errors::AppError;
use crate::domain::dto::pagination::{PageRequest, Pagination};
use crate::domain::dto::tokens::AccessTokenResponse;
use crate::domain::dto::users::{
    AuthResponse, ListUsersResponse, RegisterRequest, UpdateUserRequest, UserResponse,
};
use crate::domain::entities::{User, UserRole};
use crate::domain::models::oauth::OAuthProfile;
use crate::repositories::UserRepository;
use crate::services::auth::TokenService;
use crate::services::notification::{
    verification_html, verification_message, Notifier, VERIFY_EMAIL_SUBJECT,
};

/// 로그인 실패 시 원인과 관계없이 반환하는 메시지
pub const INVALID_CREDENTIALS: &str = "잘못된 이메일 또는 비밀번호입니다";

const USER_NOT_FOUND: &str = "사용자를 찾을 수 없습니다";
const INVALID_VERIFY_CODE: &str = "인증 코드가 올바르지 않습니다";

/// 사용자 관리 비즈니스 로직 서비스
///
/// 저장소, 토큰 발급기, 알림 발송기를 생성자로 주입받습니다.
/// 테스트에서는 메모리 저장소와 기록용 알림 발송기로 교체합니다.
///
/// ## 사용 예제
///
/// ```rust,ignore
/// let service = UserService::new(repo, tokens, notifier, bcrypt_cost);
///
/// let auth = service
///     .login("kim@example.com", "Password123", UserRole::Doctor)
///     .await?;
/// println!("access token: {}", auth.access_token);
/// ```
pub struct UserService {
    repo: Arc<dyn UserRepository>,
    tokens: Arc<TokenService>,
    notifier: Arc<dyn Notifier>,
    bcrypt_cost: u32,
}

impl UserService {
    pub fn new(
        repo: Arc<dyn UserRepository>,
        tokens: Arc<TokenService>,
        notifier: Arc<dyn Notifier>,
        bcrypt_cost: u32,
    ) -> Self {
        Self {
            repo,
            tokens,
            notifier,
            bcrypt_cost,
        }
    }

    /// 역할별 비밀번호 로그인
    ///
    /// # 반환값
    ///
    /// * `Ok(AuthResponse)` - 사용자 정보와 액세스/리프레시 토큰
    /// * `Err(AppError::AuthenticationError)` - 자격 증명 불일치 (원인 비공개)
    ///
    /// # 인증 과정
    ///
    /// 1. 이메일로 사용자 조회
    /// 2. 라우트가 요구하는 역할과 저장된 역할 비교
    /// 3. 비밀번호 해시 존재 여부 확인 (OAuth 전용 계정 차단)
    /// 4. bcrypt 검증 후 토큰 쌍 발급
    pub async fn login(
        &self,
        email: &str,
        password: &str,
        role: UserRole,
    ) -> Result<AuthResponse, AppError> {
        let start_time = std::time::Instant::now();

        let user = match self.repo.find_by_email(email).await? {
            Some(user) => user,
            None => {
                debug!("로그인 실패: 존재하지 않는 이메일");
                return Err(invalid_credentials());
            }
        };

        if user.role != role {
            debug!("로그인 실패: 역할 불일치 ({} != {})", user.role, role);
            return Err(invalid_credentials());
        }

        let password_hash = match user.password_hash.as_deref() {
            Some(hash) => hash,
            None => {
                debug!("로그인 실패: OAuth 전용 계정");
                return Err(invalid_credentials());
            }
        };

        let is_valid = bcrypt::verify(password, password_hash)
            .map_err(|e| AppError::InternalError(format!("비밀번호 검증 실패: {}", e)))?;
        if !is_valid {
            return Err(invalid_credentials());
        }

        let tokens = self.tokens.generate_token_pair(&user)?;
        debug!("Total login took: {:?}", start_time.elapsed());
        info!("✅ 로그인 성공: {} ({})", user.email, user.role);

        Ok(AuthResponse::new(user, tokens))
    }

    /// 회원가입
    ///
    /// 계정을 저장한 뒤 이메일(및 전화번호가 있으면 SMS)로 인증 코드를 보냅니다.
    /// 알림 발송 실패는 경고 로그만 남기고 가입은 성공으로 처리합니다.
    ///
    /// # Errors
    ///
    /// * `AppError::ConflictError` - 이미 사용 중인 이메일
    pub async fn register(
        &self,
        request: RegisterRequest,
        role: UserRole,
    ) -> Result<AuthResponse, AppError> {
        let user = self.create_local_user(request, role).await?;

        self.send_email_code(&user).await.unwrap_or_else(|e| {
            warn!("⚠️ 가입 인증 이메일 발송 실패: {} - {}", user.email, e);
        });
        if !user.phone_number.is_empty() {
            self.send_phone_code(&user).await.unwrap_or_else(|e| {
                warn!("⚠️ 가입 인증 SMS 발송 실패: {} - {}", user.phone_number, e);
            });
        }

        let tokens = self.tokens.generate_token_pair(&user)?;
        Ok(AuthResponse::new(user, tokens))
    }

    /// 관리자 계정 생성 (관리자 전용 라우트)
    pub async fn create_admin(&self, request: RegisterRequest) -> Result<UserResponse, AppError> {
        let user = self.create_local_user(request, UserRole::Admin).await?;
        Ok(UserResponse::from(user))
    }

    async fn create_local_user(
        &self,
        request: RegisterRequest,
        role: UserRole,
    ) -> Result<User, AppError> {
        if self.repo.find_by_email(&request.email).await?.is_some() {
            return Err(AppError::ConflictError("이미 사용 중인 이메일입니다".to_string()));
        }

        let hash_start = std::time::Instant::now();
        let password_hash = hash(&request.password, self.bcrypt_cost)
            .map_err(|e| AppError::InternalError(format!("비밀번호 해싱 실패: {}", e)))?;
        debug!("Password hashing took: {:?}", hash_start.elapsed());

        let user = User::new_local(
            request.email,
            password_hash,
            role,
            request.name,
            request.phone_number,
        );
        self.repo.create(&user).await?;
        info!("👤 사용자 생성: {} ({})", user.email, user.role);

        Ok(user)
    }

    pub async fn get_user_by_id(&self, id: Uuid) -> Result<UserResponse, AppError> {
        let user = self.find_user(id).await?;
        Ok(UserResponse::from(user))
    }

    /// 리프레시 토큰으로 확인된 사용자에게 새 액세스 토큰을 발급합니다
    ///
    /// 그 사이 삭제된 계정이면 인증 오류입니다.
    pub async fn refresh_access_token(
        &self,
        user_id: Uuid,
    ) -> Result<AccessTokenResponse, AppError> {
        let user = self.repo.find_by_id(user_id).await?.ok_or_else(|| {
            AppError::AuthenticationError("유효하지 않은 리프레시 토큰입니다".to_string())
        })?;

        Ok(AccessTokenResponse {
            access_token: self.tokens.generate_access_token(&user)?,
            token_type: "Bearer".to_string(),
            expires_in: self.tokens.access_token_ttl_seconds(),
        })
    }

    /// 본인 계정 수정
    ///
    /// 현재 비밀번호가 맞아야 합니다. 전화번호가 바뀌면 인증 상태를 초기화하고
    /// 새 코드를 SMS로 보냅니다(실패 시 경고 로그).
    pub async fn update_user(
        &self,
        user_id: Uuid,
        request: UpdateUserRequest,
    ) -> Result<UserResponse, AppError> {
        let mut user = self.find_user(user_id).await?;

        let current_hash = user
            .password_hash
            .as_deref()
            .ok_or_else(|| AppError::AuthenticationError(INVALID_CREDENTIALS.to_string()))?;
        let is_valid = bcrypt::verify(&request.password, current_hash)
            .map_err(|e| AppError::InternalError(format!("비밀번호 검증 실패: {}", e)))?;
        if !is_valid {
            return Err(AppError::AuthenticationError(INVALID_CREDENTIALS.to_string()));
        }

        user.password_hash = Some(
            hash(&request.new_password, self.bcrypt_cost)
                .map_err(|e| AppError::InternalError(format!("비밀번호 해싱 실패: {}", e)))?,
        );
        if let Some(name) = request.name {
            user.name = name;
        }

        let phone_changed = match request.phone_number {
            Some(phone) if phone != user.phone_number => {
                user.phone_number = phone;
                user.regenerate_phone_code();
                true
            }
            _ => false,
        };
        user.touch();

        self.repo.update(&user).await?;
        info!("👤 사용자 정보 수정: {}", user.id);

        if phone_changed && !user.phone_number.is_empty() {
            self.send_phone_code(&user).await.unwrap_or_else(|e| {
                warn!("⚠️ 변경된 전화번호 인증 SMS 발송 실패: {} - {}", user.phone_number, e);
            });
        }

        Ok(UserResponse::from(user))
    }

    /// 이메일 인증 코드 확인
    ///
    /// # Errors
    ///
    /// * `AppError::ValidationError` - 숫자가 아닌 코드 또는 이메일/코드 불일치
    pub async fn verify_email(&self, email: &str, code: &str) -> Result<UserResponse, AppError> {
        let code = parse_verify_code(code)?;
        let mut user = self
            .repo
            .find_by_email_and_code(email, code)
            .await?
            .ok_or_else(|| AppError::ValidationError(INVALID_VERIFY_CODE.to_string()))?;

        user.approve_email = true;
        user.touch();
        self.repo.update(&user).await?;
        info!("📧 이메일 인증 완료: {}", user.email);

        Ok(UserResponse::from(user))
    }

    pub async fn verify_phone_number(
        &self,
        phone_number: &str,
        code: &str,
    ) -> Result<UserResponse, AppError> {
        let code = parse_verify_code(code)?;
        let mut user = self
            .repo
            .find_by_phone_and_code(phone_number, code)
            .await?
            .ok_or_else(|| AppError::ValidationError(INVALID_VERIFY_CODE.to_string()))?;

        user.approve_phone_number = true;
        user.touch();
        self.repo.update(&user).await?;
        info!("📱 전화번호 인증 완료: {}", user.phone_number);

        Ok(UserResponse::from(user))
    }

    /// 이메일 인증 코드 재발송
    ///
    /// 새 코드를 저장한 뒤 발송합니다. 발송 실패는 `ExternalServiceError`입니다.
    pub async fn resend_verify_email(&self, email: &str) -> Result<(), AppError> {
        let mut user = self
            .repo
            .find_by_email(email)
            .await?
            .ok_or_else(|| AppError::NotFound(USER_NOT_FOUND.to_string()))?;

        user.regenerate_email_code();
        self.repo.update(&user).await?;

        self.send_email_code(&user).await.map_err(into_external)
    }

    pub async fn resend_verify_phone_number(&self, phone_number: &str) -> Result<(), AppError> {
        let mut user = self
            .repo
            .find_by_phone(phone_number)
            .await?
            .ok_or_else(|| AppError::NotFound(USER_NOT_FOUND.to_string()))?;

        user.regenerate_phone_code();
        self.repo.update(&user).await?;

        self.send_phone_code(&user).await.map_err(into_external)
    }

    pub async fn list_users(
        &self,
        name: Option<&str>,
        page: PageRequest,
    ) -> Result<ListUsersResponse, AppError> {
        let (users, total) = self.repo.list(name, page).await?;

        Ok(ListUsersResponse {
            users: users.into_iter().map(UserResponse::from).collect(),
            pagination: Pagination::new(page, total),
        })
    }

    /// 사용자 소프트 삭제
    pub async fn delete_user(&self, id: Uuid) -> Result<(), AppError> {
        if !self.repo.soft_delete(id).await? {
            return Err(AppError::NotFound(USER_NOT_FOUND.to_string()));
        }

        warn!("🗑️ 사용자 삭제(soft): {}", id);
        Ok(())
    }

    /// OAuth 프로필로 사용자를 찾거나 만듭니다
    ///
    /// 1. 프로바이더 사용자 ID로 조회
    /// 2. 없으면 이메일로 조회해 프로바이더 ID를 연결
    /// 3. 그래도 없으면 비밀번호 없는 `client` 계정 생성
    pub async fn find_or_create_oauth_user(
        &self,
        profile: OAuthProfile,
    ) -> Result<AuthResponse, AppError> {
        let user = match self
            .repo
            .find_by_provider_id(profile.provider, &profile.provider_user_id)
            .await?
        {
            Some(user) => user,
            None => self.link_or_create_oauth_user(profile).await?,
        };

        let tokens = self.tokens.generate_token_pair(&user)?;
        Ok(AuthResponse::new(user, tokens))
    }

    async fn link_or_create_oauth_user(&self, profile: OAuthProfile) -> Result<User, AppError> {
        if profile.email.trim().is_empty() {
            return Err(AppError::ValidationError(
                "OAuth 프로바이더가 이메일을 제공하지 않았습니다".to_string(),
            ));
        }

        if let Some(mut user) = self.repo.find_by_email(&profile.email).await? {
            user.link_provider(profile.provider, profile.provider_user_id);
            self.repo.update(&user).await?;
            info!(
                "🔗 기존 계정에 {} 연결: {}",
                profile.provider.as_str(),
                user.email
            );
            return Ok(user);
        }

        let provider = profile.provider;
        let user = User::new_oauth(
            profile.email,
            profile.name,
            provider,
            profile.provider_user_id,
        );
        self.repo.create(&user).await?;
        info!("👤 OAuth 사용자 생성: {} ({})", user.email, provider.as_str());

        Ok(user)
    }

    async fn find_user(&self, id: Uuid) -> Result<User, AppError> {
        self.repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(USER_NOT_FOUND.to_string()))
    }

    async fn send_email_code(&self, user: &User) -> Result<(), AppError> {
        self.notifier
            .send_email(
                &user.name,
                &user.email,
                VERIFY_EMAIL_SUBJECT,
                &verification_message(user.verify_code_email),
                &verification_html(user.verify_code_email),
            )
            .await
    }

    async fn send_phone_code(&self, user: &User) -> Result<(), AppError> {
        self.notifier
            .send_sms(
                &user.phone_number,
                &verification_message(user.verify_code_phone_number),
            )
            .await
    }
}

fn invalid_credentials() -> AppError {
    AppError::AuthenticationError(INVALID_CREDENTIALS.to_string())
}

fn parse_verify_code(code: &str) -> Result<i32, AppError> {
    code.trim()
        .parse::<i32>()
        .map_err(|_| AppError::ValidationError(INVALID_VERIFY_CODE.to_string()))
}

fn into_external(error: AppError) -> AppError {
    match error {
        AppError::ExternalServiceError(_) => error,
        other => AppError::ExternalServiceError(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AuthProvider;
    use crate::domain::models::token::TokenKind;
    use crate::repositories::memory::MemoryUserRepository;
    use crate::services::notification::testing::{RecordingNotifier, SentMessage};

    struct Fixture {
        service: UserService,
        repo: Arc<MemoryUserRepository>,
        notifier: Arc<RecordingNotifier>,
        tokens: Arc<TokenService>,
    }

    fn fixture_with(notifier: RecordingNotifier) -> Fixture {
        let repo = Arc::new(MemoryUserRepository::default());
        let notifier = Arc::new(notifier);
        let tokens = Arc::new(TokenService::with_ttls(
            "test-secret",
            chrono::Duration::hours(1),
            chrono::Duration::days(7),
        ));
        let service = UserService::new(repo.clone(), tokens.clone(), notifier.clone(), 4);
        Fixture {
            service,
            repo,
            notifier,
            tokens,
        }
    }

    fn fixture() -> Fixture {
        fixture_with(RecordingNotifier::default())
    }

    fn register_request(email: &str) -> RegisterRequest {
        RegisterRequest {
            email: email.to_string(),
            password: "Password123".to_string(),
            name: "Kim".to_string(),
            phone_number: "+821012345678".to_string(),
            role: None,
        }
    }

    #[tokio::test]
    async fn test_register_then_login() {
        let f = fixture();
        let registered = f
            .service
            .register(register_request("kim@example.com"), UserRole::Doctor)
            .await
            .unwrap();

        let auth = f
            .service
            .login("kim@example.com", "Password123", UserRole::Doctor)
            .await
            .unwrap();

        let claims = f
            .tokens
            .verify_kind(&auth.access_token, TokenKind::Access)
            .unwrap();
        assert_eq!(claims.sub, registered.user.id);
        assert_eq!(auth.user.role, UserRole::Doctor);
    }

    #[tokio::test]
    async fn test_register_sends_email_and_sms_codes() {
        let f = fixture();
        f.service
            .register(register_request("kim@example.com"), UserRole::Client)
            .await
            .unwrap();

        let messages = f.notifier.messages();
        assert_eq!(messages.len(), 2);
        assert!(matches!(
            &messages[0],
            SentMessage::Email { to, subject, .. }
                if to == "kim@example.com" && subject == VERIFY_EMAIL_SUBJECT
        ));
        assert!(matches!(&messages[1], SentMessage::Sms { to, .. } if to == "+821012345678"));
    }

    #[tokio::test]
    async fn test_register_survives_notification_failure() {
        let f = fixture_with(RecordingNotifier::failing());
        let result = f
            .service
            .register(register_request("kim@example.com"), UserRole::Client)
            .await;

        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_duplicate_email_conflicts() {
        let f = fixture();
        f.service
            .register(register_request("kim@example.com"), UserRole::Client)
            .await
            .unwrap();

        let result = f
            .service
            .register(register_request("KIM@example.com"), UserRole::Client)
            .await;
        assert!(matches!(result, Err(AppError::ConflictError(_))));
    }

    #[tokio::test]
    async fn test_login_failures_share_one_message() {
        let f = fixture();
        f.service
            .register(register_request("kim@example.com"), UserRole::Client)
            .await
            .unwrap();

        let attempts = [
            ("nobody@example.com", "Password123", UserRole::Client),
            ("kim@example.com", "WrongPass1", UserRole::Client),
            ("kim@example.com", "Password123", UserRole::Admin),
        ];

        for (email, password, role) in attempts {
            match f.service.login(email, password, role).await {
                Err(AppError::AuthenticationError(msg)) => assert_eq!(msg, INVALID_CREDENTIALS),
                other => panic!("unexpected result: {:?}", other.map(|a| a.user.email)),
            }
        }
    }

    #[tokio::test]
    async fn test_oauth_only_account_cannot_password_login() {
        let f = fixture();
        f.service
            .find_or_create_oauth_user(OAuthProfile {
                provider: AuthProvider::Google,
                provider_user_id: "g-1".to_string(),
                email: "oauth@example.com".to_string(),
                name: "OAuth".to_string(),
            })
            .await
            .unwrap();

        let result = f
            .service
            .login("oauth@example.com", "anything1", UserRole::Client)
            .await;
        assert!(matches!(result, Err(AppError::AuthenticationError(msg)) if msg == INVALID_CREDENTIALS));
    }

    #[tokio::test]
    async fn test_verify_email_code() {
        let f = fixture();
        let auth = f
            .service
            .register(register_request("kim@example.com"), UserRole::Client)
            .await
            .unwrap();
        let id = Uuid::parse_str(&auth.user.id).unwrap();
        let stored = f.repo.find_by_id(id).await.unwrap().unwrap();

        let wrong = if stored.verify_code_email == 1000 { "1001" } else { "1000" };
        assert!(matches!(
            f.service.verify_email("kim@example.com", wrong).await,
            Err(AppError::ValidationError(_))
        ));
        assert!(matches!(
            f.service.verify_email("kim@example.com", "abcd").await,
            Err(AppError::ValidationError(_))
        ));

        let verified = f
            .service
            .verify_email("kim@example.com", &stored.verify_code_email.to_string())
            .await
            .unwrap();
        assert!(verified.approve_email);
    }

    #[tokio::test]
    async fn test_verify_phone_number_code() {
        let f = fixture();
        let auth = f
            .service
            .register(register_request("kim@example.com"), UserRole::Client)
            .await
            .unwrap();
        let id = Uuid::parse_str(&auth.user.id).unwrap();
        let stored = f.repo.find_by_id(id).await.unwrap().unwrap();

        let verified = f
            .service
            .verify_phone_number(
                "+821012345678",
                &stored.verify_code_phone_number.to_string(),
            )
            .await
            .unwrap();
        assert!(verified.approve_phone_number);
    }

    #[tokio::test]
    async fn test_resend_unknown_email_is_not_found() {
        let f = fixture();
        assert!(matches!(
            f.service.resend_verify_email("ghost@example.com").await,
            Err(AppError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_resend_failure_is_external_error() {
        let f = fixture_with(RecordingNotifier::failing());
        f.service
            .register(register_request("kim@example.com"), UserRole::Client)
            .await
            .unwrap();

        assert!(matches!(
            f.service.resend_verify_email("kim@example.com").await,
            Err(AppError::ExternalServiceError(_))
        ));
        assert!(matches!(
            f.service.resend_verify_phone_number("+821012345678").await,
            Err(AppError::ExternalServiceError(_))
        ));
    }

    #[tokio::test]
    async fn test_update_user_requires_current_password() {
        let f = fixture();
        let auth = f
            .service
            .register(register_request("kim@example.com"), UserRole::Client)
            .await
            .unwrap();
        let id = Uuid::parse_str(&auth.user.id).unwrap();

        let wrong = UpdateUserRequest {
            password: "WrongPass1".to_string(),
            new_password: "NewPassword1".to_string(),
            name: None,
            phone_number: None,
        };
        assert!(matches!(
            f.service.update_user(id, wrong).await,
            Err(AppError::AuthenticationError(_))
        ));

        let ok = UpdateUserRequest {
            password: "Password123".to_string(),
            new_password: "NewPassword1".to_string(),
            name: Some("Lee".to_string()),
            phone_number: Some("+821099998888".to_string()),
        };
        let updated = f.service.update_user(id, ok).await.unwrap();
        assert_eq!(updated.name, "Lee");
        assert!(!updated.approve_phone_number);

        assert!(f
            .service
            .login("kim@example.com", "NewPassword1", UserRole::Client)
            .await
            .is_ok());
    }

    #[tokio::test]
    async fn test_oauth_links_existing_email() {
        let f = fixture();
        let local = f
            .service
            .register(register_request("kim@example.com"), UserRole::Client)
            .await
            .unwrap();

        let linked = f
            .service
            .find_or_create_oauth_user(OAuthProfile {
                provider: AuthProvider::Facebook,
                provider_user_id: "fb-42".to_string(),
                email: "kim@example.com".to_string(),
                name: "Kim".to_string(),
            })
            .await
            .unwrap();
        assert_eq!(linked.user.id, local.user.id);
        assert!(linked.user.approve_email);

        let again = f
            .service
            .find_or_create_oauth_user(OAuthProfile {
                provider: AuthProvider::Facebook,
                provider_user_id: "fb-42".to_string(),
                email: "changed@example.com".to_string(),
                name: "Kim".to_string(),
            })
            .await
            .unwrap();
        assert_eq!(again.user.id, local.user.id);
    }

    #[tokio::test]
    async fn test_oauth_creates_client_without_password() {
        let f = fixture();
        let created = f
            .service
            .find_or_create_oauth_user(OAuthProfile {
                provider: AuthProvider::Google,
                provider_user_id: "g-7".to_string(),
                email: "new@example.com".to_string(),
                name: "New".to_string(),
            })
            .await
            .unwrap();

        assert_eq!(created.user.role, UserRole::Client);
        assert!(created.user.approve_email);

        let id = Uuid::parse_str(&created.user.id).unwrap();
        let stored = f.repo.find_by_id(id).await.unwrap().unwrap();
        assert!(stored.password_hash.is_none());
        assert_eq!(stored.google_id.as_deref(), Some("g-7"));
    }

    #[tokio::test]
    async fn test_delete_user_then_refresh_fails() {
        let f = fixture();
        let auth = f
            .service
            .register(register_request("kim@example.com"), UserRole::Client)
            .await
            .unwrap();
        let id = Uuid::parse_str(&auth.user.id).unwrap();

        assert!(f.service.refresh_access_token(id).await.is_ok());

        f.service.delete_user(id).await.unwrap();
        assert!(matches!(
            f.service.refresh_access_token(id).await,
            Err(AppError::AuthenticationError(_))
        ));
        assert!(matches!(
            f.service.delete_user(id).await,
            Err(AppError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_list_users_and_create_admin() {
        let f = fixture();
        f.service
            .create_admin(register_request("admin@example.com"))
            .await
            .unwrap();
        f.service
            .register(register_request("kim@example.com"), UserRole::Client)
            .await
            .unwrap();

        let list = f
            .service
            .list_users(None, PageRequest::default())
            .await
            .unwrap();
        assert_eq!(list.pagination.total, 2);
        assert!(list.users.iter().any(|u| u.role == UserRole::Admin));
    }
}
