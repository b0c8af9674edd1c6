//! `user.UserService` 구현
//!
//! `Login`, `Register`, `RefreshToken`은 기본 허용 목록에 있어 토큰 없이 호출됩니다.
//! `RefreshToken`은 메타데이터 대신 요청 본문의 리프레시 토큰을 검증합니다.

use tonic::{Request, Response, Status};
use validator::Validate;

use crate::caching::keys::ResourceKind;
use crate::core::errors::AppError;
use crate::core::state::AppState;
use crate::domain::dto::pagination::PageRequest;
use crate::domain::dto::users::{
    AuthResponse, ListUsersResponse, LoginRequest, RegisterRequest, UpdateUserRequest,
    UserResponse,
};
use crate::domain::entities::UserRole;
use crate::domain::models::auth::AuthenticatedUser;
use crate::domain::models::token::TokenKind;
use crate::grpc::pb::user as pb;
use crate::grpc::pb::user::user_service_server::UserService;
use crate::grpc::{authenticated, key_part, non_empty, parse_uuid, positive};

const KIND: ResourceKind = ResourceKind::User;

pub struct UserGrpcService {
    state: AppState,
}

impl UserGrpcService {
    pub fn new(state: AppState) -> Self {
        Self { state }
    }

    fn require_admin<T>(request: &Request<T>) -> Result<AuthenticatedUser, Status> {
        let user = authenticated(request)?;
        if !user.has_role(UserRole::Admin) {
            return Err(AppError::AuthorizationError("관리자 권한이 필요합니다".to_string()).into());
        }
        Ok(user)
    }
}

impl From<UserRole> for pb::UserRole {
    fn from(role: UserRole) -> Self {
        match role {
            UserRole::Admin => pb::UserRole::Admin,
            UserRole::Doctor => pb::UserRole::Doctor,
            UserRole::Client => pb::UserRole::Client,
        }
    }
}

/// `UNSPECIFIED`는 `None`
fn role_from_proto(value: i32) -> Option<UserRole> {
    match pb::UserRole::try_from(value).ok()? {
        pb::UserRole::Admin => Some(UserRole::Admin),
        pb::UserRole::Doctor => Some(UserRole::Doctor),
        pb::UserRole::Client => Some(UserRole::Client),
        pb::UserRole::Unspecified => None,
    }
}

impl From<UserResponse> for pb::User {
    fn from(u: UserResponse) -> Self {
        Self {
            id: u.id,
            email: u.email,
            name: u.name,
            phone_number: u.phone_number,
            role: pb::UserRole::from(u.role) as i32,
            approve_email: u.approve_email,
            approve_phone_number: u.approve_phone_number,
            created_at: u.created_at.to_rfc3339(),
            updated_at: u.updated_at.to_rfc3339(),
        }
    }
}

impl From<ListUsersResponse> for pb::ListUsersResponse {
    fn from(list: ListUsersResponse) -> Self {
        Self {
            users: list.users.into_iter().map(pb::User::from).collect(),
            pagination: Some(list.pagination.into()),
        }
    }
}

impl From<AuthResponse> for pb::LoginRes {
    fn from(auth: AuthResponse) -> Self {
        Self {
            user: Some(auth.user.into()),
            access_token: auth.access_token,
            refresh_token: auth.refresh_token,
            expires_in: auth.expires_in,
        }
    }
}

impl From<AuthResponse> for pb::RegisterRes {
    fn from(auth: AuthResponse) -> Self {
        Self {
            user: Some(auth.user.into()),
            access_token: auth.access_token,
            refresh_token: auth.refresh_token,
            expires_in: auth.expires_in,
        }
    }
}

fn verified(message: &str) -> Response<pb::VerifyResponse> {
    Response::new(pb::VerifyResponse {
        message: message.to_string(),
    })
}

#[tonic::async_trait]
impl UserService for UserGrpcService {
    /// 역할이 지정되지 않은 로그인은 거부합니다
    async fn login(
        &self,
        request: Request<pb::LoginReq>,
    ) -> Result<Response<pb::LoginRes>, Status> {
        let req = request.into_inner();
        let role = role_from_proto(req.role)
            .ok_or_else(|| Status::invalid_argument("role 값이 필요합니다"))?;

        let login = LoginRequest {
            email: req.email,
            password: req.password,
            role: Some(role),
        };
        login.validate().map_err(AppError::from)?;

        let auth = self
            .state
            .users
            .login(&login.email, &login.password, role)
            .await?;
        Ok(Response::new(auth.into()))
    }

    /// 공개 가입은 doctor/client만 허용 (기본 client)
    async fn register(
        &self,
        request: Request<pb::RegisterReq>,
    ) -> Result<Response<pb::RegisterRes>, Status> {
        let req = request.into_inner();
        let role = role_from_proto(req.role).unwrap_or(UserRole::Client);
        if role == UserRole::Admin {
            return Err(AppError::AuthorizationError(
                "관리자 계정은 공개 가입으로 만들 수 없습니다".to_string(),
            )
            .into());
        }

        let register = RegisterRequest {
            email: req.email,
            password: req.password,
            name: req.name,
            phone_number: req.phone_number,
            role: Some(role),
        };
        register.validate().map_err(AppError::from)?;

        let auth = self.state.users.register(register, role).await?;
        self.state.cache.remove_pattern(KIND.pattern()).await;

        Ok(Response::new(auth.into()))
    }

    async fn get_me(
        &self,
        request: Request<pb::GetMeReq>,
    ) -> Result<Response<pb::GetMeRes>, Status> {
        let user = authenticated(&request)?;
        let key = KIND.entity_key(&user.user_id.to_string());

        let me = match self.state.cache.get::<UserResponse>(&key).await {
            Some(cached) => cached,
            None => {
                let me = self.state.users.get_user_by_id(user.user_id).await?;
                self.state
                    .cache
                    .set_with_expiration(&key, &me, KIND.ttl())
                    .await;
                me
            }
        };

        Ok(Response::new(pb::GetMeRes {
            user: Some(me.into()),
        }))
    }

    async fn refresh_token(
        &self,
        request: Request<pb::RefreshTokenReq>,
    ) -> Result<Response<pb::RefreshTokenRes>, Status> {
        let req = request.into_inner();
        let claims = self
            .state
            .tokens
            .verify_kind(req.refresh_token.trim(), TokenKind::Refresh)
            .map_err(AppError::from)?;
        let user = AuthenticatedUser::try_from(claims)?;

        let response = self.state.users.refresh_access_token(user.user_id).await?;
        Ok(Response::new(pb::RefreshTokenRes {
            access_token: response.access_token,
            expires_in: response.expires_in,
        }))
    }

    async fn update_user(
        &self,
        request: Request<pb::UpdateUserReq>,
    ) -> Result<Response<pb::UpdateUserRes>, Status> {
        let user = authenticated(&request)?;
        let req = request.into_inner();

        let update = UpdateUserRequest {
            password: req.password,
            new_password: req.new_password,
            name: non_empty(req.name),
            phone_number: non_empty(req.phone_number),
        };
        update.validate().map_err(AppError::from)?;

        self.state.users.update_user(user.user_id, update).await?;
        self.state.cache.remove_pattern(KIND.pattern()).await;

        Ok(Response::new(pb::UpdateUserRes {
            message: "사용자 정보가 수정되었습니다".to_string(),
        }))
    }

    async fn verify_email(
        &self,
        request: Request<pb::VerifyEmailRequest>,
    ) -> Result<Response<pb::VerifyResponse>, Status> {
        let req = request.into_inner();
        self.state
            .users
            .verify_email(&req.email, &req.verify_code_email)
            .await?;
        self.state.cache.remove_pattern(KIND.pattern()).await;

        Ok(verified("이메일 인증이 완료되었습니다"))
    }

    async fn verify_phone_number(
        &self,
        request: Request<pb::VerifyPhoneNumberRequest>,
    ) -> Result<Response<pb::VerifyResponse>, Status> {
        let req = request.into_inner();
        self.state
            .users
            .verify_phone_number(&req.phone_number, &req.verify_code_phone_number)
            .await?;
        self.state.cache.remove_pattern(KIND.pattern()).await;

        Ok(verified("전화번호 인증이 완료되었습니다"))
    }

    async fn resend_verify_email(
        &self,
        request: Request<pb::ResendVerifyEmailRequest>,
    ) -> Result<Response<pb::VerifyResponse>, Status> {
        let req = request.into_inner();
        self.state.users.resend_verify_email(&req.email).await?;
        self.state.cache.remove_pattern(KIND.pattern()).await;

        Ok(verified("인증 코드를 이메일로 다시 보냈습니다"))
    }

    async fn resend_verify_phone_number(
        &self,
        request: Request<pb::ResendVerifyPhoneNumberRequest>,
    ) -> Result<Response<pb::VerifyResponse>, Status> {
        let req = request.into_inner();
        self.state
            .users
            .resend_verify_phone_number(&req.phone_number)
            .await?;
        self.state.cache.remove_pattern(KIND.pattern()).await;

        Ok(verified("인증 코드를 SMS로 다시 보냈습니다"))
    }

    async fn list_users(
        &self,
        request: Request<pb::ListUsersRequest>,
    ) -> Result<Response<pb::ListUsersResponse>, Status> {
        Self::require_admin(&request)?;
        let req = request.into_inner();

        let (key, ttl) = KIND.grpc_list_key(&[
            ("name", req.name.trim().to_string()),
            ("page", key_part(req.page)),
            ("limit", key_part(req.limit)),
        ]);
        if let Some(cached) = self.state.cache.get::<ListUsersResponse>(&key).await {
            return Ok(Response::new(cached.into()));
        }

        let name = non_empty(req.name);
        let list = self
            .state
            .users
            .list_users(name.as_deref(), PageRequest::new(positive(req.page), positive(req.limit)))
            .await?;

        self.state.cache.set_with_expiration(&key, &list, ttl).await;
        Ok(Response::new(list.into()))
    }

    async fn delete_user(
        &self,
        request: Request<pb::DeleteUserRequest>,
    ) -> Result<Response<pb::DeleteUserResponse>, Status> {
        Self::require_admin(&request)?;
        let id = parse_uuid(&request.get_ref().id, "id")?;

        let user = self.state.users.get_user_by_id(id).await?;
        self.state.users.delete_user(id).await?;
        self.state.cache.remove_pattern(KIND.pattern()).await;

        Ok(Response::new(pb::DeleteUserResponse {
            user: Some(user.into()),
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::state::testing::test_state;

    fn register_req(email: &str, role: pb::UserRole) -> Request<pb::RegisterReq> {
        Request::new(pb::RegisterReq {
            email: email.to_string(),
            password: "Password123".to_string(),
            name: "Kim".to_string(),
            phone_number: String::new(),
            role: role as i32,
        })
    }

    fn as_user<T>(message: T, user: &pb::User, role: UserRole) -> Request<T> {
        let mut request = Request::new(message);
        request.extensions_mut().insert(AuthenticatedUser {
            user_id: user.id.parse().unwrap(),
            email: user.email.clone(),
            role,
        });
        request
    }

    #[test]
    fn test_role_conversion() {
        assert_eq!(role_from_proto(pb::UserRole::Doctor as i32), Some(UserRole::Doctor));
        assert_eq!(role_from_proto(pb::UserRole::Unspecified as i32), None);
        assert_eq!(role_from_proto(99), None);
        assert_eq!(pb::UserRole::from(UserRole::Client), pb::UserRole::Client);
    }

    #[tokio::test]
    async fn test_register_then_login_and_refresh() {
        let service = UserGrpcService::new(test_state());

        let registered = service
            .register(register_req("kim@example.com", pb::UserRole::Unspecified))
            .await
            .unwrap()
            .into_inner();
        let user = registered.user.unwrap();
        assert_eq!(user.role, pb::UserRole::Client as i32);

        let login = service
            .login(Request::new(pb::LoginReq {
                email: "kim@example.com".to_string(),
                password: "Password123".to_string(),
                role: pb::UserRole::Client as i32,
            }))
            .await
            .unwrap()
            .into_inner();
        assert!(!login.access_token.is_empty());

        let refreshed = service
            .refresh_token(Request::new(pb::RefreshTokenReq {
                refresh_token: login.refresh_token,
            }))
            .await
            .unwrap()
            .into_inner();
        assert!(!refreshed.access_token.is_empty());

        let status = service
            .refresh_token(Request::new(pb::RefreshTokenReq {
                refresh_token: login.access_token,
            }))
            .await
            .unwrap_err();
        assert_eq!(status.code(), tonic::Code::Unauthenticated);
    }

    #[tokio::test]
    async fn test_login_failures_are_indistinguishable() {
        let service = UserGrpcService::new(test_state());
        service
            .register(register_req("lee@example.com", pb::UserRole::Doctor))
            .await
            .unwrap();

        let wrong_password = service
            .login(Request::new(pb::LoginReq {
                email: "lee@example.com".to_string(),
                password: "WrongPassword1".to_string(),
                role: pb::UserRole::Doctor as i32,
            }))
            .await
            .unwrap_err();
        let unknown_email = service
            .login(Request::new(pb::LoginReq {
                email: "nobody@example.com".to_string(),
                password: "Password123".to_string(),
                role: pb::UserRole::Doctor as i32,
            }))
            .await
            .unwrap_err();

        assert_eq!(wrong_password.code(), tonic::Code::Unauthenticated);
        assert_eq!(wrong_password.message(), unknown_email.message());
    }

    #[tokio::test]
    async fn test_public_admin_registration_is_denied() {
        let service = UserGrpcService::new(test_state());
        let status = service
            .register(register_req("admin@example.com", pb::UserRole::Admin))
            .await
            .unwrap_err();
        assert_eq!(status.code(), tonic::Code::PermissionDenied);
    }

    #[tokio::test]
    async fn test_get_me_and_admin_only_listing() {
        let service = UserGrpcService::new(test_state());
        let user = service
            .register(register_req("park@example.com", pb::UserRole::Client))
            .await
            .unwrap()
            .into_inner()
            .user
            .unwrap();

        let me = service
            .get_me(as_user(pb::GetMeReq {}, &user, UserRole::Client))
            .await
            .unwrap()
            .into_inner()
            .user
            .unwrap();
        assert_eq!(me.email, "park@example.com");

        let status = service
            .list_users(as_user(pb::ListUsersRequest::default(), &user, UserRole::Client))
            .await
            .unwrap_err();
        assert_eq!(status.code(), tonic::Code::PermissionDenied);

        let list = service
            .list_users(as_user(pb::ListUsersRequest::default(), &user, UserRole::Admin))
            .await
            .unwrap()
            .into_inner();
        assert_eq!(list.users.len(), 1);
    }
}
