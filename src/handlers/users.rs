//! # Role-scoped Account Handlers
//!
//! 역할별 계정 라우트입니다. 로그인은 라우트가 정한 역할과 저장된 역할이
//! 같아야 성공하며, 실패 원인은 응답에서 구분되지 않습니다.
//!
//! | 스코프 | 역할 |
//! |--------|------|
//! | `/auth-admin` | `admin` |
//! | `/auth-doctor` | `doctor` |
//! | `/auth-patient` | `client` |

use actix_web::{delete, get, post, put, web, HttpRequest, HttpResponse};
use log::info;
use validator::Validate;

use crate::caching::keys::ResourceKind;
use crate::core::errors::AppError;
use crate::core::state::AppState;
use crate::domain::dto::pagination::PageRequest;
use crate::domain::dto::users::{
    DeleteUserRequest, ListUsersQuery, ListUsersResponse, LoginRequest, MessageResponse,
    RegisterRequest, UpdateUserRequest,
};
use crate::domain::entities::UserRole;
use crate::domain::models::auth::AuthenticatedUser;
use crate::middlewares::AuthMiddleware;

const KIND: ResourceKind = ResourceKind::User;

async fn login_as(
    state: &AppState,
    payload: LoginRequest,
    role: UserRole,
) -> Result<HttpResponse, AppError> {
    payload.validate()?;

    let response = state
        .users
        .login(&payload.email, &payload.password, role)
        .await?;
    Ok(HttpResponse::Ok().json(response))
}

async fn register_as(
    state: &AppState,
    payload: RegisterRequest,
    role: UserRole,
) -> Result<HttpResponse, AppError> {
    payload.validate()?;

    let response = state.users.register(payload, role).await?;
    state.cache.remove_pattern(KIND.pattern()).await;

    Ok(HttpResponse::Ok().json(response))
}

async fn update_self(
    state: &AppState,
    user: &AuthenticatedUser,
    payload: UpdateUserRequest,
) -> Result<HttpResponse, AppError> {
    payload.validate()?;

    let response = state.users.update_user(user.user_id, payload).await?;
    state.cache.remove_pattern(KIND.pattern()).await;

    Ok(HttpResponse::Ok().json(response))
}

// ===== /auth-admin =====

#[post("/login")]
pub async fn admin_login(
    state: web::Data<AppState>,
    payload: web::Json<LoginRequest>,
) -> Result<HttpResponse, AppError> {
    login_as(&state, payload.into_inner(), UserRole::Admin).await
}

#[post("/create", wrap = "AuthMiddleware::required_with_role(UserRole::Admin)")]
pub async fn admin_create(
    state: web::Data<AppState>,
    payload: web::Json<RegisterRequest>,
) -> Result<HttpResponse, AppError> {
    payload.validate()?;

    let admin = state.users.create_admin(payload.into_inner()).await?;
    state.cache.remove_pattern(KIND.pattern()).await;

    Ok(HttpResponse::Ok().json(admin))
}

#[put("/update", wrap = "AuthMiddleware::required_with_role(UserRole::Admin)")]
pub async fn admin_update(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
    payload: web::Json<UpdateUserRequest>,
) -> Result<HttpResponse, AppError> {
    update_self(&state, &user, payload.into_inner()).await
}

/// 사용자 목록 (요청 URI 키로 캐시)
#[get("/users", wrap = "AuthMiddleware::required_with_role(UserRole::Admin)")]
pub async fn admin_list_users(
    req: HttpRequest,
    state: web::Data<AppState>,
    query: web::Query<ListUsersQuery>,
) -> Result<HttpResponse, AppError> {
    let key = KIND.http_list_key(&req.uri().to_string());
    if let Some(cached) = state.cache.get::<ListUsersResponse>(&key).await {
        return Ok(HttpResponse::Ok().json(cached));
    }

    let query = query.into_inner();
    let name = query.name.as_deref().filter(|n| !n.trim().is_empty());
    let response = state
        .users
        .list_users(name, PageRequest::new(query.page, query.limit))
        .await?;

    state.cache.set_with_expiration(&key, &response, KIND.ttl()).await;
    Ok(HttpResponse::Ok().json(response))
}

#[delete("", wrap = "AuthMiddleware::required_with_role(UserRole::Admin)")]
pub async fn admin_delete_user(
    state: web::Data<AppState>,
    admin: AuthenticatedUser,
    payload: web::Json<DeleteUserRequest>,
) -> Result<HttpResponse, AppError> {
    state.users.delete_user(payload.id).await?;
    state.cache.remove_pattern(KIND.pattern()).await;

    info!("🗑️ 관리자 {}가 사용자 {} 삭제", admin.email, payload.id);
    Ok(HttpResponse::Ok().json(MessageResponse::new("사용자가 삭제되었습니다")))
}

// ===== /auth-doctor =====

#[post("/login")]
pub async fn doctor_login(
    state: web::Data<AppState>,
    payload: web::Json<LoginRequest>,
) -> Result<HttpResponse, AppError> {
    login_as(&state, payload.into_inner(), UserRole::Doctor).await
}

#[post("/register")]
pub async fn doctor_register(
    state: web::Data<AppState>,
    payload: web::Json<RegisterRequest>,
) -> Result<HttpResponse, AppError> {
    register_as(&state, payload.into_inner(), UserRole::Doctor).await
}

#[put("/update-user", wrap = "AuthMiddleware::required()")]
pub async fn doctor_update_user(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
    payload: web::Json<UpdateUserRequest>,
) -> Result<HttpResponse, AppError> {
    update_self(&state, &user, payload.into_inner()).await
}

// ===== /auth-patient =====

#[post("/login")]
pub async fn patient_login(
    state: web::Data<AppState>,
    payload: web::Json<LoginRequest>,
) -> Result<HttpResponse, AppError> {
    login_as(&state, payload.into_inner(), UserRole::Client).await
}

#[post("/register")]
pub async fn patient_register(
    state: web::Data<AppState>,
    payload: web::Json<RegisterRequest>,
) -> Result<HttpResponse, AppError> {
    register_as(&state, payload.into_inner(), UserRole::Client).await
}

#[put("/update-user", wrap = "AuthMiddleware::required()")]
pub async fn patient_update_user(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
    payload: web::Json<UpdateUserRequest>,
) -> Result<HttpResponse, AppError> {
    update_self(&state, &user, payload.into_inner()).await
}
