//! # Authentication HTTP Handlers
//!
//! `/auth` 스코프의 핸들러입니다.
//!
//! ## OAuth 흐름
//!
//! ```text
//! GET /auth/{provider}/login      → { auth_url, state }
//! (사용자가 프로바이더에서 동의)
//! GET /auth/{provider}/callback   → code 교환 → 프로필 조회 → find-or-create → 토큰 쌍
//! ```
//!
//! 콜백의 `state`는 필수이며 서명과 만료(10분)를 검증합니다.
//!
//! ## 계정 인증 코드
//!
//! 이메일/전화번호 인증 코드 확인과 재발송은 액세스 토큰이 필요하며,
//! 성공하면 `*user*` 캐시를 무효화합니다.

use actix_web::{get, post, put, web, HttpResponse};
use log::{info, warn};
use validator::Validate;

use crate::caching::keys::ResourceKind;
use crate::core::errors::AppError;
use crate::core::state::AppState;
use crate::domain::dto::users::{
    MessageResponse, OAuthCallbackQuery, ResendVerifyEmailRequest,
    ResendVerifyPhoneNumberRequest, UserResponse, VerifyEmailRequest, VerifyPhoneNumberRequest,
};
use crate::domain::models::auth::AuthenticatedUser;
use crate::middlewares::AuthMiddleware;
use crate::services::auth::OAuthClient;

const KIND: ResourceKind = ResourceKind::User;

#[get("/google/login")]
pub async fn google_login(state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
    let response = state.google.login_url()?;
    Ok(HttpResponse::Ok().json(response))
}

#[get("/google/callback")]
pub async fn google_callback(
    state: web::Data<AppState>,
    query: web::Query<OAuthCallbackQuery>,
) -> Result<HttpResponse, AppError> {
    oauth_callback(&state, state.google.as_ref(), query.into_inner()).await
}

#[get("/facebook/login")]
pub async fn facebook_login(state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
    let response = state.facebook.login_url()?;
    Ok(HttpResponse::Ok().json(response))
}

#[get("/facebook/callback")]
pub async fn facebook_callback(
    state: web::Data<AppState>,
    query: web::Query<OAuthCallbackQuery>,
) -> Result<HttpResponse, AppError> {
    oauth_callback(&state, state.facebook.as_ref(), query.into_inner()).await
}

/// 프로바이더 공통 콜백 처리
async fn oauth_callback(
    state: &AppState,
    client: &dyn OAuthClient,
    query: OAuthCallbackQuery,
) -> Result<HttpResponse, AppError> {
    let provider = client.provider();

    if let Some(error) = query.error {
        warn!(
            "🚫 {} OAuth 거부: {} ({})",
            provider.as_str(),
            error,
            query.error_description.as_deref().unwrap_or("-")
        );
        return Err(AppError::AuthenticationError(format!(
            "OAuth 인증이 거부되었습니다: {}",
            error
        )));
    }

    let code = query
        .code
        .filter(|c| !c.trim().is_empty())
        .ok_or_else(|| AppError::ValidationError("인가 코드(code)가 필요합니다".to_string()))?;

    let oauth_state = query
        .state
        .as_deref()
        .filter(|s| !s.is_empty())
        .ok_or_else(|| AppError::AuthenticationError("OAuth state가 필요합니다".to_string()))?;
    client.verify_state(oauth_state)?;

    let profile = client.fetch_profile(&code).await?;
    let response = state.users.find_or_create_oauth_user(profile).await?;
    state.cache.remove_pattern(KIND.pattern()).await;

    info!("🔐 {} 로그인 성공: {}", provider.as_str(), response.user.email);
    Ok(HttpResponse::Ok().json(response))
}

/// 현재 사용자 정보 (`user_<id>` 키로 캐시)
#[get("/me", wrap = "AuthMiddleware::required()")]
pub async fn me(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    let key = KIND.entity_key(&user.user_id.to_string());
    if let Some(cached) = state.cache.get::<UserResponse>(&key).await {
        return Ok(HttpResponse::Ok().json(cached));
    }

    let response = state.users.get_user_by_id(user.user_id).await?;
    state.cache.set_with_expiration(&key, &response, KIND.ttl()).await;

    Ok(HttpResponse::Ok().json(response))
}

/// 리프레시 토큰(Authorization 헤더)으로 새 액세스 토큰 발급
#[post("/refresh-token", wrap = "AuthMiddleware::refresh()")]
pub async fn refresh_token(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    let response = state.users.refresh_access_token(user.user_id).await?;
    Ok(HttpResponse::Ok().json(response))
}

#[put("/verify-code-email", wrap = "AuthMiddleware::required()")]
pub async fn verify_code_email(
    state: web::Data<AppState>,
    payload: web::Json<VerifyEmailRequest>,
) -> Result<HttpResponse, AppError> {
    payload.validate()?;

    let user = state
        .users
        .verify_email(&payload.email, &payload.verify_code_email)
        .await?;
    state.cache.remove_pattern(KIND.pattern()).await;

    Ok(HttpResponse::Ok().json(user))
}

#[put("/verify-code-phone-number", wrap = "AuthMiddleware::required()")]
pub async fn verify_code_phone_number(
    state: web::Data<AppState>,
    payload: web::Json<VerifyPhoneNumberRequest>,
) -> Result<HttpResponse, AppError> {
    payload.validate()?;

    let user = state
        .users
        .verify_phone_number(&payload.phone_number, &payload.verify_code_phone_number)
        .await?;
    state.cache.remove_pattern(KIND.pattern()).await;

    Ok(HttpResponse::Ok().json(user))
}

#[put("/resend-verify-code-email", wrap = "AuthMiddleware::required()")]
pub async fn resend_verify_code_email(
    state: web::Data<AppState>,
    payload: web::Json<ResendVerifyEmailRequest>,
) -> Result<HttpResponse, AppError> {
    payload.validate()?;

    state.users.resend_verify_email(&payload.email).await?;
    state.cache.remove_pattern(KIND.pattern()).await;

    Ok(HttpResponse::Ok().json(MessageResponse::new("인증 코드를 이메일로 다시 보냈습니다")))
}

#[put("/resend-verify-code-phone-number", wrap = "AuthMiddleware::required()")]
pub async fn resend_verify_code_phone_number(
    state: web::Data<AppState>,
    payload: web::Json<ResendVerifyPhoneNumberRequest>,
) -> Result<HttpResponse, AppError> {
    payload.validate()?;

    state
        .users
        .resend_verify_phone_number(&payload.phone_number)
        .await?;
    state.cache.remove_pattern(KIND.pattern()).await;

    Ok(HttpResponse::Ok().json(MessageResponse::new("인증 코드를 SMS로 다시 보냈습니다")))
}
