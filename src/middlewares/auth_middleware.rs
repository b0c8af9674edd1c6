//! JWT 인증 미들웨어
//!
//! ActixWeb 요청 파이프라인에서 JWT 토큰을 검증하고 사용자 정보를 추출합니다.
//! 검증에 쓰는 [`TokenService`](crate::services::auth::TokenService)는
//! `web::Data<AppState>`에서 꺼냅니다.

use std::future::{ready, Ready};
use std::rc::Rc;

use actix_web::{
    body::EitherBody,
    dev::{Service, ServiceRequest, ServiceResponse, Transform},
    Error, Result,
};

use crate::domain::entities::UserRole;
use crate::domain::models::auth::RequiredRole;
use crate::domain::models::token::TokenKind;
use crate::middlewares::auth_inner::AuthMiddlewareService;

/// JWT 인증 미들웨어
///
/// 토큰이 없거나 검증에 실패하면 401, 역할이 맞지 않으면 403을 반환하며
/// 어느 경우에도 감싼 핸들러는 실행되지 않습니다.
pub struct AuthMiddleware {
    /// 요구하는 토큰 종류 (기본: access)
    kind: TokenKind,
    /// 접근에 필요한 역할 (선택사항)
    required_role: Option<RequiredRole>,
}

impl AuthMiddleware {
    pub fn new(kind: TokenKind) -> Self {
        Self {
            kind,
            required_role: None,
        }
    }

    pub fn new_with_role(kind: TokenKind, required_role: RequiredRole) -> Self {
        Self {
            kind,
            required_role: Some(required_role),
        }
    }

    /// 액세스 토큰 필수
    pub fn required() -> Self {
        Self::new(TokenKind::Access)
    }

    /// 리프레시 토큰 필수 (`/auth/refresh-token` 전용)
    pub fn refresh() -> Self {
        Self::new(TokenKind::Refresh)
    }

    /// 특정 역할 요구
    pub fn required_with_role(role: UserRole) -> Self {
        Self::new_with_role(TokenKind::Access, RequiredRole(role))
    }
}

/// ActixWeb Transform trait 구현
impl<S, B> Transform<S, ServiceRequest> for AuthMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Transform = AuthMiddlewareService<S>;
    type InitError = ();
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(AuthMiddlewareService {
            service: Rc::new(service),
            kind: self.kind,
            required_role: self.required_role.clone(),
        }))
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    use actix_web::{http::StatusCode, test, web, App, HttpResponse};

    use super::*;
    use crate::core::state::testing::test_state;
    use crate::domain::entities::User;
    use crate::domain::models::auth::AuthenticatedUser;
    use crate::services::auth::TokenService;

    async fn whoami(user: AuthenticatedUser, hits: web::Data<Arc<AtomicUsize>>) -> HttpResponse {
        hits.fetch_add(1, Ordering::SeqCst);
        HttpResponse::Ok().body(user.role.to_string())
    }

    fn user(role: UserRole) -> User {
        User::new_local(
            "kim@example.com".to_string(),
            "hash".to_string(),
            role,
            "Kim".to_string(),
            String::new(),
        )
    }

    macro_rules! app {
        ($state:expr, $hits:expr, $mw:expr) => {
            test::init_service(
                App::new()
                    .app_data(web::Data::new($state.clone()))
                    .app_data(web::Data::new($hits.clone()))
                    .service(web::resource("/protected").wrap($mw).route(web::get().to(whoami))),
            )
            .await
        };
    }

    #[actix_web::test]
    async fn test_missing_token_is_rejected_without_calling_handler() {
        let state = test_state();
        let hits = Arc::new(AtomicUsize::new(0));
        let app = app!(state, hits, AuthMiddleware::required());

        let req = test::TestRequest::get().uri("/protected").to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(hits.load(Ordering::SeqCst), 0);
    }

    #[actix_web::test]
    async fn test_access_token_is_accepted() {
        let state = test_state();
        let hits = Arc::new(AtomicUsize::new(0));
        let app = app!(state, hits, AuthMiddleware::required());
        let token = state.tokens.generate_access_token(&user(UserRole::Doctor)).unwrap();

        let req = test::TestRequest::get()
            .uri("/protected")
            .insert_header(("Authorization", format!("Bearer {}", token)))
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(test::read_body(resp).await, "doctor");
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }

    #[actix_web::test]
    async fn test_refresh_token_rejected_where_access_required() {
        let state = test_state();
        let hits = Arc::new(AtomicUsize::new(0));
        let app = app!(state, hits, AuthMiddleware::required());
        let token = state.tokens.generate_refresh_token(&user(UserRole::Client)).unwrap();

        let req = test::TestRequest::get()
            .uri("/protected")
            .insert_header(("Authorization", format!("Bearer {}", token)))
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(hits.load(Ordering::SeqCst), 0);
    }

    #[actix_web::test]
    async fn test_expired_token_is_rejected() {
        let state = test_state();
        let hits = Arc::new(AtomicUsize::new(0));
        let app = app!(state, hits, AuthMiddleware::required());

        let expired_issuer = TokenService::with_ttls(
            &state.config.jwt.secret,
            chrono::Duration::seconds(-10),
            chrono::Duration::days(7),
        );
        let token = expired_issuer
            .generate_access_token(&user(UserRole::Client))
            .unwrap();

        let req = test::TestRequest::get()
            .uri("/protected")
            .insert_header(("Authorization", format!("Bearer {}", token)))
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    }

    #[actix_web::test]
    async fn test_role_mismatch_is_forbidden() {
        let state = test_state();
        let hits = Arc::new(AtomicUsize::new(0));
        let app = app!(state, hits, AuthMiddleware::required_with_role(UserRole::Admin));
        let token = state.tokens.generate_access_token(&user(UserRole::Client)).unwrap();

        let req = test::TestRequest::get()
            .uri("/protected")
            .insert_header(("Authorization", format!("Bearer {}", token)))
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::FORBIDDEN);
        assert_eq!(hits.load(Ordering::SeqCst), 0);
    }

    #[actix_web::test]
    async fn test_refresh_mode_accepts_refresh_token_only() {
        let state = test_state();
        let hits = Arc::new(AtomicUsize::new(0));
        let app = app!(state, hits, AuthMiddleware::refresh());
        let u = user(UserRole::Client);

        let access = state.tokens.generate_access_token(&u).unwrap();
        let req = test::TestRequest::get()
            .uri("/protected")
            .insert_header(("Authorization", format!("Bearer {}", access)))
            .to_request();
        assert_eq!(
            test::call_service(&app, req).await.status(),
            StatusCode::UNAUTHORIZED
        );

        let refresh = state.tokens.generate_refresh_token(&u).unwrap();
        let req = test::TestRequest::get()
            .uri("/protected")
            .insert_header(("Authorization", format!("Bearer {}", refresh)))
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);
    }
}
