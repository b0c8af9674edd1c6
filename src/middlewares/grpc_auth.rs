//! gRPC 인증 레이어
//!
//! tonic 서버 앞단의 tower 레이어입니다. HTTP/2 요청 경로(`/패키지.서비스/메서드`)를
//! 허용 목록과 정확히 비교하고, 목록에 없으면 `authorization` 메타데이터의
//! 액세스 토큰을 검증합니다. 성공 시 [`AuthenticatedUser`]를 요청 extensions에 넣으며
//! tonic 핸들러는 `request.extensions()`로 꺼냅니다.
//!
//! ```rust,ignore
//! Server::builder()
//!     .layer(GrpcAuthLayer::new(tokens, config.grpc_public_methods.clone()))
//!     .add_service(UserServiceServer::new(user_grpc))
//! ```

use std::collections::HashSet;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};

use http::{HeaderValue, Request, Response};
use log::{debug, warn};
use tower::{Layer, Service};

use crate::core::errors::AppError;
use crate::domain::models::auth::AuthenticatedUser;
use crate::domain::models::token::TokenKind;
use crate::services::auth::TokenService;

/// gRPC UNAUTHENTICATED 상태 코드
const GRPC_STATUS_UNAUTHENTICATED: &str = "16";

#[derive(Clone)]
pub struct GrpcAuthLayer {
    tokens: Arc<TokenService>,
    public_methods: Arc<HashSet<String>>,
}

impl GrpcAuthLayer {
    pub fn new(tokens: Arc<TokenService>, public_methods: Vec<String>) -> Self {
        Self {
            tokens,
            public_methods: Arc::new(public_methods.into_iter().collect()),
        }
    }
}

impl<S> Layer<S> for GrpcAuthLayer {
    type Service = GrpcAuthService<S>;

    fn layer(&self, inner: S) -> Self::Service {
        GrpcAuthService {
            inner,
            tokens: self.tokens.clone(),
            public_methods: self.public_methods.clone(),
        }
    }
}

#[derive(Clone)]
pub struct GrpcAuthService<S> {
    inner: S,
    tokens: Arc<TokenService>,
    public_methods: Arc<HashSet<String>>,
}

impl<S> GrpcAuthService<S> {
    fn is_public(&self, path: &str) -> bool {
        self.public_methods.contains(path)
    }

    fn authenticate<T>(&self, req: &Request<T>) -> Result<AuthenticatedUser, AppError> {
        let header = req
            .headers()
            .get(http::header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| {
                AppError::AuthenticationError("authorization 메타데이터가 없습니다".to_string())
            })?;

        let token = TokenService::extract_bearer_token(header)?;
        let claims = self.tokens.verify_kind(token, TokenKind::Access)?;

        AuthenticatedUser::try_from(claims)
    }
}

impl<S, ReqBody, ResBody> Service<Request<ReqBody>> for GrpcAuthService<S>
where
    S: Service<Request<ReqBody>, Response = Response<ResBody>> + Clone + Send + 'static,
    S::Future: Send + 'static,
    ReqBody: Send + 'static,
    ResBody: Default + Send + 'static,
{
    type Response = S::Response;
    type Error = S::Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, mut req: Request<ReqBody>) -> Self::Future {
        let path = req.uri().path().to_string();

        if self.is_public(&path) {
            debug!("공개 gRPC 메서드: {}", path);
            let mut inner = self.inner.clone();
            return Box::pin(async move { inner.call(req).await });
        }

        match self.authenticate(&req) {
            Ok(user) => {
                debug!("gRPC 인증 성공: {} (사용자 {})", path, user.user_id);
                req.extensions_mut().insert(user);
                let mut inner = self.inner.clone();
                Box::pin(async move { inner.call(req).await })
            }
            Err(err) => {
                warn!("🔒 gRPC 인증 실패: {} - {}", path, err);
                Box::pin(async move { Ok(unauthenticated_response(&err)) })
            }
        }
    }
}

/// Trailers-only 형태의 UNAUTHENTICATED 응답
fn unauthenticated_response<B: Default>(err: &AppError) -> Response<B> {
    let mut response = Response::new(B::default());
    let headers = response.headers_mut();
    headers.insert(
        http::header::CONTENT_TYPE,
        HeaderValue::from_static("application/grpc"),
    );
    headers.insert("grpc-status", HeaderValue::from_static(GRPC_STATUS_UNAUTHENTICATED));

    let message = urlencoding::encode(&err.public_message()).into_owned();
    if let Ok(value) = HeaderValue::from_str(&message) {
        headers.insert("grpc-message", value);
    }

    response
}

#[cfg(test)]
mod tests {
    use std::convert::Infallible;

    use tower::ServiceExt;

    use super::*;
    use crate::config::DEFAULT_GRPC_PUBLIC_METHODS;
    use crate::domain::entities::{User, UserRole};

    fn tokens() -> Arc<TokenService> {
        Arc::new(TokenService::with_ttls(
            "test-secret",
            chrono::Duration::hours(1),
            chrono::Duration::days(7),
        ))
    }

    fn layer(tokens: Arc<TokenService>) -> GrpcAuthLayer {
        GrpcAuthLayer::new(
            tokens,
            DEFAULT_GRPC_PUBLIC_METHODS.iter().map(|m| m.to_string()).collect(),
        )
    }

    /// 인증된 사용자가 있으면 이메일을, 없으면 "anonymous"를 본문으로 돌려줍니다
    #[derive(Clone)]
    struct Echo;

    impl Service<Request<String>> for Echo {
        type Response = Response<String>;
        type Error = Infallible;
        type Future = std::future::Ready<Result<Self::Response, Self::Error>>;

        fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
            Poll::Ready(Ok(()))
        }

        fn call(&mut self, req: Request<String>) -> Self::Future {
            let who = req
                .extensions()
                .get::<AuthenticatedUser>()
                .map(|u| u.email.clone())
                .unwrap_or_else(|| "anonymous".to_string());
            std::future::ready(Ok(Response::new(who)))
        }
    }

    fn request(path: &str, token: Option<&str>) -> Request<String> {
        let mut builder = Request::builder().uri(format!("http://localhost{}", path));
        if let Some(token) = token {
            builder = builder.header("authorization", format!("Bearer {}", token));
        }
        builder.body(String::new()).unwrap()
    }

    fn user() -> User {
        User::new_local(
            "kim@example.com".to_string(),
            "hash".to_string(),
            UserRole::Client,
            "Kim".to_string(),
            String::new(),
        )
    }

    #[tokio::test]
    async fn test_public_method_passes_without_token() {
        let svc = layer(tokens()).layer(Echo);
        let resp = svc
            .oneshot(request("/user.UserService/Login", None))
            .await
            .unwrap();

        assert_eq!(resp.body(), "anonymous");
        assert!(resp.headers().get("grpc-status").is_none());
    }

    #[tokio::test]
    async fn test_protected_method_without_token_is_unauthenticated() {
        let svc = layer(tokens()).layer(Echo);
        let resp = svc
            .oneshot(request("/address.AddressService/CreateAddress", None))
            .await
            .unwrap();

        assert_eq!(resp.headers().get("grpc-status").unwrap(), "16");
        assert_eq!(
            resp.headers().get("content-type").unwrap(),
            "application/grpc"
        );
        assert!(resp.body().is_empty());
    }

    #[tokio::test]
    async fn test_access_token_injects_user() {
        let tokens = tokens();
        let token = tokens.generate_access_token(&user()).unwrap();
        let svc = layer(tokens).layer(Echo);

        let resp = svc
            .oneshot(request("/user.UserService/GetMe", Some(&token)))
            .await
            .unwrap();

        assert_eq!(resp.body(), "kim@example.com");
    }

    #[tokio::test]
    async fn test_refresh_token_is_rejected_on_protected_method() {
        let tokens = tokens();
        let token = tokens.generate_refresh_token(&user()).unwrap();
        let svc = layer(tokens).layer(Echo);

        let resp = svc
            .oneshot(request("/user.UserService/GetMe", Some(&token)))
            .await
            .unwrap();

        assert_eq!(resp.headers().get("grpc-status").unwrap(), "16");
    }

    #[tokio::test]
    async fn test_allow_list_is_exact_match() {
        let svc = layer(tokens()).layer(Echo);
        let resp = svc
            .oneshot(request("/user.UserService/LoginAdmin", None))
            .await
            .unwrap();

        assert_eq!(resp.headers().get("grpc-status").unwrap(), "16");
    }
}
