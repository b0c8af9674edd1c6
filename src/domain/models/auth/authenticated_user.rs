//! 인증된 사용자 컨텍스트
//!
//! 미들웨어가 토큰을 검증한 뒤 요청 extensions에 넣고, 핸들러는 추출자로 꺼내 씁니다.
//! gRPC에서도 같은 타입을 `tonic::Request::extensions()`에 넣습니다.
//!
//! ```rust,ignore
//! #[get("/me")]
//! async fn get_me(user: AuthenticatedUser) -> Result<HttpResponse, AppError> {
//!     Ok(HttpResponse::Ok().json(user.user_id))
//! }
//! ```

use std::future::{Ready, ready};

use actix_web::{FromRequest, HttpMessage, HttpRequest};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::core::errors::AppError;
use crate::domain::entities::UserRole;
use crate::domain::models::token::TokenClaims;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuthenticatedUser {
    pub user_id: Uuid,
    pub email: String,
    pub role: UserRole,
}

impl AuthenticatedUser {
    pub fn has_role(&self, role: UserRole) -> bool {
        self.role == role
    }

    pub fn has_any_role(&self, roles: &[UserRole]) -> bool {
        roles.contains(&self.role)
    }

    pub fn is_admin(&self) -> bool {
        self.has_role(UserRole::Admin)
    }
}

impl TryFrom<TokenClaims> for AuthenticatedUser {
    type Error = AppError;

    fn try_from(claims: TokenClaims) -> Result<Self, Self::Error> {
        let user_id = Uuid::parse_str(&claims.sub).map_err(|_| {
            AppError::AuthenticationError("토큰의 사용자 ID가 올바르지 않습니다".to_string())
        })?;

        Ok(Self {
            user_id,
            email: claims.email,
            role: claims.role,
        })
    }
}

impl FromRequest for AuthenticatedUser {
    type Error = AppError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut actix_web::dev::Payload) -> Self::Future {
        match req.extensions().get::<AuthenticatedUser>() {
            Some(user) => ready(Ok(user.clone())),
            None => ready(Err(AppError::AuthenticationError(
                "인증되지 않은 요청입니다".to_string(),
            ))),
        }
    }
}
