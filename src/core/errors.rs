//! # Application Error Handling System
//!
//! HTTP와 gRPC 두 전송 계층이 공유하는 통합 에러 타입입니다.
//!
//! ## 전파 정책
//!
//! - 입력 검증 실패는 핸들러에서 서비스 호출 전에 `ValidationError`로 반환합니다.
//! - 저장소/캐시/외부 API 실패는 발생 지점의 컨텍스트와 함께 로그로 남기고,
//!   호출자에게는 내부 정보를 숨긴 일반 메시지만 전달합니다.
//!
//! ## 응답 매핑
//!
//! | AppError | HTTP Status | gRPC Code |
//! |----------|-------------|-----------|
//! | `ValidationError` | 400 Bad Request | `INVALID_ARGUMENT` |
//! | `NotFound` | 404 Not Found | `NOT_FOUND` |
//! | `ConflictError` | 409 Conflict | `ALREADY_EXISTS` |
//! | `AuthenticationError` | 401 Unauthorized | `UNAUTHENTICATED` |
//! | `AuthorizationError` | 403 Forbidden | `PERMISSION_DENIED` |
//! | `DatabaseError` | 500 Internal Server Error | `INTERNAL` |
//! | `ExternalServiceError` | 500 Internal Server Error | `INTERNAL` |
//! | `InternalError` | 500 Internal Server Error | `INTERNAL` |

use thiserror::Error;

/// 내부 오류 시 호출자에게 노출되는 유일한 메시지
pub const GENERIC_ERROR_MESSAGE: &str = "Something went wrong";

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Conflict error: {0}")]
    ConflictError(String),

    #[error("Authentication error: {0}")]
    AuthenticationError(String),

    #[error("Authorization error: {0}")]
    AuthorizationError(String),

    #[error("External service error: {0}")]
    ExternalServiceError(String),

    #[error("Internal server error: {0}")]
    InternalError(String),
}

impl AppError {
    /// 내부 구현 세부사항을 담고 있어 외부로 노출하면 안 되는 에러인지 여부
    pub fn is_internal(&self) -> bool {
        matches!(
            self,
            AppError::DatabaseError(_)
                | AppError::ExternalServiceError(_)
                | AppError::InternalError(_)
        )
    }

    /// 호출자에게 전달할 메시지
    pub fn public_message(&self) -> String {
        if self.is_internal() {
            GENERIC_ERROR_MESSAGE.to_string()
        } else {
            self.to_string()
        }
    }
}

impl actix_web::ResponseError for AppError {
    fn status_code(&self) -> actix_web::http::StatusCode {
        use actix_web::http::StatusCode;

        match self {
            AppError::ValidationError(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::ConflictError(_) => StatusCode::CONFLICT,
            AppError::AuthenticationError(_) => StatusCode::UNAUTHORIZED,
            AppError::AuthorizationError(_) => StatusCode::FORBIDDEN,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> actix_web::HttpResponse {
        if self.is_internal() {
            log::error!("❌ 요청 처리 실패: {}", self);
        }

        actix_web::HttpResponse::build(self.status_code()).json(serde_json::json!({
            "error": self.public_message()
        }))
    }
}

impl From<AppError> for tonic::Status {
    fn from(error: AppError) -> Self {
        if error.is_internal() {
            log::error!("❌ gRPC 요청 처리 실패: {}", error);
        }

        let message = error.public_message();
        match error {
            AppError::ValidationError(_) => tonic::Status::invalid_argument(message),
            AppError::NotFound(_) => tonic::Status::not_found(message),
            AppError::ConflictError(_) => tonic::Status::already_exists(message),
            AppError::AuthenticationError(_) => tonic::Status::unauthenticated(message),
            AppError::AuthorizationError(_) => tonic::Status::permission_denied(message),
            _ => tonic::Status::internal(message),
        }
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(errors: validator::ValidationErrors) -> Self {
        AppError::ValidationError(errors.to_string())
    }
}

pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::ResponseError;
    use actix_web::body::MessageBody;

    #[test]
    fn test_validation_error_response() {
        let error = AppError::ValidationError("Email is required".to_string());
        let response = error.error_response();

        assert_eq!(response.status(), actix_web::http::StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_not_found_error_response() {
        let error = AppError::NotFound("Address not found".to_string());
        let response = error.error_response();

        assert_eq!(response.status(), actix_web::http::StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_authentication_error_response() {
        let error = AppError::AuthenticationError("Invalid token".to_string());
        let response = error.error_response();

        assert_eq!(response.status(), actix_web::http::StatusCode::UNAUTHORIZED);
    }

    #[test]
    fn test_authorization_error_response() {
        let error = AppError::AuthorizationError("Insufficient permissions".to_string());
        let response = error.error_response();

        assert_eq!(response.status(), actix_web::http::StatusCode::FORBIDDEN);
    }

    #[test]
    fn test_internal_error_hides_detail() {
        let error = AppError::DatabaseError("relation \"users\" does not exist".to_string());
        let response = error.error_response();

        assert_eq!(
            response.status(),
            actix_web::http::StatusCode::INTERNAL_SERVER_ERROR
        );

        let body = response.into_body().try_into_bytes().ok().expect("json body");
        let body = String::from_utf8(body.to_vec()).unwrap();
        assert!(body.contains(GENERIC_ERROR_MESSAGE));
        assert!(!body.contains("relation"));
    }

    #[test]
    fn test_grpc_status_mapping() {
        let status: tonic::Status = AppError::NotFound("x".to_string()).into();
        assert_eq!(status.code(), tonic::Code::NotFound);

        let status: tonic::Status = AppError::AuthenticationError("x".to_string()).into();
        assert_eq!(status.code(), tonic::Code::Unauthenticated);

        let status: tonic::Status = AppError::ConflictError("x".to_string()).into();
        assert_eq!(status.code(), tonic::Code::AlreadyExists);

        let status: tonic::Status = AppError::ExternalServiceError("sendgrid 500".to_string()).into();
        assert_eq!(status.code(), tonic::Code::Internal);
        assert_eq!(status.message(), GENERIC_ERROR_MESSAGE);
    }
}
