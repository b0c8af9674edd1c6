//! 인증 서비스
//!
//! - [`token_service`] - JWT 발급/검증
//! - [`oauth_state`] - OAuth state 서명
//! - [`oauth_client`] - 프로바이더 공통 계약
//! - [`google_auth_service`], [`facebook_auth_service`] - 프로바이더별 구현

pub mod facebook_auth_service;
pub mod google_auth_service;
pub mod oauth_client;
pub mod oauth_state;
pub mod token_service;

pub use facebook_auth_service::*;
pub use google_auth_service::*;
pub use oauth_client::OAuthClient;
pub use oauth_state::*;
pub use token_service::*;
