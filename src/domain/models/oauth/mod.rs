//! OAuth 프로바이더 응답 모델

pub mod facebook_user;
pub mod google_user;
pub mod profile;

pub use facebook_user::*;
pub use google_user::*;
pub use profile::*;
