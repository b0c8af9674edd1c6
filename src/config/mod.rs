//! 설정 모듈
//!
//! 서버, 데이터 저장소, 인증, 알림 설정을 타입으로 표현합니다.

pub mod app_config;
pub mod auth_config;
pub mod data_config;

pub use app_config::*;
pub use auth_config::*;
pub use data_config::*;
