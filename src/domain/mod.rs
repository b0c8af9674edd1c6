//! # Domain Layer Module
//!
//! 도메인 계층은 세 리소스(사용자, 주소, 의사)의 엔티티와
//! 전송 계층 경계에서 쓰이는 DTO, 인증/OAuth 모델을 정의합니다.
//!
//! ## 아키텍처 개요
//!
//! ```text
//! Domain Layer (이 모듈)
//! ├── Entities      - 영속 객체 (User, Address, Doctor)
//! ├── DTOs          - HTTP 요청/응답 계약과 페이지네이션
//! └── Models        - 토큰 클레임, 인증 컨텍스트, OAuth 프로필
//!      │
//!      ▼
//! Application Layer (Services)
//!      │
//!      ▼
//! Infrastructure Layer (Repositories, Postgres, Redis)
//! ```
//!
//! ## 변환 규칙
//!
//! 엔티티, DTO, gRPC 메시지 사이의 변환은 타입 쌍마다 명시적인 `From` 구현으로
//! 처리합니다. 직렬화 후 역직렬화하는 방식의 복사는 사용하지 않습니다.
//!
//! ```rust,ignore
//! let address = Address::new(id_user, req.name, req.city, req.street, req.lat, req.long);
//! let response = AddressResponse::from(address);
//! ```
//!
//! ## 생성 규칙
//!
//! ID 생성과 타임스탬프는 엔티티 생성자(`User::new_local`, `User::new_oauth`,
//! `Address::new`, `Doctor::new`)에서만 이루어집니다.

pub mod dto;
pub mod entities;
pub mod models;

pub use dto::*;
pub use entities::*;
pub use models::*;
