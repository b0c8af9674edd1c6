//! 영속 도메인 엔티티

pub mod address;
pub mod doctor;
pub mod users;

pub use address::Address;
pub use doctor::Doctor;
pub use users::user::{User, UserRole};
