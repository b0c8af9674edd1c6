pub mod auth_request;
pub mod create_user;
pub mod verify_request;

pub use auth_request::*;
pub use create_user::*;
pub use verify_request::*;
