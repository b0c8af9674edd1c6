pub mod oauth_response;
pub mod user_response;

pub use oauth_response::*;
pub use user_response::*;
