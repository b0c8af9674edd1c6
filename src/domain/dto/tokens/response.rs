use serde::{Deserialize, Serialize};

/// `POST /auth/refresh-token` 응답
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccessTokenResponse {
    pub access_token: String,
    pub token_type: String,
    pub expires_in: i64,
}
