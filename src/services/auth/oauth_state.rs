//! OAuth `state` 파라미터 서명
//!
//! 형식: `<발급 시각(Unix 초)>.<hex(sha256("<발급 시각>:<secret>"))>`
//!
//! 서버에 상태를 저장하지 않고 위조와 재사용 기간을 제한합니다.
//! 발급 후 10분이 지나면 거부됩니다.

use chrono::Utc;
use sha2::{Digest, Sha256};

use crate::core::errors::AppError;

pub const OAUTH_STATE_TTL_SECONDS: i64 = 10 * 60;

#[derive(Clone)]
pub struct OAuthStateSigner {
    secret: String,
}

impl OAuthStateSigner {
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
        }
    }

    pub fn issue(&self) -> String {
        self.issue_at(Utc::now().timestamp())
    }

    pub fn issue_at(&self, timestamp: i64) -> String {
        format!("{}.{}", timestamp, self.sign(timestamp))
    }

    pub fn verify(&self, state: &str) -> Result<(), AppError> {
        self.verify_at(state, Utc::now().timestamp())
    }

    pub fn verify_at(&self, state: &str, now: i64) -> Result<(), AppError> {
        let invalid = || AppError::AuthenticationError("유효하지 않은 OAuth state".to_string());

        let (timestamp, signature) = state.split_once('.').ok_or_else(invalid)?;
        let timestamp: i64 = timestamp.parse().map_err(|_| invalid())?;

        if self.sign(timestamp) != signature {
            return Err(invalid());
        }

        let age = now - timestamp;
        if !(0..=OAUTH_STATE_TTL_SECONDS).contains(&age) {
            return Err(AppError::AuthenticationError(
                "OAuth state가 만료되었습니다".to_string(),
            ));
        }

        Ok(())
    }

    fn sign(&self, timestamp: i64) -> String {
        let digest = Sha256::digest(format!("{}:{}", timestamp, self.secret).as_bytes());
        format!("{:x}", digest)
    }
}
