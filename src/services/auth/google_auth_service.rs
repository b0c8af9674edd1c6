use async_trait::async_trait;
use log::info;

use super::oauth_client::{OAuthClient, build_query, ensure_success};
use super::oauth_state::OAuthStateSigner;
use crate::config::{AuthProvider, OAuthClientSettings};
use crate::core::errors::AppError;
use crate::domain::dto::users::OAuthLoginUrlResponse;
use crate::domain::models::oauth::{GoogleTokenResponse, GoogleUserInfo, OAuthProfile};

/// Google OAuth 2.0 연동
///
/// 1. [`login_url`](OAuthClient::login_url) - 서명된 state를 포함한 동의 화면 URL
/// 2. 콜백에서 받은 code를 `token_uri`에 form POST로 교환
/// 3. 액세스 토큰으로 `oauth2/v2/userinfo` 조회
pub struct GoogleAuthService {
    settings: OAuthClientSettings,
    state_signer: OAuthStateSigner,
    http: reqwest::Client,
}

impl GoogleAuthService {
    pub fn new(settings: OAuthClientSettings, state_signer: OAuthStateSigner) -> Self {
        Self {
            settings,
            state_signer,
            http: reqwest::Client::new(),
        }
    }

    fn ensure_configured(&self) -> Result<(), AppError> {
        if self.settings.is_configured() {
            Ok(())
        } else {
            Err(AppError::InternalError(
                "Google OAuth 클라이언트가 설정되지 않았습니다".to_string(),
            ))
        }
    }

    async fn exchange_code_for_token(&self, code: &str) -> Result<GoogleTokenResponse, AppError> {
        let params = [
            ("code", code),
            ("client_id", self.settings.client_id.as_str()),
            ("client_secret", self.settings.client_secret.as_str()),
            ("redirect_uri", self.settings.redirect_url.as_str()),
            ("grant_type", "authorization_code"),
        ];

        let response = self
            .http
            .post(&self.settings.token_uri)
            .form(&params)
            .send()
            .await
            .map_err(|e| AppError::ExternalServiceError(format!("Google 토큰 요청 실패: {}", e)))?;

        ensure_success(response, "Google 토큰 교환")
            .await?
            .json::<GoogleTokenResponse>()
            .await
            .map_err(|e| {
                AppError::ExternalServiceError(format!("Google 토큰 응답 파싱 실패: {}", e))
            })
    }

    async fn get_user_info(&self, access_token: &str) -> Result<GoogleUserInfo, AppError> {
        let response = self
            .http
            .get(&self.settings.userinfo_uri)
            .bearer_auth(access_token)
            .send()
            .await
            .map_err(|e| {
                AppError::ExternalServiceError(format!("Google 사용자 정보 요청 실패: {}", e))
            })?;

        ensure_success(response, "Google 사용자 정보 조회")
            .await?
            .json::<GoogleUserInfo>()
            .await
            .map_err(|e| {
                AppError::ExternalServiceError(format!("Google 사용자 정보 파싱 실패: {}", e))
            })
    }
}

#[async_trait]
impl OAuthClient for GoogleAuthService {
    fn provider(&self) -> AuthProvider {
        AuthProvider::Google
    }

    fn login_url(&self) -> Result<OAuthLoginUrlResponse, AppError> {
        self.ensure_configured()?;

        let state = self.state_signer.issue();
        let scope = self.settings.scopes.join(" ");
        let query = build_query(&[
            ("client_id", self.settings.client_id.as_str()),
            ("redirect_uri", self.settings.redirect_url.as_str()),
            ("scope", scope.as_str()),
            ("response_type", "code"),
            ("access_type", "offline"),
            ("state", state.as_str()),
        ]);

        Ok(OAuthLoginUrlResponse {
            auth_url: format!("{}?{}", self.settings.auth_uri, query),
            state,
        })
    }

    fn verify_state(&self, state: &str) -> Result<(), AppError> {
        self.state_signer.verify(state)
    }

    async fn fetch_profile(&self, code: &str) -> Result<OAuthProfile, AppError> {
        self.ensure_configured()?;

        let token = self.exchange_code_for_token(code).await?;
        let user_info = self.get_user_info(&token.access_token).await?;
        info!("🔐 Google 프로필 조회 완료: {}", user_info.email);

        Ok(OAuthProfile::from(user_info))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_login_url_contains_client_and_state() {
        let settings = OAuthClientSettings::google(
            "google-client".to_string(),
            "google-secret".to_string(),
            "http://localhost:8080/auth/google/callback".to_string(),
        );
        let service = GoogleAuthService::new(settings, OAuthStateSigner::new("s"));

        let response = service.login_url().unwrap();
        assert!(response.auth_url.starts_with("https://accounts.google.com/o/oauth2/auth?"));
        assert!(response.auth_url.contains("client_id=google-client"));
        assert!(response
            .auth_url
            .contains("redirect_uri=http%3A%2F%2Flocalhost%3A8080%2Fauth%2Fgoogle%2Fcallback"));
        assert!(response.auth_url.contains(&format!("state={}", response.state)));
        assert!(service.verify_state(&response.state).is_ok());
    }

    #[test]
    fn test_unconfigured_client_is_rejected() {
        let settings = OAuthClientSettings::google(String::new(), String::new(), String::new());
        let service = GoogleAuthService::new(settings, OAuthStateSigner::new("s"));
        assert!(service.login_url().is_err());
    }
}
