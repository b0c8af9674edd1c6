use async_trait::async_trait;
use log::info;

use super::oauth_client::{OAuthClient, build_query, ensure_success};
use super::oauth_state::OAuthStateSigner;
use crate::config::{AuthProvider, OAuthClientSettings};
use crate::core::errors::AppError;
use crate::domain::dto::users::OAuthLoginUrlResponse;
use crate::domain::models::oauth::{FacebookTokenResponse, FacebookUserInfo, OAuthProfile};

/// Facebook Login 연동 (Graph API v18.0)
pub struct FacebookAuthService {
    settings: OAuthClientSettings,
    state_signer: OAuthStateSigner,
    http: reqwest::Client,
}

impl FacebookAuthService {
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
                "Facebook OAuth 클라이언트가 설정되지 않았습니다".to_string(),
            ))
        }
    }

    async fn exchange_code_for_token(&self, code: &str) -> Result<FacebookTokenResponse, AppError> {
        let response = self
            .http
            .get(&self.settings.token_uri)
            .query(&[
                ("client_id", self.settings.client_id.as_str()),
                ("client_secret", self.settings.client_secret.as_str()),
                ("redirect_uri", self.settings.redirect_url.as_str()),
                ("code", code),
            ])
            .send()
            .await
            .map_err(|e| {
                AppError::ExternalServiceError(format!("Facebook 토큰 요청 실패: {}", e))
            })?;

        ensure_success(response, "Facebook 토큰 교환")
            .await?
            .json::<FacebookTokenResponse>()
            .await
            .map_err(|e| {
                AppError::ExternalServiceError(format!("Facebook 토큰 응답 파싱 실패: {}", e))
            })
    }

    async fn get_user_info(&self, access_token: &str) -> Result<FacebookUserInfo, AppError> {
        let response = self
            .http
            .get(&self.settings.userinfo_uri)
            .query(&[("fields", "id,name,email"), ("access_token", access_token)])
            .send()
            .await
            .map_err(|e| {
                AppError::ExternalServiceError(format!("Facebook 사용자 정보 요청 실패: {}", e))
            })?;

        ensure_success(response, "Facebook 사용자 정보 조회")
            .await?
            .json::<FacebookUserInfo>()
            .await
            .map_err(|e| {
                AppError::ExternalServiceError(format!("Facebook 사용자 정보 파싱 실패: {}", e))
            })
    }
}

#[async_trait]
impl OAuthClient for FacebookAuthService {
    fn provider(&self) -> AuthProvider {
        AuthProvider::Facebook
    }

    fn login_url(&self) -> Result<OAuthLoginUrlResponse, AppError> {
        self.ensure_configured()?;

        let state = self.state_signer.issue();
        let scope = self.settings.scopes.join(",");
        let query = build_query(&[
            ("client_id", self.settings.client_id.as_str()),
            ("redirect_uri", self.settings.redirect_url.as_str()),
            ("scope", scope.as_str()),
            ("response_type", "code"),
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
        info!("🔐 Facebook 프로필 조회 완료: id={}", user_info.id);

        Ok(OAuthProfile::from(user_info))
    }
}
