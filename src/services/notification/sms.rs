use log::info;

use crate::config::NotificationSettings;
use crate::core::errors::AppError;

/// Twilio Messages API
pub struct TwilioSmsSender {
    account_sid: String,
    auth_token: String,
    from_number: String,
    http: reqwest::Client,
}

impl TwilioSmsSender {
    pub fn new(settings: &NotificationSettings, http: reqwest::Client) -> Self {
        Self {
            account_sid: settings.twilio_account_sid.clone(),
            auth_token: settings.twilio_auth_token.clone(),
            from_number: settings.twilio_phone_number.clone(),
            http,
        }
    }

    fn is_configured(&self) -> bool {
        !self.account_sid.is_empty() && !self.auth_token.is_empty() && !self.from_number.is_empty()
    }

    pub async fn send(&self, to: &str, body: &str) -> Result<(), AppError> {
        if !self.is_configured() {
            info!("📱 [Twilio 미설정] to={} body={}", to, body);
            return Ok(());
        }

        let url = format!(
            "https://api.twilio.com/2010-04-01/Accounts/{}/Messages.json",
            self.account_sid
        );

        let response = self
            .http
            .post(&url)
            .basic_auth(&self.account_sid, Some(&self.auth_token))
            .form(&[("To", to), ("From", self.from_number.as_str()), ("Body", body)])
            .send()
            .await
            .map_err(|e| AppError::ExternalServiceError(format!("Twilio 요청 실패: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            return Err(AppError::ExternalServiceError(format!(
                "Twilio 발송 실패 ({}): {}",
                status, text
            )));
        }

        info!("📱 SMS 발송 완료: {}", to);
        Ok(())
    }
}
