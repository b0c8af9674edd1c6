use log::info;
use serde_json::json;

use crate::config::NotificationSettings;
use crate::core::errors::AppError;

const SENDGRID_SEND_URL: &str = "https://api.sendgrid.com/v3/mail/send";

/// SendGrid v3 Mail Send API
pub struct SendGridEmailSender {
    api_key: String,
    from_email: String,
    from_name: String,
    http: reqwest::Client,
}

impl SendGridEmailSender {
    pub fn new(settings: &NotificationSettings, http: reqwest::Client) -> Self {
        Self {
            api_key: settings.sendgrid_api_key.clone(),
            from_email: settings.sendgrid_from_email.clone(),
            from_name: settings.sendgrid_from_name.clone(),
            http,
        }
    }

    pub async fn send(
        &self,
        to_name: &str,
        to_email: &str,
        subject: &str,
        text: &str,
        html: &str,
    ) -> Result<(), AppError> {
        if self.api_key.is_empty() {
            info!("📧 [SendGrid 미설정] to={} subject={} body={}", to_email, subject, text);
            return Ok(());
        }

        let payload = json!({
            "personalizations": [{
                "to": [{ "email": to_email, "name": to_name }]
            }],
            "from": { "email": self.from_email, "name": self.from_name },
            "subject": subject,
            "content": [
                { "type": "text/plain", "value": text },
                { "type": "text/html", "value": html }
            ]
        });

        let response = self
            .http
            .post(SENDGRID_SEND_URL)
            .bearer_auth(&self.api_key)
            .json(&payload)
            .send()
            .await
            .map_err(|e| AppError::ExternalServiceError(format!("SendGrid 요청 실패: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::ExternalServiceError(format!(
                "SendGrid 발송 실패 ({}): {}",
                status, body
            )));
        }

        info!("📧 이메일 발송 완료: {}", to_email);
        Ok(())
    }
}
