//! 알림 발송 (이메일, SMS)
//!
//! 인증 코드 발송에 사용합니다. 자격 증명이 비어 있으면 실제 발송 대신
//! 내용을 로그로 남깁니다(개발 환경).

pub mod email;
pub mod sms;

use async_trait::async_trait;

use crate::config::NotificationSettings;
use crate::core::errors::AppError;

pub use email::SendGridEmailSender;
pub use sms::TwilioSmsSender;

pub const VERIFY_EMAIL_SUBJECT: &str = "Your Email Verification Code";

pub fn verification_message(code: i32) -> String {
    format!("Your verification code is {}", code)
}

pub fn verification_html(code: i32) -> String {
    format!("<strong>Your verification code is {}</strong>", code)
}

#[async_trait]
pub trait Notifier: Send + Sync {
    async fn send_email(
        &self,
        to_name: &str,
        to_email: &str,
        subject: &str,
        text: &str,
        html: &str,
    ) -> Result<(), AppError>;

    async fn send_sms(&self, to: &str, body: &str) -> Result<(), AppError>;
}

/// SendGrid + Twilio 조합
pub struct ExternalNotifier {
    email: SendGridEmailSender,
    sms: TwilioSmsSender,
}

impl ExternalNotifier {
    pub fn new(settings: &NotificationSettings) -> Self {
        let http = reqwest::Client::new();
        Self {
            email: SendGridEmailSender::new(settings, http.clone()),
            sms: TwilioSmsSender::new(settings, http),
        }
    }
}

#[async_trait]
impl Notifier for ExternalNotifier {
    async fn send_email(
        &self,
        to_name: &str,
        to_email: &str,
        subject: &str,
        text: &str,
        html: &str,
    ) -> Result<(), AppError> {
        self.email.send(to_name, to_email, subject, text, html).await
    }

    async fn send_sms(&self, to: &str, body: &str) -> Result<(), AppError> {
        self.sms.send(to, body).await
    }
}
