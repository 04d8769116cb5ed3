//! Notification service implementation
//!
//! Email dispatch behind a `Notifier` trait: an SMTP implementation for
//! deployments with mail configured, and a log-only implementation
//! otherwise. Callers treat delivery as fire-and-forget; failures are
//! logged and never abort the triggering operation.

use async_trait::async_trait;
use lettre::message::header::ContentType;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{Message, SmtpTransport, Transport};
use tracing::info;

use crate::config::EmailConfig;
use crate::models::user::User;
use crate::models::event::Event;
use crate::utils::errors::{EventHubError, Result};

/// A plain-text email ready for dispatch
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailMessage {
    pub to: String,
    pub subject: String,
    pub body: String,
}

/// Email delivery collaborator
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn send(&self, message: EmailMessage) -> Result<()>;
}

/// Build the account-activation email
pub fn activation_email(user: &User, token: &str, frontend_url: &str) -> EmailMessage {
    let activation_url = format!("{}/activate/{}/{}", frontend_url, user.id, token);

    EmailMessage {
        to: user.email.clone(),
        subject: "Activate Your Account".to_string(),
        body: format!(
            "Hi {},\n\nPlease activate your account using the link below:\n{}\n\nThank you!",
            user.username, activation_url
        ),
    }
}

/// Build the RSVP confirmation email
pub fn rsvp_confirmation_email(user: &User, event: &Event) -> EmailMessage {
    EmailMessage {
        to: user.email.clone(),
        subject: format!("RSVP Confirmation — {}", event.name),
        body: format!(
            "Hi {},\n\nYou successfully RSVP for {}.\nDate: {}\nTime: {}\nLocation: {}\nBest of Luck.",
            user.display_name(),
            event.name,
            event.date,
            event.time,
            event.location
        ),
    }
}

/// SMTP notifier backed by lettre
#[derive(Clone)]
pub struct SmtpNotifier {
    config: EmailConfig,
    credentials: Credentials,
}

impl SmtpNotifier {
    pub fn new(config: EmailConfig) -> Self {
        let credentials = Credentials::new(
            config.smtp_username.clone(),
            config.smtp_password.clone(),
        );

        Self { config, credentials }
    }

    fn build_transport(&self) -> Result<SmtpTransport> {
        let transport = SmtpTransport::relay(&self.config.smtp_host)
            .map_err(|e| EventHubError::Email(format!("SMTP relay error: {e}")))?
            .port(self.config.smtp_port)
            .credentials(self.credentials.clone())
            .build();

        Ok(transport)
    }

    fn from_header(&self) -> String {
        format!("{} <{}>", self.config.from_name, self.config.from_email)
    }
}

#[async_trait]
impl Notifier for SmtpNotifier {
    async fn send(&self, message: EmailMessage) -> Result<()> {
        let email = Message::builder()
            .from(
                self.from_header()
                    .parse()
                    .map_err(|e| EventHubError::Email(format!("Invalid from address: {e}")))?,
            )
            .to(message
                .to
                .parse()
                .map_err(|e| EventHubError::Email(format!("Invalid to address: {e}")))?)
            .subject(message.subject)
            .header(ContentType::TEXT_PLAIN)
            .body(message.body)
            .map_err(|e| EventHubError::Email(format!("Failed to build email: {e}")))?;

        let mailer = self.build_transport()?;

        // The SMTP transport is blocking; keep it off the async workers.
        tokio::task::spawn_blocking(move || {
            mailer
                .send(&email)
                .map_err(|e| EventHubError::Email(format!("Failed to send email: {e}")))
        })
        .await
        .map_err(|e| EventHubError::Email(format!("Email task failed: {e}")))?
        .map(|_| ())
    }
}

/// Log-only notifier used when no SMTP transport is configured
#[derive(Debug, Clone, Default)]
pub struct LogNotifier;

#[async_trait]
impl Notifier for LogNotifier {
    async fn send(&self, message: EmailMessage) -> Result<()> {
        info!(
            to = %message.to,
            subject = %message.subject,
            "Email delivery skipped (no SMTP configured)"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, NaiveTime, Utc};

    fn sample_user() -> User {
        User {
            id: 7,
            username: "jdoe".to_string(),
            email: "jdoe@example.com".to_string(),
            password_hash: String::new(),
            first_name: Some("Jane".to_string()),
            last_name: Some("Doe".to_string()),
            is_active: true,
            is_superuser: false,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn sample_event() -> Event {
        Event {
            id: 3,
            name: "Rust Meetup".to_string(),
            description: String::new(),
            date: NaiveDate::from_ymd_opt(2025, 6, 1).unwrap(),
            time: NaiveTime::from_hms_opt(18, 30, 0).unwrap(),
            location: "Community Hall".to_string(),
            category_id: 1,
            asset_path: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_activation_email_contains_link() {
        let user = sample_user();
        let message = activation_email(&user, "tok-123", "https://events.example.com");

        assert_eq!(message.to, "jdoe@example.com");
        assert_eq!(message.subject, "Activate Your Account");
        assert!(message.body.contains("https://events.example.com/activate/7/tok-123"));
        assert!(message.body.contains("Hi jdoe"));
    }

    #[test]
    fn test_rsvp_email_contains_event_details() {
        let user = sample_user();
        let event = sample_event();
        let message = rsvp_confirmation_email(&user, &event);

        assert_eq!(message.subject, "RSVP Confirmation — Rust Meetup");
        assert!(message.body.contains("Hi Jane Doe"));
        assert!(message.body.contains("Rust Meetup"));
        assert!(message.body.contains("2025-06-01"));
        assert!(message.body.contains("18:30"));
        assert!(message.body.contains("Community Hall"));
    }
}
