//! Email delivery via SMTP.
//!
//! [`EmailDelivery`] wraps the `lettre` async SMTP transport. Configuration is
//! loaded from environment variables; if `SMTP_HOST` is not set,
//! [`EmailConfig::from_env`] returns `None` and no mailer should be constructed.

use lettre::message::header::ContentType;
use lettre::message::Mailbox;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};

use crate::messages::{
    action_link, password_reset_message, verification_message, EmailMessage,
};

// ---------------------------------------------------------------------------
// Error
// ---------------------------------------------------------------------------

/// Error type for email delivery failures.
#[derive(Debug, thiserror::Error)]
pub enum EmailError {
    /// SMTP transport-level failure (authentication, connection, etc.).
    #[error("SMTP transport error: {0}")]
    Transport(#[from] lettre::transport::smtp::Error),

    /// The recipient or sender address could not be parsed.
    #[error("Email address parse error: {0}")]
    Address(#[from] lettre::address::AddressError),

    /// The MIME message could not be assembled.
    #[error("Email build error: {0}")]
    Build(String),
}

// ---------------------------------------------------------------------------
// EmailConfig
// ---------------------------------------------------------------------------

/// Default SMTP port (STARTTLS).
const DEFAULT_SMTP_PORT: u16 = 587;

/// Default sender address when `SMTP_FROM` is not set.
const DEFAULT_FROM_ADDRESS: &str = "noreply@mapa.local";

/// Display name on every outgoing message.
const SENDER_NAME: &str = "MAPA AI";

#[derive(Debug, Clone)]
pub struct EmailConfig {
    pub smtp_host: String,
    /// Defaults to 587.
    pub smtp_port: u16,
    /// Bare sender address; the display name is added on send.
    pub from_address: String,
    pub smtp_user: Option<String>,
    pub smtp_password: Option<String>,
}

impl EmailConfig {
    /// Load configuration from environment variables.
    ///
    /// Returns `None` if `SMTP_HOST` is not set, signalling that email
    /// delivery is not configured and should be skipped.
    ///
    /// | Variable        | Required | Default               |
    /// |-----------------|----------|-----------------------|
    /// | `SMTP_HOST`     | yes      | --                    |
    /// | `SMTP_PORT`     | no       | `587`                 |
    /// | `SMTP_FROM`     | no       | `noreply@mapa.local`  |
    /// | `SMTP_USER`     | no       | --                    |
    /// | `SMTP_PASSWORD` | no       | --                    |
    pub fn from_env() -> Option<Self> {
        let smtp_host = std::env::var("SMTP_HOST").ok().filter(|h| !h.is_empty())?;
        Some(Self {
            smtp_host,
            smtp_port: std::env::var("SMTP_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(DEFAULT_SMTP_PORT),
            from_address: std::env::var("SMTP_FROM")
                .unwrap_or_else(|_| DEFAULT_FROM_ADDRESS.to_string()),
            smtp_user: std::env::var("SMTP_USER").ok(),
            smtp_password: std::env::var("SMTP_PASSWORD").ok(),
        })
    }
}

// ---------------------------------------------------------------------------
// EmailDelivery
// ---------------------------------------------------------------------------

/// Sends account emails via SMTP.
pub struct EmailDelivery {
    config: EmailConfig,
    /// Front-end root that action links point at.
    app_base_url: String,
}

impl EmailDelivery {
    pub fn new(config: EmailConfig, app_base_url: impl Into<String>) -> Self {
        Self {
            config,
            app_base_url: app_base_url.into(),
        }
    }

    /// Send the "confirm your address" email carrying `token`.
    pub async fn send_verification(
        &self,
        to_email: &str,
        display_name: &str,
        token: &str,
        expiry_hours: i64,
    ) -> Result<(), EmailError> {
        let link = action_link(&self.app_base_url, "verify-email", token);
        self.send(to_email, verification_message(display_name, &link, expiry_hours))
            .await
    }

    /// Send the password-reset email carrying `token`.
    pub async fn send_password_reset(
        &self,
        to_email: &str,
        display_name: &str,
        token: &str,
        expiry_mins: i64,
    ) -> Result<(), EmailError> {
        let link = action_link(&self.app_base_url, "reset-password", token);
        self.send(to_email, password_reset_message(display_name, &link, expiry_mins))
            .await
    }

    /// Build and send one plain-text message.
    pub async fn send(&self, to_email: &str, message: EmailMessage) -> Result<(), EmailError> {
        let email = self.build(to_email, message)?;

        let mut transport_builder =
            AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&self.config.smtp_host)?
                .port(self.config.smtp_port);

        if let (Some(user), Some(pass)) = (&self.config.smtp_user, &self.config.smtp_password) {
            transport_builder =
                transport_builder.credentials(Credentials::new(user.clone(), pass.clone()));
        }

        let mailer = transport_builder.build();
        mailer.send(email).await?;

        tracing::info!(to = to_email, "Email sent");
        Ok(())
    }

    fn build(&self, to_email: &str, message: EmailMessage) -> Result<Message, EmailError> {
        let from = Mailbox::new(Some(SENDER_NAME.to_string()), self.config.from_address.parse()?);
        Message::builder()
            .from(from)
            .to(to_email.parse()?)
            .subject(message.subject)
            .header(ContentType::TEXT_PLAIN)
            .body(message.body)
            .map_err(|e| EmailError::Build(e.to_string()))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
