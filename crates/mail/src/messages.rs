//! Plain-text message bodies.

/// A rendered email, ready for delivery.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailMessage {
    pub subject: String,
    pub body: String,
}

/// `{base}/{path}?token={token}`, tolerating a trailing slash on `base`.
pub fn action_link(base_url: &str, path: &str, token: &str) -> String {
    format!("{}/{path}?token={token}", base_url.trim_end_matches('/'))
}

pub fn verification_message(display_name: &str, link: &str, expiry_hours: i64) -> EmailMessage {
    EmailMessage {
        subject: "[MAPA AI] Verify your email address".to_string(),
        body: format!(
            "Hi {display_name},\n\n\
             Welcome to MAPA AI! Confirm your email address by opening the link below:\n\n\
             {link}\n\n\
             This link expires in {expiry_hours} hours. If you did not create an account, \
             you can ignore this message.\n\n\
             Happy travels,\nMAPA AI"
        ),
    }
}

pub fn password_reset_message(display_name: &str, link: &str, expiry_mins: i64) -> EmailMessage {
    EmailMessage {
        subject: "[MAPA AI] Reset your password".to_string(),
        body: format!(
            "Hi {display_name},\n\n\
             We received a request to reset your MAPA AI password. Choose a new one here:\n\n\
             {link}\n\n\
             This link expires in {expiry_mins} minutes and works once. If you did not ask \
             for a reset, no action is needed.\n\n\
             MAPA AI"
        ),
    }
}
