//! Identity-provider variants and their normalized form.
//!
//! Every sign-in path (local password, Google, Facebook) produces a
//! [`ProviderProfile`]. Only the [`NormalizedIdentity`] it normalizes into is
//! consumed by user resolution; provider-specific fields stop here.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Fallback display name when a provider supplies neither a name nor an email.
pub const DEFAULT_DISPLAY_NAME: &str = "Traveler";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IdentityProvider {
    Local,
    Google,
    Facebook,
}

impl IdentityProvider {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Local => "local",
            Self::Google => "google",
            Self::Facebook => "facebook",
        }
    }
}

/// Raw profile as a provider hands it over.
#[derive(Debug, Clone)]
pub enum ProviderProfile {
    /// Email/password registration.
    Local { email: String, display_name: String },
    /// Google OpenID Connect userinfo.
    Google {
        sub: String,
        email: Option<String>,
        email_verified: bool,
        name: Option<String>,
    },
    /// Facebook Graph `/me` profile. Facebook only exposes confirmed emails.
    Facebook {
        id: String,
        email: Option<String>,
        name: Option<String>,
    },
}

/// Provider-independent identity consumed by user resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedIdentity {
    pub provider: IdentityProvider,
    /// Stable provider-side identifier. For local accounts, the email.
    pub subject: String,
    /// Lowercased, trimmed email, when the provider shared one.
    pub email: Option<String>,
    pub display_name: String,
    /// Whether the provider vouches for `email`.
    pub email_verified: bool,
}

impl ProviderProfile {
    pub fn provider(&self) -> IdentityProvider {
        match self {
            Self::Local { .. } => IdentityProvider::Local,
            Self::Google { .. } => IdentityProvider::Google,
            Self::Facebook { .. } => IdentityProvider::Facebook,
        }
    }

    pub fn normalize(self) -> Result<NormalizedIdentity, CoreError> {
        let provider = self.provider();
        let (subject, email, name, email_verified) = match self {
            Self::Local {
                email,
                display_name,
            } => {
                let email = normalize_email(&email).ok_or_else(|| {
                    CoreError::Validation("Local accounts require an email".into())
                })?;
                (email.clone(), Some(email), Some(display_name), false)
            }
            Self::Google {
                sub,
                email,
                email_verified,
                name,
            } => (sub, email.as_deref().and_then(normalize_email), name, email_verified),
            Self::Facebook { id, email, name } => {
                let email = email.as_deref().and_then(normalize_email);
                let verified = email.is_some();
                (id, email, name, verified)
            }
        };

        let subject = subject.trim().to_string();
        if subject.is_empty() {
            return Err(CoreError::Validation(format!(
                "{} profile has no subject identifier",
                provider.as_str()
            )));
        }

        let display_name = pick_display_name(name.as_deref(), email.as_deref());

        Ok(NormalizedIdentity {
            provider,
            subject,
            email,
            display_name,
            email_verified,
        })
    }
}

/// Trim and lowercase an email; `None` for blank input.
pub fn normalize_email(email: &str) -> Option<String> {
    let email = email.trim();
    if email.is_empty() {
        None
    } else {
        Some(email.to_lowercase())
    }
}

fn pick_display_name(name: Option<&str>, email: Option<&str>) -> String {
    if let Some(name) = name.map(str::trim).filter(|n| !n.is_empty()) {
        return name.to_string();
    }
    email
        .and_then(|e| e.split('@').next())
        .filter(|local| !local.is_empty())
        .unwrap_or(DEFAULT_DISPLAY_NAME)
        .to_string()
}
