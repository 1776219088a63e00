//! Resolve a normalized provider identity to a user row.
//!
//! Lookup order: an existing provider link, then a verified email match
//! (which gets linked), then a brand new account.

use mapa_core::error::CoreError;
use mapa_core::identity::{IdentityProvider, NormalizedIdentity};
use mapa_db::models::user::{CreateUser, User};
use mapa_db::stores::UserStore;

use crate::error::{AppError, AppResult};

/// Find or create the user for `identity`.
///
/// `password_hash` is only used when a local account is created.
pub async fn resolve_user(
    users: &dyn UserStore,
    identity: &NormalizedIdentity,
    password_hash: Option<String>,
) -> AppResult<User> {
    if let Some(user) = users
        .find_by_provider(identity.provider, &identity.subject)
        .await?
    {
        return Ok(user);
    }

    let email = identity.email.clone().ok_or_else(|| {
        AppError::Core(CoreError::Validation(format!(
            "{} account did not share an email address",
            identity.provider.as_str()
        )))
    })?;

    if identity.provider != IdentityProvider::Local && identity.email_verified {
        if let Some(existing) = users.find_by_email(&email).await? {
            let linked = users
                .link_provider(existing.id, identity.provider, &identity.subject)
                .await?
                .ok_or(CoreError::NotFound {
                    entity: "User",
                    id: existing.id,
                })?;
            tracing::info!(
                user_id = linked.id,
                provider = identity.provider.as_str(),
                "Linked identity provider to existing account"
            );
            return Ok(linked);
        }
    }

    let (google_id, facebook_id) = match identity.provider {
        IdentityProvider::Local => (None, None),
        IdentityProvider::Google => (Some(identity.subject.clone()), None),
        IdentityProvider::Facebook => (None, Some(identity.subject.clone())),
    };

    let user = users
        .create(&CreateUser {
            email,
            display_name: identity.display_name.clone(),
            password_hash,
            email_verified: identity.email_verified,
            google_id,
            facebook_id,
        })
        .await?;

    tracing::info!(
        user_id = user.id,
        provider = identity.provider.as_str(),
        "Created user account"
    );
    Ok(user)
}
