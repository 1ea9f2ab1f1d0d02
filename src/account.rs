//! Account lifecycle: sign-up with profile creation, sign-in, sign-out.

use chrono::Utc;

use crate::error::{AccountCreationError, IdentityError, SignOutError};
use crate::identity::{IdentityGateway, User};
use crate::local::{self, LocalStore};
use crate::page::PrivilegedNav;
use crate::session::SessionCell;
use crate::store::{ProfileStore, UserProfile};
use crate::username;

/// The requested username, trimmed, or a generated one when blank.
pub fn initial_username(requested: Option<&str>) -> String {
    match requested.map(str::trim) {
        Some(name) if !name.is_empty() => name.to_string(),
        _ => username::generate(),
    }
}

/// Create the identity, then exactly one profile document for it.
///
/// The profile write is only attempted once the identity exists. If it fails
/// the identity is left without a profile; bootstrap creates one on the next
/// identity change.
pub async fn create_account(
    identity: &dyn IdentityGateway,
    store: &dyn ProfileStore,
    email: &str,
    password: &str,
    requested_username: Option<&str>,
) -> Result<User, AccountCreationError> {
    let user = identity.sign_up(email, password).await.inspect_err(|e| {
        tracing::error!("Error creating user: {e}");
    })?;

    let name = initial_username(requested_username);
    let profile = UserProfile::new_member(name.clone(), Utc::now());
    store.set_profile(&user.uid, &profile).await.inspect_err(|e| {
        tracing::error!("Error creating profile for {}: {e}", user.uid);
    })?;

    tracing::info!(
        "Account and profile created for {} with username {name}",
        user.email.as_deref().unwrap_or(&user.uid)
    );
    Ok(user)
}

pub async fn sign_in(
    identity: &dyn IdentityGateway,
    email: &str,
    password: &str,
) -> Result<User, IdentityError> {
    identity.sign_in(email.trim(), password).await
}

/// Invalidate the session, then clear local traces of it.
///
/// Local cleanup only runs when the gateway accepted the sign-out; on failure
/// the error is returned and nothing local is touched.
pub async fn sign_out(
    identity: &dyn IdentityGateway,
    local: &dyn LocalStore,
    session: &SessionCell,
    nav: &mut PrivilegedNav,
) -> Result<(), SignOutError> {
    if let Err(e) = identity.sign_out().await {
        tracing::error!("Error during sign out: {e}");
        return Err(e.into());
    }

    local::clear_settings(local);
    session.reset();
    nav.set_visible(false);
    tracing::info!("User signed out and local storage cleared");
    Ok(())
}
