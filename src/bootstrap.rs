//! Session bootstrap: reconcile the page shell with the profile store on
//! every identity change.
//!
//! Sequence per change:
//! 1. roles reset to empty
//! 2. anonymous: redirect protected pages, reveal others, clear the legacy
//!    settings blob, hide admin links
//! 3. signed in on a login/signup page: redirect to the post-auth landing
//! 4. read the profile, creating it with a generated username when missing
//! 5. admin links shown iff the roles contain `admin`
//! 6. loader hidden, content revealed
//!
//! Store failures never escape; they leave an error placeholder on the page.

use std::sync::Arc;

use chrono::Utc;
use tokio::sync::watch;

use crate::error::ProfileError;
use crate::identity::User;
use crate::local::{self, LocalStore};
use crate::page::{PageAccess, ShellPage};
use crate::session::{RoleSet, SessionCell, SessionState};
use crate::store::{DEFAULT_MOOD, ProfileStore, UserProfile};
use crate::username;

pub const LOADING_PLACEHOLDER: &str = "Loading...";
pub const ERROR_PLACEHOLDER: &str = "Error loading name";
pub const FALLBACK_USERNAME: &str = "User";

/// Redirect targets.
#[derive(Debug, Clone, PartialEq)]
pub struct Landing {
    /// Where signed-in visitors of login/signup pages go.
    pub post_auth: String,
    /// Where anonymous visitors of protected pages go.
    pub unauthenticated: String,
}

impl Default for Landing {
    fn default() -> Self {
        Self { post_auth: "home.html".into(), unauthenticated: "auth.html".into() }
    }
}

impl From<&crate::config::Config> for Landing {
    fn from(cfg: &crate::config::Config) -> Self {
        Self {
            post_auth: cfg.auth_landing.clone(),
            unauthenticated: cfg.unauthenticated_landing.clone(),
        }
    }
}

/// Display values resolved for the signed-in identity.
struct Resolved {
    username: String,
    mood: String,
    roles: RoleSet,
}

pub struct SessionBootstrapper {
    store: Arc<dyn ProfileStore>,
    local: Arc<dyn LocalStore>,
    session: Arc<SessionCell>,
    landing: Landing,
}

impl SessionBootstrapper {
    pub fn new(
        store: Arc<dyn ProfileStore>,
        local: Arc<dyn LocalStore>,
        session: Arc<SessionCell>,
        landing: Landing,
    ) -> Self {
        Self { store, local, session, landing }
    }

    /// Reconcile `page` against the current value of `identity`, then again on
    /// every change until the gateway goes away.
    pub async fn run(&self, mut identity: watch::Receiver<Option<User>>, page: &mut ShellPage) {
        loop {
            let user = identity.borrow_and_update().clone();
            self.reconcile(user, page).await;
            if identity.changed().await.is_err() {
                break;
            }
        }
    }

    /// One reconciliation. The returned state is also published to the
    /// shared [`SessionCell`].
    pub async fn reconcile(&self, user: Option<User>, page: &mut ShellPage) -> SessionState {
        self.session.publish(SessionState::loading(user.clone()));

        let Some(user) = user else {
            return self.reconcile_anonymous(page);
        };

        if page.access == PageAccess::AuthOnly {
            tracing::debug!("Signed-in visitor on auth page, redirecting to {}", self.landing.post_auth);
            page.redirect(&self.landing.post_auth);
            return self.finish(Some(user), RoleSet::empty());
        }

        page.set_usernames(LOADING_PLACEHOLDER);

        match self.resolve_profile(&user).await {
            Ok(resolved) => {
                page.set_usernames(&resolved.username);
                page.set_moods(&resolved.mood);
                tracing::info!(
                    "User roles loaded: {}",
                    resolved.roles.iter().collect::<Vec<_>>().join(", ")
                );
                page.nav.set_visible(resolved.roles.is_admin());
                page.hide_loader();
                page.reveal_content();
                self.finish(Some(user), resolved.roles)
            }
            Err(e) => {
                tracing::error!("Error fetching or creating user profile: {e}");
                page.hide_loader();
                page.set_usernames(ERROR_PLACEHOLDER);
                page.nav.set_visible(false);
                // Revealed so the error text is actually visible.
                page.reveal_content();
                self.finish(Some(user), RoleSet::empty())
            }
        }
    }

    fn reconcile_anonymous(&self, page: &mut ShellPage) -> SessionState {
        if page.access == PageAccess::Protected {
            page.redirect(&self.landing.unauthenticated);
        } else {
            page.hide_loader();
            page.reveal_content();
        }
        local::clear_settings(self.local.as_ref());
        tracing::debug!("No user signed in, local settings cleared");
        page.nav.set_visible(false);
        self.finish(None, RoleSet::empty())
    }

    async fn resolve_profile(&self, user: &User) -> Result<Resolved, ProfileError> {
        if let Some(doc) = self.store.get_profile(&user.uid).await? {
            return Ok(Resolved {
                username: doc.username.unwrap_or_else(|| FALLBACK_USERNAME.to_string()),
                mood: doc.preferred_mood.unwrap_or_else(|| DEFAULT_MOOD.to_string()),
                roles: RoleSet::from_stored(doc.roles),
            });
        }

        tracing::warn!("No profile found for {}, creating one now", user.uid);
        let profile = UserProfile::new_member(username::generate(), Utc::now());
        self.store.set_profile(&user.uid, &profile).await?;
        Ok(Resolved {
            username: profile.username,
            mood: profile.preferred_mood,
            roles: RoleSet::from_stored(Some(profile.roles)),
        })
    }

    fn finish(&self, identity: Option<User>, roles: RoleSet) -> SessionState {
        let state = SessionState { identity, roles, loading: false };
        self.session.publish(state.clone());
        state
    }
}
