//! Settings editor for display name and preferred mood.
//!
//! ```text
//! Loading --profile read--> Ready --save--> Ready
//!    |                        |
//!    +--read failed--> Error  +--clear--> Ready (fields emptied)
//!    +--no identity--> SignedOut
//! ```

use std::sync::Arc;

use chrono::Utc;

use crate::error::ProfileError;
use crate::identity::{IdentityGateway, User};
use crate::page::{SettingsPage, Tone};
use crate::store::{DEFAULT_MOOD, ProfileStore, ProfileUpdate, UserProfile};

pub const STATUS_LOADING: &str = "Loading user settings...";
pub const STATUS_LOADED: &str = "Settings loaded.";
pub const STATUS_DEFAULTS: &str = "Default settings loaded. Please update.";
pub const STATUS_LOAD_FAILED: &str = "Error loading settings. Please contact support.";
pub const STATUS_SIGNED_OUT: &str = "Please sign in to view and edit your settings.";
pub const STATUS_SAVING: &str = "Saving...";
pub const STATUS_SAVED: &str = "Settings saved.";
pub const STATUS_SAVE_FAILED: &str = "Something went wrong, please contact support.";
pub const STATUS_SAVE_SIGNED_OUT: &str = "Please sign in to update settings.";
pub const STATUS_CLEARED: &str = "Form fields cleared.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettingsState {
    Loading,
    Ready,
    Error,
    SignedOut,
}

pub struct SettingsEditor {
    identity: Arc<dyn IdentityGateway>,
    store: Arc<dyn ProfileStore>,
    state: SettingsState,
    page: SettingsPage,
}

impl SettingsEditor {
    /// Starts in `Loading`: inputs disabled, loader shown.
    pub fn new(identity: Arc<dyn IdentityGateway>, store: Arc<dyn ProfileStore>, mut page: SettingsPage) -> Self {
        page.set_inputs_enabled(false);
        page.status.set(STATUS_LOADING, Tone::Neutral);
        page.set_loader_visible(true);
        Self { identity, store, state: SettingsState::Loading, page }
    }

    pub fn state(&self) -> SettingsState {
        self.state
    }

    pub fn page(&self) -> &SettingsPage {
        &self.page
    }

    /// Stand-in for the user typing into the form.
    pub fn edit(&mut self, display_name: Option<&str>, mood: Option<&str>) {
        if let Some(name) = display_name {
            self.page.display_name.set_value(name);
        }
        if let Some(mood) = mood {
            self.page.preferred_mood.set_value(mood);
        }
    }

    /// React to the confirmed identity: populate the form or report why not.
    pub async fn load(&mut self, user: Option<&User>) {
        let Some(user) = user else {
            self.page.status.set(STATUS_SIGNED_OUT, Tone::Error);
            self.page.set_loader_visible(false);
            self.state = SettingsState::SignedOut;
            return;
        };

        match self.populate(user).await {
            Ok(()) => {
                self.page.set_inputs_enabled(true);
                self.state = SettingsState::Ready;
            }
            Err(e) => {
                tracing::error!("Error fetching user profile for settings: {e}");
                self.page.status.set(STATUS_LOAD_FAILED, Tone::Error);
                self.state = SettingsState::Error;
            }
        }
        self.page.set_loader_visible(false);
    }

    async fn populate(&mut self, user: &User) -> Result<(), ProfileError> {
        match self.store.get_profile(&user.uid).await? {
            Some(doc) => {
                let username = doc.username.unwrap_or_default();
                let mood = doc.preferred_mood.unwrap_or_else(|| DEFAULT_MOOD.to_string());
                self.page.display_name.set_value(&username);
                self.page.preferred_mood.set_value(mood);

                // Keep the identity's display name in step with the profile.
                if !username.is_empty() && user.display_name.as_deref() != Some(username.as_str()) {
                    if let Err(e) = self.identity.update_display_name(user, &username).await {
                        tracing::warn!("Could not sync display name for {}: {e}", user.uid);
                    }
                }
                self.page.status.set(STATUS_LOADED, Tone::Success);
            }
            None => {
                tracing::warn!("No profile for {} on settings page, creating default", user.uid);
                let username = default_username(user);
                let profile = UserProfile::new_member(username.clone(), Utc::now());
                self.store.set_profile(&user.uid, &profile).await?;
                self.page.display_name.set_value(username);
                self.page.preferred_mood.set_value(DEFAULT_MOOD);
                self.page.status.set(STATUS_DEFAULTS, Tone::Neutral);
            }
        }
        Ok(())
    }

    /// Persist the form. Ignored unless the editor is `Ready`.
    pub async fn save(&mut self) {
        if self.state != SettingsState::Ready {
            tracing::debug!("Save ignored in state {:?}", self.state);
            return;
        }

        self.page.set_inputs_enabled(false);
        self.page.status.set(STATUS_SAVING, Tone::Neutral);

        let update = ProfileUpdate {
            username: self.page.display_name.value.trim().to_string(),
            preferred_mood: self.page.preferred_mood.value.clone(),
        };

        let (text, tone) = match self.identity.current_user() {
            None => {
                tracing::warn!("Attempted to save settings without a signed-in user");
                (STATUS_SAVE_SIGNED_OUT, Tone::Error)
            }
            Some(user) => match self.persist(&user, &update).await {
                Ok(()) => (STATUS_SAVED, Tone::Success),
                Err(e) => {
                    tracing::error!("Settings update failed: {e}");
                    (STATUS_SAVE_FAILED, Tone::Error)
                }
            },
        };

        self.page.status.set(text, tone);
        self.page.set_inputs_enabled(true);
    }

    async fn persist(&self, user: &User, update: &ProfileUpdate) -> anyhow::Result<()> {
        self.store.update_profile(&user.uid, update).await?;
        if user.display_name.as_deref() != Some(update.username.as_str()) {
            self.identity.update_display_name(user, &update.username).await?;
        }
        Ok(())
    }

    /// Empty the form without touching stored data. Ignored unless `Ready`.
    pub fn clear(&mut self) {
        if self.state != SettingsState::Ready {
            tracing::debug!("Clear ignored in state {:?}", self.state);
            return;
        }
        self.page.display_name.set_value("");
        self.page.preferred_mood.set_value("");
        self.page.status.set(STATUS_CLEARED, Tone::Neutral);
        self.page.set_save_enabled(true);
    }
}

/// Username for a profile first created from the settings page.
fn default_username(user: &User) -> String {
    user.email
        .as_deref()
        .and_then(|email| email.split('@').next())
        .filter(|local| !local.is_empty())
        .unwrap_or("NewUser")
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_username_from_email() {
        assert_eq!(default_username(&User::new("u").with_email("sam.lee@school.org")), "sam.lee");
        assert_eq!(default_username(&User::new("u").with_email("@nowhere")), "NewUser");
        assert_eq!(default_username(&User::new("u")), "NewUser");
    }
}
