//! Read-only profile page.

use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::avatar;
use crate::identity::User;
use crate::page::ProfilePage;
use crate::store::{MEMBER_ROLE, ProfileDocument, ProfileStore};

pub const EDIT_UNAVAILABLE: &str = "Edit profile is not implemented in this version.";

#[derive(Debug, Clone, PartialEq)]
pub enum Avatar {
    Url(String),
    Generated(String),
}

impl Avatar {
    pub fn src(&self) -> &str {
        match self {
            Avatar::Url(u) | Avatar::Generated(u) => u,
        }
    }
}

/// Everything the page shows, resolved from profile + identity.
#[derive(Debug, Clone, PartialEq)]
pub struct ProfileView {
    pub username: String,
    pub roles: Vec<String>,
    pub registered: Option<DateTime<Utc>>,
    pub avatar: Option<String>,
}

impl ProfileView {
    pub fn resolve(user: &User, doc: &ProfileDocument) -> Self {
        let username = doc
            .username
            .clone()
            .or_else(|| user.display_name.clone().filter(|n| !n.is_empty()))
            .or_else(|| user.email.clone().filter(|e| !e.is_empty()))
            .unwrap_or_else(|| "User".to_string());

        let mut roles: Vec<String> = doc.roles.iter().flatten().filter(|r| !r.is_empty()).cloned().collect();
        if roles.is_empty() {
            roles.push(MEMBER_ROLE.to_string());
        }

        Self {
            username,
            roles,
            registered: doc.created_at.or(user.metadata.creation_time),
            avatar: doc.avatar_url.clone().or_else(|| user.photo_url.clone().filter(|u| !u.is_empty())),
        }
    }
}

/// `M/D/YYYY`, or an em dash when unknown.
pub fn format_registered(registered: Option<DateTime<Utc>>) -> String {
    match registered {
        Some(t) => t.format("%-m/%-d/%Y").to_string(),
        None => "\u{2014}".to_string(),
    }
}

pub struct ProfileViewer {
    store: Arc<dyn ProfileStore>,
    unauthenticated: String,
}

impl ProfileViewer {
    pub fn new(store: Arc<dyn ProfileStore>, unauthenticated: impl Into<String>) -> Self {
        Self { store, unauthenticated: unauthenticated.into() }
    }

    /// Render once for the confirmed identity. Content is always revealed,
    /// even when the read fails.
    pub async fn render(&self, user: Option<&User>, page: &mut ProfilePage) {
        let Some(user) = user else {
            hide(&mut page.loader);
            page.location = Some(self.unauthenticated.clone());
            return;
        };

        match self.store.get_profile(&user.uid).await {
            Ok(doc) => {
                let view = ProfileView::resolve(user, &doc.unwrap_or_default());
                apply(&view, page);
            }
            Err(e) => tracing::error!("Failed to load profile: {e}"),
        }

        hide(&mut page.loader);
        if let Some(main) = &mut page.main {
            main.show();
        }
    }
}

fn hide(el: &mut Option<crate::page::Element>) {
    if let Some(el) = el {
        el.hide();
    }
}

fn apply(view: &ProfileView, page: &mut ProfilePage) {
    page.username.set_text(&view.username);
    page.detail_username.set_text(&view.username);
    page.detail_roles.set_text(view.roles.join(", "));
    page.detail_registered.set_text(format_registered(view.registered));

    let avatar = match &view.avatar {
        Some(url) => Some(Avatar::Url(url.clone())),
        None => match avatar::data_url(avatar::DEFAULT_SIZE) {
            Ok(data) => Some(Avatar::Generated(data)),
            Err(e) => {
                tracing::warn!("Could not render default avatar: {e}");
                None
            }
        },
    };

    let Some(avatar) = avatar else {
        page.detail_avatar.set_text("(none)");
        return;
    };
    page.avatar.set_attr("src", avatar.src());
    match &avatar {
        Avatar::Url(url) => {
            page.avatar.set_attr("alt", format!("{}'s profile picture", view.username));
            page.detail_avatar.set_text(url);
        }
        Avatar::Generated(_) => {
            page.avatar.set_attr("alt", "Default avatar");
            page.detail_avatar.set_text("(none)");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_username_fallback_chain() {
        let empty = ProfileDocument::default();
        let user = User::new("u").with_email("sam@x.org").with_display_name("Sammy");
        assert_eq!(ProfileView::resolve(&user, &empty).username, "Sammy");
        assert_eq!(ProfileView::resolve(&User::new("u").with_email("sam@x.org"), &empty).username, "sam@x.org");
        assert_eq!(ProfileView::resolve(&User::new("u"), &empty).username, "User");

        let doc = ProfileDocument { username: Some("BraveOwl42".into()), ..Default::default() };
        assert_eq!(ProfileView::resolve(&user, &doc).username, "BraveOwl42");
    }

    #[test]
    fn test_registered_falls_back_to_identity_metadata() {
        let mut user = User::new("u");
        user.metadata.creation_time = Some(Utc.with_ymd_and_hms(2024, 2, 9, 0, 0, 0).unwrap());
        let view = ProfileView::resolve(&user, &ProfileDocument::default());
        assert_eq!(format_registered(view.registered), "2/9/2024");
        assert_eq!(format_registered(None), "\u{2014}");
    }

    #[test]
    fn test_roles_keep_stored_order() {
        let doc = ProfileDocument { roles: Some(vec!["member".into(), "admin".into()]), ..Default::default() };
        assert_eq!(ProfileView::resolve(&User::new("u"), &doc).roles.join(", "), "member, admin");
        assert_eq!(ProfileView::resolve(&User::new("u"), &ProfileDocument::default()).roles, vec!["member"]);
    }

    #[test]
    fn test_blank_roles_fall_back_to_member() {
        let doc = ProfileDocument { roles: Some(vec![String::new()]), ..Default::default() };
        assert_eq!(ProfileView::resolve(&User::new("u"), &doc).roles, vec!["member"]);
        let doc = ProfileDocument { roles: Some(vec![String::new(), "admin".into()]), ..Default::default() };
        assert_eq!(ProfileView::resolve(&User::new("u"), &doc).roles, vec!["admin"]);
    }

    #[test]
    fn test_photo_url_used_before_generated_avatar() {
        let mut user = User::new("u");
        user.photo_url = Some("https://cdn/p.png".into());
        let view = ProfileView::resolve(&user, &ProfileDocument::default());
        assert_eq!(view.avatar.as_deref(), Some("https://cdn/p.png"));
    }
}
