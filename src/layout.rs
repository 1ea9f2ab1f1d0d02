//! Shared page chrome: mobile menu, user dropdown, safety modal, sign-out.

use crate::identity::IdentityGateway;
use crate::local::LocalStore;
use crate::page::{Element, LayoutPage, PrivilegedNav};
use crate::session::SessionCell;

const CHEVRON_OPEN: &str = "rotate(180deg)";
const CHEVRON_CLOSED: &str = "rotate(0deg)";

/// Where a document-level click landed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClickTarget {
    UserMenuButton,
    UserMenuDropdown,
    Elsewhere,
}

pub struct Layout {
    page: LayoutPage,
    sign_out_landing: String,
}

impl Layout {
    /// Wire the chrome: ARIA defaults on both menu buttons.
    pub fn new(mut page: LayoutPage, sign_out_landing: impl Into<String>) -> Self {
        if let (Some(btn), Some(_)) = (&mut page.mobile_menu_btn, &page.mobile_menu) {
            btn.set_attr("aria-controls", "mobile-menu");
            btn.set_attr("aria-expanded", "false");
        }
        if let (Some(btn), Some(_)) = (&mut page.user_menu_btn, &page.user_menu_dropdown) {
            btn.set_attr("aria-controls", "user-menu-dropdown");
            btn.set_attr("aria-expanded", "false");
        }
        Self { page, sign_out_landing: sign_out_landing.into() }
    }

    pub fn page(&self) -> &LayoutPage {
        &self.page
    }

    pub fn toggle_mobile_menu(&mut self) {
        let (Some(btn), Some(menu)) = (&mut self.page.mobile_menu_btn, &mut self.page.mobile_menu) else {
            return;
        };
        menu.toggle();
        set_expanded(btn, menu.is_visible());
    }

    pub fn toggle_user_menu(&mut self) {
        let Some(dropdown) = &mut self.page.user_menu_dropdown else {
            return;
        };
        dropdown.toggle();
        let open = dropdown.is_visible();
        self.sync_user_menu(open);
    }

    /// Clicks outside the button and dropdown close the dropdown.
    pub fn document_click(&mut self, target: ClickTarget) {
        if target != ClickTarget::Elsewhere || self.page.user_menu_btn.is_none() {
            return;
        }
        let Some(dropdown) = &mut self.page.user_menu_dropdown else {
            return;
        };
        dropdown.hide();
        self.sync_user_menu(false);
    }

    fn sync_user_menu(&mut self, open: bool) {
        if let Some(chevron) = &mut self.page.chevron {
            let rotation = if open { CHEVRON_OPEN } else { CHEVRON_CLOSED };
            chevron.set_attr("style", format!("transform: {rotation}"));
        }
        if let Some(btn) = &mut self.page.user_menu_btn {
            set_expanded(btn, open);
        }
    }

    pub fn open_safety_modal(&mut self) {
        if let Some(modal) = &mut self.page.safety_modal {
            modal.show();
        }
    }

    pub fn close_safety_modal(&mut self) {
        if let Some(modal) = &mut self.page.safety_modal {
            modal.hide();
        }
    }

    /// Sign-out button. Failures are logged and the page stays put.
    pub async fn sign_out(
        &mut self,
        identity: &dyn IdentityGateway,
        local: &dyn LocalStore,
        session: &SessionCell,
        nav: &mut PrivilegedNav,
    ) -> bool {
        if self.page.sign_out_btn.is_none() {
            return false;
        }
        match crate::account::sign_out(identity, local, session, nav).await {
            Ok(()) => {
                self.page.location = Some(self.sign_out_landing.clone());
                true
            }
            Err(e) => {
                tracing::error!("Sign out error: {e}");
                false
            }
        }
    }
}

fn set_expanded(btn: &mut Element, expanded: bool) {
    btn.set_attr("aria-expanded", if expanded { "true" } else { "false" });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mobile_menu_toggle_tracks_aria() {
        let mut layout = Layout::new(LayoutPage::default(), "auth.html");
        let btn = layout.page().mobile_menu_btn.as_ref().unwrap();
        assert_eq!(btn.attr("aria-controls"), Some("mobile-menu"));
        assert_eq!(btn.attr("aria-expanded"), Some("false"));

        layout.toggle_mobile_menu();
        assert!(layout.page().mobile_menu.as_ref().unwrap().is_visible());
        assert_eq!(layout.page().mobile_menu_btn.as_ref().unwrap().attr("aria-expanded"), Some("true"));

        layout.toggle_mobile_menu();
        assert!(layout.page().mobile_menu.as_ref().unwrap().hidden);
        assert_eq!(layout.page().mobile_menu_btn.as_ref().unwrap().attr("aria-expanded"), Some("false"));
    }

    #[test]
    fn test_user_menu_rotates_chevron_and_closes_on_outside_click() {
        let mut layout = Layout::new(LayoutPage::default(), "auth.html");
        layout.toggle_user_menu();
        assert_eq!(layout.page().chevron.as_ref().unwrap().attr("style"), Some("transform: rotate(180deg)"));

        layout.document_click(ClickTarget::UserMenuDropdown);
        assert!(layout.page().user_menu_dropdown.as_ref().unwrap().is_visible());

        layout.document_click(ClickTarget::Elsewhere);
        assert!(layout.page().user_menu_dropdown.as_ref().unwrap().hidden);
        assert_eq!(layout.page().chevron.as_ref().unwrap().attr("style"), Some("transform: rotate(0deg)"));
        assert_eq!(layout.page().user_menu_btn.as_ref().unwrap().attr("aria-expanded"), Some("false"));
    }

    #[test]
    fn test_missing_elements_are_ignored() {
        let page = LayoutPage {
            mobile_menu: None,
            chevron: None,
            safety_modal: None,
            ..LayoutPage::default()
        };
        let mut layout = Layout::new(page, "auth.html");
        layout.toggle_mobile_menu();
        layout.toggle_user_menu();
        layout.open_safety_modal();
        assert_eq!(layout.page().mobile_menu_btn.as_ref().unwrap().attr("aria-expanded"), None);
        assert_eq!(layout.page().user_menu_btn.as_ref().unwrap().attr("aria-expanded"), Some("true"));
    }

    #[test]
    fn test_safety_modal_open_close() {
        let mut layout = Layout::new(LayoutPage::default(), "auth.html");
        layout.open_safety_modal();
        assert!(layout.page().safety_modal.as_ref().unwrap().is_visible());
        layout.close_safety_modal();
        assert!(layout.page().safety_modal.as_ref().unwrap().hidden);
    }
}
