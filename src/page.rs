//! Page bindings: the elements each controller is allowed to touch.
//!
//! A binding is built once per page from its markup and handed to the
//! controller, which mutates it. Optional elements are `Option`s; a page that
//! lacks one is not an error.

use std::collections::BTreeMap;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Element {
    pub id: String,
    pub text: String,
    pub value: String,
    pub hidden: bool,
    pub disabled: bool,
    pub attrs: BTreeMap<String, String>,
}

impl Element {
    pub fn new(id: impl Into<String>) -> Self {
        Self { id: id.into(), ..Default::default() }
    }

    /// Element whose markup carries the `hidden` class.
    pub fn hidden(id: impl Into<String>) -> Self {
        Self { hidden: true, ..Self::new(id) }
    }

    pub fn show(&mut self) {
        self.hidden = false;
    }

    pub fn hide(&mut self) {
        self.hidden = true;
    }

    pub fn toggle(&mut self) {
        self.hidden = !self.hidden;
    }

    pub fn is_visible(&self) -> bool {
        !self.hidden
    }

    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = text.into();
    }

    pub fn set_value(&mut self, value: impl Into<String>) {
        self.value = value.into();
    }

    pub fn set_disabled(&mut self, disabled: bool) {
        self.disabled = disabled;
    }

    pub fn set_attr(&mut self, name: &str, value: impl Into<String>) {
        self.attrs.insert(name.to_string(), value.into());
    }

    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs.get(name).map(String::as_str)
    }
}

/// Who may view a page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageAccess {
    /// Anyone; anonymous visitors see the content.
    Public,
    /// Signed-in visitors only; others are redirected away.
    Protected,
    /// Login/signup pages; signed-in visitors are redirected away.
    AuthOnly,
}

/// Admin-only navigation entries that may appear in page markup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum NavLink {
    AdminDropdown,
    AdminMobile,
    AdminSidebar,
}

impl NavLink {
    pub const ALL: [NavLink; 3] = [NavLink::AdminDropdown, NavLink::AdminMobile, NavLink::AdminSidebar];

    pub fn element_id(self) -> &'static str {
        match self {
            NavLink::AdminDropdown => "admin-panel-dropdown-link",
            NavLink::AdminMobile => "admin-panel-mobile-link",
            NavLink::AdminSidebar => "admin-panel-sidebar-link",
        }
    }
}

/// Logical link name to element, `None` where the page does not include it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PrivilegedNav {
    links: BTreeMap<NavLink, Option<Element>>,
}

impl PrivilegedNav {
    /// Nav where only `present` links exist in markup, all initially hidden.
    pub fn with_links(present: &[NavLink]) -> Self {
        let links = NavLink::ALL
            .into_iter()
            .map(|link| {
                let element = present.contains(&link).then(|| Element::hidden(link.element_id()));
                (link, element)
            })
            .collect();
        Self { links }
    }

    pub fn all() -> Self {
        Self::with_links(&NavLink::ALL)
    }

    pub fn set_visible(&mut self, visible: bool) {
        for element in self.links.values_mut().flatten() {
            element.hidden = !visible;
        }
    }

    /// `None` when the link is absent from this page.
    pub fn is_visible(&self, link: NavLink) -> Option<bool> {
        self.links.get(&link)?.as_ref().map(Element::is_visible)
    }

    pub fn present(&self) -> impl Iterator<Item = (NavLink, &Element)> {
        self.links.iter().filter_map(|(link, el)| el.as_ref().map(|el| (*link, el)))
    }
}

// ── Shell (every page) ───────────────────────────────────────

pub const LOADER_ID: &str = "page-loader";
pub const MAIN_CONTENT_ID: &str = "main-content";
pub const USERNAME_DISPLAY_CLASS: &str = "user-email-display";
pub const MOOD_DISPLAY_CLASS: &str = "user-preferred-mood-display";

/// What the session bootstrapper drives on every page.
#[derive(Debug, Clone, PartialEq)]
pub struct ShellPage {
    pub access: PageAccess,
    pub loader: Option<Element>,
    pub main_content: Option<Element>,
    pub username_displays: Vec<Element>,
    pub mood_displays: Vec<Element>,
    pub nav: PrivilegedNav,
    /// Set when the page navigates away.
    pub location: Option<String>,
}

impl ShellPage {
    /// Standard layout: visible loader, hidden content, one username and one
    /// mood display, all three admin links.
    pub fn new(access: PageAccess) -> Self {
        Self {
            access,
            loader: Some(Element::new(LOADER_ID)),
            main_content: Some(Element::hidden(MAIN_CONTENT_ID)),
            username_displays: vec![Element::new(USERNAME_DISPLAY_CLASS)],
            mood_displays: vec![Element::new(MOOD_DISPLAY_CLASS)],
            nav: PrivilegedNav::all(),
            location: None,
        }
    }

    pub fn redirect(&mut self, to: &str) {
        self.location = Some(to.to_string());
    }

    pub fn hide_loader(&mut self) {
        if let Some(loader) = &mut self.loader {
            loader.hide();
        }
    }

    pub fn reveal_content(&mut self) {
        if let Some(content) = &mut self.main_content {
            content.show();
        }
    }

    pub fn set_usernames(&mut self, text: &str) {
        for el in &mut self.username_displays {
            el.set_text(text);
        }
    }

    pub fn set_moods(&mut self, text: &str) {
        for el in &mut self.mood_displays {
            el.set_text(text);
        }
    }
}

// ── Profile page ─────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
pub struct ProfilePage {
    pub loader: Option<Element>,
    pub main: Option<Element>,
    pub username: Element,
    pub detail_username: Element,
    pub detail_roles: Element,
    pub detail_registered: Element,
    pub avatar: Element,
    pub detail_avatar: Element,
    pub location: Option<String>,
}

impl Default for ProfilePage {
    fn default() -> Self {
        Self {
            loader: Some(Element::new(LOADER_ID)),
            main: Some(Element::hidden("profile-main")),
            username: Element::new("profile-username"),
            detail_username: Element::new("detail-username"),
            detail_roles: Element::new("detail-roles"),
            detail_registered: Element::new("detail-registered"),
            avatar: Element::new("profile-avatar"),
            detail_avatar: Element::new("detail-avatar"),
            location: None,
        }
    }
}

// ── Settings page ────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    Neutral,
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq)]
pub struct StatusLine {
    pub text: String,
    pub tone: Tone,
}

impl Default for StatusLine {
    fn default() -> Self {
        Self { text: String::new(), tone: Tone::Neutral }
    }
}

impl StatusLine {
    pub fn set(&mut self, text: impl Into<String>, tone: Tone) {
        self.text = text.into();
        self.tone = tone;
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SettingsPage {
    pub display_name: Element,
    pub preferred_mood: Element,
    pub save: Element,
    pub clear: Element,
    pub status: StatusLine,
    pub loader: Option<Element>,
}

impl Default for SettingsPage {
    fn default() -> Self {
        Self {
            display_name: Element::new("displayName"),
            preferred_mood: Element::new("preferredMood"),
            save: Element::new("save-settings"),
            clear: Element::new("clear-settings"),
            status: StatusLine::default(),
            loader: Some(Element::new(LOADER_ID)),
        }
    }
}

impl SettingsPage {
    pub fn set_inputs_enabled(&mut self, enabled: bool) {
        self.display_name.set_disabled(!enabled);
        self.preferred_mood.set_disabled(!enabled);
        self.set_save_enabled(enabled);
        self.clear.set_disabled(!enabled);
    }

    /// Save button also carries a dimmed look while disabled.
    pub fn set_save_enabled(&mut self, enabled: bool) {
        self.save.set_disabled(!enabled);
        if enabled {
            self.save.attrs.remove("class");
        } else {
            self.save.set_attr("class", "opacity-70");
        }
    }

    pub fn set_loader_visible(&mut self, visible: bool) {
        if let Some(loader) = &mut self.loader {
            loader.hidden = !visible;
        }
    }
}

// ── Layout chrome ────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
pub struct LayoutPage {
    pub mobile_menu_btn: Option<Element>,
    pub mobile_menu: Option<Element>,
    pub user_menu_btn: Option<Element>,
    pub user_menu_dropdown: Option<Element>,
    pub chevron: Option<Element>,
    pub safety_modal: Option<Element>,
    pub sign_out_btn: Option<Element>,
    pub location: Option<String>,
}

impl Default for LayoutPage {
    fn default() -> Self {
        Self {
            mobile_menu_btn: Some(Element::new("mobile-menu-btn")),
            mobile_menu: Some(Element::hidden("mobile-menu")),
            user_menu_btn: Some(Element::new("user-menu-btn")),
            user_menu_dropdown: Some(Element::hidden("user-menu-dropdown")),
            chevron: Some(Element::new("user-menu-chevron")),
            safety_modal: Some(Element::hidden("safety-modal")),
            sign_out_btn: Some(Element::new("sign-out-btn")),
            location: None,
        }
    }
}
