//! Process-wide session state derived from the current identity.
//!
//! Only the bootstrapper and sign-out write it. Page controllers hold a
//! receiver and read whatever the last reconciliation produced.

use std::collections::BTreeSet;

use tokio::sync::watch;

use crate::identity::User;
use crate::store::{ADMIN_ROLE, MEMBER_ROLE};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RoleSet(BTreeSet<String>);

impl RoleSet {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn member() -> Self {
        [MEMBER_ROLE].into_iter().collect()
    }

    /// Stored roles, or `{"member"}` when the document had none.
    pub fn from_stored(roles: Option<Vec<String>>) -> Self {
        let set: RoleSet = roles.unwrap_or_default().into_iter().filter(|r| !r.is_empty()).collect();
        if set.is_empty() { Self::member() } else { set }
    }

    pub fn contains(&self, role: &str) -> bool {
        self.0.contains(role)
    }

    pub fn is_admin(&self) -> bool {
        self.contains(ADMIN_ROLE)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }
}

impl<S: Into<String>> FromIterator<S> for RoleSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self(iter.into_iter().map(Into::into).collect())
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SessionState {
    pub identity: Option<User>,
    pub roles: RoleSet,
    pub loading: bool,
}

impl SessionState {
    /// Roles cleared, identity known, reconciliation in flight.
    pub fn loading(identity: Option<User>) -> Self {
        Self { identity, roles: RoleSet::empty(), loading: true }
    }

    pub fn signed_out() -> Self {
        Self::default()
    }

    pub fn is_admin(&self) -> bool {
        self.roles.is_admin()
    }
}

/// Shared slot holding the latest [`SessionState`].
pub struct SessionCell {
    tx: watch::Sender<SessionState>,
}

impl Default for SessionCell {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionCell {
    pub fn new() -> Self {
        let (tx, _) = watch::channel(SessionState::signed_out());
        Self { tx }
    }

    pub fn publish(&self, state: SessionState) {
        self.tx.send_replace(state);
    }

    pub fn reset(&self) {
        self.publish(SessionState::signed_out());
    }

    pub fn snapshot(&self) -> SessionState {
        self.tx.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<SessionState> {
        self.tx.subscribe()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_or_empty_roles_default_to_member() {
        assert_eq!(RoleSet::from_stored(None), RoleSet::member());
        assert_eq!(RoleSet::from_stored(Some(vec![])), RoleSet::member());
        assert_eq!(RoleSet::from_stored(Some(vec![String::new()])), RoleSet::member());
    }

    #[test]
    fn test_admin_detection() {
        let roles = RoleSet::from_stored(Some(vec!["member".into(), "admin".into()]));
        assert!(roles.is_admin());
        assert!(!RoleSet::member().is_admin());
        assert_eq!(roles.iter().collect::<Vec<_>>(), vec!["admin", "member"]);
    }

    #[test]
    fn test_cell_reset_clears_roles() {
        let cell = SessionCell::new();
        let mut rx = cell.subscribe();
        cell.publish(SessionState {
            identity: Some(User::new("u1")),
            roles: RoleSet::member(),
            loading: false,
        });
        assert!(rx.has_changed().unwrap());
        assert_eq!(rx.borrow_and_update().roles, RoleSet::member());

        cell.reset();
        assert!(cell.snapshot().roles.is_empty());
        assert!(cell.snapshot().identity.is_none());
    }
}
