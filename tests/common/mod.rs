#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use async_trait::async_trait;
use tokio::sync::watch;

use spark_youth::error::{IdentityError, ProfileError};
use spark_youth::identity::{IdentityGateway, User};
use spark_youth::local::FileLocalStore;
use spark_youth::store::{ProfileDocument, ProfileStore, ProfileUpdate, UserProfile};

// ── Identity ─────────────────────────────────────────────────

pub struct FakeIdentity {
    state: watch::Sender<Option<User>>,
    calls: Mutex<Vec<String>>,
    pub fail_sign_up: AtomicBool,
    pub fail_sign_out: AtomicBool,
    pub fail_update: AtomicBool,
}

impl FakeIdentity {
    pub fn new(user: Option<User>) -> Arc<Self> {
        let (state, _) = watch::channel(user);
        Arc::new(Self {
            state,
            calls: Mutex::new(Vec::new()),
            fail_sign_up: AtomicBool::new(false),
            fail_sign_out: AtomicBool::new(false),
            fail_update: AtomicBool::new(false),
        })
    }

    pub fn signed_out() -> Arc<Self> {
        Self::new(None)
    }

    pub fn signed_in(user: User) -> Arc<Self> {
        Self::new(Some(user))
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn count(&self, prefix: &str) -> usize {
        self.calls().iter().filter(|c| c.starts_with(prefix)).count()
    }

    /// Push a new identity to subscribers, like an auth state change.
    pub fn emit(&self, user: Option<User>) {
        self.state.send_replace(user);
    }

    fn record(&self, call: String) {
        self.calls.lock().unwrap().push(call);
    }
}

#[async_trait]
impl IdentityGateway for FakeIdentity {
    fn subscribe(&self) -> watch::Receiver<Option<User>> {
        self.state.subscribe()
    }

    fn current_user(&self) -> Option<User> {
        self.state.borrow().clone()
    }

    async fn sign_in(&self, email: &str, _password: &str) -> Result<User, IdentityError> {
        self.record(format!("sign_in:{email}"));
        let user = User::new(format!("uid-{email}")).with_email(email);
        self.emit(Some(user.clone()));
        Ok(user)
    }

    async fn sign_up(&self, email: &str, _password: &str) -> Result<User, IdentityError> {
        self.record(format!("sign_up:{email}"));
        if self.fail_sign_up.load(Ordering::SeqCst) {
            return Err(IdentityError::Rejected { code: "EMAIL_EXISTS".into() });
        }
        let user = User::new(format!("uid-{email}")).with_email(email);
        self.emit(Some(user.clone()));
        Ok(user)
    }

    async fn sign_out(&self) -> Result<(), IdentityError> {
        self.record("sign_out".into());
        if self.fail_sign_out.load(Ordering::SeqCst) {
            return Err(IdentityError::Network("connection reset".into()));
        }
        self.emit(None);
        Ok(())
    }

    async fn update_display_name(&self, user: &User, name: &str) -> Result<(), IdentityError> {
        self.record(format!("update_display_name:{}:{name}", user.uid));
        if self.fail_update.load(Ordering::SeqCst) {
            return Err(IdentityError::Network("timeout".into()));
        }
        self.state.send_modify(|current| {
            if let Some(u) = current.as_mut().filter(|u| u.uid == user.uid) {
                u.display_name = Some(name.to_string());
            }
        });
        Ok(())
    }
}

// ── Profile store ────────────────────────────────────────────

#[derive(Default)]
pub struct FakeStore {
    docs: Mutex<HashMap<String, ProfileDocument>>,
    sets: Mutex<Vec<(String, UserProfile)>>,
    updates: Mutex<Vec<(String, ProfileUpdate)>>,
    reads: AtomicUsize,
    pub fail_reads: AtomicBool,
    pub fail_writes: AtomicBool,
}

impl FakeStore {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn with_doc(uid: &str, doc: ProfileDocument) -> Arc<Self> {
        let store = Self::default();
        store.docs.lock().unwrap().insert(uid.to_string(), doc);
        Arc::new(store)
    }

    pub fn doc(&self, uid: &str) -> Option<ProfileDocument> {
        self.docs.lock().unwrap().get(uid).cloned()
    }

    pub fn sets(&self) -> Vec<(String, UserProfile)> {
        self.sets.lock().unwrap().clone()
    }

    pub fn updates(&self) -> Vec<(String, ProfileUpdate)> {
        self.updates.lock().unwrap().clone()
    }

    pub fn reads(&self) -> usize {
        self.reads.load(Ordering::SeqCst)
    }

    /// Reads + sets + updates.
    pub fn total_calls(&self) -> usize {
        self.reads() + self.sets().len() + self.updates().len()
    }
}

#[async_trait]
impl ProfileStore for FakeStore {
    async fn get_profile(&self, uid: &str) -> Result<Option<ProfileDocument>, ProfileError> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(ProfileError::read(uid, "HTTP 503"));
        }
        Ok(self.doc(uid))
    }

    async fn set_profile(&self, uid: &str, profile: &UserProfile) -> Result<(), ProfileError> {
        self.sets.lock().unwrap().push((uid.to_string(), profile.clone()));
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(ProfileError::write(uid, "PERMISSION_DENIED"));
        }
        self.docs.lock().unwrap().insert(uid.to_string(), profile.clone().into());
        Ok(())
    }

    async fn update_profile(&self, uid: &str, update: &ProfileUpdate) -> Result<(), ProfileError> {
        self.updates.lock().unwrap().push((uid.to_string(), update.clone()));
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(ProfileError::write(uid, "PERMISSION_DENIED"));
        }
        let mut docs = self.docs.lock().unwrap();
        let doc = docs.get_mut(uid).ok_or_else(|| ProfileError::write(uid, "NOT_FOUND"))?;
        doc.username = Some(update.username.clone());
        doc.preferred_mood = Some(update.preferred_mood.clone());
        Ok(())
    }
}

// ── Helpers ──────────────────────────────────────────────────

pub fn temp_local() -> (Arc<FileLocalStore>, tempfile::TempDir) {
    let tmp = tempfile::TempDir::new().unwrap();
    let store = Arc::new(FileLocalStore::open(tmp.path().join("local_storage.json")));
    (store, tmp)
}

pub fn member(uid: &str) -> User {
    User::new(uid).with_email(format!("{uid}@example.com"))
}

pub fn stored(username: &str, mood: &str, roles: &[&str]) -> ProfileDocument {
    ProfileDocument {
        username: Some(username.to_string()),
        preferred_mood: Some(mood.to_string()),
        roles: Some(roles.iter().map(|r| r.to_string()).collect()),
        ..Default::default()
    }
}
