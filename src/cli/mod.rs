pub mod account;
pub mod config;
pub mod home;
pub mod inspire;
pub mod profile;
pub mod render;
pub mod settings;

use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use spark_youth::bootstrap::{Landing, SessionBootstrapper};
use spark_youth::config::Config;
use spark_youth::identity::{FirebaseAuth, IdentityGateway, TokenSource, User};
use spark_youth::local::FileLocalStore;
use spark_youth::page::{PageAccess, ShellPage};
use spark_youth::session::{SessionCell, SessionState};
use spark_youth::store::FirestoreStore;

#[derive(Parser)]
#[command(name = "spark", about = "Spark Youth. Track your mood, look after yourself.")]
#[command(version, propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Create an account and its profile
    Signup {
        #[arg(short, long)]
        email: Option<String>,

        /// Display name (a random one is generated if omitted)
        #[arg(short, long)]
        username: Option<String>,
    },

    /// Sign in with email and password
    Login {
        #[arg(short, long)]
        email: Option<String>,
    },

    /// Sign out and clear local data
    Logout,

    /// Show the signed-in home shell (name, mood, admin links)
    Home,

    /// Show your profile
    Profile {
        /// Try the edit action
        #[arg(long)]
        edit: bool,
    },

    /// Show or change your settings
    Settings {
        /// New display name
        #[arg(short, long)]
        name: Option<String>,

        /// New preferred mood
        #[arg(short, long)]
        mood: Option<String>,

        /// Empty the form instead of saving
        #[arg(long, conflicts_with_all = ["name", "mood"])]
        clear: bool,
    },

    /// Today's wellbeing challenge
    Challenge,

    /// A short affirmation for how you feel
    Affirm {
        /// How you're feeling, e.g. "anxious"
        mood: String,
    },

    /// Show configuration and data paths
    Config {
        /// Write a default config file if none exists
        #[arg(long)]
        init: bool,
    },
}

/// Backends shared by every command.
pub struct Services {
    pub cfg: Config,
    pub identity: Arc<FirebaseAuth>,
    pub store: Arc<FirestoreStore>,
    pub local: Arc<FileLocalStore>,
    pub session: Arc<SessionCell>,
}

impl Services {
    pub fn open(cfg: &Config) -> Result<Self> {
        let identity = Arc::new(FirebaseAuth::open(cfg, Config::session_path()?).context(
            "Firebase is not configured. Set firebase_api_key in ~/.spark-youth/config.toml",
        )?);
        let tokens: Arc<dyn TokenSource> = identity.clone();
        let store = Arc::new(FirestoreStore::new(cfg, Some(tokens)));
        let local = Arc::new(FileLocalStore::open(Config::local_storage_path()?));

        Ok(Self {
            cfg: cfg.clone(),
            identity,
            store,
            local,
            session: Arc::new(SessionCell::new()),
        })
    }

    pub fn current_user(&self) -> Option<User> {
        self.identity.current_user()
    }

    pub fn bootstrapper(&self) -> SessionBootstrapper {
        SessionBootstrapper::new(
            self.store.clone(),
            self.local.clone(),
            self.session.clone(),
            Landing::from(&self.cfg),
        )
    }

    /// Run one bootstrap pass for a page with the given access rule.
    pub async fn shell(&self, access: PageAccess) -> (ShellPage, SessionState) {
        let mut page = ShellPage::new(access);
        let user = self.identity.subscribe().borrow().clone();
        let state = self.bootstrapper().reconcile(user, &mut page).await;
        (page, state)
    }
}
