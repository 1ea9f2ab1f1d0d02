//! Spark Youth client.
//!
//! Connects the site's pages to the hosted identity provider and profile
//! document store, with optional generated content. Each page controller takes
//! an explicit page binding ([`page`]) and the backends it needs as trait
//! objects, so the same flows drive the CLI and the tests.

pub mod account;
pub mod avatar;
pub mod bootstrap;
pub mod config;
pub mod error;
pub mod genai;
pub mod identity;
pub mod layout;
pub mod local;
pub mod page;
pub mod profile;
pub mod session;
pub mod settings;
pub mod store;
pub mod username;
