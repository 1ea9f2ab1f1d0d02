//! Profile store backed by the Firestore REST API.

use std::sync::Arc;

use async_trait::async_trait;
use reqwest::StatusCode;

use super::value::{decode_document, encode_profile, encode_update};
use super::{ProfileDocument, ProfileStore, ProfileUpdate, USERS_COLLECTION, UserProfile};
use crate::config::Config;
use crate::error::ProfileError;
use crate::identity::TokenSource;

pub struct FirestoreStore {
    client: reqwest::Client,
    /// `{base}/projects/{project}/databases/(default)/documents`
    documents_url: String,
    tokens: Option<Arc<dyn TokenSource>>,
}

impl FirestoreStore {
    pub fn new(cfg: &Config, tokens: Option<Arc<dyn TokenSource>>) -> Self {
        Self {
            client: reqwest::Client::new(),
            documents_url: format!(
                "{}/projects/{}/databases/(default)/documents",
                cfg.firestore_url.trim_end_matches('/'),
                cfg.firebase_project_id
            ),
            tokens,
        }
    }

    fn document_url(&self, uid: &str) -> String {
        format!("{}/{USERS_COLLECTION}/{uid}", self.documents_url)
    }

    async fn authorize(&self, req: reqwest::RequestBuilder) -> Result<reqwest::RequestBuilder, String> {
        let Some(tokens) = &self.tokens else {
            return Ok(req);
        };
        match tokens.id_token().await.map_err(|e| e.to_string())? {
            Some(token) => Ok(req.bearer_auth(token)),
            None => Ok(req),
        }
    }
}

async fn failure(resp: reqwest::Response) -> String {
    let status = resp.status();
    let message = resp
        .json::<serde_json::Value>()
        .await
        .ok()
        .and_then(|body| body["error"]["message"].as_str().map(String::from));
    match message {
        Some(m) => format!("HTTP {status}: {m}"),
        None => format!("HTTP {status}"),
    }
}

#[async_trait]
impl ProfileStore for FirestoreStore {
    async fn get_profile(&self, uid: &str) -> Result<Option<ProfileDocument>, ProfileError> {
        let req = self.client.get(self.document_url(uid));
        let req = self.authorize(req).await.map_err(|e| ProfileError::read(uid, e))?;
        let resp = req.send().await.map_err(|e| ProfileError::read(uid, e))?;

        if resp.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !resp.status().is_success() {
            return Err(ProfileError::read(uid, failure(resp).await));
        }

        let body: serde_json::Value = resp.json().await.map_err(|e| ProfileError::read(uid, e))?;
        Ok(Some(decode_document(&body)))
    }

    async fn set_profile(&self, uid: &str, profile: &UserProfile) -> Result<(), ProfileError> {
        // PATCH without a mask replaces the whole document, creating it if needed.
        let req = self.client.patch(self.document_url(uid)).json(&encode_profile(profile));
        let req = self.authorize(req).await.map_err(|e| ProfileError::write(uid, e))?;
        let resp = req.send().await.map_err(|e| ProfileError::write(uid, e))?;

        if !resp.status().is_success() {
            return Err(ProfileError::write(uid, failure(resp).await));
        }
        tracing::debug!("Wrote profile document for {uid}");
        Ok(())
    }

    async fn update_profile(&self, uid: &str, update: &ProfileUpdate) -> Result<(), ProfileError> {
        let (body, mask) = encode_update(update);
        let mut query: Vec<(&str, &str)> = mask.iter().map(|f| ("updateMask.fieldPaths", *f)).collect();
        query.push(("currentDocument.exists", "true"));

        let req = self.client.patch(self.document_url(uid)).query(&query).json(&body);
        let req = self.authorize(req).await.map_err(|e| ProfileError::write(uid, e))?;
        let resp = req.send().await.map_err(|e| ProfileError::write(uid, e))?;

        if !resp.status().is_success() {
            return Err(ProfileError::write(uid, failure(resp).await));
        }
        Ok(())
    }
}
