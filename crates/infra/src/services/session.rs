//! Signed-in user, persisted under `bss_user`.

use std::sync::Arc;

use chrono::Utc;

use bss_auth::{login, Session};

use crate::error::StoreResult;
use crate::keys;
use crate::storage::{load_json, save_json, Storage};

pub struct SessionStore {
    storage: Arc<dyn Storage>,
}

impl SessionStore {
    pub fn new(storage: Arc<dyn Storage>) -> Self {
        Self { storage }
    }

    /// Check credentials and persist the session. `None` on bad credentials.
    pub async fn login(&self, username: &str, password: &str) -> StoreResult<Option<Session>> {
        let Some(session) = login(username, password, Utc::now()) else {
            tracing::warn!(username, "login rejected");
            return Ok(None);
        };
        save_json(self.storage.as_ref(), keys::USER, &session).await?;
        tracing::info!(username, role = %session.role, "signed in");
        Ok(Some(session))
    }

    pub async fn current(&self) -> StoreResult<Option<Session>> {
        load_json(self.storage.as_ref(), keys::USER).await
    }

    pub async fn logout(&self) -> StoreResult<()> {
        self.storage.remove(keys::USER).await
    }
}
