//! In-process credential store
//!
//! Backs local runs and tests. Records are injected at construction and never
//! change afterwards.

use std::collections::HashMap;

use async_trait::async_trait;

use super::CredentialStore;
use crate::auth::UserCredential;
use crate::config::StoreConfig;
use crate::error::StoreError;

#[derive(Debug, Default, Clone)]
pub struct MemoryCredentialStore {
    records: HashMap<String, String>,
}

impl MemoryCredentialStore {
    pub fn new<I, U, H>(records: I) -> Self
    where
        I: IntoIterator<Item = (U, H)>,
        U: Into<String>,
        H: Into<String>,
    {
        Self {
            records: records
                .into_iter()
                .map(|(username, hash)| (username.into(), hash.into()))
                .collect(),
        }
    }

    pub fn from_config(config: &StoreConfig) -> Self {
        Self::new(
            config
                .users
                .iter()
                .map(|u| (u.username.clone(), u.password_hash.clone())),
        )
    }
}

#[async_trait]
impl CredentialStore for MemoryCredentialStore {
    async fn lookup(&self, username: &str) -> Result<Option<UserCredential>, StoreError> {
        Ok(self
            .records
            .get(username)
            .map(|hash| UserCredential::new(username, hash.as_str())))
    }
}
