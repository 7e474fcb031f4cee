//! DynamoDB credential store
//!
//! Each store owns its own client, built from injected configuration. Reads
//! are single strongly consistent `GetItem` calls with SDK retries disabled.

use async_trait::async_trait;
use aws_sdk_dynamodb::Client;
use aws_sdk_dynamodb::config::retry::RetryConfig;
use aws_sdk_dynamodb::config::{BehaviorVersion, Credentials, Region};
use aws_sdk_dynamodb::error::SdkError;
use aws_sdk_dynamodb::types::AttributeValue;
use config::ConfigError;
use log::debug;

use super::CredentialStore;
use crate::auth::UserCredential;
use crate::config::StoreConfig;
use crate::error::StoreError;

const PROVIDER_NAME: &str = "grouper-auth-config";

/// Short failure class; SDK messages and response bodies are not kept.
fn error_kind<E, R>(err: &SdkError<E, R>) -> &'static str {
    match err {
        SdkError::ConstructionFailure(_) => "request construction failed",
        SdkError::TimeoutError(_) => "request timed out",
        SdkError::DispatchFailure(_) => "dispatch failure",
        SdkError::ResponseError(_) => "unreadable response",
        SdkError::ServiceError(_) => "service error",
        _ => "unclassified backend error",
    }
}

pub struct DynamoCredentialStore {
    client: Client,
    table_name: String,
    key_attribute: String,
    hash_attribute: String,
}

impl DynamoCredentialStore {
    pub fn from_config(config: &StoreConfig) -> Result<Self, ConfigError> {
        let region = config
            .region
            .clone()
            .ok_or_else(|| ConfigError::Message("store.region is required".into()))?;
        let table_name = config
            .table_name
            .clone()
            .ok_or_else(|| ConfigError::Message("store.table_name is required".into()))?;
        let (Some(access_key_id), Some(secret_access_key)) =
            (&config.access_key_id, &config.secret_access_key)
        else {
            return Err(ConfigError::Message(
                "store.access_key_id and store.secret_access_key must be supplied".into(),
            ));
        };

        let credentials = Credentials::new(
            access_key_id.expose(),
            secret_access_key.expose(),
            None,
            None,
            PROVIDER_NAME,
        );

        let mut builder = aws_sdk_dynamodb::Config::builder()
            .behavior_version(BehaviorVersion::latest())
            .region(Region::new(region))
            .credentials_provider(credentials)
            .retry_config(RetryConfig::disabled());

        if let Some(endpoint) = &config.endpoint {
            builder = builder.endpoint_url(endpoint);
        }

        Ok(Self {
            client: Client::from_conf(builder.build()),
            table_name,
            key_attribute: config.key_attribute.clone(),
            hash_attribute: config.hash_attribute.clone(),
        })
    }
}

#[async_trait]
impl CredentialStore for DynamoCredentialStore {
    async fn lookup(&self, username: &str) -> Result<Option<UserCredential>, StoreError> {
        let output = self
            .client
            .get_item()
            .table_name(&self.table_name)
            .key(&self.key_attribute, AttributeValue::S(username.to_owned()))
            .consistent_read(true)
            .send()
            .await
            .map_err(|e| StoreError::Backend(error_kind(&e).to_string()))?;

        let Some(item) = output.item() else {
            debug!("No record in {} for requested username", self.table_name);
            return Ok(None);
        };

        match item.get(&self.hash_attribute).map(AttributeValue::as_s) {
            Some(Ok(hash)) => Ok(Some(UserCredential::new(username, hash.as_str()))),
            _ => Err(StoreError::CorruptRecord(format!(
                "attribute `{}` missing or not a string",
                self.hash_attribute
            ))),
        }
    }
}
