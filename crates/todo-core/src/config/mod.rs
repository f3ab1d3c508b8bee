//! Client configuration.
//!
//! Provides `ClientConfig`, assembled from an optional JSON file and the
//! process environment, describing the hosted store, auth and push endpoints.

use std::env;
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::util::normalize_text_option;
use crate::{Error, Result};

pub const DEFAULT_COLLECTION: &str = "tasks";
pub const DEFAULT_REMINDER_INTERVAL_SECS: u64 = 60;

const ENV_API_KEY: &str = "FIREBASE_API_KEY";
const ENV_PROJECT_ID: &str = "FIREBASE_PROJECT_ID";
const ENV_MESSAGING_SENDER_ID: &str = "FIREBASE_MESSAGING_SENDER_ID";
const ENV_VAPID_KEY: &str = "FIREBASE_VAPID_KEY";
const ENV_COLLECTION: &str = "TODO_COLLECTION";
const ENV_REMINDER_INTERVAL: &str = "TODO_REMINDER_INTERVAL_SECS";

/// Client configuration.
///
/// These values are public client identifiers, not secrets.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct ClientConfig {
    #[serde(default)]
    pub firebase_api_key: Option<String>,
    #[serde(default)]
    pub firebase_project_id: Option<String>,
    #[serde(default)]
    pub messaging_sender_id: Option<String>,
    #[serde(default)]
    pub vapid_key: Option<String>,
    #[serde(default = "default_collection")]
    pub collection: String,
    #[serde(default = "default_reminder_interval_secs")]
    pub reminder_interval_secs: u64,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            firebase_api_key: None,
            firebase_project_id: None,
            messaging_sender_id: None,
            vapid_key: None,
            collection: default_collection(),
            reminder_interval_secs: DEFAULT_REMINDER_INTERVAL_SECS,
        }
    }
}

/// Remote store coordinates
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteEndpoint {
    pub api_key: String,
    pub project_id: String,
}

impl ClientConfig {
    /// Load configuration from environment variables only.
    pub fn from_env() -> Result<Self> {
        Self::default().merge_lookup(|key| env::var(key).ok())
    }

    /// Parse a JSON config file payload.
    pub fn from_json(payload: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(payload)
            .map_err(|error| Error::Config(format!("invalid config JSON: {error}")))?;
        config.validate()
    }

    /// Load a JSON config file, then apply environment overrides.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let base = match path {
            Some(path) => Self::from_json(&std::fs::read_to_string(path)?)?,
            None => Self::default(),
        };
        base.merge_lookup(|key| env::var(key).ok())
    }

    /// Override fields with values found through `lookup`.
    ///
    /// Empty values are ignored so an unset-but-exported variable does not
    /// wipe a value from the config file.
    pub fn merge_lookup<F>(mut self, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let read = |key: &str| normalize_text_option(lookup(key));

        if let Some(value) = read(ENV_API_KEY) {
            self.firebase_api_key = Some(value);
        }
        if let Some(value) = read(ENV_PROJECT_ID) {
            self.firebase_project_id = Some(value);
        }
        if let Some(value) = read(ENV_MESSAGING_SENDER_ID) {
            self.messaging_sender_id = Some(value);
        }
        if let Some(value) = read(ENV_VAPID_KEY) {
            self.vapid_key = Some(value);
        }
        if let Some(value) = read(ENV_COLLECTION) {
            self.collection = value;
        }
        if let Some(value) = read(ENV_REMINDER_INTERVAL) {
            self.reminder_interval_secs = value.parse().map_err(|_| {
                Error::Config(format!("{ENV_REMINDER_INTERVAL} must be a whole number"))
            })?;
        }

        self.validate()
    }

    /// Remote store endpoint, or an error when it is not configured.
    ///
    /// Setting only one of the API key and project id is rejected.
    pub fn remote(&self) -> Result<RemoteEndpoint> {
        let api_key = normalize_text_option(self.firebase_api_key.clone());
        let project_id = normalize_text_option(self.firebase_project_id.clone());

        match (api_key, project_id) {
            (Some(api_key), Some(project_id)) => Ok(RemoteEndpoint {
                api_key,
                project_id,
            }),
            (None, None) => Err(Error::Config(format!(
                "remote store is not configured; set {ENV_API_KEY} and {ENV_PROJECT_ID}"
            ))),
            _ => Err(Error::Config(format!(
                "partial remote store configuration; both {ENV_API_KEY} and {ENV_PROJECT_ID} are required"
            ))),
        }
    }

    /// Period of the reminder sweep
    #[must_use]
    pub const fn reminder_interval(&self) -> Duration {
        Duration::from_secs(self.reminder_interval_secs)
    }

    fn validate(self) -> Result<Self> {
        if self.collection.trim().is_empty() || self.collection.contains('/') {
            return Err(Error::Config(
                "collection must be a non-empty name without '/'".to_string(),
            ));
        }
        if self.reminder_interval_secs == 0 {
            return Err(Error::Config(
                "reminder_interval_secs must be greater than zero".to_string(),
            ));
        }
        Ok(self)
    }
}

fn default_collection() -> String {
    DEFAULT_COLLECTION.to_string()
}

const fn default_reminder_interval_secs() -> u64 {
    DEFAULT_REMINDER_INTERVAL_SECS
}
