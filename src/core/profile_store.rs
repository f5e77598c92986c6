use crate::domain::model::{ImageRef, ProfileDefaults, UserProfile};
use crate::domain::ports::{KeyValueStore, ProfileStore};
use crate::utils::error::{MyPageError, Result};
use async_trait::async_trait;
use serde_json::{Map, Value};
use tokio::sync::Mutex;

pub const PROFILE_KEY: &str = "userInfo";

/// Keeps the profile as one JSON record under a fixed key.
pub struct KvProfileStore<S: KeyValueStore> {
    storage: S,
    key: String,
    defaults: ProfileDefaults,
    // tokio's mutex is fair, so queued writes land in the order they were issued
    write_lock: Mutex<()>,
}

impl<S: KeyValueStore> KvProfileStore<S> {
    pub fn new(storage: S) -> Self {
        Self::with_options(storage, PROFILE_KEY, ProfileDefaults::default())
    }

    pub fn with_options(storage: S, key: impl Into<String>, defaults: ProfileDefaults) -> Self {
        Self {
            storage,
            key: key.into(),
            defaults,
            write_lock: Mutex::new(()),
        }
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }
}

#[async_trait]
impl<S: KeyValueStore> ProfileStore for KvProfileStore<S> {
    async fn load(&self) -> UserProfile {
        match self.storage.get(&self.key).await {
            Ok(Some(bytes)) => match decode_profile(&bytes, &self.defaults) {
                Ok(profile) => profile,
                Err(e) => {
                    tracing::warn!("Ignoring stored profile under '{}': {}", self.key, e);
                    self.defaults.profile()
                }
            },
            Ok(None) => {
                tracing::debug!("No stored profile under '{}', using defaults", self.key);
                self.defaults.profile()
            }
            Err(e) => {
                tracing::warn!("Profile storage could not be read: {}", e);
                self.defaults.profile()
            }
        }
    }

    async fn save(&self, profile: &UserProfile) -> Result<()> {
        let data = serde_json::to_vec(profile)?;

        let _guard = self.write_lock.lock().await;
        self.storage
            .put(&self.key, &data)
            .await
            .map_err(|e| MyPageError::PersistenceFailure {
                operation: "save",
                message: e.to_string(),
            })?;

        tracing::debug!("Stored profile under '{}' ({} bytes)", self.key, data.len());
        Ok(())
    }
}

/// Reads a stored record, taking each field on its own. Missing, empty or
/// non-text fields fall back to the default for that field only.
fn decode_profile(bytes: &[u8], defaults: &ProfileDefaults) -> Result<UserProfile> {
    let value: Value =
        serde_json::from_slice(bytes).map_err(|e| MyPageError::MalformedPersistedData {
            message: e.to_string(),
        })?;

    let record = match value {
        Value::Object(record) => record,
        other => {
            return Err(MyPageError::MalformedPersistedData {
                message: format!("expected a JSON object, found {}", kind_of(&other)),
            });
        }
    };

    let nickname = text_field(&record, "nickname").unwrap_or_else(|| defaults.nickname.clone());
    let profile_image = text_field(&record, "profileImage")
        .map(ImageRef)
        .unwrap_or_else(|| defaults.avatar.clone());

    Ok(UserProfile {
        nickname,
        profile_image,
    })
}

fn text_field(record: &Map<String, Value>, name: &str) -> Option<String> {
    match record.get(name) {
        Some(Value::String(s)) if !s.is_empty() => Some(s.clone()),
        Some(Value::String(_)) | None => None,
        Some(other) => {
            tracing::warn!("Stored field '{}' is {}, using default", name, kind_of(other));
            None
        }
    }
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
