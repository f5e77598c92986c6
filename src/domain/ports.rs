use crate::domain::model::UserProfile;
use crate::utils::error::Result;
use async_trait::async_trait;
use std::sync::Arc;

/// Byte-oriented key-value storage, the shape of browser local storage.
pub trait KeyValueStore: Send + Sync {
    /// `Ok(None)` when nothing is stored under `key`.
    fn get(&self, key: &str) -> impl std::future::Future<Output = Result<Option<Vec<u8>>>> + Send;
    fn put(&self, key: &str, data: &[u8]) -> impl std::future::Future<Output = Result<()>> + Send;
}

#[async_trait]
pub trait ProfileStore: Send + Sync {
    /// Never fails: unreadable or partial records fall back to defaults per field.
    async fn load(&self) -> UserProfile;
    /// Overwrites the stored record with the whole profile.
    async fn save(&self, profile: &UserProfile) -> Result<()>;
}

#[async_trait]
impl<T: ProfileStore + ?Sized> ProfileStore for Arc<T> {
    async fn load(&self) -> UserProfile {
        (**self).load().await
    }

    async fn save(&self, profile: &UserProfile) -> Result<()> {
        (**self).save(profile).await
    }
}
