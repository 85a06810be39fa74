//! Persistence seam shared by every store.
//!
//! The surface is deliberately small: JSON documents keyed by
//! [`crate::keys::KeySpace`] keys, membership sets for relations and indexes,
//! monotonic sequences for id assignment, and an atomic conditional insert
//! (`put_if_absent`) that backs every uniqueness constraint. Concurrent
//! duplicate writers serialize through that primitive and the set-add return
//! value; callers convert a lost race into the idempotent or toggle outcome.

pub mod memory;
pub mod redis;

pub use memory::MemoryBackend;
pub use self::redis::RedisBackend;

use serde::{Serialize, de::DeserializeOwned};

use crate::errors::CoreError;

#[allow(async_fn_in_trait)]
pub trait Backend {
    /// Next value of the given monotonic sequence (starts at 1).
    async fn next_id(&mut self, sequence: &str) -> Result<u64, CoreError>;

    async fn put(&mut self, key: &str, value: &str) -> Result<(), CoreError>;

    /// Atomic conditional insert. Returns `false` without writing when the
    /// key is already claimed.
    async fn put_if_absent(&mut self, key: &str, value: &str) -> Result<bool, CoreError>;

    async fn get(&mut self, key: &str) -> Result<Option<String>, CoreError>;

    /// Deletes the given keys (documents or sets); returns how many existed.
    async fn del(&mut self, keys: &[String]) -> Result<u64, CoreError>;

    /// Adds a member to a set; returns `true` if it was not already present.
    async fn set_add(&mut self, key: &str, member: &str) -> Result<bool, CoreError>;

    /// Removes a member from a set; returns `true` if it was present.
    async fn set_remove(&mut self, key: &str, member: &str) -> Result<bool, CoreError>;

    async fn set_members(&mut self, key: &str) -> Result<Vec<String>, CoreError>;

    async fn set_len(&mut self, key: &str) -> Result<u64, CoreError>;
}

/// Serialize an entity document and store it under `key`.
pub(crate) async fn put_doc<B, T>(backend: &mut B, key: &str, doc: &T) -> Result<(), CoreError>
where
    B: Backend + ?Sized,
    T: Serialize,
{
    let json = serde_json::to_string(doc)
        .map_err(|err| CoreError::other(format!("failed to serialize entity: {err}")))?;
    backend.put(key, &json).await
}

/// Fetch and deserialize the entity document under `key`, if present.
pub(crate) async fn get_doc<B, T>(backend: &mut B, key: &str) -> Result<Option<T>, CoreError>
where
    B: Backend + ?Sized,
    T: DeserializeOwned,
{
    match backend.get(key).await? {
        Some(json) => {
            let value = serde_json::from_str::<T>(&json)
                .map_err(|err| CoreError::other(format!("failed to deserialize entity: {err}")))?;
            Ok(Some(value))
        }
        None => Ok(None),
    }
}
