//! Deterministic in-process backend.
//!
//! Backs the integration test suite and embeddable demos. BTree containers
//! keep set iteration stable across runs. Each call mutates through `&mut
//! self`, so every operation is trivially atomic.

use std::collections::{BTreeMap, BTreeSet};

use crate::errors::CoreError;
use crate::store::Backend;

#[derive(Debug, Default)]
pub struct MemoryBackend {
    documents: BTreeMap<String, String>,
    sets: BTreeMap<String, BTreeSet<String>>,
    sequences: BTreeMap<String, u64>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored documents (diagnostics/tests).
    pub fn document_count(&self) -> usize {
        self.documents.len()
    }
}

impl Backend for MemoryBackend {
    async fn next_id(&mut self, sequence: &str) -> Result<u64, CoreError> {
        let counter = self.sequences.entry(sequence.to_string()).or_insert(0);
        *counter += 1;
        Ok(*counter)
    }

    async fn put(&mut self, key: &str, value: &str) -> Result<(), CoreError> {
        self.documents.insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn put_if_absent(&mut self, key: &str, value: &str) -> Result<bool, CoreError> {
        if self.documents.contains_key(key) {
            return Ok(false);
        }
        self.documents.insert(key.to_string(), value.to_string());
        Ok(true)
    }

    async fn get(&mut self, key: &str) -> Result<Option<String>, CoreError> {
        Ok(self.documents.get(key).cloned())
    }

    async fn del(&mut self, keys: &[String]) -> Result<u64, CoreError> {
        let mut removed = 0;
        for key in keys {
            let had_document = self.documents.remove(key).is_some();
            let had_set = self.sets.remove(key).is_some();
            if had_document || had_set {
                removed += 1;
            }
        }
        Ok(removed)
    }

    async fn set_add(&mut self, key: &str, member: &str) -> Result<bool, CoreError> {
        Ok(self
            .sets
            .entry(key.to_string())
            .or_default()
            .insert(member.to_string()))
    }

    async fn set_remove(&mut self, key: &str, member: &str) -> Result<bool, CoreError> {
        let Some(set) = self.sets.get_mut(key) else {
            return Ok(false);
        };
        let removed = set.remove(member);
        if set.is_empty() {
            self.sets.remove(key);
        }
        Ok(removed)
    }

    async fn set_members(&mut self, key: &str) -> Result<Vec<String>, CoreError> {
        Ok(self
            .sets
            .get(key)
            .map(|set| set.iter().cloned().collect())
            .unwrap_or_default())
    }

    async fn set_len(&mut self, key: &str) -> Result<u64, CoreError> {
        Ok(self.sets.get(key).map(|set| set.len() as u64).unwrap_or(0))
    }
}
