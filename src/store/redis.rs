//! Production backend over Redis.
//!
//! Plain commands only: `SET NX` is the unique-claim primitive, native sets
//! hold relations and indexes, `INCR` mints ids. Entity documents are JSON
//! strings, so no server-side modules are required.

use redis::{aio::ConnectionManager, cmd};

use crate::errors::CoreError;
use crate::store::Backend;

pub struct RedisBackend {
    connection: ConnectionManager,
}

impl RedisBackend {
    pub fn new(connection: ConnectionManager) -> Self {
        Self { connection }
    }

    /// Connect to a Redis instance by URL.
    pub async fn connect(url: &str) -> Result<Self, CoreError> {
        let client = redis::Client::open(url)?;
        let connection = client.get_connection_manager().await?;
        Ok(Self { connection })
    }

    /// Delete all keys matching a pattern (test cleanup).
    ///
    /// SCAN + DEL so the sweep never blocks the server.
    pub async fn cleanup_pattern(&mut self, pattern: &str) -> Result<u64, CoreError> {
        const SCAN_COUNT: usize = 1000;
        let mut cursor: u64 = 0;
        let mut total_deleted: u64 = 0;

        loop {
            let (next_cursor, keys): (u64, Vec<String>) = cmd("SCAN")
                .arg(cursor)
                .arg("MATCH")
                .arg(pattern)
                .arg("COUNT")
                .arg(SCAN_COUNT)
                .query_async(&mut self.connection)
                .await?;

            if !keys.is_empty() {
                let deleted: u64 = cmd("DEL").arg(&keys).query_async(&mut self.connection).await?;
                total_deleted += deleted;
            }

            cursor = next_cursor;
            if cursor == 0 {
                break;
            }
        }

        Ok(total_deleted)
    }
}

impl Backend for RedisBackend {
    async fn next_id(&mut self, sequence: &str) -> Result<u64, CoreError> {
        let value: u64 = cmd("INCR").arg(sequence).query_async(&mut self.connection).await?;
        Ok(value)
    }

    async fn put(&mut self, key: &str, value: &str) -> Result<(), CoreError> {
        let _: () = cmd("SET").arg(key).arg(value).query_async(&mut self.connection).await?;
        Ok(())
    }

    async fn put_if_absent(&mut self, key: &str, value: &str) -> Result<bool, CoreError> {
        let reply: Option<String> = cmd("SET")
            .arg(key)
            .arg(value)
            .arg("NX")
            .query_async(&mut self.connection)
            .await?;
        Ok(reply.is_some())
    }

    async fn get(&mut self, key: &str) -> Result<Option<String>, CoreError> {
        let value: Option<String> = cmd("GET").arg(key).query_async(&mut self.connection).await?;
        Ok(value)
    }

    async fn del(&mut self, keys: &[String]) -> Result<u64, CoreError> {
        if keys.is_empty() {
            return Ok(0);
        }
        let removed: u64 = cmd("DEL").arg(keys).query_async(&mut self.connection).await?;
        Ok(removed)
    }

    async fn set_add(&mut self, key: &str, member: &str) -> Result<bool, CoreError> {
        let added: i64 = cmd("SADD").arg(key).arg(member).query_async(&mut self.connection).await?;
        Ok(added == 1)
    }

    async fn set_remove(&mut self, key: &str, member: &str) -> Result<bool, CoreError> {
        let removed: i64 = cmd("SREM").arg(key).arg(member).query_async(&mut self.connection).await?;
        Ok(removed == 1)
    }

    async fn set_members(&mut self, key: &str) -> Result<Vec<String>, CoreError> {
        let members: Vec<String> = cmd("SMEMBERS").arg(key).query_async(&mut self.connection).await?;
        Ok(members)
    }

    async fn set_len(&mut self, key: &str) -> Result<u64, CoreError> {
        let len: u64 = cmd("SCARD").arg(key).query_async(&mut self.connection).await?;
        Ok(len)
    }
}
