//! In-memory option store.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::{OptionStore, StoreResult};

#[derive(Debug, Default)]
pub struct MemoryOptionStore {
    options: RwLock<HashMap<String, String>>,
}

impl MemoryOptionStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl OptionStore for MemoryOptionStore {
    async fn get(&self, key: &str) -> StoreResult<Option<String>> {
        Ok(self.options.read().await.get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> StoreResult<()> {
        self.options
            .write()
            .await
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn delete(&self, key: &str) -> StoreResult<()> {
        self.options.write().await.remove(key);
        Ok(())
    }
}
