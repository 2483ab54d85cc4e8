use std::sync::Arc;

use tokio::sync::RwLock;

use super::RateStore;
use crate::{errors::StoreError, exchange_rate::RateSnapshot};

/// Keeps the snapshot in process memory. Clones share the same slot.
#[derive(Debug, Clone, Default)]
pub struct MemoryRateStore {
    inner: Arc<RwLock<Option<RateSnapshot>>>,
}

impl MemoryRateStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl RateStore for MemoryRateStore {
    async fn save(&self, snapshot: &RateSnapshot) -> Result<(), StoreError> {
        *self.inner.write().await = Some(snapshot.clone());
        Ok(())
    }

    async fn load(&self) -> Result<Option<RateSnapshot>, StoreError> {
        Ok(self.inner.read().await.clone())
    }
}
