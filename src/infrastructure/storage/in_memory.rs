use crate::core::errors::WalletError;
use crate::core::models::group::Group;
use crate::infrastructure::storage::{GroupObserver, Storage};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::debug;

#[derive(Clone, Default)]
pub struct InMemoryStorage {
    groups: Arc<RwLock<HashMap<String, Group>>>,
}

impl InMemoryStorage {
    pub fn new() -> Self {
        InMemoryStorage {
            groups: Arc::new(RwLock::new(HashMap::new())),
        }
    }
}

#[async_trait]
impl Storage for InMemoryStorage {
    async fn save_group(&self, group: Group) -> Result<(), WalletError> {
        let mut groups = self.groups.write().await;
        groups.insert(group.id.clone(), group);
        Ok(())
    }

    async fn get_group(&self, group_id: &str) -> Result<Option<Group>, WalletError> {
        let groups = self.groups.read().await;
        Ok(groups.get(group_id).cloned())
    }

    async fn list_groups(&self) -> Result<Vec<Group>, WalletError> {
        let groups = self.groups.read().await;
        let mut all: Vec<Group> = groups.values().cloned().collect();
        all.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(all)
    }
}

#[async_trait]
impl GroupObserver for InMemoryStorage {
    async fn on_group_updated(&self, group: Group) -> Result<(), WalletError> {
        debug!(group_id = %group.id, "persisting settled group");
        self.save_group(group).await
    }
}
