use crate::core::errors::WalletError;
use crate::core::models::group::Group;
use async_trait::async_trait;

/// Durable home of group snapshots, owned by the group CRUD collaborator.
#[async_trait]
pub trait Storage: Send + Sync {
    async fn save_group(&self, group: Group) -> Result<(), WalletError>;
    async fn get_group(&self, group_id: &str) -> Result<Option<Group>, WalletError>;
    async fn list_groups(&self) -> Result<Vec<Group>, WalletError>;
}

/// Receives the updated group once a member has settled every debt.
///
/// This is the only path by which session ledger state reaches the group.
#[async_trait]
pub trait GroupObserver: Send + Sync {
    async fn on_group_updated(&self, group: Group) -> Result<(), WalletError>;
}

pub mod in_memory;
