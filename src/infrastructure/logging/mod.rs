pub mod in_memory;

use crate::core::errors::WalletError;
use crate::core::models::audit::AppLog;
use async_trait::async_trait;

/// Append-only record of user-visible actions (payments, sessions, groups).
#[async_trait]
pub trait LoggingService: Send + Sync {
    async fn log_action(
        &self,
        action: &str,
        details: serde_json::Value,
        user_id: Option<&str>,
    ) -> Result<(), WalletError>;
    async fn get_logs(&self) -> Result<Vec<AppLog>, WalletError>;
}
