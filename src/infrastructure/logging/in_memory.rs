use crate::core::errors::WalletError;
use crate::core::models::audit::AppLog;
use crate::infrastructure::logging::LoggingService;
use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::debug;
use uuid::Uuid;

#[derive(Clone, Default)]
pub struct InMemoryLogging {
    logs: Arc<RwLock<Vec<AppLog>>>,
}

impl InMemoryLogging {
    pub fn new() -> Self {
        InMemoryLogging {
            logs: Arc::new(RwLock::new(Vec::new())),
        }
    }

    /// Actions recorded so far, oldest first.
    pub async fn actions(&self) -> Vec<String> {
        self.logs.read().await.iter().map(|l| l.action.clone()).collect()
    }
}

#[async_trait]
impl LoggingService for InMemoryLogging {
    async fn log_action(
        &self,
        action: &str,
        details: serde_json::Value,
        user_id: Option<&str>,
    ) -> Result<(), WalletError> {
        debug!(action, ?user_id, "recording action");
        let details = serde_json::from_value(details)
            .map_err(|e| WalletError::LoggingError(format!("Failed to serialize log details: {}", e)))?;
        let mut logs = self.logs.write().await;
        logs.push(AppLog {
            id: Uuid::new_v4().to_string(),
            action: action.to_string(),
            user_id: user_id.map(String::from),
            details,
            timestamp: chrono::Utc::now(),
        });
        Ok(())
    }

    async fn get_logs(&self) -> Result<Vec<AppLog>, WalletError> {
        let logs = self.logs.read().await;
        Ok(logs.clone())
    }
}
