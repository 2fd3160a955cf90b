pub mod simulated;

use crate::core::errors::WalletError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct ServiceRef {
    pub service_id: String,
    pub payee_wallet: String,
}

/// One transfer handed to the gateway.
///
/// `attempt_id` is the same for every retry of an attempt, so a gateway
/// that honours it never charges twice for the same attempt.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct PaymentRequest {
    pub attempt_id: String,
    pub group_id: String,
    pub payer_id: String,
    pub payer_wallet: Option<String>,
    pub amount: f64,
    /// `None` for a pay-all transfer to the group's creator wallet.
    pub target: Option<ServiceRef>,
    pub group_wallet: String,
}

#[derive(Clone, Debug, PartialEq)]
pub enum GatewayOutcome {
    Success,
    InsufficientFunds,
    TransientError(String),
}

/// Remote ledger / payment network. May suspend for arbitrary latency.
#[async_trait]
pub trait PaymentGateway: Send + Sync {
    async fn pay(&self, request: &PaymentRequest) -> Result<GatewayOutcome, WalletError>;
}
