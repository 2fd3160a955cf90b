use crate::core::errors::WalletError;
use crate::infrastructure::gateway::{GatewayOutcome, PaymentGateway, PaymentRequest};
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tracing::info;

/// Gateway that waits a fixed latency and then answers from a script.
///
/// Once the script is exhausted every payment succeeds.
#[derive(Clone, Default)]
pub struct SimulatedGateway {
    latency: Duration,
    script: Arc<Mutex<VecDeque<Result<GatewayOutcome, WalletError>>>>,
    received: Arc<Mutex<Vec<PaymentRequest>>>,
}

impl SimulatedGateway {
    pub fn new(latency: Duration) -> Self {
        SimulatedGateway {
            latency,
            script: Arc::new(Mutex::new(VecDeque::new())),
            received: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Queues the answer for the next unanswered payment.
    pub async fn push_outcome(&self, outcome: Result<GatewayOutcome, WalletError>) {
        self.script.lock().await.push_back(outcome);
    }

    pub async fn received(&self) -> Vec<PaymentRequest> {
        self.received.lock().await.clone()
    }
}

#[async_trait]
impl PaymentGateway for SimulatedGateway {
    async fn pay(&self, request: &PaymentRequest) -> Result<GatewayOutcome, WalletError> {
        self.received.lock().await.push(request.clone());
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
        let outcome = self
            .script
            .lock()
            .await
            .pop_front()
            .unwrap_or(Ok(GatewayOutcome::Success));
        info!(
            attempt_id = %request.attempt_id,
            amount = request.amount,
            ?outcome,
            "simulated gateway answered"
        );
        outcome
    }
}
